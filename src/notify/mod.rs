//! Operator notifications
//!
//! Delivery never fails a run: every send error is logged and the next
//! message is attempted.

pub mod messages;
pub mod telegram;

pub use messages::{detail_message, no_jobs_message, summary_message};
pub use telegram::TelegramNotifier;

use crate::config::NotifierConfig;
use crate::discovery::Posting;
use crate::error::Result;
use crate::letters::CoverLetter;
use crate::pipeline::RunSummary;
use crate::tailoring::ResumeVersion;
use async_trait::async_trait;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn send_summary(&self, text: &str) -> Result<()>;

    async fn send_detail(&self, text: &str) -> Result<()>;
}

/// Writes messages to the log when no chat channel is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send_summary(&self, text: &str) -> Result<()> {
        info!("Run summary:\n{}", text);
        Ok(())
    }

    async fn send_detail(&self, text: &str) -> Result<()> {
        info!("{}", text);
        Ok(())
    }
}

/// Telegram when its environment variables are set, otherwise the log
pub fn build_notifier(settings: &NotifierConfig) -> Arc<dyn Notifier> {
    match TelegramNotifier::from_env(settings) {
        Some(Ok(telegram)) => Arc::new(telegram),
        Some(Err(e)) => {
            warn!("Telegram notifier unavailable, logging instead: {}", e);
            Arc::new(LogNotifier)
        }
        None => Arc::new(LogNotifier),
    }
}

#[derive(Debug, Clone)]
pub struct NotifyOptions {
    pub max_details: usize,
    pub pause: Duration,
    pub run_times: Vec<String>,
}

impl NotifyOptions {
    pub fn from_config(settings: &NotifierConfig, run_times: &[String]) -> Self {
        Self {
            max_details: settings.max_detail_messages,
            pause: Duration::from_millis(settings.message_pause_ms),
            run_times: run_times.to_vec(),
        }
    }
}

/// Send the run summary and per-job details. Returns how many messages were delivered.
pub async fn notify_run(
    notifier: &dyn Notifier,
    summary: &RunSummary,
    selected: &[Posting],
    versions: &[ResumeVersion],
    letters: &[CoverLetter],
    options: &NotifyOptions,
) -> usize {
    if selected.is_empty() {
        return match notifier.send_summary(&no_jobs_message(summary.threshold)).await {
            Ok(()) => {
                info!("Sent no-jobs message via {}", notifier.name());
                1
            }
            Err(e) => {
                warn!("{} delivery failed: {}", notifier.name(), e);
                0
            }
        };
    }

    let mut delivered = 0;
    match notifier
        .send_summary(&summary_message(summary, selected, &options.run_times))
        .await
    {
        Ok(()) => delivered += 1,
        Err(e) => warn!("{} summary delivery failed: {}", notifier.name(), e),
    }

    let versions: HashMap<&str, &ResumeVersion> = versions.iter().map(|v| (v.job_id.as_str(), v)).collect();
    let letters: HashMap<&str, &CoverLetter> = letters.iter().map(|l| (l.job_id.as_str(), l)).collect();

    for (i, posting) in selected.iter().take(options.max_details).enumerate() {
        tokio::time::sleep(options.pause).await;
        let text = detail_message(
            i + 1,
            posting,
            versions.get(posting.id.as_str()).copied(),
            letters.get(posting.id.as_str()).copied(),
        );
        match notifier.send_detail(&text).await {
            Ok(()) => {
                delivered += 1;
                info!("Sent job #{}: {} @ {}", i + 1, posting.title, posting.company);
            }
            Err(e) => warn!("{} detail delivery failed for {}: {}", notifier.name(), posting.id, e),
        }
    }
    delivered
}
