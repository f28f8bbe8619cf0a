//! Stage functions. Each consumes the run context and returns the next one.

use crate::discovery::{discover, enrich_posting, DiscoveryOptions, JobSource};
use crate::letters::write_cover_letter;
use crate::llm::TextGenerator;
use crate::notify::{notify_run, Notifier, NotifyOptions};
use crate::output::report::save_report;
use crate::pipeline::context::RunContext;
use crate::scoring::{score_and_select, RelevanceScorer};
use crate::tailoring::ResumeTailor;
use crate::tracker::{ApplicationRecord, TrackerSink};
use log::{error, info, warn};
use std::path::Path;

/// Discovery, plus description enrichment when a generator is given
pub async fn discovery(
    mut ctx: RunContext,
    sources: &[Box<dyn JobSource>],
    enricher: Option<&dyn TextGenerator>,
    options: &DiscoveryOptions,
) -> RunContext {
    let found = discover(sources, options).await;

    let mut postings = Vec::with_capacity(found.postings.len());
    for posting in found.postings {
        postings.push(match enricher {
            Some(generator) => enrich_posting(posting, generator).await,
            None => posting,
        });
    }

    ctx.discovered = postings;
    ctx.discovery_stats = found.stats;
    ctx.advance()
}

pub fn scoring(mut ctx: RunContext, scorer: &RelevanceScorer) -> RunContext {
    let selection = score_and_select(scorer, ctx.discovered.clone());

    ctx.threshold = scorer.profile().min_score();
    ctx.disqualified = selection.disqualified;
    ctx.selected = selection.selected.into_iter().map(|s| s.posting).collect();
    ctx.ranked = selection.ranked;
    ctx.advance()
}

pub async fn tailoring(mut ctx: RunContext, tailor: &ResumeTailor, generator: &dyn TextGenerator) -> RunContext {
    for posting in &ctx.selected {
        info!("Optimizing resume for: {} @ {}", posting.title, posting.company);
        match tailor.tailor(posting, generator).await {
            Ok(version) => ctx.resume_versions.push(version),
            Err(e) => {
                error!("Resume optimization failed for {}: {}", posting.title, e);
                ctx.errors.push(format!("Resume: {} - {}", posting.id, e));
            }
        }
    }
    info!("Generated {} resume versions", ctx.resume_versions.len());
    ctx.advance()
}

/// Letters use the posting's tailored resume, or the base resume without one
pub async fn letters(mut ctx: RunContext, tailor: &ResumeTailor, generator: &dyn TextGenerator) -> RunContext {
    let mut letters = Vec::with_capacity(ctx.selected.len());
    let mut errors = Vec::new();

    for posting in &ctx.selected {
        let resume = ctx
            .resume_for(&posting.id)
            .map(|v| &v.resume_content)
            .unwrap_or_else(|| tailor.base());
        match write_cover_letter(posting, resume, generator).await {
            Ok(letter) => letters.push(letter),
            Err(e) => {
                error!("Cover letter failed for {}: {}", posting.title, e);
                errors.push(format!("CoverLetter: {} - {}", posting.id, e));
            }
        }
    }

    info!("Generated {} cover letters", letters.len());
    ctx.cover_letters = letters;
    ctx.errors.extend(errors);
    ctx.advance()
}

/// Persist one record per selected posting and write the Markdown report.
/// Sink failures are logged only.
pub fn tracking(
    mut ctx: RunContext,
    tracker: &dyn TrackerSink,
    output_dir: &Path,
    follow_up_days: i64,
) -> RunContext {
    let today = ctx.started_at.date();
    let records: Vec<ApplicationRecord> = ctx
        .selected
        .iter()
        .map(|posting| ApplicationRecord::new(posting, ctx.resume_for(&posting.id), today, follow_up_days))
        .collect();

    match tracker.record(&records) {
        Ok(count) => {
            info!("Tracked {} applications ({} new) in {}", records.len(), count, tracker.location());
            ctx.tracker_location = Some(tracker.location());
        }
        Err(e) => warn!("{} tracker failed: {}", tracker.name(), e),
    }

    match save_report(
        output_dir,
        &ctx.selected,
        &ctx.resume_versions,
        &ctx.cover_letters,
        ctx.started_at,
    ) {
        Ok(path) => ctx.report_path = Some(path),
        Err(e) => warn!("Report could not be written: {}", e),
    }

    ctx.records = records;
    ctx.advance()
}

pub async fn notification(mut ctx: RunContext, notifier: &dyn Notifier, options: &NotifyOptions) -> RunContext {
    let summary = ctx.summary();
    ctx.notifications_sent = notify_run(
        notifier,
        &summary,
        &ctx.selected,
        &ctx.resume_versions,
        &ctx.cover_letters,
        options,
    )
    .await;
    ctx.advance()
}
