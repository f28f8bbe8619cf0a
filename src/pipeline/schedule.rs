//! Daily run times

use crate::config::Config;
use crate::error::{JobHunterError, Result};
use crate::pipeline::{execute, RunContext, RunOptions};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::{error, info};

/// Parse `HH:MM` run times, sorted and deduplicated
pub fn parse_run_times(times: &[String]) -> Result<Vec<NaiveTime>> {
    let mut parsed = times
        .iter()
        .map(|t| {
            NaiveTime::parse_from_str(t.trim(), "%H:%M").map_err(|_| {
                JobHunterError::Configuration(format!("Invalid schedule time '{}', expected HH:MM", t))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    parsed.sort();
    parsed.dedup();

    if parsed.is_empty() {
        return Err(JobHunterError::Configuration(
            "schedule.run_times must list at least one time".to_string(),
        ));
    }
    Ok(parsed)
}

/// The first run time strictly after `now`, rolling over to tomorrow
pub fn next_run_after(now: NaiveDateTime, times: &[NaiveTime]) -> Option<NaiveDateTime> {
    let today = now.date();
    times
        .iter()
        .map(|t| today.and_time(*t))
        .find(|candidate| *candidate > now)
        .or_else(|| times.first().map(|t| (today + Duration::days(1)).and_time(*t)))
}

/// Run now, then at every configured time of day until the process is stopped.
/// A failed run is logged and the schedule carries on.
pub async fn run_schedule<F>(config: &Config, options: &RunOptions, mut on_run: F) -> Result<()>
where
    F: FnMut(&RunContext),
{
    let times = parse_run_times(&config.schedule.run_times)?;
    info!("Scheduler started, daily runs at {}", config.schedule.run_times.join(", "));

    loop {
        match execute(config, options).await {
            Ok(ctx) => on_run(&ctx),
            Err(e) => error!("Scheduled run failed: {}", e),
        }

        let now = chrono::Local::now().naive_local();
        let Some(next) = next_run_after(now, &times) else {
            return Ok(());
        };
        info!("Next run at {}", next.format("%Y-%m-%d %H:%M"));
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
    }
}
