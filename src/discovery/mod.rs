//! Job discovery
//!
//! Queries every configured source, normalises what comes back into
//! [`Posting`]s and applies the cheap discovery-side filters: malformed
//! entries, blacklisted titles, stale postings and duplicates.

pub mod enrich;
pub mod freshness;
pub mod posting;
pub mod source;

pub use enrich::enrich_posting;
pub use freshness::is_fresh;
pub use posting::{posting_id, Posting, RawPosting, WorkMode};
pub use source::{FeedSource, FileSource, JobSource};

use crate::config::Config;
use crate::error::Result;
use crate::retry::random_delay;
use crate::scoring::KeywordSet;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub queries: Vec<String>,
    pub max_postings: usize,
    pub max_age_days: u32,
    pub title_blacklist: KeywordSet,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub today: NaiveDate,
    pub show_progress: bool,
}

impl DiscoveryOptions {
    pub fn from_config(config: &Config, queries: Vec<String>) -> Self {
        Self {
            queries,
            max_postings: config.search.max_postings_per_run,
            max_age_days: config.search.max_age_days,
            title_blacklist: KeywordSet::new(&config.candidate.blacklist_keywords),
            min_delay: Duration::from_millis(config.search.min_query_delay_ms),
            max_delay: Duration::from_millis(config.search.max_query_delay_ms),
            today: chrono::Local::now().date_naive(),
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub raw: usize,
    pub malformed: usize,
    pub blacklisted: usize,
    pub stale: usize,
    pub duplicates: usize,
    pub over_cap: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub postings: Vec<Posting>,
    pub stats: DiscoveryStats,
}

/// Build the sources named in the configuration plus any extra posting files
pub fn configured_sources(config: &Config, extra_files: &[std::path::PathBuf]) -> Result<Vec<Box<dyn JobSource>>> {
    let mut sources: Vec<Box<dyn JobSource>> = Vec::new();

    for path in config.search.posting_files.iter().chain(extra_files.iter()) {
        sources.push(Box::new(FileSource::new(path.clone())));
    }

    for feed in config.search.feeds.iter().filter(|f| f.enabled) {
        sources.push(Box::new(FeedSource::new(
            &feed.name,
            &feed.url_template,
            &config.search.location,
            config.network_retry_policy(),
        )?));
    }

    Ok(sources)
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// Normalise raw postings from one source, dropping the malformed ones
pub fn normalize(raw: Vec<RawPosting>, source: &str, stats: &mut DiscoveryStats) -> Vec<Posting> {
    raw.into_iter()
        .filter_map(|entry| {
            stats.raw += 1;
            let posting = Posting::from_raw(entry, source);
            if posting.is_none() {
                stats.malformed += 1;
                debug!("{}: dropping posting without title or company", source);
            }
            posting
        })
        .collect()
}

/// Run every query against every source, in order, one call at a time
pub async fn discover(sources: &[Box<dyn JobSource>], options: &DiscoveryOptions) -> Discovery {
    let mut discovery = Discovery::default();
    let mut seen = HashSet::new();

    if sources.is_empty() {
        warn!("No job sources configured");
        return discovery;
    }

    let throttled = sources.iter().any(|s| s.throttled());
    let bar = progress_bar(options.queries.len() as u64, options.show_progress);

    for (index, query) in options.queries.iter().enumerate() {
        bar.set_message(query.clone());
        info!("Searching: '{}'", query);

        for source in sources {
            let raw = source.search(query).await;
            for posting in normalize(raw, source.name(), &mut discovery.stats) {
                if options.title_blacklist.matches_any(&posting.title) {
                    discovery.stats.blacklisted += 1;
                    debug!("Skipping blacklisted title: {}", posting.title);
                    continue;
                }
                if !is_fresh(posting.posted_date.as_deref(), options.max_age_days, options.today) {
                    discovery.stats.stale += 1;
                    debug!("Skipping stale posting: {} ({:?})", posting.title, posting.posted_date);
                    continue;
                }
                if !seen.insert(posting.id.clone()) {
                    discovery.stats.duplicates += 1;
                    continue;
                }
                discovery.postings.push(posting);
            }
        }
        bar.inc(1);

        if throttled && index + 1 < options.queries.len() {
            tokio::time::sleep(random_delay(options.min_delay, options.max_delay)).await;
        }
    }
    bar.finish_and_clear();

    if discovery.postings.len() > options.max_postings {
        discovery.stats.over_cap = discovery.postings.len() - options.max_postings;
        discovery.postings.truncate(options.max_postings);
    }

    info!(
        "Discovered {} postings ({} raw, {} malformed, {} blacklisted, {} stale, {} duplicates, {} over cap)",
        discovery.postings.len(),
        discovery.stats.raw,
        discovery.stats.malformed,
        discovery.stats.blacklisted,
        discovery.stats.stale,
        discovery.stats.duplicates,
        discovery.stats.over_cap
    );
    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        name: &'static str,
        postings: Vec<RawPosting>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(name: &'static str, postings: Vec<RawPosting>) -> Self {
            Self {
                name,
                postings,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl JobSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, _query: &str) -> Vec<RawPosting> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.postings.clone()
        }

        fn throttled(&self) -> bool {
            false
        }
    }

    fn raw(title: &str, company: &str, posted: Option<&str>) -> RawPosting {
        RawPosting {
            title: Some(title.to_string()),
            company: Some(company.to_string()),
            posted_date: posted.map(str::to_string),
            ..Default::default()
        }
    }

    fn options(queries: &[&str], max_postings: usize) -> DiscoveryOptions {
        DiscoveryOptions {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            max_postings,
            max_age_days: 7,
            title_blacklist: KeywordSet::new(["senior", "lead"]),
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            today: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn test_filters_and_dedup() {
        let first = StaticSource::new(
            "first",
            vec![
                raw("ML Intern", "Acme AI", Some("2 days ago")),
                raw("Senior ML Engineer", "Acme AI", None),
                raw("NLP Intern", "Old Co", Some("3 weeks ago")),
                RawPosting::default(),
            ],
        );
        let mut duplicate = raw("ML Intern", "Acme AI", None);
        duplicate.source = Some("second".to_string());
        let second = StaticSource::new("second", vec![duplicate, raw("GenAI Intern", "Beta", None)]);

        let sources: Vec<Box<dyn JobSource>> = vec![Box::new(first), Box::new(second)];
        let found = discover(&sources, &options(&["ml"], 20)).await;

        let titles: Vec<&str> = found.postings.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["ML Intern", "GenAI Intern"]);
        // first discovered wins
        assert_eq!(found.postings[0].source, "first");
        assert_eq!(
            found.stats,
            DiscoveryStats {
                raw: 6,
                malformed: 1,
                blacklisted: 1,
                stale: 1,
                duplicates: 1,
                over_cap: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_every_query_hits_every_source_and_cap_applies() {
        let source = StaticSource::new(
            "only",
            vec![raw("A", "X", None), raw("B", "X", None), raw("C", "X", None)],
        );
        let sources: Vec<Box<dyn JobSource>> = vec![Box::new(source)];
        let found = discover(&sources, &options(&["one", "two"], 2)).await;

        assert_eq!(found.postings.len(), 2);
        assert_eq!(found.stats.duplicates, 3);
        assert_eq!(found.stats.over_cap, 1);
    }

    #[tokio::test]
    async fn test_no_sources() {
        let found = discover(&[], &options(&["ml"], 20)).await;
        assert!(found.postings.is_empty());
    }
}
