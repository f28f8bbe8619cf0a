//! Pipeline orchestration
//!
//! One run walks the stages in order: discovery, scoring, tailoring,
//! cover letters, tracking and notification. Every stage runs even when
//! nothing was selected, and per-posting failures are collected on the
//! run context instead of stopping the run. The only fatal error is
//! failing to set up the collaborators, which happens before the first
//! stage starts.

pub mod context;
pub mod schedule;
pub mod stages;

pub use context::{RunContext, RunSummary, Stage};

use crate::config::Config;
use crate::discovery::{configured_sources, DiscoveryOptions, JobSource};
use crate::embeddings::Model2VecEmbedder;
use crate::error::Result;
use crate::input::read_resume_text;
use crate::llm::{build_generator, TextGenerator};
use crate::notify::{build_notifier, Notifier, NotifyOptions};
use crate::scoring::{RelevanceScorer, SemanticCapability, SemanticScorer};
use crate::tailoring::ResumeTailor;
use crate::tracker::{CsvTracker, TrackerSink};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// Per-invocation overrides on top of the configuration
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Search queries; the configured ones when empty
    pub queries: Vec<String>,
    pub dry_run: bool,
    pub no_embeddings: bool,
    pub threshold: Option<f64>,
    /// Posting files searched in addition to the configured sources
    pub extra_postings: Vec<PathBuf>,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            dry_run: false,
            no_embeddings: false,
            threshold: None,
            extra_postings: Vec::new(),
            show_progress: true,
        }
    }
}

/// External services a full run talks to, chosen once at run start
pub struct Collaborators {
    pub sources: Vec<Box<dyn JobSource>>,
    pub generator: Arc<dyn TextGenerator>,
    pub tracker: Box<dyn TrackerSink>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Fails when no text generation provider can be configured
    pub fn from_config(config: &Config, extra_postings: &[PathBuf]) -> Result<Self> {
        let generator = build_generator(config)?;
        Ok(Self {
            sources: configured_sources(config, extra_postings)?,
            generator,
            tracker: Box::new(CsvTracker::new(config.tracker.csv_path.clone())),
            notifier: build_notifier(&config.notifier),
        })
    }
}

/// Embeddings when enabled and the model is on disk, otherwise keyword scoring only
pub fn semantic_capability(config: &Config, no_embeddings: bool) -> SemanticCapability {
    if no_embeddings || !config.embeddings.enabled {
        info!("Semantic scoring disabled");
        return SemanticCapability::Unavailable;
    }

    match Model2VecEmbedder::from_config(config) {
        Ok(embedder) => SemanticCapability::Available(Arc::new(embedder)),
        Err(e) => {
            warn!("Semantic scoring unavailable, using keyword scoring only: {}", e);
            SemanticCapability::Unavailable
        }
    }
}

/// Resume document text when one is configured and readable, else the profile summary
pub async fn profile_text(config: &Config) -> String {
    if let Some(path) = &config.candidate.resume_path {
        match read_resume_text(path).await {
            Ok(text) => return text,
            Err(e) => warn!("Could not read resume {}: {}", path.display(), e),
        }
    }
    config.candidate_profile().summary_text()
}

pub async fn build_scorer(config: &Config, options: &RunOptions) -> RelevanceScorer {
    let mut profile = config.candidate_profile();
    if let Some(threshold) = options.threshold {
        profile = profile.with_min_score(threshold);
    }

    let capability = semantic_capability(config, options.no_embeddings);
    let semantic = if capability.is_available() {
        SemanticScorer::new(capability, &profile_text(config).await)
    } else {
        SemanticScorer::unavailable()
    };
    RelevanceScorer::new(profile, semantic)
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub discovery: DiscoveryOptions,
    pub output_dir: PathBuf,
    pub follow_up_days: i64,
    pub notify: NotifyOptions,
    /// Ask the generator for skill lists on postings with a usable description
    pub enrich_postings: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config, options: &RunOptions) -> Self {
        let queries = if options.queries.is_empty() {
            config.search.queries.clone()
        } else {
            options.queries.clone()
        };
        let mut discovery = DiscoveryOptions::from_config(config, queries);
        discovery.show_progress = options.show_progress;

        Self {
            discovery,
            output_dir: config.tracker.output_dir.clone(),
            follow_up_days: config.tracker.follow_up_days,
            notify: NotifyOptions::from_config(&config.notifier, &config.schedule.run_times),
            enrich_postings: true,
        }
    }
}

pub struct Pipeline {
    collaborators: Collaborators,
    scorer: RelevanceScorer,
    tailor: ResumeTailor,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        collaborators: Collaborators,
        scorer: RelevanceScorer,
        tailor: ResumeTailor,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            collaborators,
            scorer,
            tailor,
            settings,
        }
    }

    pub async fn from_config(config: &Config, options: &RunOptions) -> Result<Self> {
        let collaborators = Collaborators::from_config(config, &options.extra_postings)?;
        let scorer = build_scorer(config, options).await;
        let tailor = ResumeTailor::from_config(config)?;
        Ok(Self::new(
            collaborators,
            scorer,
            tailor,
            PipelineSettings::from_config(config, options),
        ))
    }

    pub async fn run(&self) -> RunContext {
        self.run_at(chrono::Local::now().naive_local()).await
    }

    /// Run every stage in order, starting the clock at `started_at`
    pub async fn run_at(&self, started_at: NaiveDateTime) -> RunContext {
        let collaborators = &self.collaborators;
        let generator = collaborators.generator.as_ref();
        let mut ctx = RunContext::new(started_at, self.scorer.profile().min_score());

        info!("Pipeline started at {}", started_at.format("%Y-%m-%d %H:%M:%S"));
        loop {
            let stage = ctx.stage;
            if stage == Stage::Done {
                break;
            }
            info!("Stage: {}", stage);

            ctx = match stage {
                Stage::Discovery => {
                    let enricher = self.settings.enrich_postings.then_some(generator);
                    stages::discovery(ctx, &collaborators.sources, enricher, &self.settings.discovery).await
                }
                Stage::Scoring => stages::scoring(ctx, &self.scorer),
                Stage::Tailoring => stages::tailoring(ctx, &self.tailor, generator).await,
                Stage::Letters => stages::letters(ctx, &self.tailor, generator).await,
                Stage::Tracking => stages::tracking(
                    ctx,
                    collaborators.tracker.as_ref(),
                    &self.settings.output_dir,
                    self.settings.follow_up_days,
                ),
                Stage::Notification => {
                    stages::notification(ctx, collaborators.notifier.as_ref(), &self.settings.notify).await
                }
                Stage::Done => ctx,
            };
        }

        info!(
            "Pipeline complete: {} qualifying, {} errors",
            ctx.selected.len(),
            ctx.errors.len()
        );
        ctx
    }
}

/// Discovery and scoring only. Nothing is generated, tracked or sent.
pub async fn dry_run(
    sources: &[Box<dyn JobSource>],
    scorer: &RelevanceScorer,
    options: &DiscoveryOptions,
    started_at: NaiveDateTime,
) -> RunContext {
    let ctx = RunContext::new(started_at, scorer.profile().min_score());
    let ctx = stages::discovery(ctx, sources, None, options).await;
    stages::scoring(ctx, scorer)
}

/// Run once with the given options, as a dry run or in full
pub async fn execute(config: &Config, options: &RunOptions) -> Result<RunContext> {
    if options.dry_run {
        let sources = configured_sources(config, &options.extra_postings)?;
        let scorer = build_scorer(config, options).await;
        let settings = PipelineSettings::from_config(config, options);
        let started_at = chrono::Local::now().naive_local();
        return Ok(dry_run(&sources, &scorer, &settings.discovery, started_at).await);
    }

    let pipeline = Pipeline::from_config(config, options).await?;
    Ok(pipeline.run().await)
}
