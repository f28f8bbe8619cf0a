//! Job hunter: discover, score and apply to internships

use clap::Parser;
use job_hunter::cli::{Cli, Commands, ConfigAction, ModelAction};
use job_hunter::discovery::{normalize, DiscoveryStats, FileSource, JobSource};
use job_hunter::embeddings::EmbeddingModelManager;
use job_hunter::output::ConsoleFormatter;
use job_hunter::pipeline::{build_scorer, execute, schedule::run_schedule, RunOptions};
use job_hunter::scoring::rank;
use job_hunter::tracker::CsvTracker;
use job_hunter::{Config, JobHunterError, Result};
use log::{error, info};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Secrets may come from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    let formatter = ConsoleFormatter::new(std::io::stdout().is_terminal());

    match command {
        Commands::Run {
            queries,
            dry_run,
            no_embeddings,
            threshold,
            postings,
        } => {
            let options = RunOptions {
                queries,
                dry_run,
                no_embeddings,
                threshold,
                extra_postings: postings,
                show_progress: true,
            };
            let shown_queries = if options.queries.is_empty() {
                &config.search.queries
            } else {
                &options.queries
            };
            let min_score = threshold.unwrap_or(config.scoring.min_relevance_score);
            print!("{}", formatter.banner(shown_queries, min_score, dry_run));

            let ctx = execute(&config, &options).await?;
            if dry_run {
                print!("{}", formatter.score_table(&ctx.ranked, &[], ctx.threshold));
                print!("{}", formatter.selection(&ctx));
            } else {
                print!("{}", formatter.run_summary(&ctx.summary(), &ctx.errors));
            }
        }

        Commands::Score {
            postings,
            threshold,
            no_embeddings,
        } => {
            score_file(&config, &formatter, postings, threshold, no_embeddings).await?;
        }

        Commands::Status => {
            let tracker = CsvTracker::new(config.tracker.csv_path.clone());
            let counts = tracker.status_counts()?;
            print!("{}", formatter.status_counts(&counts, tracker.path()));
        }

        Commands::Schedule { no_embeddings } => {
            let options = RunOptions {
                no_embeddings,
                show_progress: false,
                ..Default::default()
            };
            run_schedule(&config, &options, |ctx| {
                print!("{}", formatter.run_summary(&ctx.summary(), &ctx.errors));
            })
            .await?;
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                println!("📚 Embedding Models\n");
                let manager = EmbeddingModelManager::new(config.embeddings.models_dir.clone()).await?;
                for model in manager.list_available_models() {
                    let status = if manager.is_downloaded(model.id).await {
                        "✅ Downloaded"
                    } else {
                        "⬇️  Available"
                    };
                    let active = if model.id == config.embeddings.model { " (configured)" } else { "" };
                    println!(
                        "  • {} [{}]{} - {} MB, {} dims [{}]",
                        model.name, model.id, active, model.size_mb, model.dimensions, status
                    );
                    println!("    {}", model.description);
                }
                println!("\n💡 Download: job-hunter models download <id>");
            }

            ModelAction::Download { model, force } => {
                println!("⬇️  Downloading model: {}", model);
                config.ensure_models_dir()?;
                let manager = EmbeddingModelManager::new(config.embeddings.models_dir.clone()).await?;
                let path = manager.download_model(&model, force).await?;
                println!("✅ Model '{}' ready", model);
                println!("📁 Location: {}", path.display());
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    JobHunterError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("⚙️  Configuration ({})\n", config_path.display());
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset: {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

/// Score a posting file offline, showing disqualified postings too
async fn score_file(
    config: &Config,
    formatter: &ConsoleFormatter,
    path: PathBuf,
    threshold: Option<f64>,
    no_embeddings: bool,
) -> Result<()> {
    if !path.is_file() {
        return Err(JobHunterError::InvalidInput(format!(
            "Posting file not found: {}",
            path.display()
        )));
    }

    let source = FileSource::new(path);
    let mut stats = DiscoveryStats::default();
    let postings = normalize(source.search("").await, source.name(), &mut stats);
    info!("Scoring {} postings ({} malformed)", postings.len(), stats.malformed);

    let options = RunOptions {
        threshold,
        no_embeddings,
        ..Default::default()
    };
    let scorer = build_scorer(config, &options).await;
    let outcome = scorer.score_all(postings);
    let ranked = rank(outcome.scored, |s| s.breakdown.final_score);

    print!(
        "{}",
        formatter.score_table(&ranked, &outcome.disqualified, scorer.profile().min_score())
    );
    Ok(())
}
