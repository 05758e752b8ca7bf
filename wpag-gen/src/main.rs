//! wpag - WordPress article generator CLI
//!
//! Commands:
//! - `info`: edition, this month's usage and the configured site
//! - `generate`: screen topics, generate and publish articles
//! - `check-topic`: check one topic against existing titles
//! - `titles`: count existing titles in a category
//! - `bulk-publish`: switch recent drafts to published
//! - `init`: write a starter config file

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use wpag_common::config::{load_toml_config, locate_config_file, user_config_path, TomlConfig};
use wpag_gen::bulk::{bulk_publish_drafts, DEFAULT_BULK_DELAY, DEFAULT_WITHIN_HOURS};
use wpag_gen::config::{config_template, CliOverrides, GeneratorConfig};
use wpag_gen::dedup::{fetch_existing_titles, TopicFilter};
use wpag_gen::license::LicenseManager;
use wpag_gen::services::{CompletionClient, WordPressClient};
use wpag_gen::{
    BulkPublishOutcome, BulkPublishRequest, GenerationOrchestrator, PublishOptions, RunOutcome,
    RunRequest, Technology,
};

#[derive(Parser, Debug)]
#[command(name = "wpag")]
#[command(about = "Generate and publish technical articles to WordPress")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/wpag/config.toml, then /etc/wpag/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder holding usage files
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// License edition (entry, standard, pro)
    #[arg(long, global = true)]
    edition: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show edition, usage and site information
    Info,

    /// Generate and publish articles
    Generate {
        /// Technology (wordpress, javascript, python, react, vue, sql)
        #[arg(long)]
        tech: String,

        /// Number of articles to publish
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Candidate topic (repeatable); defaults to the technology's topic list
        #[arg(long = "topic")]
        topics: Vec<String>,
    },

    /// Check whether a topic duplicates an existing post
    CheckTopic {
        topic: String,

        #[arg(long, default_value = "wordpress")]
        tech: String,
    },

    /// Count existing post titles in a technology's category
    Titles {
        #[arg(long, default_value = "wordpress")]
        tech: String,
    },

    /// Publish drafts in bulk (standard and pro editions)
    BulkPublish {
        /// Only drafts in this category (default: every category)
        #[arg(long)]
        category: Option<u64>,

        /// Only drafts dated within the last N hours
        #[arg(long, default_value_t = DEFAULT_WITHIN_HOURS, conflicts_with = "all_time")]
        hours: u32,

        /// Every draft regardless of date
        #[arg(long)]
        all_time: bool,

        /// List the drafts without publishing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a starter config file (to --config, or the user config path)
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Command::Init { force } = cli.command {
        return run_init(cli.config, force);
    }

    let config_path =
        locate_config_file(cli.config.as_deref()).context("Failed to locate configuration file")?;
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path).context("Failed to load configuration file")?,
        None => TomlConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!(
        "Starting wpag v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) => {
            info!(path = %path.display(), "Loaded TOML configuration");
            #[cfg(unix)]
            if wpag_common::config::check_toml_permissions_loose(path).unwrap_or(false) {
                warn!(
                    path = %path.display(),
                    "Config file holds credentials but is readable by other users (chmod 600)"
                );
            }
        }
        None => info!("No config file found, using environment and built-in defaults"),
    }

    let overrides = CliOverrides {
        root_folder: cli.root_folder.clone(),
        edition: cli.edition.clone(),
    };
    let config = GeneratorConfig::resolve(&overrides, &toml_config)
        .context("Invalid configuration")?;

    info!(
        root_folder = %config.root_folder.display(),
        edition = %config.edition,
        site = %config.wordpress.site_url,
        "Configuration resolved"
    );

    match cli.command {
        Command::Info => run_info(&config),
        Command::Generate {
            tech,
            count,
            topics,
        } => run_generate(&config, &tech, count, topics).await,
        Command::CheckTopic { topic, tech } => run_check_topic(&config, &tech, &topic).await,
        Command::Titles { tech } => run_titles(&config, &tech).await,
        Command::BulkPublish {
            category,
            hours,
            all_time,
            dry_run,
        } => {
            let request = BulkPublishRequest {
                category_id: category,
                within_hours: (!all_time).then_some(hours),
                dry_run,
                delay: DEFAULT_BULK_DELAY,
            };
            run_bulk_publish(&config, &request).await
        }
        Command::Init { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn wordpress_client(config: &GeneratorConfig) -> Result<WordPressClient> {
    WordPressClient::new(
        &config.wordpress.site_url,
        config.wordpress.credentials.clone(),
    )
    .context("Failed to create WordPress client")
}

fn category_for(config: &GeneratorConfig, technology: Technology) -> u64 {
    config
        .wordpress
        .category_id
        .unwrap_or_else(|| wpag_gen::generators::category_id(technology))
}

fn run_info(config: &GeneratorConfig) -> Result<ExitCode> {
    let license = LicenseManager::open(config.edition, &config.root_folder);

    println!("{}", license.edition_report());
    println!("Site:       {}", config.wordpress.site_url);
    println!("Post status: {}", config.wordpress.post_status);
    Ok(ExitCode::SUCCESS)
}

async fn run_generate(
    config: &GeneratorConfig,
    tech: &str,
    count: u32,
    topics: Vec<String>,
) -> Result<ExitCode> {
    let technology: Technology = tech.parse()?;

    let completion = CompletionClient::new(config.completion_settings()?)
        .context("Failed to create completion client")?;
    let license = LicenseManager::open(config.edition, &config.root_folder);

    let mut orchestrator = GenerationOrchestrator::new(
        wordpress_client(config)?,
        Arc::new(completion),
        license,
        PublishOptions {
            post_status: config.wordpress.post_status,
            publish_delay: config.publish_delay,
            category_override: config.wordpress.category_id,
        },
    );

    let outcome = orchestrator
        .run(RunRequest {
            technology,
            count,
            topics,
        })
        .await?;

    match outcome {
        RunOutcome::Denied(reason) => {
            error!(reason = %reason, "Generation denied");
            Ok(ExitCode::FAILURE)
        }
        RunOutcome::Completed(summary) => {
            println!(
                "{}: {} published, {} failed, {} duplicates skipped",
                technology, summary.succeeded, summary.failed, summary.skipped_duplicates
            );
            for id in &summary.post_ids {
                println!("  post {}", id);
            }

            if summary.succeeded == 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn run_check_topic(config: &GeneratorConfig, tech: &str, topic: &str) -> Result<ExitCode> {
    let technology: Technology = tech.parse()?;
    let client = wordpress_client(config)?;
    let filter = TopicFilter::new(&client, category_for(config, technology));

    if filter.check_single_topic(topic).await {
        println!("unique: {}", topic);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("duplicate: {}", topic);
        Ok(ExitCode::FAILURE)
    }
}

async fn run_titles(config: &GeneratorConfig, tech: &str) -> Result<ExitCode> {
    let technology: Technology = tech.parse()?;
    let client = wordpress_client(config)?;
    let category_id = category_for(config, technology);

    let titles = fetch_existing_titles(&client, category_id).await;
    println!("{} existing titles in category {}", titles.len(), category_id);
    Ok(ExitCode::SUCCESS)
}

async fn run_bulk_publish(config: &GeneratorConfig, request: &BulkPublishRequest) -> Result<ExitCode> {
    let license = LicenseManager::open(config.edition, &config.root_folder);
    let client = wordpress_client(config)?;

    match bulk_publish_drafts(&client, &license, request).await {
        BulkPublishOutcome::Denied(reason) => {
            error!(reason = %reason, "Bulk publish denied");
            if let Some(notice) = license.feature_upsell("bulk_publish") {
                println!("{}", notice);
            }
            Ok(ExitCode::FAILURE)
        }
        BulkPublishOutcome::Completed(summary) if summary.dry_run => {
            println!("{} drafts would be published:", summary.drafts.len());
            for draft in &summary.drafts {
                println!("  {} {}", draft.id, draft.title);
            }
            Ok(ExitCode::SUCCESS)
        }
        BulkPublishOutcome::Completed(summary) => {
            println!(
                "{} published, {} failed (of {} drafts)",
                summary.published.len(),
                summary.failed.len(),
                summary.drafts.len()
            );
            if summary.failed.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn run_init(explicit: Option<PathBuf>, force: bool) -> Result<ExitCode> {
    let path = explicit
        .or_else(user_config_path)
        .context("No config directory available; pass --config")?;

    if path.exists() && !force {
        eprintln!("{} already exists (use --force to replace it)", path.display());
        return Ok(ExitCode::FAILURE);
    }

    wpag_common::config::write_toml_config(&config_template(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}
