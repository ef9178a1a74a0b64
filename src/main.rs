#![allow(missing_docs)]

//! SmartSense CLI.
//!
//! Classifies single messages, bulk-imports a JSON array of inbound
//! messages, and builds digests, statistics and answers over a JSON array of
//! stored messages. Results go to stdout as pretty JSON; logs go to stderr.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use smartsense::classifier::category_scores;
use smartsense::config::{runtime_paths, Config};
use smartsense::credentials::load_default_credentials;
use smartsense::inbox::{date_label, parse_date_label, InboxStats, MessageFilter};
use smartsense::logging;
use smartsense::processor::{import_batch, process};
use smartsense::query::QueryAnswerer;
use smartsense::types::{InboundMessage, StoredMessage};

#[derive(Debug, Parser)]
#[command(name = "smartsense", version, about = "SMS classification, digests and inbox Q&A")]
struct Cli {
    /// Config file (defaults to $SMARTSENSE_CONFIG or ~/.smartsense/config.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write JSON logs (daily rotation) to ~/.smartsense/logs/.
    #[arg(long, global = true)]
    log_file: bool,

    /// Directory for `--log-file` logs; implies `--log-file`.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify one message and print the enriched record.
    Classify {
        /// Sender address or short code.
        #[arg(long)]
        sender: String,
        /// Message text.
        #[arg(long)]
        body: String,
        /// Receive time (RFC 3339); defaults to now.
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
        /// Include per-category rule scores.
        #[arg(long)]
        explain: bool,
    },
    /// Process a JSON array of inbound messages into stored records.
    Import {
        /// JSON file with `[{"sender", "body", "timestamp"?, "message_id"?}]`.
        file: PathBuf,
        /// Id assigned to the first record.
        #[arg(long, default_value_t = 1)]
        first_id: i64,
    },
    /// Build the digest for one day.
    Digest {
        /// JSON file of stored messages.
        file: PathBuf,
        /// Day to digest (YYYY-MM-DD); defaults to today (UTC).
        #[arg(long)]
        date: Option<String>,
        /// Ask the remote models for category summaries.
        #[arg(long)]
        abstractive: bool,
    },
    /// Answer a free-text question about the messages.
    Ask {
        /// JSON file of stored messages.
        file: PathBuf,
        /// The question.
        query: String,
        /// Restrict to one day (YYYY-MM-DD); defaults to the recent window.
        #[arg(long)]
        date: Option<String>,
    },
    /// Print headline counts.
    Stats {
        /// JSON file of stored messages.
        file: PathBuf,
        /// Restrict to one day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct Explained<T: Serialize> {
    message: T,
    scores: BTreeMap<String, usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let log_dir = match cli.log_dir.clone() {
        Some(dir) => Some(dir),
        None if cli.log_file => Some(runtime_paths()?.logs_dir),
        None => None,
    };
    let _guard = match &log_dir {
        Some(dir) => Some(logging::init_production(dir, level)?),
        None => {
            logging::init_cli(level);
            None
        }
    };

    match cli.command {
        Command::Classify {
            sender,
            body,
            timestamp,
            explain,
        } => {
            let message = process(&sender, &body, timestamp);
            if explain {
                let scores = category_scores(&body)
                    .into_iter()
                    .map(|(category, score)| (category.to_string(), score))
                    .collect();
                print_json(&Explained { message, scores })
            } else {
                print_json(&message)
            }
        }
        Command::Import { file, first_id } => {
            let inbound: Vec<InboundMessage> = read_json(&file)?;
            let stored = import_batch(&inbound, first_id);
            info!(count = stored.len(), "messages imported");
            print_json(&stored)
        }
        Command::Digest {
            file,
            date,
            abstractive,
        } => {
            let day = match date.as_deref() {
                Some(label) => parse_date_label(label)?,
                None => Utc::now().date_naive(),
            };
            let messages = MessageFilter::on_date(day).apply(&read_json::<Vec<StoredMessage>>(&file)?);
            let label = date_label(day);
            let digest = if abstractive {
                let answerer = build_answerer(cli.config.as_deref())?;
                answerer.abstractive_digest(&messages, &label).await
            } else {
                smartsense::digest::digest(&messages, &label)
            };
            print_json(&digest)
        }
        Command::Ask { file, query, date } => {
            let config = Config::load(cli.config.as_deref())?;
            let filter = match date.as_deref() {
                Some(label) => MessageFilter::on_date(parse_date_label(label)?),
                None => MessageFilter::recent(Utc::now(), config.query.recent_window_days),
            };
            let messages = filter.apply(&read_json::<Vec<StoredMessage>>(&file)?);
            let credentials = load_default_credentials()?;
            let answerer = QueryAnswerer::from_config(&config, &credentials);
            let answer = answerer.answer(&query, &messages).await;
            print_json(&answer)
        }
        Command::Stats { file, date } => {
            let all = read_json::<Vec<StoredMessage>>(&file)?;
            let messages = match date.as_deref() {
                Some(label) => MessageFilter::on_date(parse_date_label(label)?).apply(&all),
                None => all,
            };
            print_json(&InboxStats::from_messages(&messages))
        }
    }
}

fn build_answerer(config_path: Option<&Path>) -> Result<QueryAnswerer> {
    let config = Config::load(config_path)?;
    let credentials = load_default_credentials()?;
    Ok(QueryAnswerer::from_config(&config, &credentials))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}
