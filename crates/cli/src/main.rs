//! Tally bot CLI - counting channel companion.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tally_bot::report::DailyReporter;
use tally_bot::server::{self, AppState};
use tally_bot::scheduler::{self, SystemClock};
use tally_bot::BotConfig;
use tally_chat::SlackClient;
use tally_progress::{classify, extract, parse_tally, project};
use tally_storage::JsonStorage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tally-bot")]
#[command(about = "Counting channel bot: milestone reactions and daily progress reports", long_about = None)]
struct Cli {
    /// Config file (TOML); `TALLY_*` environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for Slack events and post the daily report on schedule
    Serve,
    /// Run the daily report once, now
    Report {
        /// Print the report instead of storing and posting it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show how a message would be parsed and classified
    Classify {
        /// Message text
        text: String,
    },
    /// Project a tally value against the configured goal
    Project {
        /// Current tally value
        current: i64,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = BotConfig::load_with_dotenv(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve => {
            config.validate()?;
            let report_at = config.report_time()?;
            let client = Arc::new(SlackClient::new(config.slack_config())?);
            let store = JsonStorage::new(&config.storage.path)
                .await
                .with_context(|| format!("Failed to open storage at {}", config.storage.path.display()))?;

            let reporter = DailyReporter::new(client.clone(), store, &config);
            tokio::spawn(scheduler::run_daily(SystemClock, report_at, reporter));

            server::run(config.port, AppState { client }).await?;
        }
        Commands::Report { dry_run } => {
            config.validate()?;
            let client = Arc::new(SlackClient::new(config.slack_config())?);
            let store = JsonStorage::new(&config.storage.path)
                .await
                .with_context(|| format!("Failed to open storage at {}", config.storage.path.display()))?;
            let mut reporter = DailyReporter::new(client, store, &config);

            let report = if dry_run {
                reporter.prepare(Utc::now()).await
            } else {
                reporter.publish(Utc::now()).await
            };

            match report {
                Some(report) if dry_run => println!("{}", report.summary_text),
                Some(_) => info!("Report published"),
                None => anyhow::bail!("Could not produce a report; see the log above"),
            }
        }
        Commands::Classify { text } => {
            println!("Candidate: {:?}", extract(&text));
            match parse_tally(&text) {
                Some(value) => {
                    let milestones: Vec<String> = classify(value).iter().map(|m| m.to_string()).collect();
                    println!("Value: {}", value);
                    if milestones.is_empty() {
                        println!("Milestones: none");
                    } else {
                        println!("Milestones: {}", milestones.join(", "));
                    }
                }
                None => println!("Value: none (not a tally)"),
            }
        }
        Commands::Project { current } => {
            let goal = config.goal();
            let projection = project(&goal, Utc::now(), current);
            println!("Goal: {} by {}", goal.target_value, goal.target_date);
            println!("Days remaining: {}", projection.days_remaining);
            println!("Required daily rate: {:.2}", projection.required_daily_rate);
        }
    }

    Ok(())
}
