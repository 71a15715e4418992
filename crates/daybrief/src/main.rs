//! Daybrief CLI - daily digest job.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daybrief::{DigestConfig, EmailSender, Pipeline};

/// Daybrief CLI - fetch news, weather, and open tasks, then email a morning briefing.
#[derive(Parser)]
#[command(name = "daybrief")]
#[command(about = "Daily digest job - news, weather, and tasks by email")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the job once: fetch, compose, send (for CronJob use)
    Run {
        /// Drop failed sections instead of failing the run
        #[arg(long)]
        allow_partial: bool,
    },

    /// Fetch and compose, print the body to stdout, send nothing
    Preview {
        /// Drop failed sections instead of failing the run
        #[arg(long)]
        allow_partial: bool,

        /// Body representation to print
        #[arg(long, value_enum, default_value = "text")]
        format: PreviewFormat,
    },

    /// Send a fixed test message to verify SMTP configuration
    TestEmail,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PreviewFormat {
    Text,
    Html,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Development convenience; CI injects real secrets.
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("daybrief=debug,info")
    } else {
        EnvFilter::new("daybrief=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // A bare invocation is the scheduled run.
    let command = cli.command.unwrap_or(Commands::Run {
        allow_partial: false,
    });

    match command {
        Commands::Run { allow_partial } => {
            tracing::info!(allow_partial, "Starting digest run");
            run_digest(allow_partial).await
        }
        Commands::Preview {
            allow_partial,
            format,
        } => run_preview(allow_partial, format).await,
        Commands::TestEmail => run_test_email().await,
    }
}

async fn run_digest(allow_partial: bool) -> Result<()> {
    let config = DigestConfig::from_env()?;
    let pipeline = Pipeline::new(config, allow_partial);
    let report = pipeline.run().await?;

    println!("\n📬 Digest Summary");
    println!("   Headlines: {}", report.headlines);
    println!(
        "   Weather: {}",
        if report.weather_ok { "fetched" } else { "skipped" }
    );
    println!("   Tasks today: {}", report.tasks_today);
    println!("   Tasks tomorrow: {}", report.tasks_tomorrow);

    if !report.skipped.is_empty() {
        println!("   Skipped sections: {}", report.skipped.len());
        for err in &report.skipped {
            eprintln!("     - {err}");
        }
    }

    println!("✅ Digest sent");
    Ok(())
}

async fn run_preview(allow_partial: bool, format: PreviewFormat) -> Result<()> {
    let config = DigestConfig::from_env()?;
    let pipeline = Pipeline::new(config, allow_partial);

    let (digest, report) = pipeline.collect().await?;
    let (html, text) = Pipeline::compose(&digest, Utc::now());

    match format {
        PreviewFormat::Text => println!("{text}"),
        PreviewFormat::Html => println!("{html}"),
    }

    if !report.skipped.is_empty() {
        for err in &report.skipped {
            eprintln!("⚠️  Skipped section: {err}");
        }
    }

    Ok(())
}

async fn run_test_email() -> Result<()> {
    let config = DigestConfig::from_env()?;
    let sender = EmailSender::new(config);

    println!("📧 Sending test email...");
    sender.send_test().await?;
    println!("✅ Test email sent");

    Ok(())
}
