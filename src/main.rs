//! EC2 Console Fingerprints
//!
//! Lists EC2 instances, reads each one's console output and prints the
//! SSH host key fingerprint lines found there, under the instance's
//! public address and tags. Credentials come from the AWS default chain.
//!
//! # Usage
//! ```bash
//! # Scan the default region
//! ec2-fingerprints
//!
//! # Scan another region with a named profile
//! ec2-fingerprints --region eu-west-1 --profile ops
//!
//! # One JSON object per instance
//! ec2-fingerprints --output json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ec2_fingerprints::{Ec2Inventory, OutputFormat, Reporter};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "ec2-fingerprints", version, about)]
struct Cli {
    /// AWS region to scan (defaults to the SDK's region chain)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Shared config profile to load credentials from
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;
    Ok(())
}

/// Quiet by default: stderr only carries warnings and fatal errors
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

async fn run(cli: Cli) -> Result<()> {
    debug!("🔍 Scanning EC2 console output for host key fingerprints");

    let inventory = Ec2Inventory::from_env(cli.region, cli.profile).await;

    let stdout = std::io::stdout();
    let summary = Reporter::new(&inventory, stdout.lock(), cli.output)
        .run()
        .await
        .context("Fingerprint scan aborted")?;

    debug!(
        instances = summary.instances_seen,
        skipped = summary.instances_skipped,
        reported = summary.instances_reported,
        lines = summary.fingerprint_lines,
        "✅ Scan complete"
    );

    Ok(())
}
