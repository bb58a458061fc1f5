//! tally - regenerates a README's "time together" section, commits the
//! change, and optionally announces it to a webhook.
//!
//! There are no CLI flags: a run is driven entirely by `tally.toml`, the
//! process environment, and the clock. The pipeline is linear: read the
//! document, render the dynamic block, splice it between the markers,
//! and, only when the document actually changed, write/commit/push and
//! fire the webhook.

mod run;

use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_config::TallyConfig;
use tally_tools::{GitRunner, WebhookNotifier};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    // Headless tool: logs go to stderr, the README and git own stdout's job.
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = TallyConfig::load().context("failed to load configuration")?;
    let reference = Utc::now();

    let working_dir = std::env::current_dir().context("cannot determine working directory")?;
    let vcs = GitRunner::new(working_dir)?;

    let notifier = match WebhookNotifier::from_env(config.notify_timeout) {
        Ok(notifier) => notifier,
        Err(err) => {
            tracing::warn!("Ignoring webhook endpoint: {err}");
            None
        }
    };

    let report = run::run(&config, reference, &vcs, notifier.as_ref()).await?;
    if report.changed {
        tracing::info!(
            committed = report.committed,
            notified = report.notified,
            "README updated"
        );
    }

    Ok(())
}
