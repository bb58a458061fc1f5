//! The run pipeline: read, render, splice, write, commit, notify.
//!
//! Byte equality between the old and new document is the sole gate for
//! every side effect. Git failures abort the run; webhook failures are
//! logged and swallowed.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Timelike, Utc};

use tally_config::TallyConfig;
use tally_core::{age_on, render_block, splice};
use tally_tools::{Announcement, Notifier, VersionControl, atomic_write};

/// What a run did. `changed == false` implies nothing else happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub changed: bool,
    pub committed: bool,
    pub notified: bool,
}

pub async fn run<V, N>(
    config: &TallyConfig,
    reference: DateTime<Utc>,
    vcs: &V,
    notifier: Option<&N>,
) -> Result<RunReport>
where
    V: VersionControl,
    N: Notifier,
{
    let original = read_document(&config.readme_path)?;
    let block = render_block(&config.couple, reference);
    let spliced = splice(&original, &block.text, &config.markers);

    if !spliced.changed {
        tracing::info!(path = %config.readme_path.display(), "No changes, nothing to commit");
        return Ok(RunReport {
            changed: false,
            committed: false,
            notified: false,
        });
    }

    atomic_write(&config.readme_path, spliced.text.as_bytes())
        .with_context(|| format!("failed to write {}", config.readme_path.display()))?;

    let author = config.author_for_hour(reference.hour());
    tracing::info!(author = %author.name, branch = %config.branch, "Committing update");
    vcs.configure_identity(author)
        .await
        .context("git identity configuration failed")?;
    vcs.stage_and_commit(&config.readme_path, &config.commit_message)
        .await
        .context("git commit failed")?;
    vcs.push(&config.branch).await.context("git push failed")?;

    let mut notified = false;
    if let Some(notifier) = notifier {
        let announcement = build_announcement(config, &block.duration, reference);
        match notifier.notify(&announcement).await {
            Ok(()) => notified = true,
            Err(err) => tracing::warn!("Webhook notification failed: {err}"),
        }
    }

    Ok(RunReport {
        changed: true,
        committed: true,
        notified,
    })
}

/// Missing document is not an error: the splicer bootstraps the section
/// and the file comes into existence on the first write.
fn read_document(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "README missing, starting from empty content");
            Ok(String::new())
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to read {}", path.display()))
        }
    }
}

fn build_announcement(
    config: &TallyConfig,
    duration: &str,
    reference: DateTime<Utc>,
) -> Announcement {
    let today = reference.date_naive();
    let mut fields = vec![(
        "Since".to_string(),
        config.couple.start.format("%Y-%m-%d").to_string(),
    )];
    for partner in &config.couple.partners {
        fields.push((
            partner.name.clone(),
            format!("{} years old", age_on(partner.born, today)),
        ));
    }

    Announcement {
        title: "Time together updated".to_string(),
        description: format!("We have been together for **{duration}**."),
        fields,
        footer: "tally".to_string(),
    }
}
