//! Webhook notification.
//!
//! Posts a Discord-style embed to an endpoint supplied via the process
//! environment. Delivery is best-effort with a bounded timeout; the caller
//! logs failures and moves on.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::Notifier;

pub const WEBHOOK_URL_ENV: &str = "TALLY_WEBHOOK_URL";

const EMBED_COLOR: u32 = 0x00E9_1E63;

/// Structured message posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    /// Labeled name/value pairs rendered as inline embed fields.
    pub fields: Vec<(String, String)>,
    pub footer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid webhook URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    embeds: [Embed<'a>; 1],
}

#[derive(Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: &'a str,
    color: u32,
    fields: Vec<EmbedField<'a>>,
    footer: EmbedFooter<'a>,
}

#[derive(Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

#[derive(Serialize)]
struct EmbedFooter<'a> {
    text: &'a str,
}

fn to_payload(announcement: &Announcement) -> WebhookPayload<'_> {
    WebhookPayload {
        embeds: [Embed {
            title: &announcement.title,
            description: &announcement.description,
            color: EMBED_COLOR,
            fields: announcement
                .fields
                .iter()
                .map(|(name, value)| EmbedField {
                    name,
                    value,
                    inline: true,
                })
                .collect(),
            footer: EmbedFooter {
                text: &announcement.footer,
            },
        }],
    }
}

#[derive(Debug)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Url,
}

impl WebhookNotifier {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let endpoint = Url::parse(endpoint)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Build a notifier from `TALLY_WEBHOOK_URL`.
    ///
    /// Returns `Ok(None)` when the variable is unset or blank; a present
    /// but unparseable value is an error for the caller to log.
    pub fn from_env(timeout: Duration) -> Result<Option<Self>, NotifyError> {
        match std::env::var(WEBHOOK_URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::new(raw.trim(), timeout).map(Some),
            _ => Ok(None),
        }
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&self, announcement: &Announcement) -> Result<(), NotifyError> {
        self.client
            .post(self.endpoint.clone())
            .json(&to_payload(announcement))
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(title = %announcement.title, "webhook delivered");
        Ok(())
    }
}
