//! Sample messages for auto-detect mode.
//!
//! Samples are fetched once at startup from a JSON endpoint shaped like
//! `{"messages": ["...", ...]}`. Any failure falls back to a fixed list.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

/// Messages used when the sample endpoint is unavailable.
pub const FALLBACK_MESSAGES: [&str; 10] = [
    "You have won a FREE ticket to Bahamas! Claim now!",
    "Reminder: Your meeting is scheduled for 3PM.",
    "Get cash back on your next recharge offer!",
    "This is a limited time offer. Act now!",
    "Don't forget to submit the report by tomorrow.",
    "URGENT: Your account will be suspended if not updated.",
    "Hi, are you coming to the party tonight?",
    "Win ₹10,000 now just by answering 3 questions!",
    "Congratulations! You've been selected for a prize.",
    "Your Amazon delivery has been shipped.",
];

#[derive(Deserialize)]
struct SamplesPayload {
    #[serde(default)]
    messages: Vec<String>,
}

pub fn fallback_messages() -> Vec<String> {
    FALLBACK_MESSAGES.iter().map(|m| m.to_string()).collect()
}

/// Fetch sample messages, falling back to [`FALLBACK_MESSAGES`] on any
/// failure or an empty list. Never fails.
pub async fn fetch_messages(client: &reqwest::Client, url: &str, timeout: Duration) -> Vec<String> {
    match try_fetch(client, url, timeout).await {
        Ok(messages) if !messages.is_empty() => {
            info!(url = %url, count = messages.len(), "Sample messages fetched");
            messages
        }
        Ok(_) => {
            warn!(url = %url, "Sample endpoint returned no messages, using fallback");
            fallback_messages()
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to fetch sample messages, using fallback");
            fallback_messages()
        }
    }
}

async fn try_fetch(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<String>, reqwest::Error> {
    let payload: SamplesPayload = client
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(payload.messages)
}
