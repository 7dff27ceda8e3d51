//! Discord webhook notifier.
//!
//! Posts a markdown summary of the run as the webhook message content.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::Notifier;
use crate::config::DiscordConfig;
use crate::domain::{Category, RunReport};

/// Discord webhook client
pub struct DiscordNotifier {
    /// Webhook URL
    webhook_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl DiscordNotifier {
    /// Create a new notifier for a webhook
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from config; `None` when disabled or no webhook is set
    pub fn from_config(config: &DiscordConfig) -> Option<Self> {
        if !config.enabled || config.webhook_url.trim().is_empty() {
            return None;
        }
        Some(Self::new(config.webhook_url.trim()))
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn notify(&self, report: &RunReport) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "content": render_summary(report) }))
            .send()
            .await
            .context("Failed to send Discord notification")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Discord webhook error: {} - {}", status, body);
        }

        info!("Discord notification sent");
        Ok(())
    }
}

/// Render the webhook message for a run
pub fn render_summary(report: &RunReport) -> String {
    let mut message = String::from("```markdown\nRun summary\n===========================\n\n");

    for category in Category::ALL {
        message.push_str(&format!(
            "{} added: {}\n\n",
            category.label(),
            report.counts(category).created
        ));
    }

    let failed = report.total_failed();
    if failed > 0 {
        message.push_str(&format!("Failed entries: {}\n\n", failed));
    }

    message.push_str(&format!("Processing time: {}\n\n", report.duration));
    message.push_str("===========================\n```");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_server::serve_once;
    use crate::domain::CategoryCounts;
    use chrono::Utc;

    fn report() -> RunReport {
        RunReport {
            finished_at: Utc::now(),
            categories: vec![
                (
                    Category::Movie,
                    CategoryCounts {
                        created: 3,
                        ..Default::default()
                    },
                ),
                (Category::Series, CategoryCounts::default()),
                (
                    Category::Channel,
                    CategoryCounts {
                        created: 12,
                        skipped: 4,
                        ..Default::default()
                    },
                ),
                (Category::Other, CategoryCounts::default()),
            ],
            excluded: 7,
            unclassified_failures: 0,
            elapsed_ms: 2_500,
            duration: "0 min 2.50 s".to_string(),
        }
    }

    #[test]
    fn test_render_summary() {
        let message = render_summary(&report());

        assert!(message.starts_with("```markdown\n"));
        assert!(message.ends_with("```"));
        assert!(message.contains("Movies added: 3\n"));
        assert!(message.contains("Episodes added: 0\n"));
        assert!(message.contains("TV-channels added: 12\n"));
        assert!(message.contains("Processing time: 0 min 2.50 s"));
        assert!(!message.contains("Failed entries"));
    }

    #[test]
    fn test_from_config_requires_webhook() {
        let disabled = DiscordConfig {
            enabled: false,
            webhook_url: "https://discord.example/hook".to_string(),
        };
        assert!(DiscordNotifier::from_config(&disabled).is_none());

        let empty = DiscordConfig {
            enabled: true,
            webhook_url: "  ".to_string(),
        };
        assert!(DiscordNotifier::from_config(&empty).is_none());
    }

    #[tokio::test]
    async fn test_notify_posts_content() {
        let (base, server) = serve_once("204 No Content", "").await;
        let notifier = DiscordNotifier::new(format!("{}/api/webhooks/1/abc", base));

        notifier.notify(&report()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/webhooks/1/abc"));
        assert!(request.contains("\"content\""));
        assert!(request.contains("Movies added: 3"));
    }

    #[tokio::test]
    async fn test_notify_rejects_error_status() {
        let (base, server) = serve_once("400 Bad Request", "invalid webhook").await;
        let notifier = DiscordNotifier::new(base);

        let err = notifier.notify(&report()).await.unwrap_err();

        assert!(err.to_string().contains("400"));
        server.await.unwrap();
    }
}
