//! Adapters for external systems.
//!
//! - `provider`: downloads the manifest from an IPTV provider
//! - `discord`: posts run summaries to a Discord webhook

pub mod discord;
pub mod provider;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::RunReport;

pub use discord::{render_summary, DiscordNotifier};
pub use provider::PlaylistProvider;

/// Trait for run notification targets
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable notifier name
    fn name(&self) -> &str;

    /// Deliver the summary of a finished run
    async fn notify(&self, report: &RunReport) -> Result<()>;
}
