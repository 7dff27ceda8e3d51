//! IPTV provider adapter for downloading the manifest.
//!
//! Providers expose the playlist at
//! `<url><port>/get.php?username=…&password=…&type=m3u_plus&output=ts`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::config::ProviderConfig;

/// Playlist format requested from the provider
const PLAYLIST_TYPE: &str = "m3u_plus";

/// Stream container requested from the provider
const PLAYLIST_OUTPUT: &str = "ts";

/// IPTV provider client
pub struct PlaylistProvider {
    /// Base URL including scheme and host
    url: String,
    /// Port suffix appended verbatim (e.g. ":8080")
    port: String,
    username: String,
    password: String,
    /// HTTP client
    client: reqwest::Client,
}

impl PlaylistProvider {
    /// Create a new provider client
    pub fn new(
        url: impl Into<String>,
        port: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            port: port.into(),
            username: username.into(),
            password: password.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from config
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            config.url.trim_end_matches('/'),
            config.port.as_str(),
            config.username.as_str(),
            config.password.as_str(),
        )
    }

    /// Build the playlist URL; credentials are query-encoded
    pub fn playlist_url(&self) -> Result<Url> {
        let base = format!("{}{}/get.php", self.url, self.port);
        let mut url = Url::parse(&base)
            .with_context(|| format!("Invalid provider URL: {}", base))?;

        url.query_pairs_mut()
            .append_pair("username", &self.username)
            .append_pair("password", &self.password)
            .append_pair("type", PLAYLIST_TYPE)
            .append_pair("output", PLAYLIST_OUTPUT);

        Ok(url)
    }

    /// Download the playlist to `dest`.
    ///
    /// The body is streamed to `<dest>.part` and renamed into place once
    /// complete, so a failed download leaves the previous manifest intact.
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    pub async fn download(&self, dest: &Path) -> Result<u64> {
        let url = self.playlist_url()?;
        info!(host = url.host_str().unwrap_or_default(), "Downloading manifest");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request manifest")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Provider error: {} - {}", status, body);
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let partial = partial_path(dest);
        let mut file = tokio::fs::File::create(&partial)
            .await
            .with_context(|| format!("Failed to create file: {}", partial.display()))?;

        let mut written = 0u64;
        let copied: Result<()> = async {
            while let Some(chunk) = response.chunk().await.context("Failed to read manifest body")? {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = copied {
            drop(file);
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        drop(file);

        tokio::fs::rename(&partial, dest)
            .await
            .with_context(|| format!("Failed to move manifest into place: {}", dest.display()))?;

        info!(bytes = written, "Manifest downloaded");
        Ok(written)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
