//! Command-line interface for strmgen.
//!
//! Provides commands for materializing a manifest into a `.strm` library,
//! generating the exclusion registry, downloading the manifest and managing
//! configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::adapters::{DiscordNotifier, Notifier, PlaylistProvider};
use crate::config::{self, ResolvedConfig};
use crate::core::{Engine, NameSanitizer};
use crate::registry::{self, ExclusionSet};
use crate::report;

/// Maximum number of failed entries listed after a run
const MAX_LISTED_FAILURES: usize = 20;

/// strmgen - IPTV manifest to .strm library generator
#[derive(Parser, Debug)]
#[command(name = "strmgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize the manifest into the .strm library
    Run {
        /// Manifest file (defaults to paths.manifest)
        #[arg(short, long, env = "STRMGEN_MANIFEST")]
        manifest: Option<PathBuf>,

        /// Output root (defaults to paths.output)
        #[arg(short, long, env = "STRMGEN_OUTPUT")]
        output: Option<PathBuf>,

        /// Exclusion registry (defaults to paths.exclusions)
        #[arg(short, long, env = "STRMGEN_EXCLUSIONS")]
        exclusions: Option<PathBuf>,

        /// Do not download the manifest first, even if the provider is enabled
        #[arg(long)]
        no_fetch: bool,

        /// Do not send notifications
        #[arg(long)]
        no_notify: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate the exclusion registry from the manifest's groups
    Groups {
        /// Manifest file (defaults to paths.manifest)
        #[arg(short, long, env = "STRMGEN_MANIFEST")]
        manifest: Option<PathBuf>,

        /// Registry file to write (defaults to paths.exclusions)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the manifest from the configured provider
    Fetch {
        /// Destination (defaults to paths.manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Config file path (defaults to ./.strmgen/config.yaml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run {
                manifest,
                output,
                exclusions,
                no_fetch,
                no_notify,
                json,
            } => {
                let options = RunOptions {
                    manifest,
                    output,
                    exclusions,
                    fetch: !no_fetch,
                    notify: !no_notify,
                    json,
                };
                run_library(options).await
            }
            Commands::Groups { manifest, output } => generate_groups(manifest, output).await,
            Commands::Fetch { output } => fetch_manifest(output).await,
            Commands::Init { path } => init_config(path).await,
            Commands::Config => show_config().await,
        }
    }
}

/// Options of the `run` command after flag parsing
#[derive(Debug)]
struct RunOptions {
    manifest: Option<PathBuf>,
    output: Option<PathBuf>,
    exclusions: Option<PathBuf>,
    fetch: bool,
    notify: bool,
    json: bool,
}

/// Materialize the manifest
async fn run_library(options: RunOptions) -> Result<()> {
    let cfg = config::config()?;

    let manifest = options.manifest.unwrap_or_else(|| cfg.manifest.clone());
    let output = options.output.unwrap_or_else(|| cfg.output.clone());
    let exclusions_path = options.exclusions.unwrap_or_else(|| cfg.exclusions.clone());

    if options.fetch && cfg.provider.enabled {
        let provider = PlaylistProvider::from_config(&cfg.provider);
        if let Err(e) = provider.download(&manifest).await {
            warn!(error = %e, "Manifest download failed, using existing manifest");
        }
    }

    if !manifest.exists() {
        anyhow::bail!("Manifest not found: {}", manifest.display());
    }

    let exclusions = ExclusionSet::load(&exclusions_path)?;
    info!(
        groups = exclusions.len(),
        registry = %exclusions_path.display(),
        "Exclusion registry loaded"
    );

    println!("Processing manifest: {}", manifest.display());
    println!("Output: {}", output.display());
    println!();

    let result = tokio::task::spawn_blocking(move || {
        let sanitizer = NameSanitizer::from_config(&cfg.naming);
        let engine = Engine::from_config(cfg, &output, &exclusions, &sanitizer);
        engine.run_file(&manifest)
    })
    .await
    .context("Manifest processing task failed")??;

    let report = result.report();

    match report::write_run_logs(&cfg.logs, &result, Local::now()) {
        Ok(files) => info!(files = files.len(), dir = %cfg.logs.display(), "Run logs written"),
        Err(e) => warn!(error = %e, "Failed to write run logs"),
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report::summary_lines(&report) {
            println!("*** {}", line);
        }

        let failures: Vec<_> = result.failures().collect();
        if !failures.is_empty() {
            println!();
            println!("Failed entries:");
            for failure in failures.iter().take(MAX_LISTED_FAILURES) {
                println!(
                    "  line {:<8} [{}] {}: {}",
                    failure.line, failure.group, failure.name, failure.error
                );
            }
            if failures.len() > MAX_LISTED_FAILURES {
                println!("  ... and {} more", failures.len() - MAX_LISTED_FAILURES);
            }
        }
    }

    if options.notify {
        if let Some(notifier) = DiscordNotifier::from_config(&cfg.notify.discord) {
            if let Err(e) = notifier.notify(&report).await {
                warn!(notifier = notifier.name(), error = %e, "Notification failed");
            }
        }
    }

    Ok(())
}

/// Generate the exclusion registry
async fn generate_groups(manifest: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let manifest = manifest.unwrap_or_else(|| cfg.manifest.clone());
    let output = output.unwrap_or_else(|| cfg.exclusions.clone());

    let file = File::open(&manifest)
        .with_context(|| format!("Failed to open manifest: {}", manifest.display()))?;
    let listing = registry::collect_groups(BufReader::new(file))
        .with_context(|| format!("Failed to read manifest: {}", manifest.display()))?;

    let written = registry::write_registry(&output, &listing)?;

    println!("Scanned {} entries", listing.entries);
    println!("Wrote {} groups to {}", listing.groups.len(), written.path.display());
    if listing.has_empty_group {
        println!("Entries without group are listed as {}", crate::domain::NO_GROUP_SENTINEL);
    }
    if let Some(backup) = written.backup {
        println!("Previous registry saved as {}", backup.display());
    }
    println!();
    println!("Delete the lines of the groups you want in your library.");

    Ok(())
}

/// Download the manifest
async fn fetch_manifest(output: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    if cfg.provider.url.trim().is_empty() {
        anyhow::bail!("No provider configured (set provider.url in the config file)");
    }

    let dest = output.unwrap_or_else(|| cfg.manifest.clone());
    let bytes = PlaylistProvider::from_config(&cfg.provider)
        .download(&dest)
        .await?;

    println!("Downloaded {} bytes to {}", bytes, dest.display());
    Ok(())
}

/// Write the default config file
async fn init_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    let written = config::write_default_config(&path)?;

    println!("Config written to {}", written.path.display());
    if let Some(backup) = written.backup {
        println!("Previous config saved as {}", backup.display());
    }
    Ok(())
}

/// Show resolved configuration
async fn show_config() -> Result<()> {
    let cfg = config::config()?;
    print_config(cfg);
    Ok(())
}

fn print_config(cfg: &ResolvedConfig) {
    use crate::domain::Category;

    println!("════════════════════════════════════════════════════════════");
    println!("  strmgen Configuration");
    println!("════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:        {}", cfg.home.display());
    println!("  Manifest:    {}", cfg.manifest.display());
    println!("  Exclusions:  {}", cfg.exclusions.display());
    println!("  Output:      {}", cfg.output.display());
    println!("  Logs:        {}", cfg.logs.display());
    println!();
    println!("Category directories:");
    for category in Category::ALL {
        println!("  {:<12} {}", category.label(), cfg.category_dir(category).display());
    }
    println!();
    println!("Stripped prefixes:");
    if cfg.naming.strip_prefixes.is_empty() {
        println!("  (none)");
    } else {
        for prefix in &cfg.naming.strip_prefixes {
            println!("  {:?}", prefix);
        }
    }
    println!();
    println!(
        "Provider:      {}",
        if cfg.provider.enabled { cfg.provider.url.as_str() } else { "(disabled)" }
    );
    println!(
        "Discord:       {}",
        if cfg.notify.discord.enabled { "enabled" } else { "disabled" }
    );
}
