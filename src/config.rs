//! Configuration for strmgen.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (STRMGEN_HOME, STRMGEN_OUTPUT, STRMGEN_MANIFEST,
//!    STRMGEN_EXCLUSIONS)
//! 2. Config file (.strmgen/config.yaml)
//! 3. Defaults (~/.strmgen)
//!
//! Config file discovery:
//! - Searches current directory and parents for .strmgen/config.yaml
//! - Paths in config file are relative to the project root (parent of .strmgen/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::resolver::OTHERS_DIR;
use crate::domain::Category;
use crate::registry::{write_with_backup, WriteReport};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Directory holding the config file
pub const CONFIG_DIR: &str = ".strmgen";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "playlist.m3u";

/// Default exclusion registry file name
pub const DEFAULT_EXCLUSIONS: &str = "unwantedgroup.cfg";

/// Config file written by `strmgen init`
pub const DEFAULT_CONFIG: &str = r#"version: "1.0"

paths:
  # Root of the generated .strm tree
  output: ./library
  # Manifest read by `run` and `groups` (and written by `fetch`)
  manifest: ./playlist.m3u
  # Exclusion registry; generate it with `strmgen groups`
  exclusions: ./unwantedgroup.cfg
  # Where per-run result logs are written
  logs: ./logs

categories:
  movies: FILMS
  series: SERIE
  channels: TV

naming:
  strip_prefixes:
    - "FR - "
    - "UK - "
    - "DE - "
    - "ES - "

provider:
  enabled: false
  url: "http://provider.example"
  port: ":8080"
  username: ""
  password: ""

notify:
  discord:
    enabled: false
    webhook_url: ""
"#;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub categories: CategoryDirs,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Output root (relative to project root)
    pub output: Option<String>,
    /// Manifest file (relative to project root)
    pub manifest: Option<String>,
    /// Exclusion registry (relative to project root)
    pub exclusions: Option<String>,
    /// Run log directory (relative to project root)
    pub logs: Option<String>,
}

/// Directory names of the fixed category trees under the output root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDirs {
    pub movies: String,
    pub series: String,
    pub channels: String,
}

impl Default for CategoryDirs {
    fn default() -> Self {
        Self {
            movies: "FILMS".to_string(),
            series: "SERIE".to_string(),
            channels: "TV".to_string(),
        }
    }
}

impl CategoryDirs {
    /// Top-level directory name of a category
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Movie => &self.movies,
            Category::Series => &self.series,
            Category::Channel => &self.channels,
            Category::Other => OTHERS_DIR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Region prefixes deleted from every name
    pub strip_prefixes: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_prefixes: ["FR - ", "UK - ", "DE - ", "ES - "]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Manifest download settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub url: String,
    /// Appended verbatim to the URL (e.g. ":8080")
    pub port: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub webhook_url: String,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Absolute path to strmgen home
    pub home: PathBuf,
    /// Root of the generated tree
    pub output: PathBuf,
    /// Manifest file
    pub manifest: PathBuf,
    /// Exclusion registry
    pub exclusions: PathBuf,
    /// Run log directory
    pub logs: PathBuf,
    pub categories: CategoryDirs,
    pub naming: NamingConfig,
    pub provider: ProviderConfig,
    pub notify: NotifyConfig,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Configuration with every path under `home` and default settings
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            output: home.join("library"),
            manifest: home.join(DEFAULT_MANIFEST),
            exclusions: home.join(DEFAULT_EXCLUSIONS),
            logs: home.join("logs"),
            home,
            categories: CategoryDirs::default(),
            naming: NamingConfig::default(),
            provider: ProviderConfig::default(),
            notify: NotifyConfig::default(),
            config_file: None,
        }
    }

    /// Directory of a category tree under the output root
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.output.join(self.categories.get(category))
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge defaults, an optional config file and environment overrides
fn resolve(
    default_home: PathBuf,
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let home = env("STRMGEN_HOME")
        .map(PathBuf::from)
        .unwrap_or(default_home);
    let mut resolved = ResolvedConfig::with_home(home);

    if let Some((config_path, config)) = file {
        // Base directory is the parent of .strmgen/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let paths = &config.paths;
        if let Some(ref output) = paths.output {
            resolved.output = resolve_path(&base_dir, output);
        }
        if let Some(ref manifest) = paths.manifest {
            resolved.manifest = resolve_path(&base_dir, manifest);
        }
        if let Some(ref exclusions) = paths.exclusions {
            resolved.exclusions = resolve_path(&base_dir, exclusions);
        }
        if let Some(ref logs) = paths.logs {
            resolved.logs = resolve_path(&base_dir, logs);
        }

        resolved.categories = config.categories;
        resolved.naming = config.naming;
        resolved.provider = config.provider;
        resolved.notify = config.notify;
        resolved.config_file = Some(config_path);
    }

    if let Some(output) = env("STRMGEN_OUTPUT") {
        resolved.output = PathBuf::from(output);
    }
    if let Some(manifest) = env("STRMGEN_MANIFEST") {
        resolved.manifest = PathBuf::from(manifest);
    }
    if let Some(exclusions) = env("STRMGEN_EXCLUSIONS") {
        resolved.exclusions = PathBuf::from(exclusions);
    }

    resolved
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(default_home, file, |key| std::env::var(key).ok()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (bypasses the cache)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Default location for `strmgen init`: ./.strmgen/config.yaml
pub fn default_config_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()
        .context("Failed to determine current directory")?
        .join(CONFIG_DIR)
        .join(CONFIG_FILE))
}

/// Write the default config file, moving an existing one to `config.yaml.old`
pub fn write_default_config(path: &Path) -> Result<WriteReport> {
    write_with_backup(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}
