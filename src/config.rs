use crate::api::{ArchiveSort, CommentSort, SUBSTACK_BASE_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.ron";
const APP_DIR_NAME: &str = "substack-archive";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the publication, e.g. "https://astralcodexten.substack.com".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub archive_sort: ArchiveSort,
    pub comment_sort: CommentSort,
    /// Where the finished HTML document is written.
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Contents of the page `<title>`.
    #[serde(default = "default_document_title")]
    pub document_title: String,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global level directive ("error", "warn", "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Per-module overrides, e.g. `{"reqwest": "warn"}`.
    pub module_levels: BTreeMap<String, String>,
    /// Write logs to a daily rolling file in this directory instead of stderr.
    pub log_directory: Option<String>,
}

fn default_base_url() -> String {
    SUBSTACK_BASE_URL.to_string()
}

fn default_output_path() -> String {
    "index.html".to_string()
}

fn default_document_title() -> String {
    "Document".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            archive_sort: ArchiveSort::default(),
            comment_sort: CommentSort::default(),
            output_path: default_output_path(),
            document_title: default_document_title(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            module_levels: BTreeMap::new(),
            log_directory: None,
        }
    }
}

impl LoggingConfig {
    /// Build an `EnvFilter` directive string such as `info,reqwest=warn`.
    pub fn filter_directive(&self) -> String {
        let mut filter_str = self.level.clone();
        for (module, level) in &self.module_levels {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

/// Outcome of config discovery.
///
/// Logging is not set up while the config is being read, so problems are
/// collected here and reported once a subscriber exists.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// File the config came from, `None` when defaults are in use.
    pub source: Option<PathBuf>,
    pub errors: Vec<anyhow::Error>,
}

impl LoadedConfig {
    /// Emit what happened during loading through `tracing`.
    pub fn report(&self) {
        for err in &self.errors {
            tracing::error!("{:#}", err);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {}", path.display()),
            None => tracing::info!("No usable config file found, using defaults"),
        }
    }
}

impl AppConfig {
    /// Load the first readable and valid `config.ron`, or fall back to defaults.
    ///
    /// Candidates, in order: the working directory, next to the executable,
    /// and the user config directory.
    pub fn load() -> LoadedConfig {
        Self::load_first(Self::candidates())
    }

    /// Try each existing path in turn; invalid files are skipped and recorded.
    pub fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> LoadedConfig {
        let mut errors = Vec::new();

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path),
                        errors,
                    };
                }
                Err(e) => errors.push(e),
            }
        }

        LoadedConfig {
            config: Self::default(),
            source: None,
            errors,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        ron::from_str::<AppConfig>(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }

        candidates
    }
}
