//! Configuration loading for the batch converter.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so a bare checkout can still run against the default
//! source layout.

use crate::segmenter::{ContinuationMode, DEFAULT_CHAPTER_KEYWORDS};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Top-level configuration; deserializable from TOML.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub segmenter: SegmenterConfig,
    pub books: BooksConfig,
    pub logging: LoggingConfig,
}

/// Where the rich-text sources live and how to read them.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub dir: String,
    pub extension: String,
    /// Label of the legacy single-byte encoding the sources are stored in.
    pub encoding: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: "bible".to_string(),
            extension: "rtf".to_string(),
            encoding: "latin1".to_string(),
        }
    }
}

/// Where the per-book JSON files are written.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    /// When false, documents whose output file already exists are skipped.
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "bible_json".to_string(),
            overwrite: true,
        }
    }
}

/// Tunables for the chapter/verse scan.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub chapter_keywords: Vec<String>,
    pub continuation_lines: ContinuationMode,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chapter_keywords: DEFAULT_CHAPTER_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            continuation_lines: ContinuationMode::default(),
        }
    }
}

impl SegmenterConfig {
    /// Keywords trimmed of stray whitespace, with empty entries removed. An
    /// all-empty list falls back to the built-in defaults.
    pub fn sanitized_keywords(&self) -> Vec<String> {
        let mut out = Vec::new();
        for keyword in &self.chapter_keywords {
            let trimmed = keyword.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !out.iter().any(|existing| existing == trimmed) {
                out.push(trimmed.to_string());
            }
        }
        if out.is_empty() {
            DEFAULT_CHAPTER_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect()
        } else {
            out
        }
    }
}

/// Policy for source filenames with no book-code mapping.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BooksConfig {
    /// When true, an unmapped filename aborts the batch instead of being
    /// skipped with a warning.
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: LogLevel,
}

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> BatchConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return BatchConfig::default();
        }
    };

    match toml::from_str::<BatchConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            BatchConfig::default()
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
