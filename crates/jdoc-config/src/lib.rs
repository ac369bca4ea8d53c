//! Configuration for the extractor, loaded from TOML, plus `tracing` setup.

#![forbid(unsafe_code)]

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, Once};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod validation;

pub use validation::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JdocConfig {
    /// Documentation roots, folded in this order.
    #[serde(default)]
    pub doc_roots: Vec<PathBuf>,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Which files under a documentation root are class pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Top-level directories under a root that are never read.
    #[serde(default = "SelectionConfig::default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// A page whose root-relative path contains any of these is skipped.
    #[serde(default = "SelectionConfig::default_skip_path_fragments")]
    pub skip_path_fragments: Vec<String>,

    /// File names that are never class pages.
    #[serde(default = "SelectionConfig::default_skip_file_names")]
    pub skip_file_names: Vec<String>,
}

impl SelectionConfig {
    fn default_skip_dirs() -> Vec<String> {
        vec!["resources".to_owned()]
    }

    fn default_skip_path_fragments() -> Vec<String> {
        ["class-use/", "doc-files/", "index-files/"]
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn default_skip_file_names() -> Vec<String> {
        [
            "package-use.html",
            "package-tree.html",
            "package-frame.html",
            "package-summary.html",
            "copyright-notice.html",
            "copyright.html",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect()
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            skip_dirs: Self::default_skip_dirs(),
            skip_path_fragments: Self::default_skip_path_fragments(),
            skip_file_names: Self::default_skip_file_names(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// File name of the per-root constants page.
    #[serde(default = "ExtractionConfig::default_constants_file")]
    pub constants_file: String,

    /// Parser threads; `0` uses the rayon default.
    #[serde(default)]
    pub threads: usize,
}

impl ExtractionConfig {
    fn default_constants_file() -> String {
        "constant-values.html".to_owned()
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            constants_file: Self::default_constants_file(),
            threads: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to this file as well. If it cannot be opened, file logging is
    /// disabled and the other sinks stay active.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// Map `level` to `EnvFilter` directives.
    pub(crate) fn normalize_level_directives(input: &str) -> String {
        const LEVELS: [(&str, &str); 6] = [
            ("trace", "trace"),
            ("debug", "debug"),
            ("info", "info"),
            ("warn", "warn"),
            ("warning", "warn"),
            ("error", "error"),
        ];

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        let lowered = trimmed.to_ascii_lowercase();
        // Simple levels are forgiving about casing and synonyms; anything else is
        // passed through as a directive string such as `jdoc.merge=trace`.
        LEVELS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, level)| (*level).to_owned())
            .unwrap_or_else(|| trimmed.to_owned())
    }

    fn config_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(Self::normalize_level_directives(&self.level))
            .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }

    /// The effective filter for a run.
    ///
    /// `RUST_LOG` directives are appended to the configured ones, so they win for
    /// the targets they name. If the combination does not parse, `RUST_LOG` alone
    /// is tried, then the configured level alone.
    pub fn env_filter(&self) -> EnvFilter {
        let Some(env_directives) = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
        else {
            return self.config_env_filter();
        };

        let config_directives = Self::normalize_level_directives(&self.level);
        [format!("{config_directives},{env_directives}"), env_directives]
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| self.config_env_filter())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The full registry as JSON.
    #[default]
    Json,
    /// Body-free declarations of every class and its members.
    Summary,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(format!("unknown output format `{other}` (expected json or summary)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Write here instead of stdout.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_owned())
    }
}

impl JdocConfig {
    /// Parse a TOML document. Relative paths are kept as written.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file. Relative `doc_roots` are resolved against the
    /// directory containing the file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::load_from_str(&text)?;
        if let Some(base) = path.parent() {
            for root in &mut config.doc_roots {
                if root.is_relative() {
                    *root = base.join(&*root);
                }
            }
        }
        Ok(config)
    }
}

/// The `[logging] file` sink. Every event locks the file for the length of one
/// formatted record, so lines from parser threads never interleave.
struct LogFile(Arc<Mutex<std::fs::File>>);

impl LogFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self(Arc::new(Mutex::new(file))))
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A poisoned lock still guards a valid file handle.
        LogFileGuard(self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

struct LogFileGuard<'a>(MutexGuard<'a, std::fs::File>);

impl Write for LogFileGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config
            .file
            .as_deref()
            .and_then(|path| LogFile::open(path).ok());
        let file_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            make_writer = BoxMakeWriter::new(make_writer.and(io::stderr));
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(file));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "jdoc.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
