use std::fmt;

use crate::{JdocConfig, LoggingConfig};

/// A setting that makes a run impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    NoDocRoots,
    EmptyConstantsFile,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValidationError::NoDocRoots => f.write_str("no documentation roots configured"),
            ConfigValidationError::EmptyConstantsFile => {
                f.write_str("extraction.constants_file must not be empty")
            }
        }
    }
}

/// A setting that is accepted but probably not what was meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    LoggingLevelInvalid { value: String },
    DuplicateDocRoot { root: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::LoggingLevelInvalid { value } => {
                write!(f, "logging.level {value:?} is not a valid filter; using info")
            }
            ConfigWarning::DuplicateDocRoot { root } => {
                write!(f, "documentation root {root} is listed more than once")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationDiagnostics {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigWarning>,
}

impl ValidationDiagnostics {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl JdocConfig {
    /// Check semantic invariants. Reports every problem found in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();
        validate_roots(self, &mut out);
        validate_extraction(self, &mut out);
        validate_logging(self, &mut out);
        out
    }
}

fn validate_roots(config: &JdocConfig, out: &mut ValidationDiagnostics) {
    if config.doc_roots.is_empty() {
        out.errors.push(ConfigValidationError::NoDocRoots);
    }
    for (idx, root) in config.doc_roots.iter().enumerate() {
        if config.doc_roots[..idx].contains(root) {
            out.warnings.push(ConfigWarning::DuplicateDocRoot {
                root: root.display().to_string(),
            });
        }
    }
}

fn validate_extraction(config: &JdocConfig, out: &mut ValidationDiagnostics) {
    if config.extraction.constants_file.trim().is_empty() {
        out.errors.push(ConfigValidationError::EmptyConstantsFile);
    }
}

fn validate_logging(config: &JdocConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if tracing_subscriber::EnvFilter::try_new(normalized).is_err() {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
        });
    }
}
