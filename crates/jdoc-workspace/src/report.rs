use std::fmt;

use serde::Serialize;

use crate::error::ContinuableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Counters and diagnostics of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    pub roots: usize,
    pub documents_seen: usize,
    pub documents_parsed: usize,
    pub documents_failed: usize,
    pub classes: usize,
    pub merges: usize,
    pub merge_conflicts: usize,
    pub constant_mismatches: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractReport {
    /// `true` when any continuable error was recorded. Warnings do not count.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }

    pub(crate) fn record(&mut self, err: &ContinuableError) {
        match err {
            ContinuableError::Read { .. } | ContinuableError::Page { .. } => {
                self.documents_failed += 1;
                tracing::warn!(target: "jdoc.extract", "{err}");
            }
            ContinuableError::Constants { .. } => {
                self.constant_mismatches += 1;
                tracing::error!(target: "jdoc.extract", "{err}");
            }
            ContinuableError::Merge(_) => {
                self.merge_conflicts += 1;
                tracing::error!(target: "jdoc.merge", "{err}");
            }
            ContinuableError::ConstantTable { .. } => {
                tracing::error!(target: "jdoc.extract", "{err}");
            }
        }
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message: err.to_string(),
        });
    }

    pub(crate) fn warn(&mut self, message: String) {
        tracing::warn!(target: "jdoc.extract", "{message}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }
}

impl fmt::Display for ExtractReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} classes from {} documents in {} roots ({} failed)",
            self.classes, self.documents_parsed, self.roots, self.documents_failed
        )?;
        writeln!(
            f,
            "{} merges, {} merge conflicts, {} constant mismatches",
            self.merges, self.merge_conflicts, self.constant_mismatches
        )?;
        for diagnostic in &self.diagnostics {
            let label = match diagnostic.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            writeln!(f, "{label}: {}", diagnostic.message)?;
        }
        Ok(())
    }
}
