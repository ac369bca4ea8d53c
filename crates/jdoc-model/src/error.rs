use std::path::PathBuf;

use crate::types::{ClassKind, TypeRef};

pub type Result<T, E = ModelError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid type reference: {0:?}")]
    InvalidTypeRef(String),

    /// The constants table lists members the model does not have.
    #[error("constant table names members missing from {class}: {}", names.join(", "))]
    UnknownConstants { class: String, names: Vec<String> },
}

/// A structural incompatibility between two models of the same class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("attempt to merge {left} with differently named {right}")]
    NameMismatch { left: String, right: String },

    #[error("attempt to merge interface with class for {class} ({left:?} vs {right:?})")]
    InterfaceWithClass {
        class: String,
        left: ClassKind,
        right: ClassKind,
    },

    #[error("attempt to merge abstract class with non-abstract class for {class} ({left:?} vs {right:?})")]
    AbstractWithConcrete {
        class: String,
        left: ClassKind,
        right: ClassKind,
    },

    #[error("attempt to merge {class} with different parents: {left} and {right}")]
    ParentConflict {
        class: String,
        left: TypeRef,
        right: TypeRef,
    },
}

impl MergeError {
    pub fn class_name(&self) -> &str {
        match self {
            MergeError::NameMismatch { left, .. } => left,
            MergeError::InterfaceWithClass { class, .. }
            | MergeError::AbstractWithConcrete { class, .. }
            | MergeError::ParentConflict { class, .. } => class,
        }
    }
}

/// A [`MergeError`] raised while folding, with the pages behind each side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error} (kept {}; rejected {})", display_sources(.kept_sources), display_sources(.rejected_sources))]
pub struct MergeConflict {
    pub error: MergeError,
    /// Sources of the model accumulated so far, which is kept.
    pub kept_sources: Vec<PathBuf>,
    /// Sources of the model that could not be merged into it.
    pub rejected_sources: Vec<PathBuf>,
}

fn display_sources(sources: &[PathBuf]) -> String {
    if sources.is_empty() {
        return "<unknown source>".to_string();
    }
    sources
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
