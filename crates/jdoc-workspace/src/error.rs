use std::io;
use std::path::PathBuf;

use jdoc_javadoc::{ConstantTableError, PageError};
use jdoc_model::{IdentityCollision, MergeConflict, ModelError};

/// A failure confined to one document, constants page or class. Logged and
/// recorded; the run goes on.
#[derive(Debug, thiserror::Error)]
pub enum ContinuableError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("skipped {}: {source}", path.display())]
    Page {
        path: PathBuf,
        #[source]
        source: PageError,
    },

    #[error("ignored constants page {}: {source}", path.display())]
    ConstantTable {
        path: PathBuf,
        #[source]
        source: ConstantTableError,
    },

    #[error("constants page {} disagrees with {}: {source}", constants.display(), page.display())]
    Constants {
        constants: PathBuf,
        page: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("merge conflict: {0}")]
    Merge(#[from] MergeConflict),
}

/// A failure that aborts the run before any output sees the registry.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("documentation root {} is not a directory", .0.display())]
    MissingRoot(PathBuf),

    #[error("failed to start parser threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    IdentityCollision(#[from] IdentityCollision),
}
