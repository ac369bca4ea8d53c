use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use jdoc_config::SelectionConfig;
use walkdir::{DirEntry, WalkDir};

use crate::error::FatalError;

/// Class pages and constants page of one documentation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    pub root: PathBuf,
    /// Candidate class pages, sorted.
    pub pages: Vec<PathBuf>,
    pub constants: Option<PathBuf>,
}

/// Select the class pages under `root`.
///
/// Only `.html` files inside a top-level directory count (files directly under
/// the root are indexes and frames). Top-level directories in `skip_dirs`, paths
/// containing a `skip_path_fragments` entry, and `skip_file_names` are left out.
pub fn collect_documents(
    root: &Path,
    selection: &SelectionConfig,
    constants_file: &str,
) -> Result<DocumentSet, FatalError> {
    if !root.is_dir() {
        return Err(FatalError::MissingRoot(root.to_path_buf()));
    }

    let skipped_dir = |entry: &DirEntry| {
        entry.depth() == 1
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| selection.skip_dirs.iter().any(|skip| skip == name))
    };

    let mut pages = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !skipped_dir(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(
                    target: "jdoc.extract",
                    root = %root.display(),
                    error = %err,
                    "skipping unreadable entry"
                );
                continue;
            }
        };
        if entry.depth() < 2
            || !entry.file_type().is_file()
            || entry.path().extension() != Some(OsStr::new("html"))
        {
            continue;
        }
        if is_skipped(root, entry.path(), selection) {
            continue;
        }
        pages.push(entry.into_path());
    }
    pages.sort();

    let constants = Some(root.join(constants_file)).filter(|path| path.is_file());
    tracing::debug!(
        target: "jdoc.extract",
        root = %root.display(),
        pages = pages.len(),
        constants = constants.is_some(),
        "collected documents"
    );

    Ok(DocumentSet {
        root: root.to_path_buf(),
        pages,
        constants,
    })
}

fn is_skipped(root: &Path, path: &Path, selection: &SelectionConfig) -> bool {
    let file_name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
    if selection.skip_file_names.iter().any(|skip| skip == file_name) {
        return true;
    }

    // Fragments are written with `/` whatever the platform.
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    selection
        .skip_path_fragments
        .iter()
        .any(|fragment| relative.contains(fragment.as_str()))
}
