//! The extraction pipeline.
//!
//! [`Extractor::run`] walks every documentation root, parses class pages in
//! parallel, applies each root's constants page, folds all models of one class
//! in document order and finally checks identity uniqueness. Per-document and
//! per-merge failures are [`ContinuableError`]s collected in the
//! [`ExtractReport`]; only a [`FatalError`] stops the run.

#![forbid(unsafe_code)]

mod collect;
mod error;
mod extract;
mod output;
mod report;

pub use crate::collect::{collect_documents, DocumentSet};
pub use crate::error::{ContinuableError, FatalError};
pub use crate::extract::{parse_document, Extraction, Extractor};
pub use crate::output::{output_for, JsonOutput, ModelOutput, SummaryOutput};
pub use crate::report::{Diagnostic, ExtractReport, Severity};
