use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use jdoc_config::JdocConfig;
use jdoc_javadoc::{parse_class_page, ConstantTable};
use jdoc_model::{fold_models, ClassModel, ClassRegistry};
use rayon::prelude::*;

use crate::collect::{collect_documents, DocumentSet};
use crate::error::{ContinuableError, FatalError};
use crate::report::ExtractReport;

/// Output of a successful run.
#[derive(Debug)]
pub struct Extraction {
    pub registry: ClassRegistry,
    pub report: ExtractReport,
}

/// Runs the pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: JdocConfig,
}

/// Read and parse one class page into a frozen model.
pub fn parse_document(path: &Path) -> Result<ClassModel, ContinuableError> {
    let bytes = std::fs::read(path).map_err(|source| ContinuableError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let html = String::from_utf8_lossy(&bytes);
    let proto = parse_class_page(&html).map_err(|source| ContinuableError::Page {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        target: "jdoc.extract",
        path = %path.display(),
        class = %proto.full_name(),
        "parsed class page"
    );
    Ok(proto.freeze(Some(path.to_path_buf())))
}

impl Extractor {
    pub fn new(config: JdocConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JdocConfig {
        &self.config
    }

    /// Run every stage. Continuable failures end up in the report; a
    /// [`FatalError`] means no registry is produced.
    pub fn run(&self) -> Result<Extraction, FatalError> {
        let sets = self
            .config
            .doc_roots
            .iter()
            .map(|root| {
                collect_documents(
                    root,
                    &self.config.selection,
                    &self.config.extraction.constants_file,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.extraction.threads)
            .thread_name(|idx| format!("jdoc-parse-{idx}"))
            .build()?;

        let mut report = ExtractReport {
            roots: sets.len(),
            ..ExtractReport::default()
        };
        let models = pool.install(|| {
            let mut models = Vec::new();
            for set in &sets {
                models.extend(read_root(set, &mut report));
            }
            models
        });

        // Every model of one class goes to the same fold, in document order.
        let mut groups: BTreeMap<String, Vec<ClassModel>> = BTreeMap::new();
        for model in models {
            groups.entry(model.full_name()).or_default().push(model);
        }
        let folded: Vec<_> = pool.install(|| {
            groups
                .into_par_iter()
                .map(|(name, models)| (name, fold_models(models)))
                .collect()
        });

        let mut registry = ClassRegistry::new();
        for (name, outcome) in folded {
            report.merges += outcome.merges;
            for conflict in outcome.conflicts {
                report.record(&ContinuableError::Merge(conflict));
            }
            match outcome.model {
                Some(model) => {
                    registry.insert(model);
                }
                None => tracing::warn!(target: "jdoc.extract", class = %name, "no model survived"),
            }
        }
        report.classes = registry.len();

        registry.check_identities()?;

        tracing::info!(
            target: "jdoc.extract",
            classes = report.classes,
            documents = report.documents_parsed,
            failed = report.documents_failed,
            merges = report.merges,
            conflicts = report.merge_conflicts,
            "extraction finished"
        );
        Ok(Extraction { registry, report })
    }
}

/// Parse the pages of one root in parallel and apply its constants page.
/// Models come back in page order.
fn read_root(set: &DocumentSet, report: &mut ExtractReport) -> Vec<ClassModel> {
    let table = set.constants.as_deref().and_then(|path| load_constants(path, report));

    let results: Vec<_> = set
        .pages
        .par_iter()
        .map(|path| parse_document(path))
        .collect();
    report.documents_seen += results.len();

    let mut models = Vec::with_capacity(results.len());
    let mut produced = BTreeSet::new();
    for result in results {
        let mut model = match result {
            Ok(model) => model,
            Err(err) => {
                report.record(&err);
                continue;
            }
        };
        report.documents_parsed += 1;

        let name = model.full_name();
        if let (Some(table), Some(path)) = (&table, &set.constants) {
            if let Some(values) = table.get(&name) {
                if let Err(source) = model.fill_constants(values) {
                    report.record(&ContinuableError::Constants {
                        constants: path.clone(),
                        page: model.sources().first().cloned().unwrap_or_default(),
                        source,
                    });
                }
            }
        }
        produced.insert(name);
        models.push(model);
    }

    if let (Some(table), Some(path)) = (&table, &set.constants) {
        for (class, _) in table.iter().filter(|(class, _)| !produced.contains(*class)) {
            report.warn(format!(
                "constants page {} lists {class}, but no page under {} describes it",
                path.display(),
                set.root.display()
            ));
        }
    }
    models
}

fn load_constants(path: &Path, report: &mut ExtractReport) -> Option<ConstantTable> {
    let html = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(source) => {
            report.record(&ContinuableError::Read {
                path: path.to_path_buf(),
                source,
            });
            return None;
        }
    };
    match ConstantTable::parse(&html) {
        Ok(table) => Some(table),
        Err(source) => {
            report.record(&ContinuableError::ConstantTable {
                path: path.to_path_buf(),
                source,
            });
            None
        }
    }
}
