use std::collections::BTreeMap;

use scraper::{ElementRef, Html};
use serde::Serialize;

use crate::error::ConstantTableError;
use crate::page::{body_children, is_marker, normalized_text};

/// Width of a constants table: declaration, name, value.
const TABLE_WIDTH: usize = 3;

/// Literal values read from an "all constants" page, keyed by fully qualified
/// class name and then by constant name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConstantTable {
    classes: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConstantTable {
    /// Parse a constants page.
    ///
    /// Only top-level tables between the first `<HR>` and the bottom navigation bar
    /// are read. A table qualifies when its first row is a single `<TD>` spanning
    /// all three columns; that cell holds the class name and every following row
    /// is a (declaration, name, value) triple.
    pub fn parse(html: &str) -> Result<Self, ConstantTableError> {
        let document = Html::parse_document(html);
        let body = body_children(&document);
        let tables = body
            .iter()
            .skip_while(|e| e.value().name() != "hr")
            .take_while(|e| !is_marker(**e, "navbar_bottom"))
            .filter(|e| e.value().name() == "table");

        let mut classes: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for table in tables {
            let rows: Vec<_> = table
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "tr")
                .collect();
            let Some((header, data)) = rows.split_first() else {
                continue;
            };
            if data.is_empty() {
                continue;
            }
            let Some(class) = class_heading(*header) else {
                continue;
            };

            let values = classes.entry(class.clone()).or_default();
            for (idx, row) in data.iter().enumerate() {
                let cells = cells(*row);
                let [_, name, value] = cells.as_slice() else {
                    return Err(ConstantTableError::MalformedRow {
                        class,
                        row: idx + 1,
                        cells: cells.len(),
                    });
                };
                values.insert(normalized_text(*name), normalized_text(*value));
            }
        }

        tracing::debug!(
            target: "jdoc.javadoc",
            classes = classes.len(),
            "parsed constants page"
        );
        Ok(Self { classes })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Constant values of one class.
    pub fn get(&self, class: &str) -> Option<&BTreeMap<String, String>> {
        self.classes.get(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.classes.iter().map(|(class, values)| (class.as_str(), values))
    }
}

fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

fn class_heading(row: ElementRef<'_>) -> Option<String> {
    let cells = cells(row);
    let [cell] = cells.as_slice() else {
        return None;
    };
    let span = cell
        .value()
        .attr("colspan")
        .and_then(|span| span.trim().parse::<usize>().ok());
    if cell.value().name() != "td" || span != Some(TABLE_WIDTH) {
        return None;
    }
    let class = normalized_text(*cell);
    (!class.is_empty()).then_some(class)
}
