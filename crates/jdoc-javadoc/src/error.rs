use crate::page::Section;

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Failure to turn one declaration block into a prototype.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no declaration found")]
    Empty,

    #[error("missing `{token}` in declaration `{decl}`")]
    MissingToken { token: &'static str, decl: String },

    #[error("missing name in declaration `{decl}`")]
    MissingName { decl: String },

    #[error("missing type in declaration `{decl}`")]
    MissingType { decl: String },

    #[error("missing argument name after `{ty}` in declaration `{decl}`")]
    MissingArgumentName { ty: String, decl: String },

    #[error("unresolvable reference {href:?} from package `{package}`")]
    UnresolvableReference { package: String, href: String },

    #[error("invalid type `{0}`")]
    InvalidType(String),
}

/// Failure to read a class page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page has no class heading")]
    MissingHeading,

    #[error("page has no class definition after its heading")]
    MissingDefinition,

    #[error("malformed class header: {0}")]
    Header(#[source] ParseError),

    #[error("malformed {section} declaration #{index}: {source}")]
    Declaration {
        section: Section,
        index: usize,
        #[source]
        source: ParseError,
    },
}

/// Failure to read an "all constants" page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstantTableError {
    #[error("constants of {class}: row {row} has {cells} cells, expected 3")]
    MalformedRow {
        class: String,
        row: usize,
        cells: usize,
    },
}
