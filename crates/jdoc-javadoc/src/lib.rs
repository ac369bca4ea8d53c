//! Readers for rendered javadoc HTML.
//!
//! A class page is read in three steps: the declaration blocks are lexed into
//! [`Token`]s (hyperlinks are resolved to fully qualified names on the way), the
//! token sequences are parsed into prototypes by [`parse_declaration`], and [`parse_class_page`]
//! assembles them into one [`jdoc_model::ClassPrototype`]. The "all constants"
//! page is read separately by [`ConstantTable::parse`].

#![forbid(unsafe_code)]

mod constants;
mod decl;
mod error;
mod lexer;
mod page;
mod resolve;

pub use crate::constants::ConstantTable;
pub use crate::decl::{
    parse_class_header, parse_constructor, parse_declaration, parse_field, parse_method,
    parse_modifiers, ClassHeader, Declaration, MemberKind,
};
pub use crate::error::{ConstantTableError, PageError, ParseError, Result};
pub use crate::lexer::{lex_fragment, tokenize_text, Token};
pub use crate::page::{parse_class_page, Section};
pub use crate::resolve::{qualify, resolve_href};
