use std::fmt;

use jdoc_model::ClassPrototype;
use scraper::{ElementRef, Html};

use crate::decl::{parse_class_header, parse_declaration, Declaration, MemberKind};
use crate::error::PageError;
use crate::lexer::{lex_fragment, Token};

const NAVBAR_MARKER: &str = "navbar_bottom";

/// Member detail sections of a class page, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Fields,
    Constructors,
    Methods,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Fields, Section::Constructors, Section::Methods];

    /// Name of the anchor opening the section.
    pub fn marker(self) -> &'static str {
        match self {
            Section::Fields => "field_detail",
            Section::Constructors => "constructor_detail",
            Section::Methods => "method_detail",
        }
    }

    pub fn member_kind(self) -> MemberKind {
        match self {
            Section::Fields => MemberKind::Field,
            Section::Constructors => MemberKind::Constructor,
            Section::Methods => MemberKind::Method,
        }
    }

    /// Markers that close the section.
    fn stops(self) -> &'static [&'static str] {
        match self {
            Section::Fields => &["constructor_detail", "method_detail", NAVBAR_MARKER],
            Section::Constructors => &["method_detail", NAVBAR_MARKER],
            Section::Methods => &[NAVBAR_MARKER],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Fields => "field",
            Section::Constructors => "constructor",
            Section::Methods => "method",
        })
    }
}

/// Read one class page into a prototype.
///
/// The class heading (`<H2>`) gives the package and simple name; the first
/// definition list after the following `<HR>` gives kind and supertypes. Each
/// member is an `<H3>` followed by a `<PRE>` declaration block inside the
/// section opened by its detail anchor. Any malformed block abandons the page.
pub fn parse_class_page(html: &str) -> Result<ClassPrototype, PageError> {
    let document = Html::parse_document(html);
    let body = body_children(&document);

    let heading_pos = body
        .iter()
        .position(|e| e.value().name() == "h2")
        .ok_or(PageError::MissingHeading)?;
    let (package, name) = read_heading(body[heading_pos]).ok_or(PageError::MissingHeading)?;

    let definition = body[heading_pos..]
        .iter()
        .skip_while(|e| e.value().name() != "hr")
        .find(|e| e.value().name() == "dl")
        .ok_or(PageError::MissingDefinition)?;
    let tokens = lex_definition(*definition, &package).map_err(PageError::Header)?;
    let header = parse_class_header(&tokens, &package).map_err(PageError::Header)?;

    let mut proto = ClassPrototype::new(
        package,
        name,
        header.kind,
        header.parent,
        header.implements,
    );
    for section in Section::ALL {
        for (index, block) in declaration_blocks(&body, section).into_iter().enumerate() {
            let declaration = lex_fragment(block, &proto.package)
                .and_then(|tokens| {
                    parse_declaration(section.member_kind(), &tokens, &proto.package)
                })
                .map_err(|source| PageError::Declaration {
                    section,
                    index,
                    source,
                })?;
            match declaration {
                Declaration::Field(field) => proto.fields.push(field),
                Declaration::Constructor(ctor) => proto.constructors.push(ctor),
                Declaration::Method(method) => proto.methods.push(method),
            }
        }
    }

    tracing::debug!(
        target: "jdoc.javadoc",
        class = %proto.full_name(),
        fields = proto.fields.len(),
        constructors = proto.constructors.len(),
        methods = proto.methods.len(),
        "parsed class page"
    );
    Ok(proto)
}

/// Top-level elements of `<body>`.
pub(crate) fn body_children(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "body")
        .map(|body| body.children().filter_map(ElementRef::wrap).collect())
        .unwrap_or_default()
}

/// Package from the first child element, simple name from the last word of the
/// last child node.
fn read_heading(heading: ElementRef<'_>) -> Option<(String, String)> {
    let package = heading
        .children()
        .filter_map(ElementRef::wrap)
        .next()
        .map(normalized_text)
        .unwrap_or_default();

    let last = heading.children().last()?;
    let last_text = match ElementRef::wrap(last) {
        Some(element) => normalized_text(element),
        None => last.value().as_text().map(|t| t.replace('\u{a0}', " "))?,
    };
    let name = last_text.split_whitespace().last()?.to_string();
    Some((package, name))
}

fn lex_definition(definition: ElementRef<'_>, package: &str) -> crate::Result<Vec<Token>> {
    let terms: Vec<_> = definition
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "dt")
        .collect();
    if terms.is_empty() {
        return lex_fragment(definition, package);
    }

    let mut tokens = Vec::new();
    for term in terms {
        tokens.extend(lex_fragment(term, package)?);
    }
    Ok(tokens)
}

/// `<PRE>` blocks following an `<H3>` within `section`.
fn declaration_blocks<'a>(body: &[ElementRef<'a>], section: Section) -> Vec<ElementRef<'a>> {
    let Some(start) = body.iter().position(|e| is_marker(*e, section.marker())) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut in_member = false;
    for element in &body[start + 1..] {
        if section.stops().iter().any(|marker| is_marker(*element, marker)) {
            break;
        }
        match element.value().name() {
            "h3" => in_member = true,
            "pre" if in_member => {
                blocks.push(*element);
                in_member = false;
            }
            _ => {}
        }
    }
    blocks
}

/// A named anchor, or a paragraph wrapping one.
pub(crate) fn is_marker(element: ElementRef<'_>, name: &str) -> bool {
    match element.value().name() {
        "a" => element.value().attr("name") == Some(name),
        "p" => element
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| is_marker(child, name)),
        _ => false,
    }
}

pub(crate) fn normalized_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}
