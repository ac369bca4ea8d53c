//! Token sequences to prototypes.
//!
//! Every parser takes the tokens of one declaration block plus the package of the
//! page it came from; bare type names are qualified with that package.

use jdoc_model::{
    is_primitive, Argument, ClassKind, ConstructorPrototype, FieldPrototype, MemberAccess,
    MemberFlags, MethodPrototype, TypeRef,
};

use crate::error::{ParseError, Result};
use crate::lexer::Token;
use crate::resolve::qualify;

/// Modifiers and declaration keywords. None of them can name a type or a member.
const RESERVED: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "default",
    "class",
    "interface",
    "enum",
    "extends",
    "implements",
    "throws",
    "package",
    "import",
    "new",
    "null",
    "true",
    "false",
    "this",
    "super",
];

/// Which section of a page a declaration block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Constructor,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Field(FieldPrototype),
    Constructor(ConstructorPrototype),
    Method(MethodPrototype),
}

/// Supertypes and kind read from a class definition block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub kind: ClassKind,
    /// Name following the `class`/`interface` keyword, if present.
    pub name: Option<String>,
    /// `None` for interfaces and for classes extending the root type.
    pub parent: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
}

pub fn parse_declaration(kind: MemberKind, tokens: &[Token], package: &str) -> Result<Declaration> {
    match kind {
        MemberKind::Field => parse_field(tokens, package).map(Declaration::Field),
        MemberKind::Constructor => parse_constructor(tokens, package).map(Declaration::Constructor),
        MemberKind::Method => parse_method(tokens, package).map(Declaration::Method),
    }
}

/// Parse `modifiers* class|interface Name (extends T, ...)? (implements T, ...)?`.
pub fn parse_class_header(tokens: &[Token], package: &str) -> Result<ClassHeader> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let extends = tokens.iter().position(|t| t.is("extends"));
    let implements = tokens.iter().position(|t| t.is("implements"));
    let head_end = [extends, implements]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(tokens.len());
    let head = &tokens[..head_end];

    let kind = if head.iter().any(|t| t.is("interface")) {
        ClassKind::Interface
    } else if head.iter().any(|t| t.is("final")) {
        ClassKind::Final
    } else if head.iter().any(|t| t.is("abstract")) {
        ClassKind::Abstract
    } else {
        ClassKind::Regular
    };
    let name = head
        .iter()
        .position(|t| t.is("class") || t.is("interface"))
        .and_then(|idx| head.get(idx + 1))
        .filter(|t| is_name(t))
        .map(|t| t.as_str().to_string());

    let segment = |start: Option<usize>, other: Option<usize>| -> Result<Vec<TypeRef>> {
        let Some(start) = start else {
            return Ok(Vec::new());
        };
        let end = other.filter(|&o| o > start).unwrap_or(tokens.len());
        type_list(&tokens[start + 1..end], package)
    };
    let mut supertypes = segment(extends, implements)?;
    let mut interfaces = segment(implements, extends)?;

    let parent = if kind.is_interface() {
        supertypes.append(&mut interfaces);
        interfaces = supertypes;
        None
    } else {
        if supertypes.len() > 1 {
            return Err(ParseError::InvalidType(render(tokens)));
        }
        supertypes.pop().filter(|parent| !parent.is_root())
    };

    Ok(ClassHeader {
        kind,
        name,
        parent,
        implements: interfaces,
    })
}

/// Parse `modifiers* Type[]* name (= literal)?`.
pub fn parse_field(tokens: &[Token], package: &str) -> Result<FieldPrototype> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let (decl, value) = match tokens.iter().position(|t| t.is("=")) {
        Some(eq) => (
            &tokens[..eq],
            tokens.get(eq + 1).map(|t| t.as_str().to_string()),
        ),
        None => (tokens, None),
    };

    let (name, rest) = decl
        .split_last()
        .filter(|(name, _)| is_name(name))
        .ok_or_else(|| ParseError::MissingName {
            decl: render(tokens),
        })?;
    let base = rest
        .iter()
        .rposition(|t| !t.is_brackets())
        .ok_or_else(|| ParseError::MissingType {
            decl: render(tokens),
        })?;
    let ty = type_ref(package, &rest[base], &rest[base + 1..])?;
    let (access, flags) = parse_modifiers(&rest[..base]);

    Ok(FieldPrototype {
        access,
        flags,
        name: name.as_str().to_string(),
        ty,
        value,
    })
}

/// Parse `modifiers* Name ( args ) (throws T, ...)?`.
pub fn parse_constructor(tokens: &[Token], package: &str) -> Result<ConstructorPrototype> {
    let open = open_paren(tokens)?;
    if open == 0 || !is_name(&tokens[open - 1]) {
        return Err(ParseError::MissingName {
            decl: render(tokens),
        });
    }

    let (access, _) = parse_modifiers(&tokens[..open - 1]);
    let (arguments, throws) = parse_arguments_and_throws(tokens, open, package)?;
    Ok(ConstructorPrototype {
        access,
        arguments,
        throws,
    })
}

/// Parse `modifiers* ReturnType[]* name ( args ) (throws T, ...)?`.
pub fn parse_method(tokens: &[Token], package: &str) -> Result<MethodPrototype> {
    let open = open_paren(tokens)?;
    if open == 0 || !is_name(&tokens[open - 1]) {
        return Err(ParseError::MissingName {
            decl: render(tokens),
        });
    }
    let name = tokens[open - 1].as_str().to_string();

    let return_end = open - 1;
    let base = tokens[..return_end]
        .iter()
        .rposition(|t| !t.is_brackets())
        .ok_or_else(|| ParseError::MissingType {
            decl: render(tokens),
        })?;
    let return_type = type_ref(package, &tokens[base], &tokens[base + 1..return_end])?;
    let (access, flags) = parse_modifiers(&tokens[..base]);
    let (arguments, throws) = parse_arguments_and_throws(tokens, open, package)?;

    Ok(MethodPrototype {
        access,
        flags,
        name,
        return_type,
        arguments,
        throws,
    })
}

/// Read access and flags from modifier tokens. The first access keyword wins;
/// flag keywords accumulate. Unknown modifiers (`synchronized`, `native`, ...)
/// are ignored.
pub fn parse_modifiers(tokens: &[Token]) -> (MemberAccess, MemberFlags) {
    let mut access = None;
    let mut flags = MemberFlags::NONE;
    for token in tokens {
        let Token::Word(word) = token else {
            continue;
        };
        if let Some(keyword) = MemberAccess::from_keyword(word) {
            access.get_or_insert(keyword);
        } else if let Some(flag) = MemberFlags::from_keyword(word) {
            flags |= flag;
        }
    }
    (access.unwrap_or_default(), flags)
}

/// Parse the argument list starting at the `(` at `open`, then an optional
/// `throws` clause after the matching `)`.
fn parse_arguments_and_throws(
    tokens: &[Token],
    open: usize,
    package: &str,
) -> Result<(Vec<Argument>, Vec<TypeRef>)> {
    let close = tokens[open..]
        .iter()
        .position(|t| t.is(")"))
        .map(|offset| open + offset)
        .ok_or_else(|| ParseError::MissingToken {
            token: ")",
            decl: render(tokens),
        })?;

    let mut arguments = Vec::new();
    let mut idx = open + 1;
    while idx < close {
        let base = &tokens[idx];
        idx += 1;
        let dims_start = idx;
        while idx < close && tokens[idx].is_brackets() {
            idx += 1;
        }
        let ty = type_ref(package, base, &tokens[dims_start..idx])?;

        let name = match tokens.get(idx) {
            Some(token) if idx < close && is_name(token) => token.as_str().to_string(),
            _ => {
                return Err(ParseError::MissingArgumentName {
                    ty: ty.to_string(),
                    decl: render(tokens),
                })
            }
        };
        idx += 1;
        arguments.push(Argument::new(ty, name));

        if idx < close {
            if !tokens[idx].is(",") {
                return Err(ParseError::MissingToken {
                    token: ",",
                    decl: render(tokens),
                });
            }
            idx += 1;
        }
    }

    let mut throws = Vec::new();
    if tokens.get(close + 1).is_some_and(|t| t.is("throws")) {
        for token in tokens[close + 2..].iter().filter(|t| !t.is(",")) {
            throws.push(type_ref(package, token, &[])?);
        }
    }

    Ok((arguments, throws))
}

fn open_paren(tokens: &[Token]) -> Result<usize> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    tokens
        .iter()
        .position(|t| t.is("("))
        .ok_or_else(|| ParseError::MissingToken {
            token: "(",
            decl: render(tokens),
        })
}

/// Comma-separated type references.
fn type_list(tokens: &[Token], package: &str) -> Result<Vec<TypeRef>> {
    tokens
        .split(|t| t.is(","))
        .filter(|group| !group.is_empty())
        .map(|group| type_ref(package, &group[0], &group[1..]))
        .collect()
}

/// Build a type from its base token and any bracket tokens following it.
fn type_ref(package: &str, base: &Token, brackets: &[Token]) -> Result<TypeRef> {
    let invalid = || ParseError::InvalidType(base.as_str().to_string());
    let ty = match base {
        Token::Word(word)
            if word != ","
                && word != "("
                && word != ")"
                && !base.is_brackets()
                && !RESERVED.contains(&word.as_str()) =>
        {
            qualify(package, word)?
        }
        Token::Ref(name) => TypeRef::parse(name).map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    let mut dims = ty.dims();
    for group in brackets {
        let text = group.as_str();
        if text.len() % 2 != 0 || !text.as_bytes().chunks(2).all(|pair| pair == b"[]") {
            return Err(ParseError::InvalidType(format!("{base}{text}")));
        }
        let pairs = u8::try_from(text.len() / 2).map_err(|_| invalid())?;
        dims = dims.checked_add(pairs).ok_or_else(invalid)?;
    }
    Ok(TypeRef::array(ty.name(), dims))
}

fn is_name(token: &Token) -> bool {
    match token {
        Token::Word(word) => {
            !word.is_empty()
                && !RESERVED.contains(&word.as_str())
                && !is_primitive(word)
                && !word.starts_with(|c: char| c.is_ascii_digit())
                && word.chars().all(|c| c == '_' || c == '$' || c.is_alphanumeric())
        }
        _ => false,
    }
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
