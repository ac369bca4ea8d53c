use std::fmt;

use scraper::ElementRef;

use crate::error::Result;
use crate::resolve::resolve_href;

/// One lexical unit of a declaration block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A whitespace-delimited word or a punctuation token (`(`, `)`, `,`, `[]`).
    Word(String),
    /// Fully qualified name of a hyperlinked type.
    Ref(String),
    /// Raw text following `=` in a field declaration.
    Literal(String),
}

impl Token {
    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(text) | Token::Ref(text) | Token::Literal(text) => text,
        }
    }

    /// `true` for a plain word equal to `text`.
    pub fn is(&self, text: &str) -> bool {
        matches!(self, Token::Word(word) if word == text)
    }

    /// `true` for an array-bracket group such as `[]` or `[][]`.
    pub fn is_brackets(&self) -> bool {
        match self {
            Token::Word(word) => word.starts_with('['),
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split plain declaration text into tokens.
pub fn tokenize_text(text: &str) -> Vec<Token> {
    let mut lexer = Lexer::default();
    lexer.push_text(text);
    lexer.finish()
}

/// Lex the children of a declaration element (`<PRE>`, `<DT>`, ...) in document
/// order, resolving hyperlinks relative to `package`.
pub fn lex_fragment(fragment: ElementRef<'_>, package: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::default();
    lexer.push_children(fragment, package)?;
    Ok(lexer.finish())
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    literal: Option<String>,
}

impl Lexer {
    fn push_text(&mut self, text: &str) {
        let text = text.replace('\u{a0}', " ");
        if let Some(literal) = &mut self.literal {
            literal.push_str(&text);
            return;
        }

        let (decl, value) = match text.split_once('=') {
            Some((decl, value)) => (decl, Some(value)),
            None => (text.as_str(), None),
        };
        let spaced = decl
            .replace('(', " ( ")
            .replace(')', " ) ")
            .replace(',', " , ")
            .replace('[', " [");
        self.tokens
            .extend(spaced.split_whitespace().map(|word| Token::Word(word.to_string())));

        if let Some(value) = value {
            self.tokens.push(Token::Word("=".to_string()));
            self.literal = Some(value.to_string());
        }
    }

    fn push_children(&mut self, element: ElementRef<'_>, package: &str) -> Result<()> {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(text);
                continue;
            }
            let Some(child) = ElementRef::wrap(child) else {
                continue;
            };

            if self.literal.is_some() {
                let text: String = child.text().collect();
                self.push_text(&text);
            } else if let Some(href) = anchor_href(child) {
                self.tokens.push(Token::Ref(resolve_href(package, href)?));
            } else {
                let flat: String = child.text().collect();
                let words = tokenize_text(&flat);
                if words.len() > 1 || contains_anchor(child) {
                    self.push_children(child, package)?;
                } else {
                    self.tokens.extend(words);
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<Token> {
        if let Some(literal) = self.literal.take() {
            let literal = literal.trim();
            if !literal.is_empty() {
                self.tokens.push(Token::Literal(literal.to_string()));
            }
        }
        self.tokens
    }
}

fn anchor_href(element: ElementRef<'_>) -> Option<&str> {
    if element.value().name() == "a" {
        element.value().attr("href")
    } else {
        None
    }
}

fn contains_anchor(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|descendant| anchor_href(descendant).is_some())
}
