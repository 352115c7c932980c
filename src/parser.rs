//! Parser for the ATV text format.
//!
//! A recursive-descent parser over the token stream produced by
//! [`crate::lexer`]. Whitespace, comments and end-of-line tokens are
//! elided up front; the grammar itself is line-agnostic:
//!
//! ```text
//! Document      := Node*
//! Node          := Pragma | Setting
//! Setting       := Ident "=" ( Simple | WithMetadata | Table )
//! Simple        := String
//! WithMetadata  := "{" KeyValue+ "}"
//! Table         := "{" KeyValue* Row* "}"
//! Row           := "{" RowIdHeader? Setting* "}"
//! RowIdHeader   := "{" "rid" "=" String "}"
//! KeyValue      := Ident "=" String
//! ```
//!
//! After `= {` the parser first collects key/value pairs; a following
//! `{` means rows follow and the block is a table, otherwise one or
//! more pairs form a value with metadata and an empty block is an empty
//! table.
//!
//! A parse error is fatal: the whole input is rejected, with the line
//! and column of the offending token.

use crate::document::{Document, Node, Pragma};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::map::AttrMap;
use crate::value::{Row, Setting, Table, Value};
use crate::{Error, Result};

/// Characters that are backslash-escaped inside quoted strings.
const QUOTED_CHARS: &[char] = &['"', '\\'];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Canonicalizes and tokenizes `source`.
    ///
    /// CRLF line endings are folded to LF and a trailing newline is
    /// appended if missing, so the grammar never sees a bare EOF where
    /// it expects an end of line.
    pub fn new(source: &str) -> Result<Self> {
        let mut text = source.replace("\r\n", "\n");
        if !text.ends_with('\n') {
            text.push('\n');
        }

        let tokens = tokenize(&text)?
            .into_iter()
            .filter(|token| {
                !matches!(
                    token.kind,
                    TokenKind::Whitespace | TokenKind::Comment | TokenKind::Eol
                )
            })
            .collect();

        Ok(Parser { tokens, pos: 0 })
    }

    /// Parses a complete document.
    pub fn parse_document(mut self) -> Result<Document> {
        let mut nodes = Vec::new();

        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Pragma => {
                    let token = self.advance().clone();
                    nodes.push(Node::Pragma(split_pragma(&token)?));
                }
                TokenKind::Ident => {
                    nodes.push(Node::Setting(self.parse_setting()?));
                }
                _ => return Err(self.unexpected_here("a pragma or a setting")),
            }
        }

        Ok(Document::from_nodes(nodes))
    }

    fn parse_setting(&mut self) -> Result<Setting> {
        let name = self.expect(TokenKind::Ident)?.text.clone();
        self.expect(TokenKind::Assign)?;

        let value = match self.peek_kind() {
            Some(TokenKind::Str) => {
                let token = self.advance().clone();
                Value::Simple(unquote(&token)?)
            }
            Some(TokenKind::BraceOpen) => {
                self.advance();
                self.parse_brace_value()?
            }
            _ => return Err(self.unexpected_here("a string or '{'")),
        };

        Ok(Setting { name, value })
    }

    /// Parses the body of a brace block after `= {` has been consumed.
    fn parse_brace_value(&mut self) -> Result<Value> {
        let attrs = self.parse_key_values()?;

        if self.peek_kind() == Some(TokenKind::BraceOpen) {
            let mut rows = Vec::new();
            while self.peek_kind() == Some(TokenKind::BraceOpen) {
                rows.push(self.parse_row()?);
            }
            self.expect(TokenKind::BraceClose)?;
            return Ok(Value::Table(Table {
                attributes: attrs,
                rows,
            }));
        }

        self.expect(TokenKind::BraceClose)?;
        if attrs.is_empty() {
            Ok(Value::Table(Table::new()))
        } else {
            Ok(Value::WithMetadata(attrs))
        }
    }

    fn parse_key_values(&mut self) -> Result<AttrMap> {
        let mut attrs = AttrMap::new();
        while self.peek_kind() == Some(TokenKind::Ident) {
            let key = self.advance().text.clone();
            self.expect(TokenKind::Assign)?;
            let token = self.expect(TokenKind::Str)?.clone();
            attrs.set(key, unquote(&token)?);
        }
        Ok(attrs)
    }

    fn parse_row(&mut self) -> Result<Row> {
        self.expect(TokenKind::BraceOpen)?;

        // a brace directly inside a row can only open the row id header
        let id = if self.peek_kind() == Some(TokenKind::BraceOpen) {
            self.advance();
            let keyword = self.expect(TokenKind::Ident)?.clone();
            if keyword.text != "rid" {
                return Err(Error::syntax(
                    keyword.line,
                    keyword.column,
                    format!("expected 'rid' in row id header, found '{}'", keyword.text),
                ));
            }
            self.expect(TokenKind::Assign)?;
            let token = self.expect(TokenKind::Str)?.clone();
            let id = unquote(&token)?;
            self.expect(TokenKind::BraceClose)?;
            Some(id)
        } else {
            None
        };

        let mut settings = Vec::new();
        while self.peek_kind() == Some(TokenKind::Ident) {
            settings.push(self.parse_setting()?);
        }
        self.expect(TokenKind::BraceClose)?;

        Ok(Row { id, settings })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        match self.peek_kind() {
            Some(found) if found == kind => Ok(self.advance()),
            _ => Err(self.unexpected_here(kind.describe())),
        }
    }

    fn unexpected_here(&self, expected: &str) -> Error {
        match self.peek() {
            Some(token) => Error::syntax(
                token.line,
                token.column,
                format!("expected {expected}, found '{}'", token.text),
            ),
            None => self.eof(expected),
        }
    }

    fn eof(&self, expected: &str) -> Error {
        let (line, column) = self
            .tokens
            .last()
            .map(|token| (token.line, token.column))
            .unwrap_or((1, 1));
        Error::syntax(line, column, format!("expected {expected}, found end of input"))
    }
}

/// Splits a raw pragma token (`#name value`) into its name and value.
///
/// The name is the run of word characters after `#`; the value is the
/// rest of the line after the separating whitespace, or empty.
fn split_pragma(token: &Token) -> Result<Pragma> {
    let body = &token.text[1..];
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        return Err(Error::syntax(
            token.line,
            token.column,
            "pragma name is missing",
        ));
    }

    let rest = &body[name.len()..];
    let value = if rest.is_empty() {
        String::new()
    } else if rest.starts_with(|c: char| c == ' ' || c == '\t') {
        rest.trim_start_matches([' ', '\t']).to_string()
    } else {
        return Err(Error::syntax(
            token.line,
            token.column,
            format!("malformed pragma '{}'", token.text),
        ));
    };

    Ok(Pragma { name, value })
}

/// Removes the surrounding quotes of a raw string token and resolves
/// its escapes: `\"` and `\\` unescape to the bare character, any other
/// backslash is preserved literally.
fn unquote(token: &Token) -> Result<String> {
    let raw = &token.text;
    if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
        return Err(Error::syntax(
            token.line,
            token.column,
            "string is not properly quoted",
        ));
    }

    let inner = &raw[1..raw.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut pending = false;
    for ch in inner.chars() {
        if pending {
            if !QUOTED_CHARS.contains(&ch) {
                result.push('\\');
            }
            result.push(ch);
            pending = false;
        } else if ch == '\\' {
            pending = true;
        } else {
            result.push(ch);
        }
    }

    if pending {
        return Err(Error::syntax(
            token.line,
            token.column,
            "unpaired backslash in quoted string",
        ));
    }

    Ok(result)
}
