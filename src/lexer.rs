//! Tokenizer for the ATV text format.
//!
//! A deterministic, hand-written lexer that walks the input character by
//! character and produces [`Token`]s with line/column positions. There is
//! no backtracking: the first character of every token decides its class.
//!
//! The caller is expected to canonicalize the input first (CRLF to LF,
//! guaranteed trailing newline); [`crate::parser::Parser`] does this, so
//! end-of-file never needs to be distinguished from end-of-line.

use crate::{Error, Result};

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `//` through end of line; dropped before parsing.
    Comment,
    /// `#` through end of line; split into name and value by the parser.
    Pragma,
    /// A double-quoted string, stored raw (quotes and escapes included).
    Str,
    /// An identifier: a letter followed by letters, digits, `.` or `_`.
    Ident,
    /// A run of `\n`/`\r`; dropped before parsing.
    Eol,
    /// A run of spaces/tabs; dropped before parsing.
    Whitespace,
    /// `=`
    Assign,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
}

impl TokenKind {
    /// Human-readable name used in parse error messages.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            TokenKind::Comment => "a comment",
            TokenKind::Pragma => "a pragma",
            TokenKind::Str => "a string",
            TokenKind::Ident => "an identifier",
            TokenKind::Eol => "end of line",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Assign => "'='",
            TokenKind::BraceOpen => "'{'",
            TokenKind::BraceClose => "'}'",
        }
    }
}

/// A single token with its source position (1-based line and column).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes characters while `keep` holds, appending them to `text`.
    fn take_while(&mut self, text: &mut String, keep: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !keep(ch) {
                break;
            }
            text.push(ch);
            self.bump();
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'
}

/// Tokenizes canonicalized ATV text.
///
/// The returned stream still contains whitespace, comment and
/// end-of-line tokens; the parser elides them.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut cursor = Cursor::new(input);
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        let line = cursor.line;
        let column = cursor.column;
        let mut text = String::new();

        let kind = match ch {
            '/' => {
                text.push(ch);
                cursor.bump();
                if cursor.peek() != Some('/') {
                    return Err(Error::syntax(line, column, "expected '//' to start a comment"));
                }
                cursor.take_while(&mut text, |c| c != '\n' && c != '\r');
                TokenKind::Comment
            }
            '#' => {
                text.push(ch);
                cursor.bump();
                cursor.take_while(&mut text, |c| c != '\n' && c != '\r');
                TokenKind::Pragma
            }
            '"' => {
                text.push(ch);
                cursor.bump();
                let mut escaped = false;
                let mut terminated = false;
                while let Some(c) = cursor.bump() {
                    text.push(c);
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        terminated = true;
                        break;
                    }
                }
                if !terminated {
                    return Err(Error::syntax(line, column, "unterminated string"));
                }
                TokenKind::Str
            }
            '\n' | '\r' => {
                cursor.take_while(&mut text, |c| c == '\n' || c == '\r');
                TokenKind::Eol
            }
            ' ' | '\t' => {
                cursor.take_while(&mut text, |c| c == ' ' || c == '\t');
                TokenKind::Whitespace
            }
            '=' => {
                text.push(ch);
                cursor.bump();
                TokenKind::Assign
            }
            '{' => {
                text.push(ch);
                cursor.bump();
                TokenKind::BraceOpen
            }
            '}' => {
                text.push(ch);
                cursor.bump();
                TokenKind::BraceClose
            }
            ch if is_ident_start(ch) => {
                text.push(ch);
                cursor.bump();
                cursor.take_while(&mut text, is_ident_continue);
                TokenKind::Ident
            }
            other => {
                return Err(Error::syntax(
                    line,
                    column,
                    format!("unexpected character '{other}'"),
                ));
            }
        };

        tokens.push(Token {
            kind,
            text,
            line,
            column,
        });
    }

    Ok(tokens)
}
