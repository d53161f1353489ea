//! Lexer: raw invocation text → pieces.
//!
//! Splits on whitespace, except inside a configured quote pair, where the
//! quoted text becomes one piece with the quotes stripped. The lexer never
//! fails: a quote without its closing partner is kept as literal text.

use serde::Serialize;

/// Quote pairs accepted by default.
pub const DEFAULT_QUOTES: [(char, char); 4] = [('"', '"'), ('“', '”'), ('「', '」'), ('«', '»')];

/// One lexer output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    /// Text with quotes removed.
    pub value: String,
    /// Source text including quotes.
    pub raw: String,
    /// Whitespace that preceded this piece in the input.
    pub leading: String,
    /// Whether the piece came from a terminated quote pair.
    pub quoted: bool,
}

impl Piece {
    /// A bare, unquoted piece. Mostly useful in tests.
    pub fn bare(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            raw: value.clone(),
            value,
            leading: " ".to_string(),
            quoted: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    quotes: Vec<(char, char)>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTES.to_vec())
    }
}

impl Lexer {
    pub fn new(quotes: Vec<(char, char)>) -> Self {
        Self { quotes }
    }

    /// Iterate the pieces of `input`. Each call starts from the beginning.
    pub fn pieces<'a>(&'a self, input: &'a str) -> Pieces<'a> {
        Pieces {
            quotes: &self.quotes,
            input,
            pos: 0,
        }
    }

    /// Collect all pieces of `input`.
    pub fn lex(&self, input: &str) -> Vec<Piece> {
        self.pieces(input).collect()
    }
}

/// Iterator returned by [`Lexer::pieces`].
pub struct Pieces<'a> {
    quotes: &'a [(char, char)],
    input: &'a str,
    pos: usize,
}

impl Pieces<'_> {
    fn closing_quote(&self, open: char) -> Option<char> {
        self.quotes
            .iter()
            .find(|(o, _)| *o == open)
            .map(|(_, close)| *close)
    }
}

impl Iterator for Pieces<'_> {
    type Item = Piece;

    fn next(&mut self) -> Option<Piece> {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        let leading = &rest[..rest.len() - trimmed.len()];
        self.pos += leading.len();

        let first = trimmed.chars().next()?;
        let start = self.pos;

        if let Some(close) = self.closing_quote(first) {
            let body_start = start + first.len_utf8();
            if let Some(offset) = self.input[body_start..].find(close) {
                let body_end = body_start + offset;
                let raw_end = body_end + close.len_utf8();
                self.pos = raw_end;
                return Some(Piece {
                    value: self.input[body_start..body_end].to_string(),
                    raw: self.input[start..raw_end].to_string(),
                    leading: leading.to_string(),
                    quoted: true,
                });
            }
            // Unterminated: fall through and read a bare word.
        }

        let end = trimmed
            .find(char::is_whitespace)
            .map(|offset| start + offset)
            .unwrap_or(self.input.len());
        self.pos = end;
        let word = &self.input[start..end];
        Some(Piece {
            value: word.to_string(),
            raw: word.to_string(),
            leading: leading.to_string(),
            quoted: false,
        })
    }
}
