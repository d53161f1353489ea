//! Token stream: a cursor over positionals with checkpoints.
//!
//! Positionals live in a fixed vector and the cursor is an index into it.
//! `save` pushes the index, `restore` pops and rewinds, `discard` pops and
//! commits. A commit raises every outstanding checkpoint to the committed
//! position, so nothing can rewind past it afterwards.

use crate::args::classifier::ParsedArguments;
use crate::args::lexer::Piece;
use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct TokenStream {
    parsed: ParsedArguments,
    cursor: usize,
    checkpoints: Vec<usize>,
    committed: usize,
}

impl TokenStream {
    pub fn new(parsed: ParsedArguments) -> Self {
        Self {
            parsed,
            cursor: 0,
            checkpoints: Vec::new(),
            committed: 0,
        }
    }

    /// Consume the next positional. `None` at the end of the stream.
    pub fn next(&mut self) -> Option<&Piece> {
        let piece = self.parsed.positionals.get(self.cursor)?;
        self.cursor += 1;
        Some(piece)
    }

    pub fn peek(&self) -> Option<&Piece> {
        self.parsed.positionals.get(self.cursor)
    }

    pub fn save(&mut self) {
        self.checkpoints.push(self.cursor);
    }

    /// Rewind to the most recent checkpoint.
    pub fn restore(&mut self) -> Result<(), EngineError> {
        let saved = self
            .checkpoints
            .pop()
            .ok_or(EngineError::NoCheckpoint { operation: "restore" })?;
        self.cursor = saved.max(self.committed);
        Ok(())
    }

    /// Drop the most recent checkpoint and commit the current position.
    pub fn discard(&mut self) -> Result<(), EngineError> {
        self.checkpoints
            .pop()
            .ok_or(EngineError::NoCheckpoint { operation: "discard" })?;
        self.committed = self.committed.max(self.cursor);
        for checkpoint in &mut self.checkpoints {
            *checkpoint = (*checkpoint).max(self.committed);
        }
        Ok(())
    }

    /// Rewind to the last committed position and drop all checkpoints.
    pub fn reset(&mut self) {
        self.cursor = self.committed;
        self.checkpoints.clear();
    }

    pub fn finished(&self) -> bool {
        self.cursor >= self.parsed.positionals.len()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.parsed.positionals.len().saturating_sub(self.cursor)
    }

    /// Unread positionals, without consuming them.
    pub fn remaining_pieces(&self) -> &[Piece] {
        &self.parsed.positionals[self.cursor.min(self.parsed.positionals.len())..]
    }

    /// Move the cursor forward by `count`, clamped to the end.
    pub(crate) fn advance(&mut self, count: usize) {
        self.cursor = (self.cursor + count).min(self.parsed.positionals.len());
    }

    /// True if any of `names` was given as a flag.
    pub fn has_flags(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.parsed.has_flag(name))
    }

    /// True if any of `names` was given as an option.
    pub fn has_options(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.parsed.options.contains_key(*name))
    }

    /// Value of the first of `names` that was given; the last value wins
    /// when the option was repeated.
    pub fn get_option(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.parsed.option(name))
    }

    /// Every value of the first of `names` that was given.
    pub fn get_options(&self, names: &[&str]) -> Option<&[String]> {
        names
            .iter()
            .find_map(|name| self.parsed.options.get(*name))
            .map(Vec::as_slice)
    }

    pub fn parsed(&self) -> &ParsedArguments {
        &self.parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(words: &[&str]) -> TokenStream {
        let parsed = ParsedArguments {
            positionals: words.iter().map(|w| Piece::bare(*w)).collect(),
            ..Default::default()
        };
        TokenStream::new(parsed)
    }

    fn next_value(s: &mut TokenStream) -> Option<String> {
        s.next().map(|p| p.value.clone())
    }

    #[test]
    fn next_and_peek() {
        let mut s = stream(&["a", "b"]);
        assert_eq!(s.peek().map(|p| p.value.as_str()), Some("a"));
        assert_eq!(next_value(&mut s).as_deref(), Some("a"));
        assert_eq!(next_value(&mut s).as_deref(), Some("b"));
        assert!(s.finished());
        assert!(s.next().is_none());
        assert!(s.peek().is_none());
    }

    #[test]
    fn restore_returns_to_checkpoint() {
        let mut s = stream(&["a", "b", "c"]);
        s.next();
        s.save();
        s.next();
        s.peek();
        s.next();
        s.restore().unwrap();
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn restore_without_checkpoint_is_an_error() {
        let mut s = stream(&["a"]);
        assert_eq!(
            s.restore(),
            Err(EngineError::NoCheckpoint { operation: "restore" })
        );
        assert!(s.discard().is_err());
    }

    #[test]
    fn discard_is_irreversible() {
        let mut s = stream(&["a", "b", "c"]);
        s.save();
        s.save();
        s.next();
        s.discard().unwrap();
        s.next();
        s.restore().unwrap();
        assert_eq!(s.position(), 1);
        s.reset();
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn nested_checkpoints_unwind_in_order() {
        let mut s = stream(&["a", "b", "c"]);
        s.save();
        s.next();
        s.save();
        s.next();
        s.restore().unwrap();
        assert_eq!(s.position(), 1);
        s.restore().unwrap();
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn flags_and_options_ignore_cursor() {
        let mut parsed = ParsedArguments::default();
        parsed.flags.insert("force".into());
        parsed.options.insert("mode".into(), vec!["a".into(), "b".into()]);
        let mut s = TokenStream::new(parsed);
        s.next();
        assert!(s.has_flags(&["quiet", "force"]));
        assert!(!s.has_flags(&["quiet"]));
        assert!(s.has_options(&["mode"]));
        assert_eq!(s.get_option(&["missing", "mode"]), Some("b"));
        assert_eq!(s.get_options(&["mode"]).map(<[String]>::len), Some(2));
    }
}
