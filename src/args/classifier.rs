//! Piece classifier: pieces → positionals, flags and options.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::args::lexer::Piece;

/// Which names a strategy accepts for flags or for options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AllowRepr", into = "AllowRepr")]
pub enum Allow {
    /// Any name.
    All,
    /// Nothing; every candidate is treated as positional.
    None,
    /// Only the listed names.
    Listed(Vec<String>),
}

impl Allow {
    pub fn listed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Allow::Listed(names.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, name: &str) -> bool {
        match self {
            Allow::All => true,
            Allow::None => false,
            Allow::Listed(names) => names.iter().any(|n| n == name),
        }
    }

    /// Add `name` to a listed set. `All` and `None` are left untouched.
    pub fn include(&mut self, name: &str) {
        if let Allow::Listed(names) = self {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
}

/// TOML/JSON form: `true`, `false`, or a list of names.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AllowRepr {
    Toggle(bool),
    Names(Vec<String>),
}

impl From<AllowRepr> for Allow {
    fn from(repr: AllowRepr) -> Self {
        match repr {
            AllowRepr::Toggle(true) => Allow::All,
            AllowRepr::Toggle(false) => Allow::None,
            AllowRepr::Names(names) => Allow::Listed(names),
        }
    }
}

impl From<Allow> for AllowRepr {
    fn from(allow: Allow) -> Self {
        match allow {
            Allow::All => AllowRepr::Toggle(true),
            Allow::None => AllowRepr::Toggle(false),
            Allow::Listed(names) => AllowRepr::Names(names),
        }
    }
}

/// How pieces are recognised as flags and options.
#[derive(Debug, Clone)]
pub struct Strategy {
    /// Sorted longest first so `--` wins over `-`.
    prefixes: Vec<String>,
    separators: Vec<String>,
    flags: Allow,
    options: Allow,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(
            vec!["--".into(), "-".into(), "—".into()],
            vec!["=".into(), ":".into()],
            Allow::None,
            Allow::None,
        )
    }
}

/// Outcome of classifying a single piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedPiece {
    Positional(Piece),
    Flag(String),
    Option { name: String, value: String },
}

impl Strategy {
    pub fn new(
        mut prefixes: Vec<String>,
        separators: Vec<String>,
        flags: Allow,
        options: Allow,
    ) -> Self {
        prefixes.retain(|p| !p.is_empty());
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
        Self {
            prefixes,
            separators: separators.into_iter().filter(|s| !s.is_empty()).collect(),
            flags,
            options,
        }
    }

    pub fn with_flags(mut self, flags: Allow) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_options(mut self, options: Allow) -> Self {
        self.options = options;
        self
    }

    pub fn flags(&self) -> &Allow {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut Allow {
        &mut self.flags
    }

    pub fn options(&self) -> &Allow {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Allow {
        &mut self.options
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .find_map(|prefix| text.strip_prefix(prefix.as_str()))
            .filter(|body| !body.is_empty())
    }

    /// Earliest separator in `body`; on a tie the longer separator wins.
    fn split_separator<'a>(&self, body: &'a str) -> Option<(&'a str, &'a str)> {
        self.separators
            .iter()
            .filter_map(|sep| body.find(sep.as_str()).map(|idx| (idx, sep.len())))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(idx, len)| (&body[..idx], &body[idx + len..]))
    }

    /// `prefix name separator value`, all in one piece.
    pub fn match_option(&self, text: &str) -> Option<(String, String)> {
        let body = self.strip_prefix(text)?;
        let (name, value) = self.split_separator(body)?;
        if name.is_empty() || !self.options.allows(name) {
            return None;
        }
        Some((name.to_string(), value.to_string()))
    }

    /// `prefix name` with no separator.
    pub fn match_flag(&self, text: &str) -> Option<String> {
        let body = self.strip_prefix(text)?;
        if self.split_separator(body).is_some() || !self.flags.allows(body) {
            return None;
        }
        Some(body.to_string())
    }

    /// Option syntax is checked first; it is the stricter pattern.
    pub fn classify_piece(&self, piece: Piece) -> ClassifiedPiece {
        if piece.quoted {
            return ClassifiedPiece::Positional(piece);
        }
        if let Some((name, value)) = self.match_option(&piece.value) {
            return ClassifiedPiece::Option { name, value };
        }
        if let Some(name) = self.match_flag(&piece.value) {
            return ClassifiedPiece::Flag(name);
        }
        ClassifiedPiece::Positional(piece)
    }

    /// Classify every piece into a [`ParsedArguments`].
    pub fn classify<I>(&self, pieces: I) -> ParsedArguments
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut parsed = ParsedArguments::default();
        for piece in pieces {
            match self.classify_piece(piece) {
                ClassifiedPiece::Positional(piece) => parsed.positionals.push(piece),
                ClassifiedPiece::Flag(name) => {
                    tracing::trace!(flag = %name, "Classified flag");
                    parsed.flags.insert(name);
                }
                ClassifiedPiece::Option { name, value } => {
                    tracing::trace!(option = %name, value = %value, "Classified option");
                    parsed.options.entry(name).or_default().push(value);
                }
            }
        }
        parsed
    }
}

/// Classification result for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArguments {
    /// Positional pieces in input order.
    pub positionals: Vec<Piece>,
    pub flags: HashSet<String>,
    /// Every value given for an option, in input order.
    pub options: HashMap<String, Vec<String>>,
}

impl ParsedArguments {
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    /// Last value given for `name`.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(flags: Allow, options: Allow) -> Strategy {
        Strategy::default().with_flags(flags).with_options(options)
    }

    #[test]
    fn listed_flag_matches_and_others_fall_through() {
        let s = strategy(Allow::listed(["force"]), Allow::None);
        assert_eq!(s.classify_piece(Piece::bare("--force")), ClassifiedPiece::Flag("force".into()));
        assert!(matches!(
            s.classify_piece(Piece::bare("--other")),
            ClassifiedPiece::Positional(p) if p.value == "--other"
        ));
    }

    #[test]
    fn option_checked_before_flag() {
        let s = strategy(Allow::All, Allow::All);
        assert_eq!(
            s.classify_piece(Piece::bare("--mode=fast")),
            ClassifiedPiece::Option { name: "mode".into(), value: "fast".into() }
        );
    }

    #[test]
    fn option_name_not_allowed_is_positional() {
        let s = strategy(Allow::All, Allow::listed(["mode"]));
        assert!(matches!(
            s.classify_piece(Piece::bare("--speed=3")),
            ClassifiedPiece::Positional(_)
        ));
    }

    #[test]
    fn longest_prefix_and_earliest_separator() {
        let s = strategy(Allow::None, Allow::All);
        assert_eq!(s.match_option("--a:b=c"), Some(("a".into(), "b=c".into())));
        assert_eq!(s.match_option("-x=1"), Some(("x".into(), "1".into())));
        assert_eq!(s.match_option("—y:2"), Some(("y".into(), "2".into())));
    }

    #[test]
    fn empty_value_allowed_empty_name_rejected() {
        let s = strategy(Allow::All, Allow::All);
        assert_eq!(s.match_option("--opt="), Some(("opt".into(), String::new())));
        assert_eq!(s.match_option("--=v"), None);
        assert_eq!(s.match_flag("--"), None);
        assert_eq!(s.match_flag("-"), None);
    }

    #[test]
    fn quoted_pieces_stay_positional() {
        let s = strategy(Allow::All, Allow::All);
        let mut piece = Piece::bare("--force");
        piece.quoted = true;
        assert!(matches!(s.classify_piece(piece), ClassifiedPiece::Positional(_)));
    }

    #[test]
    fn classify_collects_three_collections() {
        let s = strategy(Allow::listed(["v"]), Allow::All);
        let pieces = ["a", "-v", "--n=1", "b", "--n=2"].map(Piece::bare);
        let parsed = s.classify(pieces);
        let values: Vec<_> = parsed.positionals.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b"]);
        assert!(parsed.has_flag("v"));
        assert_eq!(parsed.options["n"], vec!["1", "2"]);
        assert_eq!(parsed.option("n"), Some("2"));
    }

    #[test]
    fn allow_deserializes_from_bool_or_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            a: Allow,
            b: Allow,
            c: Allow,
        }
        let w: Wrapper = toml::from_str("a = true\nb = false\nc = [\"x\"]").unwrap();
        assert_eq!(w.a, Allow::All);
        assert_eq!(w.b, Allow::None);
        assert_eq!(w.c, Allow::listed(["x"]));
    }
}
