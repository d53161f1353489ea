use serde::{Deserialize, Serialize};

use crate::args::{Allow, Lexer, Strategy, DEFAULT_QUOTES};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub lexer: LexerConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub help: HelpConfig,
}

/// Quote pairs recognised by the lexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexerConfig {
    /// Opening and closing character of each pair.
    #[serde(default = "default_quotes")]
    pub quotes: Vec<(char, char)>,
}

/// Flag and option recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
    /// `true` for any flag, `false` for none, or a list of names. Names
    /// declared in the command tree are added to a list (default: empty).
    #[serde(default = "default_allow")]
    pub flags: Allow,
    #[serde(default = "default_allow")]
    pub options: Allow,
}

/// Subcommand matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Match subcommand names and aliases ignoring case (default: false).
    #[serde(default)]
    pub case_insensitive: bool,
    /// Flag that turns a dispatch into a help request (default: "help").
    #[serde(default = "default_help_flag")]
    pub help_flag: Option<String>,
}

/// Help output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Maximum characters per help message (default: 2000).
    #[serde(default = "default_line_budget")]
    pub line_budget: usize,
}

fn default_quotes() -> Vec<(char, char)> {
    DEFAULT_QUOTES.to_vec()
}

fn default_prefixes() -> Vec<String> {
    vec!["--".to_string(), "-".to_string(), "—".to_string()]
}

fn default_separators() -> Vec<String> {
    vec!["=".to_string(), ":".to_string()]
}

fn default_allow() -> Allow {
    Allow::Listed(Vec::new())
}

fn default_help_flag() -> Option<String> {
    Some("help".to_string())
}

fn default_line_budget() -> usize {
    2000
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            quotes: default_quotes(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            separators: default_separators(),
            flags: default_allow(),
            options: default_allow(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            help_flag: default_help_flag(),
        }
    }
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            line_budget: default_line_budget(),
        }
    }
}

impl LexerConfig {
    pub fn build(&self) -> Lexer {
        Lexer::new(self.quotes.clone())
    }
}

impl StrategyConfig {
    pub fn build(&self) -> Strategy {
        Strategy::new(
            self.prefixes.clone(),
            self.separators.clone(),
            self.flags.clone(),
            self.options.clone(),
        )
    }
}
