//! Engine configuration and command-tree manifests, both TOML.

mod loader;
mod manifest;
mod types;

pub use loader::ConfigError;
pub use manifest::{HandlerSet, SubcommandManifest, TreeManifest};
pub use types::{DispatchConfig, EngineConfig, HelpConfig, LexerConfig, StrategyConfig};
