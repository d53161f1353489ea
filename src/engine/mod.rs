//! The engine: one lexer, one strategy, one resolver registry and one
//! command tree, shared by every invocation.
//!
//! ```text
//! text ──► parse ──► TokenStream ──► resolve ──► Resolution
//!                                                   │
//!                       help flag given? ── yes ──► Outcome::Help
//!                                        └─ no ───► Handler::run ──► Outcome::Ran
//! ```

mod store;

pub use store::EngineStore;

use serde::Serialize;

use crate::args::{Allow, Args, Lexer, Strategy, TokenStream};
use crate::command::{
    render_help, CommandKind, CommandTree, DispatchError, HelpText, Invocation, Resolution,
    Subcommand, SubcommandResolver,
};
use crate::config::{ConfigError, EngineConfig};
use crate::error::{Identifier, UserError};
use crate::resolvers::ResolverRegistry;

/// Result of a successful dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The leaf at `path` ran and produced `output`.
    Ran { path: Vec<String>, output: String },
    /// The help flag was given; nothing ran.
    Help { path: Vec<String>, help: HelpText },
}

impl Outcome {
    pub fn path(&self) -> &[String] {
        match self {
            Outcome::Ran { path, .. } | Outcome::Help { path, .. } => path,
        }
    }
}

pub struct Engine {
    lexer: Lexer,
    strategy: Strategy,
    registry: ResolverRegistry,
    tree: CommandTree,
    case_insensitive: bool,
    help_flag: Option<String>,
    line_budget: usize,
}

impl Engine {
    /// Engine with the default configuration.
    pub fn new(tree: CommandTree, registry: ResolverRegistry) -> Self {
        Self::assemble(&EngineConfig::default(), tree, registry)
    }

    /// Validate `config` and build an engine from it.
    pub fn from_config(
        config: &EngineConfig,
        tree: CommandTree,
        registry: ResolverRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, tree, registry))
    }

    fn assemble(config: &EngineConfig, tree: CommandTree, registry: ResolverRegistry) -> Self {
        let mut strategy = config.strategy.build();
        let help_flag = config.dispatch.help_flag.clone();

        let mut flags = Vec::new();
        let mut options = Vec::new();
        collect_switches(tree.root(), &mut flags, &mut options);
        flags.extend(help_flag.iter().cloned());
        admit(strategy.flags_mut(), &flags);
        admit(strategy.options_mut(), &options);

        tracing::debug!(
            flags = ?strategy.flags(),
            options = ?strategy.options(),
            root = %tree.root().name,
            "Engine assembled"
        );

        Self {
            lexer: config.lexer.build(),
            strategy,
            registry,
            tree,
            case_insensitive: config.dispatch.case_insensitive,
            help_flag,
            line_budget: config.help.line_budget,
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Maximum characters per help message.
    pub fn line_budget(&self) -> usize {
        self.line_budget
    }

    /// Lex and classify `text` into a fresh stream.
    pub fn parse(&self, text: &str) -> TokenStream {
        let parsed = self.strategy.classify(self.lexer.pieces(text));
        tracing::trace!(
            positionals = parsed.positionals.len(),
            flags = ?parsed.flags,
            options = ?parsed.options,
            "Classified invocation"
        );
        TokenStream::new(parsed)
    }

    /// Walk the tree along `stream`. Matched tokens are consumed; the rest
    /// stay for the leaf.
    pub async fn resolve(
        &self,
        stream: &mut TokenStream,
        invocation: &Invocation,
    ) -> Result<Resolution<'_>, DispatchError> {
        SubcommandResolver::new(&self.tree, self.case_insensitive)
            .resolve(stream, invocation)
            .await
    }

    /// Parse, resolve and either run the leaf or return its help.
    pub async fn dispatch(
        &self,
        text: &str,
        invocation: &Invocation,
    ) -> Result<Outcome, DispatchError> {
        let mut stream = self.parse(text);
        let wants_help = self
            .help_flag
            .as_deref()
            .is_some_and(|flag| stream.has_flags(&[flag]));

        let resolution = match self.resolve(&mut stream, invocation).await {
            Ok(resolution) => resolution,
            Err(DispatchError::User(err))
                if wants_help && err.is(&Identifier::SubcommandRequired) =>
            {
                let path = resolved_path(&err);
                let help = self.help(&path)?;
                return Ok(Outcome::Help { path, help });
            }
            Err(err) => return Err(err),
        };

        if wants_help {
            let help = self.help(&resolution.path)?;
            tracing::debug!(path = ?resolution.path, "Help requested");
            return Ok(Outcome::Help {
                path: resolution.path,
                help,
            });
        }

        let Resolution { path, handler, .. } = resolution;
        let mut args = Args::new(stream, &self.registry);
        let output = handler.run(&mut args, invocation).await?;
        tracing::debug!(path = ?path, caller = ?invocation.caller, "Command ran");
        Ok(Outcome::Ran { path, output })
    }

    /// Help for the node at `path` (names or aliases below the root).
    pub fn help<S: AsRef<str>>(&self, path: &[S]) -> Result<HelpText, UserError> {
        render_help(&self.tree, path, self.case_insensitive)
    }
}

/// Path the resolver had reached when it needed a subcommand, defaults
/// included.
fn resolved_path(err: &UserError) -> Vec<String> {
    err.context
        .as_ref()
        .and_then(|context| context.get("path"))
        .and_then(|path| serde_json::from_value(path.clone()).ok())
        .unwrap_or_default()
}

/// Names and aliases of every switch declared anywhere in the tree.
fn collect_switches(node: &Subcommand, flags: &mut Vec<String>, options: &mut Vec<String>) {
    for spec in &node.flags {
        flags.push(spec.name.clone());
        flags.extend(spec.aliases.iter().cloned());
    }
    for spec in &node.options {
        options.push(spec.name.clone());
        options.extend(spec.aliases.iter().cloned());
    }
    if let CommandKind::Group { children } = &node.kind {
        for child in children {
            collect_switches(child, flags, options);
        }
    }
}

/// Make declared names recognisable. `All` already admits them and an
/// explicit `None` keeps every piece positional.
fn admit(allow: &mut Allow, names: &[String]) {
    for name in names {
        allow.include(name);
    }
}
