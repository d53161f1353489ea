use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};

use cmdroute::args::Args;
use cmdroute::command::{DispatchError, Handler, Invocation, PermissionLevel};
use cmdroute::config::{EngineConfig, HandlerSet, SubcommandManifest, TreeManifest};
use cmdroute::engine::{Engine, Outcome};
use cmdroute::error::UserError;
use cmdroute::logging::init_tracing;
use cmdroute::resolvers::ResolverRegistry;

/// cmdroute -- inspect how invocation text is lexed, classified and dispatched.
#[derive(Parser, Debug)]
#[command(name = "cmdroute", version, about, disable_help_subcommand = true)]
struct Cli {
    /// Engine config file (default: <config dir>/cmdroute/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split text into pieces and print them as JSON
    Lex {
        text: String,
    },

    /// Classify text into positionals, flags and options
    Classify {
        text: String,
    },

    /// Route text through a command tree manifest
    Dispatch {
        text: String,

        /// TOML command tree; every handler name echoes its arguments
        #[arg(long)]
        tree: PathBuf,

        /// Caller permission level
        #[arg(long, default_value_t = 0)]
        level: u8,

        /// Caller identity
        #[arg(long)]
        caller: Option<String>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print help for a path in a command tree manifest
    Help {
        /// Subcommand names below the root
        path: Vec<String>,

        #[arg(long)]
        tree: PathBuf,

        /// Maximum characters per message (default: from config)
        #[arg(long)]
        budget: Option<usize>,
    },
}

/// Stand-in for every handler a manifest names: reports what it received.
struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn run(&self, args: &mut Args<'_>, invocation: &Invocation) -> Result<String, UserError> {
        let positionals: Vec<&str> = args
            .remaining_pieces()
            .iter()
            .map(|piece| piece.value.as_str())
            .collect();
        let mut flags: Vec<&String> = args.parsed().flags.iter().collect();
        flags.sort();
        let options: BTreeMap<&String, &Vec<String>> = args.parsed().options.iter().collect();

        Ok(serde_json::json!({
            "caller": invocation.caller,
            "level": invocation.level,
            "positionals": positionals,
            "flags": flags,
            "options": options,
        })
        .to_string())
    }
}

fn handler_names(node: &SubcommandManifest, names: &mut Vec<String>) {
    names.extend(node.run.iter().cloned());
    for child in &node.children {
        handler_names(child, names);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };
    Ok(config)
}

fn load_engine(config: &EngineConfig, tree: &Path) -> anyhow::Result<Engine> {
    let manifest = TreeManifest::load_from(tree)?;
    let mut names = Vec::new();
    handler_names(&manifest, &mut names);
    let handlers = names
        .into_iter()
        .fold(HandlerSet::new(), |set, name| set.with(name, EchoHandler));

    let tree = manifest
        .build(&handlers)
        .with_context(|| format!("Failed to build command tree from {}", tree.display()))?;
    Ok(Engine::from_config(
        config,
        tree,
        ResolverRegistry::with_builtins(),
    )?)
}

fn report(err: &UserError) -> ! {
    eprintln!("Error: {} [{}]", err.message, err.identifier);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Lex { text } => {
            let pieces = config.lexer.build().lex(&text);
            println!("{}", serde_json::to_string_pretty(&pieces)?);
        }
        Commands::Classify { text } => {
            let lexer = config.lexer.build();
            let parsed = config.strategy.build().classify(lexer.pieces(&text));
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Dispatch {
            text,
            tree,
            level,
            caller,
            json,
        } => {
            let engine = load_engine(&config, &tree)?;
            let mut invocation = Invocation::new(PermissionLevel(level));
            if let Some(caller) = caller {
                invocation = invocation.with_caller(caller);
            }

            match engine.dispatch(&text, &invocation).await {
                Ok(outcome) if json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Ok(Outcome::Ran { output, .. }) => println!("{output}"),
                Ok(Outcome::Help { help, .. }) => {
                    println!("{}", help.chunks(engine.line_budget()).join("\n\n"))
                }
                Err(DispatchError::User(err)) => report(&err),
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Help { path, tree, budget } => {
            let engine = load_engine(&config, &tree)?;
            match engine.help(&path) {
                Ok(help) => {
                    let budget = budget.unwrap_or(engine.line_budget());
                    println!("{}", help.chunks(budget).join("\n\n"));
                }
                Err(err) => report(&err),
            }
        }
    }

    Ok(())
}
