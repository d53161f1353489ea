//! TOML form of a command tree.
//!
//! Leaves name a handler registered in a [`HandlerSet`]; groups list their
//! children. Predicates are code, so `can_run` gates are attached in Rust
//! after loading, not declared here.
//!
//! ```toml
//! name = "git"
//! description = "Version control"
//!
//! [[children]]
//! name = "remote"
//!
//! [[children.children]]
//! name = "add"
//! run = "remote-add"
//! arguments = [{ name = "name" }, { name = "url", required = false }]
//! flags = [{ name = "force", aliases = ["f"] }]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::command::{ArgumentSpec, CommandTree, Handler, PermissionLevel, Subcommand, SwitchSpec};
use crate::config::loader::{read_toml, ConfigError};
use crate::error::EngineError;

/// Handlers available to a manifest, by name.
#[derive(Default, Clone)]
pub struct HandlerSet {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).cloned()
    }
}

/// One node of a manifest. Exactly one of `run` and `children` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcommandManifest {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub permission: Option<PermissionLevel>,
    #[serde(default)]
    pub flags: Vec<SwitchSpec>,
    #[serde(default)]
    pub options: Vec<SwitchSpec>,
    #[serde(default)]
    pub run: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    #[serde(default)]
    pub children: Vec<SubcommandManifest>,
}

/// A whole tree; the top-level table is the root command.
pub type TreeManifest = SubcommandManifest;

impl SubcommandManifest {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    /// Build and validate the command tree.
    pub fn build(&self, handlers: &HandlerSet) -> Result<CommandTree, ConfigError> {
        let root = self.build_node(handlers)?;
        Ok(CommandTree::new(root)?)
    }

    fn build_node(&self, handlers: &HandlerSet) -> Result<Subcommand, EngineError> {
        let mut node = match (&self.run, self.children.is_empty()) {
            (Some(name), true) => {
                let handler = handlers
                    .get(name)
                    .ok_or_else(|| EngineError::UnknownHandler { name: name.clone() })?;
                let mut leaf = Subcommand::leaf_shared(self.name.clone(), handler);
                for argument in &self.arguments {
                    leaf = leaf.argument(argument.clone());
                }
                leaf
            }
            (None, false) => {
                let children = self
                    .children
                    .iter()
                    .map(|child| child.build_node(handlers))
                    .collect::<Result<Vec<_>, _>>()?;
                Subcommand::group(self.name.clone(), children)?
            }
            _ => {
                return Err(EngineError::InvalidShape {
                    name: self.name.clone(),
                })
            }
        };

        for alias in &self.aliases {
            node = node.alias(alias.clone());
        }
        node = node.describe(self.description.clone());
        if let Some(level) = self.permission {
            node = node.permission(level);
        }
        if self.default {
            node = node.as_default();
        }
        node.flags = self.flags.clone();
        node.options = self.options.clone();
        Ok(node)
    }
}
