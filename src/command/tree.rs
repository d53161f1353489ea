//! Declared command tree.
//!
//! A [`Subcommand`] is either a `Leaf` (runs a handler with its own
//! arguments) or a `Group` (holds further subcommands). Sibling sets are
//! validated when built: names and aliases must be unique (compared
//! case-insensitively) and at most one sibling may be the default.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::args::Args;
use crate::command::gate::{CanRun, Invocation, PermissionLevel};
use crate::error::{EngineError, UserError};

/// Executable body of a leaf subcommand.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Run with the arguments left after subcommand resolution.
    async fn run(&self, args: &mut Args<'_>, invocation: &Invocation) -> Result<String, UserError>;
}

/// Declared positional argument, for help output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

fn default_required() -> bool {
    true
}

impl ArgumentSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            description: String::new(),
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: String::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Declared flag or option, for help output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchSpec {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl SwitchSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

pub enum CommandKind {
    Leaf {
        run: Arc<dyn Handler>,
        arguments: Vec<ArgumentSpec>,
    },
    Group {
        children: Vec<Subcommand>,
    },
}

pub struct Subcommand {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub permission: Option<PermissionLevel>,
    pub can_run: Option<Arc<dyn CanRun>>,
    /// Chosen when no sibling matches the next token.
    pub default: bool,
    pub flags: Vec<SwitchSpec>,
    pub options: Vec<SwitchSpec>,
    pub kind: CommandKind,
}

impl std::fmt::Debug for Subcommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Subcommand");
        debug
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("permission", &self.permission)
            .field("default", &self.default);
        match &self.kind {
            CommandKind::Leaf { arguments, .. } => debug.field("arguments", arguments),
            CommandKind::Group { children } => debug.field("children", children),
        };
        debug.finish()
    }
}

impl Subcommand {
    fn with_kind(name: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            permission: None,
            can_run: None,
            default: false,
            flags: Vec::new(),
            options: Vec::new(),
            kind,
        }
    }

    pub fn leaf(name: impl Into<String>, run: impl Handler + 'static) -> Self {
        Self::leaf_shared(name, Arc::new(run))
    }

    pub fn leaf_shared(name: impl Into<String>, run: Arc<dyn Handler>) -> Self {
        Self::with_kind(
            name,
            CommandKind::Leaf {
                run,
                arguments: Vec::new(),
            },
        )
    }

    /// A group over `children`; fails if the sibling set is malformed.
    pub fn group(name: impl Into<String>, children: Vec<Subcommand>) -> Result<Self, EngineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        validate_siblings(&name, &children)?;
        Ok(Self::with_kind(name, CommandKind::Group { children }))
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if alias != self.name && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn permission(mut self, level: PermissionLevel) -> Self {
        self.permission = Some(level);
        self
    }

    pub fn can_run(mut self, predicate: impl CanRun + 'static) -> Self {
        self.can_run = Some(Arc::new(predicate));
        self
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn flag(mut self, flag: SwitchSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn option(mut self, option: SwitchSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Declare a positional argument. Groups take no arguments, so this is
    /// ignored for them.
    pub fn argument(mut self, argument: ArgumentSpec) -> Self {
        if let CommandKind::Leaf { arguments, .. } = &mut self.kind {
            arguments.push(argument);
        }
        self
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, CommandKind::Leaf { .. })
    }

    pub fn children(&self) -> &[Subcommand] {
        match &self.kind {
            CommandKind::Group { children } => children,
            CommandKind::Leaf { .. } => &[],
        }
    }

    /// Does `token` name this subcommand (name or alias)?
    pub fn matches(&self, token: &str, case_insensitive: bool) -> bool {
        let eq = |candidate: &String| {
            if case_insensitive {
                candidate.to_lowercase() == token.to_lowercase()
            } else {
                candidate == token
            }
        };
        eq(&self.name) || self.aliases.iter().any(eq)
    }

    /// Name plus aliases.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Find the sibling named by `token`.
pub fn find_child<'c>(
    children: &'c [Subcommand],
    token: &str,
    case_insensitive: bool,
) -> Option<&'c Subcommand> {
    children.iter().find(|c| c.matches(token, case_insensitive))
}

pub fn default_child(children: &[Subcommand]) -> Option<&Subcommand> {
    children.iter().find(|c| c.default)
}

fn validate_siblings(parent: &str, children: &[Subcommand]) -> Result<(), EngineError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for child in children {
        if child.name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        for label in child.labels() {
            if seen.insert(label.to_lowercase(), &child.name).is_some() {
                return Err(EngineError::DuplicateAlias {
                    parent: parent.to_string(),
                    alias: label.to_string(),
                });
            }
        }
    }

    let defaults: Vec<String> = children
        .iter()
        .filter(|c| c.default)
        .map(|c| c.name.clone())
        .collect();
    if defaults.len() > 1 {
        return Err(EngineError::MultipleDefaults {
            parent: parent.to_string(),
            names: defaults,
        });
    }
    Ok(())
}

fn validate_recursive(node: &Subcommand) -> Result<(), EngineError> {
    if let CommandKind::Group { children } = &node.kind {
        validate_siblings(&node.name, children)?;
        children.iter().try_for_each(validate_recursive)?;
    }
    Ok(())
}

/// Root command plus everything below it. Immutable once built.
#[derive(Debug)]
pub struct CommandTree {
    root: Subcommand,
}

impl CommandTree {
    /// Validate the whole tree, including sibling sets assembled by hand.
    pub fn new(root: Subcommand) -> Result<Self, EngineError> {
        if root.name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        validate_recursive(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Subcommand {
        &self.root
    }

    /// Follow `path` (names or aliases) from the root.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S], case_insensitive: bool) -> Option<Vec<&Subcommand>> {
        let mut nodes = vec![&self.root];
        let mut current = &self.root;
        for segment in path {
            current = find_child(current.children(), segment.as_ref(), case_insensitive)?;
            nodes.push(current);
        }
        Some(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl Handler for Noop {
        async fn run(&self, _: &mut Args<'_>, _: &Invocation) -> Result<String, UserError> {
            Ok(String::new())
        }
    }

    #[test]
    fn duplicate_alias_fails_at_registration() {
        let err = Subcommand::group(
            "remote",
            vec![
                Subcommand::leaf("add", Noop).alias("a"),
                Subcommand::leaf("append", Noop).alias("A"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateAlias { parent: "remote".into(), alias: "A".into() }
        );
    }

    #[test]
    fn name_colliding_with_alias_fails() {
        let err = Subcommand::group(
            "g",
            vec![Subcommand::leaf("rm", Noop), Subcommand::leaf("remove", Noop).alias("rm")],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateAlias { alias, .. } if alias == "rm"));
    }

    #[test]
    fn more_than_one_default_fails() {
        let err = Subcommand::group(
            "g",
            vec![
                Subcommand::leaf("a", Noop).as_default(),
                Subcommand::leaf("b", Noop).as_default(),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::MultipleDefaults { names, .. } if names.len() == 2));
    }

    #[test]
    fn hand_built_groups_are_validated_by_tree() {
        let mut root = Subcommand::group("root", vec![]).unwrap();
        root.kind = CommandKind::Group {
            children: vec![Subcommand::leaf("x", Noop), Subcommand::leaf("x", Noop)],
        };
        assert!(CommandTree::new(root).is_err());
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(Subcommand::group("", vec![]).unwrap_err(), EngineError::EmptyName);
        let err = Subcommand::group("g", vec![Subcommand::leaf("", Noop)]).unwrap_err();
        assert_eq!(err, EngineError::EmptyName);
    }

    #[test]
    fn lookup_follows_aliases() {
        let tree = CommandTree::new(
            Subcommand::group(
                "git",
                vec![Subcommand::group("remote", vec![Subcommand::leaf("add", Noop).alias("a")])
                    .unwrap()],
            )
            .unwrap(),
        )
        .unwrap();
        let nodes = tree.lookup(&["remote", "a"], false).unwrap();
        assert_eq!(nodes.last().unwrap().name, "add");
        assert!(tree.lookup(&["remote", "A"], false).is_none());
        assert!(tree.lookup(&["remote", "A"], true).is_some());
        assert!(tree.lookup(&["nope"], false).is_none());
    }

    #[test]
    fn argument_is_ignored_on_groups() {
        let group = Subcommand::group("g", vec![]).unwrap().argument(ArgumentSpec::required("x"));
        assert!(!group.is_leaf());
        let leaf = Subcommand::leaf("l", Noop).argument(ArgumentSpec::optional("x"));
        assert!(matches!(&leaf.kind, CommandKind::Leaf { arguments, .. } if arguments.len() == 1));
    }
}
