//! Subcommand resolution: walk the tree along the token stream.
//!
//! Each step saves a checkpoint, takes the next positional and looks for a
//! sibling with that name or alias. A match is gated (permission, then
//! predicate) and committed; a miss rewinds so the token stays available to
//! the leaf. With no match, the sibling set's default is used without
//! consuming anything.

use std::sync::Arc;

use thiserror::Error;

use crate::args::TokenStream;
use crate::command::gate::{check_permission, Gate, Invocation};
use crate::command::tree::{default_child, find_child, CommandKind, CommandTree, Handler, Subcommand};
use crate::error::{EngineError, Identifier, UserError};

/// Failure of a dispatch step.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Shown to the user; ends only this invocation.
    #[error(transparent)]
    User(#[from] UserError),

    /// Engine misuse; indicates a bug.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl DispatchError {
    pub fn user(&self) -> Option<&UserError> {
        match self {
            DispatchError::User(err) => Some(err),
            DispatchError::Engine(_) => None,
        }
    }
}

/// Where resolution stopped.
pub struct Resolution<'t> {
    /// Matched subcommand names below the root, canonical (not aliases).
    pub path: Vec<String>,
    pub target: &'t Subcommand,
    pub handler: &'t Arc<dyn Handler>,
}

impl std::fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("path", &self.path)
            .field("target", &self.target.name)
            .finish()
    }
}

pub struct SubcommandResolver<'t> {
    tree: &'t CommandTree,
    case_insensitive: bool,
}

/// Run the gates of `node` in order, stopping at the first rejection.
pub async fn check_gates(node: &Subcommand, invocation: &Invocation) -> Result<(), UserError> {
    check_permission(node.permission, invocation)?;
    if let Some(predicate) = &node.can_run {
        if let Gate::Deny(reason) = predicate.can_run(invocation).await {
            return Err(UserError::new(Identifier::PreconditionCanRun, reason)
                .with_context(serde_json::json!({ "command": node.name })));
        }
    }
    Ok(())
}

impl<'t> SubcommandResolver<'t> {
    pub fn new(tree: &'t CommandTree, case_insensitive: bool) -> Self {
        Self {
            tree,
            case_insensitive,
        }
    }

    pub async fn resolve(
        &self,
        stream: &mut TokenStream,
        invocation: &Invocation,
    ) -> Result<Resolution<'t>, DispatchError> {
        let mut node = self.tree.root();
        check_gates(node, invocation).await?;
        let mut path = Vec::new();

        loop {
            let children = match &node.kind {
                CommandKind::Leaf { run, .. } => {
                    tracing::debug!(path = ?path, command = %node.name, "Resolved leaf");
                    return Ok(Resolution {
                        path,
                        target: node,
                        handler: run,
                    });
                }
                CommandKind::Group { children } => children,
            };

            stream.save();
            let matched = stream
                .next()
                .and_then(|piece| find_child(children, &piece.value, self.case_insensitive));

            if let Some(child) = matched {
                if let Err(err) = check_gates(child, invocation).await {
                    stream.restore()?;
                    tracing::debug!(
                        command = %child.name,
                        identifier = %err.identifier,
                        "Subcommand rejected by gate"
                    );
                    return Err(err.into());
                }
                stream.discard()?;
                tracing::debug!(command = %child.name, "Matched subcommand");
                path.push(child.name.clone());
                node = child;
                continue;
            }

            stream.restore()?;
            let Some(fallback) = default_child(children) else {
                let available: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
                return Err(UserError::new(
                    Identifier::SubcommandRequired,
                    format!(
                        "'{}' needs a subcommand: {}",
                        node.name,
                        available.join(", ")
                    ),
                )
                .with_context(serde_json::json!({ "available": available, "path": path }))
                .into());
            };
            check_gates(fallback, invocation).await?;
            tracing::debug!(command = %fallback.name, "Falling back to default subcommand");
            path.push(fallback.name.clone());
            node = fallback;
        }
    }
}
