//! Access gates: permission levels and custom predicates.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Identifier, UserError};

/// Ordered rank gating command access. Higher is more privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionLevel(pub u8);

impl PermissionLevel {
    pub const EVERYONE: Self = Self(0);
    pub const REGULAR: Self = Self(1);
    pub const MODERATOR: Self = Self(5);
    pub const ADMINISTRATOR: Self = Self(7);
    pub const OWNER: Self = Self(10);
}

impl Default for PermissionLevel {
    fn default() -> Self {
        Self::EVERYONE
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is invoking the command. Created per invocation by the caller, which
/// also computes the permission level.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub caller: Option<String>,
    pub level: PermissionLevel,
}

impl Invocation {
    pub fn new(level: PermissionLevel) -> Self {
        Self {
            caller: None,
            level,
        }
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }
}

/// Verdict of a [`CanRun`] predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Allow,
    /// Rejected; the reason is shown to the user.
    Deny(String),
}

/// Custom access predicate attached to a subcommand.
#[async_trait]
pub trait CanRun: Send + Sync {
    async fn can_run(&self, invocation: &Invocation) -> Gate;
}

#[async_trait]
impl<F> CanRun for F
where
    F: Fn(&Invocation) -> Gate + Send + Sync,
{
    async fn can_run(&self, invocation: &Invocation) -> Gate {
        self(invocation)
    }
}

/// Compare the declared requirement with the caller's level.
pub fn check_permission(
    required: Option<PermissionLevel>,
    invocation: &Invocation,
) -> Result<(), UserError> {
    match required {
        Some(required) if invocation.level < required => Err(UserError::new(
            Identifier::PreconditionPermissionLevel,
            "You do not have permission to use this command.",
        )
        .with_context(serde_json::json!({
            "required": required.0,
            "actual": invocation.level.0,
        }))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(PermissionLevel::REGULAR < PermissionLevel::MODERATOR);
        assert!(PermissionLevel::OWNER > PermissionLevel::ADMINISTRATOR);
    }

    #[test]
    fn permission_check() {
        let regular = Invocation::new(PermissionLevel::REGULAR);
        assert!(check_permission(None, &regular).is_ok());
        assert!(check_permission(Some(PermissionLevel::REGULAR), &regular).is_ok());
        let err = check_permission(Some(PermissionLevel::MODERATOR), &regular).unwrap_err();
        assert_eq!(err.identifier, Identifier::PreconditionPermissionLevel);
        assert_eq!(err.context.unwrap()["required"], 5);
    }

    #[tokio::test]
    async fn closures_are_predicates() {
        let only_alice = |inv: &Invocation| {
            if inv.caller.as_deref() == Some("alice") {
                Gate::Allow
            } else {
                Gate::Deny("Only alice may do this.".into())
            }
        };
        let alice = Invocation::default().with_caller("alice");
        assert_eq!(only_alice.can_run(&alice).await, Gate::Allow);
        assert!(matches!(
            only_alice.can_run(&Invocation::default()).await,
            Gate::Deny(reason) if reason.contains("alice")
        ));
    }
}
