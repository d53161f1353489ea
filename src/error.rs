//! Error types shared by the parsing, resolution and dispatch stages.
//!
//! Two classes exist:
//!
//! - [`UserError`]: validation and gate failures caused by the invocation
//!   text or the caller. They are returned as values and shown to the user.
//! - [`EngineError`]: misuse or malformed registration (duplicate resolver,
//!   bad command tree, restore without a checkpoint). These are bugs in the
//!   embedding application, not user input.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Stable identifier attached to every [`UserError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    ArgsMissing,
    ArgsUnavailable,
    ArgumentStringTooShort,
    ArgumentStringTooLong,
    ArgumentIntegerError,
    ArgumentIntegerTooSmall,
    ArgumentIntegerTooLarge,
    ArgumentFloatError,
    ArgumentFloatTooSmall,
    ArgumentFloatTooLarge,
    ArgumentNumberError,
    ArgumentNumberTooSmall,
    ArgumentNumberTooLarge,
    ArgumentBooleanError,
    ArgumentDateError,
    ArgumentDateTooEarly,
    ArgumentDateTooFar,
    ArgumentEnumEmptyError,
    ArgumentEnumError,
    ArgumentHyperlinkError,
    PreconditionPermissionLevel,
    PreconditionCanRun,
    SubcommandRequired,
    SubcommandNotFound,
    /// Identifier owned by an application-supplied resolver or handler.
    Custom(String),
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::ArgsMissing => "ArgsMissing",
            Identifier::ArgsUnavailable => "ArgsUnavailable",
            Identifier::ArgumentStringTooShort => "ArgumentStringTooShort",
            Identifier::ArgumentStringTooLong => "ArgumentStringTooLong",
            Identifier::ArgumentIntegerError => "ArgumentIntegerError",
            Identifier::ArgumentIntegerTooSmall => "ArgumentIntegerTooSmall",
            Identifier::ArgumentIntegerTooLarge => "ArgumentIntegerTooLarge",
            Identifier::ArgumentFloatError => "ArgumentFloatError",
            Identifier::ArgumentFloatTooSmall => "ArgumentFloatTooSmall",
            Identifier::ArgumentFloatTooLarge => "ArgumentFloatTooLarge",
            Identifier::ArgumentNumberError => "ArgumentNumberError",
            Identifier::ArgumentNumberTooSmall => "ArgumentNumberTooSmall",
            Identifier::ArgumentNumberTooLarge => "ArgumentNumberTooLarge",
            Identifier::ArgumentBooleanError => "ArgumentBooleanError",
            Identifier::ArgumentDateError => "ArgumentDateError",
            Identifier::ArgumentDateTooEarly => "ArgumentDateTooEarly",
            Identifier::ArgumentDateTooFar => "ArgumentDateTooFar",
            Identifier::ArgumentEnumEmptyError => "ArgumentEnumEmptyError",
            Identifier::ArgumentEnumError => "ArgumentEnumError",
            Identifier::ArgumentHyperlinkError => "ArgumentHyperlinkError",
            Identifier::PreconditionPermissionLevel => "Preconditions.PermissionLevel",
            Identifier::PreconditionCanRun => "Preconditions.CanRun",
            Identifier::SubcommandRequired => "SubcommandRequired",
            Identifier::SubcommandNotFound => "SubcommandNotFound",
            Identifier::Custom(name) => name,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A user-facing failure: bad argument, missing subcommand, rejected gate.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct UserError {
    pub identifier: Identifier,
    pub message: String,
    /// The token that caused the failure, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl UserError {
    pub fn new(identifier: Identifier, message: impl Into<String>) -> Self {
        Self {
            identifier,
            message: message.into(),
            parameter: None,
            context: None,
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Check the identifier without caring about the message.
    pub fn is(&self, identifier: &Identifier) -> bool {
        &self.identifier == identifier
    }
}

/// Programmer and registration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Resolver '{name}' is already registered")]
    DuplicateResolver { name: String },

    #[error("Command name must not be empty")]
    EmptyName,

    #[error("'{alias}' is used by more than one subcommand under '{parent}'")]
    DuplicateAlias { parent: String, alias: String },

    #[error("More than one default subcommand under '{parent}': {names:?}")]
    MultipleDefaults { parent: String, names: Vec<String> },

    #[error("No outstanding checkpoint to {operation}")]
    NoCheckpoint { operation: &'static str },

    #[error("'{name}' must declare either a handler or children, not both or neither")]
    InvalidShape { name: String },

    #[error("Handler '{name}' is not registered")]
    UnknownHandler { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_strings_are_stable() {
        assert_eq!(
            Identifier::PreconditionPermissionLevel.as_str(),
            "Preconditions.PermissionLevel"
        );
        assert_eq!(
            Identifier::ArgumentIntegerTooSmall.to_string(),
            "ArgumentIntegerTooSmall"
        );
        assert_eq!(Identifier::Custom("ArgumentUserError".into()).as_str(), "ArgumentUserError");
    }

    #[test]
    fn user_error_serializes_identifier_as_string() {
        let err = UserError::new(Identifier::ArgsMissing, "missing")
            .with_parameter("abc");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["identifier"], "ArgsMissing");
        assert_eq!(json["parameter"], "abc");
        assert!(json.get("context").is_none());
    }
}
