//! Per-call payload handed to a resolver.

use std::collections::HashMap;

/// Constraints and extra data for resolving one argument.
///
/// Numeric, length and date resolvers share `minimum`/`maximum`: numbers
/// compare by value, strings by character count, dates by millisecond
/// timestamp.
#[derive(Debug, Clone)]
pub struct ArgumentContext {
    /// Argument name, used in error context.
    pub argument: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Bounds are inclusive unless this is cleared.
    pub inclusive: bool,
    pub enum_values: Vec<String>,
    pub case_insensitive: bool,
    /// Extra words accepted as `true` by the boolean resolver.
    pub truths: Vec<String>,
    /// Extra words accepted as `false` by the boolean resolver.
    pub falses: Vec<String>,
    /// Identity of the invoking user, for domain resolvers.
    pub caller: Option<String>,
    pub extras: HashMap<String, serde_json::Value>,
}

impl Default for ArgumentContext {
    fn default() -> Self {
        Self {
            argument: None,
            minimum: None,
            maximum: None,
            inclusive: true,
            enum_values: Vec::new(),
            case_insensitive: false,
            truths: Vec::new(),
            falses: Vec::new(),
            caller: None,
            extras: HashMap::new(),
        }
    }
}

impl ArgumentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.inclusive = false;
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn truths<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.truths = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn falses<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.falses = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// JSON snapshot attached to resolver errors.
    pub(crate) fn error_context(&self) -> serde_json::Value {
        serde_json::json!({
            "argument": self.argument,
            "minimum": self.minimum,
            "maximum": self.maximum,
            "inclusive": self.inclusive,
        })
    }
}
