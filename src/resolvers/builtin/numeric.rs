//! Integer, float and number resolvers.

use async_trait::async_trait;

use crate::error::{Identifier, UserError};
use crate::resolvers::context::ArgumentContext;
use crate::resolvers::registry::Resolver;

/// Which side of the allowed range a value fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutOfRange {
    Below,
    Above,
}

/// Compare `value` against the context bounds.
pub(crate) fn check_range(value: f64, context: &ArgumentContext) -> Option<OutOfRange> {
    if let Some(min) = context.minimum {
        let below = if context.inclusive { value < min } else { value <= min };
        if below {
            return Some(OutOfRange::Below);
        }
    }
    if let Some(max) = context.maximum {
        let above = if context.inclusive { value > max } else { value >= max };
        if above {
            return Some(OutOfRange::Above);
        }
    }
    None
}

/// Error identifiers for one numeric resolver.
struct NumericIds {
    invalid: Identifier,
    too_small: Identifier,
    too_large: Identifier,
    kind: &'static str,
}

fn range_error(
    ids: &NumericIds,
    side: OutOfRange,
    parameter: &str,
    context: &ArgumentContext,
) -> UserError {
    let (identifier, message) = match side {
        OutOfRange::Below => (
            ids.too_small.clone(),
            format!(
                "The given {} must be greater than {}{}",
                ids.kind,
                if context.inclusive { "or equal to " } else { "" },
                context.minimum.unwrap_or_default()
            ),
        ),
        OutOfRange::Above => (
            ids.too_large.clone(),
            format!(
                "The given {} must be less than {}{}",
                ids.kind,
                if context.inclusive { "or equal to " } else { "" },
                context.maximum.unwrap_or_default()
            ),
        ),
    };
    UserError::new(identifier, message)
        .with_parameter(parameter)
        .with_context(context.error_context())
}

fn invalid(ids: &NumericIds, parameter: &str, context: &ArgumentContext) -> UserError {
    UserError::new(
        ids.invalid.clone(),
        format!("The argument did not resolve to a valid {}.", ids.kind),
    )
    .with_parameter(parameter)
    .with_context(context.error_context())
}

fn resolve_finite(
    ids: &NumericIds,
    parameter: &str,
    context: &ArgumentContext,
) -> Result<f64, UserError> {
    let value = parameter
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(ids, parameter, context))?;
    match check_range(value, context) {
        Some(side) => Err(range_error(ids, side, parameter, context)),
        None => Ok(value),
    }
}

/// Accepts `42`, `-7` and integral exponent forms such as `1e3`.
fn parse_integer(parameter: &str) -> Option<i64> {
    if let Ok(value) = parameter.parse::<i64>() {
        return Some(value);
    }
    let value = parameter.parse::<f64>().ok()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

pub struct IntegerResolver;

#[async_trait]
impl Resolver for IntegerResolver {
    type Output = i64;

    fn name(&self) -> &str {
        "integer"
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<i64, UserError> {
        let ids = NumericIds {
            invalid: Identifier::ArgumentIntegerError,
            too_small: Identifier::ArgumentIntegerTooSmall,
            too_large: Identifier::ArgumentIntegerTooLarge,
            kind: "integer",
        };
        let value = parse_integer(parameter).ok_or_else(|| invalid(&ids, parameter, context))?;
        match check_range(value as f64, context) {
            Some(side) => Err(range_error(&ids, side, parameter, context)),
            None => Ok(value),
        }
    }
}

pub struct FloatResolver;

#[async_trait]
impl Resolver for FloatResolver {
    type Output = f64;

    fn name(&self) -> &str {
        "float"
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<f64, UserError> {
        let ids = NumericIds {
            invalid: Identifier::ArgumentFloatError,
            too_small: Identifier::ArgumentFloatTooSmall,
            too_large: Identifier::ArgumentFloatTooLarge,
            kind: "float",
        };
        resolve_finite(&ids, parameter, context)
    }
}

pub struct NumberResolver;

#[async_trait]
impl Resolver for NumberResolver {
    type Output = f64;

    fn name(&self) -> &str {
        "number"
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<f64, UserError> {
        let ids = NumericIds {
            invalid: Identifier::ArgumentNumberError,
            too_small: Identifier::ArgumentNumberTooSmall,
            too_large: Identifier::ArgumentNumberTooLarge,
            kind: "number",
        };
        resolve_finite(&ids, parameter, context)
    }
}
