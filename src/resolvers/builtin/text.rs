//! String and enum resolvers.

use async_trait::async_trait;

use crate::error::{Identifier, UserError};
use crate::resolvers::builtin::numeric::{check_range, OutOfRange};
use crate::resolvers::context::ArgumentContext;
use crate::resolvers::registry::Resolver;

/// Any text; `minimum`/`maximum` bound the length in characters.
pub struct StringResolver;

#[async_trait]
impl Resolver for StringResolver {
    type Output = String;

    fn name(&self) -> &str {
        "string"
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<String, UserError> {
        let length = parameter.chars().count();
        match check_range(length as f64, context) {
            None => Ok(parameter.to_string()),
            Some(OutOfRange::Below) => Err(UserError::new(
                Identifier::ArgumentStringTooShort,
                format!(
                    "The argument must be at least {} characters long.",
                    context.minimum.unwrap_or_default()
                ),
            )
            .with_parameter(parameter)
            .with_context(context.error_context())),
            Some(OutOfRange::Above) => Err(UserError::new(
                Identifier::ArgumentStringTooLong,
                format!(
                    "The argument must be at most {} characters long.",
                    context.maximum.unwrap_or_default()
                ),
            )
            .with_parameter(parameter)
            .with_context(context.error_context())),
        }
    }
}

/// One of `context.enum_values`; returns the value as declared.
pub struct EnumResolver;

#[async_trait]
impl Resolver for EnumResolver {
    type Output = String;

    fn name(&self) -> &str {
        "enum"
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<String, UserError> {
        if context.enum_values.is_empty() {
            return Err(UserError::new(
                Identifier::ArgumentEnumEmptyError,
                "No values were declared for this argument.",
            )
            .with_parameter(parameter));
        }

        let found = if context.case_insensitive {
            let lowered = parameter.to_lowercase();
            context
                .enum_values
                .iter()
                .find(|value| value.to_lowercase() == lowered)
        } else {
            context.enum_values.iter().find(|value| *value == parameter)
        };

        found.cloned().ok_or_else(|| {
            UserError::new(
                Identifier::ArgumentEnumError,
                format!(
                    "The argument must be one of: {}.",
                    context.enum_values.join(", ")
                ),
            )
            .with_parameter(parameter)
            .with_context(serde_json::json!({
                "enum": context.enum_values,
                "caseInsensitive": context.case_insensitive,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn string_length_counts_chars() {
        let ctx = ArgumentContext::new().minimum(2.0).maximum(3.0);
        assert_eq!(StringResolver.run("äöü", &ctx).await.unwrap(), "äöü");
        assert_eq!(
            StringResolver.run("a", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentStringTooShort
        );
        assert_eq!(
            StringResolver.run("abcd", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentStringTooLong
        );
    }

    #[tokio::test]
    async fn enum_matching() {
        let ctx = ArgumentContext::new().one_of(["Red", "Green"]);
        assert_eq!(EnumResolver.run("Red", &ctx).await.unwrap(), "Red");
        assert_eq!(
            EnumResolver.run("red", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentEnumError
        );
        let ctx = ctx.case_insensitive();
        assert_eq!(EnumResolver.run("GREEN", &ctx).await.unwrap(), "Green");
    }

    #[tokio::test]
    async fn enum_without_values() {
        let err = EnumResolver.run("x", &ArgumentContext::new()).await.unwrap_err();
        assert_eq!(err.identifier, Identifier::ArgumentEnumEmptyError);
    }
}
