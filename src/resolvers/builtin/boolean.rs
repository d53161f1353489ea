use async_trait::async_trait;

use crate::error::{Identifier, UserError};
use crate::resolvers::context::ArgumentContext;
use crate::resolvers::registry::Resolver;

const TRUTHS: [&str; 9] = ["true", "t", "yes", "y", "on", "enable", "enabled", "1", "+"];
const FALSES: [&str; 9] = ["false", "f", "no", "n", "off", "disable", "disabled", "0", "-"];

fn contains_word<'a>(defaults: &[&str], extra: impl IntoIterator<Item = &'a String>, word: &str) -> bool {
    defaults.iter().any(|d| *d == word) || extra.into_iter().any(|e| e.to_lowercase() == word)
}

/// Case-insensitive boolean words; the context adds to the default sets.
pub struct BooleanResolver;

#[async_trait]
impl Resolver for BooleanResolver {
    type Output = bool;

    fn name(&self) -> &str {
        "boolean"
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<bool, UserError> {
        let word = parameter.to_lowercase();
        if contains_word(&TRUTHS, &context.truths, &word) {
            return Ok(true);
        }
        if contains_word(&FALSES, &context.falses, &word) {
            return Ok(false);
        }
        Err(UserError::new(
            Identifier::ArgumentBooleanError,
            "The argument did not resolve to a boolean.",
        )
        .with_parameter(parameter)
        .with_context(serde_json::json!({
            "truths": context.truths,
            "falses": context.falses,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_are_case_insensitive() {
        let ctx = ArgumentContext::new();
        for word in ["YES", "on", "Enabled", "+"] {
            assert!(BooleanResolver.run(word, &ctx).await.unwrap(), "{word}");
        }
        for word in ["No", "OFF", "0", "-"] {
            assert!(!BooleanResolver.run(word, &ctx).await.unwrap(), "{word}");
        }
    }

    #[tokio::test]
    async fn custom_words_merge_with_defaults() {
        let ctx = ArgumentContext::new().truths(["Sure"]).falses(["nah"]);
        assert!(BooleanResolver.run("sure", &ctx).await.unwrap());
        assert!(!BooleanResolver.run("NAH", &ctx).await.unwrap());
        assert!(BooleanResolver.run("yes", &ctx).await.unwrap());
        assert_eq!(
            BooleanResolver.run("maybe", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentBooleanError
        );
    }
}
