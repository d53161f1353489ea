use async_trait::async_trait;
use url::Url;

use crate::error::{Identifier, UserError};
use crate::resolvers::context::ArgumentContext;
use crate::resolvers::registry::Resolver;

/// Absolute URL (`scheme:…`).
pub struct UrlResolver;

#[async_trait]
impl Resolver for UrlResolver {
    type Output = Url;

    fn name(&self) -> &str {
        "url"
    }

    async fn run(&self, parameter: &str, _context: &ArgumentContext) -> Result<Url, UserError> {
        Url::parse(parameter).map_err(|e| {
            UserError::new(
                Identifier::ArgumentHyperlinkError,
                "The argument did not resolve to a valid URL.",
            )
            .with_parameter(parameter)
            .with_context(serde_json::json!({ "reason": e.to_string() }))
        })
    }
}
