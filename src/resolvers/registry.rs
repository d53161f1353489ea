//! Resolver trait and registry: single source of truth for argument types.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{EngineError, UserError};
use crate::resolvers::builtin::{
    BooleanResolver, DateResolver, EnumResolver, FloatResolver, IntegerResolver, NumberResolver,
    StringResolver, UrlResolver,
};
use crate::resolvers::context::ArgumentContext;

/// Turns one token into a typed value.
///
/// Implementations must not depend on stream position and must report
/// expected validation failures as `Err(UserError)`. Resolvers that need an
/// external lookup (users, channels, roles) implement this same trait in the
/// embedding application.
#[async_trait]
pub trait Resolver: Send + Sync {
    type Output: Send + 'static;

    /// Registry key, e.g. `"integer"`.
    fn name(&self) -> &str;

    async fn run(
        &self,
        parameter: &str,
        context: &ArgumentContext,
    ) -> Result<Self::Output, UserError>;
}

/// Shared handle to a registered resolver producing `T`.
pub type ResolverHandle<T> = Arc<dyn Resolver<Output = T>>;

/// Adapter for synchronous closures; see [`resolver_fn`].
pub struct FnResolver<F, T> {
    name: String,
    func: F,
    _output: PhantomData<fn() -> T>,
}

/// Build a resolver from a plain function.
pub fn resolver_fn<F, T>(name: impl Into<String>, func: F) -> FnResolver<F, T>
where
    F: Fn(&str, &ArgumentContext) -> Result<T, UserError> + Send + Sync,
    T: Send + 'static,
{
    FnResolver {
        name: name.into(),
        func,
        _output: PhantomData,
    }
}

#[async_trait]
impl<F, T> Resolver for FnResolver<F, T>
where
    F: Fn(&str, &ArgumentContext) -> Result<T, UserError> + Send + Sync,
    T: Send + 'static,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, parameter: &str, context: &ArgumentContext) -> Result<T, UserError> {
        (self.func)(parameter, context)
    }
}

/// Name → resolver map. Built once, read-only during dispatch.
#[derive(Default)]
pub struct ResolverRegistry {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl ResolverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in resolver.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(StringResolver);
        registry.insert(IntegerResolver);
        registry.insert(FloatResolver);
        registry.insert(NumberResolver);
        registry.insert(BooleanResolver);
        registry.insert(DateResolver);
        registry.insert(EnumResolver);
        registry.insert(UrlResolver);
        registry
    }

    /// Register a resolver under its own name.
    pub fn register<R>(&mut self, resolver: R) -> Result<(), EngineError>
    where
        R: Resolver + 'static,
    {
        if self.contains(resolver.name()) {
            return Err(EngineError::DuplicateResolver {
                name: resolver.name().to_string(),
            });
        }
        self.insert(resolver);
        Ok(())
    }

    fn insert<R>(&mut self, resolver: R)
    where
        R: Resolver + 'static,
    {
        let name = resolver.name().to_string();
        let handle: ResolverHandle<R::Output> = Arc::new(resolver);
        tracing::trace!(resolver = %name, "Registered resolver");
        self.entries.insert(name, Box::new(handle));
    }

    /// Look up `name` as a resolver producing `T`.
    ///
    /// Returns `None` when the name is unknown or registered for another
    /// output type.
    pub fn get<T>(&self, name: &str) -> Option<ResolverHandle<T>>
    where
        T: Send + 'static,
    {
        self.entries
            .get(name)?
            .downcast_ref::<ResolverHandle<T>>()
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Identifier;

    #[test]
    fn builtins_are_registered() {
        let registry = ResolverRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["boolean", "date", "enum", "float", "integer", "number", "string", "url"]
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = ResolverRegistry::with_builtins();
        let err = registry
            .register(resolver_fn("integer", |p: &str, _: &ArgumentContext| {
                Ok(p.len() as i64)
            }))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateResolver { name: "integer".into() });
    }

    #[test]
    fn get_checks_output_type() {
        let registry = ResolverRegistry::with_builtins();
        assert!(registry.get::<i64>("integer").is_some());
        assert!(registry.get::<String>("integer").is_none());
        assert!(registry.get::<i64>("nope").is_none());
    }

    #[tokio::test]
    async fn closure_resolver_runs() {
        let mut registry = ResolverRegistry::new();
        registry
            .register(resolver_fn("upper", |p: &str, _: &ArgumentContext| {
                if p.is_empty() {
                    Err(UserError::new(Identifier::Custom("ArgumentUpperError".into()), "empty"))
                } else {
                    Ok(p.to_uppercase())
                }
            }))
            .unwrap();
        let upper = registry.get::<String>("upper").unwrap();
        let ctx = ArgumentContext::new();
        assert_eq!(upper.run("abc", &ctx).await.unwrap(), "ABC");
        assert!(upper.run("", &ctx).await.is_err());
    }
}
