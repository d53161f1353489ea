//! Args facade: typed extraction over a [`TokenStream`].
//!
//! `Args` dereferences to its stream, so `next`, `save`, `restore`,
//! `has_flags` and friends are available directly. Typed extraction never
//! moves the cursor when resolution fails.

use std::ops::{Deref, DerefMut};

use crate::args::stream::TokenStream;
use crate::error::{Identifier, UserError};
use crate::resolvers::{ArgumentContext, ResolverHandle, ResolverRegistry};

pub struct Args<'r> {
    stream: TokenStream,
    registry: &'r ResolverRegistry,
}

impl Deref for Args<'_> {
    type Target = TokenStream;

    fn deref(&self) -> &TokenStream {
        &self.stream
    }
}

impl DerefMut for Args<'_> {
    fn deref_mut(&mut self) -> &mut TokenStream {
        &mut self.stream
    }
}

fn missing(resolver: &str, context: &ArgumentContext) -> UserError {
    UserError::new(Identifier::ArgsMissing, "There are no more arguments.").with_context(
        serde_json::json!({ "resolver": resolver, "argument": context.argument }),
    )
}

impl<'r> Args<'r> {
    pub fn new(stream: TokenStream, registry: &'r ResolverRegistry) -> Self {
        Self { stream, registry }
    }

    pub fn registry(&self) -> &'r ResolverRegistry {
        self.registry
    }

    pub fn into_stream(self) -> TokenStream {
        self.stream
    }

    fn resolver<T>(&self, name: &str) -> Result<ResolverHandle<T>, UserError>
    where
        T: Send + 'static,
    {
        self.registry.get::<T>(name).ok_or_else(|| {
            UserError::new(
                Identifier::ArgsUnavailable,
                format!("The argument type '{name}' is not available."),
            )
        })
    }

    /// Resolve the next positional with `resolver` and consume it.
    pub async fn pick<T>(&mut self, resolver: &str, context: &ArgumentContext) -> Result<T, UserError>
    where
        T: Send + 'static,
    {
        let value = self.peek_typed(resolver, context).await?;
        self.stream.advance(1);
        Ok(value)
    }

    /// Resolve the next positional without consuming it.
    pub async fn peek_typed<T>(
        &self,
        resolver: &str,
        context: &ArgumentContext,
    ) -> Result<T, UserError>
    where
        T: Send + 'static,
    {
        let handle = self.resolver::<T>(resolver)?;
        let piece = self.stream.peek().ok_or_else(|| missing(resolver, context))?;
        handle.run(&piece.value, context).await
    }

    /// Like [`pick`](Self::pick), but an empty stream or a token that does
    /// not resolve yields `Ok(None)`. Only an unavailable resolver is an error.
    pub async fn pick_optional<T>(
        &mut self,
        resolver: &str,
        context: &ArgumentContext,
    ) -> Result<Option<T>, UserError>
    where
        T: Send + 'static,
    {
        let handle = self.resolver::<T>(resolver)?;
        let Some(piece) = self.stream.peek() else {
            return Ok(None);
        };
        match handle.run(&piece.value, context).await {
            Ok(value) => {
                self.stream.advance(1);
                Ok(Some(value))
            }
            Err(err) => {
                tracing::trace!(identifier = %err.identifier, "Optional argument did not resolve");
                Ok(None)
            }
        }
    }

    /// Resolve consecutive positionals until one fails, the stream ends, or
    /// `times` values were taken. The failing token is left in place.
    pub async fn repeat<T>(
        &mut self,
        resolver: &str,
        context: &ArgumentContext,
        times: Option<usize>,
    ) -> Result<Vec<T>, UserError>
    where
        T: Send + 'static,
    {
        let handle = self.resolver::<T>(resolver)?;
        let limit = times.unwrap_or(usize::MAX);
        let mut values = Vec::new();
        let mut first_error = None;

        while values.len() < limit {
            let Some(piece) = self.stream.peek() else {
                break;
            };
            match handle.run(&piece.value, context).await {
                Ok(value) => {
                    values.push(value);
                    self.stream.advance(1);
                }
                Err(err) => {
                    first_error = Some(err);
                    break;
                }
            }
        }

        if values.is_empty() {
            return Err(first_error.unwrap_or_else(|| missing(resolver, context)));
        }
        Ok(values)
    }

    /// Join every remaining positional, keeping the original spacing, and
    /// resolve the result once. Nothing is consumed on failure.
    pub async fn rest<T>(&mut self, resolver: &str, context: &ArgumentContext) -> Result<T, UserError>
    where
        T: Send + 'static,
    {
        let handle = self.resolver::<T>(resolver)?;
        let pieces = self.stream.remaining_pieces();
        let Some((first, others)) = pieces.split_first() else {
            return Err(missing(resolver, context));
        };

        let mut joined = first.value.clone();
        for piece in others {
            joined.push_str(&piece.leading);
            joined.push_str(&piece.value);
        }
        let count = pieces.len();

        let value = handle.run(&joined, context).await?;
        self.stream.advance(count);
        Ok(value)
    }
}
