//! Typed argument resolution.
//!
//! ```text
//! piece ──► Resolver::run(piece, ArgumentContext) ──► T | UserError
//! ```
//!
//! Resolvers are looked up by name in a [`ResolverRegistry`] and produce a
//! Rust type chosen at the call site (`args.pick::<i64>("integer", …)`).

pub mod builtin;
mod context;
mod registry;

pub use context::ArgumentContext;
pub use registry::{resolver_fn, FnResolver, Resolver, ResolverHandle, ResolverRegistry};
