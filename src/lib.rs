//! Text-command argument parsing, typed resolution and subcommand dispatch.
//!
//! Build a [`command::CommandTree`], register resolvers in a
//! [`resolvers::ResolverRegistry`], and hand both to an [`engine::Engine`]:
//!
//! ```text
//! "remote add origin --force"
//!     │ lex + classify
//!     ▼
//! positionals [remote, add, origin]   flags {force}
//!     │ resolve (git > remote > add)
//!     ▼
//! Handler::run(args = [origin])
//! ```

pub mod args;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod resolvers;
