//! Self-contained resolvers that need no external lookup.

mod boolean;
mod date;
mod hyperlink;
pub(crate) mod numeric;
mod text;

pub use boolean::BooleanResolver;
pub use date::DateResolver;
pub use hyperlink::UrlResolver;
pub use numeric::{FloatResolver, IntegerResolver, NumberResolver};
pub use text::{EnumResolver, StringResolver};
