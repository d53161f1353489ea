//! Argument handling for one invocation.
//!
//! ```text
//! Raw text → Lex → Classify → TokenStream → Args (typed extraction)
//! ```
//!
//! Lexing and classification are pure functions of the input and the
//! configuration; the stream and facade are created per invocation.

mod classifier;
mod facade;
mod lexer;
mod stream;

pub use classifier::{Allow, ClassifiedPiece, ParsedArguments, Strategy};
pub use facade::Args;
pub use lexer::{Lexer, Piece, Pieces, DEFAULT_QUOTES};
pub use stream::TokenStream;
