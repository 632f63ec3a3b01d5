//! Folds a UTF-8 character stream into a lazy, finite sequence of tokens:
//! literals, identifiers, separators, operators, comments, and string
//! interpolation. See [`Lexer`] for the entry point.

pub mod cursor;
pub mod error;
mod lexer;
pub mod token;
pub mod unicode;

pub use cursor::Cursor;
pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
