//! Token types and the token stream consumed by the parser

pub mod token;
pub mod token_stream;

pub use token::{quote_identifier, quote_string, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream};
