// src/frontend/mod.rs
pub mod ast;
pub mod lexer;
mod parse_type;
pub mod parser;
pub mod token;

pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Span, Token, TokenType};
