//! Storyscript Front End Library
//!
//! This library provides the lexer for the Storyscript language and the
//! lowering utility that hoists inline expressions into synthetic assignments.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod lowering;

// Re-export commonly used types
pub use ast::{Child, Leaf, LineId, NodeKind, Tree};
pub use compiler::CompilationState;
pub use error::{ErrorCollector, ErrorRecord, LexerError, StoryError, StoryResult};
pub use lexer::{tokenize, Lexer, Token, TokenKind, TokenValue};
pub use lowering::BlockLowering;
