//! Jot Core - Token pipeline (pure logic, no IO)
//!
//! Contains the scanner, lexer, grammar binder, and formatter for the JSON
//! surface format, plus the abstract token shape every surface format
//! shares. Only operates on in-memory data structures, no file IO or
//! terminal output.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod json;
pub mod kit;

// Re-export common types
pub use json::value::Value;
pub use kit::position::SourcePosition;
pub use kit::scanner::Scanner;
pub use kit::token::{Primitive, QualifiedName, Token, TokenKind};

// Re-export config types from jot-config
pub use jot_config::{Phase, ReaderOptions, SymbolTable, WriterOptions};
