//! JSON 表层格式
//!
//! 三段式管线：词法器（宽松）→ 绑定器（严格）→ 格式化器（严格）。
//! 词法层接受严格 JSON 禁止的构造（注释、单引号、未加引号的键），
//! 结构正确性由绑定器与格式化器实施，两层契约刻意分离。

pub mod binder;
pub mod error;
pub mod escape;
pub mod formatter;
pub mod lexer;
pub mod number;
pub mod value;

pub use binder::Binder;
pub use error::{
    BindError, BindErrorKind, BindResult, ErrorLocation, FormatError, FormatResult, LexError,
    LexErrorKind, LexResult,
};
pub use formatter::Formatter;
pub use lexer::{Lexeme, LexemeKind, Lexer};
pub use value::Value;
