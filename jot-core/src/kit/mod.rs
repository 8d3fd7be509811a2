//! 通用工具层
//!
//! 所有表层格式（JSON、XML、混合格式）共享的基础设施：
//! - 字符游标与位置追踪
//! - 抽象 token 形状

pub mod position;
pub mod scanner;
pub mod token;

pub use position::SourcePosition;
pub use scanner::Scanner;
pub use token::{Primitive, QualifiedName, Token, TokenKind};
