//! JSON 管线错误类型
//!
//! 两层契约：
//! - 词法错误携带违规 token 起始处的绝对偏移/行/列，扫描不可恢复；
//! - 结构错误指认违规 token 的位置。
//! 所有错误不做内部重试；失败后的游标复读同一错误。

use crate::kit::position::SourcePosition;
use crate::kit::token::TokenKind;

/// 词法错误，定位在违规 token 的起始字符
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    /// 错误类型
    pub kind: LexErrorKind,
    /// 违规 token 的起始位置
    pub position: SourcePosition,
}

/// 词法错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    /// 字符串未终结（定位于开引号）
    UnterminatedString,
    /// 块注释未终结（定位于 `/*`）
    UnterminatedComment,
    /// 字符串内出现原始控制字符（制表符除外）
    ControlCharacter(char),
    /// 数字格式非法
    IllegalNumber,
    /// 标识符不在关键字集合内
    IllegalKeyword(String),
    /// 此处不允许的字符
    IllegalCharacter(char),
}

impl LexError {
    /// 在指定位置创建错误
    pub fn at(kind: LexErrorKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    /// 绝对字符偏移（0-based）
    pub fn index(&self) -> usize {
        self.position.index
    }

    /// 行号（1-based）
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 列号（1-based）
    pub fn column(&self) -> usize {
        self.position.column
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.position)?;

        match &self.kind {
            LexErrorKind::UnterminatedString => write!(f, "Unterminated string literal")?,
            LexErrorKind::UnterminatedComment => write!(f, "Unterminated block comment")?,
            LexErrorKind::ControlCharacter(c) => {
                write!(f, "Raw control character U+{:04X} in string literal", *c as u32)?
            }
            LexErrorKind::IllegalNumber => write!(f, "Illegal number")?,
            LexErrorKind::IllegalKeyword(word) => write!(f, "Illegal keyword '{}'", word)?,
            LexErrorKind::IllegalCharacter(c) => write!(f, "Illegal character '{}'", c)?,
        }

        write!(f, " (offset {})", self.position.index)
    }
}

impl std::error::Error for LexError {}

/// 结构错误位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorLocation {
    /// 违规 token 的起始位置
    At(SourcePosition),
    /// 输入结束处
    Eof,
}

/// 结构（绑定）错误
#[derive(Debug, Clone, PartialEq)]
pub struct BindError {
    /// 错误类型
    pub kind: BindErrorKind,
    /// 违规 token 的位置
    pub location: ErrorLocation,
}

/// 结构错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum BindErrorKind {
    /// 词法层失败，绑定随之终止
    Lexical(LexError),
    /// 意外的 token 种类
    UnexpectedToken {
        found: String,
        expected: Vec<String>,
    },
    /// 未曾打开的分组结束标记
    ExtraEnd { found: TokenKind },
    /// 结束标记与打开的分组不匹配
    MismatchedEnd {
        expected: TokenKind,
        found: TokenKind,
    },
    /// 两个值之间缺少逗号
    MissingComma,
    /// 不被任何值跟随的逗号（双逗号、前导逗号、顶层逗号）
    UnexpectedComma,
    /// 闭合标记之前的尾随逗号
    TrailingComma,
    /// 期待逗号或值处出现冒号
    UnexpectedColon,
    /// 嵌套超过配置上限
    DepthExceeded { limit: usize },
    /// 输入结束时仍有未闭合分组
    UnclosedGroup,
    /// 期待值处输入结束
    UnexpectedEndOfInput,
    /// 符号常量绑定失败（别名、标识符名、数值均未命中）
    UnknownSymbol { text: String },
}

impl BindError {
    /// 在指定位置创建错误
    pub fn at(kind: BindErrorKind, position: SourcePosition) -> Self {
        Self {
            kind,
            location: ErrorLocation::At(position),
        }
    }

    /// 在输入末尾创建错误
    pub fn at_eof(kind: BindErrorKind) -> Self {
        Self {
            kind,
            location: ErrorLocation::Eof,
        }
    }

    /// 获取行号（如果可用）
    pub fn line(&self) -> Option<usize> {
        match &self.location {
            ErrorLocation::At(pos) => Some(pos.line),
            ErrorLocation::Eof => None,
        }
    }

    /// 获取列号（如果可用）
    pub fn column(&self) -> Option<usize> {
        match &self.location {
            ErrorLocation::At(pos) => Some(pos.column),
            ErrorLocation::Eof => None,
        }
    }
}

impl From<LexError> for BindError {
    fn from(error: LexError) -> Self {
        let position = error.position;
        BindError::at(BindErrorKind::Lexical(error), position)
    }
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location_prefix = match &self.location {
            ErrorLocation::At(pos) => pos.to_string(),
            ErrorLocation::Eof => "EOF".to_string(),
        };

        let message = match &self.kind {
            BindErrorKind::Lexical(e) => return write!(f, "{}", e),
            BindErrorKind::UnexpectedToken { found, expected } => {
                if expected.is_empty() {
                    format!("Unexpected {found}")
                } else {
                    format!("Unexpected {}, expected: {}", found, expected.join(", "))
                }
            }
            BindErrorKind::ExtraEnd { found } => {
                format!("{found} does not close any open group")
            }
            BindErrorKind::MismatchedEnd { expected, found } => {
                format!("Expected {expected} to close the open group, found {found}")
            }
            BindErrorKind::MissingComma => "Missing ',' between values".to_string(),
            BindErrorKind::UnexpectedComma => "Unexpected ','".to_string(),
            BindErrorKind::TrailingComma => "Trailing ',' before closing marker".to_string(),
            BindErrorKind::UnexpectedColon => "Unexpected ':'".to_string(),
            BindErrorKind::DepthExceeded { limit } => {
                format!("Nesting depth exceeds the configured maximum of {limit}")
            }
            BindErrorKind::UnclosedGroup => "Unclosed group at end of input".to_string(),
            BindErrorKind::UnexpectedEndOfInput => "Unexpected end of input".to_string(),
            BindErrorKind::UnknownSymbol { text } => {
                format!("'{text}' does not name a declared constant")
            }
        };

        write!(f, "[{location_prefix}] {message}")
    }
}

impl std::error::Error for BindError {}

/// 格式化（输出）错误
///
/// 输出侧没有源位置；错误按当前回放上下文描述。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("{found} does not close any open group")]
    EndWithoutBegin { found: TokenKind },

    #[error("Expected {expected} to close the open group, found {found}")]
    MismatchedEnd {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("Property token outside an object group")]
    PropertyOutsideObject,

    #[error("Unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
    },

    #[error("Nesting depth exceeds the configured maximum of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Value {value} does not name a declared constant")]
    UnknownSymbol { value: i64 },

    #[error("Output sink failure: {0}")]
    Sink(#[from] std::fmt::Error),
}

/// 词法结果类型
pub type LexResult<T> = Result<T, LexError>;

/// 绑定结果类型
pub type BindResult<T> = Result<T, BindError>;

/// 格式化结果类型
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_accessors() {
        let pos = SourcePosition::new(42, 3, 7, 42);
        let err = LexError::at(LexErrorKind::UnterminatedString, pos);

        assert_eq!(err.index(), 42);
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 7);
    }

    #[test]
    fn test_lex_error_display() {
        let pos = SourcePosition::new(10, 2, 5, 10);
        let err = LexError::at(LexErrorKind::IllegalCharacter('@'), pos);

        let display = err.to_string();
        assert!(display.contains("2:5"));
        assert!(display.contains("'@'"));
        assert!(display.contains("offset 10"));
    }

    #[test]
    fn test_bind_error_at_location() {
        let pos = SourcePosition::new(5, 1, 6, 5);
        let err = BindError::at(BindErrorKind::MissingComma, pos);

        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(6));
        assert!(err.to_string().contains("Missing ','"));
    }

    #[test]
    fn test_bind_error_at_eof() {
        let err = BindError::at_eof(BindErrorKind::UnclosedGroup);

        assert_eq!(err.line(), None);
        assert_eq!(err.column(), None);
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn test_bind_error_from_lex_error() {
        let pos = SourcePosition::new(0, 1, 1, 0);
        let lex = LexError::at(LexErrorKind::IllegalNumber, pos);
        let bind = BindError::from(lex.clone());

        assert_eq!(bind.line(), Some(1));
        assert!(matches!(bind.kind, BindErrorKind::Lexical(e) if e == lex));
    }

    #[test]
    fn test_format_error_display() {
        let err = FormatError::EndWithoutBegin {
            found: TokenKind::ArrayEnd,
        };
        assert!(err.to_string().contains("']'"));

        let err = FormatError::DepthExceeded { limit: 4 };
        assert!(err.to_string().contains("4"));
    }
}
