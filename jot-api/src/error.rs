//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use thiserror::Error;

/// 词法错误（结构化）
pub use jot_core::json::error::LexError;

/// 结构错误（结构化）
pub use jot_core::json::error::BindError;

/// 格式化错误
pub use jot_core::json::error::FormatError;

/// Jot 错误类型
#[derive(Error, Debug, Clone)]
pub enum JotError {
    /// 词法分析错误（结构化）
    #[error("{0}")]
    Lex(#[from] LexError),

    /// 结构绑定错误（结构化）
    #[error("{0}")]
    Bind(#[from] BindError),

    /// 格式化错误
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// 配置参数非法（扫描开始前同步拒绝）
    #[error("Configuration error: {0}")]
    Config(String),

    /// 输入读取失败
    #[error("Input error: {0}")]
    Input(String),
}

impl JotError {
    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            JotError::Lex(_) => "lexer",
            JotError::Bind(_) => "binder",
            JotError::Format(_) => "formatter",
            JotError::Config(_) => "config",
            JotError::Input(_) => "input",
        }
    }

    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            JotError::Lex(e) => Some(e.line()),
            JotError::Bind(e) => e.line(),
            _ => None,
        }
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        match self {
            JotError::Lex(e) => Some(e.column()),
            JotError::Bind(e) => e.column(),
            _ => None,
        }
    }

    /// 转换为结构化错误报告
    ///
    /// 适用于 Web API、LSP 等需要结构化数据的场景。
    /// CLI 可以直接打印，上层应用可以自行序列化。
    pub fn to_report(&self) -> ErrorReport {
        let error_kind = match self {
            JotError::Lex(e) => format!("{:?}", e.kind),
            JotError::Bind(e) => format!("{:?}", e.kind),
            JotError::Format(e) => format!("{:?}", e),
            JotError::Config(_) => "InvalidConfiguration".to_string(),
            JotError::Input(_) => "InputFailure".to_string(),
        };

        ErrorReport {
            phase: self.phase(),
            line: self.line(),
            column: self.column(),
            error_kind,
            message: self.to_string(),
        }
    }
}

/// 结构化错误报告
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// 出错阶段
    pub phase: &'static str,
    /// 行号（1-based，如果有）
    pub line: Option<usize>,
    /// 列号（1-based，如果有）
    pub column: Option<usize>,
    /// 错误种类（调试名）
    pub error_kind: String,
    /// 人类可读消息
    pub message: String,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "[{}] {}:{} {}", self.phase, line, column, self.message)
            }
            _ => write!(f, "[{}] {}", self.phase, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jot_core::json::error::{BindErrorKind, LexErrorKind};
    use jot_core::SourcePosition;

    #[test]
    fn test_phase_names() {
        let pos = SourcePosition::start();
        let lex = JotError::from(LexError::at(LexErrorKind::IllegalNumber, pos));
        assert_eq!(lex.phase(), "lexer");

        let bind = JotError::from(BindError::at_eof(BindErrorKind::UnclosedGroup));
        assert_eq!(bind.phase(), "binder");

        let config = JotError::Config("bad".to_string());
        assert_eq!(config.phase(), "config");
    }

    #[test]
    fn test_line_column_from_lex_error() {
        let pos = SourcePosition::new(9, 2, 4, 9);
        let err = JotError::from(LexError::at(LexErrorKind::UnterminatedString, pos));
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.column(), Some(4));
    }

    #[test]
    fn test_report_contains_position() {
        let pos = SourcePosition::new(9, 2, 4, 9);
        let err = JotError::from(LexError::at(LexErrorKind::UnterminatedString, pos));
        let report = err.to_report();

        assert_eq!(report.phase, "lexer");
        assert_eq!(report.line, Some(2));
        assert!(report.to_string().contains("2:4"));
    }

    #[test]
    fn test_report_without_position() {
        let report = JotError::Config("max_depth must be at least 1".to_string()).to_report();
        assert_eq!(report.line, None);
        assert!(report.to_string().contains("max_depth"));
    }
}
