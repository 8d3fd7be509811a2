//! Jot API - Orchestration layer
//!
//! Provides unified one-call entry points over the core pipeline:
//! - decode: text → validated `Value` tree (single document or stream)
//! - encode: `Value` tree → text
//! - transcode: text → text, replayed over the token seam
//! - unified error handling (`JotError`)
//!
//! For host convenience, this crate also provides a global options
//! singleton. For library use, prefer the explicit `*_with` APIs.

use tracing::debug;

use jot_core::json::binder::Binder;
use jot_core::json::error::{BindError, BindErrorKind};
use jot_core::json::formatter::Formatter;

// Re-export config
pub mod config;
pub use config::{init as init_options, is_initialized, options as global_options, RunOptions};

// Re-export config types from jot_config
pub use jot_config::{
    LogConfig, LogLevel, Phase, ReaderOptions, SymbolEntry, SymbolTable, WriterOptions,
};

// Re-export error types
pub mod error;
pub use error::{BindError as StructuralError, ErrorReport, JotError};

pub mod logging;
pub use logging::LogFormat;

// Re-export core types
pub use jot_config;
pub use jot_core;
pub use jot_core::{Primitive, QualifiedName, Token, TokenKind, Value};

/// Parse one JSON document with explicit options
///
/// Rejects trailing content after the first top-level value; use
/// [`parse_all_with`] for a sequence of independent values.
pub fn parse_str_with(text: &str, options: &ReaderOptions) -> Result<Value, JotError> {
    validate_reader(options)?;

    let mut binder = Binder::with_options(text, options.clone());
    let value = match binder.next_value()? {
        Some(value) => value,
        None => {
            return Err(JotError::Bind(BindError::at_eof(
                BindErrorKind::UnexpectedEndOfInput,
            )))
        }
    };

    // 单文档：值之后必须是输入结束
    if let Some(extra) = binder.next_token()? {
        return Err(JotError::Bind(BindError::at(
            BindErrorKind::UnexpectedToken {
                found: extra.kind().as_str().to_string(),
                expected: vec!["end of input".to_string()],
            },
            binder.last_position(),
        )));
    }

    debug!(target: "jot::api", kind = value.kind_name(), "Parsed document");
    Ok(value)
}

/// Parse one JSON document with default options
pub fn parse_str(text: &str) -> Result<Value, JotError> {
    parse_str_with(text, &ReaderOptions::default())
}

/// Parse a whole source as a sequence of independent top-level values
pub fn parse_all_with(text: &str, options: &ReaderOptions) -> Result<Vec<Value>, JotError> {
    validate_reader(options)?;

    let mut binder = Binder::with_options(text, options.clone());
    let mut values = Vec::new();
    while let Some(value) = binder.next_value()? {
        values.push(value);
    }
    Ok(values)
}

/// Parse a whole source as a sequence with default options
pub fn parse_all(text: &str) -> Result<Vec<Value>, JotError> {
    parse_all_with(text, &ReaderOptions::default())
}

/// Drain a character stream and parse one document
///
/// All IO buffering is the caller's business; this helper simply reads
/// the stream to the end first.
pub fn parse_reader<R: std::io::Read>(
    mut reader: R,
    options: &ReaderOptions,
) -> Result<Value, JotError> {
    validate_reader(options)?;

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| JotError::Input(e.to_string()))?;
    parse_str_with(&text, options)
}

/// Render a value tree as JSON text with explicit options
pub fn to_text_with(value: &Value, options: &WriterOptions) -> Result<String, JotError> {
    validate_writer(options)?;

    let mut formatter = Formatter::with_options(String::new(), options.clone());
    write_value(&mut formatter, value)?;
    Ok(formatter.finish()?)
}

/// Render a value tree as compact JSON text
pub fn to_text(value: &Value) -> Result<String, JotError> {
    to_text_with(value, &WriterOptions::default())
}

/// Transcode text over the token seam: decode, validate, replay
///
/// Handles any number of independent top-level values.
pub fn reformat(
    text: &str,
    reader: &ReaderOptions,
    writer: &WriterOptions,
) -> Result<String, JotError> {
    validate_reader(reader)?;
    validate_writer(writer)?;

    let mut binder = Binder::with_options(text, reader.clone());
    let mut formatter = Formatter::with_options(String::new(), writer.clone());
    while let Some(token) = binder.next_token()? {
        formatter.write(&token)?;
    }
    Ok(formatter.finish()?)
}

/// Walk a value tree and push its tokens into a formatter
pub fn write_value<W: std::fmt::Write>(
    formatter: &mut Formatter<W>,
    value: &Value,
) -> Result<(), JotError> {
    match value {
        Value::Null => formatter.write(&Token::Primitive(Primitive::Null))?,
        Value::Bool(v) => formatter.write(&Token::Primitive(Primitive::Bool(*v)))?,
        Value::Int32(v) => formatter.write(&Token::Primitive(Primitive::Int32(*v)))?,
        Value::Int64(v) => formatter.write(&Token::Primitive(Primitive::Int64(*v)))?,
        Value::Float64(v) => formatter.write(&Token::Primitive(Primitive::Float64(*v)))?,
        Value::Decimal(v) => formatter.write(&Token::Primitive(Primitive::Decimal(*v)))?,
        Value::String(v) => formatter.write(&Token::Primitive(Primitive::Text(v.clone())))?,
        Value::Array(items) => {
            formatter.write(&Token::ArrayBegin)?;
            for item in items {
                write_value(formatter, item)?;
            }
            formatter.write(&Token::ArrayEnd)?;
        }
        Value::Object(members) => {
            formatter.write(&Token::ObjectBegin(None))?;
            for (name, member) in members {
                formatter.write(&Token::Property(QualifiedName::new(name.clone())))?;
                write_value(formatter, member)?;
            }
            formatter.write(&Token::ObjectEnd)?;
        }
    }
    Ok(())
}

// ==================== Global-options convenience API ====================

/// Parse one document using the global options
///
/// # Panics
/// If global options are not initialized
pub fn parse(text: &str) -> Result<Value, JotError> {
    parse_str_with(text, &global_options().reader)
}

/// Render a value using the global options
///
/// # Panics
/// If global options are not initialized
pub fn format(value: &Value) -> Result<String, JotError> {
    to_text_with(value, &global_options().writer)
}

/// Quick parse with default options (auto-initializes if needed)
pub fn quick_parse(text: &str) -> Result<Value, JotError> {
    if !is_initialized() {
        init_options(RunOptions::default());
    }
    parse(text)
}

// ==================== Argument validation ====================

/// 扫描开始前同步拒绝非法配置
fn validate_reader(options: &ReaderOptions) -> Result<(), JotError> {
    if options.max_depth == Some(0) {
        return Err(JotError::Config(
            "max_depth must be at least 1 when set".to_string(),
        ));
    }
    Ok(())
}

fn validate_writer(options: &WriterOptions) -> Result<(), JotError> {
    if options.max_depth == Some(0) {
        return Err(JotError::Config(
            "max_depth must be at least 1 when set".to_string(),
        ));
    }
    if options.newline.is_empty() || !options.newline.chars().all(char::is_whitespace) {
        return Err(JotError::Config(
            "newline must be a non-empty whitespace string".to_string(),
        ));
    }
    if !options.indent.chars().all(char::is_whitespace) {
        return Err(JotError::Config(
            "indent must be a whitespace string".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip() {
        let value = parse_str(r#"{"key":"value","n":[1,2.5,null]}"#).unwrap();
        let text = to_text(&value).unwrap();
        assert_eq!(text, r#"{"key":"value","n":[1,2.5,null]}"#);
    }

    #[test]
    fn test_parse_rejects_trailing_content() {
        let err = parse_str("1 2").unwrap_err();
        assert_eq!(err.phase(), "binder");
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        let err = parse_str("  ").unwrap_err();
        assert_eq!(err.phase(), "binder");
    }

    #[test]
    fn test_parse_all_streams_values() {
        let values = parse_all("1 [2] \"three\"").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], Value::Int32(1));
    }

    #[test]
    fn test_parse_reader() {
        let input = std::io::Cursor::new(b"[true]".to_vec());
        let value = parse_reader(input, &ReaderOptions::default()).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Bool(true)]));
    }

    #[test]
    fn test_reformat_compact_to_pretty() {
        let out = reformat(
            r#"{"key":"value"}"#,
            &ReaderOptions::default(),
            &WriterOptions::pretty(),
        )
        .unwrap();
        assert_eq!(out, "{\n\t\"key\" : \"value\"\n}");
    }

    #[test]
    fn test_reformat_strips_comments_and_quotes() {
        // 宽松入、严格出
        let out = reformat(
            "{key: 'v' /* note */}",
            &ReaderOptions::default(),
            &WriterOptions::default(),
        )
        .unwrap();
        assert_eq!(out, r#"{"key":"v"}"#);
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let options = ReaderOptions {
            max_depth: Some(0),
            symbols: None,
        };
        let err = parse_str_with("[]", &options).unwrap_err();
        assert_eq!(err.phase(), "config");
    }

    #[test]
    fn test_validation_rejects_non_whitespace_layout() {
        let options = WriterOptions {
            newline: "x".to_string(),
            ..Default::default()
        };
        let err = to_text_with(&Value::Null, &options).unwrap_err();
        assert_eq!(err.phase(), "config");

        let options = WriterOptions {
            indent: "--".to_string(),
            ..Default::default()
        };
        let err = to_text_with(&Value::Null, &options).unwrap_err();
        assert_eq!(err.phase(), "config");
    }

    #[test]
    fn test_quick_parse() {
        let value = quick_parse("42").unwrap();
        assert_eq!(value, Value::Int32(42));
    }
}
