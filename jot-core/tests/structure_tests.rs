//! 集成测试 - 宽松/严格分界与规范夹具
//!
//! 词法层放行的不良构结构，在绑定器处报错；格式化器对未闭合分组
//! 做隐式闭合，对从未打开的分组报错。

use jot_core::json::error::{BindErrorKind, FormatError};
use jot_core::json::{Binder, Formatter, Lexer};
use jot_core::{ReaderOptions, Token, TokenKind, WriterOptions};

/// 辅助函数：把宽松 token 面直接回放进格式化器
fn replay_lenient(text: &str) -> Result<String, FormatError> {
    let mut formatter = Formatter::new(String::new());
    for token in Lexer::new(text).tokens() {
        let token = token.unwrap_or_else(|e| panic!("Lex error: {}", e));
        formatter.write(&token)?;
    }
    formatter.finish()
}

fn bind_error(text: &str) -> BindErrorKind {
    let mut binder = Binder::new(text);
    loop {
        match binder.next_token() {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("Expected bind error for {:?}", text),
            Err(e) => return e.kind,
        }
    }
}

#[test]
fn test_unclosed_array_formats_by_implicit_close() {
    // "[" 单独成流 → "[]"
    assert_eq!(replay_lenient("[").unwrap(), "[]");
    assert_eq!(replay_lenient("[[{").unwrap(), "[[{}]]");
}

#[test]
fn test_stray_end_raises_structural_error() {
    let err = replay_lenient("]").unwrap_err();
    assert_eq!(
        err,
        FormatError::EndWithoutBegin {
            found: TokenKind::ArrayEnd
        }
    );

    let err = replay_lenient("[}").unwrap_err();
    assert!(matches!(err, FormatError::MismatchedEnd { .. }));
}

#[test]
fn test_binder_rejects_what_lexer_passes() {
    // 词法层对这些序列不设防，绑定器逐一拒绝
    assert!(matches!(bind_error("]"), BindErrorKind::ExtraEnd { .. }));
    assert!(matches!(bind_error("[1,,2]"), BindErrorKind::UnexpectedComma));
    assert!(matches!(bind_error("[1 2]"), BindErrorKind::MissingComma));
    assert!(matches!(bind_error("[1,]"), BindErrorKind::TrailingComma));
    assert!(matches!(bind_error("[1:2]"), BindErrorKind::UnexpectedColon));
    assert!(matches!(bind_error("[1"), BindErrorKind::UnclosedGroup));
}

#[test]
fn test_lenient_stream_usable_for_analysis() {
    // 不良构输入的原始结构仍可完整观察
    let kinds: Vec<TokenKind> = Lexer::new("]]{")
        .tokens()
        .map(|t| t.unwrap().kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::ArrayEnd,
            TokenKind::ArrayEnd,
            TokenKind::ObjectBegin,
        ]
    );
}

#[test]
fn test_canonical_fixture_compact() {
    let out = transcode(r#"{"key":"value"}"#, WriterOptions::default());
    assert_eq!(out, r#"{"key":"value"}"#);
}

#[test]
fn test_canonical_fixture_pretty() {
    // 一个大括号、制表符缩进的成员、独占一行的闭括号
    let out = transcode(r#"{"key":"value"}"#, WriterOptions::pretty());
    assert_eq!(out, "{\n\t\"key\" : \"value\"\n}");
}

#[test]
fn test_canonical_fixture_pretty_custom_newline() {
    let options = WriterOptions {
        pretty: true,
        newline: "\r\n".to_string(),
        ..Default::default()
    };
    let out = transcode(r#"{"key":"value"}"#, options);
    assert_eq!(out, "{\r\n\t\"key\" : \"value\"\r\n}");
}

#[test]
fn test_empty_containers_never_split() {
    for source in ["[]", "{}", r#"{"a":[]}"#, r#"{"a":{}}"#, "[[],{}]"] {
        let compact = transcode(source, WriterOptions::default());
        let pretty = transcode(source, WriterOptions::pretty());
        assert!(!compact.contains("[\n") && !compact.contains("{\n"), "{}", compact);
        assert!(!pretty.contains("[\n\t\n") && !pretty.contains("[\n]"), "{}", pretty);
        assert!(!pretty.contains("{\n}"), "{}", pretty);
    }
    assert_eq!(transcode("[[],{}]", WriterOptions::pretty()), "[\n\t[],\n\t{}\n]");
}

#[test]
fn test_lenient_input_strict_output() {
    // 注释、单引号、未加引号的键进来，规范 JSON 出去
    let source = "// config\n{mode: 'fast', /* depth */ levels: [1, 2]}";
    let out = transcode(source, WriterOptions::default());
    assert_eq!(out, r#"{"mode":"fast","levels":[1,2]}"#);
}

#[test]
fn test_depth_error_reports_offending_token() {
    let options = ReaderOptions {
        max_depth: Some(2),
        symbols: None,
    };
    let mut binder = Binder::with_options("[[[", options);
    let err = loop {
        match binder.next_token() {
            Ok(_) => continue,
            Err(e) => break e,
        }
    };
    assert_eq!(err.kind, BindErrorKind::DepthExceeded { limit: 2 });
    // 第三个 '[' 的位置
    assert_eq!(err.column(), Some(3));
}

/// 辅助函数：经绑定器校验后回放
fn transcode(text: &str, options: WriterOptions) -> String {
    let mut binder = Binder::new(text);
    let mut formatter = Formatter::with_options(String::new(), options);
    loop {
        match binder.next_token() {
            Ok(Some(token)) => formatter
                .write(&token)
                .unwrap_or_else(|e| panic!("Format error: {}", e)),
            Ok(None) => break,
            Err(e) => panic!("Bind error: {}", e),
        }
    }
    formatter.finish().unwrap_or_else(|e| panic!("{}", e))
}

#[test]
fn test_token_sentinel_rejected_by_formatter() {
    let mut formatter = Formatter::new(String::new());
    let err = formatter.write(&Token::None).unwrap_err();
    assert!(matches!(err, FormatError::UnexpectedToken { .. }));
}
