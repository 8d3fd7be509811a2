//! 集成测试 - 数值保真
//!
//! 最窄无损表示选择，以及超出 double 往返能力的值改写为带引号
//! 字符串的规则。

use rust_decimal::Decimal;

use jot_core::json::{Binder, Formatter};
use jot_core::{Primitive, Token, Value};

fn bind_one(text: &str) -> Value {
    let mut binder = Binder::new(text);
    binder
        .next_value()
        .unwrap_or_else(|e| panic!("Bind error: {}", e))
        .unwrap_or_else(|| panic!("No value in {:?}", text))
}

fn emit(primitive: Primitive) -> String {
    let mut formatter = Formatter::new(String::new());
    formatter
        .write(&Token::Primitive(primitive))
        .unwrap_or_else(|e| panic!("Format error: {}", e));
    formatter.finish().unwrap_or_else(|e| panic!("{}", e))
}

#[test]
fn test_zero_formats_bare() {
    assert_eq!(emit(Primitive::Int32(0)), "0");
}

#[test]
fn test_min_i64_formats_as_quoted_string() {
    assert_eq!(emit(Primitive::Int64(i64::MIN)), "\"-9223372036854775808\"");
}

#[test]
fn test_max_decimal_formats_as_quoted_string() {
    assert_eq!(
        emit(Primitive::Decimal(Decimal::MAX)),
        "\"79228162514264337593543950335\""
    );
}

#[test]
fn test_negative_fraction_preserved() {
    assert_eq!(emit(Primitive::Float64(-0.123456)), "-0.123456");
}

#[test]
fn test_leading_decimal_point_normalizes() {
    let value = bind_one(".123456");
    assert_eq!(value, Value::Float64(0.123456));

    let mut formatter = Formatter::new(String::new());
    formatter
        .write(&Token::Primitive(Primitive::Float64(0.123456)))
        .unwrap();
    assert_eq!(formatter.finish().unwrap(), "0.123456");
}

#[test]
fn test_narrowest_representation_from_text() {
    assert_eq!(bind_one("7"), Value::Int32(7));
    assert_eq!(bind_one("2147483647"), Value::Int32(i32::MAX));
    assert_eq!(bind_one("2147483648"), Value::Int64(2_147_483_648));
    assert_eq!(
        bind_one("9223372036854775807"),
        Value::Int64(i64::MAX)
    );
    assert_eq!(
        bind_one("9223372036854775808"),
        Value::Decimal("9223372036854775808".parse().unwrap())
    );
    assert_eq!(bind_one("1.0"), Value::Float64(1.0));
    assert_eq!(bind_one("1e2"), Value::Float64(100.0));
}

#[test]
fn test_i64_within_double_exact_range_stays_bare() {
    let text = emit(Primitive::Int64(1_099_511_627_776)); // 2^40
    assert_eq!(text, "1099511627776");
    // 重新解析仍是 Int64（超出 i32）
    assert_eq!(bind_one(&text), Value::Int64(1_099_511_627_776));
}

#[test]
fn test_quoted_big_integer_survives_round_trip_as_text() {
    // 带引号的大整数重新解析为字符串，数值文本逐字保留
    let text = emit(Primitive::Int64(i64::MAX));
    assert_eq!(text, "\"9223372036854775807\"");
    assert_eq!(
        bind_one(&text),
        Value::String("9223372036854775807".to_string())
    );
}

#[test]
fn test_float_text_keeps_float_kind() {
    let text = emit(Primitive::Float64(2.0));
    assert_eq!(text, "2.0");
    assert_eq!(bind_one(&text), Value::Float64(2.0));
}

#[test]
fn test_nonfinite_defaults_to_null_keyword() {
    assert_eq!(emit(Primitive::Float64(f64::NAN)), "null");
    assert_eq!(emit(Primitive::Float64(f64::INFINITY)), "null");
}

#[test]
fn test_extreme_float_round_trips() {
    for value in [
        f64::MAX,
        f64::MIN_POSITIVE,
        1.0e300,
        -2.2250738585072014e-308,
        0.1 + 0.2,
    ] {
        let text = emit(Primitive::Float64(value));
        match bind_one(&text) {
            Value::Float64(parsed) => {
                assert_eq!(parsed.to_bits(), value.to_bits(), "text was {}", text)
            }
            other => panic!("Expected float from {}, got {:?}", text, other),
        }
    }
}
