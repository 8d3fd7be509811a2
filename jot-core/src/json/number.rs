//! 数值文本生成
//!
//! 每种数值种类使用可往返的文本；精度/量级无法在 64 位浮点往返中
//! 幸存的值（超出 double 精确整数范围的 64 位整数与十进制值）改写
//! 成带引号的字符串，避免精度悄然丢失。

use std::fmt::Write;

use rust_decimal::Decimal;

/// double 可精确表示的整数范围上界（2^53）
const DOUBLE_EXACT_MAX: i64 = 9_007_199_254_740_992;

/// 64 位整数：范围内写裸数字，范围外写带引号字符串
pub fn write_i64<W: Write>(out: &mut W, value: i64) -> std::fmt::Result {
    if (-DOUBLE_EXACT_MAX..=DOUBLE_EXACT_MAX).contains(&value) {
        write!(out, "{}", value)
    } else {
        write!(out, "\"{}\"", value)
    }
}

/// 十进制值：仅当是 double 精确范围内的整数才写裸数字
pub fn write_decimal<W: Write>(out: &mut W, value: &Decimal) -> std::fmt::Result {
    let normalized = value.normalize();
    if is_double_exact_integer(&normalized) {
        write!(out, "{}", normalized)
    } else {
        write!(out, "\"{}\"", normalized)
    }
}

/// 64 位浮点：最短可往返文本；非有限值写占位关键字
///
/// `{:?}` 保证输出带小数点或指数标记，重新解析仍得浮点种类。
pub fn write_f64<W: Write>(out: &mut W, value: f64, nonfinite: &str) -> std::fmt::Result {
    if value.is_finite() {
        write!(out, "{:?}", value)
    } else {
        out.write_str(nonfinite)
    }
}

fn is_double_exact_integer(value: &Decimal) -> bool {
    if value.fract() != Decimal::ZERO {
        return false;
    }
    let max = Decimal::from(DOUBLE_EXACT_MAX);
    *value >= -max && *value <= max
}
