//! 字符串转义编码
//!
//! 词法解码器的全逆：`\b \f \n \r \t` 用短转义；其余 0x20 以下控制
//! 字符、引号、反斜杠、可选的 `<`，以及可打印 ASCII 之外的一切统一
//! 写成大写十六进制的 `\uXXXX`（UTF-16 码元，增补平面为代理对）。
//! 输出恒为纯 ASCII。

use std::fmt::Write;

/// 把一段文本按 JSON 字符串内容写入 sink（不含引号）
pub fn encode_into<W: Write>(out: &mut W, text: &str, escape_angle: bool) -> std::fmt::Result {
    for c in text.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\u{0008}' => out.write_str("\\b")?,
            '\u{000C}' => out.write_str("\\f")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '<' if escape_angle => out.write_str("\\u003C")?,
            c if (' '..='\u{007E}').contains(&c) => out.write_char(c)?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04X}", c as u32)?,
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(out, "\\u{:04X}", unit)?;
                }
            }
        }
    }
    Ok(())
}

/// 编码为独立字符串（测试与小片段使用）
pub fn encode(text: &str, escape_angle: bool) -> String {
    let mut out = String::with_capacity(text.len());
    // String 的 fmt::Write 不会失败
    let _ = encode_into(&mut out, text, escape_angle);
    out
}
