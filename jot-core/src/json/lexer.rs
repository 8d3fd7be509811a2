//! JSON 词法分析器
//!
//! 宽松词法（Postel 法则的"接受"一侧）：
//! - 接受块注释与行注释
//! - 接受单引号字符串与未加引号的键
//! - 接受扩展关键字（undefined、NaN、±Infinity）
//! - 不配对的 `[` `]` `{` `}` 原样放行，由绑定器/格式化器判定
//!
//! 只有词法畸形（坏转义、坏数字、坏标识符、未终结的字符串/注释）
//! 在本层报错；逗号/冒号作为原始分隔符传递给绑定器。错误携带违规
//! token 起始处的绝对偏移/行/列，失败后不做再同步。

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{trace, warn};

use super::error::{LexError, LexErrorKind, LexResult};
use crate::kit::position::SourcePosition;
use crate::kit::scanner::Scanner;
use crate::kit::token::{Primitive, QualifiedName, Token};

/// 孤立代理的占位字符
const REPLACEMENT: char = '\u{FFFD}';

/// 词法单元种类
///
/// 抽象 token 流的超集：逗号与游离冒号原样保留，供绑定器判定
/// 摆放是否合法。分析类工具可通过 [`Lexer::tokens`] 取纯 token 面。
#[derive(Debug, Clone, PartialEq)]
pub enum LexemeKind {
    Token(Token),
    Comma,
    Colon,
}

/// 词法单元，携带首字符位置
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub pos: SourcePosition,
}

impl Lexeme {
    fn token(token: Token, pos: SourcePosition) -> Self {
        Self {
            kind: LexemeKind::Token(token),
            pos,
        }
    }

    /// 供错误消息使用的简短描述
    pub fn describe(&self) -> String {
        match &self.kind {
            LexemeKind::Token(t) => t.kind().as_str().to_string(),
            LexemeKind::Comma => "','".to_string(),
            LexemeKind::Colon => "':'".to_string(),
        }
    }
}

/// JSON 词法器
///
/// 显式拉取游标：拥有底层扫描器，惰性逐个产出，drop 即释放。
/// 单次使用，不可并发驱动。
pub struct Lexer {
    scanner: Scanner,
    /// 当前 token 的起始位置（用于错误定位）
    token_start: SourcePosition,
    /// 首次失败后复读同一错误，不做再同步
    failed: Option<LexError>,
}

impl Lexer {
    /// 创建新词法器
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            scanner: Scanner::new(input),
            token_start: SourcePosition::start(),
            failed: None,
        }
    }

    /// 下一个未读字符的位置（诊断面）
    pub fn position(&self) -> SourcePosition {
        self.scanner.position()
    }

    /// 拉取下一个词法单元
    ///
    /// 输入结束返回 `Ok(None)`。出错后每次调用复读同一错误。
    pub fn next_lexeme(&mut self) -> LexResult<Option<Lexeme>> {
        if let Some(error) = &self.failed {
            return Err(error.clone());
        }

        match self.scan() {
            Ok(lexeme) => {
                if let Some(l) = &lexeme {
                    trace!(
                        target: "jot::lexer",
                        kind = %l.describe(),
                        line = l.pos.line,
                        column = l.pos.column,
                        "Lexeme"
                    );
                }
                Ok(lexeme)
            }
            Err(error) => {
                warn!(target: "jot::lexer", %error, "Lexical error, scan aborted");
                self.failed = Some(error.clone());
                Err(error)
            }
        }
    }

    /// 宽松 token 面：过滤分隔符，供分析类工具直接消费
    pub fn tokens(self) -> Tokens {
        Tokens { lexer: self }
    }

    fn scan(&mut self) -> LexResult<Option<Lexeme>> {
        self.skip_trivia()?;
        self.token_start = self.scanner.position();

        let c = match self.scanner.peek() {
            None => return Ok(None),
            Some(c) => c,
        };

        match c {
            '[' => self.single(Token::ArrayBegin),
            ']' => self.single(Token::ArrayEnd),
            '{' => self.single(Token::ObjectBegin(None)),
            '}' => self.single(Token::ObjectEnd),
            ',' => {
                self.scanner.pop();
                Ok(Some(Lexeme {
                    kind: LexemeKind::Comma,
                    pos: self.token_start,
                }))
            }
            ':' => {
                self.scanner.pop();
                Ok(Some(Lexeme {
                    kind: LexemeKind::Colon,
                    pos: self.token_start,
                }))
            }
            '"' | '\'' => self.scan_string(c),
            '0'..='9' | '-' | '+' | '.' => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => Err(LexError::at(
                LexErrorKind::IllegalCharacter(c),
                self.token_start,
            )),
        }
    }

    fn single(&mut self, token: Token) -> LexResult<Option<Lexeme>> {
        self.scanner.pop();
        Ok(Some(Lexeme::token(token, self.token_start)))
    }

    /// 跳过空白与注释
    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            match self.scanner.peek() {
                Some(c) if c.is_whitespace() => {
                    self.scanner.pop();
                }
                Some('/') => {
                    let comment_start = self.scanner.position();
                    self.scanner.pop();
                    match self.scanner.peek() {
                        Some('/') => {
                            while let Some(c) = self.scanner.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.scanner.pop();
                            }
                        }
                        Some('*') => {
                            self.scanner.pop();
                            self.skip_block_comment(comment_start)?;
                        }
                        _ => {
                            return Err(LexError::at(
                                LexErrorKind::IllegalCharacter('/'),
                                comment_start,
                            ))
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self, comment_start: SourcePosition) -> LexResult<()> {
        // "/*" 已消费
        loop {
            match self.scanner.pop() {
                None => {
                    return Err(LexError::at(
                        LexErrorKind::UnterminatedComment,
                        comment_start,
                    ))
                }
                Some('*') => {
                    if self.scanner.match_char('/') {
                        return Ok(());
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// 单 token 前瞻：吃掉紧随其后的冒号则为属性名
    fn takes_colon(&mut self) -> LexResult<bool> {
        self.skip_trivia()?;
        Ok(self.scanner.match_char(':'))
    }

    fn scan_string(&mut self, delim: char) -> LexResult<Option<Lexeme>> {
        let start = self.token_start;
        self.scanner.pop(); // 开引号

        // 常见的无转义段走整块切片，不逐字符分配
        let mut buf: Option<String> = None;
        self.scanner.begin_chunk();

        loop {
            match self.scanner.peek() {
                None => return Err(LexError::at(LexErrorKind::UnterminatedString, start)),
                Some(c) if c == delim => {
                    let text = match buf.take() {
                        None => self.scanner.end_chunk().to_string(),
                        Some(mut b) => {
                            b.push_str(self.scanner.end_chunk());
                            b
                        }
                    };
                    self.scanner.pop(); // 闭引号
                    return self.finish_text(text, start);
                }
                Some('\\') => {
                    let mut b = buf.take().unwrap_or_default();
                    b.push_str(self.scanner.end_chunk());
                    self.scanner.pop(); // 反斜杠
                    self.decode_escape(&mut b)?;
                    self.scanner.begin_chunk();
                    buf = Some(b);
                }
                Some(c) if (c as u32) < 0x20 && c != '\t' => {
                    return Err(LexError::at(LexErrorKind::ControlCharacter(c), start));
                }
                Some(_) => {
                    self.scanner.pop();
                }
            }
        }
    }

    fn finish_text(&mut self, text: String, start: SourcePosition) -> LexResult<Option<Lexeme>> {
        if self.takes_colon()? {
            Ok(Some(Lexeme::token(
                Token::Property(QualifiedName::new(text)),
                start,
            )))
        } else {
            Ok(Some(Lexeme::token(
                Token::Primitive(Primitive::Text(text)),
                start,
            )))
        }
    }

    /// 解码一个转义序列（反斜杠已消费）
    fn decode_escape(&mut self, buf: &mut String) -> LexResult<()> {
        let c = match self.scanner.pop() {
            None => return Err(LexError::at(LexErrorKind::UnterminatedString, self.token_start)),
            Some(c) => c,
        };

        match c {
            'b' => buf.push('\u{0008}'),
            'f' => buf.push('\u{000C}'),
            'n' => buf.push('\n'),
            'r' => buf.push('\r'),
            't' => buf.push('\t'),
            '\\' => buf.push('\\'),
            '"' => buf.push('"'),
            'u' => self.decode_unicode(buf)?,
            // 未识别的转义：丢弃反斜杠，保留后续字符（覆盖 \' 与 \/）
            other => buf.push(other),
        }
        Ok(())
    }

    /// 解码 \uXXXX（"\u" 已消费）
    ///
    /// 不足四位十六进制时退化为字面 u 加已读取的位；代理对组合为
    /// 增补平面码点，孤立代理落为 U+FFFD。
    fn decode_unicode(&mut self, buf: &mut String) -> LexResult<()> {
        let mut lead: Option<u32> = None;

        loop {
            let mut digits = String::new();
            let mut unit: u32 = 0;
            while digits.len() < 4 {
                match self.scanner.peek() {
                    Some(h) if h.is_ascii_hexdigit() => {
                        if let Some(d) = h.to_digit(16) {
                            unit = (unit << 4) | d;
                        }
                        digits.push(h);
                        self.scanner.pop();
                    }
                    _ => break,
                }
            }

            if digits.len() < 4 {
                if lead.is_some() {
                    buf.push(REPLACEMENT);
                }
                buf.push('u');
                buf.push_str(&digits);
                return Ok(());
            }

            // 尾代理：与待配对的前导代理组合，否则孤立
            if (0xDC00..=0xDFFF).contains(&unit) {
                match lead.take() {
                    Some(l) => {
                        let scalar = 0x10000 + ((l - 0xD800) << 10) + (unit - 0xDC00);
                        buf.push(char::from_u32(scalar).unwrap_or(REPLACEMENT));
                    }
                    None => buf.push(REPLACEMENT),
                }
                return Ok(());
            }

            if lead.take().is_some() {
                // 前一个前导代理未得到配对
                buf.push(REPLACEMENT);
            }

            if (0xD800..=0xDBFF).contains(&unit) {
                lead = Some(unit);
                // 只有紧跟的 \uXXXX 才可能完成配对
                if self.scanner.peek() == Some('\\') {
                    self.scanner.pop();
                    if self.scanner.peek() == Some('u') {
                        self.scanner.pop();
                        continue;
                    }
                    // 反斜杠属于别的转义：当前前导代理孤立
                    buf.push(REPLACEMENT);
                    return self.decode_escape(buf);
                }
                buf.push(REPLACEMENT);
                return Ok(());
            }

            buf.push(char::from_u32(unit).unwrap_or(REPLACEMENT));
            return Ok(());
        }
    }

    fn scan_number(&mut self) -> LexResult<Option<Lexeme>> {
        let start = self.token_start;
        self.scanner.begin_chunk();

        if matches!(self.scanner.peek(), Some('+' | '-')) {
            let sign = self.scanner.pop();
            // 符号后允许 Infinity 关键字（+Infinity / -Infinity）
            if self.scanner.peek() == Some('I') {
                return self.finish_signed_infinity(sign == Some('-'), start);
            }
        }

        let mut has_digits = false;
        while matches!(self.scanner.peek(), Some('0'..='9')) {
            self.scanner.pop();
            has_digits = true;
        }

        let mut is_float = false;
        if self.scanner.match_char('.') {
            is_float = true;
            let mut fraction_digits = false;
            while matches!(self.scanner.peek(), Some('0'..='9')) {
                self.scanner.pop();
                fraction_digits = true;
            }
            // 小数点一旦消费，后面必须有数字
            if !fraction_digits {
                return Err(LexError::at(LexErrorKind::IllegalNumber, start));
            }
            has_digits = true;
        }

        if !has_digits {
            return Err(LexError::at(LexErrorKind::IllegalNumber, start));
        }

        if matches!(self.scanner.peek(), Some('e' | 'E')) {
            self.scanner.pop();
            is_float = true;
            if matches!(self.scanner.peek(), Some('+' | '-')) {
                self.scanner.pop();
            }
            let mut exponent_digits = false;
            while matches!(self.scanner.peek(), Some('0'..='9')) {
                self.scanner.pop();
                exponent_digits = true;
            }
            if !exponent_digits {
                return Err(LexError::at(LexErrorKind::IllegalNumber, start));
            }
        }

        // 完整数字后紧跟字母（如 0x12）是词法错误
        if let Some(c) = self.scanner.peek() {
            if is_identifier_start(c) {
                return Err(LexError::at(LexErrorKind::IllegalNumber, start));
            }
        }

        let raw = self.scanner.end_chunk();
        match parse_number(raw, is_float) {
            Some(primitive) => {
                trace!(target: "jot::lexer", raw, kind = primitive.kind_name(), "Number token");
                Ok(Some(Lexeme::token(Token::Primitive(primitive), start)))
            }
            None => Err(LexError::at(LexErrorKind::IllegalNumber, start)),
        }
    }

    fn finish_signed_infinity(
        &mut self,
        negative: bool,
        start: SourcePosition,
    ) -> LexResult<Option<Lexeme>> {
        while let Some(c) = self.scanner.peek() {
            if is_identifier_continue(c) {
                self.scanner.pop();
            } else {
                break;
            }
        }

        let raw = self.scanner.end_chunk();
        if &raw[1..] == "Infinity" {
            let value = if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            Ok(Some(Lexeme::token(
                Token::Primitive(Primitive::Float64(value)),
                start,
            )))
        } else {
            Err(LexError::at(
                LexErrorKind::IllegalKeyword(raw.to_string()),
                start,
            ))
        }
    }

    fn scan_identifier(&mut self) -> LexResult<Option<Lexeme>> {
        let start = self.token_start;
        self.scanner.begin_chunk();

        while let Some(c) = self.scanner.peek() {
            if is_identifier_continue(c) {
                self.scanner.pop();
            } else {
                break;
            }
        }
        let word = self.scanner.end_chunk().to_string();

        // 未加引号的键
        if self.takes_colon()? {
            return Ok(Some(Lexeme::token(
                Token::Property(QualifiedName::new(word)),
                start,
            )));
        }

        let primitive = match word.as_str() {
            "true" => Primitive::Bool(true),
            "false" => Primitive::Bool(false),
            // undefined 没有独立的原始值种类，归并到 null
            "null" | "undefined" => Primitive::Null,
            "NaN" => Primitive::Float64(f64::NAN),
            "Infinity" => Primitive::Float64(f64::INFINITY),
            _ => return Err(LexError::at(LexErrorKind::IllegalKeyword(word), start)),
        };
        Ok(Some(Lexeme::token(Token::Primitive(primitive), start)))
    }
}

impl Iterator for Lexer {
    type Item = LexResult<Lexeme>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed.is_some() {
            // 错误已经产出过一次
            return None;
        }
        self.next_lexeme().transpose()
    }
}

/// [`Lexer::tokens`] 的迭代器适配
pub struct Tokens {
    lexer: Lexer,
}

impl Iterator for Tokens {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lexer.next() {
                None => return None,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(lexeme)) => match lexeme.kind {
                    LexemeKind::Token(token) => return Some(Ok(token)),
                    LexemeKind::Comma | LexemeKind::Colon => continue,
                },
            }
        }
    }
}

/// 选择最窄的无损表示
fn parse_number(raw: &str, is_float: bool) -> Option<Primitive> {
    let text = raw.strip_prefix('+').unwrap_or(raw);

    if is_float {
        return text.parse::<f64>().ok().map(Primitive::Float64);
    }
    if let Ok(v) = text.parse::<i32>() {
        return Some(Primitive::Int32(v));
    }
    if let Ok(v) = text.parse::<i64>() {
        return Some(Primitive::Int64(v));
    }
    if let Ok(v) = Decimal::from_str(text) {
        return Some(Primitive::Decimal(v));
    }
    // 超出十进制范围的整数退化为浮点
    text.parse::<f64>().ok().map(Primitive::Float64)
}

/// 标识符起始字符：字母、下划线或美元符
fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// 标识符延续字符
fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
