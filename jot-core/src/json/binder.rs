//! 语法绑定器
//!
//! 消费词法单元流并实施完整的结构不变量（Postel 法则的"产出"一侧
//! 在解码路径上的对应物）：配对的 Begin/End、合法的逗号/冒号摆放、
//! 属性必须紧跟恰好一个值、嵌套不超过配置上限。
//!
//! 顶层嵌套跟踪在每个完整值之后归零，同一来源可以连续绑定多个独立
//! 的顶层值（流式模式）。

use jot_config::{ReaderOptions, SymbolTable};
use tracing::{debug, trace};

use super::error::{BindError, BindErrorKind, BindResult};
use super::lexer::{Lexeme, LexemeKind, Lexer};
use super::value::Value;
use crate::kit::position::SourcePosition;
use crate::kit::token::{Primitive, Token, TokenKind};

/// 未闭合分组的种类
#[derive(Debug, Clone, Copy, PartialEq)]
enum Group {
    Array,
    Object,
}

/// 分组内的期望状态
#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    /// 数组：首个值或 ]
    ValueOrEnd,
    /// 数组：逗号或 ]
    CommaOrEnd,
    /// 数组：逗号之后必须有值
    Value,
    /// 对象：首个属性或 }
    PropertyOrEnd,
    /// 对象：属性之后必须有值
    MemberValue,
    /// 对象：逗号或 }
    MemberCommaOrEnd,
    /// 对象：逗号之后必须有属性
    Property,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    group: Group,
    expect: Expect,
}

/// 语法绑定器
///
/// 拉取游标：拥有词法器，逐个产出经过校验的抽象 token，
/// 或直接构建值树。单次使用。
pub struct Binder {
    lexer: Lexer,
    options: ReaderOptions,
    frames: Vec<Frame>,
    /// 最近一个词法单元的位置（用于错误定位）
    last_pos: SourcePosition,
}

impl Binder {
    /// 以默认配置创建绑定器
    pub fn new(input: impl Into<String>) -> Self {
        Self::with_options(input, ReaderOptions::default())
    }

    /// 以指定配置创建绑定器
    pub fn with_options(input: impl Into<String>, options: ReaderOptions) -> Self {
        Self::from_lexer(Lexer::new(input), options)
    }

    /// 包装现有词法器
    pub fn from_lexer(lexer: Lexer, options: ReaderOptions) -> Self {
        Self {
            lexer,
            options,
            frames: Vec::new(),
            last_pos: SourcePosition::start(),
        }
    }

    /// 最近一个词法单元的起始位置
    pub fn last_position(&self) -> SourcePosition {
        self.last_pos
    }

    /// 当前嵌套深度
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 拉取下一个经过校验的抽象 token（共享缝合面）
    ///
    /// 分隔符在此被消费并判定，不对外产出。输入结束返回 `Ok(None)`；
    /// 结束时仍有未闭合分组则报错。
    pub fn next_token(&mut self) -> BindResult<Option<Token>> {
        loop {
            let lexeme = match self.lexer.next_lexeme()? {
                None => {
                    return if self.frames.is_empty() {
                        Ok(None)
                    } else {
                        Err(BindError::at_eof(BindErrorKind::UnclosedGroup))
                    };
                }
                Some(l) => l,
            };
            self.last_pos = lexeme.pos;

            match lexeme.kind {
                LexemeKind::Comma => self.on_comma(lexeme.pos)?,
                LexemeKind::Colon => {
                    return Err(BindError::at(BindErrorKind::UnexpectedColon, lexeme.pos))
                }
                LexemeKind::Token(token) => {
                    self.on_token(&token, lexeme.pos)?;
                    trace!(
                        target: "jot::binder",
                        kind = %token.kind(),
                        depth = self.frames.len(),
                        "Validated token"
                    );
                    return Ok(Some(token));
                }
            }
        }
    }

    /// 绑定下一个顶层值（流式模式）
    ///
    /// 每个完整值之后顶层状态归零；输入耗尽返回 `Ok(None)`。
    pub fn next_value(&mut self) -> BindResult<Option<Value>> {
        let first = match self.next_token()? {
            None => return Ok(None),
            Some(t) => t,
        };
        let value = self.finish_value(first)?;
        debug!(target: "jot::binder", kind = value.kind_name(), "Bound top-level value");
        Ok(Some(value))
    }

    /// 绑定下一个顶层值并强制转换为符号常量
    ///
    /// 依次尝试：声明的别名、标识符名、数值。三者皆失败为绑定错误。
    pub fn next_symbol(&mut self) -> BindResult<Option<i64>> {
        let token = match self.next_token()? {
            None => return Ok(None),
            Some(t) => t,
        };
        let pos = self.last_pos;

        let primitive = match token {
            Token::Primitive(p) => p,
            other => {
                return Err(BindError::at(
                    BindErrorKind::UnexpectedToken {
                        found: other.kind().as_str().to_string(),
                        expected: vec!["value".to_string()],
                    },
                    pos,
                ))
            }
        };

        let table = self.options.symbols.as_ref();
        match table.and_then(|t| coerce_symbol(t, &primitive)) {
            Some(value) => Ok(Some(value)),
            None => Err(BindError::at(
                BindErrorKind::UnknownSymbol {
                    text: describe_primitive(&primitive),
                },
                pos,
            )),
        }
    }

    fn finish_value(&mut self, first: Token) -> BindResult<Value> {
        match first {
            Token::Primitive(p) => Ok(Value::from(p)),
            Token::ArrayBegin => {
                let mut items = Vec::new();
                loop {
                    match self.require_token()? {
                        Token::ArrayEnd => return Ok(Value::Array(items)),
                        token => items.push(self.finish_value(token)?),
                    }
                }
            }
            Token::ObjectBegin(_) => {
                let mut members = Vec::new();
                loop {
                    match self.require_token()? {
                        Token::ObjectEnd => return Ok(Value::Object(members)),
                        Token::Property(name) => {
                            let token = self.require_token()?;
                            let value = self.finish_value(token)?;
                            members.push((name.local().to_string(), value));
                        }
                        // 经过校验的流在对象内只会产出属性或结束标记
                        _ => unreachable!("validated stream"),
                    }
                }
            }
            // 经过校验的流在值位置只会产出原始值或分组开始
            _ => unreachable!("validated stream"),
        }
    }

    fn require_token(&mut self) -> BindResult<Token> {
        match self.next_token()? {
            Some(t) => Ok(t),
            None => Err(BindError::at_eof(BindErrorKind::UnexpectedEndOfInput)),
        }
    }

    /// 值（原始值或分组开始）落位：校验并推进所在分组的状态
    fn on_value_slot(&mut self, kind: TokenKind, pos: SourcePosition) -> BindResult<()> {
        match self.frames.last_mut() {
            // 顶层：任何数量的独立值（流式模式）
            None => Ok(()),
            Some(frame) => match frame.expect {
                Expect::ValueOrEnd | Expect::Value => {
                    frame.expect = Expect::CommaOrEnd;
                    Ok(())
                }
                Expect::MemberValue => {
                    frame.expect = Expect::MemberCommaOrEnd;
                    Ok(())
                }
                Expect::CommaOrEnd | Expect::MemberCommaOrEnd => {
                    Err(BindError::at(BindErrorKind::MissingComma, pos))
                }
                Expect::PropertyOrEnd | Expect::Property => Err(BindError::at(
                    BindErrorKind::UnexpectedToken {
                        found: kind.as_str().to_string(),
                        expected: vec!["property".to_string()],
                    },
                    pos,
                )),
            },
        }
    }

    fn on_token(&mut self, token: &Token, pos: SourcePosition) -> BindResult<()> {
        match token {
            Token::ArrayBegin => {
                self.on_value_slot(TokenKind::ArrayBegin, pos)?;
                self.push_frame(Group::Array, Expect::ValueOrEnd, pos)
            }
            Token::ObjectBegin(_) => {
                self.on_value_slot(TokenKind::ObjectBegin, pos)?;
                self.push_frame(Group::Object, Expect::PropertyOrEnd, pos)
            }
            Token::ArrayEnd => self.on_end(Group::Array, TokenKind::ArrayEnd, pos),
            Token::ObjectEnd => self.on_end(Group::Object, TokenKind::ObjectEnd, pos),
            Token::Property(_) => self.on_property(pos),
            Token::Primitive(_) => self.on_value_slot(TokenKind::Primitive, pos),
            Token::None => Err(BindError::at(
                BindErrorKind::UnexpectedToken {
                    found: TokenKind::None.as_str().to_string(),
                    expected: vec![],
                },
                pos,
            )),
        }
    }

    fn push_frame(&mut self, group: Group, expect: Expect, pos: SourcePosition) -> BindResult<()> {
        if let Some(limit) = self.options.max_depth {
            if self.frames.len() >= limit {
                return Err(BindError::at(BindErrorKind::DepthExceeded { limit }, pos));
            }
        }
        self.frames.push(Frame { group, expect });
        Ok(())
    }

    fn on_end(&mut self, group: Group, found: TokenKind, pos: SourcePosition) -> BindResult<()> {
        let frame = match self.frames.last() {
            None => return Err(BindError::at(BindErrorKind::ExtraEnd { found }, pos)),
            Some(f) => *f,
        };

        if frame.group != group {
            let expected = match frame.group {
                Group::Array => TokenKind::ArrayEnd,
                Group::Object => TokenKind::ObjectEnd,
            };
            return Err(BindError::at(
                BindErrorKind::MismatchedEnd { expected, found },
                pos,
            ));
        }

        match frame.expect {
            // 逗号之后直接闭合
            Expect::Value | Expect::Property => {
                Err(BindError::at(BindErrorKind::TrailingComma, pos))
            }
            // 属性悬空，值缺失
            Expect::MemberValue => Err(BindError::at(
                BindErrorKind::UnexpectedToken {
                    found: found.as_str().to_string(),
                    expected: vec!["value".to_string()],
                },
                pos,
            )),
            _ => {
                self.frames.pop();
                Ok(())
            }
        }
    }

    fn on_property(&mut self, pos: SourcePosition) -> BindResult<()> {
        match self.frames.last_mut() {
            Some(frame) if frame.group == Group::Object => match frame.expect {
                Expect::PropertyOrEnd | Expect::Property => {
                    frame.expect = Expect::MemberValue;
                    Ok(())
                }
                Expect::MemberCommaOrEnd => Err(BindError::at(BindErrorKind::MissingComma, pos)),
                // MemberValue：属性之后又来属性
                _ => Err(BindError::at(
                    BindErrorKind::UnexpectedToken {
                        found: TokenKind::Property.as_str().to_string(),
                        expected: vec!["value".to_string()],
                    },
                    pos,
                )),
            },
            // 数组内或顶层的属性
            _ => Err(BindError::at(
                BindErrorKind::UnexpectedToken {
                    found: TokenKind::Property.as_str().to_string(),
                    expected: vec!["value".to_string()],
                },
                pos,
            )),
        }
    }

    fn on_comma(&mut self, pos: SourcePosition) -> BindResult<()> {
        match self.frames.last_mut() {
            None => Err(BindError::at(BindErrorKind::UnexpectedComma, pos)),
            Some(frame) => match frame.expect {
                Expect::CommaOrEnd => {
                    frame.expect = Expect::Value;
                    Ok(())
                }
                Expect::MemberCommaOrEnd => {
                    frame.expect = Expect::Property;
                    Ok(())
                }
                // 双逗号、前导逗号、属性后的逗号
                _ => Err(BindError::at(BindErrorKind::UnexpectedComma, pos)),
            },
        }
    }
}

/// 符号常量强制转换：依次尝试别名、标识符名、数值
pub fn coerce_symbol(table: &SymbolTable, primitive: &Primitive) -> Option<i64> {
    match primitive {
        Primitive::Text(text) => table
            .by_alternate(text)
            .or_else(|| table.by_name(text))
            .or_else(|| {
                text.parse::<i64>()
                    .ok()
                    .and_then(|v| table.by_value(v).map(|e| e.value))
            }),
        Primitive::Int32(v) => table.by_value(i64::from(*v)).map(|e| e.value),
        Primitive::Int64(v) => table.by_value(*v).map(|e| e.value),
        _ => None,
    }
}

fn describe_primitive(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Text(text) => text.clone(),
        Primitive::Int32(v) => v.to_string(),
        Primitive::Int64(v) => v.to_string(),
        other => other.kind_name().to_string(),
    }
}
