//! JSON 格式化器
//!
//! 消费 token 流并回放为文本。假定输入良构，只保留为排版所需的
//! 最小状态：每个未闭合分组的种类与"是否已有内容"，外加属性悬值
//! 标记。结构性越界（闭合未打开的分组、上下文不容许的 token 种类、
//! 嵌套超限）立即报错。
//!
//! 两种排版：紧凑（无 token 间空白）与美化（每行一个值，按深度
//! 缩进）。空数组/空对象在两种排版下都写作 `[]`/`{}`，内部不换行。

use std::fmt::Write;

use jot_config::WriterOptions;
use tracing::trace;

use super::error::{FormatError, FormatResult};
use super::escape;
use super::number;
use crate::kit::token::{Primitive, QualifiedName, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Group {
    Array,
    Object,
}

/// 每个未闭合分组的排版状态
#[derive(Debug, Clone, Copy)]
struct Frame {
    group: Group,
    /// 分组内是否已写出成员（控制逗号与空容器排版）
    has_content: bool,
    /// 对象内属性已写出、值尚未写出
    after_property: bool,
}

/// JSON 格式化器
///
/// 推入式游标：token 逐个写入，`finish` 隐式闭合所有未完成分组
/// 并交还输出 sink。单次使用。
pub struct Formatter<W: Write> {
    out: W,
    options: WriterOptions,
    frames: Vec<Frame>,
    /// 已写出的顶层值数量（多个顶层值之间以换行分隔）
    root_values: usize,
}

impl<W: Write> Formatter<W> {
    /// 以默认配置（紧凑排版）创建格式化器
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    /// 以指定配置创建格式化器
    pub fn with_options(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            frames: Vec::new(),
            root_values: 0,
        }
    }

    /// 当前嵌套深度
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 写入一个 token
    pub fn write(&mut self, token: &Token) -> FormatResult<()> {
        trace!(target: "jot::formatter", kind = %token.kind(), depth = self.frames.len(), "Write token");
        match token {
            Token::ArrayBegin => self.begin_group(Group::Array),
            Token::ObjectBegin(_) => self.begin_group(Group::Object),
            Token::ArrayEnd => self.end_group(Group::Array, TokenKind::ArrayEnd),
            Token::ObjectEnd => self.end_group(Group::Object, TokenKind::ObjectEnd),
            Token::Property(name) => self.write_property(name),
            Token::Primitive(p) => self.write_primitive(p),
            Token::None => Err(FormatError::UnexpectedToken {
                found: TokenKind::None,
                expected: "value, property or group marker",
            }),
        }
    }

    /// 以符号常量的线名写出一个值
    ///
    /// 别名优先，其次标识符名；未声明的值是格式化错误。
    pub fn write_symbol(&mut self, value: i64) -> FormatResult<()> {
        let name = self
            .options
            .symbols
            .as_ref()
            .and_then(|t| t.wire_name(value))
            .map(str::to_string);

        match name {
            Some(name) => self.write(&Token::Primitive(Primitive::Text(name))),
            None => Err(FormatError::UnknownSymbol { value }),
        }
    }

    /// 隐式闭合所有未完成分组并交还输出 sink
    pub fn finish(mut self) -> FormatResult<W> {
        while let Some(frame) = self.frames.pop() {
            if frame.after_property {
                // 属性悬空：补 null 保证输出可重新解析
                self.out.write_str("null")?;
            }
            if frame.has_content && self.options.pretty {
                self.break_line(self.frames.len())?;
            }
            self.out.write_char(match frame.group {
                Group::Array => ']',
                Group::Object => '}',
            })?;
        }
        Ok(self.out)
    }

    /// 值（原始值或分组开始）前缀：分隔符与换行
    fn begin_value(&mut self, found: TokenKind) -> FormatResult<()> {
        let mut root_separator = false;
        let mut comma = false;
        let mut line_break = false;

        match self.frames.last_mut() {
            None => {
                root_separator = self.root_values > 0;
                self.root_values += 1;
            }
            Some(frame) if frame.group == Group::Object => {
                if !frame.after_property {
                    return Err(FormatError::UnexpectedToken {
                        found,
                        expected: "property",
                    });
                }
                // 值紧随冒号同行
                frame.after_property = false;
            }
            Some(frame) => {
                comma = frame.has_content;
                frame.has_content = true;
                line_break = true;
            }
        }

        if root_separator {
            self.out.write_str(&self.options.newline)?;
        }
        if comma {
            self.out.write_char(',')?;
        }
        if line_break && self.options.pretty {
            self.break_line(self.frames.len())?;
        }
        Ok(())
    }

    fn begin_group(&mut self, group: Group) -> FormatResult<()> {
        if let Some(limit) = self.options.max_depth {
            if self.frames.len() >= limit {
                return Err(FormatError::DepthExceeded { limit });
            }
        }

        let kind = match group {
            Group::Array => TokenKind::ArrayBegin,
            Group::Object => TokenKind::ObjectBegin,
        };
        self.begin_value(kind)?;

        self.out.write_char(match group {
            Group::Array => '[',
            Group::Object => '{',
        })?;
        self.frames.push(Frame {
            group,
            has_content: false,
            after_property: false,
        });
        Ok(())
    }

    fn end_group(&mut self, group: Group, found: TokenKind) -> FormatResult<()> {
        let frame = match self.frames.last() {
            None => return Err(FormatError::EndWithoutBegin { found }),
            Some(f) => *f,
        };

        if frame.group != group {
            let expected = match frame.group {
                Group::Array => TokenKind::ArrayEnd,
                Group::Object => TokenKind::ObjectEnd,
            };
            return Err(FormatError::MismatchedEnd { expected, found });
        }
        if frame.after_property {
            return Err(FormatError::UnexpectedToken {
                found,
                expected: "value",
            });
        }

        self.frames.pop();
        if frame.has_content && self.options.pretty {
            self.break_line(self.frames.len())?;
        }
        self.out.write_char(match group {
            Group::Array => ']',
            Group::Object => '}',
        })?;
        Ok(())
    }

    fn write_property(&mut self, name: &QualifiedName) -> FormatResult<()> {
        let comma;
        match self.frames.last_mut() {
            Some(frame) if frame.group == Group::Object => {
                if frame.after_property {
                    return Err(FormatError::UnexpectedToken {
                        found: TokenKind::Property,
                        expected: "value",
                    });
                }
                comma = frame.has_content;
                frame.has_content = true;
                frame.after_property = true;
            }
            _ => return Err(FormatError::PropertyOutsideObject),
        }

        if comma {
            self.out.write_char(',')?;
        }
        if self.options.pretty {
            self.break_line(self.frames.len())?;
        }

        // JSON 表层只使用限定名的局部名
        self.out.write_char('"')?;
        escape::encode_into(&mut self.out, name.local(), self.options.escape_angle)?;
        self.out.write_char('"')?;
        self.out.write_str(if self.options.pretty { " : " } else { ":" })?;
        Ok(())
    }

    fn write_primitive(&mut self, primitive: &Primitive) -> FormatResult<()> {
        self.begin_value(TokenKind::Primitive)?;

        match primitive {
            Primitive::Null => self.out.write_str("null")?,
            Primitive::Bool(true) => self.out.write_str("true")?,
            Primitive::Bool(false) => self.out.write_str("false")?,
            Primitive::Int32(v) => write!(self.out, "{}", v)?,
            Primitive::Int64(v) => number::write_i64(&mut self.out, *v)?,
            Primitive::Decimal(v) => number::write_decimal(&mut self.out, v)?,
            Primitive::Float64(v) => {
                number::write_f64(&mut self.out, *v, &self.options.nonfinite)?
            }
            Primitive::Text(text) => {
                self.out.write_char('"')?;
                escape::encode_into(&mut self.out, text, self.options.escape_angle)?;
                self.out.write_char('"')?;
            }
        }
        Ok(())
    }

    fn break_line(&mut self, depth: usize) -> FormatResult<()> {
        self.out.write_str(&self.options.newline)?;
        for _ in 0..depth {
            self.out.write_str(&self.options.indent)?;
        }
        Ok(())
    }
}
