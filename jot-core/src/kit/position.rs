//! 源文本位置追踪
//!
//! 支持多坐标系统，满足不同场景需求：
//! - index: 绝对字符偏移（0-based），错误报告使用
//! - line/column: 人类可读的错误显示（1-based）
//! - byte_offset: 零拷贝切片使用（0-based，UTF-8 字节）

/// 源文本位置
///
/// 始终指向下一个未读字符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    /// 绝对字符偏移，0-based
    pub index: usize,
    /// 行号，1-based，用于错误显示
    pub line: usize,
    /// 列号，1-based，Unicode 码点计数
    pub column: usize,
    /// 字节偏移，0-based，UTF-8 编码，用于输入切片
    pub byte_offset: usize,
}

impl SourcePosition {
    /// 创建新位置
    pub fn new(index: usize, line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            index,
            line,
            column,
            byte_offset,
        }
    }

    /// 文本起始位置
    pub fn start() -> Self {
        Self {
            index: 0,
            line: 1,
            column: 1,
            byte_offset: 0,
        }
    }

    /// 前进一个字符
    pub fn advance(&mut self, c: char) {
        self.index += 1;
        self.byte_offset += c.len_utf8();

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
