//! 抽象 token 流
//!
//! JSON、XML 与混合格式共享的 token 形状。其他子系统只看到这一层，
//! 不接触各格式词法器/绑定器的内部。
//!
//! Token 序列良构当且仅当：每个 Begin 在同一深度有匹配的 End；
//! Property 只出现在对象上下文内且紧跟恰好一个值；嵌套不超过配置
//! 上限。词法器不完整实施该不变量，绑定器与格式化器实施。

use rust_decimal::Decimal;

/// 限定名
///
/// 局部名 + 可选命名空间 URI + 可选前缀 + 属性标记。
/// 不可变值类型；JSON 表层只使用局部名，命名空间字段服务于
/// 其他子系统构建的带命名空间表层格式。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    local: String,
    namespace: Option<String>,
    prefix: Option<String>,
    attribute: bool,
}

impl QualifiedName {
    /// 创建纯局部名（JSON 属性）
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            namespace: None,
            prefix: None,
            attribute: false,
        }
    }

    /// 附加命名空间 URI 与前缀
    pub fn with_namespace(mut self, uri: impl Into<String>, prefix: Option<&str>) -> Self {
        self.namespace = Some(uri.into());
        self.prefix = prefix.map(str::to_string);
        self
    }

    /// 标记为属性名
    pub fn as_attribute(mut self) -> Self {
        self.attribute = true;
        self
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn is_attribute(&self) -> bool {
        self.attribute
    }
}

/// 原始值
///
/// 闭合的数值/字符串/布尔/空值集合。数值种类按最窄无损表示选择，
/// 模式匹配分发保证编译期穷尽检查。
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    /// 无小数部分、无指数且落在 32 位有符号范围内
    Int32(i32),
    /// 超出 32 位但落在 64 位有符号范围内
    Int64(i64),
    /// 带小数部分或指数的值
    Float64(f64),
    /// 超出 64 位的整数字面量（96 位十进制范围内）
    Decimal(Decimal),
    Text(String),
}

impl Primitive {
    /// 种类名称（用于错误消息）
    pub fn kind_name(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Bool(_) => "boolean",
            Primitive::Int32(_) => "int32",
            Primitive::Int64(_) => "int64",
            Primitive::Float64(_) => "float64",
            Primitive::Decimal(_) => "decimal",
            Primitive::Text(_) => "text",
        }
    }
}

/// Token 种类（不携带负载）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    None,
    ArrayBegin,
    ArrayEnd,
    ObjectBegin,
    ObjectEnd,
    Property,
    Primitive,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::None => "none",
            TokenKind::ArrayBegin => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::ObjectBegin => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::Property => "property",
            TokenKind::Primitive => "value",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结构/值事件
///
/// 惰性逐个产出，只进不退，消费一次即废（除非显式缓冲）。
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Token {
    /// 哨兵值：游标尚未产出任何 token
    #[default]
    None,
    ArrayBegin,
    ArrayEnd,
    /// 对象开始；带命名空间的表层格式会携带限定名，JSON 恒为 None
    ObjectBegin(Option<QualifiedName>),
    ObjectEnd,
    Property(QualifiedName),
    Primitive(Primitive),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::None => TokenKind::None,
            Token::ArrayBegin => TokenKind::ArrayBegin,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::ObjectBegin(_) => TokenKind::ObjectBegin,
            Token::ObjectEnd => TokenKind::ObjectEnd,
            Token::Property(_) => TokenKind::Property,
            Token::Primitive(_) => TokenKind::Primitive,
        }
    }

    /// 是否为分组开始
    pub fn is_begin(&self) -> bool {
        matches!(self, Token::ArrayBegin | Token::ObjectBegin(_))
    }

    /// 是否为分组结束
    pub fn is_end(&self) -> bool {
        matches!(self, Token::ArrayEnd | Token::ObjectEnd)
    }
}
