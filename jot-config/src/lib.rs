//! Jot Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state
//! beyond trivial lookups. It serves as the shared configuration
//! vocabulary across all Jot crates.

use serde::{Deserialize, Serialize};

/// Configuration for the decode path (lexer + binder)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Maximum nesting depth; `None` means unbounded
    pub max_depth: Option<usize>,
    /// Symbolic-constant table used when coercing primitives
    pub symbols: Option<SymbolTable>,
}

/// Configuration for the encode path (formatter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterOptions {
    /// One value per line with indentation, instead of compact output
    pub pretty: bool,
    /// Maximum nesting depth; `None` means unbounded
    pub max_depth: Option<usize>,
    /// Line separator used in pretty layout
    pub newline: String,
    /// Indent unit repeated once per nesting level
    pub indent: String,
    /// Escape `<` in strings (safe inline embedding)
    pub escape_angle: bool,
    /// Text emitted for NaN and ±Infinity (strict JSON has no literal)
    pub nonfinite: String,
    /// Symbolic-constant table used when emitting symbols
    pub symbols: Option<SymbolTable>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            max_depth: None,
            newline: "\n".to_string(),
            indent: "\t".to_string(),
            escape_angle: false,
            nonfinite: "null".to_string(),
            symbols: None,
        }
    }
}

impl WriterOptions {
    /// Pretty layout with the default newline and tab indent
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Default::default()
        }
    }
}

/// One symbolic constant: canonical name, optional wire alias, numeric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Identifier name as declared by the host type
    pub name: String,
    /// Declared alternate (wire) name, preferred on both lookup and emission
    pub alternate: Option<String>,
    /// Numeric value, the last-resort representation
    pub value: i64,
}

/// Alternate-name resolver for symbolic constants
///
/// Lookup order during binding is: declared alternate name, identifier
/// name, numeric value. Emission prefers the alternate name when declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one constant
    pub fn insert(&mut self, name: impl Into<String>, alternate: Option<&str>, value: i64) {
        self.entries.push(SymbolEntry {
            name: name.into(),
            alternate: alternate.map(str::to_string),
            value,
        });
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Lookup by declared alternate name
    pub fn by_alternate(&self, text: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.alternate.as_deref() == Some(text))
            .map(|e| e.value)
    }

    /// Lookup by identifier name
    pub fn by_name(&self, text: &str) -> Option<i64> {
        self.entries.iter().find(|e| e.name == text).map(|e| e.value)
    }

    /// Check that a numeric value names a declared constant
    pub fn by_value(&self, value: i64) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.value == value)
    }

    /// Name used on the wire: alternate when declared, identifier otherwise
    pub fn wire_name(&self, value: i64) -> Option<&str> {
        self.by_value(value)
            .map(|e| e.alternate.as_deref().unwrap_or(&e.name))
    }
}

/// Log verbosity for one target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Per-stage logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level for all targets
    pub global: LogLevel,
    /// Per-stage overrides
    pub lexer: Option<LogLevel>,
    pub binder: Option<LogLevel>,
    pub formatter: Option<LogLevel>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: LogLevel::Warn,
            lexer: None,
            binder: None,
            formatter: None,
        }
    }
}

impl LogConfig {
    /// Effective level for a pipeline stage
    pub fn level_for(&self, phase: Phase) -> LogLevel {
        let override_level = match phase {
            Phase::Lexer => self.lexer,
            Phase::Binder => self.binder,
            Phase::Formatter => self.formatter,
        };
        override_level.unwrap_or(self.global)
    }
}

/// Pipeline stage enum for phase-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lexer,
    Binder,
    Formatter,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Binder => "binder",
            Phase::Formatter => "formatter",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("jot::{}", self.as_str())
    }
}
