//! 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分阶段日志控制。

use std::io;

use jot_config::{LogConfig, LogLevel, Phase};
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 使用指定格式和日志配置初始化日志系统
///
/// # Panics
/// If a global subscriber is already installed
pub fn init(config: &LogConfig, format: LogFormat) {
    // Build filter targets
    let targets = Targets::new()
        .with_default(to_filter(config.global))
        .with_target(
            Phase::Lexer.target(),
            to_filter(config.level_for(Phase::Lexer)),
        )
        .with_target(
            Phase::Binder.target(),
            to_filter(config.level_for(Phase::Binder)),
        )
        .with_target(
            Phase::Formatter.target(),
            to_filter(config.level_for(Phase::Formatter)),
        );

    let layer = create_format_layer(format, io::stdout).with_filter(targets);
    tracing_subscriber::registry().with(layer).init();
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(
    format: LogFormat,
    make_writer: F,
) -> impl Layer<tracing_subscriber::Registry>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

fn to_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mapping() {
        assert_eq!(to_filter(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(to_filter(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(to_filter(LogLevel::Warn), LevelFilter::WARN);
    }
}
