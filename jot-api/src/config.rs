//! API 层配置
//!
//! 打包一次构造、只读传递的选项对象，外加供宿主便利使用的全局单例。
//! 核心层从不读取全局状态。

use jot_config::{LogConfig, ReaderOptions, WriterOptions};
use once_cell::sync::OnceCell;

/// 运行配置：解码与编码两侧的选项打包
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// 解码路径配置
    pub reader: ReaderOptions,
    /// 编码路径配置
    pub writer: WriterOptions,
    /// 日志配置
    pub log: LogConfig,
}

// Global options singleton for host convenience
static GLOBAL_OPTIONS: OnceCell<RunOptions> = OnceCell::new();

/// Initialize global options (must be called once before any global-API use)
///
/// # Panics
/// If options are already initialized
pub fn init(options: RunOptions) {
    GLOBAL_OPTIONS
        .set(options)
        .expect("Options already initialized");
}

/// Get global options reference
///
/// # Panics
/// If options are not initialized
pub fn options() -> &'static RunOptions {
    GLOBAL_OPTIONS.get().expect("Options not initialized")
}

/// Check if global options are initialized
pub fn is_initialized() -> bool {
    GLOBAL_OPTIONS.get().is_some()
}
