//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了日志与链路追踪的初始化。

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing subscriber
///
/// 此函数应该在应用程序启动时调用一次；重复调用不会生效。
/// 设置了 `RUST_LOG` 时以环境变量为准，否则使用 `default_filter`。
///
/// # 参数
///
/// * `default_filter` - 默认过滤表达式，例如配置中的 `global.log_filter`
///
/// # 返回值
///
/// 本次调用是否成功安装了全局 subscriber
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
