//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的指标收集和监控功能。

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{span, Level};

/// 指标收集器
///
/// 用于收集和存储缓存系统的各种运行时指标
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// 请求总数统计
    /// key: "service:tier:op:result"
    pub requests_total: Arc<Mutex<HashMap<String, u64>>>,
}

lazy_static! {
    /// 全局指标实例
    pub static ref GLOBAL_METRICS: Metrics = Metrics::default();
}

fn lock(map: &Mutex<HashMap<String, u64>>) -> MutexGuard<'_, HashMap<String, u64>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Metrics {
    /// 记录请求指标
    ///
    /// # 参数
    ///
    /// * `service` - 服务名称
    /// * `tier` - 缓存层级（region/sub_region/locality）
    /// * `op` - 操作类型（get/fetch/invalidate）
    /// * `result` - 操作结果（hit/join/miss/success/failure/...）
    pub fn record_request(&self, service: &str, tier: &str, op: &str, result: &str) {
        let span = span!(Level::TRACE, "cache_request", service, tier, op, result);
        let _enter = span.enter();
        let key = format!("{}:{}:{}:{}", service, tier, op, result);
        *lock(&self.requests_total).entry(key).or_insert(0) += 1;
    }

    /// 读取单个计数
    pub fn get_count(&self, service: &str, tier: &str, op: &str, result: &str) -> u64 {
        let key = format!("{}:{}:{}:{}", service, tier, op, result);
        lock(&self.requests_total).get(&key).copied().unwrap_or(0)
    }

    /// 清除指定服务的全部计数
    pub fn clear_service(&self, service: &str) {
        let prefix = format!("{}:", service);
        lock(&self.requests_total).retain(|k, _| !k.starts_with(&prefix));
    }
}

/// 获取指标字符串
///
/// 将所有指标格式化为Prometheus文本格式，用于监控系统采集
pub fn get_metrics_string() -> String {
    let reqs = lock(&GLOBAL_METRICS.requests_total);

    let mut entries: Vec<_> = reqs.iter().collect();
    entries.sort();

    let mut output = String::new();
    for (k, v) in entries {
        let parts: Vec<&str> = k.split(':').collect();
        if parts.len() == 4 {
            output.push_str(&format!(
                "geocache_requests_total{{service=\"{}\", tier=\"{}\", operation=\"{}\", result=\"{}\"}} {}\n",
                parts[0], parts[1], parts[2], parts[3], v
            ));
        }
    }
    output
}
