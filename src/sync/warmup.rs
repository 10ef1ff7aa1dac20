//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存预热：会话开始时预先加载常用列表。

use crate::config::WarmupConfig;
use crate::error::FetchResult;
use crate::manager::GeoCache;
use crate::model::Tier;
use futures::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub struct WarmupManager {
    service_name: String,
    config: WarmupConfig,
    warmup_status: Arc<RwLock<HashMap<Tier, WarmupStatus>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WarmupStatus {
    Pending,
    InProgress { progress: usize, total: usize },
    Completed { loaded: usize, failed: usize },
    Failed { error: String },
}

/// 预热计数，超时后仍能读出已完成的部分
#[derive(Debug, Default)]
struct WarmupProgress {
    loaded: AtomicUsize,
    failed: AtomicUsize,
}

impl WarmupProgress {
    fn record(&self, result: &FetchResult<()>) {
        let counter = if result.is_ok() {
            &self.loaded
        } else {
            &self.failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn totals(&self) -> (usize, usize) {
        (
            self.loaded.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarmupResult {
    pub loaded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub success: bool,
}

impl WarmupResult {
    pub fn skipped() -> Self {
        Self {
            loaded: 0,
            failed: 0,
            skipped: 1,
            success: true,
        }
    }

    pub fn failed(loaded: usize, failed: usize) -> Self {
        Self {
            loaded,
            failed,
            skipped: 0,
            success: false,
        }
    }
}

impl WarmupManager {
    pub fn new(service_name: impl Into<String>, config: WarmupConfig) -> Self {
        Self {
            service_name: service_name.into(),
            config,
            warmup_status: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 执行预热
    ///
    /// 依次预加载大区、配置的子区域列表和地点列表。
    /// 单个列表失败只计数，不中断预热；整体受超时限制。
    pub async fn run_warmup(&self, cache: &GeoCache) -> WarmupResult {
        info!(
            "Starting cache warmup for service: {}, enabled: {}",
            self.service_name, self.config.enabled
        );

        if !self.config.enabled {
            info!("Cache warmup is disabled, skipping");
            return WarmupResult::skipped();
        }

        let progress = WarmupProgress::default();
        let timeout = tokio::time::Duration::from_secs(self.config.timeout_seconds);
        match tokio::time::timeout(timeout, self.warmup_inner(cache, &progress)).await {
            Ok(result) => {
                info!(
                    "Cache warmup completed: loaded={}, failed={}, skipped={}",
                    result.loaded, result.failed, result.skipped
                );
                result
            }
            Err(_) => {
                let (loaded, failed) = progress.totals();
                warn!(
                    "Cache warmup timed out after {} seconds: loaded={}, failed={}",
                    self.config.timeout_seconds, loaded, failed
                );
                let mut status_map = self.warmup_status.write().await;
                for status in status_map.values_mut() {
                    if matches!(status, WarmupStatus::InProgress { .. }) {
                        *status = WarmupStatus::Failed {
                            error: "timeout".to_string(),
                        };
                    }
                }
                WarmupResult::failed(loaded, failed)
            }
        }
    }

    async fn warmup_inner(&self, cache: &GeoCache, progress: &WarmupProgress) -> WarmupResult {
        self.load_tier(Tier::Region, vec![()], progress, |_| async move {
            cache.get_regions().await.map(|_| ())
        })
        .await;

        self.load_tier(
            Tier::SubRegion,
            self.config.region_ids.clone(),
            progress,
            |id| async move { cache.get_sub_regions(&id).await.map(|_| ()) },
        )
        .await;

        self.load_tier(
            Tier::Locality,
            self.config.sub_region_ids.clone(),
            progress,
            |id| async move { cache.get_localities(&id).await.map(|_| ()) },
        )
        .await;

        let (total_loaded, total_failed) = progress.totals();
        WarmupResult {
            loaded: total_loaded,
            failed: total_failed,
            skipped: 0,
            success: total_failed == 0,
        }
    }

    /// 并发加载一个层级的全部键，每个列表完成时立即计入 `progress`
    async fn load_tier<I, F, Fut>(
        &self,
        tier: Tier,
        keys: Vec<I>,
        progress: &WarmupProgress,
        load: F,
    ) where
        F: Fn(I) -> Fut,
        Fut: Future<Output = FetchResult<()>>,
    {
        let total = keys.len();
        if total == 0 {
            return;
        }

        self.set_status(tier, WarmupStatus::InProgress { progress: 0, total })
            .await;
        debug!("Warming {} {} lists", total, tier);

        let results = join_all(keys.into_iter().map(|key| {
            let fut = load(key);
            async move {
                let result = fut.await;
                progress.record(&result);
                result
            }
        }))
        .await;
        let mut loaded = 0usize;
        let mut failed = 0usize;
        for result in results {
            match result {
                Ok(()) => loaded += 1,
                Err(e) => {
                    warn!("Failed to warm {} list: {}", tier, e);
                    failed += 1;
                }
            }
        }

        let status = if loaded == 0 {
            WarmupStatus::Failed {
                error: format!("all {} {} lists failed", failed, tier),
            }
        } else {
            WarmupStatus::Completed { loaded, failed }
        };
        self.set_status(tier, status).await;
    }

    async fn set_status(&self, tier: Tier, status: WarmupStatus) {
        self.warmup_status.write().await.insert(tier, status);
    }

    pub async fn get_status(&self, tier: Tier) -> WarmupStatus {
        let status_map = self.warmup_status.read().await;
        status_map
            .get(&tier)
            .cloned()
            .unwrap_or(WarmupStatus::Pending)
    }
}
