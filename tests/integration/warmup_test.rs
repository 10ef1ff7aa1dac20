//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 缓存预热集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{new_cache, setup_logging, wait_until, FakeBackend};
use geocache::config::WarmupConfig;
use geocache::{SlotState, Tier, WarmupManager, WarmupStatus};

fn warmup_config(region_ids: &[&str], sub_region_ids: &[&str]) -> WarmupConfig {
    WarmupConfig {
        enabled: true,
        timeout_seconds: 5,
        region_ids: region_ids.iter().map(|s| s.to_string()).collect(),
        sub_region_ids: sub_region_ids.iter().map(|s| s.to_string()).collect(),
    }
}

/// 测试禁用预热
#[tokio::test]
async fn test_disabled_warmup_is_skipped() {
    setup_logging();
    let backend = FakeBackend::seeded();
    let cache = new_cache(&backend, "warmup_disabled");

    let manager = WarmupManager::new(cache.service_name(), WarmupConfig::default());
    let result = manager.run_warmup(&cache).await;

    assert!(result.success);
    assert_eq!(result.skipped, 1);
    assert_eq!(backend.total_fetch_calls(), 0);
    assert_eq!(manager.get_status(Tier::Region).await, WarmupStatus::Pending);
}

/// 测试预热后的读取直接命中
#[tokio::test]
async fn test_warmup_preloads_configured_lists() {
    setup_logging();
    let backend = FakeBackend::seeded();
    let cache = new_cache(&backend, "warmup_preload");

    let manager = WarmupManager::new(
        cache.service_name(),
        warmup_config(&["g1", "g2"], &["s1"]),
    );
    let result = manager.run_warmup(&cache).await;

    assert!(result.success);
    assert_eq!(result.loaded, 4);
    assert_eq!(result.failed, 0);
    assert_eq!(
        manager.get_status(Tier::SubRegion).await,
        WarmupStatus::Completed {
            loaded: 2,
            failed: 0
        }
    );

    assert_eq!(cache.regions().state(), SlotState::Ready);
    assert_eq!(cache.sub_regions().state("g2"), SlotState::Ready);
    assert_eq!(cache.localities().state("s1"), SlotState::Ready);

    let calls_after_warmup = backend.total_fetch_calls();
    cache.get_regions().await.unwrap();
    cache.get_sub_regions("g1").await.unwrap();
    cache.get_localities("s1").await.unwrap();
    assert_eq!(backend.total_fetch_calls(), calls_after_warmup);
}

/// 测试部分失败
///
/// 单个列表失败只计数，不中断其余层级
#[tokio::test]
async fn test_warmup_counts_failures() {
    setup_logging();
    let backend = FakeBackend::seeded();
    backend.fail_key("s9");
    let cache = new_cache(&backend, "warmup_failures");

    let manager = WarmupManager::new(cache.service_name(), warmup_config(&["g1"], &["s9"]));
    let result = manager.run_warmup(&cache).await;

    assert!(!result.success);
    assert_eq!(result.loaded, 2);
    assert_eq!(result.failed, 1);
    assert!(matches!(
        manager.get_status(Tier::Locality).await,
        WarmupStatus::Failed { .. }
    ));
    assert_eq!(cache.localities().state("s9"), SlotState::Empty);
}

/// 测试预热超时
///
/// 超时只结束预热本身，在途取数不会被取消
#[tokio::test]
async fn test_warmup_timeout_leaves_fetch_in_flight() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    let cache = new_cache(&backend, "warmup_timeout");

    let mut config = warmup_config(&[], &[]);
    config.timeout_seconds = 1;
    let manager = WarmupManager::new(cache.service_name(), config);
    let result = manager.run_warmup(&cache).await;

    assert!(!result.success);
    assert_eq!(result.loaded, 0);
    assert_eq!(result.failed, 0);
    assert_eq!(
        manager.get_status(Tier::Region).await,
        WarmupStatus::Failed {
            error: "timeout".to_string()
        }
    );
    assert_eq!(cache.regions().state(), SlotState::Pending);
    assert_eq!(backend.region_calls(), 1);

    gate.add_permits(1);
    wait_until(|| cache.regions().state() == SlotState::Ready).await;
    assert_eq!(cache.get_regions().await.unwrap().len(), 2);
    assert_eq!(backend.region_calls(), 1);
}

/// 测试超时后仍报告已完成的部分
#[tokio::test]
async fn test_warmup_timeout_reports_partial_progress() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    // 只放行大区取数，子区域取数停在在途状态
    gate.add_permits(1);
    let cache = new_cache(&backend, "warmup_partial");

    let mut config = warmup_config(&["g1"], &[]);
    config.timeout_seconds = 1;
    let manager = WarmupManager::new(cache.service_name(), config);
    let result = manager.run_warmup(&cache).await;

    assert!(!result.success);
    assert_eq!(result.loaded, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(
        manager.get_status(Tier::Region).await,
        WarmupStatus::Completed {
            loaded: 1,
            failed: 0
        }
    );
    assert!(matches!(
        manager.get_status(Tier::SubRegion).await,
        WarmupStatus::Failed { .. }
    ));
    assert_eq!(cache.regions().state(), SlotState::Ready);
    assert_eq!(cache.sub_regions().state("g1"), SlotState::Pending);
}
