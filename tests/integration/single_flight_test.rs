//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 单飞模式集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{new_cache, setup_logging, wait_until, FakeBackend};
use geocache::SlotState;
use std::sync::Arc;
use tokio::sync::Barrier;

/// 测试并发获取大区列表
///
/// 首次取数完成前发起的5次 get 只触发一次传输调用，且结果完全相同
#[tokio::test]
async fn test_concurrent_region_lookups_share_one_fetch() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    let cache = new_cache(&backend, "single_flight");

    let (a, b, c, d, e, _) = tokio::join!(
        cache.get_regions(),
        cache.get_regions(),
        cache.get_regions(),
        cache.get_regions(),
        cache.get_regions(),
        async {
            assert_eq!(cache.regions().state(), SlotState::Pending);
            gate.add_permits(1);
        }
    );

    let results = [a.unwrap(), b.unwrap(), c.unwrap(), d.unwrap(), e.unwrap()];
    for result in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], result));
    }
    assert_eq!(results[0].len(), 2);
    assert_eq!(backend.region_calls(), 1);
}

/// 测试并发等待者共享同一个错误
#[tokio::test]
async fn test_concurrent_waiters_share_failure() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    backend.fail_next_fetches(1);
    let cache = new_cache(&backend, "single_flight_failure");

    let (a, b, c, _) = tokio::join!(
        cache.get_sub_regions("g1"),
        cache.get_sub_regions("g1"),
        cache.get_sub_regions("g1"),
        async {
            gate.add_permits(1);
        }
    );

    let (a, b, c) = (a.unwrap_err(), b.unwrap_err(), c.unwrap_err());
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.message.as_deref(), Some("simulated outage"));
    assert_eq!(backend.sub_region_calls(), 1);
    assert_eq!(cache.sub_regions().state("g1"), SlotState::Empty);
}

/// 测试多线程高并发请求
///
/// 50个任务同时请求同一个子区域的地点列表，只产生一次传输调用
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_flight_across_worker_threads() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    let cache = new_cache(&backend, "single_flight_mt");

    let concurrency = 50;
    let barrier = Arc::new(Barrier::new(concurrency));
    let mut handles = vec![];

    for _ in 0..concurrency {
        let c = cache.clone();
        let b = barrier.clone();
        handles.push(tokio::spawn(async move {
            b.wait().await;
            c.get_localities("s1").await
        }));
    }

    wait_until(|| backend.locality_calls() == 1).await;
    gate.add_permits(1);

    let mut values = vec![];
    for handle in handles {
        values.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(values.len(), concurrency);
    for value in &values {
        assert_eq!(value.as_ref(), values[0].as_ref());
    }
    assert_eq!(backend.locality_calls(), 1);
}

/// 测试不同键各自取数
#[tokio::test]
async fn test_distinct_keys_fetch_independently() {
    setup_logging();
    let backend = FakeBackend::seeded();
    let cache = new_cache(&backend, "single_flight_keys");

    let (g1, g2) = tokio::join!(cache.get_sub_regions("g1"), cache.get_sub_regions("g2"));
    assert_eq!(g1.unwrap().len(), 2);
    assert_eq!(g2.unwrap().len(), 1);
    assert_eq!(backend.sub_region_calls(), 2);
}

/// 测试放弃等待不会取消底层取数
///
/// 唯一的等待者被中止后，取数仍然完成并写回槽位
#[tokio::test]
async fn test_abandoned_waiter_does_not_cancel_fetch() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    let cache = new_cache(&backend, "single_flight_abandon");

    let waiter = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get_regions().await })
    };

    wait_until(|| cache.regions().state() == SlotState::Pending).await;
    waiter.abort();
    assert!(waiter.await.unwrap_err().is_cancelled());
    assert_eq!(cache.regions().state(), SlotState::Pending);

    gate.add_permits(1);
    wait_until(|| cache.regions().state() == SlotState::Ready).await;

    let regions = cache.get_regions().await.unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(backend.region_calls(), 1);
}

/// 测试超时丢弃等待者
///
/// 使用方自行加的超时只影响自己，其他等待者仍然拿到结果
#[tokio::test]
async fn test_local_timeout_does_not_affect_other_waiters() {
    setup_logging();
    let (backend, gate) = FakeBackend::gated();
    let cache = new_cache(&backend, "single_flight_timeout");

    let impatient = tokio::time::timeout(
        std::time::Duration::from_millis(10),
        cache.get_sub_regions("g2"),
    )
    .await;
    assert!(impatient.is_err());
    assert_eq!(cache.sub_regions().state("g2"), SlotState::Pending);

    let (patient, _) = tokio::join!(cache.get_sub_regions("g2"), async {
        gate.add_permits(1);
    });
    assert_eq!(patient.unwrap()[0].id, "s3");
    assert_eq!(backend.sub_region_calls(), 1);
}
