//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了所有层级共享的单飞（single-flight）取数逻辑。
//!
//! 对同一个键：READY 直接返回缓存值；PENDING 挂到已有的在途请求上；
//! EMPTY 在同一个同步步骤内转为 PENDING 并启动唯一的一次取数。

use super::slot::{PendingFetch, Slot, SlotState};
use crate::error::{FetchResult, TransportError};
use crate::metrics::GLOBAL_METRICS;
use crate::model::Tier;
use dashmap::DashMap;
use futures::FutureExt;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// 层级上下文
///
/// 记录服务名称以及是否采集指标
#[derive(Debug, Clone)]
pub struct TierContext {
    service_name: Arc<str>,
    enable_metrics: bool,
}

impl TierContext {
    pub fn new(service_name: impl Into<Arc<str>>, enable_metrics: bool) -> Self {
        Self {
            service_name: service_name.into(),
            enable_metrics,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub(crate) fn record(&self, tier: Tier, op: &str, result: &str) {
        if self.enable_metrics {
            GLOBAL_METRICS.record_request(&self.service_name, tier.as_str(), op, result);
        }
    }
}

impl Default for TierContext {
    fn default() -> Self {
        Self::new("geocache", true)
    }
}

/// 加锁阶段的决定
enum Acquired<V> {
    Hit(Arc<[V]>),
    Wait(PendingFetch<V>),
}

/// 单飞取数协调器
///
/// 持有一个层级的槽位表。槽位表只由本协调器（取数与完成）和
/// [`invalidate`](Self::invalidate) 修改。
pub struct FetchCoordinator<K, V> {
    tier: Tier,
    context: TierContext,
    slots: Arc<DashMap<K, Slot<V>>>,
    next_generation: AtomicU64,
}

impl<K, V> FetchCoordinator<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// 创建新的协调器
    ///
    /// # 参数
    ///
    /// * `tier` - 所属层级
    /// * `context` - 层级上下文
    pub fn new(tier: Tier, context: TierContext) -> Self {
        Self {
            tier,
            context,
            slots: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// 所属层级
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// 获取键对应的值
    ///
    /// 在途期间所有调用者共享同一个结果或同一个错误。调用者放弃等待
    /// （丢弃返回的 future）不会取消底层取数。
    ///
    /// # 参数
    ///
    /// * `key` - 缓存键
    /// * `fetch` - 未命中时调用的取数函数，每个在途周期只有一个返回的 future 会被轮询
    ///
    /// # 返回值
    ///
    /// 返回缓存的列表或传输层错误
    #[instrument(skip(self, fetch), level = "debug", fields(tier = %self.tier))]
    pub async fn get<F, Fut>(&self, key: K, fetch: F) -> FetchResult<Arc<[V]>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<Vec<V>>> + Send + 'static,
    {
        match self.acquire(key, fetch) {
            Acquired::Hit(value) => Ok(value),
            Acquired::Wait(handle) => handle.await,
        }
    }

    /// 同步完成"检查并转为 PENDING"，期间不会让出控制权
    ///
    /// `fetch` 在不持有槽位锁时调用，可以同步访问本协调器。
    /// 它返回的 future 在被轮询前不得发起请求：若加锁后发现其他调用者
    /// 已经抢先启动取数，该 future 会被直接丢弃。
    fn acquire<F, Fut>(&self, key: K, fetch: F) -> Acquired<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<Vec<V>>> + Send + 'static,
    {
        let existing = self
            .slots
            .get(&key)
            .and_then(|slot| self.existing(&key, slot.value()));
        if let Some(acquired) = existing {
            return acquired;
        }

        let fut = fetch();

        let mut slot = self.slots.entry(key.clone()).or_insert(Slot::Empty);
        if let Some(acquired) = self.existing(&key, slot.value()) {
            return acquired;
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        debug!(
            "{} get: key={:?}, miss, starting fetch generation={}",
            self.tier, key, generation
        );
        self.context.record(self.tier, "get", "miss");
        // 完成任务写回前需要拿到该键所在分片的锁，
        // 因此它不可能早于下面这次 Pending 写入生效
        let handle = self.spawn_fetch(key, generation, fut);
        *slot = Slot::Pending {
            generation,
            handle: handle.clone(),
        };
        Acquired::Wait(handle)
    }

    /// READY 直接命中，PENDING 挂到在途请求上，EMPTY 返回 None
    fn existing(&self, key: &K, slot: &Slot<V>) -> Option<Acquired<V>> {
        match slot {
            Slot::Ready(value) => {
                debug!("{} get: key={:?}, hit", self.tier, key);
                self.context.record(self.tier, "get", "hit");
                Some(Acquired::Hit(Arc::clone(value)))
            }
            Slot::Pending { generation, handle } => {
                debug!(
                    "{} get: key={:?}, joining in-flight fetch generation={}",
                    self.tier, key, generation
                );
                self.context.record(self.tier, "get", "join");
                Some(Acquired::Wait(handle.clone()))
            }
            Slot::Empty => None,
        }
    }

    /// 启动后台取数任务
    ///
    /// 任务总会运行到结束并恰好写回一次（若槽位在此期间已失效则丢弃结果）
    fn spawn_fetch<Fut>(&self, key: K, generation: u64, fut: Fut) -> PendingFetch<V>
    where
        Fut: Future<Output = FetchResult<Vec<V>>> + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        let context = self.context.clone();
        let tier = self.tier;

        let task = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(items)) => Ok(Arc::<[V]>::from(items)),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(TransportError::new("fetch panicked")),
            };

            match &outcome {
                Ok(items) => {
                    debug!(
                        "{} fetch: key={:?}, generation={}, loaded {} items",
                        tier,
                        key,
                        generation,
                        items.len()
                    );
                    context.record(tier, "fetch", "success");
                }
                Err(e) => {
                    warn!(
                        "{} fetch: key={:?}, generation={}, failed: {}",
                        tier, key, generation, e
                    );
                    context.record(tier, "fetch", "failure");
                }
            }

            if !Self::settle(&slots, &key, generation, &outcome) {
                debug!(
                    "{} fetch: key={:?}, generation={} invalidated while pending, result discarded",
                    tier, key, generation
                );
                context.record(tier, "fetch", "discarded");
            }

            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(TransportError::new(format!("fetch task aborted: {}", e))),
            }
        }
        .boxed()
        .shared()
    }

    /// 写回取数结果：成功转为 READY，失败转回 EMPTY
    ///
    /// 只有槽位仍处于同一代号的 PENDING 时才写回
    fn settle(
        slots: &DashMap<K, Slot<V>>,
        key: &K,
        generation: u64,
        outcome: &FetchResult<Arc<[V]>>,
    ) -> bool {
        let Some(mut slot) = slots.get_mut(key) else {
            return false;
        };
        if !slot.is_pending_for(generation) {
            return false;
        }
        *slot = match outcome {
            Ok(items) => Slot::Ready(Arc::clone(items)),
            Err(_) => Slot::Empty,
        };
        true
    }

    /// 使键失效
    ///
    /// 无条件将槽位重置为 EMPTY；在途请求不会被取消，但其结果会被丢弃。
    /// 其他键的槽位不受影响。
    ///
    /// # 返回值
    ///
    /// 返回失效前的状态
    pub fn invalidate(&self, key: &K) -> SlotState {
        let previous = match self.slots.get_mut(key) {
            Some(mut slot) => {
                let previous = slot.state();
                *slot = Slot::Empty;
                previous
            }
            None => SlotState::Empty,
        };

        debug!(
            "{} invalidate: key={:?}, previous={}",
            self.tier, key, previous
        );
        let result = if previous == SlotState::Empty {
            "noop"
        } else {
            "evicted"
        };
        self.context.record(self.tier, "invalidate", result);
        previous
    }

    /// 查询槽位状态，不会创建槽位
    pub fn state(&self, key: &K) -> SlotState {
        self.slots
            .get(key)
            .map(|slot| slot.state())
            .unwrap_or(SlotState::Empty)
    }

    /// 已创建的槽位数量
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
