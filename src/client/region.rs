//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了顶层大区列表缓存。

use crate::backend::{FetchCoordinator, SlotState, TierContext};
use crate::error::FetchResult;
use crate::model::{Region, Tier};
use crate::transport::Transport;
use std::sync::Arc;
use tracing::instrument;

/// 大区缓存
///
/// 只有一个不带键的槽位
pub struct RegionCache {
    transport: Arc<dyn Transport>,
    coordinator: FetchCoordinator<(), Region>,
}

impl RegionCache {
    /// 创建新的大区缓存
    pub fn new(transport: Arc<dyn Transport>, context: TierContext) -> Self {
        Self {
            transport,
            coordinator: FetchCoordinator::new(Tier::Region, context),
        }
    }

    /// 获取大区列表
    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self) -> FetchResult<Arc<[Region]>> {
        let transport = Arc::clone(&self.transport);
        self.coordinator
            .get((), move || async move { transport.fetch_regions().await })
            .await
    }

    /// 无条件重置槽位为 EMPTY，返回之前的状态
    pub fn invalidate(&self) -> SlotState {
        self.coordinator.invalidate(&())
    }

    pub fn state(&self) -> SlotState {
        self.coordinator.state(&())
    }
}
