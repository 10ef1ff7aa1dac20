//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了按父级ID分槽的层级缓存（子区域、地点）。

use crate::backend::{FetchCoordinator, SlotState, TierContext};
use crate::error::FetchResult;
use crate::model::{Locality, SubRegion, Tier};
use crate::transport::Transport;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// 按父级键缓存的条目类型
///
/// 把层级和对应的传输层读取方法绑定在一起
pub trait KeyedItem: Send + Sync + Sized + 'static {
    /// 条目所在层级
    const TIER: Tier;

    /// 读取某个父级下的全部条目
    fn fetch(
        transport: Arc<dyn Transport>,
        parent_key: String,
    ) -> BoxFuture<'static, FetchResult<Vec<Self>>>;
}

impl KeyedItem for SubRegion {
    const TIER: Tier = Tier::SubRegion;

    fn fetch(
        transport: Arc<dyn Transport>,
        region_id: String,
    ) -> BoxFuture<'static, FetchResult<Vec<Self>>> {
        async move { transport.fetch_sub_regions(&region_id).await }.boxed()
    }
}

impl KeyedItem for Locality {
    const TIER: Tier = Tier::Locality;

    fn fetch(
        transport: Arc<dyn Transport>,
        sub_region_id: String,
    ) -> BoxFuture<'static, FetchResult<Vec<Self>>> {
        async move { transport.fetch_localities(&sub_region_id).await }.boxed()
    }
}

/// 按父级键分槽的层级缓存
///
/// 每个父级ID对应一个槽位，首次 `get` 时惰性创建
pub struct KeyedTierCache<V> {
    transport: Arc<dyn Transport>,
    coordinator: FetchCoordinator<String, V>,
}

/// 子区域缓存（键：大区ID）
pub type SubRegionCache = KeyedTierCache<SubRegion>;

/// 地点缓存（键：子区域ID）
pub type LocalityCache = KeyedTierCache<Locality>;

impl<V: KeyedItem> KeyedTierCache<V> {
    pub fn new(transport: Arc<dyn Transport>, context: TierContext) -> Self {
        Self {
            transport,
            coordinator: FetchCoordinator::new(V::TIER, context),
        }
    }

    /// 获取父级键下的列表
    ///
    /// 父级键为空时直接返回空列表，不查槽位也不访问传输层
    /// （级联菜单的上一级尚未选择）。
    #[instrument(skip(self), level = "debug", fields(tier = %V::TIER))]
    pub async fn get(&self, parent_key: &str) -> FetchResult<Arc<[V]>> {
        if parent_key.is_empty() {
            debug!("{} get: empty parent key, returning empty list", V::TIER);
            return Ok(Arc::from(Vec::new()));
        }

        let transport = Arc::clone(&self.transport);
        let key = parent_key.to_string();
        self.coordinator
            .get(key.clone(), move || V::fetch(transport, key))
            .await
    }

    /// 仅使该父级键的槽位失效，返回之前的状态
    pub fn invalidate(&self, parent_key: &str) -> SlotState {
        self.coordinator.invalidate(&parent_key.to_string())
    }

    pub fn state(&self, parent_key: &str) -> SlotState {
        self.coordinator.state(&parent_key.to_string())
    }

    /// 已创建的槽位数量
    pub fn slot_count(&self) -> usize {
        self.coordinator.slot_count()
    }
}
