//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了参考数据缓存管理器。
//!
//! 每个会话构造一次 [`GeoCache`]，通过 `Arc` 注入给所有使用方，
//! 不存在模块级的全局缓存表。

use crate::backend::{SlotState, TierContext};
use crate::client::{LocalityCache, RegionCache, SubRegionCache};
use crate::config::GeoCacheConfig;
use crate::error::{CacheError, FetchResult, Result};
use crate::model::{Locality, Region, SubRegion};
use crate::sync::invalidation::Eviction;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// 三级地理层级缓存
pub struct GeoCache {
    service_name: String,
    regions: RegionCache,
    sub_regions: SubRegionCache,
    localities: LocalityCache,
}

impl GeoCache {
    /// 使用默认配置创建缓存
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::build(&GeoCacheConfig::default(), transport)
    }

    /// 根据配置创建缓存
    ///
    /// # 参数
    ///
    /// * `config` - 缓存配置，创建前会先校验
    /// * `transport` - 读取传输层
    ///
    /// # 返回值
    ///
    /// 返回新的缓存实例，配置无效时返回 [`CacheError::ConfigError`]
    #[instrument(skip(config, transport), level = "info", fields(service = %config.global.service_name))]
    pub fn with_config(config: &GeoCacheConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate().map_err(CacheError::ConfigError)?;
        Ok(Self::build(config, transport))
    }

    fn build(config: &GeoCacheConfig, transport: Arc<dyn Transport>) -> Self {
        let context = TierContext::new(
            config.global.service_name.as_str(),
            config.global.enable_metrics,
        );
        info!(
            "Initializing GeoCache service={}, metrics={}",
            config.global.service_name, config.global.enable_metrics
        );
        Self {
            service_name: config.global.service_name.clone(),
            regions: RegionCache::new(Arc::clone(&transport), context.clone()),
            sub_regions: SubRegionCache::new(Arc::clone(&transport), context.clone()),
            localities: LocalityCache::new(transport, context),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// 获取大区列表
    pub async fn get_regions(&self) -> FetchResult<Arc<[Region]>> {
        self.regions.get().await
    }

    /// 获取大区下的子区域列表，`region_id` 为空时返回空列表
    pub async fn get_sub_regions(&self, region_id: &str) -> FetchResult<Arc<[SubRegion]>> {
        self.sub_regions.get(region_id).await
    }

    /// 获取子区域下的地点列表，`sub_region_id` 为空时返回空列表
    pub async fn get_localities(&self, sub_region_id: &str) -> FetchResult<Arc<[Locality]>> {
        self.localities.get(sub_region_id).await
    }

    pub fn invalidate_regions(&self) -> SlotState {
        self.regions.invalidate()
    }

    pub fn invalidate_sub_regions(&self, region_id: &str) -> SlotState {
        self.sub_regions.invalidate(region_id)
    }

    pub fn invalidate_localities(&self, sub_region_id: &str) -> SlotState {
        self.localities.invalidate(sub_region_id)
    }

    /// 执行一次失效
    ///
    /// # 返回值
    ///
    /// 返回被失效槽位之前的状态
    pub fn apply_eviction(&self, eviction: &Eviction) -> SlotState {
        let previous = match eviction {
            Eviction::Regions => self.invalidate_regions(),
            Eviction::SubRegions(region_id) => self.invalidate_sub_regions(region_id),
            Eviction::Localities(sub_region_id) => self.invalidate_localities(sub_region_id),
        };
        debug!("Applied eviction {} (previous={})", eviction, previous);
        previous
    }

    pub fn regions(&self) -> &RegionCache {
        &self.regions
    }

    pub fn sub_regions(&self) -> &SubRegionCache {
        &self.sub_regions
    }

    pub fn localities(&self) -> &LocalityCache {
        &self.localities
    }
}
