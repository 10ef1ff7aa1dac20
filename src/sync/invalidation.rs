//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了写入完成后的缓存失效路由。
//!
//! | 写入                                   | 失效                              |
//! |----------------------------------------|-----------------------------------|
//! | 大区 create/update/activate/deactivate | 大区槽位                          |
//! | 子区域 create/activate/deactivate      | 该子区域所属大区的子区域槽位      |
//! | 子区域 update                          | 无                                |
//! | 地点 create/activate/deactivate        | 该地点所属子区域的地点槽位        |
//! | 地点 update                            | 无                                |

use crate::manager::GeoCache;
use crate::model::{AdminRecord, RegionId, SubRegionId};
use crate::transport::MutationKind;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 需要重置为 EMPTY 的槽位
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Eviction {
    /// 大区缓存的唯一槽位
    Regions,
    /// 某个大区下的子区域槽位
    SubRegions(RegionId),
    /// 某个子区域下的地点槽位
    Localities(SubRegionId),
}

impl fmt::Display for Eviction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eviction::Regions => f.write_str("regions"),
            Eviction::SubRegions(region_id) => write!(f, "sub_regions[{}]", region_id),
            Eviction::Localities(sub_region_id) => write!(f, "localities[{}]", sub_region_id),
        }
    }
}

/// 失效路由器
///
/// 只能在写入请求已经成功之后调用；失败的写入不得触碰任何缓存。
#[derive(Clone)]
pub struct InvalidationRouter {
    cache: Arc<GeoCache>,
}

impl InvalidationRouter {
    pub fn new(cache: Arc<GeoCache>) -> Self {
        Self { cache }
    }

    /// 计算一次已完成写入对应的失效
    ///
    /// 子区域和地点的 update（仅名称/排序）不失效父级列表缓存。
    pub fn eviction_for(kind: MutationKind, record: &AdminRecord) -> Option<Eviction> {
        match (record, kind) {
            (AdminRecord::Region(_), _) => Some(Eviction::Regions),
            (AdminRecord::SubRegion(_), MutationKind::Update) => None,
            (AdminRecord::SubRegion(sub_region), _) => {
                Some(Eviction::SubRegions(sub_region.region_id.clone()))
            }
            (AdminRecord::Locality(_), MutationKind::Update) => None,
            (AdminRecord::Locality(locality), _) => {
                Some(Eviction::Localities(locality.sub_region_id.clone()))
            }
        }
    }

    /// 路由并执行失效
    ///
    /// # 参数
    ///
    /// * `kind` - 写入类型
    /// * `record` - 写入成功后服务端返回的记录
    ///
    /// # 返回值
    ///
    /// 返回实际执行的失效，无需失效时返回 None
    pub fn route(&self, kind: MutationKind, record: &AdminRecord) -> Option<Eviction> {
        match Self::eviction_for(kind, record) {
            Some(eviction) => {
                let previous = self.cache.apply_eviction(&eviction);
                info!(
                    "{} {} {} -> evicted {} (was {})",
                    kind,
                    record.tier(),
                    record.id(),
                    eviction,
                    previous
                );
                Some(eviction)
            }
            None => {
                debug!(
                    "{} {} {} -> no eviction",
                    kind,
                    record.tier(),
                    record.id()
                );
                None
            }
        }
    }

    pub fn cache(&self) -> &Arc<GeoCache> {
        &self.cache
    }
}
