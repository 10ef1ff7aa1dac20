//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存与外部传输层之间的接口。
//!
//! 传输层负责三类原始读取和管理端写入，具体的HTTP与认证机制不在本库范围内。

use crate::error::FetchResult;
use crate::model::{
    AdminRecord, Locality, LocalityId, Region, RegionId, SubRegion, SubRegionId, Tier,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 读取传输接口
///
/// 超时策略属于传输层，超时以普通 [`TransportError`](crate::error::TransportError) 的形式出现
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// 获取全部大区
    async fn fetch_regions(&self) -> FetchResult<Vec<Region>>;

    /// 获取指定大区下的子区域
    async fn fetch_sub_regions(&self, region_id: &str) -> FetchResult<Vec<SubRegion>>;

    /// 获取指定子区域下的地点
    async fn fetch_localities(&self, sub_region_id: &str) -> FetchResult<Vec<Locality>>;
}

/// 写入传输接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminTransport: Send + Sync {
    /// 执行一次管理端写入，返回写入后的记录
    async fn apply_mutation(&self, mutation: &Mutation) -> FetchResult<AdminRecord>;
}

/// 写入操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Update,
    Activate,
    Deactivate,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Activate => "activate",
            MutationKind::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 新建大区草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDraft {
    pub display_name: String,
    pub sort_order: Option<i32>,
}

/// 新建子区域草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRegionDraft {
    pub region_id: RegionId,
    pub display_name: String,
    pub sort_order: Option<i32>,
}

/// 新建地点草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalityDraft {
    pub sub_region_id: SubRegionId,
    pub display_name: String,
    pub sort_order: Option<i32>,
}

/// 名称/排序变更
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChanges {
    pub display_name: Option<String>,
    pub sort_order: Option<i32>,
}

/// 管理端写入请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    CreateRegion(RegionDraft),
    UpdateRegion {
        id: RegionId,
        changes: RecordChanges,
    },
    SetRegionActive {
        id: RegionId,
        active: bool,
    },
    CreateSubRegion(SubRegionDraft),
    UpdateSubRegion {
        id: SubRegionId,
        changes: RecordChanges,
    },
    SetSubRegionActive {
        id: SubRegionId,
        active: bool,
    },
    CreateLocality(LocalityDraft),
    UpdateLocality {
        id: LocalityId,
        changes: RecordChanges,
    },
    SetLocalityActive {
        id: LocalityId,
        active: bool,
    },
}

impl Mutation {
    /// 写入操作类型
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateRegion(_)
            | Mutation::CreateSubRegion(_)
            | Mutation::CreateLocality(_) => MutationKind::Create,
            Mutation::UpdateRegion { .. }
            | Mutation::UpdateSubRegion { .. }
            | Mutation::UpdateLocality { .. } => MutationKind::Update,
            Mutation::SetRegionActive { active, .. }
            | Mutation::SetSubRegionActive { active, .. }
            | Mutation::SetLocalityActive { active, .. } => {
                if *active {
                    MutationKind::Activate
                } else {
                    MutationKind::Deactivate
                }
            }
        }
    }

    /// 写入目标层级
    pub fn tier(&self) -> Tier {
        match self {
            Mutation::CreateRegion(_)
            | Mutation::UpdateRegion { .. }
            | Mutation::SetRegionActive { .. } => Tier::Region,
            Mutation::CreateSubRegion(_)
            | Mutation::UpdateSubRegion { .. }
            | Mutation::SetSubRegionActive { .. } => Tier::SubRegion,
            Mutation::CreateLocality(_)
            | Mutation::UpdateLocality { .. }
            | Mutation::SetLocalityActive { .. } => Tier::Locality,
        }
    }
}
