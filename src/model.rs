//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了三级地理层级（大区 → 子区域 → 地点）的数据模型。
//!
//! 这些类型都是后端拥有的只读投影，缓存从不修改其内容。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 大区ID
pub type RegionId = String;
/// 子区域ID
pub type SubRegionId = String;
/// 地点ID
pub type LocalityId = String;

/// 缓存层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 大区（最粗粒度）
    Region,
    /// 子区域
    SubRegion,
    /// 地点（最细粒度）
    Locality,
}

impl Tier {
    /// 用于指标和日志的标签
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Region => "region",
            Tier::SubRegion => "sub_region",
            Tier::Locality => "locality",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 大区
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    pub display_name: String,
}

/// 子区域
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRegion {
    pub id: SubRegionId,
    pub display_name: String,
    pub region_id: RegionId,
}

/// 地点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locality {
    pub id: LocalityId,
    pub display_name: String,
    pub sub_region_id: SubRegionId,
}

/// 管理端大区记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegion {
    pub id: RegionId,
    pub display_name: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub sub_region_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 管理端子区域记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubRegion {
    pub id: SubRegionId,
    pub display_name: String,
    pub region_id: RegionId,
    pub is_active: bool,
    pub sort_order: i32,
    pub locality_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 管理端地点记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLocality {
    pub id: LocalityId,
    pub display_name: String,
    pub sub_region_id: SubRegionId,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 管理端记录
///
/// 带显式判别字段 `kind` 的标签变体，层级在创建时确定，
/// 不通过"哪个可选字段存在"来推断。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdminRecord {
    Region(AdminRegion),
    SubRegion(AdminSubRegion),
    Locality(AdminLocality),
}

impl AdminRecord {
    /// 记录所属层级
    pub fn tier(&self) -> Tier {
        match self {
            AdminRecord::Region(_) => Tier::Region,
            AdminRecord::SubRegion(_) => Tier::SubRegion,
            AdminRecord::Locality(_) => Tier::Locality,
        }
    }

    /// 记录ID
    pub fn id(&self) -> &str {
        match self {
            AdminRecord::Region(r) => &r.id,
            AdminRecord::SubRegion(s) => &s.id,
            AdminRecord::Locality(l) => &l.id,
        }
    }
}

impl From<AdminRegion> for AdminRecord {
    fn from(record: AdminRegion) -> Self {
        AdminRecord::Region(record)
    }
}

impl From<AdminSubRegion> for AdminRecord {
    fn from(record: AdminSubRegion) -> Self {
        AdminRecord::SubRegion(record)
    }
}

impl From<AdminLocality> for AdminRecord {
    fn from(record: AdminLocality) -> Self {
        AdminRecord::Locality(record)
    }
}
