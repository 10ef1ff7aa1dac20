//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了三个层级的缓存客户端以及管理端写入客户端。

pub mod admin;
pub mod keyed;
pub mod region;

pub use admin::AdminClient;
pub use keyed::{KeyedItem, KeyedTierCache, LocalityCache, SubRegionCache};
pub use region::RegionCache;
