//! geocache - 分层参考数据缓存
//!
//! 为"大区 → 子区域 → 地点"三级地理层级提供会话级缓存：
//! 同一个键的并发读取合并为一次取数（single-flight），
//! 管理端写入成功后按层级精确失效。缓存没有后台过期时钟。

#![doc(html_root_url = "https://docs.rs/geocache/0.1.0")]

pub mod backend;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod model;
pub mod sync;
pub mod telemetry;
pub mod transport;

// Re-export commonly used items
pub use backend::SlotState;
pub use client::AdminClient;
pub use config::GeoCacheConfig;
pub use error::{CacheError, FetchResult, TransportError};
pub use manager::GeoCache;
pub use model::{Locality, Region, SubRegion, Tier};
pub use sync::invalidation::{Eviction, InvalidationRouter};
pub use sync::warmup::{WarmupManager, WarmupResult, WarmupStatus};
pub use transport::{AdminTransport, Mutation, MutationKind, Transport};

/// geocache 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
