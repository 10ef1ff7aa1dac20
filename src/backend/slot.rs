//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了单个缓存槽位及其状态。

use crate::error::FetchResult;
use futures::future::{BoxFuture, Shared};
use std::fmt;
use std::sync::Arc;

/// 在途请求句柄，所有并发调用者共享同一个结果
pub type PendingFetch<V> = Shared<BoxFuture<'static, FetchResult<Arc<[V]>>>>;

/// 槽位状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// 无值、无在途请求
    Empty,
    /// 存在唯一的在途请求
    Pending,
    /// 已缓存值
    Ready,
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlotState::Empty => "EMPTY",
            SlotState::Pending => "PENDING",
            SlotState::Ready => "READY",
        };
        f.write_str(s)
    }
}

/// 缓存槽位
///
/// 状态转换：
/// `Empty --get--> Pending --成功--> Ready`，
/// `Pending --失败--> Empty`，`Ready --invalidate--> Empty`，
/// `Pending --invalidate--> Empty`（在途结果随后被丢弃）。
pub enum Slot<V> {
    Empty,
    Pending {
        /// 该次请求的代号，完成时只有代号仍匹配才会写回
        generation: u64,
        handle: PendingFetch<V>,
    },
    Ready(Arc<[V]>),
}

impl<V> Slot<V> {
    /// 当前状态
    pub fn state(&self) -> SlotState {
        match self {
            Slot::Empty => SlotState::Empty,
            Slot::Pending { .. } => SlotState::Pending,
            Slot::Ready(_) => SlotState::Ready,
        }
    }

    /// 是否为指定代号的在途请求
    pub fn is_pending_for(&self, generation: u64) -> bool {
        matches!(self, Slot::Pending { generation: g, .. } if *g == generation)
    }
}

impl<V> fmt::Debug for Slot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str("Slot::Empty"),
            Slot::Pending { generation, .. } => f
                .debug_struct("Slot::Pending")
                .field("generation", generation)
                .finish(),
            Slot::Ready(value) => f
                .debug_struct("Slot::Ready")
                .field("len", &value.len())
                .finish(),
        }
    }
}
