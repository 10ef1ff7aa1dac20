//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了各层级共享的缓存机制：槽位和单飞取数协调器。

pub mod coordinator;
pub mod slot;

pub use coordinator::{FetchCoordinator, TierContext};
pub use slot::{Slot, SlotState};
