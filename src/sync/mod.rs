//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存的同步机制，包括写入后的失效路由和预热。

pub mod invalidation;
pub mod warmup;
