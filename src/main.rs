//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块是命令行工具的入口点。

use anyhow::Result;

fn main() -> Result<()> {
    geocache::cli::run()
}
