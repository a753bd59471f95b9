// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供实体解析工作器和工作器管理功能
/// 包括出队处理、排空终止和取消控制
pub mod manager;
pub mod resolve_worker;
pub mod worker;

pub use worker::Worker;
