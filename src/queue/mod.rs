// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供实体工作队列
/// 负责实体的排队、出队、完成确认和哨兵终止
pub mod task_queue;
