// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 解析结果（outcome）：单个实体的解析结果及缺失记录
/// - 运行统计（run_stats）：计数器、图片映射与运行快照
pub mod outcome;
pub mod run_stats;

pub use outcome::{MissingReason, MissingRecord, ResolutionOutcome};
pub use run_stats::{ImageMap, RunSnapshot, RunStats, RunSummary};
