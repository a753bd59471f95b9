// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含解析流程的核心业务逻辑服务：
/// - 提取服务（extraction_service）：从文件页面中提取图片地址
/// - 限流服务（rate_limiting_service）：全局请求间隔控制
/// - 结果聚合（result_aggregator）：并发安全的结果统计
/// - 差异服务（diff_service）：计算目录中尚未解析的实体
pub mod diff_service;
pub mod extraction_service;
pub mod rate_limiting_service;
pub mod result_aggregator;
