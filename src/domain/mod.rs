// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：解析结果、运行计数和缺失记录
/// - 仓库接口（repositories）：物品目录和结果存储的抽象接口
/// - 服务（services）：限流、地址提取、结果聚合和差异计算
///
/// 领域层是系统的核心，不依赖于任何外部实现，
/// 体现了纯粹的业务逻辑和业务规则。
pub mod models;
pub mod repositories;
pub mod services;
