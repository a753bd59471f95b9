// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义核心流程依赖的外部协作者接口：目录来源与结果存储
pub mod catalog_repository;
pub mod storage_repository;
