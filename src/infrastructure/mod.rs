// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对具体技术的抽象和封装。
///
/// 包含的子模块：
/// - 目录（catalog）：通过 HTTP 获取物品目录
/// - 存储（storage）：本地文件和内存存储，以及 JSON 结果存储
///
/// 基础设施层遵循依赖倒置原则，依赖于领域层的抽象接口，
/// 确保领域层保持纯粹的业务逻辑，不受技术实现的影响。
pub mod catalog;
pub mod storage;
