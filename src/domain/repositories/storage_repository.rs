// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{ImageMap, MissingRecord};

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 存储仓库特质
///
/// 定义按键读写原始字节的存储接口
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 使用指定键保存数据到存储中
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
}

/// 结果存储特质
///
/// 运行结束后持久化图片映射和缺失记录
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// 保存图片映射
    async fn save_image_map(&self, image_map: &ImageMap) -> Result<(), StorageError>;

    /// 保存缺失记录
    async fn save_missing_records(&self, records: &[MissingRecord]) -> Result<(), StorageError>;

    /// 读取已保存的图片映射，不存在时返回空映射
    async fn load_image_map(&self) -> Result<ImageMap, StorageError>;
}
