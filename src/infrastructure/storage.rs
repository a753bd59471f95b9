// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::settings::OutputSettings;
use crate::domain::models::{ImageMap, MissingRecord};
use crate::domain::repositories::storage_repository::{
    ResultStore, StorageError, StorageRepository,
};

/// 本地文件系统存储实现
///
/// 写入先落到同目录的临时文件，再重命名到目标路径，
/// 中途失败不会留下半截文件。
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl StorageRepository for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.get_full_path(key);

        // 确保目录存在
        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp_name = full_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &full_path).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let full_path = self.get_full_path(key);

        match fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// 测试用的内存存储实现（用于单元测试）
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut map = self.data.write().await;
        map.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let map = self.data.read().await;
        Ok(map.get(key).cloned())
    }
}

/// JSON 结果存储
///
/// 图片映射写成键有序的扁平对象，缺失记录写成数组，均为缩进格式。
pub struct JsonResultStore<S> {
    storage: S,
    image_map_key: String,
    missing_key: String,
}

impl<S: StorageRepository> JsonResultStore<S> {
    pub fn new(storage: S, image_map_key: impl Into<String>, missing_key: impl Into<String>) -> Self {
        Self {
            storage,
            image_map_key: image_map_key.into(),
            missing_key: missing_key.into(),
        }
    }

    /// 底层存储
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl JsonResultStore<LocalStorage> {
    /// 以工作目录为根、按输出配置创建本地结果存储
    pub fn local(output: &OutputSettings) -> Self {
        Self::new(
            LocalStorage::new(Path::new(".")),
            output.image_map_path.clone(),
            output.missing_path.clone(),
        )
    }
}

#[async_trait]
impl<S: StorageRepository> ResultStore for JsonResultStore<S> {
    async fn save_image_map(&self, image_map: &ImageMap) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(image_map)?;
        self.storage.save(&self.image_map_key, &data).await?;
        info!("Saved {} images to {}", image_map.len(), self.image_map_key);
        Ok(())
    }

    async fn save_missing_records(&self, records: &[MissingRecord]) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(records)?;
        self.storage.save(&self.missing_key, &data).await?;
        info!("Saved {} missing records to {}", records.len(), self.missing_key);
        Ok(())
    }

    async fn load_image_map(&self) -> Result<ImageMap, StorageError> {
        match self.storage.get(&self.image_map_key).await? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => {
                info!("{} not found, assuming empty", self.image_map_key);
                Ok(ImageMap::new())
            }
        }
    }
}
