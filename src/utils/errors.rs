// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("队列错误: {0}")]
    QueueError(#[from] crate::queue::task_queue::QueueError),

    #[error("工作器任务异常退出: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
