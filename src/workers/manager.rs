// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use crate::workers::resolve_worker::{ResolveContext, ResolveWorker};
use crate::workers::worker::Worker;
use futures::future::join_all;
use std::future::Future;
use std::io;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// 工作管理器
///
/// 启动固定数量的解析工作器，并负责在队列排空后逐个终止它们。
pub struct WorkerManager {
    context: ResolveContext,
    handles: Vec<JoinHandle<Result<(), WorkerError>>>,
}

impl WorkerManager {
    pub fn new(context: ResolveContext) -> Self {
        Self {
            context,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = ResolveWorker::new(self.handles.len(), self.context.clone());
            let handle = tokio::spawn(async move {
                let result = worker.run().await;
                if let Err(e) = &result {
                    error!("{} failed: {}", worker.name(), e);
                }
                result
            });
            self.handles.push(handle);
        }
        info!("Started {} workers", self.handles.len());
    }

    /// 已启动的工作进程数量
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// 等待队列排空并关闭所有工作进程
    ///
    /// 队列排空后为每个工作器推入一个哨兵；若先被取消，则工作器自行退出。
    ///
    /// # 返回值
    ///
    /// 正常退出的工作进程数量
    pub async fn drain(&mut self) -> Result<usize, WorkerError> {
        let queue = self.context.queue.clone();
        let cancel = self.context.cancel.clone();

        let drained = tokio::select! {
            _ = queue.join() => true,
            _ = cancel.cancelled() => false,
        };

        if drained {
            queue.push_sentinels(self.handles.len())?;
        } else {
            info!("Cancellation requested, waiting for workers to stop");
        }

        let mut exited = 0;
        for result in join_all(self.handles.drain(..)).await {
            result??;
            exited += 1;
        }

        info!("Workers shut down successfully");
        Ok(exited)
    }
}

/// 监听 Ctrl-C 并触发取消
///
/// 返回的任务在取消令牌被触发（无论由信号还是其他途径）后结束。
/// 无法注册信号处理时只记录错误，不会取消运行。
pub fn spawn_shutdown_listener(cancel: CancellationToken) -> JoinHandle<()> {
    spawn_signal_listener(signal::ctrl_c(), cancel)
}

/// 等待给定的信号 future 完成后触发取消
pub fn spawn_signal_listener<F>(shutdown_signal: F, cancel: CancellationToken) -> JoinHandle<()>
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            result = shutdown_signal => match result {
                Ok(()) => {
                    info!("Shutdown signal received");
                    cancel.cancel();
                }
                Err(err) => {
                    // Keep running without Ctrl-C support
                    error!("Unable to listen for shutdown signal: {}", err);
                    cancel.cancelled().await;
                }
            },
            _ = cancel.cancelled() => {}
        }
    })
}
