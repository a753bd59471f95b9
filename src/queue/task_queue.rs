// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, Notify};

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 接收端已关闭
    #[error("Queue closed")]
    Closed,

    /// `task_done` 调用次数多于入队次数
    #[error("task_done called more times than items were enqueued")]
    TaskDoneUnderflow,
}

/// 队列元素
#[derive(Debug)]
enum QueueItem<T> {
    /// 待处理的实体
    Work(T),
    /// "没有更多工作"哨兵
    Shutdown,
}

/// 实体队列
///
/// 无界、并发安全的工作队列。`enqueue` 从不阻塞；`dequeue` 等待下一个元素，
/// 收到哨兵时返回 `None`。`join` 等待所有已入队元素都被 `task_done` 标记完成，
/// 之后生产者为每个工作器推入一个哨兵，每个工作器恰好消费一个哨兵后退出。
pub struct EntityQueue<T> {
    sender: mpsc::UnboundedSender<QueueItem<T>>,
    receiver: Mutex<mpsc::UnboundedReceiver<QueueItem<T>>>,
    /// 尚未标记完成的元素数
    unfinished: AtomicUsize,
    /// 当前排队的实体数（不含哨兵）
    queued: AtomicUsize,
    all_done: Notify,
}

impl<T: Send> EntityQueue<T> {
    /// 创建空队列
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
            unfinished: AtomicUsize::new(0),
            queued: AtomicUsize::new(0),
            all_done: Notify::new(),
        }
    }

    /// 入队实体
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 入队成功
    /// * `Err(QueueError)` - 接收端已关闭
    pub fn enqueue(&self, item: T) -> Result<(), QueueError> {
        self.unfinished.fetch_add(1, Ordering::SeqCst);
        self.queued.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(QueueItem::Work(item)).is_err() {
            self.unfinished.fetch_sub(1, Ordering::SeqCst);
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueError::Closed);
        }
        Ok(())
    }

    /// 批量入队
    pub fn enqueue_all<I>(&self, items: I) -> Result<usize, QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut count = 0;
        for item in items {
            self.enqueue(item)?;
            count += 1;
        }
        Ok(count)
    }

    /// 出队实体
    ///
    /// # 返回值
    ///
    /// * `Some(T)` - 下一个待处理的实体
    /// * `None` - 收到哨兵，工作器应当退出
    pub async fn dequeue(&self) -> Option<T> {
        let mut receiver = self.receiver.lock().await;
        match receiver.recv().await {
            Some(QueueItem::Work(item)) => {
                self.queued.fetch_sub(1, Ordering::SeqCst);
                Some(item)
            }
            Some(QueueItem::Shutdown) | None => None,
        }
    }

    /// 标记一个已出队的实体处理完成
    pub fn task_done(&self) -> Result<(), QueueError> {
        let previous = self
            .unfinished
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map_err(|_| QueueError::TaskDoneUnderflow)?;
        if previous == 1 {
            self.all_done.notify_waiters();
        }
        Ok(())
    }

    /// 等待所有已入队实体处理完成
    pub async fn join(&self) {
        loop {
            // Register before checking so a concurrent notify_waiters is not lost
            let notified = self.all_done.notified();
            if self.unfinished.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// 推入指定数量的哨兵
    pub fn push_sentinels(&self, count: usize) -> Result<(), QueueError> {
        for _ in 0..count {
            self.sender
                .send(QueueItem::Shutdown)
                .map_err(|_| QueueError::Closed)?;
        }
        Ok(())
    }

    /// 当前排队的实体数
    pub fn len(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// 队列中是否没有实体
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 尚未标记完成的实体数
    pub fn unfinished(&self) -> usize {
        self.unfinished.load(Ordering::SeqCst)
    }
}

impl<T: Send> Default for EntityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
