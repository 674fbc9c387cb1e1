//! 用户可见通知
//!
//! 每个失败的操作发布一条阻塞式通知，不做合并。

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::warn;

pub const FETCH_FAILED: &str = "Failed to fetch products";
pub const CREATE_SUCCEEDED: &str = "Product added successfully!";
pub const CREATE_FAILED: &str = "Failed to add product";
pub const DELETE_FAILED: &str = "Delete failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "✅",
            NoticeKind::Failure => "❌",
        };
        write!(f, "{} {}", tag, self.message)
    }
}

/// 通知出口
pub trait NoticeSink: Send + Sync {
    fn publish(&self, notice: Notice);
}

/// 基于 mpsc 通道的通知出口，接收端由界面层消费
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NoticeSink for ChannelSink {
    fn publish(&self, notice: Notice) {
        // 接收端已关闭时通知无人消费，丢弃即可
        if self.tx.send(notice).is_err() {
            warn!("通知接收端已关闭");
        }
    }
}
