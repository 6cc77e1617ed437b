// ==========================================
// NCR 质量系统 - 通知事件发布
// ==========================================
// 职责: 定义用户可见通知（toast）及发布 trait
// 说明: 控制器只依赖 Notifier trait，前端/CLI/测试各自实现
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::i18n::t;

// ==========================================
// 通知类型
// ==========================================

/// 通知类型
///
/// 校验失败不产生通知（仅表单内联错误）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// 提交成功
    SubmissionSucceeded,
    /// 分析完成
    AnalysisComplete,
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::SubmissionSucceeded => "SubmissionSucceeded",
            NotificationKind::AnalysisComplete => "AnalysisComplete",
        }
    }

    /// 消息 i18n 键
    pub fn message_key(&self) -> &'static str {
        match self {
            NotificationKind::SubmissionSucceeded => "notify.submit_success",
            NotificationKind::AnalysisComplete => "notify.analysis_complete",
        }
    }
}

/// 通知事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub event_id: String,
    pub kind: NotificationKind,
    /// 按当前语言渲染的消息
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            kind,
            message: t(kind.message_key()),
            created_at: Utc::now(),
        }
    }
}

// ==========================================
// 通知发布 Trait
// ==========================================

/// 通知发布者
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 仅写日志的发布者
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            event_id = %notification.event_id,
            kind = notification.kind.as_str(),
            "通知: {}",
            notification.message
        );
    }
}

/// 收集通知的发布者（CLI 输出与测试断言使用）
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已发布的通知快照
    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    /// 取出并清空
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(kind = notification.kind.as_str(), "记录通知");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
