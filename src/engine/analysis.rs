// ==========================================
// NCR 质量系统 - 分析展示控制器
// ==========================================
// 职责: 接收当前 NCR 记录，触发（模拟）根因分析，保存分析结果
// 状态机:
//   NoRecord -> Received(record) -> Pending(record, token) -> Ready(record, result, token)
//   Pending -> Pending（重新分析，可重入）
// 规则: 每次请求分配单调递增 token；完成时 token 不是最新则丢弃
//       重新分析期间清除旧结果（视图显示加载状态）
// ==========================================

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::ncr::NcrRecord;
use crate::domain::prediction::PredictionResult;
use crate::engine::analyzer::RootCauseAnalyzer;
use crate::engine::events::{Notification, NotificationKind, Notifier};
use crate::engine::view::AnalysisView;

/// 分析请求令牌（单调递增）
pub type RequestToken = u64;

// ==========================================
// AnalysisState - 可观测状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisState {
    /// 尚无记录
    NoRecord,
    /// 已收到记录，尚未分析（关闭自动分析时）
    Received { record: NcrRecord },
    /// 分析进行中
    Pending {
        record: NcrRecord,
        token: RequestToken,
    },
    /// 分析完成
    Ready {
        record: NcrRecord,
        result: PredictionResult,
        token: RequestToken,
    },
}

impl AnalysisState {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisState::NoRecord => "NO_RECORD",
            AnalysisState::Received { .. } => "RECEIVED",
            AnalysisState::Pending { .. } => "PENDING",
            AnalysisState::Ready { .. } => "READY",
        }
    }

    pub fn record(&self) -> Option<&NcrRecord> {
        match self {
            AnalysisState::NoRecord => None,
            AnalysisState::Received { record }
            | AnalysisState::Pending { record, .. }
            | AnalysisState::Ready { record, .. } => Some(record),
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            AnalysisState::Ready { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<RequestToken> {
        match self {
            AnalysisState::Pending { token, .. } | AnalysisState::Ready { token, .. } => {
                Some(*token)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AnalysisState::Pending { .. })
    }
}

/// 已发出的分析请求
///
/// 持有方必须交给 `run` 执行；无法执行时交给 `abandon`，否则面板停留在 Pending
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub token: RequestToken,
    record: NcrRecord,
}

impl AnalysisTicket {
    pub fn record(&self) -> &NcrRecord {
        &self.record
    }
}

/// 分析完成后的提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// 结果已生效
    Committed(RequestToken),
    /// 已有更新的请求，结果被丢弃
    Stale {
        token: RequestToken,
        latest: RequestToken,
    },
}

impl AnalysisOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, AnalysisOutcome::Committed(_))
    }
}

struct Inner {
    state: AnalysisState,
    latest_token: RequestToken,
}

impl Inner {
    fn issue(&mut self, record: NcrRecord) -> AnalysisTicket {
        self.latest_token += 1;
        let token = self.latest_token;
        self.state = AnalysisState::Pending {
            record: record.clone(),
            token,
        };
        AnalysisTicket { token, record }
    }

    /// 使所有在途请求失效
    fn invalidate(&mut self) {
        self.latest_token += 1;
    }
}

// ==========================================
// AnalysisDisplayController - 分析展示控制器
// ==========================================
pub struct AnalysisDisplayController {
    inner: Mutex<Inner>,
    analyzer: Arc<dyn RootCauseAnalyzer>,
    notifier: Arc<dyn Notifier>,
    auto_analyze: bool,
    notify_on_complete: bool,
}

impl AnalysisDisplayController {
    pub fn new(analyzer: Arc<dyn RootCauseAnalyzer>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: AnalysisState::NoRecord,
                latest_token: 0,
            }),
            analyzer,
            notifier,
            auto_analyze: true,
            notify_on_complete: true,
        }
    }

    /// 收到记录时是否自动开始分析
    pub fn with_auto_analyze(mut self, enabled: bool) -> Self {
        self.auto_analyze = enabled;
        self
    }

    /// 分析完成时是否发送通知
    pub fn with_completion_notice(mut self, enabled: bool) -> Self {
        self.notify_on_complete = enabled;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 当前状态快照
    pub fn state(&self) -> AnalysisState {
        self.lock().state.clone()
    }

    /// 最近发出的请求令牌
    pub fn latest_token(&self) -> RequestToken {
        self.lock().latest_token
    }

    pub fn view(&self) -> AnalysisView {
        AnalysisView::from_state(&self.lock().state)
    }

    // ==========================================
    // 输入
    // ==========================================

    /// 设置当前记录
    ///
    /// # 返回
    /// - Some(ticket): 已开始分析，调用方需驱动 `run(ticket)`
    /// - None: 记录被清除，或关闭了自动分析
    pub fn supply_record(&self, record: Option<NcrRecord>) -> Option<AnalysisTicket> {
        let mut inner = self.lock();
        match record {
            None => {
                inner.invalidate();
                inner.state = AnalysisState::NoRecord;
                tracing::debug!("分析面板: 记录已清除");
                None
            }
            Some(record) if self.auto_analyze => {
                let ticket = inner.issue(record);
                tracing::info!(token = ticket.token, "分析面板: 收到新记录，开始分析");
                Some(ticket)
            }
            Some(record) => {
                inner.invalidate();
                inner.state = AnalysisState::Received { record };
                tracing::info!("分析面板: 收到新记录，等待手动分析");
                None
            }
        }
    }

    /// 手动重新分析当前记录
    ///
    /// 无记录时返回 None
    pub fn reanalyze(&self) -> Option<AnalysisTicket> {
        let mut inner = self.lock();
        let record = inner.state.record()?.clone();
        let ticket = inner.issue(record);
        tracing::info!(token = ticket.token, "分析面板: 重新分析");
        Some(ticket)
    }

    // ==========================================
    // 执行
    // ==========================================

    /// 执行分析并提交结果
    pub async fn run(&self, ticket: AnalysisTicket) -> AnalysisOutcome {
        let result = self.analyzer.analyze(&ticket.record).await;
        self.commit(ticket, result)
    }

    /// 设置记录并等待分析完成
    pub async fn on_record_available(&self, record: NcrRecord) -> Option<AnalysisOutcome> {
        let ticket = self.supply_record(Some(record))?;
        Some(self.run(ticket).await)
    }

    /// 重新分析并等待完成
    pub async fn reanalyze_and_wait(&self) -> Option<AnalysisOutcome> {
        let ticket = self.reanalyze()?;
        Some(self.run(ticket).await)
    }

    /// 放弃未能执行的请求
    ///
    /// 仍是最新请求时使其失效并回到 Received，等待手动重新分析；
    /// 已被更新的请求取代时不做任何改变
    pub fn abandon(&self, ticket: AnalysisTicket) -> bool {
        let AnalysisTicket { token, record } = ticket;
        let mut inner = self.lock();
        if token != inner.latest_token {
            return false;
        }
        inner.invalidate();
        inner.state = AnalysisState::Received { record };
        tracing::warn!(token, "分析面板: 分析请求未执行，等待重新分析");
        true
    }

    fn commit(&self, ticket: AnalysisTicket, result: PredictionResult) -> AnalysisOutcome {
        let AnalysisTicket { token, record } = ticket;
        {
            let mut inner = self.lock();
            if token != inner.latest_token {
                tracing::debug!(
                    token,
                    latest = inner.latest_token,
                    "分析面板: 丢弃过期的分析结果"
                );
                return AnalysisOutcome::Stale {
                    token,
                    latest: inner.latest_token,
                };
            }
            inner.state = AnalysisState::Ready {
                record,
                result,
                token,
            };
        }

        tracing::info!(token, "分析面板: 分析完成");
        if self.notify_on_complete {
            self.notifier
                .notify(Notification::new(NotificationKind::AnalysisComplete));
        }
        AnalysisOutcome::Committed(token)
    }
}
