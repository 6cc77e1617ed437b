// ==========================================
// NCR 质量系统 - 应用状态
// ==========================================
// 职责: 组装录入表单与分析面板，连接 on_submit 交接
// 说明: 提交成功后切换到管理页签，并在后台驱动分析任务
// ==========================================

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::api::error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::domain::ncr::{NcrFields, NcrRecord};
use crate::engine::{
    AnalysisDisplayController, AnalysisOutcome, AnalysisTicket, AnalysisView, Clock,
    IntakeFormController, Notifier, RootCauseAnalyzer, SimulatedAnalyzer, SubmissionHandler,
};

/// 页签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveTab {
    /// 提交 NCR
    Form,
    /// NCR 管理（分析面板）
    Management,
}

type TaskList = Arc<Mutex<Vec<JoinHandle<AnalysisOutcome>>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 在当前 tokio 运行时上驱动分析请求
fn spawn_analysis(
    controller: &Arc<AnalysisDisplayController>,
    tasks: &TaskList,
    ticket: AnalysisTicket,
) {
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(token = ticket.token, "无法启动分析任务: {}", e);
            controller.abandon(ticket);
            return;
        }
    };
    let runner = controller.clone();
    let task = handle.spawn(async move { runner.run(ticket).await });

    // 已结束的任务结果已提交到面板，不再保留句柄
    let mut tasks = lock(tasks);
    tasks.retain(|t| !t.is_finished());
    tasks.push(task);
}

// ==========================================
// AnalysisHandoff - 表单到分析面板的交接
// ==========================================
pub struct AnalysisHandoff {
    controller: Arc<AnalysisDisplayController>,
    tasks: TaskList,
    active_tab: Arc<Mutex<ActiveTab>>,
}

impl SubmissionHandler for AnalysisHandoff {
    fn on_submit(&self, record: NcrRecord) {
        *lock(&self.active_tab) = ActiveTab::Management;
        if let Some(ticket) = self.controller.supply_record(Some(record)) {
            spawn_analysis(&self.controller, &self.tasks, ticket);
        }
    }
}

// ==========================================
// AppState - 应用状态
// ==========================================
pub struct AppState {
    pub config: AppConfig,
    pub form: Arc<IntakeFormController>,
    pub analysis: Arc<AnalysisDisplayController>,
    tasks: TaskList,
    active_tab: Arc<Mutex<ActiveTab>>,
}

impl AppState {
    /// 使用模拟分析器创建
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        let analyzer = Arc::new(SimulatedAnalyzer::new(clock.clone(), config.analysis_delay()));
        Self::with_analyzer(config, clock, notifier, analyzer)
    }

    /// 使用指定分析器创建
    pub fn with_analyzer(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        analyzer: Arc<dyn RootCauseAnalyzer>,
    ) -> Self {
        tracing::info!(
            submit_delay_ms = config.submit_delay_ms,
            analysis_delay_ms = config.analysis_delay_ms,
            auto_analyze = config.auto_analyze,
            "初始化AppState"
        );

        let analysis = Arc::new(
            AnalysisDisplayController::new(analyzer, notifier.clone())
                .with_auto_analyze(config.auto_analyze)
                .with_completion_notice(config.notify_analysis_complete),
        );
        let tasks: TaskList = Arc::new(Mutex::new(Vec::new()));
        let active_tab = Arc::new(Mutex::new(ActiveTab::Form));

        let handoff = Arc::new(AnalysisHandoff {
            controller: analysis.clone(),
            tasks: tasks.clone(),
            active_tab: active_tab.clone(),
        });
        let form = Arc::new(
            IntakeFormController::new(clock, handoff, notifier)
                .with_submit_delay(config.submit_delay()),
        );

        Self {
            config,
            form,
            analysis,
            tasks,
            active_tab,
        }
    }

    pub fn active_tab(&self) -> ActiveTab {
        *lock(&self.active_tab)
    }

    pub fn set_active_tab(&self, tab: ActiveTab) {
        *lock(&self.active_tab) = tab;
    }

    /// 以给定输入提交表单
    pub async fn submit(&self, raw: NcrFields) -> ApiResult<NcrRecord> {
        self.form.submit_input(raw).await.map_err(ApiError::from)
    }

    /// 手动重新分析（在后台运行）
    ///
    /// 无记录时返回 false
    pub fn reanalyze(&self) -> bool {
        match self.analysis.reanalyze() {
            Some(ticket) => {
                spawn_analysis(&self.analysis, &self.tasks, ticket);
                true
            }
            None => false,
        }
    }

    pub fn analysis_view(&self) -> AnalysisView {
        self.analysis.view()
    }

    /// 未结束的后台分析任务数量
    pub fn pending_tasks(&self) -> usize {
        lock(&self.tasks).iter().filter(|t| !t.is_finished()).count()
    }

    /// 等待所有后台分析任务结束
    ///
    /// # 返回
    /// 仍被跟踪的任务的提交结果（按启动顺序）
    pub async fn settle(&self) -> Vec<AnalysisOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let batch: Vec<_> = lock(&self.tasks).drain(..).collect();
            if batch.is_empty() {
                return outcomes;
            }
            for joined in join_all(batch).await {
                match joined {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) => tracing::warn!("分析任务异常结束: {}", e),
                }
            }
        }
    }
}
