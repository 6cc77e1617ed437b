// ==========================================
// NCR 质量系统 - 引擎层
// ==========================================
// 职责: 录入表单控制器、分析展示控制器、模拟分析器与时钟抽象
// 红线: 控制器状态锁不跨 await 持有；等待只经由 Clock trait
// ==========================================

pub mod analysis;
pub mod analyzer;
pub mod clock;
pub mod events;
pub mod form;
pub mod view;

// 重导出核心引擎
pub use analysis::{
    AnalysisDisplayController, AnalysisOutcome, AnalysisState, AnalysisTicket, RequestToken,
};
pub use analyzer::{RootCauseAnalyzer, SimulatedAnalyzer, DEFAULT_ANALYSIS_LATENCY};
pub use clock::{Clock, ManualClock, TokioClock};
pub use events::{Notification, NotificationKind, Notifier, RecordingNotifier, TracingNotifier};
pub use form::{FormView, IntakeFormController, SubmissionHandler, DEFAULT_SUBMIT_DELAY};
pub use view::AnalysisView;
