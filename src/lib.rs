// ==========================================
// NCR 质量系统 - 核心库
// ==========================================
// 职责: 不合格报告 (NCR) 录入校验 + 模拟 AI 根因分析
// 技术栈: Rust + tokio
// 系统定位: 质量控制辅助（分析结果为固定模拟载荷）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// API 层 - 校验与错误
pub mod api;

// 引擎层 - 表单/分析控制器
pub mod engine;

// 配置层
pub mod config;

// 应用层 - 组装与交接
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, FormError, RecordValidator, ValidationError, ValidationReport};
pub use app::{ActiveTab, AppState};
pub use config::AppConfig;
pub use domain::{
    FieldKey, FieldKind, Level, MeasurementAssessment, NcrFields, NcrRecord, PredictionResult,
    RecordSection, RootCause, SuggestedFix,
};
pub use engine::{
    AnalysisDisplayController, AnalysisOutcome, AnalysisState, AnalysisView, Clock,
    IntakeFormController, ManualClock, RootCauseAnalyzer, SimulatedAnalyzer, SubmissionHandler,
    TokioClock,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Non-Conformance Report (NCR)";
