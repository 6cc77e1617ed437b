// ==========================================
// NCR 质量系统 - 应用层
// ==========================================
// 职责: 组装表单与分析面板,管理页签切换与后台分析任务
// ==========================================

pub mod state;

// 重导出
pub use state::{ActiveTab, AnalysisHandoff, AppState};
