// ==========================================
// NCR 质量系统 - 领域模型层
// ==========================================
// 职责: 定义 NCR 记录、字段元数据、预测结果
// 红线: 不含控制器逻辑,不含展示逻辑
// ==========================================

pub mod ncr;
pub mod prediction;
pub mod types;

// 重导出核心类型
pub use ncr::{MeasurementAssessment, NcrFields, NcrRecord, ToleranceStatus};
pub use prediction::{PredictionResult, RootCause, SuggestedFix};
pub use types::{FieldKey, FieldKind, Level, RecordSection};
