// ==========================================
// NCR 质量系统 - API 层
// ==========================================
// 职责: 记录校验与错误类型
// ==========================================

pub mod error;
pub mod validator;

pub use error::{ApiError, ApiResult, ErrorResponse, FieldErrors, FormError, ValidationError};
pub use validator::{RecordValidator, ValidationReport};
