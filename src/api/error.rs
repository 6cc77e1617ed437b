// ==========================================
// NCR 质量系统 - API层错误类型
// ==========================================
// 职责: 定义校验错误、表单错误与面向前端的统一错误响应
// 说明: 校验错误在表单边界内就地恢复，不向外传播
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::types::FieldKey;

/// 字段错误（按表单顺序）
pub type FieldErrors = BTreeMap<FieldKey, String>;

// ==========================================
// ValidationError - 校验错误
// ==========================================

/// 提交时存在空字段或格式无效字段
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", join_messages(.field_errors))]
pub struct ValidationError {
    pub field_errors: FieldErrors,
}

impl ValidationError {
    pub fn new(field_errors: FieldErrors) -> Self {
        Self { field_errors }
    }

    /// 出错字段（表单顺序）
    pub fn fields(&self) -> Vec<FieldKey> {
        self.field_errors.keys().copied().collect()
    }

    pub fn message_for(&self, key: FieldKey) -> Option<&str> {
        self.field_errors.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.field_errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }
}

fn join_messages(field_errors: &FieldErrors) -> String {
    field_errors
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ")
}

// ==========================================
// FormError - 表单提交错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// 已有提交在处理中（提交按钮处于禁用状态）
    #[error("a submission is already in progress")]
    SubmissionInProgress,
}

impl FormError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            FormError::Validation(e) => Some(e),
            FormError::SubmissionInProgress => None,
        }
    }
}

// ==========================================
// ApiError - 应用层错误
// ==========================================
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("数据验证失败: {0}")]
    Validation(ValidationError),

    #[error("提交处理中: 请等待当前提交完成")]
    SubmissionInProgress,

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// API层结果类型
pub type ApiResult<T> = Result<T, ApiError>;

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(e) => ApiError::Validation(e),
            FormError::SubmissionInProgress => ApiError::SubmissionInProgress,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidInput(format!("JSON 解析失败: {}", err))
    }
}

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// 稳定的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::SubmissionInProgress => "SUBMISSION_IN_PROGRESS",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            details: match self {
                ApiError::Validation(e) => {
                    Some(serde_json::json!({ "fieldErrors": e.field_errors }))
                }
                _ => None,
            },
        }
    }
}
