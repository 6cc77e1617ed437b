// ==========================================
// NCR 质量系统 - 记录校验器
// ==========================================
// 职责: 提交时的必填校验（全部 18 个字段必填）
// 规则: 空/纯空白 -> "<标签> is required"
//       日期字段须为有效日历日期，数值字段须可解析为有限数
// 说明: 全有或全无，不存在部分成功
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{FieldErrors, ValidationError};
use crate::domain::ncr::{parse_number, NcrFields, NcrRecord, DATE_FORMAT};
use crate::domain::types::{FieldKey, FieldKind};

// ==========================================
// ValidationReport - 校验报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub field_errors: FieldErrors,
}

impl ValidationReport {
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.valid {
            Ok(())
        } else {
            Err(ValidationError::new(self.field_errors))
        }
    }
}

// ==========================================
// RecordValidator - 记录校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验全部字段
    pub fn validate(&self, fields: &NcrFields) -> ValidationReport {
        let field_errors: FieldErrors = FieldKey::ALL
            .into_iter()
            .filter_map(|key| {
                self.validate_field(key, fields.get(key))
                    .map(|message| (key, message))
            })
            .collect();

        if !field_errors.is_empty() {
            tracing::debug!(
                error_count = field_errors.len(),
                fields = ?field_errors.keys().map(|k| k.name()).collect::<Vec<_>>(),
                "NCR 校验未通过"
            );
        }

        ValidationReport {
            valid: field_errors.is_empty(),
            field_errors,
        }
    }

    /// 校验单个字段
    ///
    /// # 返回
    /// - None: 校验通过
    /// - Some(message): 错误消息
    pub fn validate_field(&self, key: FieldKey, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Some(format!("{} is required", key.label()));
        }

        match key.kind() {
            FieldKind::Text => None,
            FieldKind::Numeric => match parse_number(trimmed) {
                Some(_) => None,
                None => Some(format!("{} must be a number", key.label())),
            },
            FieldKind::Date => match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
                Ok(_) => None,
                Err(_) => Some(format!(
                    "{} must be a valid date (YYYY-MM-DD)",
                    key.label()
                )),
            },
        }
    }
}

/// 校验通过后冻结为记录
impl TryFrom<NcrFields> for NcrRecord {
    type Error = ValidationError;

    fn try_from(fields: NcrFields) -> Result<Self, Self::Error> {
        RecordValidator::new().validate(&fields).into_result()?;
        Ok(NcrRecord::freeze(fields))
    }
}
