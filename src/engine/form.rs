// ==========================================
// NCR 质量系统 - 录入表单控制器
// ==========================================
// 职责: 管理表单字段状态，提交时校验，成功后交付记录
// 流程: 校验 -> 模拟提交耗时 -> 成功通知 -> on_submit(record) -> 清空表单
// 约束: 同一时刻只允许一个提交在处理中（提交按钮禁用）
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::api::error::{FieldErrors, FormError, ValidationError};
use crate::api::validator::RecordValidator;
use crate::domain::ncr::{NcrFields, NcrRecord};
use crate::domain::types::FieldKey;
use crate::engine::clock::Clock;
use crate::engine::events::{Notification, NotificationKind, Notifier};
use crate::i18n::t;

/// 默认模拟提交耗时
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

/// 提交成功后的记录接收方
///
/// 每次成功提交恰好调用一次
pub trait SubmissionHandler: Send + Sync {
    fn on_submit(&self, record: NcrRecord);
}

#[derive(Debug, Default)]
struct FormState {
    fields: NcrFields,
    errors: FieldErrors,
    submitting: bool,
}

/// 表单视图（供前端渲染）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub fields: NcrFields,
    pub field_errors: FieldErrors,
    pub submitting: bool,
    pub submit_label: String,
    pub reset_label: String,
}

// ==========================================
// IntakeFormController - 录入表单控制器
// ==========================================
pub struct IntakeFormController {
    state: Mutex<FormState>,
    validator: RecordValidator,
    clock: Arc<dyn Clock>,
    submit_delay: Duration,
    handler: Arc<dyn SubmissionHandler>,
    notifier: Arc<dyn Notifier>,
}

impl IntakeFormController {
    /// 创建空表单
    pub fn new(
        clock: Arc<dyn Clock>,
        handler: Arc<dyn SubmissionHandler>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state: Mutex::new(FormState::default()),
            validator: RecordValidator::new(),
            clock,
            submit_delay: DEFAULT_SUBMIT_DELAY,
            handler,
            notifier,
        }
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ==========================================
    // 字段编辑
    // ==========================================

    pub fn set_field(&self, key: FieldKey, value: impl Into<String>) {
        self.lock().fields.set(key, value);
    }

    pub fn field(&self, key: FieldKey) -> String {
        self.lock().fields.get(key).to_string()
    }

    /// 当前字段快照
    pub fn fields(&self) -> NcrFields {
        self.lock().fields.clone()
    }

    /// 当前内联错误
    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn view(&self) -> FormView {
        let state = self.lock();
        FormView {
            fields: state.fields.clone(),
            field_errors: state.errors.clone(),
            submitting: state.submitting,
            submit_label: if state.submitting {
                t("form.submitting")
            } else {
                t("form.submit")
            },
            reset_label: t("form.reset"),
        }
    }

    /// 清空所有字段与错误（无确认，无通知）
    pub fn reset(&self) {
        let mut state = self.lock();
        state.fields = NcrFields::empty();
        state.errors.clear();
        tracing::debug!("表单已重置");
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 提交当前表单
    ///
    /// # 返回
    /// - Ok(NcrRecord): 已交付给 SubmissionHandler 的记录
    /// - Err(FormError::Validation): 字段错误已写入表单状态，字段保持不变
    /// - Err(FormError::SubmissionInProgress): 已有提交在处理中
    pub async fn submit(&self) -> Result<NcrRecord, FormError> {
        let record = self.begin_submit(None)?;
        self.finish_submit(record).await
    }

    /// 以给定输入替换表单后提交
    pub async fn submit_input(&self, raw: NcrFields) -> Result<NcrRecord, FormError> {
        let record = self.begin_submit(Some(raw))?;
        self.finish_submit(record).await
    }

    fn begin_submit(&self, replace: Option<NcrFields>) -> Result<NcrRecord, FormError> {
        let mut state = self.lock();
        if state.submitting {
            tracing::warn!("提交被拒绝: 已有提交在处理中");
            return Err(FormError::SubmissionInProgress);
        }

        if let Some(fields) = replace {
            state.fields = fields;
        }

        let report = self.validator.validate(&state.fields);
        if !report.valid {
            tracing::info!(
                error_count = report.field_errors.len(),
                "NCR 提交校验失败"
            );
            state.errors = report.field_errors.clone();
            return Err(FormError::Validation(ValidationError::new(report.field_errors)));
        }

        state.errors.clear();
        state.submitting = true;
        Ok(NcrRecord::freeze(state.fields.clone()))
    }

    async fn finish_submit(&self, record: NcrRecord) -> Result<NcrRecord, FormError> {
        // 提交 future 被丢弃时同样需要恢复可提交状态
        let _guard = SubmittingGuard { state: &self.state };

        self.clock.sleep(self.submit_delay).await;

        tracing::info!(
            part_type = %record.part_type,
            job_order = %record.job_order,
            nc_code = %record.nc_code,
            "NCR 报告提交成功"
        );
        self.notifier
            .notify(Notification::new(NotificationKind::SubmissionSucceeded));
        self.handler.on_submit(record.clone());

        let mut state = self.lock();
        state.fields = NcrFields::empty();
        state.errors.clear();
        Ok(record)
    }
}

struct SubmittingGuard<'a> {
    state: &'a Mutex<FormState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .submitting = false;
    }
}
