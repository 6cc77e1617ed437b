// ==========================================
// NCR 质量系统 - 不合格报告记录
// ==========================================
// 职责: 表单字段状态 (NcrFields) 与提交后冻结的记录 (NcrRecord)
// 生命周期: 表单挂载时为空 -> 逐字段编辑 -> 提交成功后冻结 -> 按值交给分析面板
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::domain::types::FieldKey;

/// 日期字段格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// NcrFields - 表单字段
// ==========================================
// 所有字段均为文本（数值/日期按输入文本存储），默认全部为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NcrFields {
    pub part_type: String,
    pub job_order: String,
    pub operation_number_detection: String,
    pub nc_description: String,
    pub nc_code: String,
    pub nominal: String,
    pub lower_tolerance: String,
    pub upper_tolerance: String,
    pub measured_value: String,
    #[serde(rename = "defectDescEN")]
    pub defect_desc_en: String,
    #[serde(rename = "qcCommentsEN")]
    pub qc_comments_en: String,
    pub machine_num_detection: String,
    pub operator_detection: String,
    pub date_detection: String,
    pub operation_number_occurrence: String,
    pub operator_machining: String,
    pub machine_num_occurrence: String,
    pub date_machining: String,
}

impl NcrFields {
    /// 空表单
    pub fn empty() -> Self {
        Self::default()
    }

    /// 读取字段
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::PartType => &self.part_type,
            FieldKey::JobOrder => &self.job_order,
            FieldKey::NcDescription => &self.nc_description,
            FieldKey::NcCode => &self.nc_code,
            FieldKey::DefectDescEn => &self.defect_desc_en,
            FieldKey::QcCommentsEn => &self.qc_comments_en,
            FieldKey::Nominal => &self.nominal,
            FieldKey::LowerTolerance => &self.lower_tolerance,
            FieldKey::UpperTolerance => &self.upper_tolerance,
            FieldKey::MeasuredValue => &self.measured_value,
            FieldKey::OperationNumberDetection => &self.operation_number_detection,
            FieldKey::MachineNumDetection => &self.machine_num_detection,
            FieldKey::OperatorDetection => &self.operator_detection,
            FieldKey::DateDetection => &self.date_detection,
            FieldKey::OperationNumberOccurrence => &self.operation_number_occurrence,
            FieldKey::MachineNumOccurrence => &self.machine_num_occurrence,
            FieldKey::OperatorMachining => &self.operator_machining,
            FieldKey::DateMachining => &self.date_machining,
        }
    }

    fn slot_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::PartType => &mut self.part_type,
            FieldKey::JobOrder => &mut self.job_order,
            FieldKey::NcDescription => &mut self.nc_description,
            FieldKey::NcCode => &mut self.nc_code,
            FieldKey::DefectDescEn => &mut self.defect_desc_en,
            FieldKey::QcCommentsEn => &mut self.qc_comments_en,
            FieldKey::Nominal => &mut self.nominal,
            FieldKey::LowerTolerance => &mut self.lower_tolerance,
            FieldKey::UpperTolerance => &mut self.upper_tolerance,
            FieldKey::MeasuredValue => &mut self.measured_value,
            FieldKey::OperationNumberDetection => &mut self.operation_number_detection,
            FieldKey::MachineNumDetection => &mut self.machine_num_detection,
            FieldKey::OperatorDetection => &mut self.operator_detection,
            FieldKey::DateDetection => &mut self.date_detection,
            FieldKey::OperationNumberOccurrence => &mut self.operation_number_occurrence,
            FieldKey::MachineNumOccurrence => &mut self.machine_num_occurrence,
            FieldKey::OperatorMachining => &mut self.operator_machining,
            FieldKey::DateMachining => &mut self.date_machining,
        }
    }

    /// 写入字段
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        *self.slot_mut(key) = value.into();
    }

    /// 链式写入（构造测试数据/CLI 输入时使用）
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// 是否所有字段均为空
    pub fn is_empty(&self) -> bool {
        FieldKey::ALL.iter().all(|k| self.get(*k).is_empty())
    }

    /// 按表单顺序迭代 (字段, 值)
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        FieldKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

// ==========================================
// NcrRecord - 冻结的 NCR 记录
// ==========================================
// 仅由表单在校验通过后构造；不提供任何修改方法
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NcrRecord {
    fields: NcrFields,
}

impl NcrRecord {
    pub(crate) fn freeze(fields: NcrFields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &NcrFields {
        &self.fields
    }

    pub fn into_fields(self) -> NcrFields {
        self.fields
    }

    /// 发现日期
    pub fn detection_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.fields.date_detection.trim(), DATE_FORMAT).ok()
    }

    /// 加工日期
    pub fn machining_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.fields.date_machining.trim(), DATE_FORMAT).ok()
    }

    /// 测量评估（仅供展示，不参与校验）
    pub fn measurement(&self) -> Option<MeasurementAssessment> {
        MeasurementAssessment::from_fields(&self.fields)
    }
}

impl Deref for NcrRecord {
    type Target = NcrFields;

    fn deref(&self) -> &NcrFields {
        &self.fields
    }
}

impl PartialEq<NcrFields> for NcrRecord {
    fn eq(&self, other: &NcrFields) -> bool {
        &self.fields == other
    }
}

// ==========================================
// MeasurementAssessment - 测量评估
// ==========================================
// 公差带: [nominal + lower_tolerance, nominal + upper_tolerance]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToleranceStatus {
    WithinTolerance,
    AboveUpperLimit,
    BelowLowerLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementAssessment {
    pub nominal: f64,
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub measured: f64,
    /// 实测值 - 名义值
    pub deviation: f64,
    pub status: ToleranceStatus,
}

impl MeasurementAssessment {
    /// 任一数值无法解析时返回 None
    pub fn from_fields(fields: &NcrFields) -> Option<Self> {
        let nominal = parse_number(&fields.nominal)?;
        let lower = parse_number(&fields.lower_tolerance)?;
        let upper = parse_number(&fields.upper_tolerance)?;
        let measured = parse_number(&fields.measured_value)?;

        let lower_limit = nominal + lower;
        let upper_limit = nominal + upper;
        let status = if measured > upper_limit {
            ToleranceStatus::AboveUpperLimit
        } else if measured < lower_limit {
            ToleranceStatus::BelowLowerLimit
        } else {
            ToleranceStatus::WithinTolerance
        };

        Some(Self {
            nominal,
            lower_limit,
            upper_limit,
            measured,
            deviation: measured - nominal,
            status,
        })
    }

    pub fn is_within_tolerance(&self) -> bool {
        self.status == ToleranceStatus::WithinTolerance
    }
}

/// 解析数值文本（去除首尾空白，拒绝 NaN/无穷）
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
