// ==========================================
// NCR 质量系统 - 领域类型定义
// ==========================================
// 职责: NCR 表单字段元数据（名称/标签/分组/输入类型）、优先级等级
// 说明: 字段顺序即表单顺序，校验错误与展示分组均按此顺序输出
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 字段输入类型 (Field Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    Text,    // 文本
    Numeric, // 数值输入，按文本存储
    Date,    // 日历日期 YYYY-MM-DD
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "TEXT"),
            FieldKind::Numeric => write!(f, "NUMERIC"),
            FieldKind::Date => write!(f, "DATE"),
        }
    }
}

// ==========================================
// 记录分组 (Record Section)
// ==========================================
// 表单卡片与分析面板共用同一分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordSection {
    PartInformation,
    NonConformanceDetails,
    Measurements,
    DetectionInformation,
    OccurrenceInformation,
}

impl RecordSection {
    /// 全部分组（展示顺序）
    pub const ALL: [RecordSection; 5] = [
        RecordSection::PartInformation,
        RecordSection::NonConformanceDetails,
        RecordSection::Measurements,
        RecordSection::DetectionInformation,
        RecordSection::OccurrenceInformation,
    ];

    /// 英文标题
    pub fn title(&self) -> &'static str {
        match self {
            RecordSection::PartInformation => "Part Information",
            RecordSection::NonConformanceDetails => "Non-Conformance Details",
            RecordSection::Measurements => "Measurements",
            RecordSection::DetectionInformation => "Detection Information",
            RecordSection::OccurrenceInformation => "Occurrence Information",
        }
    }

    /// i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            RecordSection::PartInformation => "section.part_information",
            RecordSection::NonConformanceDetails => "section.non_conformance_details",
            RecordSection::Measurements => "section.measurements",
            RecordSection::DetectionInformation => "section.detection_information",
            RecordSection::OccurrenceInformation => "section.occurrence_information",
        }
    }

    /// 该分组下的字段（表单顺序）
    pub fn fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        FieldKey::ALL.into_iter().filter(move |k| k.section() == *self)
    }
}

impl fmt::Display for RecordSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ==========================================
// 字段键 (Field Key)
// ==========================================
// 18 个必填字段；序列化名称与前端表单 camelCase 名称一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    // 零件信息
    PartType,
    JobOrder,
    // 不合格详情
    NcDescription,
    NcCode,
    #[serde(rename = "defectDescEN")]
    DefectDescEn,
    #[serde(rename = "qcCommentsEN")]
    QcCommentsEn,
    // 测量数据
    Nominal,
    LowerTolerance,
    UpperTolerance,
    MeasuredValue,
    // 发现信息
    OperationNumberDetection,
    MachineNumDetection,
    OperatorDetection,
    DateDetection,
    // 发生信息
    OperationNumberOccurrence,
    MachineNumOccurrence,
    OperatorMachining,
    DateMachining,
}

impl FieldKey {
    /// 全部字段（表单顺序）
    pub const ALL: [FieldKey; 18] = [
        FieldKey::PartType,
        FieldKey::JobOrder,
        FieldKey::NcDescription,
        FieldKey::NcCode,
        FieldKey::DefectDescEn,
        FieldKey::QcCommentsEn,
        FieldKey::Nominal,
        FieldKey::LowerTolerance,
        FieldKey::UpperTolerance,
        FieldKey::MeasuredValue,
        FieldKey::OperationNumberDetection,
        FieldKey::MachineNumDetection,
        FieldKey::OperatorDetection,
        FieldKey::DateDetection,
        FieldKey::OperationNumberOccurrence,
        FieldKey::MachineNumOccurrence,
        FieldKey::OperatorMachining,
        FieldKey::DateMachining,
    ];

    /// 表单/JSON 字段名
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::PartType => "partType",
            FieldKey::JobOrder => "jobOrder",
            FieldKey::NcDescription => "ncDescription",
            FieldKey::NcCode => "ncCode",
            FieldKey::DefectDescEn => "defectDescEN",
            FieldKey::QcCommentsEn => "qcCommentsEN",
            FieldKey::Nominal => "nominal",
            FieldKey::LowerTolerance => "lowerTolerance",
            FieldKey::UpperTolerance => "upperTolerance",
            FieldKey::MeasuredValue => "measuredValue",
            FieldKey::OperationNumberDetection => "operationNumberDetection",
            FieldKey::MachineNumDetection => "machineNumDetection",
            FieldKey::OperatorDetection => "operatorDetection",
            FieldKey::DateDetection => "dateDetection",
            FieldKey::OperationNumberOccurrence => "operationNumberOccurrence",
            FieldKey::MachineNumOccurrence => "machineNumOccurrence",
            FieldKey::OperatorMachining => "operatorMachining",
            FieldKey::DateMachining => "dateMachining",
        }
    }

    /// 表单标签（校验消息使用）
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::PartType => "Part Type",
            FieldKey::JobOrder => "Job Order",
            FieldKey::NcDescription => "NC Description",
            FieldKey::NcCode => "NC Code",
            FieldKey::DefectDescEn => "Defect Description (EN)",
            FieldKey::QcCommentsEn => "QC Comments (EN)",
            FieldKey::Nominal => "Nominal",
            FieldKey::LowerTolerance => "Lower Tolerance",
            FieldKey::UpperTolerance => "Upper Tolerance",
            FieldKey::MeasuredValue => "Measured Value",
            FieldKey::OperationNumberDetection => "Operation Number of Detection",
            FieldKey::MachineNumDetection => "Machine Number of Detection",
            FieldKey::OperatorDetection => "Operator of Detection",
            FieldKey::DateDetection => "Date of Detection",
            FieldKey::OperationNumberOccurrence => "Operation Number of Occurrence",
            FieldKey::MachineNumOccurrence => "Machine Number of Occurrence",
            FieldKey::OperatorMachining => "Operator of Machining",
            FieldKey::DateMachining => "Date of Machining",
        }
    }

    pub fn section(&self) -> RecordSection {
        match self {
            FieldKey::PartType | FieldKey::JobOrder => RecordSection::PartInformation,
            FieldKey::NcDescription
            | FieldKey::NcCode
            | FieldKey::DefectDescEn
            | FieldKey::QcCommentsEn => RecordSection::NonConformanceDetails,
            FieldKey::Nominal
            | FieldKey::LowerTolerance
            | FieldKey::UpperTolerance
            | FieldKey::MeasuredValue => RecordSection::Measurements,
            FieldKey::OperationNumberDetection
            | FieldKey::MachineNumDetection
            | FieldKey::OperatorDetection
            | FieldKey::DateDetection => RecordSection::DetectionInformation,
            FieldKey::OperationNumberOccurrence
            | FieldKey::MachineNumOccurrence
            | FieldKey::OperatorMachining
            | FieldKey::DateMachining => RecordSection::OccurrenceInformation,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::Nominal
            | FieldKey::LowerTolerance
            | FieldKey::UpperTolerance
            | FieldKey::MeasuredValue => FieldKind::Numeric,
            FieldKey::DateDetection | FieldKey::DateMachining => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// 按表单字段名查找
    pub fn from_name(name: &str) -> Option<FieldKey> {
        FieldKey::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 等级 (Level)
// ==========================================
// 建议措施的优先级与成本共用三级制
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "Low"),
            Level::Medium => write!(f, "Medium"),
            Level::High => write!(f, "High"),
        }
    }
}
