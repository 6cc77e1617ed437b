// ==========================================
// NCR 质量系统 - 分析面板视图模型
// ==========================================
// 职责: 将 AnalysisState 转换为可序列化的视图（供前端渲染）及纯文本渲染（CLI）
// 渲染约定:
//   无记录 -> 占位提示；分析中 -> 加载状态；完成 -> 记录分组 + 根因 + 措施 + 预防 + 影响
// ==========================================

use serde::Serialize;
use std::fmt::Write as _;

use crate::domain::ncr::{MeasurementAssessment, NcrRecord, ToleranceStatus};
use crate::domain::prediction::PredictionResult;
use crate::domain::types::{FieldKey, Level, RecordSection};
use crate::engine::analysis::AnalysisState;
use crate::i18n::{t, t_with_args};

/// 置信度条宽度（字符）
const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub key: FieldKey,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section: RecordSection,
    pub title: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementView {
    pub assessment: MeasurementAssessment,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceBar {
    pub cause: String,
    pub category: String,
    pub confidence: u8,
}

impl ConfidenceBar {
    /// 填充格数（四舍五入）
    pub fn filled(&self) -> usize {
        (usize::from(self.confidence.min(100)) * BAR_WIDTH + 50) / 100
    }

    pub fn render(&self) -> String {
        let filled = self.filled();
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixView {
    pub fix: String,
    pub priority: Level,
    pub cost: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyView {
    pub sections: Vec<SectionView>,
    pub measurement: Option<MeasurementView>,
    pub root_causes: Vec<ConfidenceBar>,
    pub suggested_fixes: Vec<FixView>,
    pub preventive_measures: Vec<String>,
    pub impact_assessment: String,
}

// ==========================================
// AnalysisView - 分析面板视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisView {
    Empty {
        message: String,
    },
    Awaiting {
        message: String,
        sections: Vec<SectionView>,
    },
    Loading {
        message: String,
        sections: Vec<SectionView>,
    },
    Ready(ReadyView),
}

impl AnalysisView {
    pub fn from_state(state: &AnalysisState) -> Self {
        match state {
            AnalysisState::NoRecord => AnalysisView::Empty {
                message: t("view.empty"),
            },
            AnalysisState::Received { record } => AnalysisView::Awaiting {
                message: t("view.awaiting"),
                sections: sections(record),
            },
            AnalysisState::Pending { record, .. } => AnalysisView::Loading {
                message: t("view.loading"),
                sections: sections(record),
            },
            AnalysisState::Ready { record, result, .. } => {
                AnalysisView::Ready(ready(record, result))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisView::Loading { .. })
    }

    /// 纯文本渲染
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match self {
            AnalysisView::Empty { message } => {
                let _ = writeln!(out, "{}", message);
            }
            AnalysisView::Awaiting { message, sections }
            | AnalysisView::Loading { message, sections } => {
                write_sections(&mut out, sections);
                let _ = writeln!(out, "\n{}", message);
            }
            AnalysisView::Ready(view) => {
                write_sections(&mut out, &view.sections);
                if let Some(m) = &view.measurement {
                    let _ = writeln!(out, "  * {}", m.message);
                }

                heading(&mut out, &t("view.root_causes"));
                for bar in &view.root_causes {
                    let _ = writeln!(
                        out,
                        "  {} {:>3}%  {} ({})",
                        bar.render(),
                        bar.confidence,
                        bar.cause,
                        bar.category
                    );
                }

                heading(&mut out, &t("view.suggested_fixes"));
                let priority = t("view.priority");
                let cost = t("view.cost");
                for fix in &view.suggested_fixes {
                    let _ = writeln!(
                        out,
                        "  - {}  [{}: {}] [{}: {}]",
                        fix.fix, priority, fix.priority, cost, fix.cost
                    );
                }

                heading(&mut out, &t("view.preventive_measures"));
                for (i, measure) in view.preventive_measures.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", i + 1, measure);
                }

                heading(&mut out, &t("view.impact_assessment"));
                let _ = writeln!(out, "  {}", view.impact_assessment);
            }
        }
        out
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {} ==", title);
}

fn write_sections(out: &mut String, sections: &[SectionView]) {
    for section in sections {
        heading(out, &section.title);
        for field in &section.fields {
            let _ = writeln!(out, "  {}: {}", field.label, field.value);
        }
    }
}

fn sections(record: &NcrRecord) -> Vec<SectionView> {
    RecordSection::ALL
        .iter()
        .map(|section| SectionView {
            section: *section,
            title: t(section.i18n_key()),
            fields: section
                .fields()
                .map(|key| FieldView {
                    key,
                    label: key.label().to_string(),
                    value: record.get(key).to_string(),
                })
                .collect(),
        })
        .collect()
}

fn measurement(record: &NcrRecord) -> Option<MeasurementView> {
    let assessment = record.measurement()?;
    let key = match assessment.status {
        ToleranceStatus::WithinTolerance => "view.measurement_within",
        ToleranceStatus::AboveUpperLimit => "view.measurement_above",
        ToleranceStatus::BelowLowerLimit => "view.measurement_below",
    };
    let measured = format!("{:.3}", assessment.measured);
    let lower = format!("{:.3}", assessment.lower_limit);
    let upper = format!("{:.3}", assessment.upper_limit);
    let deviation = format!("{:+.3}", assessment.deviation);
    let message = t_with_args(
        key,
        &[
            ("measured", measured.as_str()),
            ("lower", lower.as_str()),
            ("upper", upper.as_str()),
            ("deviation", deviation.as_str()),
        ],
    );
    Some(MeasurementView {
        assessment,
        message,
    })
}

fn ready(record: &NcrRecord, result: &PredictionResult) -> ReadyView {
    ReadyView {
        sections: sections(record),
        measurement: measurement(record),
        root_causes: result
            .root_causes
            .iter()
            .map(|c| ConfidenceBar {
                cause: c.cause.clone(),
                category: c.category.clone(),
                confidence: c.confidence,
            })
            .collect(),
        suggested_fixes: result
            .suggested_fixes
            .iter()
            .map(|f| FixView {
                fix: f.fix.clone(),
                priority: f.priority,
                cost: f.cost,
            })
            .collect(),
        preventive_measures: result.preventive_measures.clone(),
        impact_assessment: result.impact_assessment.clone(),
    }
}
