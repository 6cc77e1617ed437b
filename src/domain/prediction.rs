// ==========================================
// NCR 质量系统 - 根因预测结果
// ==========================================
// 职责: 分析结果结构与固定的模拟预测载荷
// 说明: 建议措施统一采用 {fix, priority, cost} 形态
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::Level;

/// 根因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCause {
    pub cause: String,
    /// 置信度百分比 0-100
    pub confidence: u8,
    pub category: String,
}

/// 建议措施
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFix {
    pub fix: String,
    pub priority: Level,
    pub cost: Level,
}

/// 预测结果
///
/// 约定: root_causes 按置信度降序排列（不强制）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub root_causes: Vec<RootCause>,
    pub suggested_fixes: Vec<SuggestedFix>,
    pub preventive_measures: Vec<String>,
    pub impact_assessment: String,
}

impl PredictionResult {
    /// 置信度最高的根因
    pub fn top_root_cause(&self) -> Option<&RootCause> {
        self.root_causes.iter().max_by_key(|c| c.confidence)
    }

    /// 根因是否按置信度降序
    pub fn is_ranked(&self) -> bool {
        self.root_causes
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence)
    }
}

// ==========================================
// 固定预测载荷
// ==========================================

fn root_cause(cause: &str, confidence: u8, category: &str) -> RootCause {
    RootCause {
        cause: cause.to_string(),
        confidence: confidence.min(100),
        category: category.to_string(),
    }
}

fn fix(text: &str, priority: Level, cost: Level) -> SuggestedFix {
    SuggestedFix {
        fix: text.to_string(),
        priority,
        cost,
    }
}

/// 模拟分析返回的固定结果（与输入无关）
pub fn canned() -> PredictionResult {
    PredictionResult {
        root_causes: vec![
            root_cause(
                "Machine calibration drift detected in temperature control system",
                92,
                "Equipment",
            ),
            root_cause(
                "Operator training gap in measurement procedure verification",
                78,
                "Human Factor",
            ),
            root_cause(
                "Material batch variation exceeding specification limits",
                65,
                "Material",
            ),
        ],
        suggested_fixes: vec![
            fix(
                "Perform immediate machine recalibration and establish weekly verification schedule",
                Level::High,
                Level::Medium,
            ),
            fix(
                "Conduct refresher training session on measurement protocols for all operators",
                Level::High,
                Level::Low,
            ),
            fix(
                "Implement incoming material inspection with tighter acceptance criteria",
                Level::Medium,
                Level::Medium,
            ),
            fix(
                "Install automated monitoring system for temperature fluctuations",
                Level::Medium,
                Level::High,
            ),
        ],
        preventive_measures: vec![
            "Schedule preventive maintenance every 2 weeks instead of monthly".to_string(),
            "Create visual work instructions at the workstation".to_string(),
            "Implement statistical process control (SPC) charts for this operation".to_string(),
            "Add secondary verification step for critical dimensions".to_string(),
        ],
        impact_assessment: "Based on historical data, this type of non-conformance typically affects 2-5% of production runs. Implementing the suggested fixes could reduce occurrence rate by 85% and save approximately $15,000-$25,000 annually in scrap costs.".to_string(),
    }
}
