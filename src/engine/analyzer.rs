// ==========================================
// NCR 质量系统 - 根因分析器
// ==========================================
// 职责: 定义根因分析接口，提供模拟实现
// 说明: SimulatedAnalyzer 等待固定耗时后返回固定载荷（与输入无关）
//       接入真实模型时替换 RootCauseAnalyzer 实现即可，无需改动控制器
// ==========================================

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ncr::NcrRecord;
use crate::domain::prediction::{self, PredictionResult};
use crate::engine::clock::Clock;

/// 默认模拟分析耗时
pub const DEFAULT_ANALYSIS_LATENCY: Duration = Duration::from_millis(2000);

/// 根因分析器 Trait
#[async_trait]
pub trait RootCauseAnalyzer: Send + Sync {
    /// 分析一条 NCR 记录
    async fn analyze(&self, record: &NcrRecord) -> PredictionResult;
}

// ==========================================
// SimulatedAnalyzer - 模拟分析器
// ==========================================
pub struct SimulatedAnalyzer {
    clock: Arc<dyn Clock>,
    latency: Duration,
    fixture: PredictionResult,
}

impl SimulatedAnalyzer {
    /// 使用固定载荷创建
    pub fn new(clock: Arc<dyn Clock>, latency: Duration) -> Self {
        Self::with_fixture(clock, latency, prediction::canned())
    }

    pub fn with_fixture(clock: Arc<dyn Clock>, latency: Duration, fixture: PredictionResult) -> Self {
        Self {
            clock,
            latency,
            fixture,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl RootCauseAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, record: &NcrRecord) -> PredictionResult {
        tracing::debug!(
            part_type = %record.part_type,
            nc_code = %record.nc_code,
            latency_ms = self.latency.as_millis() as u64,
            "模拟根因分析开始"
        );
        self.clock.sleep(self.latency).await;
        self.fixture.clone()
    }
}
