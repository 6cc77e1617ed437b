// ==========================================
// 分析展示控制器集成测试
// ==========================================
// 测试目标: 状态机迁移、过期结果丢弃（最新请求胜出）、视图渲染
// ==========================================


use std::sync::Arc;
use std::time::Duration;

use ncr_qc::domain::prediction;
use ncr_qc::engine::{
    AnalysisDisplayController, AnalysisOutcome, AnalysisState, AnalysisView, ManualClock,
    NotificationKind, RecordingNotifier, SimulatedAnalyzer, DEFAULT_ANALYSIS_LATENCY,
};
use test_helpers::{gear_housing_fields, record, shaft_fields};

fn controller(clock: Arc<ManualClock>) -> (Arc<AnalysisDisplayController>, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let analyzer = SimulatedAnalyzer::new(clock, DEFAULT_ANALYSIS_LATENCY);
    let ctrl = AnalysisDisplayController::new(Arc::new(analyzer), Arc::new(notifier.clone()));
    (Arc::new(ctrl), notifier)
}

#[tokio::test]
async fn test_supplied_record_reaches_ready_after_delay() {
    let clock = Arc::new(ManualClock::new());
    let (ctrl, notifier) = controller(clock.clone());
    assert_eq!(ctrl.state(), AnalysisState::NoRecord);
    assert!(matches!(ctrl.view(), AnalysisView::Empty { .. }));

    let ticket = ctrl.supply_record(Some(record(gear_housing_fields()))).unwrap();
    assert_ne!(ctrl.state(), AnalysisState::NoRecord);
    assert!(ctrl.view().is_loading());

    let run = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(ticket).await })
    };
    clock.wait_for_pending(1).await;
    assert!(ctrl.state().result().is_none());

    clock.advance(DEFAULT_ANALYSIS_LATENCY);
    assert!(run.await.unwrap().is_committed());

    let state = ctrl.state();
    assert_eq!(state.result(), Some(&prediction::canned()));
    assert_eq!(state.record().unwrap(), &gear_housing_fields());
    assert_eq!(notifier.count(NotificationKind::AnalysisComplete), 1);
}

#[tokio::test]
async fn test_retrigger_in_flight_latest_finishes_last() {
    let clock = Arc::new(ManualClock::new());
    let (ctrl, notifier) = controller(clock.clone());

    let first = ctrl.supply_record(Some(record(gear_housing_fields()))).unwrap();
    let first = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(first).await })
    };
    clock.wait_for_pending(1).await;

    // 旧请求先到期
    clock.advance(Duration::from_millis(500));
    let second = ctrl.reanalyze().unwrap();
    let second = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(second).await })
    };
    clock.wait_for_pending(2).await;

    clock.advance(Duration::from_millis(1500));
    assert_eq!(
        first.await.unwrap(),
        AnalysisOutcome::Stale { token: 1, latest: 2 }
    );
    assert!(ctrl.state().is_pending());

    clock.advance(Duration::from_millis(500));
    assert_eq!(second.await.unwrap(), AnalysisOutcome::Committed(2));

    assert_eq!(ctrl.state().token(), Some(2));
    assert!(ctrl.state().result().is_some());
    assert_eq!(notifier.count(NotificationKind::AnalysisComplete), 1);
}

#[tokio::test]
async fn test_retrigger_in_flight_latest_finishes_first() {
    let clock = Arc::new(ManualClock::new());
    let (ctrl, notifier) = controller(clock.clone());

    let first = ctrl.supply_record(Some(record(gear_housing_fields()))).unwrap();
    let first = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(first).await })
    };
    clock.wait_for_pending(1).await;

    let second = ctrl.reanalyze().unwrap();
    let second = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(second).await })
    };
    clock.wait_for_pending(2).await;

    assert!(clock.release_newest());
    assert_eq!(second.await.unwrap(), AnalysisOutcome::Committed(2));
    let committed = ctrl.state();

    assert!(clock.release_newest());
    assert!(!first.await.unwrap().is_committed());

    // 旧请求完成后状态不变
    assert_eq!(ctrl.state(), committed);
    assert_eq!(notifier.count(NotificationKind::AnalysisComplete), 1);
}

#[tokio::test]
async fn test_new_record_replaces_in_flight_analysis() {
    let clock = Arc::new(ManualClock::new());
    let (ctrl, _notifier) = controller(clock.clone());

    let first = ctrl.supply_record(Some(record(gear_housing_fields()))).unwrap();
    let first = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(first).await })
    };
    clock.wait_for_pending(1).await;

    let second = ctrl.supply_record(Some(record(shaft_fields()))).unwrap();
    let second = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.run(second).await })
    };
    clock.wait_for_pending(2).await;

    clock.advance(DEFAULT_ANALYSIS_LATENCY);
    let outcomes = (first.await.unwrap(), second.await.unwrap());
    assert!(!outcomes.0.is_committed());
    assert!(outcomes.1.is_committed());

    // 只保留当前记录
    assert_eq!(ctrl.state().record().unwrap(), &shaft_fields());
}

#[tokio::test]
async fn test_ready_view_groups_record_and_results() {
    let clock = Arc::new(ManualClock::new());
    let notifier = RecordingNotifier::new();
    let analyzer = SimulatedAnalyzer::new(clock, Duration::ZERO);
    let ctrl = AnalysisDisplayController::new(Arc::new(analyzer), Arc::new(notifier))
        .with_completion_notice(false);

    ctrl.on_record_available(record(gear_housing_fields())).await.unwrap();

    let AnalysisView::Ready(view) = ctrl.view() else {
        panic!("expected ready view");
    };
    let titles: Vec<_> = view.sections.iter().map(|s| s.section).collect();
    assert_eq!(titles, ncr_qc::domain::RecordSection::ALL.to_vec());
    assert_eq!(view.sections[1].fields[1].value, "DIM-001");
    assert_eq!(view.root_causes[0].confidence, 92);
    assert_eq!(view.suggested_fixes.len(), 4);
    assert!(view.impact_assessment.starts_with("Based on historical data"));
    assert!(view.measurement.is_some());
}
