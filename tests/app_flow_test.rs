// ==========================================
// 端到端流程测试: 表单提交 -> 交接 -> 自动分析
// ==========================================


use std::sync::Arc;
use std::time::Duration;

use ncr_qc::app::{ActiveTab, AppState};
use ncr_qc::config::AppConfig;
use ncr_qc::domain::FieldKey;
use ncr_qc::engine::{
    AnalysisOutcome, AnalysisState, ManualClock, NotificationKind, RecordingNotifier,
};
use test_helpers::gear_housing_fields;

fn app(clock: Arc<ManualClock>, config: AppConfig) -> (AppState, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let app = AppState::new(config, clock, Arc::new(notifier.clone()));
    (app, notifier)
}

#[tokio::test]
async fn test_gear_housing_scenario() {
    ncr_qc::logging::init_test();
    let clock = Arc::new(ManualClock::new());
    let (app, notifier) = app(clock.clone(), AppConfig::default());
    let app = Arc::new(app);

    let submit = {
        let app = app.clone();
        tokio::spawn(async move { app.submit(gear_housing_fields()).await })
    };
    clock.wait_for_pending(1).await;
    assert!(app.form.is_submitting());

    // 提交处理 1s
    clock.advance(Duration::from_millis(1000));
    let record = submit.await.unwrap().unwrap();
    assert_eq!(record, gear_housing_fields());

    assert_eq!(notifier.count(NotificationKind::SubmissionSucceeded), 1);
    assert!(app.form.fields().is_empty());
    assert_eq!(app.active_tab(), ActiveTab::Management);

    // 分析面板收到完全相同的记录并自动开始分析
    match app.analysis.state() {
        AnalysisState::Pending { record, token } => {
            assert_eq!(record, gear_housing_fields());
            assert_eq!(token, 1);
        }
        other => panic!("expected pending analysis, got {}", other.name()),
    }
    assert!(app.analysis_view().is_loading());

    // 分析 2s
    clock.wait_for_pending(1).await;
    clock.advance(Duration::from_millis(2000));
    assert_eq!(app.settle().await, vec![AnalysisOutcome::Committed(1)]);

    assert!(app.analysis.state().result().is_some());
    assert_eq!(notifier.count(NotificationKind::AnalysisComplete), 1);
}

#[tokio::test]
async fn test_invalid_submission_does_not_reach_analysis() {
    let (app, notifier) = app(Arc::new(ManualClock::new()), AppConfig::default());

    let err = app
        .submit(gear_housing_fields().with(FieldKey::JobOrder, ""))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(app.form.field(FieldKey::PartType), "Gear Housing");
    assert_eq!(app.analysis.state(), AnalysisState::NoRecord);
    assert_eq!(app.active_tab(), ActiveTab::Form);
    assert!(notifier.events().is_empty());
    assert_eq!(app.pending_tasks(), 0);
}

#[tokio::test]
async fn test_manual_reanalyze_while_in_flight() {
    let config = AppConfig {
        submit_delay_ms: 0,
        ..AppConfig::default()
    };
    let clock = Arc::new(ManualClock::new());
    let (app, notifier) = app(clock.clone(), config);

    app.submit(gear_housing_fields()).await.unwrap();
    clock.wait_for_pending(1).await;

    assert!(app.reanalyze());
    clock.wait_for_pending(2).await;

    clock.advance(Duration::from_millis(2000));
    let outcomes = app.settle().await;
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes.iter().filter(|o| o.is_committed()).count(), 1);
    assert_eq!(app.analysis.state().token(), Some(2));
    assert_eq!(notifier.count(NotificationKind::AnalysisComplete), 1);
}

#[tokio::test]
async fn test_auto_analyze_disabled() {
    let config = AppConfig {
        submit_delay_ms: 0,
        analysis_delay_ms: 0,
        auto_analyze: false,
        notify_analysis_complete: false,
        ..AppConfig::default()
    };
    let (app, notifier) = app(Arc::new(ManualClock::new()), config);

    app.submit(gear_housing_fields()).await.unwrap();
    assert_eq!(app.analysis.state().name(), "RECEIVED");
    assert_eq!(app.pending_tasks(), 0);

    assert!(app.reanalyze());
    app.settle().await;
    assert!(app.analysis.state().result().is_some());
    assert_eq!(notifier.count(NotificationKind::AnalysisComplete), 0);
}

#[tokio::test]
async fn test_second_submission_replaces_current_record() {
    let config = AppConfig {
        submit_delay_ms: 0,
        analysis_delay_ms: 0,
        ..AppConfig::default()
    };
    let (app, _notifier) = app(Arc::new(ManualClock::new()), config);

    app.submit(gear_housing_fields()).await.unwrap();
    app.settle().await;

    let second = test_helpers::shaft_fields().with(FieldKey::NcCode, "SURF-002");
    app.submit(second.clone()).await.unwrap();
    app.settle().await;

    let state = app.analysis.state();
    assert_eq!(state.record().unwrap(), &second);
    assert_eq!(state.token(), Some(2));
}
