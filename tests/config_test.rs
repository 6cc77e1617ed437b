// ==========================================
// AppConfig 集成测试
// ==========================================
// 测试目标: 验证配置文件读取与默认值
// ==========================================


use std::sync::Arc;
use std::time::Duration;

use ncr_qc::app::AppState;
use ncr_qc::config::AppConfig;
use ncr_qc::engine::{ManualClock, RecordingNotifier};
use test_helpers::{gear_housing_fields, write_test_config};

#[test]
fn test_load_full_config_file() {
    let (_temp_file, path) = write_test_config(
        r#"
submit_delay_ms = 250
analysis_delay_ms = 500
auto_analyze = false
notify_analysis_complete = false
locale = "zh-CN"
"#,
    )
    .expect("Failed to write test config");

    let config = AppConfig::load(&path).expect("Failed to load config");
    assert_eq!(config.submit_delay(), Duration::from_millis(250));
    assert_eq!(config.analysis_delay(), Duration::from_millis(500));
    assert!(!config.auto_analyze);
    assert!(!config.notify_analysis_complete);
    assert_eq!(config.locale, "zh-CN");
}

#[test]
fn test_partial_config_uses_defaults() {
    let (_temp_file, path) =
        write_test_config("analysis_delay_ms = 10\n").expect("Failed to write test config");

    let config = AppConfig::load(&path).expect("Failed to load config");
    assert_eq!(config.analysis_delay_ms, 10);
    assert_eq!(config.submit_delay_ms, AppConfig::default().submit_delay_ms);
    assert!(config.auto_analyze);
    assert_eq!(config.locale, "en");
}

#[test]
fn test_invalid_config_file_rejected() {
    let (_temp_file, path) =
        write_test_config("locale = \"fr\"\n").expect("Failed to write test config");
    assert!(AppConfig::load(&path).is_err());

    let (_temp_file, path) =
        write_test_config("submit_delay_ms = \"soon\"\n").expect("Failed to write test config");
    assert!(AppConfig::load(&path).is_err());
}

#[test]
fn test_missing_config_file_is_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[tokio::test]
async fn test_loaded_delays_drive_app() {
    let (_temp_file, path) = write_test_config(
        "submit_delay_ms = 300\nanalysis_delay_ms = 700\n",
    )
    .expect("Failed to write test config");
    let config = AppConfig::load(&path).expect("Failed to load config");

    let clock = Arc::new(ManualClock::new());
    let app = Arc::new(AppState::new(
        config,
        clock.clone(),
        Arc::new(RecordingNotifier::new()),
    ));

    let submit = {
        let app = app.clone();
        tokio::spawn(async move { app.submit(gear_housing_fields()).await })
    };
    clock.wait_for_pending(1).await;
    assert_eq!(clock.advance(Duration::from_millis(299)), 0);
    assert_eq!(clock.advance(Duration::from_millis(1)), 1);
    submit.await.unwrap().unwrap();

    clock.wait_for_pending(1).await;
    assert_eq!(clock.advance(Duration::from_millis(699)), 0);
    assert_eq!(clock.advance(Duration::from_millis(1)), 1);
    app.settle().await;
    assert!(app.analysis.state().result().is_some());
}
