// ==========================================
// 录入表单控制器集成测试
// ==========================================
// 测试目标: 必填校验、提交交付、重置、连续提交独立性、单一在途提交
// ==========================================


use std::sync::Arc;
use std::time::Duration;

use ncr_qc::api::FormError;
use ncr_qc::domain::{FieldKey, NcrFields};
use ncr_qc::engine::{
    IntakeFormController, ManualClock, NotificationKind, RecordingNotifier, DEFAULT_SUBMIT_DELAY,
};
use test_helpers::{gear_housing_fields, shaft_fields, CollectingHandler};

fn form_with(
    clock: Arc<ManualClock>,
    delay: Duration,
) -> (IntakeFormController, Arc<CollectingHandler>, RecordingNotifier) {
    let handler = CollectingHandler::new();
    let notifier = RecordingNotifier::new();
    let form = IntakeFormController::new(clock, handler.clone(), Arc::new(notifier.clone()))
        .with_submit_delay(delay);
    (form, handler, notifier)
}

fn instant_form() -> (IntakeFormController, Arc<CollectingHandler>, RecordingNotifier) {
    form_with(Arc::new(ManualClock::new()), Duration::ZERO)
}

#[tokio::test]
async fn test_each_missing_field_is_reported_alone() {
    for key in FieldKey::ALL {
        let (form, handler, notifier) = instant_form();
        let input = gear_housing_fields().with(key, "");

        let err = form.submit_input(input.clone()).await.unwrap_err();
        let FormError::Validation(validation) = err else {
            panic!("expected validation error for {}", key);
        };

        assert_eq!(validation.fields(), vec![key], "field {}", key);
        assert_eq!(
            validation.message_for(key).unwrap(),
            format!("{} is required", key.label())
        );
        assert!(handler.records().is_empty());
        assert!(notifier.events().is_empty());
        assert_eq!(form.fields(), input);
    }
}

#[tokio::test]
async fn test_complete_submission_yields_equal_record() {
    let (form, handler, _notifier) = instant_form();

    let record = form.submit_input(gear_housing_fields()).await.unwrap();
    assert_eq!(record, gear_housing_fields());
    assert_eq!(handler.records(), vec![record]);
}

#[tokio::test]
async fn test_missing_job_order_scenario() {
    let (form, handler, notifier) = instant_form();
    for (key, value) in gear_housing_fields().with(FieldKey::JobOrder, "").iter() {
        form.set_field(key, value);
    }

    let err = form.submit().await.unwrap_err();
    assert_eq!(err.validation().unwrap().fields(), vec![FieldKey::JobOrder]);

    let errors = form.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(&FieldKey::JobOrder).unwrap(), "Job Order is required");

    // 其它字段保持原值
    assert_eq!(form.field(FieldKey::PartType), "Gear Housing");
    assert_eq!(form.field(FieldKey::MeasuredValue), "25.15");
    assert_eq!(form.field(FieldKey::JobOrder), "");

    assert!(handler.records().is_empty());
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_reset_always_empties_form() {
    let (form, _handler, notifier) = instant_form();

    form.reset();
    assert!(form.fields().is_empty());
    assert!(form.errors().is_empty());

    form.set_field(FieldKey::NcCode, "DIM-001");
    let _ = form.submit().await;
    assert!(!form.errors().is_empty());

    form.reset();
    assert_eq!(form.fields(), NcrFields::empty());
    assert!(form.errors().is_empty());
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_sequential_submissions_are_independent() {
    let (form, handler, notifier) = instant_form();

    form.submit_input(gear_housing_fields()).await.unwrap();
    assert!(form.fields().is_empty());

    for (key, value) in shaft_fields().iter() {
        form.set_field(key, value);
    }
    form.submit().await.unwrap();

    let records = handler.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1], shaft_fields());
    for key in FieldKey::ALL {
        assert_ne!(records[0].get(key), records[1].get(key), "field {} leaked", key);
    }
    assert_eq!(notifier.count(NotificationKind::SubmissionSucceeded), 2);
}

#[tokio::test]
async fn test_submit_waits_for_processing_delay() {
    let clock = Arc::new(ManualClock::new());
    let (form, handler, notifier) = form_with(clock.clone(), DEFAULT_SUBMIT_DELAY);
    let form = Arc::new(form);

    let pending = {
        let form = form.clone();
        tokio::spawn(async move { form.submit_input(gear_housing_fields()).await })
    };
    clock.wait_for_pending(1).await;

    assert!(form.is_submitting());
    assert!(form.view().submitting);
    assert!(handler.records().is_empty());
    assert!(notifier.events().is_empty());

    let duplicate = form.submit_input(gear_housing_fields()).await;
    assert_eq!(duplicate.unwrap_err(), FormError::SubmissionInProgress);

    clock.advance(Duration::from_millis(999));
    assert!(handler.records().is_empty());
    clock.advance(Duration::from_millis(1));

    pending.await.unwrap().unwrap();
    assert!(!form.is_submitting());
    assert_eq!(handler.records().len(), 1);
    assert_eq!(notifier.count(NotificationKind::SubmissionSucceeded), 1);
    assert!(form.fields().is_empty());
}
