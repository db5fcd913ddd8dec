use serde_json::json;

use storefront_checkout::checkout::error::CheckoutError;
use storefront_checkout::request::executor::{
    RequestEvent, RequestExecutor, RequestState, RequestStatus, transition,
};

#[test]
fn executor_starts_idle() {
    let executor: RequestExecutor<u32> = RequestExecutor::new();
    assert_eq!(executor.status(), RequestStatus::Idle);
    assert!(executor.data().is_none());
    assert!(executor.error().is_none());
}

#[test]
fn run_success_resolves_with_payload() {
    let mut executor = RequestExecutor::new();
    let status = executor.run(|| Ok(json!({ "ok": true }))).unwrap();
    assert_eq!(status, RequestStatus::Resolved);
    assert_eq!(executor.data(), Some(&json!({ "ok": true })));
}

#[test]
fn run_failure_becomes_rejected_state_not_error() {
    let mut executor: RequestExecutor<u32> = RequestExecutor::new();
    let status = executor
        .run(|| Err(CheckoutError::Network("connection refused".into())))
        .unwrap();
    assert_eq!(status, RequestStatus::Rejected);
    assert!(matches!(executor.error(), Some(CheckoutError::Network(_))));
    assert!(executor.data().is_none());
}

#[test]
fn begin_while_pending_is_refused() {
    let mut executor: RequestExecutor<u32> = RequestExecutor::new();
    executor.begin().unwrap();
    assert!(matches!(executor.begin(), Err(CheckoutError::SubmissionInFlight)));
    assert_eq!(executor.status(), RequestStatus::Pending);
    assert!(matches!(executor.run(|| Ok(1)), Err(CheckoutError::SubmissionInFlight)));
    assert_eq!(executor.status(), RequestStatus::Pending);
}

#[test]
fn new_run_starts_fresh_cycle_after_terminal_state() {
    let mut executor: RequestExecutor<u32> = RequestExecutor::new();
    executor.run(|| Err(CheckoutError::Network("down".into()))).unwrap();
    assert_eq!(executor.status(), RequestStatus::Rejected);

    executor.run(|| Ok(7)).unwrap();
    assert_eq!(executor.status(), RequestStatus::Resolved);
    assert_eq!(executor.data(), Some(&7));
    assert!(executor.error().is_none());
}

#[test]
fn settle_without_begin_is_invalid() {
    let mut executor: RequestExecutor<u32> = RequestExecutor::new();
    match executor.settle(Ok(1)) {
        Err(CheckoutError::InvalidTransition { from, event }) => {
            assert_eq!(from, "idle");
            assert_eq!(event, "resolve");
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
    assert_eq!(executor.status(), RequestStatus::Idle);
}

#[test]
fn transition_table() {
    let idle: RequestState<u32> = RequestState::Idle;
    let pending = transition(&idle, RequestEvent::Start).unwrap();
    assert_eq!(pending.status(), RequestStatus::Pending);

    let resolved = transition(&pending, RequestEvent::Resolve(3)).unwrap();
    assert_eq!(resolved.status(), RequestStatus::Resolved);

    let restarted = transition(&resolved, RequestEvent::Start).unwrap();
    assert_eq!(restarted.status(), RequestStatus::Pending);

    assert!(transition(&resolved, RequestEvent::Reject(CheckoutError::SubmissionInFlight)).is_err());
}

#[test]
fn reset_returns_to_idle() {
    let mut executor = RequestExecutor::new();
    executor.run(|| Ok(1)).unwrap();
    executor.reset();
    assert_eq!(executor.status(), RequestStatus::Idle);
}

#[test]
fn status_display_names() {
    assert_eq!(RequestStatus::Idle.to_string(), "idle");
    assert_eq!(RequestStatus::Pending.to_string(), "pending");
    assert_eq!(RequestStatus::Resolved.to_string(), "resolved");
    assert_eq!(RequestStatus::Rejected.to_string(), "rejected");
}
