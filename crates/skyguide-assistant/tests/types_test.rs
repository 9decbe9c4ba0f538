use skyguide_assistant::{AssistantThread, MessageList, Run, RunStatus, ThreadHandle};

#[test]
fn test_run_status_terminal_states() {
    assert!(RunStatus::Completed.is_terminal());
    assert!(RunStatus::Failed.is_terminal());
    assert!(RunStatus::Cancelled.is_terminal());
    assert!(RunStatus::Expired.is_terminal());

    assert!(!RunStatus::Queued.is_terminal());
    assert!(!RunStatus::InProgress.is_terminal());
    assert!(!RunStatus::RequiresAction.is_terminal());
    assert!(!RunStatus::Cancelling.is_terminal());
}

#[test]
fn test_run_status_as_str_round_trip() {
    let parsed: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
    assert_eq!(parsed, RunStatus::InProgress);
    assert_eq!(parsed.as_str(), "in_progress");
}

#[test]
fn test_run_without_last_error() {
    let json = r#"{"id":"run_1","thread_id":"t1","status":"queued","last_error":null}"#;
    let run: Run = serde_json::from_str(json).unwrap();

    assert_eq!(run.status, RunStatus::Queued);
    assert_eq!(run.error_message(), None);
}

#[test]
fn test_message_list_skips_user_messages() {
    let json = r#"{
        "data": [
            {"id": "m3", "role": "user", "created_at": 3, "content": [{"type": "text", "text": {"value": "follow-up"}}]},
            {"id": "m2", "role": "assistant", "created_at": 2, "content": [{"type": "text", "text": {"value": "the answer"}}]},
            {"id": "m1", "role": "user", "created_at": 1, "content": [{"type": "text", "text": {"value": "the question"}}]}
        ]
    }"#;

    let list: MessageList = serde_json::from_str(json).unwrap();
    assert_eq!(list.latest_assistant_text().as_deref(), Some("the answer"));
    assert!(!list.has_more);
}

#[test]
fn test_message_list_empty() {
    let list: MessageList = serde_json::from_str(r#"{"data":[]}"#).unwrap();
    assert_eq!(list.latest_assistant_text(), None);
}

#[test]
fn test_thread_handle_from_wire_thread() {
    let thread: AssistantThread =
        serde_json::from_str(r#"{"id":"thread_xyz","created_at":1700000000}"#).unwrap();

    let handle: ThreadHandle = thread.into();
    assert_eq!(handle.id(), "thread_xyz");
    assert_eq!(handle.into_id(), "thread_xyz");
}
