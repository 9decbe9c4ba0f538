use serde::{Deserialize, Serialize};

/// Progress events emitted while a chat request is relayed.
///
/// These are shaped for direct forwarding over SSE: each variant is
/// tagged so clients can dispatch on `type` without peeking at fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    /// The relay accepted the request and resolved its conversation.
    Init {
        conversation_id: String,
        timestamp: i64,
    },
    /// Incremental answer text, in arrival order.
    Delta { content: String },
    /// Contract citation extracted from the finished answer.
    Reference { content: String },
    /// The request was answered without reaching the assistant.
    Redirect { notice: String },
    /// The relay failed; `notice` is safe to show to the user.
    Error { message: String, notice: String },
    /// The relay finished and no further events will arrive.
    Done {
        status: String,
        total_duration_ms: u64,
    },
}

impl RelayEvent {
    /// SSE event name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            RelayEvent::Init { .. } => "init",
            RelayEvent::Delta { .. } => "delta",
            RelayEvent::Reference { .. } => "reference",
            RelayEvent::Redirect { .. } => "redirect",
            RelayEvent::Error { .. } => "error",
            RelayEvent::Done { .. } => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = RelayEvent::Delta {
            content: "Per Section 12.4".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "delta");
        assert_eq!(json["content"], "Per Section 12.4");
    }

    #[test]
    fn test_done_round_trip() {
        let event = RelayEvent::Done {
            status: "completed".to_string(),
            total_duration_ms: 1234,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: RelayEvent = serde_json::from_str(&json).unwrap();
        match back {
            RelayEvent::Done {
                status,
                total_duration_ms,
            } => {
                assert_eq!(status, "completed");
                assert_eq!(total_duration_ms, 1234);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_event_names() {
        let init = RelayEvent::Init {
            conversation_id: "c1".to_string(),
            timestamp: 0,
        };
        assert_eq!(init.name(), "init");
        let err = RelayEvent::Error {
            message: "boom".to_string(),
            notice: "try again".to_string(),
        };
        assert_eq!(err.name(), "error");
    }
}
