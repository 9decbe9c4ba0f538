use std::collections::VecDeque;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};
use crate::types::Run;

/// Events surfaced while streaming an assistant run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunStreamEvent {
    /// Incremental text from the assistant reply
    Delta { content: String },

    /// The run reached `completed`
    Completed,

    /// The run ended without completing (failed, cancelled, expired)
    Failed {
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Provider closed the event stream
    Done,
}

/// One `thread.message.delta` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeltaChunk {
    pub id: String,
    pub delta: MessageDeltaBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeltaBody {
    #[serde(default)]
    pub content: Vec<DeltaBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaBlock {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<DeltaText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaText {
    pub value: Option<String>,
}

impl MessageDeltaChunk {
    /// Concatenated text carried by this delta
    pub fn text(&self) -> String {
        self.delta
            .content
            .iter()
            .filter_map(|block| block.text.as_ref())
            .filter_map(|t| t.value.as_deref())
            .collect()
    }
}

/// Parse the provider's run event stream into [`RunStreamEvent`]s.
///
/// The Assistants API interleaves `event:` and `data:` lines, so the parser
/// remembers the most recent event name and dispatches each data line
/// against it. Lifecycle events we do not care about are skipped.
pub fn parse_run_sse_stream(
    response: Response,
) -> Pin<Box<dyn Stream<Item = Result<RunStreamEvent>> + Send>> {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = VecDeque::with_capacity(8192);
        let mut current_event = String::new();

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes);

                    while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();

                        if let Ok(line_str) = std::str::from_utf8(&line_bytes) {
                            let line = line_str.trim();

                            if line.is_empty() {
                                continue;
                            }

                            if let Some(event_name) = line.strip_prefix("event: ") {
                                current_event = event_name.to_string();
                                continue;
                            }

                            if let Some(data) = line.strip_prefix("data: ") {
                                if data == "[DONE]" {
                                    yield Ok(RunStreamEvent::Done);
                                    break;
                                }

                                match current_event.as_str() {
                                    "thread.message.delta" => {
                                        match serde_json::from_str::<MessageDeltaChunk>(data) {
                                            Ok(chunk) => {
                                                let text = chunk.text();
                                                if !text.is_empty() {
                                                    yield Ok(RunStreamEvent::Delta { content: text });
                                                }
                                            }
                                            Err(e) => yield Err(AssistantError::Parse(e)),
                                        }
                                    }
                                    "thread.run.completed" => {
                                        yield Ok(RunStreamEvent::Completed);
                                    }
                                    "thread.run.failed"
                                    | "thread.run.cancelled"
                                    | "thread.run.expired" => {
                                        match serde_json::from_str::<Run>(data) {
                                            Ok(run) => {
                                                yield Ok(RunStreamEvent::Failed {
                                                    status: run.status.as_str().to_string(),
                                                    message: run.error_message().map(String::from),
                                                });
                                            }
                                            Err(e) => yield Err(AssistantError::Parse(e)),
                                        }
                                    }
                                    "thread.run.requires_action" => {
                                        // No tool-output submission here; the run cannot proceed.
                                        yield Ok(RunStreamEvent::Failed {
                                            status: "requires_action".to_string(),
                                            message: Some(
                                                "Run requested tool outputs, which are not supported".to_string(),
                                            ),
                                        });
                                    }
                                    "done" => {
                                        yield Ok(RunStreamEvent::Done);
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                }
                Err(e) => yield Err(AssistantError::Transport(e)),
            }
        }
    })
}
