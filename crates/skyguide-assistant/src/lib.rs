pub mod client;
pub mod error;
pub mod instructions;
pub mod streaming;
pub mod traits;
pub mod types;

pub use client::AssistantClient;
pub use error::AssistantError;
pub use instructions::DEFAULT_RUN_INSTRUCTIONS;
pub use streaming::{parse_run_sse_stream, RunStreamEvent};
pub use traits::AssistantApi;
pub use types::{
    AssistantThread, ContentBlock, LastError, MessageList, Run, RunStatus, TextContent,
    ThreadHandle, ThreadMessage,
};
