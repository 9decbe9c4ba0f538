pub mod message;
pub mod run;
pub mod thread;

pub use message::{ContentBlock, MessageList, TextContent, ThreadMessage};
pub use run::{LastError, Run, RunStatus};
pub use thread::{AssistantThread, ThreadHandle};
