use serde::{Deserialize, Serialize};

/// Wire representation of a message inside a provider thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub created_at: i64,
}

impl ThreadMessage {
    /// Concatenated text of all text blocks in the message
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_ref())
            .map(|t| t.value.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Message listing as returned by the provider (newest first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub has_more: bool,
}

impl MessageList {
    /// Text of the most recent assistant message, if any
    pub fn latest_assistant_text(&self) -> Option<String> {
        self.data
            .iter()
            .find(|m| m.role == "assistant")
            .map(|m| m.text())
    }
}
