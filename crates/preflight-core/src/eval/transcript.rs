//! Agent run transcripts.
//!
//! A transcript is the JSON array of typed messages the eval engine records
//! for one run. Only the parts scorers read are modelled; everything else is
//! ignored.

use serde::Deserialize;
use serde_json::Value;

/// A content block inside a message.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub input: Option<Value>,
}

/// Message content is either plain text or a list of blocks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Blocks(Vec<ContentBlock>),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MessageBody {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// One entry of the transcript.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TranscriptMessage {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub message: Option<MessageBody>,
}

impl TranscriptMessage {
    fn blocks(&self) -> &[ContentBlock] {
        match self.message.as_ref().and_then(|m| m.content.as_ref()) {
            Some(MessageContent::Blocks(blocks)) => blocks,
            _ => &[],
        }
    }
}

/// A tool invocation made by the assistant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolUse<'t> {
    pub name: &'t str,
    pub input: Option<&'t Value>,
}

impl<'t> ToolUse<'t> {
    /// The `command` argument, if the tool received one.
    pub fn command(&self) -> Option<&'t str> {
        self.input?.get("command")?.as_str()
    }
}

/// A parsed agent transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<TranscriptMessage>,
}

impl Transcript {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let messages = serde_json::from_str(raw)?;
        Ok(Self { messages })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Tool invocations authored by the assistant, in transcript order.
    pub fn tool_uses(&self) -> impl Iterator<Item = ToolUse<'_>> {
        self.messages
            .iter()
            .filter(|m| m.kind == "assistant")
            .flat_map(TranscriptMessage::blocks)
            .filter(|block| block.kind == "tool_use")
            .filter_map(|block| {
                block.name.as_deref().map(|name| ToolUse {
                    name,
                    input: block.input.as_ref(),
                })
            })
    }
}
