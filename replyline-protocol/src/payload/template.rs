use serde::{Deserialize, Serialize};

/// `reply_template_content` as sent to the messaging platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyTemplateContent {
    pub message: TemplateMessage,
}

/// The four message shapes. Variant order matters for untagged decoding:
/// quick replies carry `text` too, so they must be tried before plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TemplateMessage {
    QuickReplies {
        text: String,
        quick_replies: Vec<QuickReplyWire>,
    },
    Attachment {
        attachment: Attachment,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Image { payload: ImagePayload },
    Template { payload: ButtonPayload },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagePayload {
    pub url: String,
    pub is_reusable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ButtonPayload {
    /// Always `"button"` for the templates this tool produces.
    pub template_type: String,
    pub text: String,
    pub buttons: Vec<UrlButtonWire>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonType {
    WebUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlButtonWire {
    #[serde(rename = "type")]
    pub kind: ButtonType,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuickReplyContentType {
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickReplyWire {
    pub content_type: QuickReplyContentType,
    pub title: String,
    pub payload: String,
}
