use replyline_protocol::types::{ReplyType, TemplateType};
use serde::{Deserialize, Serialize};

/// Link button of a button template.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlButton {
    pub text: String,
    pub link: String,
}

impl UrlButton {
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}

/// Tappable quick reply chip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickReply {
    pub text: String,
    pub payload: String,
}

impl QuickReply {
    pub fn new(text: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: payload.into(),
        }
    }
}

/// Content of a static reply, one variant per template type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateContent {
    Text {
        #[serde(default)]
        text: String,
    },
    Image {
        #[serde(default)]
        image_url: String,
    },
    ButtonTemplate {
        #[serde(default)]
        text: String,
        #[serde(default)]
        buttons: Vec<UrlButton>,
    },
    QuickReplies {
        #[serde(default)]
        text: String,
        #[serde(default)]
        replies: Vec<QuickReply>,
    },
}

impl Default for TemplateContent {
    fn default() -> Self {
        TemplateContent::Text {
            text: String::new(),
        }
    }
}

impl TemplateContent {
    pub fn text(text: impl Into<String>) -> Self {
        TemplateContent::Text { text: text.into() }
    }

    pub fn template_type(&self) -> TemplateType {
        match self {
            TemplateContent::Text { .. } => TemplateType::Text,
            TemplateContent::Image { .. } => TemplateType::Image,
            TemplateContent::ButtonTemplate { .. } => TemplateType::ButtonTemplate,
            TemplateContent::QuickReplies { .. } => TemplateType::QuickReplies,
        }
    }

    /// Message text for the text-bearing variants.
    pub fn message_text(&self) -> Option<&str> {
        match self {
            TemplateContent::Text { text }
            | TemplateContent::ButtonTemplate { text, .. }
            | TemplateContent::QuickReplies { text, .. } => Some(text.as_str()),
            TemplateContent::Image { .. } => None,
        }
    }

    /// Whether the primary content (text, or image URL) is blank.
    pub fn is_blank(&self) -> bool {
        match self {
            TemplateContent::Image { image_url } => image_url.trim().is_empty(),
            other => other.message_text().map_or(true, |text| text.trim().is_empty()),
        }
    }

    pub fn button_count(&self) -> usize {
        match self {
            TemplateContent::ButtonTemplate { buttons, .. } => buttons.len(),
            TemplateContent::QuickReplies { replies, .. } => replies.len(),
            TemplateContent::Text { .. } | TemplateContent::Image { .. } => 0,
        }
    }

    /// Appends a link button. No-op once the template is full or when the
    /// template is not a button template.
    pub fn push_button(&mut self, button: UrlButton) -> bool {
        let cap = self.template_type().button_cap();
        match self {
            TemplateContent::ButtonTemplate { buttons, .. }
                if cap.map_or(false, |cap| buttons.len() < cap) =>
            {
                buttons.push(button);
                true
            }
            _ => false,
        }
    }

    /// Appends a quick reply, with the same no-op semantics as [`Self::push_button`].
    pub fn push_quick_reply(&mut self, reply: QuickReply) -> bool {
        let cap = self.template_type().button_cap();
        match self {
            TemplateContent::QuickReplies { replies, .. }
                if cap.map_or(false, |cap| replies.len() < cap) =>
            {
                replies.push(reply);
                true
            }
            _ => false,
        }
    }

    pub fn remove_button(&mut self, index: usize) -> bool {
        match self {
            TemplateContent::ButtonTemplate { buttons, .. } if index < buttons.len() => {
                buttons.remove(index);
                true
            }
            TemplateContent::QuickReplies { replies, .. } if index < replies.len() => {
                replies.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Drops buttons beyond the template's cap.
    pub(crate) fn truncate_to_cap(&mut self) {
        let cap = self.template_type().button_cap();
        match (self, cap) {
            (TemplateContent::ButtonTemplate { buttons, .. }, Some(cap)) => buttons.truncate(cap),
            (TemplateContent::QuickReplies { replies, .. }, Some(cap)) => replies.truncate(cap),
            _ => {}
        }
    }

    /// Same content re-shaped as another template type. Message text is
    /// carried between text-bearing types; buttons never are.
    pub(crate) fn convert(&self, target: TemplateType) -> TemplateContent {
        let text = self.message_text().unwrap_or_default().to_string();
        match target {
            TemplateType::Text => TemplateContent::Text { text },
            TemplateType::Image => TemplateContent::Image {
                image_url: match self {
                    TemplateContent::Image { image_url } => image_url.clone(),
                    _ => String::new(),
                },
            },
            TemplateType::ButtonTemplate => TemplateContent::ButtonTemplate {
                text,
                buttons: Vec::new(),
            },
            TemplateType::QuickReplies => TemplateContent::QuickReplies {
                text,
                replies: Vec::new(),
            },
        }
    }
}

/// Which side of the response union a draft is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    AiGenerated,
    StaticTemplate,
}

impl From<ResponseKind> for ReplyType {
    fn from(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::AiGenerated => ReplyType::AiDecision,
            ResponseKind::StaticTemplate => ReplyType::Custom,
        }
    }
}

/// How the automation answers once triggered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseSpec {
    /// Reply written by the model using `system_prompt` and the draft's model config.
    AiGenerated {
        #[serde(default)]
        system_prompt: String,
    },
    /// Fixed template sent verbatim.
    StaticTemplate { template: TemplateContent },
}

impl Default for ResponseSpec {
    fn default() -> Self {
        ResponseSpec::AiGenerated {
            system_prompt: String::new(),
        }
    }
}

impl ResponseSpec {
    pub fn kind(&self) -> ResponseKind {
        match self {
            ResponseSpec::AiGenerated { .. } => ResponseKind::AiGenerated,
            ResponseSpec::StaticTemplate { .. } => ResponseKind::StaticTemplate,
        }
    }

    pub fn template(&self) -> Option<&TemplateContent> {
        match self {
            ResponseSpec::StaticTemplate { template } => Some(template),
            ResponseSpec::AiGenerated { .. } => None,
        }
    }

    pub fn template_mut(&mut self) -> Option<&mut TemplateContent> {
        match self {
            ResponseSpec::StaticTemplate { template } => Some(template),
            ResponseSpec::AiGenerated { .. } => None,
        }
    }
}
