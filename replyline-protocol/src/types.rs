use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of automation, which selects the payload shape and endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutomationKind {
    CommentReply,
    DmKeywordReply,
    CommentToDm,
}

impl AutomationKind {
    /// Path segment used by the automation API for this kind.
    pub fn path_segment(&self) -> &'static str {
        match self {
            AutomationKind::CommentReply => "comment-reply",
            AutomationKind::DmKeywordReply => "dm-keyword-reply",
            AutomationKind::CommentToDm => "comment-to-dm",
        }
    }

    /// Whether rules of this kind are scoped to a set of posts.
    pub fn targets_posts(&self) -> bool {
        !matches!(self, AutomationKind::DmKeywordReply)
    }
}

impl fmt::Display for AutomationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    Keyword,
    AiDecision,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyType {
    AiDecision,
    Custom,
}

/// String-matching mode applied to trigger keywords.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Contains,
    Exact,
    StartsWith,
}

impl Default for MatchType {
    fn default() -> Self {
        MatchType::Contains
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostSelectionType {
    All,
    Specific,
    DateRange,
}

/// Fixed lookback windows offered for date-range post selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateWindow {
    OneDay,
    TwoDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
    OneYear,
}

impl DateWindow {
    pub const ALL: [DateWindow; 6] = [
        DateWindow::OneDay,
        DateWindow::TwoDays,
        DateWindow::OneWeek,
        DateWindow::TwoWeeks,
        DateWindow::OneMonth,
        DateWindow::OneYear,
    ];

    const DAY: u64 = 24 * 60 * 60;

    /// Length of the window in seconds. A month is 30 days, a year 365.
    pub fn lookback_secs(&self) -> u64 {
        match self {
            DateWindow::OneDay => Self::DAY,
            DateWindow::TwoDays => 2 * Self::DAY,
            DateWindow::OneWeek => 7 * Self::DAY,
            DateWindow::TwoWeeks => 14 * Self::DAY,
            DateWindow::OneMonth => 30 * Self::DAY,
            DateWindow::OneYear => 365 * Self::DAY,
        }
    }
}

/// Precondition on the number of replies a post already has.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyCountCondition {
    LessThan,
    Equals,
    GreaterThan,
}

impl Default for ReplyCountCondition {
    fn default() -> Self {
        ReplyCountCondition::LessThan
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelUsage {
    PlatformDefault,
    Custom,
}

impl Default for ModelUsage {
    fn default() -> Self {
        ModelUsage::PlatformDefault
    }
}

/// Static reply template flavours understood by the messaging platforms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    Text,
    Image,
    ButtonTemplate,
    QuickReplies,
}

impl TemplateType {
    /// Upper bound on buttons for button-bearing templates.
    pub fn button_cap(&self) -> Option<usize> {
        match self {
            TemplateType::ButtonTemplate => Some(3),
            TemplateType::QuickReplies => Some(13),
            TemplateType::Text | TemplateType::Image => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    Immediate,
    Delayed,
}

/// Run state of a deployed automation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    Active,
    Paused,
    Inactive,
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivationStatus::Active => "active",
            ActivationStatus::Paused => "paused",
            ActivationStatus::Inactive => "inactive",
        };
        f.write_str(label)
    }
}

/// Execution quality signal computed by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl Default for HealthStatus {
    fn default() -> Self {
        HealthStatus::Healthy
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        };
        f.write_str(label)
    }
}
