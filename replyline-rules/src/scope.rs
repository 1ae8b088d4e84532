use replyline_core::serde_utils::{int_or_zero, optional_int};
use replyline_protocol::types::{DateWindow, PostSelectionType, ReplyCountCondition};
use serde::{Deserialize, Serialize};

/// Ordered set of post identifiers. Ids are stored trimmed and never blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PostIdSet(Vec<String>);

impl PostIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`; returns whether it is now selected. A blank
    /// id is ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        match self.0.iter().position(|existing| existing == id) {
            Some(position) => {
                self.0.remove(position);
                false
            }
            None => {
                self.0.push(id.to_string());
                true
            }
        }
    }

    pub fn insert(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for PostIdSet {
    fn from(items: Vec<String>) -> Self {
        let mut set = PostIdSet::new();
        for item in items {
            set.insert(&item);
        }
        set
    }
}

impl From<PostIdSet> for Vec<String> {
    fn from(set: PostIdSet) -> Self {
        set.0
    }
}

/// Which posts an automation applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostSelection {
    All,
    Specific {
        #[serde(default)]
        ids: PostIdSet,
    },
    /// Posts published within a lookback window. `None` until one is picked.
    DateRange {
        #[serde(default)]
        window: Option<DateWindow>,
    },
}

impl Default for PostSelection {
    fn default() -> Self {
        PostSelection::All
    }
}

impl PostSelection {
    pub fn kind(&self) -> PostSelectionType {
        match self {
            PostSelection::All => PostSelectionType::All,
            PostSelection::Specific { .. } => PostSelectionType::Specific,
            PostSelection::DateRange { .. } => PostSelectionType::DateRange,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScopeSpec {
    #[serde(default)]
    pub post_selection: PostSelection,
}

/// Throttling parameters handed to the execution engine. `None` means unlimited.
///
/// Values are signed so that a negative entry reaches the validator instead
/// of being clamped on the way in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimit {
    #[serde(default, deserialize_with = "optional_int")]
    pub max_actions: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub time_period_seconds: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub user_cooldown_seconds: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub max_replies_per_post: Option<i64>,
    #[serde(default)]
    pub reply_count_condition: ReplyCountCondition,
    #[serde(
        default = "RateLimit::default_reply_count_value",
        deserialize_with = "int_or_zero"
    )]
    pub reply_count_value: i64,
}

impl RateLimit {
    /// With the default `LessThan` condition this answers only comments
    /// that have no replies yet.
    pub fn default_reply_count_value() -> i64 {
        1
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_actions: None,
            time_period_seconds: None,
            user_cooldown_seconds: None,
            max_replies_per_post: None,
            reply_count_condition: ReplyCountCondition::default(),
            reply_count_value: Self::default_reply_count_value(),
        }
    }
}

/// When a comment-to-DM automation sends its message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    Immediate,
    Delayed {
        #[serde(deserialize_with = "int_or_zero")]
        delay_seconds: i64,
    },
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Immediate
    }
}
