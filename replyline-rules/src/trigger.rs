use std::sync::OnceLock;

use regex::Regex;
use replyline_protocol::types::{MatchType, TriggerType};
use serde::{Deserialize, Serialize};

/// Ordered, de-duplicated set of trigger keywords.
///
/// Keywords never contain commas so that the comma-joined wire form always
/// splits back into the same set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every comma separated keyword in `input`, returning how many were new.
    pub fn insert_text(&mut self, input: &str) -> usize {
        let mut added = 0;
        for candidate in input.split(',') {
            let keyword = candidate.trim();
            if keyword.is_empty() || self.contains(keyword) {
                continue;
            }
            self.0.push(keyword.to_string());
            added += 1;
        }
        added
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != keyword.trim());
        before != self.0.len()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.iter().any(|existing| existing == keyword)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-joined wire form, e.g. `discount,price`.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(items: Vec<String>) -> Self {
        let mut set = KeywordSet::new();
        for item in items {
            set.insert_text(&item);
        }
        set
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.0
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for item in iter {
            set.insert_text(item);
        }
        set
    }
}

/// Condition under which an automation fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerSpec {
    /// Literal keyword matching against the comment or message text.
    Keyword {
        #[serde(default)]
        keywords: KeywordSet,
        #[serde(default)]
        match_type: MatchType,
    },
    /// An external classifier decides using a free-text description.
    AiDecision {
        #[serde(default)]
        context: String,
    },
}

impl Default for TriggerSpec {
    fn default() -> Self {
        TriggerSpec::Keyword {
            keywords: KeywordSet::new(),
            match_type: MatchType::default(),
        }
    }
}

impl TriggerSpec {
    pub fn kind(&self) -> TriggerType {
        match self {
            TriggerSpec::Keyword { .. } => TriggerType::Keyword,
            TriggerSpec::AiDecision { .. } => TriggerType::AiDecision,
        }
    }
}

/// Human-readable AI context seeded from a keyword list.
pub(crate) fn context_from_keywords(keywords: &KeywordSet) -> String {
    format!(
        "Reply when a comment contains keywords like {}",
        keywords.as_slice().join(", ")
    )
}

/// Single-keyword set built from the first word of an AI context.
pub(crate) fn keywords_from_context(context: &str) -> KeywordSet {
    static WORD: OnceLock<Option<Regex>> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'_-]*").ok());

    let first = match word {
        Some(pattern) => pattern
            .find(context)
            .map(|found| found.as_str().to_string()),
        None => context.split_whitespace().next().map(str::to_string),
    };

    first
        .map(|token| KeywordSet::from(vec![token]))
        .unwrap_or_default()
}
