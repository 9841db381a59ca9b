// src/model.rs
//! Core data types: entries, keywords, correlations and the discrete mood labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identity. The core never inspects it; it only keys correlations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Discrete self-reported mood, each mapped to a fixed value on the -10..10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Excellent,
    Good,
    Neutral,
    Bad,
    Terrible,
}

impl MoodLabel {
    pub fn value(self) -> f32 {
        match self {
            MoodLabel::Excellent => 10.0,
            MoodLabel::Good => 5.0,
            MoodLabel::Neutral => 0.0,
            MoodLabel::Bad => -5.0,
            MoodLabel::Terrible => -10.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodLabel::Excellent => "excellent",
            MoodLabel::Good => "good",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Bad => "bad",
            MoodLabel::Terrible => "terrible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(MoodLabel::Excellent),
            "good" => Some(MoodLabel::Good),
            "neutral" => Some(MoodLabel::Neutral),
            "bad" => Some(MoodLabel::Bad),
            "terrible" => Some(MoodLabel::Terrible),
            _ => None,
        }
    }
}

/// Coarse life-domain tag assigned to a keyword for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    Family,
    Friends,
    Health,
    Hobby,
    Finance,
    Rest,
    Sport,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Family => "family",
            Category::Friends => "friends",
            Category::Health => "health",
            Category::Hobby => "hobby",
            Category::Finance => "finance",
            Category::Rest => "rest",
            Category::Sport => "sport",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

/// A diary entry. Text is immutable after analysis; only the analysis step
/// fills `sentiment_score`/`word_count` (an explicit edit re-runs analysis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub user: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub mood_label: Option<MoodLabel>,
    /// Numeric value derived from the label at save time (user may override).
    #[serde(default)]
    pub user_mood_value: Option<f32>,
    /// None until analysis has succeeded.
    #[serde(default)]
    pub sentiment_score: Option<f32>,
    #[serde(default)]
    pub word_count: usize,
}

impl Entry {
    pub fn new(id: u64, user: UserId, text: impl Into<String>, mood_label: Option<MoodLabel>) -> Self {
        let text = text.into();
        Self {
            id,
            user,
            user_mood_value: mood_label.map(MoodLabel::value),
            mood_label,
            created_at: Utc::now(),
            sentiment_score: None,
            word_count: count_words(&text),
            text,
        }
    }

    /// The user's numeric mood for blending: explicit value first, else the label.
    pub fn user_value(&self) -> Option<f32> {
        self.user_mood_value.or_else(|| self.mood_label.map(MoodLabel::value))
    }
}

/// Whitespace-token count; this is what `Entry::word_count` holds at save time.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A normalized word with its life-domain category. Identity is the word itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub category: Category,
}

/// Running word-mood association for one (user, keyword) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Bounded to the configured scale, same range as sentiment scores.
    pub score: f32,
    /// Weighted increments contributed so far; >= 1 for any stored row.
    pub occurrences: u32,
    pub last_updated: DateTime<Utc>,
}

impl Correlation {
    /// Coarse strength label on the -10..10 scale, for reporting.
    pub fn strength_label(&self) -> &'static str {
        if self.score > 3.0 {
            "strong positive"
        } else if self.score > 1.0 {
            "positive"
        } else if self.score < -3.0 {
            "strong negative"
        } else if self.score < -1.0 {
            "negative"
        } else {
            "neutral"
        }
    }
}

/// Human-readable verdict bands for a sentiment score on the -10..10 scale.
pub fn describe_score(score: f32) -> &'static str {
    if score > 7.0 {
        "very positive"
    } else if score > 3.0 {
        "positive"
    } else if score > 1.0 {
        "slightly positive"
    } else if score > -1.0 {
        "neutral"
    } else if score > -3.0 {
        "slightly negative"
    } else if score > -7.0 {
        "negative"
    } else {
        "very negative"
    }
}
