// src/stats.rs
//! Per-user aggregate statistics over entries and correlations. Pure
//! functions over already-loaded data; rendering is someone else's job.

use crate::model::{Correlation, Entry, Keyword, UserId};

/// Correlation magnitude that counts as a "trigger" on the -10..10 scale.
pub const TRIGGER_THRESHOLD: f32 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct UserStats {
    pub total_entries: usize,
    pub scored_entries: usize,
    pub avg_mood: f32,
    pub max_mood: f32,
    pub min_mood: f32,
    pub positive_triggers: usize,
    pub negative_triggers: usize,
    /// (word, score) of the strongest positive/negative trigger, if any.
    pub strongest_positive: Option<(String, f32)>,
    pub strongest_negative: Option<(String, f32)>,
}

pub fn user_stats(
    user: &UserId,
    entries: &[Entry],
    correlations: &[(Keyword, Correlation)],
) -> UserStats {
    let mut stats = UserStats::default();

    let scores: Vec<f32> = entries
        .iter()
        .filter(|e| &e.user == user)
        .inspect(|_| stats.total_entries += 1)
        .filter_map(|e| e.sentiment_score)
        .collect();

    stats.scored_entries = scores.len();
    if !scores.is_empty() {
        stats.avg_mood = scores.iter().sum::<f32>() / scores.len() as f32;
        stats.max_mood = scores.iter().copied().fold(f32::MIN, f32::max);
        stats.min_mood = scores.iter().copied().fold(f32::MAX, f32::min);
    }

    for (kw, row) in correlations {
        if row.score > TRIGGER_THRESHOLD {
            stats.positive_triggers += 1;
            let stronger = stats
                .strongest_positive
                .as_ref()
                .map_or(true, |(_, s)| row.score > *s);
            if stronger {
                stats.strongest_positive = Some((kw.word.clone(), row.score));
            }
        } else if row.score < -TRIGGER_THRESHOLD {
            stats.negative_triggers += 1;
            let stronger = stats
                .strongest_negative
                .as_ref()
                .map_or(true, |(_, s)| row.score < *s);
            if stronger {
                stats.strongest_negative = Some((kw.word.clone(), row.score));
            }
        }
    }

    stats
}
