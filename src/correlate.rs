// src/correlate.rs
//! # Correlation Updater
//!
//! Maintains the per-(user, word) running association between a word's
//! presence and the user's sentiment scores.
//!
//! The incremental rule is a weighted mean by occurrence counts:
//!
//! ```text
//! total = old_count + increment
//! score = old_score * old_count/total + new_score * increment/total
//! ```
//!
//! which is exactly the batch weighted mean of all historical observations —
//! associative and order-independent as long as this is the only formula in
//! use. The full-recalculation path rebuilds a user's rows from their entry
//! history and reduces to the same mean, so the two paths agree.

use anyhow::Result;
use chrono::Utc;
use metrics::counter;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::AnalyzerConfig;
use crate::extract::keyword_counts;
use crate::lexicon::category_for_word;
use crate::metrics::{CORRELATION_RETRIES, CORRELATION_SKIPS, RECALCULATIONS};
use crate::model::{Category, Correlation, Entry, UserId};
use crate::store::CorrelationStore;

/// One pending correlation write produced by analyzing a single entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationUpdate {
    pub word: String,
    pub category: Category,
    /// The entry's sentiment score at the time of analysis.
    pub score: f32,
    /// Occurrences of the word within that one entry.
    pub increment: u32,
}

/// Merge one observation into an optional prior row.
/// New rows start at the observed score with `occurrences = increment`.
pub fn weighted_row(
    old: Option<&Correlation>,
    score: f32,
    increment: u32,
    bound: f32,
) -> Correlation {
    let increment = increment.max(1);
    match old {
        None => Correlation {
            score: score.clamp(-bound, bound),
            occurrences: increment,
            last_updated: Utc::now(),
        },
        Some(prev) => {
            let total = prev.occurrences + increment;
            let old_weight = prev.occurrences as f32 / total as f32;
            let new_weight = increment as f32 / total as f32;
            let merged = prev.score * old_weight + score * new_weight;
            Correlation {
                score: merged.clamp(-bound, bound),
                occurrences: total,
                last_updated: Utc::now(),
            }
        }
    }
}

/// Apply one update through the store, retrying once on a write error.
/// A persistently failing word is skipped and logged; it never aborts the
/// entry save that produced it.
pub fn apply_update(
    store: &dyn CorrelationStore,
    user: &UserId,
    update: &CorrelationUpdate,
    bound: f32,
) -> Option<Correlation> {
    for attempt in 0..2u8 {
        let result = store.update_row(user, &update.word, update.category, &|old| {
            weighted_row(old, update.score, update.increment, bound)
        });
        match result {
            Ok(row) => return Some(row),
            Err(e) if attempt == 0 => {
                counter!(CORRELATION_RETRIES).increment(1);
                warn!(user = %user, word = %update.word, error = %e, "correlation update failed, retrying");
            }
            Err(e) => {
                counter!(CORRELATION_SKIPS).increment(1);
                warn!(user = %user, word = %update.word, error = %e, "correlation update skipped after retry");
            }
        }
    }
    None
}

/// Full rebuild of one user's correlations from their entry history.
///
/// No-op (returns 0, deletes nothing) unless the user has at least
/// `recalc.min_entries` entries with a computed sentiment score. Each word is
/// counted once per entry; only words appearing in at least
/// `recalc.min_entry_occurrences` distinct entries get a row, with
/// score = arithmetic mean of those entries' scores and
/// occurrences = number of entries. Idempotent for an unchanged history.
pub fn recalculate(
    store: &dyn CorrelationStore,
    user: &UserId,
    entries: &[Entry],
    cfg: &AnalyzerConfig,
) -> Result<usize> {
    let scored: Vec<&Entry> = entries
        .iter()
        .filter(|e| &e.user == user && e.sentiment_score.is_some())
        .collect();

    if scored.len() < cfg.recalc.min_entries {
        info!(user = %user, entries = scored.len(), "recalculation skipped, not enough scored entries");
        return Ok(0);
    }

    // word → per-entry scores (one sample per entry, however often the word repeats inside)
    let mut word_scores: HashMap<String, Vec<f32>> = HashMap::new();
    for entry in &scored {
        let score = entry.sentiment_score.unwrap_or(0.0);
        for word in keyword_counts(&entry.text, &cfg.tokens).into_keys() {
            word_scores.entry(word).or_default().push(score);
        }
    }

    let deleted = store.delete_user(user)?;

    let mut created = 0usize;
    for (word, scores) in word_scores {
        if scores.len() < cfg.recalc.min_entry_occurrences {
            continue;
        }
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        let row = Correlation {
            score: cfg.clamp_score(mean),
            occurrences: scores.len() as u32,
            last_updated: Utc::now(),
        };
        store.insert_row(user, &word, category_for_word(&word), row)?;
        created += 1;
    }

    counter!(RECALCULATIONS).increment(1);
    info!(user = %user, deleted, created, "correlations rebuilt");
    Ok(created)
}

/// Rebuild every user found in `entries`; returns per-user created counts.
pub fn recalculate_all(
    store: &dyn CorrelationStore,
    entries: &[Entry],
    cfg: &AnalyzerConfig,
) -> Result<Vec<(UserId, usize)>> {
    let mut users: Vec<UserId> = entries.iter().map(|e| e.user.clone()).collect();
    users.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    users.dedup();

    let mut out = Vec::with_capacity(users.len());
    for user in users {
        let created = recalculate(store, &user, entries, cfg)?;
        out.push((user, created));
    }
    Ok(out)
}
