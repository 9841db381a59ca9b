// src/extract.rs
//! # Keyword Extractor
//!
//! Pulls the meaningful words out of an entry for correlation bookkeeping.
//! Stricter than the scorer path: the extended stop-word set applies (general
//! stop-words plus diary meta-vocabulary), words must reach the minimum
//! meaningful length, and infinitive verb forms are skipped. Frequency
//! thresholds across entries are the correlation stage's business, not ours —
//! extraction returns every qualifying occurrence.

use std::collections::HashMap;

use crate::config::TokenConfig;
use crate::text::{word_tokens, EXTRA_STOPWORDS};

/// All qualifying word occurrences, in order (duplicates included).
pub fn extract_keywords(text: &str, cfg: &TokenConfig) -> Vec<String> {
    word_tokens(text, cfg.min_len, cfg.max_len)
        .into_iter()
        .filter(|w| is_meaningful(w, cfg))
        .collect()
}

/// Per-entry frequency map: word → occurrences within this one text.
pub fn keyword_counts(text: &str, cfg: &TokenConfig) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for word in extract_keywords(text, cfg) {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

fn is_meaningful(word: &str, cfg: &TokenConfig) -> bool {
    if EXTRA_STOPWORDS.contains(word) {
        return false;
    }
    if word.chars().count() < cfg.min_meaningful_len {
        return false;
    }
    // Infinitives say what the writer does, not what the day was about.
    if word.ends_with("ться") || word.ends_with("тся") {
        return false;
    }
    true
}
