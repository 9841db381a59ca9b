// src/analyze.rs
//! # Analysis pipeline
//!
//! The explicit save-path call: score the text, count words, derive the
//! correlation updates, and (optionally) write them through the store. This
//! replaces the original's hidden post-save hook — the entry-creation use
//! case calls `analyze_and_store` directly, so the data flow is visible.
//!
//! Diary text is private. Log lines never carry the raw text, only a short
//! SHA-256 digest of it.

use anyhow::Result;
use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AnalyzerConfig;
use crate::correlate::{apply_update, CorrelationUpdate};
use crate::extract::keyword_counts;
use crate::lexicon::{category_for_word, Lexicon};
use crate::metrics::{ENTRIES_ANALYZED, SCORING_FALLBACKS};
use crate::model::{count_words, Entry, UserId};
use crate::scorer::SentimentScorer;
use crate::store::CorrelationStore;

// Dev logging gate: DIARY_DEV_LOG=1 AND a debug build.
pub(crate) fn dev_logging_enabled() -> bool {
    std::env::var("DIARY_DEV_LOG").ok().as_deref() == Some("1") && cfg!(debug_assertions)
}

/// Short anonymized id for a text: first 6 bytes of its SHA-256, hex.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// What the core hands back per entry save.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub sentiment_score: f32,
    pub word_count: usize,
    pub updates: Vec<CorrelationUpdate>,
}

/// The assembled pipeline. Construct once at startup with an explicit lexicon
/// and config (dependency injection; tests substitute their own lexicon).
#[derive(Debug)]
pub struct Analyzer {
    scorer: SentimentScorer,
    cfg: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(lexicon: Arc<Lexicon>, cfg: AnalyzerConfig) -> Result<Self> {
        let scorer = SentimentScorer::new(lexicon, cfg.clone())?;
        Ok(Self { scorer, cfg })
    }

    /// Convenience: config from env/defaults, lexicon from the configured dir.
    pub fn from_env() -> Result<Self> {
        let cfg = AnalyzerConfig::load()?;
        let lexicon = Arc::new(Lexicon::load_from_dir(&cfg.lexicon_dir));
        Self::new(lexicon, cfg)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.cfg
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    /// Pure analysis: `(user, text, optional user value)` → report.
    /// Empty or trivial input yields a neutral (or user-blended) score and an
    /// empty update set rather than an error.
    pub fn analyze(&self, user: &UserId, text: &str, user_value: Option<f32>) -> AnalysisReport {
        counter!(ENTRIES_ANALYZED).increment(1);

        let sentiment_score = self.scorer.score(text, user_value);
        let word_count = count_words(text);

        let updates: Vec<CorrelationUpdate> = keyword_counts(text, &self.cfg.tokens)
            .into_iter()
            .map(|(word, occurrences)| CorrelationUpdate {
                category: category_for_word(&word),
                word,
                score: sentiment_score,
                increment: occurrences,
            })
            .collect();

        if dev_logging_enabled() {
            info!(
                target: "analysis",
                user = %user,
                id = %anon_hash(text),
                score = sentiment_score,
                words = word_count,
                keywords = updates.len(),
                "entry analyzed"
            );
        }

        AnalysisReport {
            sentiment_score,
            word_count,
            updates,
        }
    }

    /// The save path: analyze the entry, stamp its score and word count, and
    /// push every correlation update through the store. Store failures are
    /// retried once and then skipped per word — the entry itself always keeps
    /// its score, and the save never observes an error from here.
    pub fn analyze_and_store(&self, store: &dyn CorrelationStore, entry: &mut Entry) -> AnalysisReport {
        let report = self.analyze(&entry.user, &entry.text, entry.user_value());

        entry.sentiment_score = Some(report.sentiment_score);
        entry.word_count = report.word_count;

        let mut applied = 0usize;
        for update in &report.updates {
            if apply_update(store, &entry.user, update, self.cfg.scale).is_some() {
                applied += 1;
            }
        }
        if applied < report.updates.len() {
            warn!(
                user = %entry.user,
                id = %anon_hash(&entry.text),
                skipped = report.updates.len() - applied,
                "some correlation updates were skipped"
            );
        }

        report
    }

    /// Degraded result when analysis itself is unavailable: the user's own
    /// value if present, neutral otherwise. The caller still saves the entry.
    pub fn fallback_score(&self, user_value: Option<f32>) -> f32 {
        counter!(SCORING_FALLBACKS).increment(1);
        self.cfg.clamp_score(user_value.unwrap_or(0.0))
    }
}
