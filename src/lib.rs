// src/lib.rs
// Public library surface for integration tests (and the embedding diary app).

pub mod analyze;
pub mod config;
pub mod correlate;
pub mod extract;
pub mod lexicon;
pub mod metrics;
pub mod model;
pub mod scorer;
pub mod stats;
pub mod store;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{anon_hash, AnalysisReport, Analyzer};
pub use crate::config::AnalyzerConfig;
pub use crate::correlate::{recalculate, recalculate_all, CorrelationUpdate};
pub use crate::lexicon::Lexicon;
pub use crate::model::{Category, Correlation, Entry, Keyword, MoodLabel, UserId};
pub use crate::scorer::{ScoreBreakdown, SentimentScorer};
pub use crate::store::{CorrelationStore, MemoryStore};
