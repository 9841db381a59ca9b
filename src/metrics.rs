// src/metrics.rs
//! Counter names for the analysis pipeline. The crate only uses the
//! `metrics` facade; the embedding application decides whether to install a
//! recorder (without one, the macros are no-ops).

use metrics::describe_counter;

pub const ENTRIES_ANALYZED: &str = "diary_entries_analyzed_total";
pub const SCORING_FALLBACKS: &str = "diary_scoring_fallbacks_total";
pub const CORRELATION_RETRIES: &str = "diary_correlation_retries_total";
pub const CORRELATION_SKIPS: &str = "diary_correlation_skips_total";
pub const RECALCULATIONS: &str = "diary_recalculations_total";

/// Register help texts with the installed recorder. Optional; safe to call
/// more than once.
pub fn describe() {
    describe_counter!(ENTRIES_ANALYZED, "Diary entries run through analysis");
    describe_counter!(SCORING_FALLBACKS, "Entries that degraded to the fallback score");
    describe_counter!(
        CORRELATION_RETRIES,
        "Correlation row updates retried after a store error"
    );
    describe_counter!(CORRELATION_SKIPS, "Correlation row updates dropped after retry");
    describe_counter!(RECALCULATIONS, "Full per-user correlation rebuilds");
}
