//! End-to-end correlation flows: incremental convergence, the weighted-mean
//! property, recalculation thresholds and idempotence, and the save-path
//! resilience guarantees (store failures never abort the save).

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use mood_diary_analyzer::correlate::{self, apply_update, weighted_row, CorrelationUpdate};
use mood_diary_analyzer::store::RowUpdate;
use mood_diary_analyzer::{
    Analyzer, AnalyzerConfig, Category, Correlation, CorrelationStore, Entry, Keyword,
    Lexicon, MemoryStore, UserId,
};

fn analyzer() -> Analyzer {
    Analyzer::new(Arc::new(Lexicon::default_seed()), AnalyzerConfig::default()).expect("analyzer")
}

fn entry_with_score(id: u64, user: &str, text: &str, score: f32) -> Entry {
    let mut e = Entry::new(id, UserId::from(user), text, None);
    e.sentiment_score = Some(score);
    e
}

#[test]
fn repeated_identical_updates_converge() {
    let store = MemoryStore::new();
    let user = UserId::from("u");
    let update = CorrelationUpdate {
        word: "спорт".into(),
        category: Category::Sport,
        score: 6.5,
        increment: 1,
    };

    let mut last = None;
    for _ in 0..25 {
        last = apply_update(&store, &user, &update, 10.0);
    }
    let row = last.expect("row written");
    assert!((row.score - 6.5).abs() < 1e-4);
    assert_eq!(row.occurrences, 25);
}

#[test]
fn weighted_mean_property_holds() {
    // (2, w=1) then (8, w=1) => 5.0 with count 2
    let first = weighted_row(None, 2.0, 1, 10.0);
    let second = weighted_row(Some(&first), 8.0, 1, 10.0);
    assert!((second.score - 5.0).abs() < 1e-6);
    assert_eq!(second.occurrences, 2);

    // general sequence matches the batch weighted mean
    let seq = [(3.0f32, 2u32), (-1.0, 1), (7.5, 4), (0.0, 3)];
    let folded = seq
        .iter()
        .fold(None::<Correlation>, |acc, (s, w)| {
            Some(weighted_row(acc.as_ref(), *s, *w, 10.0))
        })
        .unwrap();
    let batch =
        seq.iter().map(|(s, w)| s * *w as f32).sum::<f32>() / seq.iter().map(|(_, w)| w).sum::<u32>() as f32;
    assert!((folded.score - batch).abs() < 1e-5);
}

#[test]
fn recalc_requires_minimum_entries() {
    let cfg = AnalyzerConfig::default();
    let store = MemoryStore::new();
    let user = UserId::from("u");
    let entries = vec![
        entry_with_score(1, "u", "сегодня работа", 4.0),
        entry_with_score(2, "u", "опять работа", 6.0),
    ];
    // only 2 scored entries: below the minimum of 3, nothing happens
    let created = correlate::recalculate(&store, &user, &entries, &cfg).unwrap();
    assert_eq!(created, 0);
    assert!(store.rows_for_user(&user).unwrap().is_empty());
}

#[test]
fn recalc_single_entry_word_gets_no_row() {
    let cfg = AnalyzerConfig::default();
    let store = MemoryStore::new();
    let user = UserId::from("u");
    // "работа" appears in one entry only; the filler words appear in all three
    let entries = vec![
        entry_with_score(1, "u", "тяжелая работа сегодня вечером", 4.0),
        entry_with_score(2, "u", "спокойный вечер прогулка", 2.0),
        entry_with_score(3, "u", "длинная прогулка вечером", 5.0),
    ];
    let _ = correlate::recalculate(&store, &user, &entries, &cfg).unwrap();
    let rows = store.rows_for_user(&user).unwrap();
    assert!(
        !rows.iter().any(|(k, _)| k.word == "работа"),
        "a word seen in a single entry must not get a correlation"
    );
}

#[test]
fn recalc_mean_and_count_for_recurring_word() {
    let cfg = AnalyzerConfig::default();
    let store = MemoryStore::new();
    let user = UserId::from("u");
    let entries = vec![
        // "работа" twice within the first entry still counts once per entry
        entry_with_score(1, "u", "работа работа допоздна", 4.0),
        entry_with_score(2, "u", "работа закончилась рано", 6.0),
        entry_with_score(3, "u", "выходной прошел тихо", 9.0),
    ];
    let created = correlate::recalculate(&store, &user, &entries, &cfg).unwrap();
    assert!(created >= 1);

    let rows = store.rows_for_user(&user).unwrap();
    let (kw, row) = rows
        .iter()
        .find(|(k, _)| k.word == "работа")
        .expect("работа correlated");
    assert_eq!(kw.category, Category::Work);
    assert!((row.score - 5.0).abs() < 1e-6, "mean of 4.0 and 6.0");
    assert_eq!(row.occurrences, 2);
}

#[test]
fn recalc_is_idempotent() {
    let cfg = AnalyzerConfig::default();
    let store = MemoryStore::new();
    let user = UserId::from("u");
    let entries = vec![
        entry_with_score(1, "u", "утром тренировка и кофе", 7.0),
        entry_with_score(2, "u", "тренировка была тяжелой", -2.0),
        entry_with_score(3, "u", "кофе утром спасает", 3.0),
    ];

    let snapshot = |store: &MemoryStore| -> BTreeSet<(String, String, u32)> {
        store
            .rows_for_user(&user)
            .unwrap()
            .into_iter()
            .map(|(k, r)| (k.word, format!("{:.4}", r.score), r.occurrences))
            .collect()
    };

    let first = correlate::recalculate(&store, &user, &entries, &cfg).unwrap();
    let after_first = snapshot(&store);
    let second = correlate::recalculate(&store, &user, &entries, &cfg).unwrap();
    let after_second = snapshot(&store);

    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
}

#[test]
fn incremental_and_recalc_agree_for_shared_words() {
    // The two paths use the same mean, so a word observed once per entry ends
    // up identical either way.
    let cfg = AnalyzerConfig::default();
    let user = UserId::from("u");
    let entries = vec![
        entry_with_score(1, "u", "прогулка вечером", 2.0),
        entry_with_score(2, "u", "прогулка днем", 8.0),
        entry_with_score(3, "u", "день без прогулки дома", 5.0),
    ];

    let incremental = MemoryStore::new();
    for e in &entries {
        // one update per entry, increment 1 (the word appears once per text)
        let update = CorrelationUpdate {
            word: "прогулка".into(),
            category: Category::Rest,
            score: e.sentiment_score.unwrap(),
            increment: 1,
        };
        if e.text.contains("прогулка") {
            apply_update(&incremental, &user, &update, cfg.scale);
        }
    }

    let rebuilt = MemoryStore::new();
    correlate::recalculate(&rebuilt, &user, &entries, &cfg).unwrap();

    let inc_row = incremental
        .rows_for_user(&user)
        .unwrap()
        .into_iter()
        .find(|(k, _)| k.word == "прогулка")
        .map(|(_, r)| r)
        .expect("incremental row");
    let reb_row = rebuilt
        .rows_for_user(&user)
        .unwrap()
        .into_iter()
        .find(|(k, _)| k.word == "прогулка")
        .map(|(_, r)| r)
        .expect("rebuilt row");

    assert!((inc_row.score - reb_row.score).abs() < 1e-5);
    assert_eq!(inc_row.occurrences, reb_row.occurrences);
}

#[test]
fn end_to_end_rabota_scenario() {
    let cfg = AnalyzerConfig::default();
    let store = MemoryStore::new();
    let user = UserId::from("u");

    // One qualifying entry mentioning "работа": below the per-word threshold.
    let mut entries = vec![
        entry_with_score(1, "u", "сложная работа допоздна", 4.0),
        entry_with_score(2, "u", "тихий вечер дома на диване", 1.0),
        entry_with_score(3, "u", "прогулка в парке помогла", 7.0),
    ];
    correlate::recalculate(&store, &user, &entries, &cfg).unwrap();
    assert!(
        !store
            .rows_for_user(&user)
            .unwrap()
            .iter()
            .any(|(k, _)| k.word == "работа"),
        "single mention must not create a correlation"
    );

    // A second entry with "работа" crosses the threshold.
    entries.push(entry_with_score(4, "u", "работа прошла спокойно", 6.0));
    correlate::recalculate(&store, &user, &entries, &cfg).unwrap();

    let rows = store.rows_for_user(&user).unwrap();
    let matched: Vec<&(Keyword, Correlation)> =
        rows.iter().filter(|(k, _)| k.word == "работа").collect();
    assert_eq!(matched.len(), 1, "exactly one row per (user, keyword)");
    let (_, row) = matched[0];
    assert!((row.score - 5.0).abs() < 1e-6, "mean of 4.0 and 6.0");
    assert_eq!(row.occurrences, 2);
}

// --- store-failure resilience -------------------------------------------

/// Store that fails the first N row updates, then delegates to a MemoryStore.
struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicU32,
}

impl FlakyStore {
    fn failing(n: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_left: AtomicU32::new(n),
        }
    }

    fn should_fail(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl CorrelationStore for FlakyStore {
    fn update_row(
        &self,
        user: &UserId,
        word: &str,
        category: Category,
        f: RowUpdate<'_>,
    ) -> Result<Correlation> {
        if self.should_fail() {
            anyhow::bail!("simulated write conflict");
        }
        self.inner.update_row(user, word, category, f)
    }

    fn insert_row(
        &self,
        user: &UserId,
        word: &str,
        category: Category,
        row: Correlation,
    ) -> Result<()> {
        self.inner.insert_row(user, word, category, row)
    }

    fn delete_user(&self, user: &UserId) -> Result<usize> {
        self.inner.delete_user(user)
    }

    fn rows_for_user(&self, user: &UserId) -> Result<Vec<(Keyword, Correlation)>> {
        self.inner.rows_for_user(user)
    }

    fn keyword(&self, word: &str) -> Result<Option<Keyword>> {
        self.inner.keyword(word)
    }
}

#[test]
fn transient_write_conflict_is_retried() {
    let store = FlakyStore::failing(1);
    let user = UserId::from("u");
    let update = CorrelationUpdate {
        word: "работа".into(),
        category: Category::Work,
        score: 4.0,
        increment: 1,
    };
    let row = apply_update(&store, &user, &update, 10.0);
    assert!(row.is_some(), "one failure must be absorbed by the retry");
}

#[test]
fn persistent_failure_never_aborts_the_save() {
    let a = analyzer();
    let store = FlakyStore::failing(u32::MAX);
    let mut entry = Entry::new(1, UserId::from("u"), "отличная прогулка сегодня", None);

    // Every correlation write fails, but the entry still gets its score.
    let report = a.analyze_and_store(&store, &mut entry);
    assert!(entry.sentiment_score.is_some());
    assert_eq!(entry.sentiment_score, Some(report.sentiment_score));
    assert!(store.inner.rows_for_user(&entry.user).unwrap().is_empty());
}
