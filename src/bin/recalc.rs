//! Operational command: rebuild word-mood correlations from an entries dump.
//!
//! Usage: `recalc <entries.json> [user_id]`
//!
//! The dump is a JSON array of entries. Entries without a computed sentiment
//! score are re-scored first (same repair the old `fix_analysis` job did),
//! then correlations are rebuilt for the given user, or for every user in
//! the dump when no user is given.

use std::process::ExitCode;
use std::sync::Arc;

use mood_diary_analyzer::{
    correlate, Analyzer, AnalyzerConfig, Entry, Lexicon, MemoryStore, UserId,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
    mood_diary_analyzer::metrics::describe();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: recalc <entries.json> [user_id]");
        return ExitCode::from(2);
    };
    let only_user = args.next().map(UserId::new);

    match run(&path, only_user) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("recalc failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, only_user: Option<UserId>) -> anyhow::Result<()> {
    let cfg = AnalyzerConfig::load()?;
    let lexicon = Arc::new(Lexicon::load_from_dir(&cfg.lexicon_dir));
    let analyzer = Analyzer::new(lexicon, cfg.clone())?;

    let data = std::fs::read_to_string(path)?;
    let mut entries: Vec<Entry> = serde_json::from_str(&data)?;
    println!("loaded {} entries from {path}", entries.len());

    // Repair pass: entries that never got a score get one now.
    let mut repaired = 0usize;
    for entry in entries.iter_mut() {
        if entry.sentiment_score.is_none() {
            let report = analyzer.analyze(&entry.user, &entry.text, entry.user_value());
            entry.sentiment_score = Some(report.sentiment_score);
            entry.word_count = report.word_count;
            repaired += 1;
        }
    }
    if repaired > 0 {
        println!("re-scored {repaired} entries with a missing sentiment score");
    }

    let store = MemoryStore::new();
    let results = match only_user {
        Some(user) => {
            let created = correlate::recalculate(&store, &user, &entries, &cfg)?;
            vec![(user, created)]
        }
        None => correlate::recalculate_all(&store, &entries, &cfg)?,
    };

    for (user, created) in &results {
        println!("{user}: {created} correlations");
    }
    println!("recalc done ({} users)", results.len());
    Ok(())
}
