// src/text.rs
//! # Tokenizer / Normalizer
//!
//! Russian-oriented text preparation shared by the scorer and the keyword
//! extractor: lowercasing, `ё`→`е` unification, punctuation/digit collapsing,
//! Cyrillic word extraction within a length window, stop-words and a
//! lightweight suffix stemmer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Cyrillic words, for the extraction path (punctuation is a separator).
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[а-яё]+").expect("word regex"));

/// Words plus punctuation runs, for the scorer (it wants `!!`/`...` signals too).
static SCORER_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[а-яё]+|[!?.,;:]+").expect("scorer token regex"));

/// General stop-words dropped by every tokenization path.
pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "это", "вот", "какой", "который", "сегодня", "завтра", "вчера",
        "просто", "можно", "нужно", "будет", "есть", "был", "была",
        "было", "были", "весь", "все", "всего", "всем", "сам", "сама",
        "само", "сами", "раз", "два", "три", "год", "года", "лет",
        "как", "так", "там", "здесь", "тут", "где", "куда", "откуда",
        "почему", "зачем", "сколько", "когда", "что", "чтобы", "если",
    ]
    .into_iter()
    .collect()
});

/// Extra stop-words for keyword extraction: frequent nouns that carry no
/// personal signal, plus meta-vocabulary about the diary system itself.
pub static EXTRA_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "очень", "всего", "всем", "четыре", "пять", "время", "человек",
        "люди", "жизнь", "слово", "дела", "руки", "глаза", "вода",
        "земля", "небо", "солнце", "звезда", "воздух",
        // diary meta-vocabulary
        "запись", "записи", "дневник", "анализ", "настроение", "система",
        "данные", "пользователь", "сервис", "модель", "программа", "тест",
        // vague fillers
        "может", "хотя", "потому", "такой", "такие", "такая", "такое",
        "каждая", "каждое", "каждый",
    ]
    .into_iter()
    .collect()
});

/// Lowercase, unify `ё` to `е`, collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('ё', "е");
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokens for the scorer: Cyrillic words and punctuation runs, in order,
/// no filtering. The scorer applies its own stop-word/modifier rules because
/// negations like `не` must survive filters that would otherwise drop them.
pub fn scorer_tokens(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    SCORER_TOKEN_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Cyrillic word tokens within the `[min_len, max_len]` char window, stop-words
/// removed, order preserved. Punctuation and digits act as separators.
pub fn word_tokens(text: &str, min_len: usize, max_len: usize) -> Vec<String> {
    let normalized = normalize(text);
    WORD_RE
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|w| {
            let n = w.chars().count();
            n >= min_len && n <= max_len && !STOPWORDS.contains(w)
        })
        .map(|w| w.to_string())
        .collect()
}

/// Common adjective/noun endings, checked in this order (first match wins).
const STEM_ENDINGS: &[&str] = &[
    "ый", "ий", "ой", "ая", "яя", "ое", "ее", "ые", "ие",
    "ость", "ация", "ение", "анье", "ство", "изм",
    "нно", "енно", "ально",
];

/// Strip one common suffix from words of 4+ chars; shorter words pass through.
pub fn stem(word: &str) -> &str {
    if word.chars().count() < 4 {
        return word;
    }
    for ending in STEM_ENDINGS {
        if let Some(prefix) = word.strip_suffix(ending) {
            if !prefix.is_empty() {
                return prefix;
            }
        }
    }
    word
}
