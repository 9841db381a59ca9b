// src/lexicon.rs
//! # Lexicon Store
//!
//! Word lists driving the scorer (positive, negative, intensifiers, negations)
//! plus the fixed category→keywords table used to tag newly-seen words.
//!
//! - Loads each list from a plain-text file: one word per line, UTF-8,
//!   blank lines and lines starting with `#` ignored.
//! - A missing or unreadable file falls back to the built-in seed for that
//!   list — loading never fails and never yields an empty known list.
//! - Constructed once at startup and shared read-only (`Arc<Lexicon>`);
//!   there is deliberately no global mutable instance.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::model::Category;

/// The four wordlists the scorer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wordlist {
    Positive,
    Negative,
    Intensifiers,
    Negations,
}

impl Wordlist {
    pub fn file_name(self) -> &'static str {
        match self {
            Wordlist::Positive => "positive_ru.txt",
            Wordlist::Negative => "negative_ru.txt",
            Wordlist::Intensifiers => "intensifiers_ru.txt",
            Wordlist::Negations => "negations_ru.txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Wordlist::Positive => "positive",
            Wordlist::Negative => "negative",
            Wordlist::Intensifiers => "intensifiers",
            Wordlist::Negations => "negations",
        }
    }
}

/// Immutable word lists, loaded once and shared across the pipeline.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
    pub intensifiers: HashSet<String>,
    pub negations: HashSet<String>,
}

impl Lexicon {
    /// Load all four lists from `dir`, seeding any list whose file is absent.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            positive: load_list(dir, Wordlist::Positive),
            negative: load_list(dir, Wordlist::Negative),
            intensifiers: load_list(dir, Wordlist::Intensifiers),
            negations: load_list(dir, Wordlist::Negations),
        }
    }

    /// Built-in seed used when no external lists are available (tests, first run).
    pub fn default_seed() -> Self {
        Self {
            positive: default_words(Wordlist::Positive),
            negative: default_words(Wordlist::Negative),
            intensifiers: default_words(Wordlist::Intensifiers),
            negations: default_words(Wordlist::Negations),
        }
    }

    pub fn list(&self, kind: Wordlist) -> &HashSet<String> {
        match kind {
            Wordlist::Positive => &self.positive,
            Wordlist::Negative => &self.negative,
            Wordlist::Intensifiers => &self.intensifiers,
            Wordlist::Negations => &self.negations,
        }
    }
}

fn load_list(dir: &Path, kind: Wordlist) -> HashSet<String> {
    let path = dir.join(kind.file_name());
    match fs::read_to_string(&path) {
        Ok(content) => {
            let words = parse_wordlist(&content);
            if words.is_empty() {
                warn!(list = kind.as_str(), path = %path.display(), "wordlist file empty, using seed");
                return default_words(kind);
            }
            info!(list = kind.as_str(), count = words.len(), "wordlist loaded");
            words
        }
        Err(e) => {
            warn!(list = kind.as_str(), path = %path.display(), error = %e, "wordlist missing, using seed");
            default_words(kind)
        }
    }
}

/// Parse the one-word-per-line format: trims, lowercases, skips blanks and `#` comments.
pub fn parse_wordlist(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_lowercase())
        .collect()
}

/// Built-in seed for a list. The stems here are the originals' shipped sets.
pub fn default_words(kind: Wordlist) -> HashSet<String> {
    let words: &[&str] = match kind {
        Wordlist::Positive => &[
            "хорош", "отличн", "прекрасн", "замечательн", "великолепн",
            "счастлив", "радост", "весел", "доволен", "успешн",
        ],
        Wordlist::Negative => &[
            "плох", "ужасн", "отвратительн", "грустн", "печальн",
            "зл", "сердит", "больн", "устал", "проблем",
        ],
        Wordlist::Intensifiers => &["очень", "сильно", "крайне", "чрезвычайно"],
        Wordlist::Negations => &["не", "ни", "нет", "без"],
    };
    words.iter().map(|w| w.to_string()).collect()
}

/// Fixed category→keywords table. First match wins; used only when a keyword
/// is first created, never to overwrite a manual assignment.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &[
            "работа", "проект", "задача", "дедлайн", "начальник", "коллега",
            "офис", "зарплата", "совещание", "отчет", "клиент", "бизнес",
        ],
    ),
    (
        Category::Study,
        &[
            "учеба", "университет", "курс", "экзамен", "зачет", "лекция",
            "преподаватель", "студент", "обучение", "знания", "диплом",
        ],
    ),
    (
        Category::Family,
        &[
            "семья", "родители", "мама", "папа", "брат", "сестра",
            "дети", "ребенок", "муж", "жена", "бабушка", "дедушка",
        ],
    ),
    (
        Category::Friends,
        &[
            "друзья", "друг", "подруга", "компания", "встреча",
            "общение", "разговор", "вечеринка", "праздник",
        ],
    ),
    (
        Category::Health,
        &[
            "здоровье", "болезнь", "врач", "боль", "лечение", "таблетки",
            "аптека", "симптомы", "диагноз", "больница", "анализы",
        ],
    ),
    (
        Category::Hobby,
        &[
            "хобби", "музыка", "кино", "книга", "чтение",
            "рисование", "программирование", "путешествие", "фотография",
        ],
    ),
    (
        Category::Finance,
        &[
            "деньги", "покупка", "траты", "экономия",
            "бюджет", "счет", "банк", "кредит", "долг", "инвестиции",
        ],
    ),
    (
        Category::Rest,
        &[
            "отдых", "отпуск", "каникулы", "выходные", "сон", "релакс",
            "медитация", "прогулка", "парк", "природа", "море",
        ],
    ),
    (
        Category::Sport,
        &["спорт", "тренировка", "бег", "зал", "футбол", "плавание"],
    ),
];

/// Linear scan over the fixed table; `Other` when nothing matches.
pub fn category_for_word(word: &str) -> Category {
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.contains(&word) {
            return *category;
        }
    }
    Category::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_never_empty() {
        for kind in [
            Wordlist::Positive,
            Wordlist::Negative,
            Wordlist::Intensifiers,
            Wordlist::Negations,
        ] {
            assert!(!default_words(kind).is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn missing_dir_falls_back_to_seed() {
        let lex = Lexicon::load_from_dir("definitely/not/a/dir");
        assert_eq!(lex.positive, default_words(Wordlist::Positive));
        assert_eq!(lex.negations, default_words(Wordlist::Negations));
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let words = parse_wordlist("# comment\n\nХорош\nрадост\n  \n#x\nрадост\n");
        assert_eq!(words.len(), 2);
        assert!(words.contains("хорош"));
        assert!(words.contains("радост"));
    }

    #[test]
    fn category_lookup_first_match_wins() {
        assert_eq!(category_for_word("работа"), Category::Work);
        assert_eq!(category_for_word("спорт"), Category::Sport);
        assert_eq!(category_for_word("экзамен"), Category::Study);
        assert_eq!(category_for_word("велосипед"), Category::Other);
    }
}
