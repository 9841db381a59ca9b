// src/store.rs
//! # Storage seam
//!
//! `CorrelationStore` is the persistence collaborator the core writes
//! correlation state through. The contract makes the read-modify-write of a
//! single (user, keyword) row atomic — the caller hands in a closure and the
//! store runs it under whatever transactional unit it has — so concurrent
//! saves by the same user cannot lose updates.
//!
//! `MemoryStore` is the in-process implementation used by tests and the
//! operational binary: one mutex, so every row update is trivially atomic.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::model::{Category, Correlation, Keyword, UserId};

/// Rewrite function for one row: receives the current row (if any), returns
/// the replacement. Pure; may be re-run on retry.
pub type RowUpdate<'a> = &'a dyn Fn(Option<&Correlation>) -> Correlation;

pub trait CorrelationStore: Send + Sync {
    /// Atomically update the row for (user, word). Creates the keyword with
    /// `category` if this is its first appearance; an existing keyword's
    /// category is never overwritten.
    fn update_row(
        &self,
        user: &UserId,
        word: &str,
        category: Category,
        f: RowUpdate<'_>,
    ) -> Result<Correlation>;

    /// Insert a fresh row (recalculation path). Same keyword-creation rule.
    fn insert_row(
        &self,
        user: &UserId,
        word: &str,
        category: Category,
        row: Correlation,
    ) -> Result<()>;

    /// Drop every row belonging to `user`; returns how many were removed.
    fn delete_user(&self, user: &UserId) -> Result<usize>;

    /// All rows for a user with their keywords, unordered.
    fn rows_for_user(&self, user: &UserId) -> Result<Vec<(Keyword, Correlation)>>;

    /// Look up a keyword by word, if it has ever been seen.
    fn keyword(&self, word: &str) -> Result<Option<Keyword>>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// word → category, assigned at first sight.
    keywords: HashMap<String, Category>,
    /// (user, word) → row. The map key is the uniqueness invariant.
    rows: HashMap<(UserId, String), Correlation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows across all users (diagnostics).
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

impl CorrelationStore for MemoryStore {
    fn update_row(
        &self,
        user: &UserId,
        word: &str,
        category: Category,
        f: RowUpdate<'_>,
    ) -> Result<Correlation> {
        let mut inner = self.lock();
        inner
            .keywords
            .entry(word.to_string())
            .or_insert(category);
        let key = (user.clone(), word.to_string());
        let next = f(inner.rows.get(&key));
        inner.rows.insert(key, next.clone());
        Ok(next)
    }

    fn insert_row(
        &self,
        user: &UserId,
        word: &str,
        category: Category,
        row: Correlation,
    ) -> Result<()> {
        let mut inner = self.lock();
        inner
            .keywords
            .entry(word.to_string())
            .or_insert(category);
        inner.rows.insert((user.clone(), word.to_string()), row);
        Ok(())
    }

    fn delete_user(&self, user: &UserId) -> Result<usize> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|(u, _), _| u != user);
        Ok(before - inner.rows.len())
    }

    fn rows_for_user(&self, user: &UserId) -> Result<Vec<(Keyword, Correlation)>> {
        let inner = self.lock();
        let mut out = Vec::new();
        for ((u, word), row) in &inner.rows {
            if u == user {
                let category = inner.keywords.get(word).copied().unwrap_or_default();
                out.push((
                    Keyword {
                        word: word.clone(),
                        category,
                    },
                    row.clone(),
                ));
            }
        }
        Ok(out)
    }

    fn keyword(&self, word: &str) -> Result<Option<Keyword>> {
        let inner = self.lock();
        Ok(inner.keywords.get(word).map(|c| Keyword {
            word: word.to_string(),
            category: *c,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(score: f32, occurrences: u32) -> Correlation {
        Correlation {
            score,
            occurrences,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn keyword_category_assigned_once() {
        let store = MemoryStore::new();
        let user = UserId::from("u");
        store
            .insert_row(&user, "работа", Category::Work, row(1.0, 1))
            .unwrap();
        // second sighting with a different category must not overwrite
        store
            .insert_row(&user, "работа", Category::Other, row(2.0, 2))
            .unwrap();
        let kw = store.keyword("работа").unwrap().unwrap();
        assert_eq!(kw.category, Category::Work);
    }

    #[test]
    fn one_row_per_user_word() {
        let store = MemoryStore::new();
        let user = UserId::from("u");
        store
            .insert_row(&user, "спорт", Category::Sport, row(3.0, 1))
            .unwrap();
        store
            .insert_row(&user, "спорт", Category::Sport, row(5.0, 2))
            .unwrap();
        let rows = store.rows_for_user(&user).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.score, 5.0);
    }

    #[test]
    fn update_row_sees_previous_state() {
        let store = MemoryStore::new();
        let user = UserId::from("u");
        store
            .update_row(&user, "отдых", Category::Rest, &|old| {
                assert!(old.is_none());
                row(4.0, 1)
            })
            .unwrap();
        let updated = store
            .update_row(&user, "отдых", Category::Rest, &|old| {
                let old = old.expect("row exists");
                row(old.score + 1.0, old.occurrences + 1)
            })
            .unwrap();
        assert_eq!(updated.score, 5.0);
        assert_eq!(updated.occurrences, 2);
    }

    #[test]
    fn delete_user_is_scoped() {
        let store = MemoryStore::new();
        let a = UserId::from("a");
        let b = UserId::from("b");
        store.insert_row(&a, "море", Category::Rest, row(2.0, 1)).unwrap();
        store.insert_row(&b, "море", Category::Rest, row(2.0, 1)).unwrap();
        assert_eq!(store.delete_user(&a).unwrap(), 1);
        assert!(store.rows_for_user(&a).unwrap().is_empty());
        assert_eq!(store.rows_for_user(&b).unwrap().len(), 1);
    }
}
