// src/scorer.rs
//! # Sentiment Scorer
//!
//! Lexicon walk over the token stream with one-token lookahead for
//! intensifiers and negations, plus a separate surface-pattern scan of the
//! raw text (exclamation runs, ellipses, caps, emoji). Token contributions
//! are averaged over the sentiment-bearing tokens and rescaled to the
//! configured range; the pattern contribution is added after averaging, then
//! an optional user mood value is blended in and the result is clamped and
//! rounded to one decimal.

use anyhow::Context;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::lexicon::Lexicon;
use crate::model::count_words;
use crate::text::{scorer_tokens, stem, STOPWORDS};

/// Emotional surface patterns with fixed signed weights, matched against the
/// raw (non-normalized) text so caps runs survive.
const EMOTIONAL_PATTERNS: &[(&str, f32)] = &[
    (r"!{2,}", 1.3),          // exclamation runs
    (r"\?{2,}", -0.5),        // question pile-ups
    (r"\.{3,}", -0.7),        // ellipses
    (r"[A-ZА-ЯЁ]{4,}", 0.8),  // ALL-CAPS runs
    (r"[♥♡❤💕💖]", 1.2),      // hearts
    (r"[😊😂🤣😍🥰]", 1.5),   // positive emoji
    (r"[😢😭😔😞😠]", -1.5),  // negative emoji
];

/// Word count at which the pattern contribution reaches its 2.0x cap.
const PATTERN_LENGTH_DIVISOR: f32 = 50.0;
const PATTERN_LENGTH_CAP: f32 = 2.0;

/// Detailed result of scoring one text, before user-value blending.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    /// Averaged token score rescaled to the output range (0 when no
    /// sentiment-bearing token was found). Not yet clamped.
    pub text_score: f32,
    /// Weighted surface-pattern contribution, length-scaled.
    pub pattern_score: f32,
    /// Each sentiment-bearing token with its signed contribution.
    pub sentiment_words: Vec<(String, f32)>,
    /// Whitespace-token count of the raw text.
    pub word_count: usize,
}

impl ScoreBreakdown {
    pub fn combined(&self) -> f32 {
        self.text_score + self.pattern_score
    }

    pub fn positive_words(&self) -> Vec<&str> {
        self.sentiment_words
            .iter()
            .filter(|(_, s)| *s > 0.0)
            .map(|(w, _)| w.as_str())
            .collect()
    }

    pub fn negative_words(&self) -> Vec<&str> {
        self.sentiment_words
            .iter()
            .filter(|(_, s)| *s < 0.0)
            .map(|(w, _)| w.as_str())
            .collect()
    }
}

#[derive(Debug)]
pub struct SentimentScorer {
    lexicon: Arc<Lexicon>,
    cfg: AnalyzerConfig,
    patterns: Vec<(Regex, f32)>,
}

impl SentimentScorer {
    /// Compile the pattern table up front; a broken pattern is a startup error,
    /// never a per-entry one.
    pub fn new(lexicon: Arc<Lexicon>, cfg: AnalyzerConfig) -> anyhow::Result<Self> {
        let patterns = EMOTIONAL_PATTERNS
            .iter()
            .map(|(pat, weight)| {
                let re = Regex::new(pat)
                    .with_context(|| format!("emotional pattern `{pat}` failed to compile"))?;
                Ok((re, *weight))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            lexicon,
            cfg,
            patterns,
        })
    }

    /// Full score: breakdown + optional user blend + clamp + one-decimal round.
    ///
    /// Degenerate input (under 3 meaningful chars) contributes 0 from the
    /// text, so the result is the blended user value or plain 0.0.
    pub fn score(&self, text: &str, user_value: Option<f32>) -> f32 {
        let base = if text.trim().chars().count() < 3 {
            0.0
        } else {
            self.breakdown(text).combined()
        };

        let blended = match user_value {
            Some(user) => base * self.cfg.blend.text_weight + user * self.cfg.blend.user_weight,
            None => base,
        };

        round1(self.cfg.clamp_score(blended))
    }

    /// Token walk + pattern scan, no blending or clamping.
    pub fn breakdown(&self, text: &str) -> ScoreBreakdown {
        let tokens = self.filtered_tokens(text);

        let mut total = 0.0f32;
        let mut sentiment_words: Vec<(String, f32)> = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let mut token = tokens[i].as_str();
            let mut multiplier = 1.0f32;

            // Intensifier boosts the next token.
            if self.lexicon.intensifiers.contains(token) && i + 1 < tokens.len() {
                multiplier = self.cfg.weights.intensifier;
                i += 1;
                token = tokens[i].as_str();
            }

            // Negation flips the next token; compounds with an intensifier.
            if self.lexicon.negations.contains(token) && i + 1 < tokens.len() {
                multiplier *= self.cfg.weights.negation;
                i += 1;
                token = tokens[i].as_str();
            }

            let stemmed = stem(token);
            let base = if lexicon_match(&self.lexicon.positive, stemmed) {
                1.0
            } else if lexicon_match(&self.lexicon.negative, stemmed) {
                -1.0
            } else {
                0.0
            };

            if base != 0.0 {
                let mut contribution = base;
                if token.chars().count() > self.cfg.weights.long_word_len {
                    contribution *= self.cfg.weights.long_word_bonus;
                }
                contribution *= multiplier;
                total += contribution;
                sentiment_words.push((token.to_string(), contribution));
            }

            i += 1;
        }

        let text_score = if sentiment_words.is_empty() {
            0.0
        } else {
            (total / sentiment_words.len() as f32) * self.cfg.scale
        };

        let word_count = count_words(text);

        ScoreBreakdown {
            text_score,
            pattern_score: self.pattern_score(text, word_count),
            sentiment_words,
            word_count,
        }
    }

    /// Scorer tokens with stop-word filtering that deliberately spares the
    /// modifier words: `не` is two chars and would be lost to the generic
    /// length filter, killing negation entirely.
    fn filtered_tokens(&self, text: &str) -> Vec<String> {
        scorer_tokens(text)
            .into_iter()
            .filter(|t| {
                let t = t.as_str();
                if self.lexicon.negations.contains(t) || self.lexicon.intensifiers.contains(t) {
                    return true;
                }
                !STOPWORDS.contains(t) && t.chars().count() > 2
            })
            .collect()
    }

    /// Sum of pattern matches × weight, scaled by text length (capped at 2.0x).
    fn pattern_score(&self, raw_text: &str, word_count: usize) -> f32 {
        let mut sum = 0.0f32;
        for (re, weight) in &self.patterns {
            let matches = re.find_iter(raw_text).count();
            if matches > 0 {
                sum += matches as f32 * weight;
            }
        }
        if word_count == 0 {
            return 0.0;
        }
        let length_factor = (word_count as f32 / PATTERN_LENGTH_DIVISOR).min(PATTERN_LENGTH_CAP);
        sum * length_factor
    }
}

/// Exact or substring membership: the lists hold stems, so `хорош` matches
/// both `хороший` and `хорошего` after stemming.
fn lexicon_match(list: &HashSet<String>, stemmed: &str) -> bool {
    list.contains(stemmed) || list.iter().any(|w| stemmed.contains(w.as_str()))
}

fn round1(x: f32) -> f32 {
    (x * 10.0).round() / 10.0
}
