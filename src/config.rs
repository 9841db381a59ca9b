// src/config.rs
//! Analyzer configuration: TOML file + env overrides, with sane defaults.
//!
//! Every tunable of the scoring/correlation pipeline lives here so tests can
//! substitute their own values instead of reaching for globals. Loading never
//! hard-fails the application: a missing file yields `AnalyzerConfig::default()`,
//! a present-but-broken file is a real error (misconfiguration should be loud).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const DEFAULT_LEXICON_DIR: &str = "data/sentiment";

pub const ENV_CONFIG_PATH: &str = "DIARY_CONFIG_PATH";
pub const ENV_LEXICON_DIR: &str = "DIARY_LEXICON_DIR";

fn default_scale() -> f32 {
    10.0
}
fn default_lexicon_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LEXICON_DIR)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Output bound: all sentiment and correlation scores live in `[-scale, scale]`.
    /// One scale end-to-end; nothing else in the crate introduces another one.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Directory with the `*_ru.txt` wordlists.
    #[serde(default = "default_lexicon_dir")]
    pub lexicon_dir: PathBuf,
    #[serde(default)]
    pub weights: WeightConfig,
    #[serde(default)]
    pub blend: BlendConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
    #[serde(default)]
    pub recalc: RecalcConfig,
}

/// Modifier weights for the token walk.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightConfig {
    /// Multiplier an intensifier applies to the following token (> 1).
    #[serde(default = "default_intensifier")]
    pub intensifier: f32,
    /// Factor a negation applies to the following token (negative).
    #[serde(default = "default_negation")]
    pub negation: f32,
    /// Bonus for tokens longer than `long_word_len` chars.
    #[serde(default = "default_long_word_bonus")]
    pub long_word_bonus: f32,
    #[serde(default = "default_long_word_len")]
    pub long_word_len: usize,
}

fn default_intensifier() -> f32 {
    1.5
}
fn default_negation() -> f32 {
    -1.0
}
fn default_long_word_bonus() -> f32 {
    1.1
}
fn default_long_word_len() -> usize {
    6
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            intensifier: default_intensifier(),
            negation: default_negation(),
            long_word_bonus: default_long_word_bonus(),
            long_word_len: default_long_word_len(),
        }
    }
}

/// How the text-derived score is blended with a user-supplied mood value.
/// Majority weight stays with the text.
#[derive(Debug, Clone, Deserialize)]
pub struct BlendConfig {
    #[serde(default = "default_text_weight")]
    pub text_weight: f32,
    #[serde(default = "default_user_weight")]
    pub user_weight: f32,
}

fn default_text_weight() -> f32 {
    0.7
}
fn default_user_weight() -> f32 {
    0.3
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            text_weight: default_text_weight(),
            user_weight: default_user_weight(),
        }
    }
}

/// Token length window and the extraction threshold.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Shortest token the tokenizer emits at all.
    #[serde(default = "default_min_len")]
    pub min_len: usize,
    /// Longest token the tokenizer emits.
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Shortest word the keyword extractor keeps.
    #[serde(default = "default_min_meaningful_len")]
    pub min_meaningful_len: usize,
}

fn default_min_len() -> usize {
    3
}
fn default_max_len() -> usize {
    15
}
fn default_min_meaningful_len() -> usize {
    4
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            min_len: default_min_len(),
            max_len: default_max_len(),
            min_meaningful_len: default_min_meaningful_len(),
        }
    }
}

/// Thresholds for the full-recalculation path.
#[derive(Debug, Clone, Deserialize)]
pub struct RecalcConfig {
    /// Minimum number of scored entries before a recalculation runs at all.
    #[serde(default = "default_min_entries")]
    pub min_entries: usize,
    /// A word must appear in at least this many distinct entries to get a row.
    #[serde(default = "default_min_entry_occurrences")]
    pub min_entry_occurrences: usize,
}

fn default_min_entries() -> usize {
    3
}
fn default_min_entry_occurrences() -> usize {
    2
}

impl Default for RecalcConfig {
    fn default() -> Self {
        Self {
            min_entries: default_min_entries(),
            min_entry_occurrences: default_min_entry_occurrences(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            lexicon_dir: default_lexicon_dir(),
            weights: WeightConfig::default(),
            blend: BlendConfig::default(),
            tokens: TokenConfig::default(),
            recalc: RecalcConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Resolve the config path (`DIARY_CONFIG_PATH` or the default) and load it.
    /// A missing file falls back to defaults; a malformed file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            warn!(path = %path.display(), "analyzer config not found, using defaults");
            Self::default()
        };

        // optional: override the lexicon directory from env
        if let Ok(dir) = std::env::var(ENV_LEXICON_DIR) {
            cfg.lexicon_dir = PathBuf::from(dir);
        }

        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read analyzer config at {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: AnalyzerConfig = toml::from_str(toml_str)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Keep odd values from poisoning the math: a non-positive scale, an
    /// inverted token window or blend weights that don't sum to 1 are all
    /// repaired instead of propagated.
    pub fn sanitize(&mut self) {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = default_scale();
        }
        if self.weights.intensifier <= 1.0 || !self.weights.intensifier.is_finite() {
            self.weights.intensifier = default_intensifier();
        }
        if self.weights.negation >= 0.0 || !self.weights.negation.is_finite() {
            self.weights.negation = default_negation();
        }
        if self.tokens.min_len > self.tokens.max_len {
            // swap to keep a valid window
            std::mem::swap(&mut self.tokens.min_len, &mut self.tokens.max_len);
        }
        let sum = self.blend.text_weight + self.blend.user_weight;
        if !sum.is_finite() || sum <= 0.0 {
            self.blend = BlendConfig::default();
        } else if (sum - 1.0).abs() > 1e-3 {
            self.blend.text_weight /= sum;
            self.blend.user_weight /= sum;
        }
        if self.recalc.min_entry_occurrences == 0 {
            self.recalc.min_entry_occurrences = default_min_entry_occurrences();
        }
    }

    /// Clamp a score into the configured output range. Idempotent.
    #[inline]
    pub fn clamp_score(&self, x: f32) -> f32 {
        x.clamp(-self.scale, self.scale)
    }
}
