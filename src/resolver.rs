//! Text command resolution onto the shape vocabulary
//!
//! Two policies:
//! - `Strict`: the trimmed, lower-cased text must name a shape exactly
//! - `Creative`: synonyms first (the whole text, then single words), then
//!   fuzzy matching with a score threshold

use crate::models::ShapeName;
use crate::suggest::{best_match, suggest};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A fuzzy candidate is accepted only if its score is strictly above this.
pub const FUZZY_THRESHOLD: u8 = 60;

/// Alternate words mapped onto canonical names (creative mode only).
pub const SYNONYMS: &[(&str, ShapeName)] =
    &[("box", ShapeName::Square), ("rect", ShapeName::Square), ("home", ShapeName::House)];

/// Vocabulary names in tie-break order.
const VOCABULARY: [&str; 7] = ["circle", "square", "triangle", "line", "tree", "house", "sun"];

/// Resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Exact vocabulary match only
    Strict,
    /// Synonyms, then fuzzy matching
    #[default]
    Creative,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Strict => "strict",
            Mode::Creative => "creative",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Mode::Strict),
            "creative" => Ok(Mode::Creative),
            other => Err(format!("unknown mode '{}', expected 'strict' or 'creative'", other)),
        }
    }
}

/// Resolve free text to a canonical shape name.
///
/// Returns `None` when nothing matches; that is the only failure mode.
///
/// # Examples
///
/// ```
/// use text2shape::models::ShapeName;
/// use text2shape::resolver::{resolve, Mode};
///
/// assert_eq!(resolve("  Circle ", Mode::Strict), Some(ShapeName::Circle));
/// assert_eq!(resolve("box", Mode::Strict), None);
/// assert_eq!(resolve("box", Mode::Creative), Some(ShapeName::Square));
/// assert_eq!(resolve("sqare", Mode::Creative), Some(ShapeName::Square));
/// ```
pub fn resolve(text: &str, mode: Mode) -> Option<ShapeName> {
    let cmd = text.trim().to_lowercase();
    if cmd.is_empty() {
        return None;
    }

    match mode {
        Mode::Strict => cmd.parse().ok(),
        Mode::Creative => resolve_creative(&cmd),
    }
}

fn resolve_creative(cmd: &str) -> Option<ShapeName> {
    if let Some(name) = lookup_synonym(cmd) {
        debug!(command = cmd, shape = %name, "resolved by synonym");
        return Some(name);
    }

    // A word naming a shape outright beats a synonym elsewhere in the sentence
    let words: Vec<&str> = cmd.split_whitespace().collect();
    if words.len() > 1 && !words.iter().any(|word| VOCABULARY.contains(word)) {
        if let Some(name) = words.iter().find_map(|word| lookup_synonym(word)) {
            debug!(command = cmd, shape = %name, "resolved by synonym word");
            return Some(name);
        }
    }

    let (candidate, score) = best_match(cmd, &VOCABULARY)?;
    if score > FUZZY_THRESHOLD {
        debug!(command = cmd, shape = candidate, score, "resolved by fuzzy match");
        candidate.parse().ok()
    } else {
        debug!(command = cmd, best = candidate, score, "fuzzy match below threshold");
        None
    }
}

/// Look up a synonym. The input must already be trimmed and lower-cased.
pub fn lookup_synonym(word: &str) -> Option<ShapeName> {
    SYNONYMS.iter().find(|(alias, _)| *alias == word).map(|(_, name)| *name)
}

/// Vocabulary names close to an unresolved command, for "did you mean" hints.
pub fn suggestions(text: &str) -> Vec<&'static str> {
    suggest(text.trim(), &VOCABULARY, 3)
}
