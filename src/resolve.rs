//! Direction resolution: combining script signals with an alignment mode.
//!
//! The thresholds here are deliberate policy, not incidental: smart mode
//! falls back to a 50% Hebrew-density tie-break when no leading letter
//! decides, auto mode uses a 30% threshold with a leading-Hebrew shortcut,
//! and an unrecognized mode uses the 30% density test alone.

use serde::{Deserialize, Serialize};

use crate::script::{
    LetterScript, WordScript, contains_hebrew, hebrew_density, leading_script,
    leading_word_script,
};

/// Text directionality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    /// Value for the `dir` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr => "ltr",
        }
    }
}

/// Policy selecting which heuristic governs whole-span direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// First meaningful letter decides; density > 50% breaks ties.
    #[default]
    Smart,
    /// Density > 30%, or a leading Hebrew letter.
    Auto,
    /// Any Hebrew at all means RTL.
    Force,
    /// Unrecognized mode value from settings; density > 30% alone.
    #[serde(other)]
    Unknown,
}

/// Resolve the direction of a whole text span under the given mode.
///
/// Text with no Hebrew is LTR unconditionally, regardless of mode.
pub fn resolve(text: &str, mode: AlignmentMode) -> Direction {
    if !contains_hebrew(text) {
        return Direction::Ltr;
    }

    let rtl = match mode {
        AlignmentMode::Smart => match leading_script(text) {
            Some(LetterScript::Hebrew) => true,
            Some(LetterScript::Latin) => false,
            None => hebrew_density(text) > 0.5,
        },
        AlignmentMode::Auto => {
            hebrew_density(text) > 0.3 || leading_script(text) == Some(LetterScript::Hebrew)
        }
        AlignmentMode::Force => true,
        AlignmentMode::Unknown => hebrew_density(text) > 0.3,
    };

    if rtl { Direction::Rtl } else { Direction::Ltr }
}

/// Resolve direction by the first meaningful word alone.
///
/// Mode-independent: ambiguity is settled at word granularity, not by
/// percentages. RTL iff the text contains Hebrew and its first letter run
/// does.
pub fn resolve_by_first_word(text: &str) -> Direction {
    if contains_hebrew(text) && leading_word_script(text) == WordScript::Hebrew {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}
