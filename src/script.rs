//! Script classification for text spans.
//!
//! Pure functions that inspect a string for Hebrew content: block membership,
//! leading-letter script, Hebrew density, and first-word script. The Hebrew
//! block (U+0590–U+05FF) is the sole detection signal; everything outside it
//! is either Latin (ASCII letters) or ignored.

use std::sync::LazyLock;

use regex::Regex;

/// First maximal run of Unicode letters, after leading whitespace/punctuation.
static FIRST_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\p{P}]*(\p{L}+)").expect("valid regex"));

/// Script family of a single leading letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterScript {
    Hebrew,
    Latin,
}

/// Script family of a leading letter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordScript {
    Hebrew,
    Other,
}

/// Check if a character falls in the Hebrew Unicode block.
#[inline]
pub fn is_hebrew_char(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

/// Check if text contains any Hebrew characters.
pub fn contains_hebrew(text: &str) -> bool {
    text.chars().any(is_hebrew_char)
}

/// Find the script of the first Hebrew or Latin letter in the text.
///
/// Punctuation, digits, and whitespace are skipped; letters from other
/// scripts are skipped too (only Hebrew and ASCII letters count). Returns
/// `None` when no such letter exists.
pub fn leading_script(text: &str) -> Option<LetterScript> {
    for c in text.trim().chars() {
        if is_hebrew_char(c) {
            return Some(LetterScript::Hebrew);
        }
        if c.is_ascii_alphabetic() {
            return Some(LetterScript::Latin);
        }
    }
    None
}

/// Fraction of non-whitespace characters that are Hebrew, in `[0, 1]`.
///
/// Returns `0.0` when the text has no non-whitespace characters at all.
pub fn hebrew_density(text: &str) -> f64 {
    let mut hebrew = 0usize;
    let mut total = 0usize;
    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        total += 1;
        if is_hebrew_char(c) {
            hebrew += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        hebrew as f64 / total as f64
    }
}

/// Script of the first meaningful word.
///
/// Skips leading whitespace and Unicode punctuation, takes the first maximal
/// run of Unicode letters, and reports `Hebrew` iff that run contains a
/// Hebrew character. Coarser than [`leading_script`]: the unit is a whole
/// letter run, and anything non-Hebrew (Latin or otherwise) is `Other`.
pub fn leading_word_script(text: &str) -> WordScript {
    let trimmed = text.trim();
    if let Some(caps) = FIRST_WORD.captures(trimmed)
        && caps[1].chars().any(is_hebrew_char)
    {
        return WordScript::Hebrew;
    }
    WordScript::Other
}
