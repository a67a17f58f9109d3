//! Element classification: code-like and math-like vetoes.
//!
//! Code blocks, editor widgets, and short math expressions must stay LTR no
//! matter how much Hebrew they carry (comments, string literals). Detection
//! is three-layered: container patterns on the element or its descendants,
//! class-name substrings, and shape regexes over short text content.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Dom, NodeId};
use crate::pattern::parse_or_skip;

/// Patterns identifying code containers for classification purposes.
pub const CODE_CONTAINER_PATTERNS: &[&str] = &[
    "pre",
    "code",
    ".highlight",
    ".language-",
    r#"[class*="language-"]"#,
    r#"[class*="hljs"]"#,
    ".code-block",
    "[data-language]",
    ".markdown pre",
    ".cm-editor",
    ".monaco-editor",
    r#"[class*="prism"]"#,
    ".syntax-highlight",
];

/// Patterns driving the annotator's code-region pass. Slightly narrower than
/// [`CODE_CONTAINER_PATTERNS`]: only containers whose whole subtree gets
/// forced LTR.
pub const CODE_REGION_PATTERNS: &[&str] = &[
    "pre",
    "code",
    ".highlight",
    r#"[class*="language-"]"#,
    r#"[class*="hljs"]"#,
    ".code-block",
    "[data-language]",
    ".cm-editor",
    ".monaco-editor",
    r#"[class*="prism"]"#,
    ".syntax-highlight",
];

/// Class-name substrings that mark an element as code.
const CODE_CLASS_SUBSTRINGS: &[&str] = &["code", "highlight", "language-", "hljs"];

/// Shapes that short text takes when it is a code fragment.
static CODE_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Keyword-led statements
        r"^(\s*)?(function|const|let|var|class|import|export|if|for|while|def|public|private)\s+",
        // Lines of nothing but symbols
        r"^\s*[<>{}\[\]();.,\-+=*/\\|&!@#$%^&*]+\s*$",
        // Block comments
        r"(?s)^\s*/\*.*?\*/\s*$",
        // Line comments
        r"^\s*//.*$",
        // Python/shell comments
        r"^\s*#.*$",
        // HTML tag openings
        r"(?m)^\s*</?[a-zA-Z][^>]*>",
        // key: value / key = "value" properties
        r#"^\s*\w+\s*[:=]\s*['"`]"#,
        // Shell-style variables
        r"^\s*\$\w+",
        // Decorators / annotations
        r"^\s*@\w+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Shapes that short numeric/math text takes. None admit letters.
static MATH_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*[\d+\-*/=().,\s]+$",
        r"^\s*\d+[.,]\d+",
        r"^\s*[\d\s+\-*/=()]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Maximum text length for the code-shape heuristic.
const CODE_SHAPE_MAX_LEN: usize = 100;

/// Maximum text length for the math-shape heuristic.
const MATH_SHAPE_MAX_LEN: usize = 50;

/// Check whether an element is, or contains, code.
///
/// An unparseable container pattern counts as a non-match for that pattern
/// only; the remaining layers still run.
pub fn is_code_like(dom: &Dom, id: NodeId) -> bool {
    for selector in CODE_CONTAINER_PATTERNS {
        let Some(pattern) = parse_or_skip(selector) else {
            continue;
        };
        if dom.matches(id, &pattern) {
            return true;
        }
        if dom.descendants(id).any(|d| dom.matches(d, &pattern)) {
            return true;
        }
    }

    if let Some(class) = dom.attr(id, "class")
        && CODE_CLASS_SUBSTRINGS.iter().any(|s| class.contains(s))
    {
        return true;
    }

    let text = dom.text_content(id);
    if text.chars().count() < CODE_SHAPE_MAX_LEN {
        return CODE_SHAPES.iter().any(|shape| shape.is_match(&text));
    }

    false
}

/// Check whether an element must be forced LTR: code, or a short
/// numeric/math expression.
pub fn is_forced_ltr(dom: &Dom, id: NodeId) -> bool {
    if is_code_like(dom, id) {
        return true;
    }

    let text = dom.text_content(id);
    text.chars().count() < MATH_SHAPE_MAX_LEN
        && MATH_SHAPES.iter().any(|shape| shape.is_match(&text))
}
