//! Declarative element patterns.
//!
//! Site profiles and code-container detection describe elements with a small
//! selector subset: `tag`, `.class`, `[attr]`, `[attr="value"]`,
//! `[attr*="value"]`, and combinations like `div[class*="prose"]`. This
//! module parses those strings into a [`Pattern`] with fixed semantics:
//! exact tag match, exact class-token match, attribute presence, exact
//! attribute value, or case-sensitive substring within an attribute value.
//!
//! Anything outside the subset is an [`Error::InvalidPattern`]; callers log
//! it at debug severity and treat the pattern as a non-match.

use tracing::debug;

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};

/// How an attribute is tested.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    /// `[attr]` — attribute exists.
    Present,
    /// `[attr="value"]` — exact value.
    Equals(String),
    /// `[attr*="value"]` — value contains substring.
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    op: AttrOp,
}

/// A parsed element pattern.
///
/// All components must match for the pattern to match: an optional tag name,
/// any number of required class tokens, and any number of attribute tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl Pattern {
    /// Parse a selector-subset string into a pattern.
    pub fn parse(selector: &str) -> Result<Pattern> {
        let input = selector.trim();
        if input.is_empty() {
            return Err(Error::InvalidPattern(selector.to_string()));
        }

        let mut pattern = Pattern {
            tag: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        };

        let mut rest = input;

        // Optional leading tag name
        let tag_len = rest
            .find(['.', '['])
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(Error::InvalidPattern(selector.to_string()));
            }
            pattern.tag = Some(tag.to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let len = after
                    .find(['.', '['])
                    .unwrap_or(after.len());
                let class = &after[..len];
                if class.is_empty()
                    || !class
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                {
                    return Err(Error::InvalidPattern(selector.to_string()));
                }
                pattern.classes.push(class.to_string());
                rest = &after[len..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let end = after
                    .find(']')
                    .ok_or_else(|| Error::InvalidPattern(selector.to_string()))?;
                pattern.attrs.push(parse_attr_test(&after[..end], selector)?);
                rest = &after[end + 1..];
            } else {
                // `:not(...)`, combinators, and everything else are out of scope
                return Err(Error::InvalidPattern(selector.to_string()));
            }
        }

        Ok(pattern)
    }

    /// Check whether an element node matches this pattern.
    ///
    /// Non-element nodes never match.
    pub fn matches(&self, dom: &Dom, id: NodeId) -> bool {
        let Some(name) = dom.element_name(id) else {
            return false;
        };
        if let Some(tag) = &self.tag
            && name != tag.as_str()
        {
            return false;
        }
        for class in &self.classes {
            if !dom.has_class(id, class) {
                return false;
            }
        }
        for test in &self.attrs {
            let value = dom.attr(id, &test.name);
            let ok = match &test.op {
                AttrOp::Present => value.is_some(),
                AttrOp::Equals(expected) => value == Some(expected.as_str()),
                AttrOp::Contains(sub) => value.is_some_and(|v| v.contains(sub.as_str())),
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

fn parse_attr_test(body: &str, selector: &str) -> Result<AttrTest> {
    let invalid = || Error::InvalidPattern(selector.to_string());

    let name_len = body.find(['*', '=']).unwrap_or(body.len());
    let name = body[..name_len].trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid());
    }

    let rest = &body[name_len..];
    let op = if rest.is_empty() {
        AttrOp::Present
    } else if let Some(value) = rest.strip_prefix("*=") {
        AttrOp::Contains(unquote(value).ok_or_else(invalid)?)
    } else if let Some(value) = rest.strip_prefix('=') {
        AttrOp::Equals(unquote(value).ok_or_else(invalid)?)
    } else {
        return Err(invalid());
    };

    Ok(AttrTest {
        name: name.to_string(),
        op,
    })
}

/// Strip matching single or double quotes; bare values are accepted as-is.
fn unquote(value: &str) -> Option<String> {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return Some(inner.to_string());
        }
    }
    if value.is_empty() || value.starts_with(['"', '\'']) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a pattern, logging and discarding it when the syntax is unsupported.
pub fn parse_or_skip(selector: &str) -> Option<Pattern> {
    match Pattern::parse(selector) {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            debug!(selector, %err, "skipping unsupported pattern");
            None
        }
    }
}
