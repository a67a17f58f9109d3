//! Tree annotation: writing direction verdicts onto elements.
//!
//! A direction decision is expressed as a class flag (`hebrew-rtl` or
//! `force-ltr`, never both) plus a `dir` attribute. The annotator walks a
//! message subtree in a fixed order: code regions first, then a
//! whole-element forced-LTR check, then per-candidate first-word
//! resolution over direct text. The order is load-bearing — reordering
//! changes outcomes on short mixed math/Hebrew spans.
//!
//! Re-running on an unchanged subtree yields identical flags.

use crate::classify::{CODE_REGION_PATTERNS, is_code_like, is_forced_ltr};
use crate::dom::{Dom, NodeId};
use crate::engine::Config;
use crate::pattern::parse_or_skip;
use crate::resolve::{Direction, resolve_by_first_word};

/// Class flag for an active Hebrew-RTL decision.
pub const RTL_CLASS: &str = "hebrew-rtl";

/// Class flag for an active forced-LTR override.
pub const FORCE_LTR_CLASS: &str = "force-ltr";

/// Directionality attribute.
pub const DIR_ATTR: &str = "dir";

/// Tags whose direct text is worth a per-block direction decision.
const TEXT_BLOCK_TAGS: &[&str] = &[
    "p", "div", "span", "li", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Annotate one message subtree.
pub fn annotate(dom: &mut Dom, root: NodeId, config: &Config) {
    if !config.enabled {
        return;
    }

    // Code regions never split into RTL runs, even with Hebrew comments.
    force_ltr_code_regions(dom, root);

    // Whole-element override: short math or code means no descent.
    if is_forced_ltr(dom, root) {
        mark_forced_ltr(dom, root);
        return;
    }

    let mut candidates: Vec<NodeId> = dom
        .descendants(root)
        .filter(|&id| {
            dom.element_name(id)
                .is_some_and(|name| TEXT_BLOCK_TAGS.contains(&name))
        })
        .collect();
    candidates.push(root);

    for id in candidates {
        if is_code_like(dom, id) || is_forced_ltr(dom, id) {
            mark_forced_ltr(dom, id);
            continue;
        }

        // Direct text only: a child's script must not decide the parent.
        let direct = dom.direct_text(id);
        if direct.trim().is_empty() {
            continue;
        }

        match resolve_by_first_word(&direct) {
            Direction::Rtl => {
                dom.add_class(id, RTL_CLASS);
                dom.remove_class(id, FORCE_LTR_CLASS);
                dom.set_attr(id, DIR_ATTR, "rtl");
            }
            Direction::Ltr => {
                dom.remove_class(id, RTL_CLASS);
                dom.remove_class(id, FORCE_LTR_CLASS);
                dom.set_attr(id, DIR_ATTR, "ltr");
            }
        }
    }
}

/// Force LTR on every code container under `root` and its contents, plus
/// inline `code` spans that are not inside a `pre`.
fn force_ltr_code_regions(dom: &mut Dom, root: NodeId) {
    for selector in CODE_REGION_PATTERNS {
        let Some(pattern) = parse_or_skip(selector) else {
            continue;
        };
        for container in dom.select(root, &pattern) {
            mark_forced_ltr(dom, container);
            let nested: Vec<NodeId> = dom
                .descendants(container)
                .filter(|&id| dom.is_element(id))
                .collect();
            for id in nested {
                dom.remove_class(id, RTL_CLASS);
                dom.set_attr(id, DIR_ATTR, "ltr");
            }
        }
    }

    // Inline code spans, as opposed to fenced blocks
    let inline_code: Vec<NodeId> = dom
        .descendants(root)
        .filter(|&id| {
            dom.element_name(id) == Some("code")
                && !dom.ancestors(id).any(|a| dom.element_name(a) == Some("pre"))
        })
        .collect();
    for id in inline_code {
        mark_forced_ltr(dom, id);
    }
}

fn mark_forced_ltr(dom: &mut Dom, id: NodeId) {
    dom.remove_class(id, RTL_CLASS);
    dom.add_class(id, FORCE_LTR_CLASS);
    dom.set_attr(id, DIR_ATTR, "ltr");
}

/// Remove every annotation previously written: both class flags and the
/// `dir` attribute.
///
/// A plain-LTR verdict writes `dir="ltr"` without either class flag, so the
/// sweep also covers elements whose only trace is a direction attribute.
pub fn strip(dom: &mut Dom) {
    for id in dom.all_elements() {
        if dom.has_class(id, RTL_CLASS)
            || dom.has_class(id, FORCE_LTR_CLASS)
            || matches!(dom.attr(id, DIR_ATTR), Some("rtl") | Some("ltr"))
        {
            dom.remove_class(id, RTL_CLASS);
            dom.remove_class(id, FORCE_LTR_CLASS);
            dom.remove_attr(id, DIR_ATTR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;
    use crate::resolve::AlignmentMode;

    fn config() -> Config {
        Config {
            enabled: true,
            mode: AlignmentMode::Smart,
        }
    }

    fn annotated(html: &str) -> (Dom, NodeId) {
        let mut dom = parse_document(html);
        let root = dom.find_by_tag("div").expect("should find div");
        annotate(&mut dom, root, &config());
        (dom, root)
    }

    #[test]
    fn test_hebrew_paragraph_marked_rtl() {
        let (dom, _) = annotated("<div><p>שלום עולם</p></div>");
        let p = dom.find_by_tag("p").unwrap();
        assert!(dom.has_class(p, RTL_CLASS));
        assert!(!dom.has_class(p, FORCE_LTR_CLASS));
        assert_eq!(dom.attr(p, DIR_ATTR), Some("rtl"));
    }

    #[test]
    fn test_english_paragraph_marked_ltr() {
        let (dom, _) = annotated("<div><p>Hello there שלום</p></div>");
        let p = dom.find_by_tag("p").unwrap();
        assert!(!dom.has_class(p, RTL_CLASS));
        assert_eq!(dom.attr(p, DIR_ATTR), Some("ltr"));
    }

    #[test]
    fn test_empty_paragraph_left_alone() {
        let (dom, _) = annotated("<div><p>   </p></div>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.attr(p, DIR_ATTR), None);
        assert!(!dom.has_class(p, RTL_CLASS));
    }

    #[test]
    fn test_code_block_forced_ltr_with_hebrew_inside() {
        let (dom, root) =
            annotated("<div><p>שלום</p><pre><code>// הערה בעברית\nlet x = 1;</code></pre></div>");
        let pre = dom.find_by_tag("pre").unwrap();
        assert!(dom.has_class(pre, FORCE_LTR_CLASS));
        assert_eq!(dom.attr(pre, DIR_ATTR), Some("ltr"));

        // Contents are pinned LTR too
        let code = dom.find_by_tag("code").unwrap();
        assert_eq!(dom.attr(code, DIR_ATTR), Some("ltr"));
        assert!(!dom.has_class(code, RTL_CLASS));

        // A code descendant makes the whole message code-like: the
        // forced-LTR short-circuit wins and no paragraph goes RTL.
        assert!(dom.has_class(root, FORCE_LTR_CLASS));
        let p = dom.find_by_tag("p").unwrap();
        assert!(!dom.has_class(p, RTL_CLASS));
    }

    #[test]
    fn test_inline_code_outside_pre_forced() {
        let (dom, _) = annotated("<div><p>שלום <code>foo()</code> עולם</p></div>");
        let code = dom.find_by_tag("code").unwrap();
        assert!(dom.has_class(code, FORCE_LTR_CLASS));
        assert_eq!(dom.attr(code, DIR_ATTR), Some("ltr"));
    }

    #[test]
    fn test_math_root_short_circuits() {
        let (dom, root) = annotated("<div>1 + 2 = 3</div>");
        assert!(dom.has_class(root, FORCE_LTR_CLASS));
        assert!(!dom.has_class(root, RTL_CLASS));
        assert_eq!(dom.attr(root, DIR_ATTR), Some("ltr"));
    }

    #[test]
    fn test_parent_direction_not_dominated_by_child() {
        // Parent's own text is Hebrew; the nested span is English
        let (dom, root) = annotated("<div>שלום <span>plain English text here</span></div>");
        assert!(dom.has_class(root, RTL_CLASS));
        let span = dom.find_by_tag("span").unwrap();
        assert!(!dom.has_class(span, RTL_CLASS));
        assert_eq!(dom.attr(span, DIR_ATTR), Some("ltr"));
    }

    #[test]
    fn test_disabled_config_is_noop() {
        let mut dom = parse_document("<div><p>שלום</p></div>");
        let root = dom.find_by_tag("div").unwrap();
        let off = Config {
            enabled: false,
            mode: AlignmentMode::Smart,
        };
        annotate(&mut dom, root, &off);
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.attr(p, DIR_ATTR), None);
    }

    #[test]
    fn test_idempotent() {
        let html = "<div><p>שלום</p><p>hello</p><pre>x = 1</pre></div>";
        let (dom_once, _) = annotated(html);

        let mut dom_twice = parse_document(html);
        let root = dom_twice.find_by_tag("div").unwrap();
        annotate(&mut dom_twice, root, &config());
        annotate(&mut dom_twice, root, &config());

        for (a, b) in dom_once.all_elements().into_iter().zip(dom_twice.all_elements()) {
            assert_eq!(dom_once.attr(a, "class"), dom_twice.attr(b, "class"));
            assert_eq!(dom_once.attr(a, DIR_ATTR), dom_twice.attr(b, DIR_ATTR));
        }
    }

    #[test]
    fn test_strip_removes_all_annotations() {
        let html = "<div id=\"m\" data-x=\"keep\"><p>שלום</p><pre>x = 1</pre></div>";
        let (mut dom, _) = annotated(html);
        strip(&mut dom);

        for id in dom.all_elements() {
            assert!(!dom.has_class(id, RTL_CLASS));
            assert!(!dom.has_class(id, FORCE_LTR_CLASS));
        }
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.attr(p, DIR_ATTR), None);
        // Unrelated attributes survive
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(dom.attr(div, "data-x"), Some("keep"));
    }
}
