//! Mutation-batch processing.
//!
//! The host environment delivers batched mutation records; each record is
//! handled independently and synchronously, so one element's failure never
//! stops its siblings. Newly inserted subtrees are annotated directly and
//! searched for message containers; in-place edits climb a bounded number of
//! ancestors looking for the containing message.

use crate::annotate::annotate;
use crate::dom::{Dom, MutationRecord};
use crate::engine::Config;
use crate::pattern::{Pattern, parse_or_skip};
use crate::profile::SiteProfile;

/// Upper bound on the ancestor climb from a mutated node to its message
/// container. Keeps a runaway search impossible on pathological trees.
const MAX_ANCESTOR_HOPS: usize = 10;

/// Process one batch of mutation records.
pub fn process_batch(
    dom: &mut Dom,
    records: &[MutationRecord],
    profile: &SiteProfile,
    config: &Config,
) {
    if !config.enabled {
        return;
    }

    let patterns: Vec<Pattern> = profile
        .selectors
        .iter()
        .filter_map(|s| parse_or_skip(s))
        .collect();

    for record in records {
        handle_added_nodes(dom, record, &patterns, config);
        handle_target_mutation(dom, record, &patterns, config);
    }
}

/// Annotate inserted elements and any message containers inside them.
fn handle_added_nodes(dom: &mut Dom, record: &MutationRecord, patterns: &[Pattern], config: &Config) {
    for &added in &record.added {
        if !dom.is_element(added) {
            continue;
        }

        if !dom.text_content(added).trim().is_empty() {
            annotate(dom, added, config);
        }

        for pattern in patterns {
            for message in dom.select(added, pattern) {
                if !dom.text_content(message).trim().is_empty() {
                    annotate(dom, message, config);
                }
            }
        }
    }
}

/// Re-annotate the message containing an in-place mutation.
///
/// Climbs from the mutated node (or its parent, for text nodes) toward the
/// root until a profile selector matches, bounded by [`MAX_ANCESTOR_HOPS`];
/// falls back to the origin element when the climb exhausts.
fn handle_target_mutation(
    dom: &mut Dom,
    record: &MutationRecord,
    patterns: &[Pattern],
    config: &Config,
) {
    let origin = if dom.is_element(record.target) {
        Some(record.target)
    } else {
        dom.parent(record.target)
    };
    let Some(origin) = origin else {
        return;
    };

    let mut found = None;
    let mut current = Some(origin);
    for _ in 0..MAX_ANCESTOR_HOPS {
        let Some(id) = current else { break };
        if patterns.iter().any(|p| dom.matches(id, p)) {
            found = Some(id);
            break;
        }
        current = dom.parent(id);
    }

    let target = found.unwrap_or(origin);
    if !dom.text_content(target).trim().is_empty() {
        annotate(dom, target, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::RTL_CLASS;
    use crate::dom::{MutationRecord, NodeId, parse_document};
    use crate::profile::DEFAULT_PROFILE;
    use crate::resolve::AlignmentMode;

    fn config() -> Config {
        Config {
            enabled: true,
            mode: AlignmentMode::Smart,
        }
    }

    fn chat_page() -> Dom {
        parse_document(
            r#"<html><body>
                <div class="message" id="m1"><p>first message</p></div>
                <div class="message" id="m2"><p>second message</p></div>
            </body></html>"#,
        )
    }

    fn element_by_id(dom: &Dom, id: &str) -> NodeId {
        dom.all_elements()
            .into_iter()
            .find(|&e| dom.attr(e, "id") == Some(id))
            .expect("should find element by id")
    }

    #[test]
    fn test_inserted_hebrew_paragraph_annotated() {
        let mut dom = chat_page();
        let m1 = element_by_id(&dom, "m1");

        // Host inserts a new paragraph into a tracked container
        let p = dom.create_named_element("p");
        dom.append(m1, p);
        dom.append_text(p, "שלום עולם");
        let records = vec![MutationRecord::child_list(m1, vec![p])];

        process_batch(&mut dom, &records, &DEFAULT_PROFILE, &config());

        assert!(dom.has_class(p, RTL_CLASS));
        assert_eq!(dom.attr(p, "dir"), Some("rtl"));
    }

    #[test]
    fn test_unrelated_sibling_not_touched() {
        let mut dom = chat_page();
        let m1 = element_by_id(&dom, "m1");

        let p = dom.create_named_element("p");
        dom.append(m1, p);
        dom.append_text(p, "שלום");
        let records = vec![MutationRecord::child_list(m1, vec![p])];

        process_batch(&mut dom, &records, &DEFAULT_PROFILE, &config());

        // The other container's paragraph was never visited
        let m2 = element_by_id(&dom, "m2");
        let sibling_p = dom
            .descendants(m2)
            .find(|&e| dom.element_name(e) == Some("p"))
            .unwrap();
        assert_eq!(dom.attr(sibling_p, "dir"), None);
    }

    #[test]
    fn test_character_data_climbs_to_container() {
        let mut dom = chat_page();
        let m1 = element_by_id(&dom, "m1");
        let p = dom
            .descendants(m1)
            .find(|&e| dom.element_name(e) == Some("p"))
            .unwrap();

        // Host rewrites the paragraph's text in place
        let text_node = dom.children(p).next().unwrap();
        if let Some(node) = dom.get_mut(text_node) {
            if let crate::dom::NodeData::Text(contents) = &mut node.data {
                *contents = "שלום עולם".to_string();
            }
        }
        let records = vec![MutationRecord::character_data(text_node)];

        process_batch(&mut dom, &records, &DEFAULT_PROFILE, &config());

        assert!(dom.has_class(p, RTL_CLASS));
    }

    #[test]
    fn test_mutation_outside_any_container_falls_back() {
        let mut dom = parse_document("<html><body><aside><p id=\"loose\">שלום</p></aside></body></html>");
        let p = element_by_id(&dom, "loose");
        let records = vec![MutationRecord::child_list(p, vec![])];

        process_batch(&mut dom, &records, &DEFAULT_PROFILE, &config());

        // No selector matched on the climb; the origin itself is annotated
        assert!(dom.has_class(p, RTL_CLASS));
    }

    #[test]
    fn test_disabled_batch_is_noop() {
        let mut dom = chat_page();
        let m1 = element_by_id(&dom, "m1");
        let p = dom.create_named_element("p");
        dom.append(m1, p);
        dom.append_text(p, "שלום");
        let records = vec![MutationRecord::child_list(m1, vec![p])];

        let off = Config {
            enabled: false,
            mode: AlignmentMode::Smart,
        };
        process_batch(&mut dom, &records, &DEFAULT_PROFILE, &off);
        assert_eq!(dom.attr(p, "dir"), None);
    }
}
