//! Mutation records delivered by the host page.
//!
//! The host environment observes the live document and reports batched
//! changes; each record points at existing arena nodes. This crate never
//! produces records, it only consumes them.

use super::NodeId;

/// What kind of change a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added to or removed from the target.
    ChildList,
    /// The text of the target node changed in place.
    CharacterData,
}

/// One observed change to the document.
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    /// The node the change happened on. May be a text node for
    /// [`MutationKind::CharacterData`].
    pub target: NodeId,
    /// Nodes inserted by a child-list change, in insertion order.
    pub added: Vec<NodeId>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added: Vec<NodeId>) -> Self {
        MutationRecord {
            kind: MutationKind::ChildList,
            target,
            added,
        }
    }

    pub fn character_data(target: NodeId) -> Self {
        MutationRecord {
            kind: MutationKind::CharacterData,
            target,
            added: Vec::new(),
        }
    }
}
