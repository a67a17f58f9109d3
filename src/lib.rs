//! # kivun
//!
//! Hebrew RTL direction annotation for AI-chat page DOM trees.
//!
//! kivun inspects the text of message containers on chat pages and writes a
//! direction verdict onto each text-bearing element: a `hebrew-rtl` or
//! `force-ltr` class flag plus a `dir` attribute. Direction is decided per
//! block by the script of its first meaningful word; code blocks and short
//! math expressions are pinned LTR no matter how much Hebrew they contain.
//!
//! ## Quick Start
//!
//! ```
//! use kivun::{Engine, MemoryStore, parse_document};
//!
//! let mut dom = parse_document(
//!     r#"<div class="message"><p>שלום! איך אפשר לעזור?</p></div>"#,
//! );
//!
//! let engine = Engine::new("claude.ai", MemoryStore::new());
//! engine.annotate_page(&mut dom);
//!
//! let p = dom.find_by_tag("p").unwrap();
//! assert_eq!(dom.attr(p, "dir"), Some("rtl"));
//! ```
//!
//! ## Incremental updates
//!
//! The host page reports DOM changes as [`MutationRecord`] batches;
//! [`Engine::process_mutations`] re-annotates only the affected message
//! containers. Control messages ([`ControlMessage`]) toggle the feature or
//! switch the alignment mode, which invalidates all annotations and
//! triggers a full re-walk.

pub mod annotate;
pub mod classify;
pub mod dom;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod profile;
pub mod resolve;
pub mod script;
pub mod settings;
pub mod watch;

pub use annotate::{DIR_ATTR, FORCE_LTR_CLASS, RTL_CLASS, annotate, strip};
pub use dom::{Dom, MutationKind, MutationRecord, NodeId, parse_document};
pub use engine::{Config, ControlMessage, Engine};
pub use error::{Error, Result};
pub use pattern::Pattern;
pub use profile::SiteProfile;
pub use resolve::{AlignmentMode, Direction, resolve, resolve_by_first_word};
pub use settings::{MemoryStore, Settings, SettingsStore};
