//! Top-level engine: configuration lifecycle and full-document passes.
//!
//! The engine owns the explicit configuration (enabled flag + alignment
//! mode), the site profile for the current page, and the settings store.
//! Control messages from the companion settings surface arrive here; each is
//! handled synchronously to completion.

use serde::{Deserialize, Serialize};

use crate::annotate::{annotate, strip};
use crate::dom::{Dom, MutationRecord};
use crate::pattern::parse_or_skip;
use crate::profile::SiteProfile;
use crate::resolve::{AlignmentMode, Direction, resolve};
use crate::settings::{self, Settings, SettingsStore};
use crate::watch;

/// Explicit runtime configuration, passed into every annotation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub enabled: bool,
    pub mode: AlignmentMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            enabled: true,
            mode: AlignmentMode::Smart,
        }
    }
}

/// Inbound control message from the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ControlMessage {
    Toggle { enabled: bool },
    SetMode { mode: AlignmentMode },
}

/// The annotation engine for one page.
pub struct Engine<S: SettingsStore> {
    config: Config,
    profile: SiteProfile,
    store: S,
}

impl<S: SettingsStore> Engine<S> {
    /// Create an engine for a page, loading persisted settings and picking
    /// the site profile by hostname.
    pub fn new(hostname: &str, store: S) -> Self {
        let loaded = settings::load(&store);
        Engine {
            config: Config {
                enabled: loaded.enabled,
                mode: loaded.mode,
            },
            profile: SiteProfile::for_hostname(hostname),
            store,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Annotate every message container currently in the document.
    pub fn annotate_page(&self, dom: &mut Dom) {
        if !self.config.enabled {
            return;
        }
        let root = dom.document();
        for selector in self.profile.selectors {
            let Some(pattern) = parse_or_skip(selector) else {
                continue;
            };
            for message in dom.select(root, &pattern) {
                if !dom.text_content(message).trim().is_empty() {
                    annotate(dom, message, &self.config);
                }
            }
        }
    }

    /// Process a batch of host-delivered mutation records.
    pub fn process_mutations(&self, dom: &mut Dom, records: &[MutationRecord]) {
        watch::process_batch(dom, records, &self.profile, &self.config);
    }

    /// Handle a control message from the settings surface.
    pub fn handle_message(&mut self, dom: &mut Dom, message: ControlMessage) {
        match message {
            ControlMessage::Toggle { enabled } => {
                self.config.enabled = enabled;
                if enabled {
                    self.annotate_page(dom);
                } else {
                    strip(dom);
                }
                self.persist();
            }
            ControlMessage::SetMode { mode } => {
                self.config.mode = mode;
                // A mode change invalidates every existing annotation.
                strip(dom);
                self.annotate_page(dom);
            }
        }
    }

    /// Resolve a whole text span under the engine's current mode.
    pub fn resolve_direction(&self, text: &str) -> Direction {
        resolve(text, self.config.mode)
    }

    fn persist(&mut self) {
        settings::save(
            &mut self.store,
            Settings {
                enabled: self.config.enabled,
                mode: self.config.mode,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{FORCE_LTR_CLASS, RTL_CLASS};
    use crate::dom::parse_document;
    use crate::settings::{ENABLED_KEY, MemoryStore};
    use serde_json::Value;

    fn page() -> Dom {
        parse_document(
            r#"<html><body>
                <div class="message"><p>שלום עולם</p></div>
                <div class="message"><p>hello there</p></div>
                <nav><p>ניווט</p></nav>
            </body></html>"#,
        )
    }

    fn engine() -> Engine<MemoryStore> {
        Engine::new("claude.ai", MemoryStore::new())
    }

    fn paragraphs(dom: &Dom) -> Vec<crate::dom::NodeId> {
        dom.all_elements()
            .into_iter()
            .filter(|&e| dom.element_name(e) == Some("p"))
            .collect()
    }

    #[test]
    fn test_annotate_page_covers_containers_only() {
        let mut dom = page();
        engine().annotate_page(&mut dom);

        let ps = paragraphs(&dom);
        assert_eq!(dom.attr(ps[0], "dir"), Some("rtl"));
        assert_eq!(dom.attr(ps[1], "dir"), Some("ltr"));
        // The nav is not a message container on any profile
        assert_eq!(dom.attr(ps[2], "dir"), None);
    }

    #[test]
    fn test_toggle_off_strips_and_persists() {
        let mut dom = page();
        let mut engine = engine();
        engine.annotate_page(&mut dom);

        engine.handle_message(&mut dom, ControlMessage::Toggle { enabled: false });

        for id in dom.all_elements() {
            assert!(!dom.has_class(id, RTL_CLASS));
            assert!(!dom.has_class(id, FORCE_LTR_CLASS));
            assert_eq!(dom.attr(id, "dir"), None);
        }
        assert!(!engine.config().enabled);
        assert_eq!(engine.store.get(ENABLED_KEY), Some(Value::Bool(false)));
    }

    #[test]
    fn test_toggle_back_on_reannotates() {
        let mut dom = page();
        let mut engine = engine();
        engine.handle_message(&mut dom, ControlMessage::Toggle { enabled: false });
        engine.handle_message(&mut dom, ControlMessage::Toggle { enabled: true });

        let ps = paragraphs(&dom);
        assert!(dom.has_class(ps[0], RTL_CLASS));
    }

    #[test]
    fn test_set_mode_rewalks() {
        let mut dom = page();
        let mut engine = engine();
        engine.annotate_page(&mut dom);
        engine.handle_message(&mut dom, ControlMessage::SetMode { mode: AlignmentMode::Force });

        assert_eq!(engine.config().mode, AlignmentMode::Force);
        // The walk still runs; per-block flags are first-word based, so the
        // Hebrew paragraph stays RTL after the re-walk
        let ps = paragraphs(&dom);
        assert!(dom.has_class(ps[0], RTL_CLASS));
        assert_eq!(
            engine.resolve_direction("Hello שלום"),
            Direction::Rtl,
            "force mode resolves any Hebrew text RTL"
        );
    }

    #[test]
    fn test_disabled_at_startup() {
        let mut store = MemoryStore::new();
        store.set(ENABLED_KEY, Value::Bool(false));
        let engine = Engine::new("claude.ai", store);

        let mut dom = page();
        engine.annotate_page(&mut dom);
        for p in paragraphs(&dom) {
            assert_eq!(dom.attr(p, "dir"), None);
        }
    }

    #[test]
    fn test_message_wire_format() {
        let msg: ControlMessage =
            serde_json::from_str(r#"{"action":"toggle","enabled":false}"#).unwrap();
        assert_eq!(msg, ControlMessage::Toggle { enabled: false });

        let msg: ControlMessage =
            serde_json::from_str(r#"{"action":"setMode","mode":"auto"}"#).unwrap();
        assert_eq!(
            msg,
            ControlMessage::SetMode {
                mode: AlignmentMode::Auto
            }
        );
    }
}
