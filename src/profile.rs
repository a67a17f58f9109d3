//! Site profiles: which elements are message containers on which site.
//!
//! Each supported chat site gets an ordered list of selector patterns that
//! locate message containers worth annotating. The table is static input
//! data; lookup happens once per page by hostname substring, falling back to
//! a generic profile for unknown sites.

/// Selector patterns identifying message containers on one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteProfile {
    /// Hostname substring this profile applies to; empty for the fallback.
    pub host: &'static str,
    /// Ordered selector patterns for message containers.
    pub selectors: &'static [&'static str],
}

/// Fallback profile for unknown sites.
pub const DEFAULT_PROFILE: SiteProfile = SiteProfile {
    host: "",
    selectors: &[
        r#"[data-testid*="message"]"#,
        r#"[class*="message"]"#,
        ".markdown",
        ".prose",
    ],
};

/// Supported chat sites, checked in order.
const SUPPORTED_SITES: &[SiteProfile] = &[
    SiteProfile {
        host: "claude.ai",
        selectors: &[
            r#"[data-testid*="message"]"#,
            r#"[class*="message"]"#,
            r#"div[class*="prose"]"#,
            r#"div[class*="markdown"]"#,
        ],
    },
    SiteProfile {
        host: "chat.openai.com",
        selectors: &[
            "[data-message-author-role]",
            ".markdown",
            r#"[class*="message"]"#,
            r#"[data-testid*="conversation-turn"]"#,
        ],
    },
    SiteProfile {
        host: "chatgpt.com",
        selectors: &[
            "[data-message-author-role]",
            ".markdown",
            r#"[class*="message"]"#,
            r#"[data-testid*="conversation-turn"]"#,
        ],
    },
    SiteProfile {
        host: "gemini.google.com",
        selectors: &[
            r#"[data-test-id*="conversation-turn"]"#,
            r#"[class*="message"]"#,
            ".markdown",
            r#"[role="presentation"]"#,
        ],
    },
    SiteProfile {
        host: "perplexity.ai",
        selectors: &[
            r#"[class*="message"]"#,
            ".prose",
            r#"[role="presentation"]"#,
        ],
    },
    SiteProfile {
        host: "poe.com",
        selectors: &[r#"[class*="Message"]"#, r#"[class*="message"]"#],
    },
    SiteProfile {
        host: "character.ai",
        selectors: &[r#"[class*="message"]"#, r#"[data-testid*="message"]"#],
    },
    SiteProfile {
        host: "you.com",
        selectors: &[r#"[class*="message"]"#, r#"[data-testid*="message"]"#],
    },
];

impl SiteProfile {
    /// Find the profile for a hostname.
    ///
    /// Substring containment, first table entry wins; the fallback profile
    /// applies when nothing matches.
    pub fn for_hostname(hostname: &str) -> SiteProfile {
        SUPPORTED_SITES
            .iter()
            .find(|profile| hostname.contains(profile.host))
            .copied()
            .unwrap_or(DEFAULT_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hosts() {
        assert_eq!(SiteProfile::for_hostname("claude.ai").host, "claude.ai");
        assert_eq!(SiteProfile::for_hostname("chatgpt.com").host, "chatgpt.com");
        assert_eq!(
            SiteProfile::for_hostname("gemini.google.com").host,
            "gemini.google.com"
        );
    }

    #[test]
    fn test_subdomain_matches_by_substring() {
        assert_eq!(SiteProfile::for_hostname("www.poe.com").host, "poe.com");
    }

    #[test]
    fn test_unknown_host_falls_back() {
        let profile = SiteProfile::for_hostname("example.org");
        assert_eq!(profile, DEFAULT_PROFILE);
        assert!(!profile.selectors.is_empty());
    }

    #[test]
    fn test_all_selectors_parse_or_skip_cleanly() {
        use crate::pattern::Pattern;
        for profile in SUPPORTED_SITES.iter().chain([&DEFAULT_PROFILE]) {
            for selector in profile.selectors {
                assert!(
                    Pattern::parse(selector).is_ok(),
                    "selector {selector:?} in {:?} profile should parse",
                    profile.host
                );
            }
        }
    }
}
