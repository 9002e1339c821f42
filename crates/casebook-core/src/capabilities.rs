//! Capability descriptor for the optional relevance signals.
//!
//! The vector (character n-gram TF-IDF) and fuzzy (token-set ratio) signals
//! can be compiled out via the `vector` / `fuzzy` cargo features, or switched
//! off in `[search]` config. Ranking never fails because one is missing: the
//! scorer set receives a [`Capabilities`] value and a disabled signal simply
//! contributes zero. Keyword containment has no dependency and is always on.
//!
//! # Usage
//!
//! ```rust
//! use casebook_core::capabilities::{describe_capabilities, detect_capabilities};
//! use casebook_core::config::SearchConfig;
//!
//! let caps = detect_capabilities(&SearchConfig::default());
//! for status in describe_capabilities(&caps) {
//!     if !status.available {
//!         eprintln!("[{}] degraded: {}", status.name, status.fallback);
//!     }
//! }
//! ```

use serde::Serialize;
use tracing::debug;

use crate::config::SearchConfig;

/// Which optional signals are active for a ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Character n-gram TF-IDF cosine similarity.
    pub vector: bool,
    /// Token-set fuzzy ratio against topic and cause.
    pub fuzzy: bool,
}

impl Capabilities {
    /// Every optional signal enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            vector: true,
            fuzzy: true,
        }
    }

    /// Keyword containment only.
    #[must_use]
    pub const fn keyword_only() -> Self {
        Self {
            vector: false,
            fuzzy: false,
        }
    }

    /// Signals compiled into this build.
    #[must_use]
    pub const fn compiled() -> Self {
        Self {
            vector: cfg!(feature = "vector"),
            fuzzy: cfg!(feature = "fuzzy"),
        }
    }

    /// Keep only signals enabled in both `self` and `other`.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self {
            vector: self.vector && other.vector,
            fuzzy: self.fuzzy && other.fuzzy,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::compiled()
    }
}

/// Status of a single capability for user-visible display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    /// Short machine-readable name of the capability.
    pub name: &'static str,
    /// Whether the capability is currently available.
    pub available: bool,
    /// What ranking does when this capability is missing.
    pub fallback: &'static str,
}

/// Combine compiled-in signals with the config toggles.
#[must_use]
pub fn detect_capabilities(config: &SearchConfig) -> Capabilities {
    let caps = Capabilities::compiled().intersect(Capabilities {
        vector: config.vector,
        fuzzy: config.fuzzy,
    });
    debug!(?caps, "capability detection complete");
    caps
}

/// Describe which capabilities are active or missing, in a stable order.
#[must_use]
pub fn describe_capabilities(caps: &Capabilities) -> Vec<CapabilityStatus> {
    vec![
        CapabilityStatus {
            name: "vector",
            available: caps.vector,
            fallback: "n-gram similarity contributes 0; ranking uses fuzzy + keyword",
        },
        CapabilityStatus {
            name: "fuzzy",
            available: caps.fuzzy,
            fallback: "token-set similarity contributes 0; ranking uses vector + keyword",
        },
        CapabilityStatus {
            name: "keyword",
            available: true,
            fallback: "always available",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_toggles_disable_signals() {
        let config = SearchConfig {
            vector: false,
            ..SearchConfig::default()
        };
        let caps = detect_capabilities(&config);
        assert!(!caps.vector);
        assert_eq!(caps.fuzzy, cfg!(feature = "fuzzy"));
    }

    #[test]
    fn intersect_keeps_common_signals() {
        let caps = Capabilities::all().intersect(Capabilities {
            vector: true,
            fuzzy: false,
        });
        assert_eq!(
            caps,
            Capabilities {
                vector: true,
                fuzzy: false
            }
        );
        assert_eq!(
            Capabilities::all().intersect(Capabilities::keyword_only()),
            Capabilities::keyword_only()
        );
    }

    #[test]
    fn keyword_is_always_reported_available() {
        let statuses = describe_capabilities(&Capabilities::keyword_only());
        let names: Vec<_> = statuses.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["vector", "fuzzy", "keyword"]);
        assert!(!statuses[0].available);
        assert!(!statuses[1].available);
        assert!(statuses[2].available);
    }
}
