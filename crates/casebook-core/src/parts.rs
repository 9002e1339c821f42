//! Rule-based part risk classification.
//!
//! Parts in a maintenance kit are flagged by matching their description
//! against curated part-code fragments for a `(model, interval)` pair:
//!
//! | Match                    | Tier     | Icon |
//! |--------------------------|----------|------|
//! | any `red` fragment       | `Red`    | 🔴   |
//! | else any `green` fragment| `Green`  | 🟢   |
//! | otherwise / no rule      | `Normal` | 🔩   |
//!
//! Containment is case-sensitive: fragments are alphanumeric part codes.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{PartRuleConfig, default_part_rules};

/// Maintenance word stripped from interval labels (`"500K保養"` → `"500K"`).
pub const MAINTENANCE_WORD: &str = "保養";

/// Canonical lookup bucket for a raw interval label.
///
/// Strips [`MAINTENANCE_WORD`], uppercases, and trims, so `"500k保養"`,
/// `"500K保養"` and `" 500K "` all map to `"500K"`.
#[must_use]
pub fn canonical_interval(label: &str) -> String {
    label
        .replace(MAINTENANCE_WORD, "")
        .to_uppercase()
        .trim()
        .to_string()
}

/// Risk tier of a replacement part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartTier {
    /// Critical part; matched a red fragment.
    Red,
    /// Routine wear part; matched a green fragment.
    Green,
    /// No special classification.
    Normal,
}

impl PartTier {
    /// Display glyph for this tier.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Red => "🔴",
            Self::Green => "🟢",
            Self::Normal => "🔩",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Normal => "normal",
        }
    }
}

/// Red and green code fragments for one `(model, interval)` bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartColorRule {
    pub red: Vec<String>,
    pub green: Vec<String>,
}

impl PartColorRule {
    /// Red fragments take priority over green ones.
    #[must_use]
    pub fn tier_of(&self, part_text: &str) -> PartTier {
        if self.red.iter().any(|code| part_text.contains(code.as_str())) {
            PartTier::Red
        } else if self.green.iter().any(|code| part_text.contains(code.as_str())) {
            PartTier::Green
        } else {
            PartTier::Normal
        }
    }
}

/// Static classification table keyed by `(model, canonical interval)`.
#[derive(Debug, Clone, Default)]
pub struct PartRuleTable {
    rules: HashMap<(String, String), PartColorRule>,
}

impl PartRuleTable {
    /// Build the table, canonicalizing every interval key.
    ///
    /// A later entry for an already-seen bucket replaces the earlier one.
    #[must_use]
    pub fn from_config(entries: &[PartRuleConfig]) -> Self {
        let mut rules = HashMap::with_capacity(entries.len());
        for entry in entries {
            let key = (entry.model.clone(), canonical_interval(&entry.interval));
            let rule = PartColorRule {
                red: entry.red.clone(),
                green: entry.green.clone(),
            };
            if rules.insert(key, rule).is_some() {
                warn!(
                    model = %entry.model,
                    interval = %entry.interval,
                    "duplicate part rule bucket; later entry wins"
                );
            }
        }
        Self { rules }
    }

    /// Rule for a model and raw interval label, if one exists.
    #[must_use]
    pub fn rule(&self, model: &str, interval_label: &str) -> Option<&PartColorRule> {
        self.rules
            .get(&(model.to_string(), canonical_interval(interval_label)))
    }

    /// Classify a part description for a model and raw interval label.
    #[must_use]
    pub fn classify(
        &self,
        part_text: &str,
        model: &str,
        interval_label: &str,
    ) -> (PartTier, &'static str) {
        let tier = self
            .rule(model, interval_label)
            .map_or(PartTier::Normal, |rule| rule.tier_of(part_text));
        (tier, tier.icon())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static BUILT_IN_RULES: LazyLock<PartRuleTable> =
    LazyLock::new(|| PartRuleTable::from_config(&default_part_rules()));

/// Classify a part against the built-in rule tables.
///
/// Use [`PartRuleTable::classify`] when rules come from configuration.
#[must_use]
pub fn classify_part(part_text: &str, model: &str, interval_label: &str) -> (PartTier, &'static str) {
    BUILT_IN_RULES.classify(part_text, model, interval_label)
}
