//! Domain synonym expansion for fault descriptions.
//!
//! Operators describe the same fault many ways ("聲音" vs "異音", "馬達" vs
//! "motor"). Every rule whose trigger occurs in the lowercased query appends
//! its expansion, in rule order. The original query text is kept verbatim at
//! the front.

use casebook_core::config::{SynonymRule, default_synonyms};

/// Ordered trigger → expansion table.
#[derive(Debug, Clone)]
pub struct SynonymExpander {
    /// `(lowercased trigger, expansion)`.
    rules: Vec<(String, String)>,
}

impl SynonymExpander {
    #[must_use]
    pub fn new(rules: &[SynonymRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .filter(|r| !r.trigger.is_empty())
                .map(|r| (r.trigger.to_lowercase(), r.expansion.clone()))
                .collect(),
        }
    }

    /// Append the expansion of every trigger found in `query`.
    #[must_use]
    pub fn expand(&self, query: &str) -> String {
        let lowered = query.to_lowercase();
        let mut out = query.to_string();
        for (trigger, expansion) in &self.rules {
            if lowered.contains(trigger.as_str()) {
                out.push(' ');
                out.push_str(expansion);
            }
        }
        out
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

impl Default for SynonymExpander {
    fn default() -> Self {
        Self::new(&default_synonyms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn appends_matching_expansions_in_rule_order() {
        let expander = SynonymExpander::default();
        assert_eq!(
            expander.expand("馬達聲音很大"),
            "馬達聲音很大 異音 噪音 吵雜 聲響 motor"
        );
    }

    #[test]
    fn trigger_match_is_case_insensitive_and_keeps_casing() {
        let expander = SynonymExpander::default();
        assert_eq!(expander.expand("Sensor 沒反應"), "Sensor 沒反應 感應器 光電");
    }

    #[test]
    fn no_trigger_leaves_query_untouched() {
        let expander = SynonymExpander::default();
        assert_eq!(expander.expand("油壓不足"), "油壓不足");
        assert_eq!(expander.expand(""), "");
    }

    #[test]
    fn empty_triggers_are_ignored() {
        let expander = SynonymExpander::new(&[SynonymRule {
            trigger: String::new(),
            expansion: "everything".into(),
        }]);
        assert!(expander.is_empty());
        assert_eq!(expander.expand("abc"), "abc");
    }

    proptest! {
        #[test]
        fn expansion_never_drops_original_tokens(query in "[a-z馬達聲音皮帶 ]{0,16}") {
            let expander = SynonymExpander::default();
            let expanded = expander.expand(&query);
            prop_assert!(expanded.starts_with(&query));
            for token in query.split_whitespace() {
                prop_assert!(expanded.split_whitespace().any(|t| t == token));
            }
        }

        #[test]
        fn re_expanding_keeps_every_token(query in "[a-z馬達聲音皮帶溫度 ]{0,16}") {
            let expander = SynonymExpander::default();
            let once = expander.expand(&query);
            let twice = expander.expand(&once);
            prop_assert!(twice.starts_with(&once));
            for token in once.split_whitespace() {
                prop_assert!(twice.split_whitespace().any(|t| t == token));
            }
        }
    }
}
