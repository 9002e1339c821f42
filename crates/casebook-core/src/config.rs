use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Project configuration, loaded from `.casebook/config.toml`.
///
/// List sections (`synonyms`, `part_rules`) replace the built-in tables
/// wholesale when present in a file; they are not merged entry by entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default = "default_synonyms")]
    pub synonyms: Vec<SynonymRule>,
    #[serde(default = "default_part_rules")]
    pub part_rules: Vec<PartRuleConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            synonyms: default_synonyms(),
            part_rules: default_part_rules(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of ranked cases returned.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Cases must score strictly above this to be returned.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    /// Allow the character n-gram vector signal when compiled in.
    #[serde(default = "default_true")]
    pub vector: bool,
    /// Allow the fuzzy token-set signal when compiled in.
    #[serde(default = "default_true")]
    pub fuzzy: bool,
    #[serde(default)]
    pub weights: SearchWeights,
    /// Prefix for external web-search fallback links.
    #[serde(default = "default_fallback_search_url")]
    pub fallback_search_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_score: default_min_score(),
            vector: default_true(),
            fuzzy: default_true(),
            weights: SearchWeights::default(),
            fallback_search_url: default_fallback_search_url(),
        }
    }
}

/// Weights for the blended relevance score:
///
/// `S = vector*cos + fuzzy_topic*F(topic) + fuzzy_cause*F(cause) + keyword*K`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchWeights {
    #[serde(default = "default_vector_weight")]
    pub vector: f32,
    #[serde(default = "default_fuzzy_topic_weight")]
    pub fuzzy_topic: f32,
    #[serde(default = "default_fuzzy_cause_weight")]
    pub fuzzy_cause: f32,
    #[serde(default = "default_keyword_weight")]
    pub keyword: f32,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            vector: default_vector_weight(),
            fuzzy_topic: default_fuzzy_topic_weight(),
            fuzzy_cause: default_fuzzy_cause_weight(),
            keyword: default_keyword_weight(),
        }
    }
}

/// A trigger phrase and the text appended to queries that contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymRule {
    pub trigger: String,
    pub expansion: String,
}

impl SynonymRule {
    fn new(trigger: &str, expansion: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            expansion: expansion.to_string(),
        }
    }
}

/// Red/green part-code fragments for one `(model, interval)` pair.
///
/// `interval` may be written the way the schedule labels it (`"500k保養"`);
/// it is canonicalized when the rule table is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRuleConfig {
    pub model: String,
    pub interval: String,
    #[serde(default)]
    pub red: Vec<String>,
    #[serde(default)]
    pub green: Vec<String>,
}

/// Resolve the effective configuration.
///
/// Precedence: an explicit file, then `<project>/.casebook/config.toml`,
/// then `<config dir>/casebook/config.toml`, then built-in defaults.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<ProjectConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let project_path = project_root.join(".casebook/config.toml");
    if project_path.exists() {
        return load_config_file(&project_path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join("casebook/config.toml");
        if user_path.exists() {
            return load_config_file(&user_path);
        }
    }

    debug!("no config file found, using built-in defaults");
    Ok(ProjectConfig::default())
}

/// Load `<project>/.casebook/config.toml`, or defaults when it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".casebook/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_config_file(&path)
}

/// Parse a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

const fn default_true() -> bool {
    true
}

const fn default_max_results() -> usize {
    10
}

const fn default_min_score() -> f32 {
    0.15
}

const fn default_vector_weight() -> f32 {
    0.6
}

const fn default_fuzzy_topic_weight() -> f32 {
    0.3
}

const fn default_fuzzy_cause_weight() -> f32 {
    0.1
}

const fn default_keyword_weight() -> f32 {
    0.2
}

fn default_fallback_search_url() -> String {
    "https://www.google.com/search?q=".to_string()
}

/// Built-in domain synonyms, in application order.
#[must_use]
pub fn default_synonyms() -> Vec<SynonymRule> {
    vec![
        SynonymRule::new("聲音", "異音 噪音 吵雜 聲響"),
        SynonymRule::new("怪聲", "異音 磨損"),
        SynonymRule::new("不動", "卡死 異常 停止 無法運作失效"),
        SynonymRule::new("壞掉", "異常 故障 損壞"),
        SynonymRule::new("溫度", "過熱 發燙 高溫"),
        SynonymRule::new("漏水", "洩漏 滲水"),
        SynonymRule::new("轉速", "速度 變慢"),
        SynonymRule::new("sensor", "感應器 光電"),
        SynonymRule::new("馬達", "motor"),
        SynonymRule::new("皮帶", "斷裂 磨損"),
        SynonymRule::new("飛板", "fly board 驅動板"),
    ]
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| (*c).to_string()).collect()
}

/// Built-in part classification tables.
#[must_use]
pub fn default_part_rules() -> Vec<PartRuleConfig> {
    const BEARING_RED_1M: &[&str] = &[
        "B2476", "B1556", "T2400", "T2670", "D2487", "D2488", "D2510", "D3611", "D2354", "D2355",
        "D2356", "D2348", "D2349", "D2602",
    ];
    const BEARING_GREEN_1M: &[&str] = &[
        "B1008", "B695", "B992", "B1041", "B1054", "B993", "D3466", "D2642", "D2643", "D2443",
        "D2674", "D2347", "E2646", "E2647", "D2481", "D2664", "D3496", "D1614", "D3053", "D2449",
        "D2568", "D2340", "D2567", "D120", "D121",
    ];
    const HGT_RED: &[&str] = &[
        "B1556", "B2476", "T2670", "D3089", "D3090", "D3523", "D3524", "D2602", "D3494", "D3462",
        "D3463", "D2487", "D2488", "D3254",
    ];
    const HGT_GREEN_1M: &[&str] = &[
        "D3530", "D3529", "B695", "B992", "D3213", "D3176", "D3181", "D2514", "D3496", "D2347",
        "D2510", "D3166", "D3167", "D2798", "D3215", "D2340", "E2646", "E2647", "D2481", "D2664",
    ];

    let mut bearing_red_500k = codes(BEARING_RED_1M);
    bearing_red_500k.push("D2362".to_string());

    vec![
        PartRuleConfig {
            model: "420單向軸承".to_string(),
            interval: "500K".to_string(),
            red: bearing_red_500k,
            green: Vec::new(),
        },
        PartRuleConfig {
            model: "420單向軸承".to_string(),
            interval: "1M".to_string(),
            red: codes(BEARING_RED_1M),
            green: codes(BEARING_GREEN_1M),
        },
        PartRuleConfig {
            model: "HGT-421".to_string(),
            interval: "500K".to_string(),
            red: codes(HGT_RED),
            green: Vec::new(),
        },
        PartRuleConfig {
            model: "HGT-421".to_string(),
            interval: "1M".to_string(),
            red: codes(HGT_RED),
            green: codes(HGT_GREEN_1M),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg, ProjectConfig::default());
        assert_eq!(cfg.search.max_results, 10);
        assert!((cfg.search.min_score - 0.15).abs() < f32::EPSILON);
        assert!(cfg.search.vector);
        assert!(cfg.search.fuzzy);
        assert_eq!(cfg.synonyms.len(), 11);
        assert_eq!(cfg.part_rules.len(), 4);
    }

    #[test]
    fn default_weights_are_canonical_triple() {
        let w = SearchWeights::default();
        assert!((w.vector - 0.6).abs() < f32::EPSILON);
        assert!((w.fuzzy_topic - 0.3).abs() < f32::EPSILON);
        assert!((w.fuzzy_cause - 0.1).abs() < f32::EPSILON);
        assert!((w.keyword - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_file_keeps_defaults_for_unset_fields() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join(".casebook");
        std::fs::create_dir_all(&dir).expect("create config dir");
        std::fs::write(
            dir.join("config.toml"),
            r"
[search]
max_results = 5
fuzzy = false

[search.weights]
keyword = 0.5
",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.search.max_results, 5);
        assert!(!cfg.search.fuzzy);
        assert!(cfg.search.vector);
        assert!((cfg.search.weights.keyword - 0.5).abs() < f32::EPSILON);
        assert!((cfg.search.weights.vector - 0.6).abs() < f32::EPSILON);
        assert_eq!(cfg.synonyms, default_synonyms());
    }

    #[test]
    fn synonym_section_replaces_defaults() {
        let cfg: ProjectConfig = toml::from_str(
            r#"
[[synonyms]]
trigger = "pump"
expansion = "泵浦 抽水"
"#,
        )
        .expect("parse");
        assert_eq!(cfg.synonyms, vec![SynonymRule::new("pump", "泵浦 抽水")]);
        assert_eq!(cfg.part_rules, default_part_rules());
    }

    #[test]
    fn explicit_path_wins() {
        let root = tempfile::tempdir().expect("tempdir");
        let explicit = root.path().join("custom.toml");
        std::fs::write(&explicit, "[search]\nmin_score = 0.3\n").expect("write config");

        let cfg = resolve_config(root.path(), Some(&explicit)).expect("resolve");
        assert!((cfg.search.min_score - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_file_reports_path() {
        let root = tempfile::tempdir().expect("tempdir");
        let path = root.path().join("broken.toml");
        std::fs::write(&path, "[search\n").expect("write config");

        let err = load_config_file(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.toml"));
    }

    #[test]
    fn bearing_500k_red_list_has_extra_code() {
        let rules = default_part_rules();
        let r500 = &rules[0];
        let r1m = &rules[1];
        assert!(r500.red.iter().any(|c| c == "D2362"));
        assert!(!r1m.red.iter().any(|c| c == "D2362"));
        assert!(r500.green.is_empty());
        assert!(r1m.green.iter().any(|c| c == "D120"));
    }
}
