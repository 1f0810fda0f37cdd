//! Analyzer configuration

use serde::{Deserialize, Serialize};

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Resolve a transparent background from the nearest painted ancestor.
    #[serde(default)]
    pub walk_ancestor_background: bool,

    /// Validate ARIA attributes and role.
    #[serde(default = "default_include_aria")]
    pub include_aria: bool,

    /// Criterion ids ("1.4.3", ...) to skip.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

fn default_include_aria() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            walk_ancestor_background: false,
            include_aria: default_include_aria(),
            disabled_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AnalyzerConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert!(config.include_aria);
    }

    #[test]
    fn test_partial_toml() {
        let config: AnalyzerConfig = toml::from_str(
            r#"
            walk_ancestor_background = true
            disabled_rules = ["2.4.3"]
            "#,
        )
        .unwrap();
        assert!(config.walk_ancestor_background);
        assert!(config.include_aria);
        assert_eq!(config.disabled_rules, vec!["2.4.3".to_string()]);
    }
}
