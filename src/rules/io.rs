//! Reading and writing rule configurations as JSON files

use super::config::RuleConfig;
use crate::error::RuleError;
use std::path::Path;

/// Parse a rule configuration from its JSON representation
pub fn parse_rule(content: &str) -> Result<RuleConfig, RuleError> {
    Ok(serde_json::from_str(content)?)
}

/// Render a rule configuration as pretty-printed JSON
pub fn rule_to_json(config: &RuleConfig) -> Result<String, RuleError> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Load a rule configuration from a JSON file
pub fn load_rule_from_file<P: AsRef<Path>>(path: P) -> Result<RuleConfig, RuleError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_rule(&content)
}

/// Save a rule configuration to a JSON file
pub fn save_rule_to_file<P: AsRef<Path>>(config: &RuleConfig, path: P) -> Result<(), RuleError> {
    let path = path.as_ref();
    let content = rule_to_json(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| RuleError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, content).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })
}
