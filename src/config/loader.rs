//! Rule-file loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::schema::RewriteConfig;
use crate::engine::Rewriter;
use crate::error::RewriteError;

/// Error type for rule-file loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A rule failed semantic validation; `index` is its position in the
    /// file, counted from zero.
    #[error("rule {index}: {source}")]
    Rule {
        index: usize,
        #[source]
        source: RewriteError,
    },

    #[error("rule {index}: destination template is empty")]
    EmptyDestination { index: usize },
}

/// Load a TOML rule file and compile every rule.
///
/// Compilation happens at load time so a malformed pattern is a
/// configuration error, never a request-time one.
pub fn load_rules(path: &Path) -> Result<Vec<Rewriter>, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_rules(&content)
}

/// Parse and compile rules from TOML text.
pub fn parse_rules(content: &str) -> Result<Vec<Rewriter>, ConfigError> {
    let config: RewriteConfig = toml::from_str(content)?;
    let rules = config
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            if rule.destination.is_empty() {
                return Err(ConfigError::EmptyDestination { index });
            }
            rule.build()
                .map_err(|source| ConfigError::Rule { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rules = rules.len(), "compiled rewrite rule file");
    Ok(rules)
}
