//! Rule-file schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::engine::{Rewrite, Rewriter};
use crate::error::RewriteError;

/// Root of a rewrite rule file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RewriteConfig {
    /// Ordered rewrite rules, evaluated top to bottom.
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

/// One declarative rewrite rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Source pattern; absent means pure substitution from route params.
    #[serde(default)]
    pub source: Option<String>,

    /// Destination template with `$n` / `:name` tokens.
    pub destination: String,

    /// Methods the rule applies to; `["*"]` means all.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
}

fn default_methods() -> Vec<String> {
    vec!["*".to_string()]
}

impl RuleConfig {
    /// Compile into a [`Rewriter`]. Filters are code-only and cannot be
    /// expressed in a rule file.
    pub fn build(&self) -> Result<Rewriter, RewriteError> {
        let rewrite = match &self.source {
            Some(source) => Rewrite::new(source.as_str(), &self.destination),
            None => Rewrite::to(&self.destination),
        };
        rewrite.methods(&self.methods).build()
    }
}
