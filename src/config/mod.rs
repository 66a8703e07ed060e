//! Declarative rule files.
//!
//! # Data Flow
//! ```text
//! rule file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs (typed rules, defaulted fields)
//!     → every rule compiled (fail fast on bad patterns)
//!     → Vec<Rewriter>, immutable, shared by the host
//! ```
//!
//! # Design Decisions
//! - Rules are immutable once loaded; changes require a full reload
//! - Validation separates syntactic (serde) from semantic (compilation)
//! - Filters are code-only and never appear in rule files

pub mod loader;
pub mod schema;

pub use loader::{load_rules, parse_rules, ConfigError};
pub use schema::{RewriteConfig, RuleConfig};
