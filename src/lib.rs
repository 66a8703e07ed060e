//! URL rewrite middleware for Tower services.
//!
//! Matches request paths against source patterns, substitutes captured
//! parameters into a destination template, preserves the query string,
//! filters by HTTP method, and supports an async veto hook before a
//! rewrite commits.
//!
//! ```
//! use urlrewrite::Rewrite;
//!
//! let rule = Rewrite::new("/people/:id", "/users/:id").build().unwrap();
//! # let _ = rule;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod layer;
pub mod pattern;
pub mod request;

pub use engine::{MethodSet, Rewrite, RewriteOutcome, Rewriter};
pub use error::{RewriteError, RewriteResult};
pub use filter::{filter_fn, Filter};
pub use layer::{RewriteLayer, RewriteService};
pub use pattern::{MatchResult, SourcePattern};
pub use request::{RewriteRequest, RouteParams};
