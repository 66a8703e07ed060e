//! Rule construction and per-request evaluation.
//!
//! # Data Flow
//! ```text
//! Rewrite builder (pattern, destination, methods, filter)
//!     → spec.rs (normalize methods, compile pattern, fail fast)
//!     → handler.rs (Rewriter, shared across requests)
//!     → substitute.rs (token expansion per committed rewrite)
//! ```

pub mod handler;
pub mod spec;
pub mod substitute;

pub use handler::{RewriteOutcome, Rewriter};
pub use spec::{MethodSet, Rewrite};
