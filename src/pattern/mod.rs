//! Pattern compilation and capture bookkeeping.
//!
//! # Data Flow
//! ```text
//! SourcePattern (path template or prebuilt Regex)
//!     → compiler.rs (compile to anchored regex + capture descriptors)
//!     → captures.rs (index named descriptors by name)
//!     → Frozen inside a Rewriter, shared across requests
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once at rule construction, immutable at runtime
//! - Malformed patterns fail the build, never a request
//! - Descriptor order is the compiler's group order and determines which
//!   match slot a named capture reads

pub mod captures;
pub mod compiler;

pub use captures::{CaptureDescriptor, CaptureIndex, CaptureName, MatchResult};
pub use compiler::{CompiledPattern, SourcePattern};
