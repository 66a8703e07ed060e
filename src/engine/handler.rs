//! Per-request rule evaluation.
//!
//! # Data Flow
//! ```text
//! RewriteRequest
//!     → method filter            (miss → Passthrough)
//!     → source pattern match     (miss → Passthrough)
//!     → async filter, if any     (resolves false → Passthrough)
//!     → destination expansion ($n / :name)
//!     → original query re-appended, query map resynced
//!     → RewriteOutcome::{Redispatch, Continue}
//! ```
//!
//! # Design Decisions
//! - All per-request state lives in the `apply` frame; the rewriter is
//!   shared immutably across concurrent requests
//! - The filter await is the sole suspension point and the request is not
//!   touched until it settles
//! - A vetoed or unmatched request is left byte-for-byte unchanged

use std::fmt;

use tracing::debug;

use crate::engine::spec::MethodSet;
use crate::engine::substitute::{expand, Token};
use crate::filter::Filter;
use crate::pattern::{CompiledPattern, MatchResult};
use crate::request::RewriteRequest;

/// What the host should do after [`Rewriter::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The rule did not apply; invoke the next handler unchanged.
    Passthrough,
    /// The rewrite committed in pure-substitution mode; continue to the
    /// next handler with the mutated request.
    Continue,
    /// The rewrite committed against a source pattern; restart route
    /// matching from the top with the mutated path.
    Redispatch,
}

/// A compiled rewrite rule.
///
/// Built once, then shared across concurrent requests; nothing in here
/// mutates after construction.
pub struct Rewriter {
    source: Option<CompiledPattern>,
    destination: String,
    methods: MethodSet,
    filter: Option<Filter>,
}

impl fmt::Debug for Rewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rewriter")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("methods", &self.methods)
            .field("filter", &self.filter.as_ref().map(|_| "<filter>"))
            .finish()
    }
}

impl Rewriter {
    pub(crate) fn assemble(
        source: Option<CompiledPattern>,
        destination: String,
        methods: MethodSet,
        filter: Option<Filter>,
    ) -> Self {
        Self {
            source,
            destination,
            methods,
            filter,
        }
    }

    /// Apply the rule to one request.
    pub async fn apply(&self, request: &mut RewriteRequest) -> RewriteOutcome {
        if !self.methods.allows(request.method()) {
            return RewriteOutcome::Passthrough;
        }

        // Matching runs against the path only so capture groups never
        // span into the query string.
        let matched = match &self.source {
            Some(pattern) => match pattern.matches(request.path()) {
                Some(result) => Some(result),
                None => return RewriteOutcome::Passthrough,
            },
            None => None,
        };

        if let Some(filter) = self.filter.as_deref() {
            if !filter(matched.as_ref(), request).await {
                return RewriteOutcome::Passthrough;
            }
        }

        let original = request.url().to_owned();
        // Everything after the first `?`, captured before any mutation.
        let preserved = original.find('?').map(|at| original[at + 1..].to_owned());

        let mut url = self.substitute(matched.as_ref(), request);
        if let Some(query) = preserved {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }

        request.set_url(url);
        debug!(from = %original, to = %request.url(), "rewrote request url");
        if request.url().contains('?') {
            debug!(query = ?request.query(), "resynced query map");
        }

        if self.source.is_some() {
            RewriteOutcome::Redispatch
        } else {
            RewriteOutcome::Continue
        }
    }

    fn substitute(&self, matched: Option<&MatchResult>, request: &RewriteRequest) -> String {
        match matched {
            Some(result) => {
                let index = self.source.as_ref().map(CompiledPattern::capture_index);
                expand(&self.destination, |token| match token {
                    Token::Slot(slot) => result.get(slot).map(str::to_owned),
                    Token::Name(name) => index
                        .and_then(|index| index.position(name))
                        .and_then(|position| result.get(position + 1))
                        .map(str::to_owned),
                })
            }
            None => expand(&self.destination, |token| match token {
                Token::Slot(slot) => request.param(&slot.to_string()).map(str::to_owned),
                Token::Name(name) => request.param(name).map(str::to_owned),
            }),
        }
    }
}
