//! Async veto filters.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::pattern::MatchResult;
use crate::request::RewriteRequest;

/// Async predicate consulted after a successful match and before the
/// rewrite commits.
///
/// Resolving to `false` vetoes the rewrite and the request passes through
/// untouched; any other outcome lets the rewrite proceed. The match result
/// is `None` for rules without a source pattern. The returned future may
/// not borrow its arguments; copy what the decision needs before going
/// async.
pub type Filter = Arc<
    dyn Fn(Option<&MatchResult>, &RewriteRequest) -> BoxFuture<'static, bool> + Send + Sync,
>;

/// Wrap a future-returning closure into a [`Filter`].
pub fn filter_fn<F, Fut>(f: F) -> Filter
where
    F: Fn(Option<&MatchResult>, &RewriteRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    Arc::new(move |matched, request| Box::pin(f(matched, request)))
}
