//! Tower integration.
//!
//! # Responsibilities
//! - Run an ordered rule list ahead of an inner service
//! - Honor control signals: Redispatch restarts the list against the
//!   rewritten path, Continue moves on to the next rule
//! - Write the final url back into the request URI
//!
//! # Design Decisions
//! - Redispatch passes are capped; a rule set that keeps rewriting its
//!   own output is a configuration cycle, not a request error
//! - Route params for pure-substitution rules come from a `RouteParams`
//!   extension when the host provides one

use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::uri::{PathAndQuery, Uri};
use http::Request;
use tower::{Layer, Service};
use tracing::warn;

use crate::engine::{RewriteOutcome, Rewriter};
use crate::request::{RewriteRequest, RouteParams};

/// Ceiling on redispatch passes over the rule list.
const MAX_PASSES: usize = 8;

/// Layer applying an ordered rewrite rule list ahead of the inner
/// service.
#[derive(Clone)]
pub struct RewriteLayer {
    rules: Arc<[Rewriter]>,
}

impl RewriteLayer {
    pub fn new(rules: impl Into<Vec<Rewriter>>) -> Self {
        Self {
            rules: rules.into().into(),
        }
    }
}

impl<S> Layer<S> for RewriteLayer {
    type Service = RewriteService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RewriteService {
            inner,
            rules: self.rules.clone(),
        }
    }
}

/// `tower::Service` produced by [`RewriteLayer`].
#[derive(Clone)]
pub struct RewriteService<S> {
    inner: S,
    rules: Arc<[Rewriter]>,
}

impl<S, B> Service<Request<B>> for RewriteService<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // Take the service that was driven to readiness, leave a fresh
        // clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let rules = self.rules.clone();

        Box::pin(async move {
            let url = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_owned())
                .unwrap_or_else(|| req.uri().path().to_owned());
            let params = req
                .extensions()
                .get::<RouteParams>()
                .map(|params| params.0.clone())
                .unwrap_or_default();
            let mut context = RewriteRequest::new(req.method().clone(), url).with_params(params);

            if run_rules(&rules, &mut context).await {
                apply_uri(&mut req, context.url());
            }
            inner.call(req).await
        })
    }
}

/// Evaluate the rule list, restarting from the top on `Redispatch`.
async fn run_rules(rules: &[Rewriter], context: &mut RewriteRequest) -> bool {
    let mut rewritten = false;
    let mut passes = 0;
    'pass: loop {
        passes += 1;
        for rule in rules {
            match rule.apply(context).await {
                RewriteOutcome::Passthrough => {}
                RewriteOutcome::Continue => rewritten = true,
                RewriteOutcome::Redispatch => {
                    rewritten = true;
                    if passes < MAX_PASSES {
                        continue 'pass;
                    }
                    warn!(passes, url = %context.url(), "redispatch ceiling reached");
                    break 'pass;
                }
            }
        }
        break;
    }
    rewritten
}

/// Swap the rewritten url into the request URI, keeping scheme and
/// authority.
fn apply_uri<B>(req: &mut Request<B>, url: &str) {
    let path_and_query = match url.parse::<PathAndQuery>() {
        Ok(pq) => pq,
        Err(error) => {
            warn!(%error, url, "rewritten url is not a valid uri; keeping original");
            return;
        }
    };

    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    match Uri::from_parts(parts) {
        Ok(uri) => *req.uri_mut() = uri,
        Err(error) => warn!(%error, url, "rewritten uri rejected; keeping original"),
    }
}
