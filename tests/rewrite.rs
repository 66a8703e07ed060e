//! End-to-end rewrite behavior.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use http::Method;
use urlrewrite::{filter_fn, Rewrite, RewriteOutcome, RewriteRequest};

fn request(method: Method, url: &str) -> RewriteRequest {
    RewriteRequest::new(method, url)
}

#[tokio::test]
async fn test_named_capture_rewrite_preserves_query() {
    let rule = Rewrite::new("/people/:id", "/users/:id").build().unwrap();
    let mut req = request(Method::GET, "/people/42?active=true");

    let outcome = rule.apply(&mut req).await;

    assert_eq!(outcome, RewriteOutcome::Redispatch);
    assert_eq!(req.url(), "/users/42?active=true");
    assert_eq!(req.path(), "/users/42");
    assert_eq!(req.query().get("active").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn test_positional_capture_rewrite() {
    let rule = Rewrite::new(r"/old/(\d+)", "/new/$1").build().unwrap();
    let mut req = request(Method::GET, "/old/7");

    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Redispatch);
    assert_eq!(req.url(), "/new/7");
}

#[tokio::test]
async fn test_named_and_positional_tokens_agree() {
    let named = Rewrite::new("/files/:name", "/archive/:name")
        .build()
        .unwrap();
    let positional = Rewrite::new("/files/:name", "/archive/$1").build().unwrap();

    let mut by_name = request(Method::GET, "/files/report");
    let mut by_slot = request(Method::GET, "/files/report");
    named.apply(&mut by_name).await;
    positional.apply(&mut by_slot).await;

    assert_eq!(by_name.url(), "/archive/report");
    assert_eq!(by_name.url(), by_slot.url());
}

#[tokio::test]
async fn test_no_match_passes_through() {
    let rule = Rewrite::new("/people/:id", "/users/:id").build().unwrap();
    let mut req = request(Method::GET, "/companies/42?x=1");

    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Passthrough);
    assert_eq!(req.url(), "/companies/42?x=1");
}

#[tokio::test]
async fn test_method_filter_passes_through_unchanged() {
    let rule = Rewrite::new("/a/:id", "/b/:id")
        .method("POST")
        .build()
        .unwrap();
    let mut req = request(Method::GET, "/a/1?x=2");

    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Passthrough);
    assert_eq!(req.url(), "/a/1?x=2");
}

#[tokio::test]
async fn test_method_filter_is_case_insensitive() {
    let rule = Rewrite::new("/a/:id", "/b/:id")
        .methods(["post", "put"])
        .build()
        .unwrap();

    let mut req = request(Method::PUT, "/a/1");
    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Redispatch);
    assert_eq!(req.url(), "/b/1");
}

#[tokio::test]
async fn test_filter_veto_leaves_request_unmutated() {
    let rule = Rewrite::new("/a/:id", "/b/:id")
        .filter(filter_fn(|_, _| async { false }))
        .build()
        .unwrap();
    let mut req = request(Method::GET, "/a/1?x=2");

    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Passthrough);
    assert_eq!(req.url(), "/a/1?x=2");
    assert_eq!(req.query().get("x").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn test_filter_approval_matches_unfiltered_output() {
    let plain = Rewrite::new("/a/:id", "/b/:id").build().unwrap();
    let filtered = Rewrite::new("/a/:id", "/b/:id")
        .filter(filter_fn(|_, _| async { true }))
        .build()
        .unwrap();

    let mut expected = request(Method::GET, "/a/1?x=2");
    let mut actual = request(Method::GET, "/a/1?x=2");
    let expected_outcome = plain.apply(&mut expected).await;
    let actual_outcome = filtered.apply(&mut actual).await;

    assert_eq!(actual_outcome, expected_outcome);
    assert_eq!(actual.url(), expected.url());
    assert_eq!(actual.url(), "/b/1?x=2");
}

#[tokio::test]
async fn test_filter_sees_captures_and_request() {
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let rule = Rewrite::new("/a/:id", "/b/:id")
        .filter(filter_fn(move |matched, req| {
            let capture = matched.and_then(|m| m.get(1)).map(str::to_owned);
            let method = req.method().clone();
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some((capture, method));
                true
            }
        }))
        .build()
        .unwrap();

    let mut req = request(Method::DELETE, "/a/9");
    rule.apply(&mut req).await;

    let observed = seen.lock().unwrap().clone();
    assert_eq!(observed, Some((Some("9".to_string()), Method::DELETE)));
}

#[tokio::test]
async fn test_filter_runs_once_per_matching_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let rule = Rewrite::new("/a/:id", "/b/:id")
        .filter(filter_fn(move |_, _| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }
        }))
        .build()
        .unwrap();

    let mut miss = request(Method::GET, "/other");
    rule.apply(&mut miss).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let mut hit = request(Method::GET, "/a/1");
    rule.apply(&mut hit).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_destination_only_substitutes_from_params() {
    let rule = Rewrite::to("/public/assets/js/:name").build().unwrap();
    let mut req = request(Method::GET, "/js/app.js")
        .with_params(HashMap::from([("name".to_string(), "app.js".to_string())]));

    let outcome = rule.apply(&mut req).await;

    assert_eq!(outcome, RewriteOutcome::Continue);
    assert_eq!(req.url(), "/public/assets/js/app.js");
}

#[tokio::test]
async fn test_destination_only_positional_params() {
    let rule = Rewrite::to("/static/$0").build().unwrap();
    let mut req = request(Method::GET, "/anything")
        .with_params(HashMap::from([("0".to_string(), "logo.png".to_string())]));

    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Continue);
    assert_eq!(req.url(), "/static/logo.png");
}

#[tokio::test]
async fn test_delete_constructor_pins_method() {
    let rule = Rewrite::delete("/item/:id", "/archive/:id").build().unwrap();

    let mut put = request(Method::PUT, "/item/5");
    assert_eq!(rule.apply(&mut put).await, RewriteOutcome::Passthrough);
    assert_eq!(put.url(), "/item/5");

    let mut delete = request(Method::DELETE, "/item/5");
    assert_eq!(rule.apply(&mut delete).await, RewriteOutcome::Redispatch);
    assert_eq!(delete.url(), "/archive/5");
}

#[tokio::test]
async fn test_pinned_method_ignores_later_methods_call() {
    let rule = Rewrite::post("/a/:id", "/b/:id")
        .methods(["GET"])
        .build()
        .unwrap();

    let mut get = request(Method::GET, "/a/1");
    assert_eq!(rule.apply(&mut get).await, RewriteOutcome::Passthrough);

    let mut post = request(Method::POST, "/a/1");
    assert_eq!(rule.apply(&mut post).await, RewriteOutcome::Redispatch);
}

#[tokio::test]
async fn test_template_query_joined_with_ampersand() {
    let rule = Rewrite::new("/s/:term", "/search?q=:term").build().unwrap();
    let mut req = request(Method::GET, "/s/rust?page=2");

    rule.apply(&mut req).await;

    assert_eq!(req.url(), "/search?q=rust&page=2");
    assert_eq!(req.query().get("q").map(String::as_str), Some("rust"));
    assert_eq!(req.query().get("page").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn test_unknown_token_resolves_to_empty() {
    let rule = Rewrite::new("/a/:id", "/x/:nope").build().unwrap();
    let mut req = request(Method::GET, "/a/1");

    rule.apply(&mut req).await;
    assert_eq!(req.url(), "/x/");
}

#[tokio::test]
async fn test_optional_capture_substitutes_empty_when_absent() {
    let rule = Rewrite::new("/files/:name?", "/archive/:name")
        .build()
        .unwrap();
    let mut req = request(Method::GET, "/files");

    assert_eq!(rule.apply(&mut req).await, RewriteOutcome::Redispatch);
    assert_eq!(req.url(), "/archive/");
}

#[tokio::test]
async fn test_concurrent_requests_share_one_rule() {
    let rule = Arc::new(
        Rewrite::new("/a/:id", "/b/:id")
            .filter(filter_fn(|_, _| async {
                tokio::task::yield_now().await;
                true
            }))
            .build()
            .unwrap(),
    );

    let mut tasks = Vec::new();
    for i in 0..16 {
        let rule = rule.clone();
        tasks.push(tokio::spawn(async move {
            let mut req = request(Method::GET, &format!("/a/{i}"));
            let outcome = rule.apply(&mut req).await;
            (outcome, req.url().to_owned(), i)
        }));
    }

    for task in tasks {
        let (outcome, url, i) = task.await.unwrap();
        assert_eq!(outcome, RewriteOutcome::Redispatch);
        assert_eq!(url, format!("/b/{i}"));
    }
}
