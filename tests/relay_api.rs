//! End-to-end tests: client → relay → mock upstream.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

fn groups_then_courses(path: &str) -> (u16, String) {
    if path.ends_with("/hzkc") {
        (200, r#"{"total":1,"rows":[{"kcmc":"Linear Algebra","KCPTDM":"K1"}]}"#.into())
    } else if path.ends_with("/kxkc") {
        (200, r#"{"total":1,"rows":[{"kcrwdm":"42","syrs":3}]}"#.into())
    } else {
        (404, "not found".into())
    }
}

#[tokio::test]
async fn test_search_round_trip() {
    let upstream = common::start_mock_upstream(groups_then_courses).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(format!("http://{}/api/search", relay_addr))
        .header("User-Agent", "integration-test")
        .json(&json!({
            "cookie": "JSESSIONID=abc123",
            "xklx": "09",
            "payload": {"kcxx": "Linear Algebra", "page": 2}
        }))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"total": 1, "rows": [{"kcrwdm": "42", "syrs": 3}]}));

    let seen = upstream.captured();
    assert_eq!(seen.len(), 2);

    assert_eq!(seen[0].path, "/new/student/xsxk/xklx/09/hzkc");
    assert_eq!(seen[0].body, "kcxx=Linear+Algebra&page=2");
    assert_eq!(seen[1].path, "/new/student/xsxk/xklx/09/kxkc");
    assert_eq!(seen[1].body, "kcptdm=K1&page=2&rows=50&sort=kcrwdm&order=asc");

    for call in &seen {
        assert_eq!(call.header("cookie"), Some("JSESSIONID=abc123"));
        assert_eq!(call.header("user-agent"), Some("integration-test"));
        assert_eq!(call.header("x-requested-with"), Some("XMLHttpRequest"));
        assert_eq!(
            call.header("content-type"),
            Some("application/x-www-form-urlencoded; charset=UTF-8")
        );
        let expected_referer = format!("{}/xsxk.html?xklxdm=09", upstream.base_url());
        assert_eq!(call.header("referer"), Some(expected_referer.as_str()));
        assert_eq!(call.header("origin"), Some(upstream.base_url().as_str()));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_cookie_never_reaches_upstream() {
    let upstream = common::start_mock_upstream(groups_then_courses).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;
    let client = common::client();

    for op in ["config", "hzkc", "kxkc", "search", "add"] {
        let res = client
            .post(format!("http://{}/api/{}", relay_addr, op))
            .json(&json!({"payload": {"kcxx": "x"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{op}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"error": "cookie_required"}));
    }

    assert!(upstream.captured().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_passthrough_keeps_status() {
    let upstream = common::start_mock_upstream(|_| (403, "<html>session expired</html>".into())).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(format!("http://{}/api/hzkc", relay_addr))
        .json(&json!({"cookie": "c", "payload": {"kcxx": "x"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), "<html>session expired</html>");

    shutdown.trigger();
}

#[tokio::test]
async fn test_config_sends_empty_body_and_normalizes_status() {
    let upstream = common::start_mock_upstream(|_| (201, r#"{"xkkssj":"2026-09-01"}"#.into())).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(format!("http://{}/api/config", relay_addr))
        .json(&json!({"cookie": "c"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let seen = upstream.captured();
    assert_eq!(seen[0].path, "/new/student/xsxk/xklx/07/config");
    assert_eq!(seen[0].body, "");

    shutdown.trigger();
}

#[tokio::test]
async fn test_add_maps_business_code() {
    let upstream = common::start_mock_upstream(|_| (200, r#"{"code":1,"msg":"full"}"#.into())).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(format!("http://{}/api/add", relay_addr))
        .json(&json!({"cookie": "c", "payload": {"kcrwdm": "42"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"code": 1, "msg": "full"}));
    assert_eq!(upstream.captured()[0].body, "kcrwdm=42");

    shutdown.trigger();
}

#[tokio::test]
async fn test_search_without_kcptdm_is_bad_gateway() {
    let upstream = common::start_mock_upstream(|_| (200, r#"{"total":0,"rows":[]}"#.into())).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(format!("http://{}/api/search", relay_addr))
        .json(&json!({"cookie": "c"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "kcptdm_not_found");
    assert_eq!(body["upstream"], json!({"total": 0, "rows": []}));
    assert_eq!(upstream.captured().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    // Grab a free port and release it so nothing listens there.
    let probe = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = probe.local_addr().unwrap();
    drop(probe);

    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&format!("http://{}", dead))).await;

    let res = common::client()
        .post(format!("http://{}/api/kxkc", relay_addr))
        .json(&json!({"cookie": "c", "payload": {"kcptdm": "K"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_landing_page_served() {
    let upstream = common::start_mock_upstream(groups_then_courses).await;
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(&upstream.base_url())).await;
    let client = common::client();

    let res = client.get(format!("http://{}/", relay_addr)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("/api/search"));

    let res = client
        .get(format!("http://{}/static/app.js", relay_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}
