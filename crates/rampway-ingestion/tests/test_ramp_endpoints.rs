//! RaMP client against in-process stand-in endpoints.
//!
//! Run with: cargo test --package rampway-ingestion --test test_ramp_endpoints

use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use rampway_common::{AnalyteIdentifier, AnalyteKind, IdentifierSource, QueryConfig, RampwayError};
use rampway_ingestion::sources::{PathwaySource, RampClient};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral localhost port and return the endpoint URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/query")
}

fn echo_router() -> Router {
    Router::new().route(
        "/query",
        post(|Json(body): Json<Value>| async move {
            let key = body["input"][0].as_str().unwrap_or("").to_string();
            let kind = body["type"].as_str().unwrap_or("").to_string();
            Json(json!([
                {"name": format!("{kind} for {key}"), "source": "reactome", "analyte_list": [key]},
                {"pathway_name": "Apoptosis", "source": "kegg", "analyte_list": []},
            ]))
        }),
    )
}

fn failing_router() -> Router {
    Router::new().route("/query", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
}

fn garbage_router() -> Router {
    Router::new().route("/query", post(|| async { "<html>maintenance</html>" }))
}

fn slow_router() -> Router {
    Router::new().route(
        "/query",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([{"name": "too late"}]))
        }),
    )
}

fn empty_mapping_router() -> Router {
    Router::new().route("/query", post(|| async { Json(json!({})) }))
}

fn tp53() -> AnalyteIdentifier {
    AnalyteIdentifier::new("P04637", AnalyteKind::Protein, "P04637", IdentifierSource::UserProvided).unwrap()
}

fn client(endpoints: Vec<String>) -> RampClient {
    RampClient::new(&QueryConfig { endpoints, timeout_secs: 1, allowed_domains: vec![] }).unwrap()
}

#[tokio::test]
async fn test_request_is_type_prefixed() {
    let endpoint = spawn(echo_router()).await;
    let records = client(vec![endpoint]).query(&tp53()).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "pathway for uniprot:P04637");
    assert_eq!(records[0].associated_analytes, vec!["uniprot:P04637"]);
    assert_eq!(records[1].name, "Apoptosis");
}

#[tokio::test]
async fn test_falls_through_failed_endpoints_in_order() {
    let failing = spawn(failing_router()).await;
    let garbage = spawn(garbage_router()).await;
    let good = spawn(echo_router()).await;
    let records = client(vec![failing, garbage, good]).query(&tp53()).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let slow = spawn(slow_router()).await;
    let good = spawn(echo_router()).await;
    let t0 = std::time::Instant::now();
    let records = client(vec![slow, good]).query(&tp53()).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(t0.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_all_failing_is_query_unavailable() {
    let failing = spawn(failing_router()).await;
    // Nothing listens on port 1.
    let refused = "http://127.0.0.1:1/query".to_string();
    let err = client(vec![failing.clone(), refused.clone()]).query(&tp53()).await.unwrap_err();

    // The message names every endpoint tried, in order.
    let message = err.to_string();
    assert!(message.contains(&format!("[{failing}, {refused}]")), "{message}");

    match err {
        RampwayError::QueryUnavailable { endpoints, last_error } => {
            assert_eq!(endpoints, vec![failing, refused]);
            assert!(last_error.contains("127.0.0.1:1"));
        }
        other => panic!("expected QueryUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_mapping_is_empty_result() {
    let endpoint = spawn(empty_mapping_router()).await;
    let records = client(vec![endpoint]).query(&tp53()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_live_ramp_endpoint() {
    let client = RampClient::new(&QueryConfig::default()).unwrap();
    match client.query(&tp53()).await {
        Ok(records) => println!("{} pathways", records.len()),
        Err(e) => println!("RaMP unavailable: {e}"),
    }
}
