//! Integration tests for correlation propagation to outbound payment calls.

use std::sync::Arc;

use order_gateway::config::ServiceConfig;

mod common;
use common::{start_gateway, start_payment_backend, test_client, RecordingSink};

fn order_json(account: &str) -> String {
    format!(
        r#"{{"accountNumber":"{}","amount":42.5,"currency":"USD"}}"#,
        account
    )
}

fn contains_header(raw: &str, name: &str, value: &str) -> bool {
    raw.lines().any(|line| {
        line.split_once(':')
            .map(|(n, v)| n.eq_ignore_ascii_case(name) && v.trim() == value)
            .unwrap_or(false)
    })
}

#[tokio::test]
async fn test_outbound_call_carries_inbound_correlation_id() {
    let (payment_addr, captured) = start_payment_backend(200).await;

    let mut config = ServiceConfig::default();
    config.payment.service_url = format!("http://{}/payments", payment_addr);

    let sink = Arc::new(RecordingSink::default());
    let (addr, shutdown) = start_gateway(config, sink.clone()).await;

    let client = test_client();
    let response = client
        .post(format!("http://{}/api/orders/submit", addr))
        .header("content-type", "application/json")
        .header("X-Correlation-ID", "req-1")
        .body(order_json("acct-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Order submitted successfully.");

    let outbound = captured.lock().unwrap().clone();
    assert_eq!(outbound.len(), 1, "exactly one outbound call per submission");
    assert!(
        contains_header(&outbound[0], "x-correlation-id", "req-1"),
        "outbound call must carry the inbound correlation id; got:\n{}",
        outbound[0]
    );

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correlation_id, "req-1");
    assert_eq!(records[0].response_status, 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_payment_failure_reported_and_logged() {
    let (payment_addr, captured) = start_payment_backend(500).await;

    let mut config = ServiceConfig::default();
    config.payment.service_url = format!("http://{}/payments", payment_addr);

    let sink = Arc::new(RecordingSink::default());
    let (addr, shutdown) = start_gateway(config, sink.clone()).await;

    let client = test_client();
    let response = client
        .post(format!("http://{}/api/orders/submit", addr))
        .header("content-type", "application/json")
        .header("X-Correlation-ID", "req-err")
        .body(order_json("acct-err"))
        .send()
        .await
        .unwrap();

    // The failure is surfaced to the caller, not swallowed, and not retried.
    assert_eq!(response.status(), 502);
    assert_eq!(captured.lock().unwrap().len(), 1);

    let records = sink.records();
    assert_eq!(records.len(), 1, "failed submissions still emit one record");
    assert_eq!(records[0].response_status, 502);
    assert_eq!(records[0].correlation_id, "req-err");

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_ids() {
    let (payment_addr, captured) = start_payment_backend(200).await;

    let mut config = ServiceConfig::default();
    config.payment.service_url = format!("http://{}/payments", payment_addr);

    let sink = Arc::new(RecordingSink::default());
    let (addr, shutdown) = start_gateway(config, sink.clone()).await;

    let client = test_client();
    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let url = format!("http://{}/api/orders/submit", addr);
        handles.push(tokio::spawn(async move {
            client
                .post(&url)
                .header("content-type", "application/json")
                .header("X-Correlation-ID", format!("cid-{i}"))
                .body(order_json(&format!("acct-{i}")))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    // Every outbound call must pair its own account with its own ID.
    let outbound = captured.lock().unwrap().clone();
    assert_eq!(outbound.len(), 8);
    for i in 0..8 {
        let raw = outbound
            .iter()
            .find(|raw| raw.contains(&format!("acct-{i}")))
            .expect("missing outbound call");
        assert!(
            contains_header(raw, "x-correlation-id", &format!("cid-{i}")),
            "request for acct-{i} leaked a foreign correlation id:\n{raw}"
        );
    }

    // Same pairing in the emitted records.
    let records = sink.records();
    assert_eq!(records.len(), 8);
    for i in 0..8 {
        let record = records
            .iter()
            .find(|r| r.request_body.contains(&format!("acct-{i}")))
            .expect("missing record");
        assert_eq!(record.correlation_id, format!("cid-{i}"));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_submission_without_header_generates_id_for_outbound_call() {
    let (payment_addr, captured) = start_payment_backend(200).await;

    let mut config = ServiceConfig::default();
    config.payment.service_url = format!("http://{}/payments", payment_addr);

    let sink = Arc::new(RecordingSink::default());
    let (addr, shutdown) = start_gateway(config, sink.clone()).await;

    let client = test_client();
    let response = client
        .post(format!("http://{}/api/orders/submit", addr))
        .header("content-type", "application/json")
        .body(order_json("acct-gen"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    let generated = records[0].correlation_id.clone();
    assert!(!generated.is_empty());

    // The generated ID reaches response header and outbound call alike.
    let outbound = captured.lock().unwrap().clone();
    assert!(contains_header(&outbound[0], "x-correlation-id", &generated));

    shutdown.trigger();
}
