use httpmock::prelude::*;
use himaya::config::BreachApiConfig;
use himaya::core::{GatewayEvent, InvocationContext};
use himaya::domain::gateway::response_text;
use himaya::utils::codec::base64_encode;
use himaya::{BreachTable, HibpClient, LocalStorage, PaymentHookHandler};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

async fn table_from_disk() -> anyhow::Result<(TempDir, BreachTable)> {
    let temp_dir = TempDir::new()?;
    let table_json = json!({
        "Adobe": {"Name": "Adobe", "Domain": "adobe.com", "BreachDate": "2013-10-04"},
        "Dropbox": {"Name": "Dropbox", "Domain": "dropbox.com", "BreachDate": "2012-07-01"}
    });
    tokio::fs::write(temp_dir.path().join("breaches.json"), table_json.to_string()).await?;

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let table = BreachTable::load(&storage, "breaches.json").await?;
    Ok((temp_dir, table))
}

fn client(server: &MockServer) -> HibpClient {
    HibpClient::new(&BreachApiConfig {
        base_url: server.base_url(),
        user_agent: "himaya-test".to_string(),
        api_key: Some("integration-key".to_string().into()),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn get_event(order: serde_json::Value) -> GatewayEvent {
    serde_json::from_value(json!({
        "httpMethod": "GET",
        "path": "/payment",
        "queryStringParameters": {"payload": base64_encode(&order.to_string())},
        "requestContext": {"httpMethod": "GET", "stage": "prod"},
        "body": null
    }))
    .unwrap()
}

#[tokio::test]
async fn test_enriches_report_from_breach_api() -> anyhow::Result<()> {
    let (_dir, table) = table_from_disk().await?;
    let server = MockServer::start();

    let email_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/breachedaccount/victim@example.com")
            .header("hibp-api-key", "integration-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{"Name": "Adobe"}, {"Name": "Dropbox"}]));
    });
    let clean_mock = server.mock(|when, then| {
        when.method(GET).path("/breachedaccount/clean@example.com");
        then.status(404);
    });
    let phone_mock = server.mock(|when, then| {
        when.method(GET).path("/breachedaccount/+14155552671");
        then.status(200).json_body(json!([{"Name": "NotInTable"}]));
    });

    let handler = PaymentHookHandler::new(client(&server), Arc::new(table));
    let envelope = handler
        .handle(
            get_event(json!({
                "billing_email": "buyer@example.com",
                "email_addresses": ["victim@example.com", "clean@example.com"],
                "phone_numbers": ["+14155552671"],
                "amount": 6.0
            })),
            InvocationContext::default(),
        )
        .await;

    email_mock.assert();
    clean_mock.assert();
    phone_mock.assert();

    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.headers["Content-Type"], "application/json");

    let body: serde_json::Value = serde_json::from_str(response_text(&envelope))?;
    let report = &body["report_data"];
    assert_eq!(report["victim@example.com"][0]["BreachDate"], "2013-10-04");
    assert_eq!(report["victim@example.com"][1]["Domain"], "dropbox.com");
    assert_eq!(report["clean@example.com"], json!([]));
    assert_eq!(report["+14155552671"], json!([{"Name": "NotInTable"}]));
    assert_eq!(body["order_data"]["amount"], 6.0);
    assert_eq!(body["event"]["path"], "/payment");

    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_returns_502() -> anyhow::Result<()> {
    let (_dir, table) = table_from_disk().await?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/breachedaccount/victim@example.com");
        then.status(429).body("Rate limit exceeded");
    });

    let handler = PaymentHookHandler::new(client(&server), Arc::new(table));
    let envelope = handler
        .handle(
            get_event(json!({"email_addresses": ["victim@example.com"]})),
            InvocationContext::default(),
        )
        .await;

    assert_eq!(envelope.status_code, 502);
    assert_eq!(envelope.headers["Content-Type"], "text/plain");
    assert!(response_text(&envelope).starts_with("Upstream Failure: "));

    Ok(())
}

#[tokio::test]
async fn test_unrecognized_identifier_never_reaches_api() -> anyhow::Result<()> {
    let (_dir, table) = table_from_disk().await?;
    let server = MockServer::start();
    let any_call = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!([]));
    });

    let handler = PaymentHookHandler::new(client(&server), Arc::new(table));
    let envelope = handler
        .handle(
            get_event(json!({"email_addresses": ["not-an-identifier"]})),
            InvocationContext::default(),
        )
        .await;

    assert_eq!(envelope.status_code, 422);
    any_call.assert_hits(0);

    Ok(())
}
