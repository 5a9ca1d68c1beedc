//! Integration tests for the Smartsheet adapter against a mock sheet API
//!
//! **Coverage:**
//! - Snapshot fetch with bearer auth
//! - Row update and delete request shapes
//! - Row deletes split into batches the API accepts
//! - API error bodies mapped to rate-limit and server-error classifications
//! - A full reconciliation pass retrying a rate-limited write

#[path = "support.rs"]
mod support;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sheetsync_common::resilience::RetryPolicy;
use sheetsync_common::testing::RecordingSleeper;
use sheetsync_core::{ReconciliationDriver, RowReconciler, SheetStore, MAX_DELETE_BATCH};
use sheetsync_domain::{
    CellUpdate, CellValue, DesiredField, Record, Result, RowUpdate, SheetSyncError, TicketKey,
};
use sheetsync_infra::{HttpClient, SmartsheetClient};
use support::{sheet_error, sheet_payload, SHEET_ID, STATUS_COLUMN};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "sheet-token";

fn client(server: &MockServer) -> SmartsheetClient {
    let http = HttpClient::new().expect("http client");
    SmartsheetClient::with_http(http, &format!("{}/2.0/", server.uri()), TOKEN)
        .expect("sheet client")
}

fn rows_path() -> String {
    format!("/2.0/sheets/{SHEET_ID}/rows")
}

#[tokio::test]
async fn fetches_sheet_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/2.0/sheets/{SHEET_ID}")))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(sheet_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let sheet = client(&server).fetch_sheet(SHEET_ID).await.expect("sheet");

    assert_eq!(sheet.id, SHEET_ID);
    assert_eq!(sheet.columns.len(), 2);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0].row_number, Some(1));
    let status = sheet.rows[0].cell(STATUS_COLUMN).expect("status cell");
    assert_eq!(status.value, Some(CellValue::Text("Unworked".into())));
    assert_eq!(sheet.rows[1].cell(STATUS_COLUMN), None);
}

/// Validates the row update request body.
///
/// Assertions:
/// - Rows are sent as a JSON array keyed by `id`.
/// - Cells carry `columnId` and a non-strict value.
#[tokio::test]
async fn update_rows_sends_row_array() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(rows_path()))
        .and(body_json(json!([
            {"id": 9001, "cells": [{"columnId": STATUS_COLUMN, "value": "Shipped", "strict": false}]}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    let update = RowUpdate::single(9001, CellUpdate::new(STATUS_COLUMN, "Shipped".into()));
    client(&server).update_rows(SHEET_ID, &[update]).await.expect("update");
}

#[tokio::test]
async fn delete_rows_passes_ids_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(rows_path()))
        .and(query_param("ids", "9001,9002"))
        .and(query_param("ignoreRowsNotFound", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_rows(SHEET_ID, &[9001, 9002]).await.expect("delete");
}

#[tokio::test]
async fn oversized_delete_is_rejected_locally() {
    let server = MockServer::start().await;
    let ids: Vec<u64> = (1..=MAX_DELETE_BATCH as u64 + 1).collect();

    let err = client(&server).delete_rows(SHEET_ID, &ids).await.unwrap_err();

    assert!(matches!(err, SheetSyncError::InvalidInput(_)), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Validates the driver splits a large delete into API-sized requests.
///
/// Assertions:
/// - 150 ids go out as one request of 100 and one of 50.
/// - Nothing is reported as left behind.
#[tokio::test]
async fn driver_deletes_rows_in_batches() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(rows_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "SUCCESS"})))
        .expect(2)
        .mount(&server)
        .await;

    let policy = RetryPolicy::builder().max_attempts(2).no_jitter().build().expect("policy");
    let driver = ReconciliationDriver::new(Arc::new(client(&server)), policy)
        .with_sleeper(Arc::new(RecordingSleeper::new()));
    let ids: Vec<u64> = (1..=150).collect();

    assert_eq!(driver.delete_rows(SHEET_ID, &ids).await, 0);

    let requests = server.received_requests().await.unwrap();
    let batch_sizes: Vec<usize> = requests
        .iter()
        .map(|request| {
            let ids = request
                .url
                .query_pairs()
                .find(|(key, _)| key == "ids")
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default();
            ids.split(',').count()
        })
        .collect();
    assert_eq!(batch_sizes, vec![100, 50]);
}

#[tokio::test]
async fn empty_batches_make_no_requests() {
    let server = MockServer::start().await;
    let client = client(&server);

    client.update_rows(SHEET_ID, &[]).await.expect("update");
    client.delete_rows(SHEET_ID, &[]).await.expect("delete");

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rate_limit_body_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(sheet_error(4003, "Rate limit exceeded.")),
        )
        .mount(&server)
        .await;

    let err = client(&server).fetch_sheet(SHEET_ID).await.unwrap_err();
    assert!(err.is_rate_limited());
    match err {
        SheetSyncError::Api { service, status, code, message } => {
            assert_eq!(service, "smartsheet");
            assert_eq!(status, Some(429));
            assert_eq!(code, Some(4003));
            assert_eq!(message, "Rate limit exceeded.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(502)).mount(&server).await;

    let err = client(&server).fetch_sheet(SHEET_ID).await.unwrap_err();
    assert!(err.is_server_error());
    assert!(!err.is_rate_limited());
    assert!(err.to_string().contains("Bad Gateway"), "unexpected message: {err}");
}

#[tokio::test]
async fn missing_sheet_is_not_retryable_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(sheet_error(1006, "Not Found")))
        .mount(&server)
        .await;

    let err = client(&server).fetch_sheet(SHEET_ID).await.unwrap_err();
    assert!(!err.is_rate_limited());
    assert!(!err.is_server_error());
    assert!(matches!(err, SheetSyncError::Api { code: Some(1006), .. }));
}

/// Marks every keyed record as shipped.
struct ShippedReconciler;

#[async_trait]
impl RowReconciler for ShippedReconciler {
    fn name(&self) -> &str {
        "shipped"
    }

    fn key_column(&self) -> &str {
        "Equipment Ticket"
    }

    async fn desired_fields(&self, key: &TicketKey, _record: &Record) -> Result<Vec<DesiredField>> {
        if key.as_str() == "1001" {
            Ok(vec![DesiredField::new("Status", "Shipped")])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Validates a reconciliation pass over the real adapter.
///
/// Assertions:
/// - A write rejected with the rate-limit code is retried after one backoff.
/// - Only the record whose status differs is written.
/// - The batch reports one update and no failures.
#[tokio::test]
async fn driver_retries_rate_limited_write() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/2.0/sheets/{SHEET_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(sheet_payload()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(rows_path()))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(sheet_error(4003, "Rate limit exceeded.")),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(rows_path()))
        .and(body_json(json!([
            {"id": 9001, "cells": [{"columnId": STATUS_COLUMN, "value": "Shipped", "strict": false}]}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::builder()
        .max_attempts(3)
        .rate_limit_backoff(Duration::from_millis(10), Duration::from_millis(40))
        .server_error_backoff(Duration::from_millis(5), Duration::from_millis(20))
        .no_jitter()
        .build()
        .expect("policy");
    let sleeper = Arc::new(RecordingSleeper::new());
    let driver = ReconciliationDriver::new(Arc::new(client(&server)), policy)
        .with_sleeper(sleeper.clone());

    let report = driver.run(SHEET_ID, &ShippedReconciler).await.expect("report");
    let summary = report.summary();

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(10)]);
}
