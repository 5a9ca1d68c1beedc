//! Shared fixtures for the adapter integration tests.

use serde_json::{json, Value};
use sheetsync_domain::{CarrierApiConfig, TicketingConfig};
use wiremock::MockServer;

pub const SHEET_ID: u64 = 4_583_173_393_803_140;
pub const TICKET_COLUMN: u64 = 101;
pub const STATUS_COLUMN: u64 = 102;

/// Two-row sheet payload as the sheet API returns it.
pub fn sheet_payload() -> Value {
    json!({
        "id": SHEET_ID,
        "name": "Equipment Orders",
        "columns": [
            {"id": TICKET_COLUMN, "index": 0, "title": "Equipment Ticket", "primary": true},
            {"id": STATUS_COLUMN, "index": 1, "title": "Status"}
        ],
        "rows": [
            {"id": 9001, "rowNumber": 1, "cells": [
                {"columnId": TICKET_COLUMN, "value": "CW1001", "displayValue": "CW1001"},
                {"columnId": STATUS_COLUMN, "value": "Unworked"}
            ]},
            {"id": 9002, "rowNumber": 2, "cells": [
                {"columnId": TICKET_COLUMN, "value": 1002.0}
            ]}
        ]
    })
}

/// Error body in the sheet API's format.
pub fn sheet_error(code: u32, message: &str) -> Value {
    json!({"errorCode": code, "message": message, "refId": "abc123"})
}

pub fn ticketing_config(server: &MockServer) -> TicketingConfig {
    TicketingConfig {
        base_url: format!("{}/v4_6_release/apis/3.0", server.uri()),
        company_id: "acme".to_string(),
        public_key: "pub".to_string(),
        private_key: "priv".to_string(),
        client_id: "client-123".to_string(),
    }
}

pub fn carrier_config(server: &MockServer) -> CarrierApiConfig {
    CarrierApiConfig {
        token_url: format!("{}/oauth/token", server.uri()),
        api_base_url: server.uri(),
        client_id: "carrier-id".to_string(),
        client_secret: "carrier-secret".to_string(),
    }
}
