//! Soroban RPC client — polls `getEvents` and decodes Biorbit events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried
//!   silently.

use std::time::Duration;

use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{BiorbitEvent, EventKind, Subject};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 are hard failures; everything else we retry
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`BiorbitEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<BiorbitEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<BiorbitEvent> {
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // The second topic entry carries the subject id for registry events.
    let subject_id = raw.topic.get(1).map(|t| extract_u64_or_raw(t));
    let (mut area_id, mut image_id) = match kind.subject() {
        Subject::Area => (subject_id, None),
        Subject::Image => (None, subject_id),
        Subject::None => (None, None),
    };

    let (mut actor, amount) = decode_data(&raw.value, &kind);

    match kind {
        // Token transfers carry (from, to) in the topics and the token id
        // in the data blob.
        EventKind::TokenTransfer => {
            actor = raw.topic.get(1).map(|t| extract_u64_or_raw(t));
            image_id = value_as_string(&raw.value);
        }
        // Mint events also name their area inside the payload.
        EventKind::ImageMinted => {
            area_id = extract_field(&raw.value, &["area_id"]);
        }
        _ => {}
    }

    Some(BiorbitEvent {
        event_type: kind.as_str().to_string(),
        area_id,
        image_id,
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.as_deref().map(normalize_tx_hash),
    })
}

/// Pull apart the JSON `value` blob that Soroban returns for event data.
/// The XDR is decoded by the RPC into a `{"type":…, …}` JSON object.
fn decode_data(value: &Value, kind: &EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::AreaRegistered => {
            let actor = extract_field(value, &["donor", "address"]);
            let amount = extract_field(value, &["amount"]);
            (actor, amount)
        }
        EventKind::AreaFunded => {
            let actor = extract_field(value, &["donor", "funder", "address"]);
            let amount = extract_field(value, &["amount"]);
            (actor, amount)
        }
        EventKind::MonitoringRecorded => (None, None),
        EventKind::ImageMinted => {
            let actor = extract_field(value, &["minter", "address"]);
            let amount = extract_field(value, &["price"]);
            (actor, amount)
        }
        EventKind::ImageListed => {
            let actor = extract_field(value, &["seller", "address"]);
            (actor, None)
        }
        EventKind::ImageSold => {
            let actor = extract_field(value, &["buyer", "address"]);
            let amount = extract_field(value, &["price"]);
            (actor, amount)
        }
        EventKind::DonationUpdated | EventKind::PriceUpdated => {
            let amount = extract_field(value, &["current"]);
            (None, amount)
        }
        EventKind::Withdrawn => {
            let actor = extract_field(value, &["admin", "address"]);
            let amount = extract_field(value, &["amount"]);
            (actor, amount)
        }
        // For role events the data blob is the granting caller address.
        EventKind::RoleSet | EventKind::RoleDel | EventKind::AdminTransferred => {
            let actor = value
                .as_str()
                .map(String::from)
                .or_else(|| extract_field(value, &["address", "caller", "by"]));
            (actor, None)
        }
        EventKind::TokenTransfer | EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => v.as_str().map(String::from),
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(_) => value
            .get("value")
            .and_then(|v| v.as_u64())
            .map(|n| n.to_string()),
        _ => None,
    }
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"minted"}`, raw base64
/// XDR, or just the plain string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(raw) {
        if let Ok(s) = String::from_utf8(bytes) {
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_graphic()) {
                return s;
            }
        }
    }
    // Fallback: treat the raw string as the symbol
    raw.to_string()
}

/// Extract a subject id from a topic entry that might be a JSON object or
/// raw number/string.
fn extract_u64_or_raw(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(n) = v.get("value").and_then(|x| x.as_u64()) {
            return n.to_string();
        }
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Canonicalize a transaction hash to lowercase hex; pass non-hex input
/// through untouched.
fn normalize_tx_hash(raw: &str) -> String {
    match hex::decode(raw) {
        Ok(bytes) => hex::encode(bytes),
        Err(_) => raw.to_string(),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_from_topic() {
        assert_eq!(EventKind::from_topic("area_reg"), EventKind::AreaRegistered);
        assert_eq!(EventKind::from_topic("funded"), EventKind::AreaFunded);
        assert_eq!(
            EventKind::from_topic("monitored"),
            EventKind::MonitoringRecorded
        );
        assert_eq!(EventKind::from_topic("minted"), EventKind::ImageMinted);
        assert_eq!(EventKind::from_topic("listed"), EventKind::ImageListed);
        assert_eq!(EventKind::from_topic("sold"), EventKind::ImageSold);
        assert_eq!(EventKind::from_topic("don_set"), EventKind::DonationUpdated);
        assert_eq!(EventKind::from_topic("price_set"), EventKind::PriceUpdated);
        assert_eq!(EventKind::from_topic("withdrawn"), EventKind::Withdrawn);
        assert_eq!(EventKind::from_topic("role_set"), EventKind::RoleSet);
        assert_eq!(EventKind::from_topic("role_del"), EventKind::RoleDel);
        assert_eq!(EventKind::from_topic("transfer"), EventKind::TokenTransfer);
        assert_eq!(EventKind::from_topic("something_else"), EventKind::Unknown);
    }

    #[test]
    fn subject_routing() {
        assert_eq!(EventKind::AreaRegistered.subject(), Subject::Area);
        assert_eq!(EventKind::MonitoringRecorded.subject(), Subject::Area);
        assert_eq!(EventKind::ImageSold.subject(), Subject::Image);
        assert_eq!(EventKind::RoleSet.subject(), Subject::None);
    }

    #[test]
    fn extract_symbol_from_json() {
        let raw = r#"{"type":"symbol","value":"minted"}"#;
        assert_eq!(extract_symbol(raw), "minted");
    }

    #[test]
    fn extract_symbol_raw_fallback() {
        assert_eq!(extract_symbol("sold"), "sold");
    }

    #[test]
    fn decode_area_registered_event() {
        let raw = RawEvent {
            topic: vec![
                r#"{"type":"symbol","value":"area_reg"}"#.to_string(),
                r#"{"type":"u64","value":"3"}"#.to_string(),
            ],
            value: serde_json::json!({
                "area_id": 3,
                "name": "Yasuni",
                "donor": "GDONOR1",
                "amount": "1000",
                "country": "Ecuador",
                "geo_json": "{}"
            }),
            contract_id: Some("CONTRACT1".to_string()),
            tx_hash: Some("TX1".to_string()),
            id: None,
            ledger: Some(1000),
            ledger_closed_at: Some("2024-01-01T00:00:00Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        };

        let events = decode_events(&[raw], "CONTRACT1");
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_type, "area_registered");
        assert_eq!(ev.area_id.as_deref(), Some("3"));
        assert_eq!(ev.image_id, None);
        assert_eq!(ev.actor.as_deref(), Some("GDONOR1"));
        assert_eq!(ev.amount.as_deref(), Some("1000"));
        assert_eq!(ev.ledger, 1000);
    }

    #[test]
    fn decode_image_sold_event() {
        let raw = RawEvent {
            topic: vec![
                r#"{"type":"symbol","value":"sold"}"#.to_string(),
                r#"{"type":"u64","value":"7"}"#.to_string(),
            ],
            value: serde_json::json!({
                "image_id": 7,
                "buyer": "GBUYER1",
                "seller": "GSELLER1",
                "price": "5000"
            }),
            contract_id: Some("CONTRACT1".to_string()),
            tx_hash: None,
            id: None,
            ledger: Some(1001),
            ledger_closed_at: Some("2024-01-01T00:00:05Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        };

        let events = decode_events(&[raw], "CONTRACT1");
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_type, "image_sold");
        assert_eq!(ev.image_id.as_deref(), Some("7"));
        assert_eq!(ev.area_id, None);
        assert_eq!(ev.actor.as_deref(), Some("GBUYER1"));
        assert_eq!(ev.amount.as_deref(), Some("5000"));
    }

    #[test]
    fn decode_minted_event_names_its_area() {
        let raw = RawEvent {
            topic: vec![
                r#"{"type":"symbol","value":"minted"}"#.to_string(),
                r#"{"type":"u64","value":"0"}"#.to_string(),
            ],
            value: serde_json::json!({
                "image_id": 0,
                "area_id": 2,
                "minter": "GADMIN1",
                "uri": "ipfs://capture-1",
                "price": "5000"
            }),
            contract_id: Some("CONTRACT1".to_string()),
            tx_hash: None,
            id: None,
            ledger: Some(1002),
            ledger_closed_at: None,
            in_successful_contract_call: Some(true),
            paging_token: None,
        };

        let events = decode_events(&[raw], "CONTRACT1");
        let ev = &events[0];
        assert_eq!(ev.event_type, "image_minted");
        assert_eq!(ev.image_id.as_deref(), Some("0"));
        assert_eq!(ev.area_id.as_deref(), Some("2"));
        assert_eq!(ev.actor.as_deref(), Some("GADMIN1"));
        assert_eq!(ev.amount.as_deref(), Some("5000"));
    }

    #[test]
    fn normalize_tx_hash_lowercases_hex() {
        assert_eq!(normalize_tx_hash("DEADBEEF"), "deadbeef");
        assert_eq!(normalize_tx_hash("not-hex"), "not-hex");
    }

    #[test]
    fn parse_iso_timestamp() {
        let ts = parse_iso_to_unix("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, 1_704_067_200);
    }
}
