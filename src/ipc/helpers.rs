use crate::clock::parse_instant;
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

pub fn get_str<'a>(params: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, serde_json::Value> {
    get_str(&req.params, key)
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing params.{key}"), None))
}

pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    serde_json::from_value(req.params.clone())
        .map_err(|e| err(&req.id, "bad_params", format!("invalid params: {e}"), None))
}

/// `params.asOf` overrides the clock for status evaluation.
pub fn as_of(state: &AppState, req: &Request) -> Result<DateTime<Utc>, serde_json::Value> {
    match req.params.get("asOf") {
        None => Ok(state.board.now()),
        Some(v) if v.is_null() => Ok(state.board.now()),
        Some(v) => v.as_str().and_then(parse_instant).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                "asOf must be YYYY-MM-DD or an RFC 3339 timestamp",
                None,
            )
        }),
    }
}
