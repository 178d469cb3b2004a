use crate::error::BoardError;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn board_err(id: &str, e: &BoardError) -> serde_json::Value {
    let details = match e {
        BoardError::Forbidden { role, action } => Some(json!({ "role": role, "action": action })),
        BoardError::NotFound { kind, id: missing } => {
            Some(json!({ "kind": kind, "id": missing }))
        }
        _ => None,
    };
    err(id, e.code(), e.to_string(), details)
}

/// Reply for a line that could not be parsed into a request, so has no id.
pub fn bad_json(message: impl Into<String>) -> serde_json::Value {
    json!({
        "ok": false,
        "error": {
            "code": "bad_json",
            "message": message.into(),
        }
    })
}
