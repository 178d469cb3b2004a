use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    let board = &state.board;
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "session": board.session().is_some(),
            "now": board.now().to_rfc3339(),
            "counts": {
                "tasks": board.tasks().len(),
                "submissions": board.submissions().len(),
                "courses": board.courses().len(),
                "credentials": board.credential_count(),
            }
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
