use crate::board::TaskQuery;
use crate::ipc::error::{board_err, err, ok};
use crate::ipc::helpers::{as_of, get_str, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::StatusFilter;
use crate::store::TaskDraft;
use serde_json::json;

fn handle_tasks_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let now = match as_of(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status = match get_str(&req.params, "status") {
        None => StatusFilter::All,
        Some(raw) => match StatusFilter::parse(raw) {
            Some(f) => f,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("status must be all|pending|completed|overdue, got '{raw}'"),
                    None,
                )
            }
        },
    };
    let query = TaskQuery {
        search: get_str(&req.params, "search").unwrap_or("").to_string(),
        status,
    };

    match state.board.list_tasks(&query, now) {
        Ok(rows) => ok(
            &req.id,
            json!({
                "asOf": now.to_rfc3339(),
                "tasks": rows,
            }),
        ),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_tasks_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let task_id = match required_str(req, "taskId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let now = match as_of(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.board.task_detail(task_id, now) {
        Ok(detail) => ok(&req.id, json!({ "task": detail })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_tasks_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let task_id = match required_str(req, "taskId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let now = match as_of(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.board.status_of(task_id, now) {
        Ok(status) => ok(
            &req.id,
            json!({
                "taskId": task_id,
                "status": status,
                "asOf": now.to_rfc3339(),
            }),
        ),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_tasks_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let draft: TaskDraft = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.board.create_task(draft) {
        Ok(task) => ok(&req.id, json!({ "task": task })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_tasks_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let now = match as_of(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.board.summary(now) {
        Ok(summary) => ok(&req.id, json!({ "summary": summary })),
        Err(e) => board_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tasks.list" => Some(handle_tasks_list(state, req)),
        "tasks.get" => Some(handle_tasks_get(state, req)),
        "tasks.status" => Some(handle_tasks_status(state, req)),
        "tasks.create" => Some(handle_tasks_create(state, req)),
        "tasks.summary" => Some(handle_tasks_summary(state, req)),
        _ => None,
    }
}
