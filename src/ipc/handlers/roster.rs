use crate::ipc::error::{board_err, ok};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term = get_str(&req.params, "search").unwrap_or("");
    match state.board.roster(term) {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "courses": state.board.courses() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "courses.list" => Some(handle_courses_list(state, req)),
        _ => None,
    }
}
