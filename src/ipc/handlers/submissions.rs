use crate::ipc::error::{board_err, err, ok};
use crate::ipc::helpers::{get_str, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::store::WorkDraft;
use serde_json::json;

fn handle_submissions_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let task_id = get_str(&req.params, "taskId");
    match state.board.list_submissions(task_id) {
        Ok(rows) => ok(&req.id, json!({ "submissions": rows })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_submissions_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let draft: WorkDraft = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.board.submit_work(draft) {
        Ok(out) => ok(
            &req.id,
            json!({
                "submission": out.submission,
                "replaced": out.replaced,
            }),
        ),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_submissions_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let submission_id = match required_str(req, "submissionId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.board.delete_submission(submission_id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_submissions_set_comment(state: &mut AppState, req: &Request) -> serde_json::Value {
    let submission_id = match required_str(req, "submissionId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let comment = match req.params.get("comment") {
        None => return err(&req.id, "bad_params", "missing params.comment", None),
        Some(v) if v.is_null() => None,
        Some(v) => match v.as_str() {
            Some(s) => Some(s.to_string()),
            None => return err(&req.id, "bad_params", "comment must be a string or null", None),
        },
    };
    match state.board.set_comment(submission_id, comment) {
        Ok(updated) => ok(&req.id, json!({ "updated": updated })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_submissions_set_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let submission_id = match required_str(req, "submissionId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let grade = match req.params.get("grade") {
        None => return err(&req.id, "bad_params", "missing params.grade", None),
        Some(v) if v.is_null() => None,
        Some(v) => match v.as_u64().and_then(|n| u8::try_from(n).ok()) {
            Some(g) => Some(g),
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "grade must be an integer between 0 and 100, or null",
                    None,
                )
            }
        },
    };
    match state.board.set_grade(submission_id, grade) {
        Ok(updated) => ok(&req.id, json!({ "updated": updated })),
        Err(e) => board_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "submissions.list" => Some(handle_submissions_list(state, req)),
        "submissions.submit" => Some(handle_submissions_submit(state, req)),
        "submissions.delete" => Some(handle_submissions_delete(state, req)),
        "submissions.setComment" => Some(handle_submissions_set_comment(state, req)),
        "submissions.setGrade" => Some(handle_submissions_set_grade(state, req)),
        _ => None,
    }
}
