use crate::ipc::error::{board_err, err, ok};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Missing fields fall through to the same generic failure as a wrong password.
    let email = get_str(&req.params, "email").unwrap_or("");
    let password = get_str(&req.params, "password").unwrap_or("");
    match state.board.login(email, password) {
        Ok(user) => ok(&req.id, json!({ "user": user })),
        Err(e) => board_err(&req.id, &e),
    }
}

fn handle_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let role = match get_str(&req.params, "role") {
        None => Role::Student,
        Some(raw) => match Role::parse(raw) {
            Some(r) => r,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("role must be teacher or student, got '{raw}'"),
                    None,
                )
            }
        },
    };
    let email = get_str(&req.params, "email").unwrap_or("");
    let password = get_str(&req.params, "password").unwrap_or("");
    let name = get_str(&req.params, "name").unwrap_or("");
    let user = state.board.register(email, password, name, role);
    ok(&req.id, json!({ "user": user }))
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let was_logged_in = state.board.logout();
    ok(&req.id, json!({ "loggedOut": was_logged_in }))
}

fn handle_whoami(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "user": state.board.session() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.register" => Some(handle_register(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.whoami" => Some(handle_whoami(state, req)),
        _ => None,
    }
}
