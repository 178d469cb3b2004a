use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_classtasksd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn classtasksd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn send(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = send(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = send(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded",
        method
    );
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string()
}

fn login(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    email: &str,
) {
    let _ = request_ok(
        stdin,
        reader,
        id,
        "auth.login",
        json!({ "email": email, "password": "123456" }),
    );
}

fn submission_ids(result: &serde_json::Value) -> Vec<String> {
    result
        .get("submissions")
        .and_then(|v| v.as_array())
        .expect("submissions array")
        .iter()
        .map(|s| s["id"].as_str().expect("submission id").to_string())
        .collect()
}

#[test]
fn delete_removes_exactly_one_and_ignores_unknown_ids() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader, "1", "estudiante@ejemplo.com");

    let submitted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "submissions.submit",
        json!({ "taskId": "task-2", "fileName": "analisis.docx", "comments": "Versión final" }),
    );
    let new_id = submitted["submission"]["id"].as_str().expect("id").to_string();
    assert_eq!(submitted["replaced"], false);
    assert_eq!(submitted["submission"]["comments"], "Versión final");

    let before = request_ok(&mut stdin, &mut reader, "3", "submissions.list", json!({}));
    assert_eq!(submission_ids(&before), vec!["submission-1".to_string(), new_id.clone()]);

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "submissions.delete",
        json!({ "submissionId": "does-not-exist" }),
    );
    assert_eq!(missing["deleted"], false);
    let unchanged = request_ok(&mut stdin, &mut reader, "5", "submissions.list", json!({}));
    assert_eq!(unchanged["submissions"], before["submissions"]);

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "submissions.delete",
        json!({ "submissionId": "submission-1" }),
    );
    assert_eq!(removed["deleted"], true);
    let after = request_ok(&mut stdin, &mut reader, "7", "submissions.list", json!({}));
    assert_eq!(submission_ids(&after), vec![new_id]);

    // With its submission gone, task-1 falls back to its due-date status.
    let status = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "tasks.status",
        json!({ "taskId": "task-1", "asOf": "2024-01-12" }),
    );
    assert_eq!(status["status"], "pending");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn resubmit_replaces_the_previous_submission() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader, "1", "estudiante@ejemplo.com");

    let out = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "submissions.submit",
        json!({ "taskId": "task-1", "fileName": "ensayo_v2.pdf" }),
    );
    assert_eq!(out["replaced"], true);
    let submitted_at = out["submission"]["submittedAt"].as_str().expect("date");
    assert_eq!(submitted_at.len(), 10);
    assert!(out["submission"]["grade"].is_null());

    let list = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "submissions.list",
        json!({ "taskId": "task-1" }),
    );
    let rows = list["submissions"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["fileName"], "ensayo_v2.pdf");
    assert_eq!(rows[0]["studentEmail"], "estudiante@ejemplo.com");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn submit_validates_task_and_file_name() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "1",
            "submissions.submit",
            json!({ "taskId": "task-2", "fileName": "a.pdf" }),
        ),
        "no_session"
    );
    login(&mut stdin, &mut reader, "2", "estudiante@ejemplo.com");
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "3",
            "submissions.submit",
            json!({ "taskId": "missing", "fileName": "a.pdf" }),
        ),
        "not_found"
    );
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "4",
            "submissions.submit",
            json!({ "taskId": "task-2", "fileName": "virus.exe" }),
        ),
        "bad_params"
    );
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "5",
            "submissions.submit",
            json!({ "taskId": "task-2" }),
        ),
        "bad_params"
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn teacher_comment_keeps_the_typed_text() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    login(&mut stdin, &mut reader, "1", "estudiante@ejemplo.com");
    assert_eq!(
        request_err(
            &mut stdin,
            &mut reader,
            "2",
            "submissions.setComment",
            json!({ "submissionId": "submission-1", "comment": "me pongo un 10" }),
        ),
        "forbidden"
    );
    let _ = request_ok(&mut stdin, &mut reader, "3", "auth.logout", json!({}));

    login(&mut stdin, &mut reader, "4", "profesor@ejemplo.com");
    let set = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "submissions.setComment",
        json!({ "submissionId": "submission-1", "comment": "  Falta la bibliografía  " }),
    );
    assert_eq!(set["updated"], true);

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "submissions.setComment",
        json!({ "submissionId": "nope", "comment": "x" }),
    );
    assert_eq!(missing["updated"], false);

    let list = request_ok(&mut stdin, &mut reader, "7", "submissions.list", json!({}));
    let row = &list["submissions"][0];
    assert_eq!(row["comments"], "  Falta la bibliografía  ");
    assert_eq!(row["taskTitle"], "Ensayo sobre el cuerpo humano");
    assert_eq!(row["studentName"], "Juan Pérez");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn teacher_grade_is_bounded() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader, "1", "profesor@ejemplo.com");

    for (i, grade) in [json!(101), json!(-1), json!("A"), json!(9.5)].into_iter().enumerate() {
        assert_eq!(
            request_err(
                &mut stdin,
                &mut reader,
                &format!("g{i}"),
                "submissions.setGrade",
                json!({ "submissionId": "submission-1", "grade": grade }),
            ),
            "bad_params"
        );
    }

    let ok = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "submissions.setGrade",
        json!({ "submissionId": "submission-1", "grade": 88 }),
    );
    assert_eq!(ok["updated"], true);
    let list = request_ok(&mut stdin, &mut reader, "3", "submissions.list", json!({}));
    assert_eq!(list["submissions"][0]["grade"], 88);

    drop(stdin);
    let _ = child.wait();
}
