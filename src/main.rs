mod auth;
mod board;
mod clock;
mod config;
mod error;
mod ipc;
mod model;
mod seed;
mod store;

use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let cli = config::Cli::parse();
    let settings = config::load_settings(&cli)?;

    // stdout carries the IPC stream; logs go to stderr.
    let filter = config::log_filter(&settings)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let seed = config::initial_seed(&settings)?;
    info!(
        tasks = seed.tasks.len(),
        submissions = seed.submissions.len(),
        students = seed.students.len(),
        seed_path = ?settings.seed_path,
        "board seeded"
    );
    let mut state = ipc::AppState {
        board: store::Board::from_seed(seed, Box::new(clock::SystemClock)),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                warn!(error = %e, "bad request line");
                let _ = writeln!(stdout, "{}", ipc::bad_json(e.to_string()));
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    info!("stdin closed, shutting down");
    Ok(())
}
