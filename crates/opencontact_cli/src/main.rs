//! OpenContact HTTP server entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and serve the REST API.
//! - Stop accepting connections on Ctrl-C and drain in-flight requests.

mod config;

use config::Config;
use log::{error, info};
use opencontact_api::{build_router, AppState};
use opencontact_core::{init_logging, init_stderr_logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("opencontact: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = Config::from_env()?;

    match &config.log_dir {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| format!("log directory `{}` is not UTF-8", dir.display()))?;
            init_logging(config.log_level, dir)?
        }
        None => init_stderr_logging(config.log_level)?,
    }

    // Fail fast on an unreadable file or a newer schema before binding.
    let state = AppState::open(config.db_path.clone()).map_err(|err| {
        format!(
            "cannot open database `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let db_path = state.db_path().display().to_string();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| format!("bind {} failed: {err}", config.bind_addr))?;
    info!(
        "event=server_start module=cli status=ok bind_addr={} db_path={db_path}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server failed: {err}"))?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=cli status=error error={err}");
    }
}
