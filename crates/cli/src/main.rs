//! `mp4label` -- terminal front-end for annotating tutorial videos.
//!
//! Reads commands from stdin (type `help`), keeps the annotation of the
//! open video in an editing session and autosaves it to the annotation
//! API once edits go quiet.
//!
//! # Environment variables
//!
//! | Variable                 | Default                 | Description                          |
//! |--------------------------|-------------------------|--------------------------------------|
//! | `ANNOTATION_API_URL`     | `http://localhost:8080` | Base URL of the annotation API       |
//! | `AUTOSAVE_DELAY_MS`      | `1500`                  | Quiet period before autosave         |
//! | `REQUEST_TIMEOUT_SECS`   | `10`                    | Per-request HTTP timeout             |
//! | `MEDIA_EXTENSIONS`       | `mp4`                   | Comma-separated video extensions     |
//! | `LOAD_MODEL_ANNOTATIONS` | `false`                 | Show model suggestions on open       |

use std::sync::Arc;

use mp4label_cli::repl;
use mp4label_events::SessionEventKind;
use mp4label_session::{SessionConfig, SessionHandle};
use mp4label_sync::{HttpAnnotationStore, SyncClient};
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mp4label=info,mp4label_cli=info,mp4label_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SessionConfig::from_env();

    let store = HttpAnnotationStore::new(&config.api_url, config.request_timeout)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        });

    tracing::info!(
        api_url = %config.api_url,
        autosave_delay_ms = config.autosave_delay.as_millis() as u64,
        "Starting mp4label",
    );

    let (session, task) = SessionHandle::spawn(&config, SyncClient::new(Arc::new(store)));
    tokio::spawn(log_events(session.clone()));

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = repl::run(&session, stdin, tokio::io::stdout()).await {
        tracing::error!(error = %e, "Terminal I/O failed");
    }

    session.shutdown();
    if let Err(e) = task.await {
        tracing::error!(error = %e, "Editing session task failed");
    }
}

/// Surface background save results, which arrive outside any command.
async fn log_events(session: SessionHandle) {
    let mut events = session.subscribe();
    loop {
        match events.recv().await {
            Ok(event) => match event.kind {
                SessionEventKind::SaveFailed { stem, message } => {
                    tracing::warn!(stem = %stem, error = %message, "Autosave failed");
                }
                SessionEventKind::DeleteFailed { stem, message } => {
                    tracing::warn!(stem = %stem, error = %message, "Delete failed");
                }
                SessionEventKind::Saved { stem } => {
                    tracing::debug!(stem = %stem, "Autosaved");
                }
                _ => {}
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Event log lagging");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
