//! Application execution logic.
//!
//! Issues the configured request through a [`RequestController`], logs
//! every observable state change, and aborts the request on Ctrl+C or when
//! the configured abort delay elapses.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::signal;

use reactive_http::config::ValidatedConfig;
use reactive_http::reactive::Subscription;
use reactive_http::request::{RequestController, RequestState, StateSnapshot};
use reactive_http::time::Sleeper;
use reactive_http::transport::{HttpClient, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request settled as failed (transport error or status >= 400).
    #[error("Request failed: {summary}")]
    RequestFailed {
        /// Final state of the request
        summary: String,
    },

    /// The request was aborted before it settled.
    #[error("Request aborted{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Aborted {
        /// Message passed to `abort`
        message: Option<String>,
    },
}

/// Executes the configured request.
///
/// This function:
/// 1. Builds the transport from the validated client configuration
/// 2. Creates the request controller and attaches state loggers
/// 3. Runs the request (or the canned mock response)
/// 4. Aborts it on Ctrl+C or after the configured delay
/// 5. Prints the response data on success
///
/// # Errors
///
/// Returns an error if the client cannot be built, or if the request
/// fails or is aborted.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires a real
/// async runtime with signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let client = build_client(&config)?;
    let controller = RequestController::new(client);
    let _loggers = log_state_changes(controller.state());
    let request = config.to_request();

    let run = async {
        match &config.mock {
            Some(mock) => {
                tracing::info!(
                    "Mock mode enabled (status {}, delay {}ms)",
                    mock.status.as_u16(),
                    mock.delay.as_millis()
                );
                controller
                    .request_mock(request, mock.to_response(), Some(mock.delay))
                    .await;
            }
            None => controller.request(request).await,
        }
    };

    drive(&controller, run, config.abort_after, shutdown_signal()).await;

    let snapshot = controller.state().snapshot();
    let result = outcome(&snapshot);

    if result.is_ok() {
        if let Some(ref data) = snapshot.data {
            println!("{}", render_data(data));
        }
    }

    result
}

/// Creates the production transport from configuration.
fn build_client(config: &ValidatedConfig) -> Result<ReqwestClient, RunError> {
    let inner = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(RunError::ClientBuild)?;

    Ok(ReqwestClient::from_client(inner, config.client.clone()))
}

/// Registers loggers on the fields worth reporting.
///
/// The loggers stay attached for as long as the returned subscriptions
/// are alive.
fn log_state_changes(state: &RequestState<Value>) -> Vec<Subscription> {
    let abort_view = state.clone();

    vec![
        state.is_loading.on_change(|loading| {
            tracing::debug!("loading: {loading}");
        }),
        state.status.on_change(|status| {
            if let Some(status) = status {
                tracing::info!("Status: {status}");
            }
        }),
        state.error.on_change(|error| {
            if let Some(error) = error {
                tracing::warn!("Error: {error}");
            }
        }),
        state.aborted.on_change(move |aborted| {
            if *aborted {
                let message = abort_view.abort_message.get();
                tracing::warn!(
                    "Aborted: {}",
                    message.as_deref().unwrap_or("no reason given")
                );
            }
        }),
        state.is_finished.on_change(|finished| {
            if *finished {
                tracing::debug!("Request finished");
            }
        }),
    ]
}

/// Runs `request` to completion, aborting it when `abort_after` elapses or
/// `shutdown` completes first.
///
/// The abort only requests cancellation; this function still waits for
/// the request to settle so the final state is complete.
async fn drive<C, S, F, Sd>(
    controller: &RequestController<C, Value, S>,
    request: F,
    abort_after: Option<Duration>,
    shutdown: Sd,
) where
    C: HttpClient,
    S: Sleeper,
    F: Future<Output = ()>,
    Sd: Future<Output = ()>,
{
    let timer = async {
        match abort_after {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending().await,
        }
    };

    tokio::pin!(request);
    tokio::pin!(timer);
    tokio::pin!(shutdown);

    let mut timer_fired = false;
    let mut shutdown_fired = false;

    loop {
        tokio::select! {
            biased;

            () = &mut request => return,

            () = &mut timer, if !timer_fired => {
                timer_fired = true;
                if let Some(delay) = abort_after {
                    controller.abort(Some(format!("no response within {}ms", delay.as_millis())));
                }
            }

            () = &mut shutdown, if !shutdown_fired => {
                shutdown_fired = true;
                tracing::info!("Shutdown signal received, aborting request...");
                controller.abort(Some("interrupted".to_string()));
            }
        }
    }
}

/// Maps the final state of a request to the run result.
fn outcome(snapshot: &StateSnapshot<Value>) -> Result<(), RunError> {
    if snapshot.aborted {
        return Err(RunError::Aborted {
            message: snapshot.abort_message.clone(),
        });
    }

    if snapshot.has_failed {
        return Err(RunError::RequestFailed {
            summary: snapshot.to_string(),
        });
    }

    Ok(())
}

/// Formats response data for stdout.
///
/// Text is printed as-is, structured JSON is pretty-printed.
fn render_data(data: &Value) -> String {
    match data {
        Value::String(text) => text.clone(),
        other => format!("{other:#}"),
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// A signal that cannot be installed is logged and never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
