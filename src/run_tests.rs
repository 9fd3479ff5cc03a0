//! Tests for the run module.

use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

use http::{HeaderMap, StatusCode};
use reactive_http::config::{Cli, ValidatedConfig};
use reactive_http::request::RequestController;
use reactive_http::transport::{HttpError, HttpRequest, HttpResponse};

/// Client that answers after a delay unless the request is cancelled first.
#[derive(Debug)]
struct SlowClient {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowClient {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }
}

impl HttpClient for SlowClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let token = req.cancel_token.expect("controller attaches a token");

        tokio::select! {
            () = token.cancelled() => Err(token.to_error()),
            () = tokio::time::sleep(self.delay) => Ok(HttpResponse::new(
                StatusCode::OK,
                HeaderMap::new(),
                br#"{"ok": true}"#.to_vec(),
            )),
        }
    }
}

fn config(args: &[&str]) -> ValidatedConfig {
    let mut full_args = vec!["reactive-http"];
    full_args.extend(args);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(full_args), None).unwrap()
}

mod run_error {
    use super::*;

    #[test]
    fn aborted_with_message() {
        let error = RunError::Aborted {
            message: Some("interrupted".to_string()),
        };
        assert_eq!(error.to_string(), "Request aborted: interrupted");
    }

    #[test]
    fn aborted_without_message() {
        let error = RunError::Aborted { message: None };
        assert_eq!(error.to_string(), "Request aborted");
    }

    #[test]
    fn request_failed_includes_summary() {
        let error = RunError::RequestFailed {
            summary: "State { phase: finished }".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Request failed: State { phase: finished }"
        );
    }
}

mod build_client {
    use super::*;

    #[test]
    fn applies_client_config() {
        let config = config(&[
            "--url",
            "users",
            "--base-url",
            "https://api.example.com/",
            "--timeout",
            "1234",
        ]);

        let client = build_client(&config).unwrap();

        assert_eq!(client.config(), &config.client);
        assert_eq!(client.config().timeout, Duration::from_millis(1234));
    }
}

mod outcome_mapping {
    use super::*;

    fn finished_with(status: u16) -> StateSnapshot<Value> {
        let state = RequestState::<Value>::new();
        state.status.set(Some(StatusCode::from_u16(status).unwrap()));
        state.is_successful.set(status < 400);
        state.has_failed.set(status >= 400);
        state.is_finished.set(true);
        state.snapshot()
    }

    #[test]
    fn success_is_ok() {
        assert!(outcome(&finished_with(200)).is_ok());
    }

    #[test]
    fn failure_status_is_request_failed() {
        let result = outcome(&finished_with(500));

        assert!(matches!(
            result,
            Err(RunError::RequestFailed { ref summary }) if summary.contains("status: 500")
        ));
    }

    #[test]
    fn aborted_takes_precedence_over_failed() {
        let state = RequestState::<Value>::new();
        state.abort_message.set(Some("stop".to_string()));
        state.aborted.set(true);
        state.has_failed.set(true);

        let result = outcome(&state.snapshot());

        assert!(matches!(
            result,
            Err(RunError::Aborted { message: Some(ref m) }) if m == "stop"
        ));
    }
}

mod render {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_is_printed_raw() {
        assert_eq!(render_data(&json!("hello")), "hello");
    }

    #[test]
    fn json_is_pretty_printed() {
        assert_eq!(render_data(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }
}

mod state_logging {
    use super::*;

    #[test]
    fn attaches_one_logger_per_reported_field() {
        let state = RequestState::<Value>::new();

        let loggers = log_state_changes(&state);

        assert_eq!(loggers.len(), 5);
        assert_eq!(state.is_loading.listener_count(), 1);
        assert_eq!(state.aborted.listener_count(), 1);
    }

    #[test]
    fn dropping_loggers_detaches_them() {
        let state = RequestState::<Value>::new();

        drop(log_state_changes(&state));

        assert_eq!(state.status.listener_count(), 0);
    }
}

mod driving {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completes_without_abort() {
        let controller = RequestController::new(SlowClient::new(Duration::from_millis(10)));

        drive(
            &controller,
            controller.get("/x"),
            Some(Duration::from_secs(1)),
            std::future::pending(),
        )
        .await;

        let state = controller.state();
        assert!(state.is_successful.get());
        assert!(!state.aborted.get());
    }

    #[tokio::test(start_paused = true)]
    async fn aborts_after_delay() {
        let controller = RequestController::new(SlowClient::new(Duration::from_secs(60)));

        drive(
            &controller,
            controller.get("/slow"),
            Some(Duration::from_millis(100)),
            std::future::pending(),
        )
        .await;

        let state = controller.state();
        assert!(state.aborted.get());
        assert_eq!(
            state.abort_message.get().as_deref(),
            Some("no response within 100ms")
        );
        assert!(state.is_finished.get());
        assert!(!state.is_loading.get());
    }

    #[tokio::test(start_paused = true)]
    async fn aborts_on_shutdown() {
        let controller = RequestController::new(SlowClient::new(Duration::from_secs(60)));

        drive(
            &controller,
            controller.get("/slow"),
            None,
            tokio::time::sleep(Duration::from_millis(5)),
        )
        .await;

        let state = controller.state();
        assert!(state.aborted.get());
        assert_eq!(state.abort_message.get().as_deref(), Some("interrupted"));
    }

    #[tokio::test(start_paused = true)]
    async fn aborts_mock_request_after_delay() {
        let controller = RequestController::new(SlowClient::new(Duration::ZERO));
        let response = HttpResponse::new(StatusCode::OK, HeaderMap::new(), vec![]);

        drive(
            &controller,
            controller.request_mock(HttpRequest::get("/mock"), response, None),
            Some(Duration::from_millis(500)),
            std::future::pending(),
        )
        .await;

        assert!(controller.state().aborted.get());
        assert_eq!(controller.client().calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            outcome(&controller.state().snapshot()),
            Err(RunError::Aborted { .. })
        ));
    }
}
