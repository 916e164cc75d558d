mod common;

use common::*;
use report_webapp::ui::{MemoryPage, ReportForm, SubmitControl, SUBMITTING_LABEL, SUBMIT_LABEL};
use report_webapp::{
    CallerIdentity, EventDisposition, LogLevel, PreviewOutcome, StubHost, SubmitError, Trigger,
    UiEvent, WebApp, WebAppConfig,
};

type TestApp = WebApp<StubHost, MemoryPage, ScriptedTransport, MapLoader>;

fn launch(host: StubHost, endpoint: &str, transport: &ScriptedTransport, loader: MapLoader) -> TestApp {
    let (reporter, _) = visible_reporter();
    WebApp::launch(
        WebAppConfig::new(endpoint),
        host,
        filled_page(),
        reporter,
        transport.clone(),
        loader,
    )
}

fn ann() -> StubHost {
    StubHost::with_user(CallerIdentity::new(42).with_names(Some("Ann"), None))
}

#[tokio::test]
async fn scenario_a_success_clears_form() {
    let transport = ScriptedTransport::default();
    transport.push_json(200, r#"{"status":"success","message":"Saved"}"#);
    let app = launch(ann(), ENDPOINT, &transport, MapLoader::default().with("bol.jpg", b"img"));

    assert_eq!(app.session().trigger, Trigger::MainButton);
    app.handle(UiEvent::AttachmentChanged(Some(image("bol.jpg")))).await;
    assert!(app.page().memory_preview().unwrap().is_visible());

    let handled = app.handle(UiEvent::MainButtonClicked).await;
    assert!(matches!(handled.submission, Some(Ok(_))));
    assert_eq!(handled.disposition, EventDisposition::Default);

    let latest = app.reporter().latest().unwrap();
    assert_eq!(latest.message, "Saved");
    assert_eq!(latest.level, LogLevel::Success);

    let form = app.page().memory_form().unwrap();
    assert_eq!(form.field("truck_number").as_deref(), Some(""));
    assert!(form.attachment().is_none());
    assert!(!app.page().memory_preview().unwrap().is_visible());

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.field("telegram_user_id"), Some("42"));
    assert_eq!(sent.field("telegram_user_fullname"), Some("Ann"));
    assert_eq!(sent.field("truck_number"), Some("TX-1"));
    let attachment = sent.attachment.unwrap();
    assert_eq!(attachment.file_name, "bol.jpg");
    assert_eq!(attachment.bytes, b"img");

    let button = app.host().button().unwrap();
    assert!(!button.is_progress_visible());
}

#[tokio::test]
async fn scenario_b_server_error_keeps_form() {
    let transport = ScriptedTransport::default();
    transport.push_json(500, r#"{"status":"error","message":"DB down"}"#);
    let app = launch(ann(), ENDPOINT, &transport, MapLoader::default());

    let handled = app.handle(UiEvent::MainButtonClicked).await;
    assert!(matches!(
        handled.submission,
        Some(Err(SubmitError::Rejected { status: 500, .. }))
    ));

    let latest = app.reporter().latest().unwrap();
    assert_eq!(latest.level, LogLevel::Error);
    assert!(latest.message.contains("DB down"));

    let form = app.page().memory_form().unwrap();
    assert_eq!(form.field("truck_number").as_deref(), Some("TX-1"));

    let control = app.page().memory_submit().unwrap();
    assert!(control.is_enabled());
    assert_eq!(control.label(), SUBMIT_LABEL);
    assert!(!app.host().button().unwrap().is_progress_visible());
}

#[tokio::test]
async fn scenario_c_html_answer_is_a_protocol_error() {
    let transport = ScriptedTransport::default();
    transport.push(Ok(response(200, Some("text/html"), "<html>Bad Gateway</html>")));
    let app = launch(ann(), ENDPOINT, &transport, MapLoader::default());

    let handled = app.handle(UiEvent::MainButtonClicked).await;
    assert!(matches!(handled.submission, Some(Err(SubmitError::Protocol { .. }))));

    let latest = app.reporter().latest().unwrap();
    assert_eq!(latest.level, LogLevel::Error);
    assert!(latest.message.contains("non-JSON"));
    assert!(latest.message.contains("<html>Bad Gateway</html>"));
    assert_eq!(
        app.page().memory_form().unwrap().field("truck_number").as_deref(),
        Some("TX-1")
    );
}

#[tokio::test]
async fn scenario_d_no_identity_means_no_request() {
    let transport = ScriptedTransport::default();
    transport.push_json(200, r#"{"status":"success"}"#);
    let app = launch(StubHost::without_user(), ENDPOINT, &transport, MapLoader::default());

    assert_eq!(app.session().trigger, Trigger::Disabled);

    // Main button was never bound
    let handled = app.handle(UiEvent::MainButtonClicked).await;
    assert!(handled.submission.is_none());

    let handled = app.handle(app.submit_event()).await;
    assert_eq!(handled.disposition, EventDisposition::PreventDefault);
    assert!(matches!(handled.submission, Some(Err(SubmitError::MissingIdentity))));
    assert_eq!(transport.calls(), 0);
    assert_eq!(
        app.reporter().latest().unwrap().message,
        "Cannot submit: Telegram user information is missing."
    );
}

#[tokio::test]
async fn unavailable_host_never_submits() {
    let transport = ScriptedTransport::default();
    let app = launch(
        StubHost::unavailable("Telegram is not defined"),
        ENDPOINT,
        &transport,
        MapLoader::default(),
    );

    let handled = app.handle(UiEvent::FormSubmitted).await;
    assert!(matches!(handled.submission, Some(Err(SubmitError::MissingIdentity))));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn insecure_endpoint_means_no_request() {
    for endpoint in [
        "http://api.example.com/web/submit_report",
        "YOUR_BACKEND_API_URL_HERE/web/submit_report",
    ] {
        let transport = ScriptedTransport::default();
        let app = launch(ann(), endpoint, &transport, MapLoader::default());

        assert_eq!(app.session().trigger, Trigger::Disabled);
        let handled = app.handle(app.submit_event()).await;
        assert!(matches!(handled.submission, Some(Err(SubmitError::Config(_)))));
        assert_eq!(transport.calls(), 0);

        let latest = app.reporter().latest().unwrap();
        assert_eq!(latest.level, LogLevel::Error);
        assert!(latest
            .message
            .starts_with("Backend API URL is not configured correctly"));
        assert!(!latest.message.contains("Telegram user information"));
    }
}

#[tokio::test]
async fn second_click_during_flight_is_ignored() {
    let transport = ScriptedTransport::default();
    let gate = transport.push_gated();
    let app = launch(ann(), ENDPOINT, &transport, MapLoader::default());

    let first = app.handle(UiEvent::MainButtonClicked);
    let second = async {
        // Let the first click reach the network before clicking again
        tokio::task::yield_now().await;
        let control = app.page().memory_submit().unwrap();
        assert!(!control.is_enabled());
        assert_eq!(control.label(), SUBMITTING_LABEL);
        assert!(app.host().button().unwrap().is_progress_visible());
        let handled = app.handle(UiEvent::MainButtonClicked).await;
        gate.send(response(200, Some("application/json"), r#"{"status":"success"}"#))
            .unwrap();
        handled
    };

    let (first, second) = tokio::join!(first, second);
    assert!(matches!(first.submission, Some(Ok(_))));
    assert!(matches!(second.submission, Some(Err(SubmitError::Busy))));
    assert_eq!(transport.calls(), 1);

    // The dropped click leaves no trace in the status log
    let entries = app.reporter().snapshot();
    let attempts = messages(&entries)
        .into_iter()
        .filter(|m| *m == "Attempting to submit...")
        .count();
    assert_eq!(attempts, 1);
    assert!(entries.iter().all(|e| !e.message.contains("already in progress")));
    assert!(app.page().memory_submit().unwrap().is_enabled());
}

#[tokio::test]
async fn failures_can_be_retried_by_hand() {
    let transport = ScriptedTransport::default();
    transport.push(Err(report_webapp::TransportError::Other(
        "network unreachable".to_string(),
    )));
    transport.push_json(200, r#"{"status":"success","message":"Saved"}"#);
    let app = launch(ann(), ENDPOINT, &transport, MapLoader::default());

    let first = app.handle(UiEvent::MainButtonClicked).await;
    assert!(matches!(first.submission, Some(Err(ref e)) if e.is_unexpected()));
    assert_eq!(transport.calls(), 1);

    let second = app.handle(UiEvent::MainButtonClicked).await;
    assert!(matches!(second.submission, Some(Ok(_))));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn preview_follows_latest_selection() {
    let transport = ScriptedTransport::default();
    let loader = MapLoader::default()
        .with("first.jpg", b"one")
        .with("second.jpg", b"two");
    let app = launch(ann(), ENDPOINT, &transport, loader);

    let outcome = app
        .handle(UiEvent::AttachmentChanged(Some(image("first.jpg"))))
        .await;
    assert_eq!(outcome.preview, Some(PreviewOutcome::Shown));
    app.handle(UiEvent::AttachmentChanged(Some(image("second.jpg"))))
        .await;

    let form = app.page().memory_form().unwrap();
    assert_eq!(form.attachment().unwrap().bytes, b"two");

    let cleared = app.handle(UiEvent::AttachmentChanged(None)).await;
    assert_eq!(cleared.preview, Some(PreviewOutcome::Cleared));
    assert!(!app.page().memory_preview().unwrap().is_visible());
    assert!(form.attachment().is_none());
}

#[tokio::test]
async fn status_log_stays_bounded_over_many_attempts() {
    let transport = ScriptedTransport::default();
    for _ in 0..15 {
        transport.push_json(500, r#"{"status":"error","message":"DB down"}"#);
    }
    let app = launch(ann(), ENDPOINT, &transport, MapLoader::default());

    for _ in 0..15 {
        app.handle(UiEvent::MainButtonClicked).await;
    }

    let entries = app.reporter().snapshot();
    assert_eq!(entries.len(), 20);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(messages(&entries[..2]), vec!["Submission Error: DB down", "Attempting to submit..."]);
}

#[tokio::test]
async fn visible_log_matches_reporter() {
    let transport = ScriptedTransport::default();
    transport.push_json(200, r#"{"status":"success","message":"Saved"}"#);
    let (reporter, log) = visible_reporter();
    let app = WebApp::launch(
        WebAppConfig::new(ENDPOINT),
        ann(),
        filled_page(),
        reporter,
        transport.clone(),
        MapLoader::default(),
    );

    app.handle(UiEvent::MainButtonClicked).await;

    let lines = log.lines();
    assert_eq!(lines.len(), app.reporter().len());
    assert!(lines[0].ends_with("SUCCESS: Saved"));
    assert!(lines.last().unwrap().contains("INFO: Initializing"));
}
