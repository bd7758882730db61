//! End-to-end session flow over a mock scanning service:
//! consent → fingerprint → collect → scan → render → export.

use exposure_client::RemoteJobClient;
use exposure_core::config::ServiceConfig;
use exposure_core::types::JobRecord;
use exposure_fingerprint::{EnvironmentProbe, FingerprintCollector};
use exposure_session::{NullView, ResultFragment, SessionController, SessionView};

struct PinnedProbe;

impl EnvironmentProbe for PinnedProbe {
    fn user_agent(&self) -> Option<String> {
        Some("TestAgent/1.0".to_string())
    }
    fn language(&self) -> Option<String> {
        Some("en-US".to_string())
    }
    fn screen_width(&self) -> Option<u32> {
        Some(1920)
    }
    fn screen_height(&self) -> Option<u32> {
        Some(1080)
    }
    fn pixel_ratio(&self) -> Option<f64> {
        Some(1.0)
    }
    fn timezone(&self) -> Option<String> {
        Some("UTC".to_string())
    }
}

#[derive(Default)]
struct CapturingView {
    fragments: Vec<ResultFragment>,
    progress_events: Vec<Option<u8>>,
}

impl SessionView for CapturingView {
    fn progress(&mut self, percent: u8) {
        self.progress_events.push(Some(percent));
    }
    fn progress_cleared(&mut self) {
        self.progress_events.push(None);
    }
    fn show_fragments(&mut self, fragments: &[ResultFragment]) {
        self.fragments = fragments.to_vec();
    }
}

fn controller_for(url: &str) -> SessionController<PinnedProbe> {
    let client = RemoteJobClient::new(&ServiceConfig {
        base_url: url.to_string(),
        timeout_secs: 5,
    })
    .expect("create client");
    SessionController::new(FingerprintCollector::new(PinnedProbe), client)
}

#[tokio::test]
async fn full_session_flow_scan_and_export() {
    let mut server = mockito::Server::new_async().await;

    let collect_mock = server
        .mock("POST", "/collect")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"userAgent":"TestAgent/1.0","timezone":"UTC"}"#.to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let scan_mock = server
        .mock("POST", "/osint-scan")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"query":"alice","results":[{"platform":"X","match_type":"exact","confidence":0.873,"url":"https://x.example/alice","snippet":"found profile"}]}"#,
        )
        .create_async()
        .await;

    let mut controller = controller_for(&server.url());

    // The scan trigger is unreachable until consent completes.
    assert!(controller
        .on_scan_requested("alice", &mut NullView)
        .await
        .is_err());

    controller.gate_mut().set_phrase(" i Consent ");
    controller.gate_mut().set_acknowledged(true);
    controller
        .on_consent_granted(&mut NullView)
        .await
        .expect("consent flow succeeds");
    collect_mock.assert_async().await;

    let fingerprint = controller.fingerprint().expect("fingerprint captured");
    assert_eq!(fingerprint.seed, "TestAgent/1.0|1920x1080|en-US|UTC");

    let mut view = CapturingView::default();
    controller
        .on_scan_requested("alice", &mut view)
        .await
        .expect("scan succeeds");
    scan_mock.assert_async().await;

    // Progress started and was cleared.
    assert_eq!(view.progress_events.first(), Some(&Some(0)));
    assert_eq!(view.progress_events.last(), Some(&None));

    // 0.873 renders as 87%.
    match &view.fragments[..] {
        [ResultFragment::Match {
            platform,
            confidence_percent,
            snippet,
            ..
        }] => {
            assert_eq!(platform, "X");
            assert_eq!(*confidence_percent, 87);
            assert_eq!(snippet.as_deref(), Some("found profile"));
        }
        other => panic!("expected one match fragment, got {other:?}"),
    }

    // Export round-trips byte-identically to the cached job.
    let tmp = tempfile::TempDir::new().expect("create temp dir");
    let path = controller
        .export_last_job(tmp.path())
        .expect("export succeeds");

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("utf-8 filename");
    assert!(name.starts_with("osint_alice_"));
    assert!(name.ends_with(".json"));

    let written = std::fs::read_to_string(&path).expect("read artifact");
    match controller.last_job().expect("job cached") {
        JobRecord::Scan(cached) => {
            let parsed: exposure_core::types::ScanJob =
                serde_json::from_str(&written).expect("parse artifact");
            assert_eq!(&parsed, cached);
        }
        JobRecord::Simulation(_) => panic!("expected scan record"),
    }
}

#[tokio::test]
async fn simulation_flow_uses_owner_and_fallback_token() {
    let mut server = mockito::Server::new_async().await;

    let _collect_mock = server
        .mock("POST", "/collect")
        .with_status(200)
        .create_async()
        .await;

    let mut controller = controller_for(&server.url());
    controller.gate_mut().set_phrase("I CONSENT");
    controller.gate_mut().set_acknowledged(true);
    controller
        .on_consent_granted(&mut NullView)
        .await
        .expect("consent flow succeeds");

    let owner = controller
        .fingerprint()
        .map(|fp| fp.digest.as_str().to_string())
        .expect("fingerprint captured");

    let sim_mock = server
        .mock("GET", "/simulate-tracking")
        .match_query(mockito::Matcher::UrlEncoded("owner".to_string(), owner))
        .with_status(200)
        .with_body(r#"{"trackers":3,"profile":"low"}"#)
        .create_async()
        .await;

    controller
        .on_simulate_requested(&mut NullView)
        .await
        .expect("simulation succeeds");
    sim_mock.assert_async().await;

    let tmp = tempfile::TempDir::new().expect("create temp dir");
    let path = controller
        .export_last_job(tmp.path())
        .expect("export succeeds");
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("utf-8 filename");
    assert!(name.starts_with("osint_simulation_"));

    let written = std::fs::read_to_string(&path).expect("read artifact");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("parse artifact");
    assert_eq!(parsed["trackers"], 3);
}
