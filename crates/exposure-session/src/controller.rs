//! Session controller: the ordered consent → fingerprint → scan flow.

use crate::error::{Result, SessionError};
use crate::export;
use crate::render::render;
use crate::view::SessionView;
use exposure_client::RemoteJobClient;
use exposure_consent::ConsentGate;
use exposure_core::types::{JobRecord, ScanRequest};
use exposure_fingerprint::{EnvironmentProbe, Fingerprint, FingerprintCollector};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Owns the session state and sequences every allowed transition.
///
/// State here is deliberately minimal: the consent gate, the fingerprint
/// captured after consent, the single most recent job response, and a
/// busy flag that keeps remote jobs serialized. Nothing is persisted;
/// a new session starts from scratch.
pub struct SessionController<P: EnvironmentProbe> {
    gate: ConsentGate,
    collector: FingerprintCollector<P>,
    client: RemoteJobClient,
    fingerprint: Option<Fingerprint>,
    last_job: Option<JobRecord>,
    job_in_flight: bool,
}

impl<P: EnvironmentProbe> SessionController<P> {
    /// Create a controller with a fresh consent gate and no session state.
    #[must_use]
    pub fn new(collector: FingerprintCollector<P>, client: RemoteJobClient) -> Self {
        Self {
            gate: ConsentGate::new(),
            collector,
            client,
            fingerprint: None,
            last_job: None,
            job_in_flight: false,
        }
    }

    /// The consent gate, for feeding phrase/acknowledgment edits.
    pub fn gate_mut(&mut self) -> &mut ConsentGate {
        &mut self.gate
    }

    /// The consent gate, read-only.
    #[must_use]
    pub fn gate(&self) -> &ConsentGate {
        &self.gate
    }

    /// The session fingerprint, if captured.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// The most recently received job response, if any.
    #[must_use]
    pub fn last_job(&self) -> Option<&JobRecord> {
        self.last_job.as_ref()
    }

    /// Record the consent grant and run the enablement sequence:
    /// lock the consent control, capture and reveal the fingerprint,
    /// submit the collect payload, and unlock the scan triggers.
    ///
    /// The consent control is locked before the network call begins, so
    /// re-entry is impossible even while the call is slow. A failed
    /// collect submission is reported through the view but does not
    /// forfeit the session.
    ///
    /// # Errors
    /// Returns the gate's error if consent is not eligible or was
    /// already granted.
    pub async fn on_consent_granted(&mut self, view: &mut dyn SessionView) -> Result<()> {
        self.gate.grant()?;
        view.consent_locked();

        let fingerprint = self.collector.collect();
        view.fingerprint_revealed(&fingerprint);

        let payload = fingerprint.to_collect_payload();
        self.fingerprint = Some(fingerprint);

        if let Err(e) = self.client.submit_collect(&payload).await {
            warn!(error = %e, "collect submission failed");
            view.show_error(&e.to_string());
        }

        view.scan_unlocked();
        info!("session enabled for scanning");
        Ok(())
    }

    /// Run an OSINT scan for `query`.
    ///
    /// Fails fast with a validation error — before any network call —
    /// if the trimmed query is empty, no fingerprint has been captured,
    /// or another remote job is in flight. The response (even a
    /// service-reported error) replaces the session's last job; the
    /// progress indicator is cleared on every outcome.
    pub async fn on_scan_requested(
        &mut self,
        query: &str,
        view: &mut dyn SessionView,
    ) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SessionError::Validation(
                "enter a username to scan".to_string(),
            ));
        }

        let owner = self.require_owner()?;
        self.begin_job()?;
        view.progress(0);

        let request = ScanRequest {
            query: query.to_string(),
            owner,
        };
        let outcome = self.client.request_scan(&request).await;

        self.job_in_flight = false;
        view.progress_cleared();

        match outcome {
            Ok(job) => {
                let fragments = render(&job);
                let service_error = job.error.clone();
                self.last_job = Some(JobRecord::Scan(job));
                view.show_fragments(&fragments);

                match service_error {
                    Some(message) => Err(SessionError::Service(message)),
                    None => Ok(()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Request a tracking-simulation report for the session owner.
    ///
    /// Same owner precondition and serialization rule as scanning; the
    /// report replaces the session's last job.
    pub async fn on_simulate_requested(&mut self, view: &mut dyn SessionView) -> Result<()> {
        let owner = self.require_owner()?;
        self.begin_job()?;
        view.progress(0);

        let outcome = self.client.request_simulation(&owner).await;

        self.job_in_flight = false;
        view.progress_cleared();

        match outcome {
            Ok(report) => {
                let service_error = report
                    .get("error")
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string);
                self.last_job = Some(JobRecord::Simulation(report.clone()));

                match service_error {
                    Some(message) => Err(SessionError::Service(message)),
                    None => {
                        view.show_report(&report);
                        Ok(())
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Export the last job to a JSON artifact in `dir`.
    ///
    /// # Errors
    /// Validation error if no job has completed yet; no file is written.
    pub fn export_last_job(&self, dir: &Path) -> Result<PathBuf> {
        let job = self
            .last_job
            .as_ref()
            .ok_or_else(|| SessionError::Validation("no results to export yet".to_string()))?;
        export::export_job(job, dir)
    }

    /// Owner-token precondition shared by scan and simulation.
    fn require_owner(&self) -> Result<String> {
        self.fingerprint
            .as_ref()
            .map(|fp| fp.digest.as_str().to_string())
            .ok_or_else(|| {
                SessionError::Validation(
                    "no fingerprint captured yet; grant consent first".to_string(),
                )
            })
    }

    /// One remote job at a time: competing triggers are rejected while
    /// one is outstanding.
    fn begin_job(&mut self) -> Result<()> {
        if self.job_in_flight {
            return Err(SessionError::Validation(
                "another remote job is in flight".to_string(),
            ));
        }
        self.job_in_flight = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ResultFragment;
    use crate::view::NullView;
    use exposure_core::config::ServiceConfig;

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

    /// View that records effect names in order.
    #[derive(Default)]
    struct RecordingView {
        events: Vec<String>,
        fragments: Vec<ResultFragment>,
    }

    impl SessionView for RecordingView {
        fn consent_locked(&mut self) {
            self.events.push("consent_locked".to_string());
        }
        fn fingerprint_revealed(&mut self, _fingerprint: &Fingerprint) {
            self.events.push("fingerprint_revealed".to_string());
        }
        fn scan_unlocked(&mut self) {
            self.events.push("scan_unlocked".to_string());
        }
        fn progress(&mut self, percent: u8) {
            self.events.push(format!("progress:{percent}"));
        }
        fn progress_cleared(&mut self) {
            self.events.push("progress_cleared".to_string());
        }
        fn show_error(&mut self, message: &str) {
            self.events.push(format!("error:{message}"));
        }
        fn show_fragments(&mut self, fragments: &[ResultFragment]) {
            self.events.push("fragments".to_string());
            self.fragments = fragments.to_vec();
        }
        fn show_report(&mut self, _report: &serde_json::Value) {
            self.events.push("report".to_string());
        }
    }

    fn controller(base_url: &str) -> SessionController<PinnedProbe> {
        let client = RemoteJobClient::new(&ServiceConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .expect("create client");
        SessionController::new(FingerprintCollector::new(PinnedProbe), client)
    }

    fn grant_consent(controller: &mut SessionController<PinnedProbe>) {
        controller.gate_mut().set_phrase("I CONSENT");
        controller.gate_mut().set_acknowledged(true);
    }

    #[tokio::test]
    async fn test_scan_rejected_before_consent_no_network() {
        let mut server = mockito::Server::new_async().await;
        let scan_mock = server
            .mock("POST", "/osint-scan")
            .expect(0)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        let err = controller
            .on_scan_requested("alice", &mut NullView)
            .await
            .expect_err("no fingerprint yet");

        assert!(err.is_validation());
        scan_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_query_rejected_no_network() {
        let mut server = mockito::Server::new_async().await;
        let scan_mock = server
            .mock("POST", "/osint-scan")
            .expect(0)
            .create_async()
            .await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);
        controller
            .on_consent_granted(&mut NullView)
            .await
            .expect("consent flow succeeds");

        for query in ["", "   ", "\t\n"] {
            let err = controller
                .on_scan_requested(query, &mut NullView)
                .await
                .expect_err("empty query rejected");
            assert!(err.is_validation());
        }
        scan_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_consent_grant_required_and_not_reentrant() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;

        let mut controller = controller(&server.url());

        // Not eligible yet.
        let err = controller
            .on_consent_granted(&mut NullView)
            .await
            .expect_err("gate not eligible");
        assert!(matches!(err, SessionError::Consent(_)));

        grant_consent(&mut controller);
        controller
            .on_consent_granted(&mut NullView)
            .await
            .expect("consent flow succeeds");
        assert!(controller.fingerprint().is_some());

        // Re-entry is rejected by the gate.
        let err = controller
            .on_consent_granted(&mut NullView)
            .await
            .expect_err("re-entry rejected");
        assert!(matches!(err, SessionError::Consent(_)));
    }

    #[tokio::test]
    async fn test_consent_sequence_locks_before_network() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);

        let mut view = RecordingView::default();
        controller
            .on_consent_granted(&mut view)
            .await
            .expect("consent flow succeeds");

        assert_eq!(
            view.events,
            vec!["consent_locked", "fingerprint_revealed", "scan_unlocked"]
        );
    }

    #[tokio::test]
    async fn test_collect_failure_reported_but_session_survives() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);

        let mut view = RecordingView::default();
        controller
            .on_consent_granted(&mut view)
            .await
            .expect("collect failure is non-fatal");

        assert!(view.events.iter().any(|e| e.starts_with("error:")));
        assert_eq!(view.events.last().map(String::as_str), Some("scan_unlocked"));
        assert!(controller.fingerprint().is_some());
    }

    #[tokio::test]
    async fn test_progress_cleared_on_success_and_failure() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;
        let _ok_mock = server
            .mock("POST", "/osint-scan")
            .with_status(200)
            .with_body(r#"{"query":"alice","results":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);
        controller
            .on_consent_granted(&mut NullView)
            .await
            .expect("consent flow succeeds");

        // Success path.
        let mut view = RecordingView::default();
        controller
            .on_scan_requested("alice", &mut view)
            .await
            .expect("scan succeeds");
        assert!(view.events.contains(&"progress_cleared".to_string()));

        // Failure path: swap the scan endpoint for a 500.
        let _fail_mock = server
            .mock("POST", "/osint-scan")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let mut view = RecordingView::default();
        let err = controller
            .on_scan_requested("alice", &mut view)
            .await
            .expect_err("scan fails");
        assert!(matches!(err, SessionError::Client(_)));
        assert!(view.events.contains(&"progress_cleared".to_string()));

        // The controller is idle again after the failure.
        controller
            .on_scan_requested("alice", &mut NullView)
            .await
            .expect_err("still failing endpoint, but reachable");
    }

    #[tokio::test]
    async fn test_scan_carries_owner_token() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);
        controller
            .on_consent_granted(&mut NullView)
            .await
            .expect("consent flow succeeds");

        let owner = controller
            .fingerprint()
            .map(|fp| fp.digest.as_str().to_string())
            .expect("fingerprint captured");

        let scan_mock = server
            .mock("POST", "/osint-scan")
            .match_body(mockito::Matcher::PartialJsonString(format!(
                r#"{{"query":"alice","owner":"{owner}"}}"#
            )))
            .with_status(200)
            .with_body(r#"{"query":"alice","results":[]}"#)
            .create_async()
            .await;

        controller
            .on_scan_requested("alice", &mut NullView)
            .await
            .expect("scan succeeds");
        scan_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_service_error_replaces_last_job_and_renders_error_only() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;
        let _scan_mock = server
            .mock("POST", "/osint-scan")
            .with_status(200)
            .with_body(r#"{"error":"quota exceeded"}"#)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);
        controller
            .on_consent_granted(&mut NullView)
            .await
            .expect("consent flow succeeds");

        let mut view = RecordingView::default();
        let err = controller
            .on_scan_requested("alice", &mut view)
            .await
            .expect_err("service error surfaces");
        assert!(matches!(err, SessionError::Service(_)));

        assert_eq!(
            view.fragments,
            vec![ResultFragment::Error {
                message: "quota exceeded".to_string()
            }]
        );
        assert!(controller.last_job().is_some());
    }

    #[tokio::test]
    async fn test_export_without_job_is_validation_error() {
        let mut server = mockito::Server::new_async().await;
        let controller = controller(&server.url());

        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let err = controller
            .export_last_job(tmp.path())
            .expect_err("nothing to export");
        assert!(err.is_validation());

        // No file was written.
        assert_eq!(
            std::fs::read_dir(tmp.path())
                .expect("read temp dir")
                .count(),
            0
        );
        drop(server);
    }

    #[tokio::test]
    async fn test_simulation_replaces_last_job() {
        let mut server = mockito::Server::new_async().await;
        let _collect_mock = server
            .mock("POST", "/collect")
            .with_status(200)
            .create_async()
            .await;
        let _scan_mock = server
            .mock("POST", "/osint-scan")
            .with_status(200)
            .with_body(r#"{"query":"alice","results":[]}"#)
            .create_async()
            .await;
        let _sim_mock = server
            .mock("GET", "/simulate-tracking")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"trackers":3}"#)
            .create_async()
            .await;

        let mut controller = controller(&server.url());
        grant_consent(&mut controller);
        controller
            .on_consent_granted(&mut NullView)
            .await
            .expect("consent flow succeeds");
        controller
            .on_scan_requested("alice", &mut NullView)
            .await
            .expect("scan succeeds");
        assert!(matches!(controller.last_job(), Some(JobRecord::Scan(_))));

        let mut view = RecordingView::default();
        controller
            .on_simulate_requested(&mut view)
            .await
            .expect("simulation succeeds");
        assert!(matches!(
            controller.last_job(),
            Some(JobRecord::Simulation(_))
        ));
        assert!(view.events.contains(&"report".to_string()));
    }
}
