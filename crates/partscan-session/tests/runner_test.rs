use async_trait::async_trait;
use partscan_camera::{
    CameraController, ConstraintProfile, DecoderAdapter, DecoderErrorKind, DecoderEvent,
    DecoderFailure, Negotiator,
};
use partscan_core::{PartRecord, PartToken, PartscanError};
use partscan_lookup::{LookupError, PartLookup};
use partscan_session::{
    LookupStatus, Notice, NoticeLevel, Presenter, ScanSession, SessionRunner, SessionSnapshot,
    UserAction,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use url::Url;

/// Decoder fed frame by frame from the test.
struct FeedDecoder {
    open_failure: Option<DecoderFailure>,
    frames: mpsc::UnboundedReceiver<DecoderEvent>,
    close_delay: Duration,
    holding: bool,
}

#[async_trait]
impl DecoderAdapter for FeedDecoder {
    async fn open(&mut self, _profile: &ConstraintProfile) -> Result<(), DecoderFailure> {
        match self.open_failure.take() {
            Some(failure) => Err(failure),
            None => {
                self.holding = true;
                Ok(())
            }
        }
    }

    async fn next_event(&mut self) -> Option<DecoderEvent> {
        self.frames.recv().await
    }

    async fn close(&mut self) {
        tokio::time::sleep(self.close_delay).await;
        self.holding = false;
    }
}

/// Lookup whose answers are held back until the test opens a gate.
#[derive(Default)]
struct GatedLookup {
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: AtomicUsize,
}

impl GatedLookup {
    fn gate(&self, token: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(token.to_string(), rx);
        tx
    }
}

#[async_trait]
impl PartLookup for GatedLookup {
    async fn resolve(&self, token: &PartToken) -> partscan_lookup::Result<PartRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(token.as_str());
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if token.as_str() == "ZZ-0000" {
            return Err(LookupError::PartNotFound {
                token: token.to_string(),
            });
        }
        Ok(PartRecord {
            id: token.to_string(),
            name: format!("Part {token}"),
            quantity: 3,
            position: "Shelf1".to_string(),
            cad_assembly: String::new(),
        })
    }

    fn lookup_id(&self) -> &str {
        "gated"
    }
}

#[derive(Default)]
struct Log {
    snapshots: Vec<SessionSnapshot>,
    notices: Vec<Notice>,
    copied: Vec<String>,
    opened: Vec<String>,
}

#[derive(Clone, Default)]
struct RecordingPresenter {
    log: Arc<Mutex<Log>>,
    fail_copy: bool,
}

impl RecordingPresenter {
    fn titles(&self) -> Vec<String> {
        let log = self.log.lock().unwrap();
        log.notices.iter().map(|n| n.title.clone()).collect()
    }

    fn last_snapshot(&self) -> SessionSnapshot {
        let log = self.log.lock().unwrap();
        log.snapshots.last().cloned().expect("rendered at least once")
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, snapshot: &SessionSnapshot) -> partscan_core::Result<()> {
        self.log.lock().unwrap().snapshots.push(snapshot.clone());
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        self.log.lock().unwrap().notices.push(notice.clone());
    }

    fn copy_text(&mut self, text: &str) -> partscan_core::Result<()> {
        if self.fail_copy {
            return Err(PartscanError::Presentation(
                "clipboard unavailable".to_string(),
            ));
        }
        self.log.lock().unwrap().copied.push(text.to_string());
        Ok(())
    }

    fn open_link(&mut self, url: &Url) -> partscan_core::Result<()> {
        self.log.lock().unwrap().opened.push(url.to_string());
        Ok(())
    }
}

type RunHandle = JoinHandle<partscan_core::Result<SessionRunner<FeedDecoder, RecordingPresenter>>>;

struct Harness {
    actions: mpsc::Sender<UserAction>,
    frames: mpsc::UnboundedSender<DecoderEvent>,
    lookup: Arc<GatedLookup>,
    presenter: RecordingPresenter,
    handle: RunHandle,
}

impl Harness {
    fn spawn(open_failure: Option<DecoderFailure>, presenter: RecordingPresenter) -> Self {
        Self::spawn_with_close_delay(open_failure, presenter, Duration::ZERO)
    }

    fn spawn_with_close_delay(
        open_failure: Option<DecoderFailure>,
        presenter: RecordingPresenter,
        close_delay: Duration,
    ) -> Self {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (actions_tx, actions_rx) = mpsc::channel(16);
        let lookup = Arc::new(GatedLookup::default());

        let decoder = FeedDecoder {
            open_failure,
            frames: frames_rx,
            close_delay,
            holding: false,
        };
        let camera =
            CameraController::new(decoder, Negotiator::default(), Duration::from_millis(100));
        let runner = SessionRunner::new(
            ScanSession::default(),
            camera,
            Arc::clone(&lookup) as Arc<dyn PartLookup>,
            presenter.clone(),
        );

        Self {
            actions: actions_tx,
            frames: frames_tx,
            lookup,
            presenter,
            handle: tokio::spawn(runner.run(actions_rx)),
        }
    }

    async fn act(&self, action: UserAction) {
        self.actions.send(action).await.expect("runner alive");
        settle().await;
    }

    fn frame(&self, text: &str) {
        self.frames
            .send(DecoderEvent::Decoded(text.to_string()))
            .expect("decoder alive");
    }

    fn fail(&self, kind: DecoderErrorKind, message: &str) {
        self.frames
            .send(DecoderEvent::Failed(DecoderFailure::new(kind, message)))
            .expect("decoder alive");
    }

    async fn shutdown(self) -> SessionRunner<FeedDecoder, RecordingPresenter> {
        self.actions
            .send(UserAction::Shutdown)
            .await
            .expect("runner alive");
        self.handle.await.expect("join runner").expect("run session")
    }
}

/// With paused time this returns once every other task is idle.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

#[tokio::test(start_paused = true)]
async fn test_latest_lookup_wins_when_older_completes_last() {
    let h = Harness::spawn(None, RecordingPresenter::default());
    let gate_a = h.lookup.gate("AB-1111");
    let gate_b = h.lookup.gate("CD-2222");

    h.act(UserAction::Start).await;
    h.frame("AB-1111");
    h.frame("CD-2222");
    settle().await;

    let snapshot = h.presenter.last_snapshot();
    assert!(snapshot.running);
    assert_eq!(snapshot.history.len(), 2);
    assert!(matches!(
        snapshot.status,
        LookupStatus::InFlight { ref token } if token.as_str() == "CD-2222"
    ));

    gate_b.send(()).expect("release B");
    settle().await;
    gate_a.send(()).expect("release A");
    settle().await;

    let snapshot = h.presenter.last_snapshot();
    assert_eq!(
        snapshot.record.as_ref().map(|r| r.id.as_str()),
        Some("CD-2222")
    );
    let found = h
        .presenter
        .titles()
        .iter()
        .filter(|t| t.as_str() == "Part Found")
        .count();
    assert_eq!(found, 1);

    let runner = h.shutdown().await;
    assert_eq!(
        runner.session().current_record().map(|r| r.id.as_str()),
        Some("CD-2222")
    );
}

#[tokio::test(start_paused = true)]
async fn test_repeated_frames_look_up_once() {
    let h = Harness::spawn(None, RecordingPresenter::default());

    h.act(UserAction::Start).await;
    for _ in 0..3 {
        h.frame("PN: XY-9911");
    }
    settle().await;

    assert_eq!(h.lookup.calls.load(Ordering::SeqCst), 1);
    let titles = h.presenter.titles();
    assert_eq!(
        titles.iter().filter(|t| t.as_str() == "QR Code Scanned!").count(),
        1
    );
    let snapshot = h.presenter.last_snapshot();
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(
        snapshot.record.map(|r| r.id),
        Some("XY-9911".to_string())
    );

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_not_found_is_informational_and_retry_reissues() {
    let h = Harness::spawn(None, RecordingPresenter::default());

    h.act(UserAction::Start).await;
    h.frame("ZZ-0000");
    settle().await;

    let snapshot = h.presenter.last_snapshot();
    assert!(matches!(snapshot.status, LookupStatus::NotFound { .. }));
    assert!(snapshot.running);
    let log_level = {
        let log = h.presenter.log.lock().unwrap();
        log.notices.last().map(|n| n.level)
    };
    assert_eq!(log_level, Some(NoticeLevel::Info));

    h.act(UserAction::ManualLookup(PartToken::new("HL-012A")))
        .await;
    assert_eq!(h.lookup.calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        h.presenter.last_snapshot().record.map(|r| r.id),
        Some("HL-012A".to_string())
    );

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_permission_denied_stops_scanner() {
    let failure = DecoderFailure::new(DecoderErrorKind::PermissionDenied, "NotAllowedError");
    let h = Harness::spawn(Some(failure), RecordingPresenter::default());

    h.act(UserAction::Start).await;

    let snapshot = h.presenter.last_snapshot();
    assert!(!snapshot.running);
    assert_eq!(
        snapshot.camera_error.as_deref(),
        Some("Camera access denied. Please allow camera permissions.")
    );
    let last = h
        .presenter
        .log
        .lock()
        .unwrap()
        .notices
        .last()
        .cloned()
        .expect("notice");
    assert_eq!(last.title, "Scanner Error");
    assert_eq!(last.level, NoticeLevel::Destructive);

    // An explicit start tries again from the strictest profile.
    h.act(UserAction::Start).await;
    let snapshot = h.presenter.last_snapshot();
    assert!(snapshot.running);
    assert!(snapshot.camera_error.is_none());
    assert_eq!(snapshot.camera_label, "Back Camera");

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_switch_camera_changes_label() {
    let h = Harness::spawn(None, RecordingPresenter::default());

    h.act(UserAction::Start).await;
    assert_eq!(h.presenter.last_snapshot().camera_label, "Back Camera");

    h.act(UserAction::SwitchCamera).await;
    let snapshot = h.presenter.last_snapshot();
    assert!(snapshot.running);
    assert_eq!(snapshot.camera_label, "Front Camera");

    h.act(UserAction::Stop).await;
    assert!(!h.presenter.last_snapshot().running);

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_copy_and_open_link_notices() {
    let h = Harness::spawn(None, RecordingPresenter::default());

    h.act(UserAction::Copy("HL-012A".to_string())).await;
    h.act(UserAction::OpenLink("example.com/parts".to_string()))
        .await;
    h.act(UserAction::OpenLink("not a link".to_string())).await;

    {
        let log = h.presenter.log.lock().unwrap();
        assert_eq!(log.copied, vec!["HL-012A".to_string()]);
        assert_eq!(log.opened, vec!["https://example.com/parts".to_string()]);
    }
    assert_eq!(h.presenter.titles(), vec!["Copied!", "Invalid URL"]);

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_copy_failure_is_reported() {
    let presenter = RecordingPresenter {
        fail_copy: true,
        ..RecordingPresenter::default()
    };
    let h = Harness::spawn(None, presenter);

    h.act(UserAction::Copy("HL-012A".to_string())).await;
    assert_eq!(h.presenter.titles(), vec!["Copy Failed"]);

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_camera_failure_survives_action_during_release() {
    let h = Harness::spawn_with_close_delay(
        None,
        RecordingPresenter::default(),
        Duration::from_millis(50),
    );
    h.act(UserAction::Start).await;

    h.fail(DecoderErrorKind::PermissionDenied, "NotAllowedError");
    tokio::time::sleep(Duration::from_millis(10)).await;
    h.actions
        .send(UserAction::Copy("HL-012A".to_string()))
        .await
        .expect("runner alive");
    settle().await;

    let snapshot = h.presenter.last_snapshot();
    assert!(!snapshot.running);
    assert_eq!(
        snapshot.camera_error.as_deref(),
        Some("Camera access denied. Please allow camera permissions.")
    );
    assert_eq!(
        h.presenter.titles(),
        vec!["Copied!", "Scanner Error"]
    );

    let runner = h.shutdown().await;
    assert!(!runner.camera().decoder().holding);
}

#[tokio::test(start_paused = true)]
async fn test_camera_failure_reported_when_shutdown_interrupts_release() {
    let h = Harness::spawn_with_close_delay(
        None,
        RecordingPresenter::default(),
        Duration::from_millis(50),
    );
    h.act(UserAction::Start).await;

    h.fail(DecoderErrorKind::PermissionDenied, "NotAllowedError");
    tokio::time::sleep(Duration::from_millis(10)).await;
    h.actions
        .send(UserAction::Copy("HL-012A".to_string()))
        .await
        .expect("runner alive");

    let presenter = h.presenter.clone();
    let runner = h.shutdown().await;

    assert!(presenter.titles().contains(&"Scanner Error".to_string()));
    let snapshot = presenter.last_snapshot();
    assert!(!snapshot.running);
    assert!(snapshot.camera_error.is_some());
    assert!(!runner.camera().decoder().holding);
}
