use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::Notify, task::JoinHandle};
use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

use crate::{
    pipeline::{Pipeline, Stage},
    types::AnalysisResult,
};

/// Monotonic per-session run number. Later runs compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub u64);

/// What the presentation layer sees.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub run: Option<RunId>,
    pub trace_id: Option<Uuid>,
    pub stage: Stage,
    pub result: Option<Arc<AnalysisResult>>,
    pub error: Option<String>,
}

/// Latest-value slot that only accepts writes from the current run
struct RunSlot {
    next_run: AtomicU64,
    view: Mutex<SessionSnapshot>,
    notify: Notify,
}

impl RunSlot {
    fn new() -> Self {
        Self {
            next_run: AtomicU64::new(0),
            view: Mutex::new(SessionSnapshot::default()),
            notify: Notify::new(),
        }
    }

    fn begin(&self) -> (RunId, Uuid) {
        let mut view = self.view.lock().expect("RunSlot poisoned");
        let run = RunId(self.next_run.fetch_add(1, Ordering::Relaxed) + 1);
        let trace_id = Uuid::new_v4();
        *view = SessionSnapshot {
            run: Some(run),
            trace_id: Some(trace_id),
            stage: Stage::Idle,
            result: None,
            error: None,
        };
        drop(view);
        self.notify.notify_waiters();
        (run, trace_id)
    }

    fn commit(&self, run: RunId, apply: impl FnOnce(&mut SessionSnapshot)) -> bool {
        let mut view = self.view.lock().expect("RunSlot poisoned");
        if view.run != Some(run) {
            debug!(stale_run = run.0, current_run = ?view.run, "dropping write from superseded run");
            return false;
        }
        apply(&mut view);
        drop(view);
        self.notify.notify_waiters();
        true
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.view.lock().expect("RunSlot poisoned").clone()
    }
}

/// Owns the current run. Starting a new run cancels and supersedes the old one.
pub struct AnalysisSession {
    pipeline: Arc<Pipeline>,
    slot: Arc<RunSlot>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AnalysisSession {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            slot: Arc::new(RunSlot::new()),
            task: Mutex::new(None),
        }
    }

    /// Start analysing `url`; must be called inside a tokio runtime
    pub fn start(&self, url: impl Into<String>) -> RunId {
        let url = url.into();
        let mut task = self.task.lock().expect("AnalysisSession poisoned");
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let (run, trace_id) = self.slot.begin();
        let pipeline = Arc::clone(&self.pipeline);
        let slot = Arc::clone(&self.slot);
        let span = info_span!("run", run = run.0, %trace_id);

        *task = Some(tokio::spawn(
            async move {
                let stage_slot = Arc::clone(&slot);
                let outcome = pipeline
                    .run(&url, |stage| {
                        stage_slot.commit(run, |view| view.stage = stage);
                    })
                    .await;

                match outcome {
                    Ok(result) => {
                        slot.commit(run, |view| view.result = Some(Arc::new(result)));
                    }
                    Err(e) => {
                        error!(error = %e, "analysis failed");
                        slot.commit(run, |view| view.error = Some(e.user_message().to_string()));
                    }
                }
            }
            .instrument(span),
        ));

        run
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.slot.snapshot()
    }

    pub fn current_result(&self) -> Option<Arc<AnalysisResult>> {
        self.slot.snapshot().result
    }

    pub fn current_stage(&self) -> Stage {
        self.slot.snapshot().stage
    }

    /// Wait until the current run reaches `Ready` or `Failed`
    pub async fn wait_settled(&self) -> SessionSnapshot {
        loop {
            let notified = self.slot.notify.notified();
            let snapshot = self.slot.snapshot();
            if snapshot.run.is_none() || Self::settled(&snapshot) {
                return snapshot;
            }
            notified.await;
        }
    }

    fn settled(snapshot: &SessionSnapshot) -> bool {
        snapshot.stage.is_terminal() && (snapshot.result.is_some() || snapshot.error.is_some())
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}
