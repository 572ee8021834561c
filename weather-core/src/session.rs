//! Observable search state for a front-end.
//!
//! A [`SearchSession`] owns the single [`PipelineState`] slot and publishes
//! every transition on a `watch` channel. Each search gets a [`RunId`]; a
//! run only publishes while it is the most recent one, so a slow, superseded
//! lookup never overwrites a newer result.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::{
    error::ErrorKind,
    model::{DisplayRecord, Query},
    pipeline::Pipeline,
};

pub type RunId = u64;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Success(DisplayRecord),
    Failure(ErrorKind),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Success(_) | PipelineState::Failure(_))
    }
}

impl From<Result<DisplayRecord, ErrorKind>> for PipelineState {
    fn from(result: Result<DisplayRecord, ErrorKind>) -> Self {
        match result {
            Ok(record) => PipelineState::Success(record),
            Err(kind) => PipelineState::Failure(kind),
        }
    }
}

/// A search started in the background.
#[derive(Debug)]
pub struct RunHandle {
    pub id: RunId,
    pub task: JoinHandle<PipelineState>,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    pipeline: Arc<Pipeline>,
    state: Arc<watch::Sender<PipelineState>>,
    latest_run: Arc<AtomicU64>,
}

impl SearchSession {
    pub fn new(pipeline: Pipeline) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            pipeline: Arc::new(pipeline),
            state: Arc::new(state),
            latest_run: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stream of state transitions, starting from the current state.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    pub fn latest_run(&self) -> RunId {
        self.latest_run.load(Ordering::SeqCst)
    }

    /// Start a search on the tokio runtime and return immediately.
    pub fn trigger_search(&self, raw: impl Into<String>) -> RunHandle {
        let id = self.next_run();
        let session = self.clone();
        let raw = raw.into();
        let task = tokio::spawn(async move { session.execute(id, &raw).await });

        RunHandle { id, task }
    }

    /// Run a search to completion and return its own outcome.
    ///
    /// The outcome is returned even when a newer search has superseded this
    /// one and it was therefore not published.
    pub async fn search(&self, raw: &str) -> PipelineState {
        let id = self.next_run();
        self.execute(id, raw).await
    }

    fn next_run(&self) -> RunId {
        self.latest_run.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn execute(&self, id: RunId, raw: &str) -> PipelineState {
        if let Err(kind) = Query::parse(raw) {
            let outcome = PipelineState::Failure(kind);
            self.publish(id, outcome.clone());
            return outcome;
        }

        self.publish(id, PipelineState::Loading);
        let outcome = PipelineState::from(self.pipeline.resolve(raw).await);
        self.publish(id, outcome.clone());

        outcome
    }

    fn publish(&self, id: RunId, next: PipelineState) -> bool {
        // The run check happens under the channel lock, so a newer run's
        // first publish always lands after it.
        self.state.send_if_modified(|current| {
            let latest = self.latest_run.load(Ordering::SeqCst);
            if id != latest {
                debug!(run = id, latest, "dropping state from superseded run");
                return false;
            }
            *current = next;
            true
        })
    }
}
