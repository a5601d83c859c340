//! Mock transports shared by the page tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

use crate::error::{PageError, Result};
use crate::transport::Transport;

/// Answers each path from a queue of canned responses and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl ScriptedTransport {
    pub fn respond(self, path: &str, response: Result<Value>) -> Self {
        self.responses
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Option<Value>> {
        self.calls()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.calls
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .push((path.to_string(), body));
        self.responses
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .get_mut(path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(PageError::Internal(format!("No scripted response for {path}"))))
    }
}

/// Holds every call until the test releases its gate, so tests decide the
/// order in which responses resolve.
#[derive(Default)]
pub struct GatedTransport {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<Value>>>>,
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl GatedTransport {
    /// Queue a gate for the next call.
    pub fn gate(&self) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .expect("Gated transport mutex should not be poisoned")
            .push_back(rx);
        tx
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.started.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn post_json(&self, _path: &str, _body: Option<Value>) -> Result<Value> {
        let gate = self
            .gates
            .lock()
            .expect("Gated transport mutex should not be poisoned")
            .pop_front();
        self.started.fetch_add(1, Ordering::SeqCst);
        let result = match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(PageError::Internal("Gate dropped".to_string()))),
            None => Err(PageError::Internal("No gate queued".to_string())),
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
