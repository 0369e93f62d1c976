//! Scripted `Transport` for tests: replays queued responses in order,
//! records every request, and can hold a request in flight until released.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::sync::Notify;

use super::http::{HttpError, HttpRequest, Transport};

/// Handle for a gated transport: `started` fires when a request arrives,
/// the request then waits until `release` is notified.
#[derive(Clone)]
pub struct Gate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Option<Gate>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn fail(self, err: HttpError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn gated(mut self) -> (Self, Gate) {
        let gate = Gate {
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<Value, HttpError>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);
            if let Some(gate) = &self.gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::Transport("no scripted response".into())))
        })
    }
}
