//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::transport::{HttpResponse, HttpTransport, TransportFuture};
use crate::address::Address;
use crate::error::NodeError;

type Responder =
    Box<dyn Fn(&str, &serde_json::Value) -> Result<HttpResponse, NodeError> + Send + Sync>;

/// Replays queued responses in order, then falls back to a responder.
///
/// Every request is recorded.
pub(crate) struct ScriptedTransport {
    queue: Mutex<VecDeque<Result<HttpResponse, NodeError>>>,
    responder: Responder,
    requests: Mutex<Vec<(String, serde_json::Value)>>,
}

impl ScriptedTransport {
    /// Queued responses; `{}` once the queue is empty.
    pub(crate) fn queued(responses: Vec<Result<HttpResponse, NodeError>>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(responses.into()),
            responder: Box::new(|_, _| Ok(HttpResponse::new(200, "{}"))),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answer every request with `f`.
    pub(crate) fn responding(
        f: impl Fn(&str, &serde_json::Value) -> Result<HttpResponse, NodeError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            responder: Box::new(f),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<(String, serde_json::Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .count()
    }
}

impl HttpTransport for ScriptedTransport {
    fn post_json<'a>(&'a self, path: &'a str, body: serde_json::Value) -> TransportFuture<'a> {
        let next = match self.queue.lock().unwrap().pop_front() {
            Some(response) => response,
            None => (self.responder)(path, &body),
        };
        self.requests.lock().unwrap().push((path.to_string(), body));
        Box::pin(async move { next })
    }
}

pub(crate) fn ok(body: serde_json::Value) -> Result<HttpResponse, NodeError> {
    Ok(HttpResponse::new(200, body.to_string()))
}

/// Tron address whose payload is zero except for the last byte.
pub(crate) fn addr(last: u8) -> Address {
    let mut payload = [0u8; 20];
    payload[19] = last;
    Address::tron(payload)
}

/// A 32-byte big-endian word as hex.
pub(crate) fn word_hex(value: u64) -> String {
    format!("{value:064x}")
}
