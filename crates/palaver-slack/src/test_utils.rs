//! Test utilities for exercising the channel without a live API
//!
//! [`MockTransport`] plays the Slack API from scripted responses and records
//! every call, so unit and integration tests can assert on exactly what went
//! over the wire.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::transport::{Transport, TransportError};

/// One call observed by the mock
#[derive(Debug, Clone)]
pub enum RecordedCall {
    /// A GET request
    Get {
        /// Requested URL
        url: String,
    },
    /// A POST request with its JSON body
    Post {
        /// Requested URL
        url: String,
        /// JSON body as sent
        body: Value,
    },
}

/// Scripted transport standing in for the Slack API
#[derive(Default)]
pub struct MockTransport {
    history: Mutex<VecDeque<String>>,
    post_responses: Mutex<VecDeque<String>>,
    downloads: Mutex<HashMap<String, String>>,
    failing_posts: Mutex<HashSet<usize>>,
    post_count: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Create an empty mock; history defaults to `ok` with no messages
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the body returned by the next `conversations.history` GET
    pub fn queue_history(&self, body: impl Into<String>) {
        self.history.lock().unwrap().push_back(body.into());
    }

    /// Queue the body returned by the next `chat.postMessage` POST
    pub fn queue_post_response(&self, body: impl Into<String>) {
        self.post_responses.lock().unwrap().push_back(body.into());
    }

    /// Serve `body` for GETs of `url` (attachment downloads)
    pub fn set_download(&self, url: impl Into<String>, body: impl Into<String>) {
        self.downloads.lock().unwrap().insert(url.into(), body.into());
    }

    /// Make the n-th `chat.postMessage` call (1-based) fail at the transport
    pub fn fail_post(&self, call_number: usize) {
        self.failing_posts.lock().unwrap().insert(call_number);
    }

    /// Every call seen so far, in order
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `conversations.history` GETs seen
    pub fn history_requests(&self) -> usize {
        self.recorded()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Get { url } if url.contains("conversations.history")))
            .count()
    }

    /// JSON bodies of POSTs whose URL contains `fragment`, in order
    pub fn posted_bodies(&self, fragment: &str) -> Vec<Value> {
        self.recorded()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Post { url, body } if url.contains(fragment) => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, _bearer: &str) -> Result<Bytes, TransportError> {
        self.record(RecordedCall::Get {
            url: url.to_string(),
        });

        if url.contains("conversations.history") {
            let body = self
                .history
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| r#"{"ok":true,"messages":[]}"#.to_string());
            return Ok(Bytes::from(body));
        }

        if let Some(body) = self.downloads.lock().unwrap().get(url) {
            return Ok(Bytes::from(body.clone()));
        }

        Err(TransportError::Request(format!("unexpected GET {url}")))
    }

    async fn post_json(
        &self,
        url: &str,
        _bearer: &str,
        body: &Value,
    ) -> Result<Bytes, TransportError> {
        self.record(RecordedCall::Post {
            url: url.to_string(),
            body: body.clone(),
        });

        if url.contains("chat.postMessage") {
            let n = self.post_count.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing_posts.lock().unwrap().contains(&n) {
                return Err(TransportError::Request(format!(
                    "injected failure on post {n}"
                )));
            }
            let body = self
                .post_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| r#"{"ok":true}"#.to_string());
            return Ok(Bytes::from(body));
        }

        if url.contains("chat.delete") {
            return Ok(Bytes::from_static(br#"{"ok":true}"#));
        }

        Err(TransportError::Request(format!("unexpected POST {url}")))
    }
}
