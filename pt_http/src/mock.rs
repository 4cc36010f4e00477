//! Scripted in-memory transport for tests
//!
//! Responses are keyed by the exact request path plus query
//! (`/lol/match/v5/matches/EUW1_1`, `/…/ids?start=0&count=100`). One-shot
//! responses queued with [`MockTransport::enqueue`] are served first, in
//! order; after that the persistent response set with
//! [`MockTransport::respond`] is used. Unknown paths get a 404.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pt_ratelimit::Clock;
use url::Url;

use crate::client::HttpTransport;
use crate::client::RawResponse;
use crate::errors::Result;

/// One request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub key: String,
    pub headers: Vec<(&'static str, String)>,
    /// Clock reading when the request arrived, if the mock has a clock
    pub at: Option<Duration>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Routes {
    queued: HashMap<String, VecDeque<RawResponse>>,
    fixed: HashMap<String, RawResponse>,
}

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Routes>,
    requests: Mutex<Vec<RecordedRequest>>,
    clock: Option<Arc<dyn Clock>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every recorded request with this clock's reading
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock: Some(clock), ..Self::default() }
    }

    /// Serve `body` with `status` for every request to `key`
    pub fn respond(&self, key: &str, status: u16, body: serde_json::Value) {
        self.routes.lock().fixed.insert(key.to_string(), Self::response(status, &body));
    }

    /// Serve `body` with `status` once, after previously queued responses for `key`
    pub fn enqueue(&self, key: &str, status: u16, body: serde_json::Value) {
        self.routes.lock().queued.entry(key.to_string()).or_default().push_back(Self::response(status, &body));
    }

    /// All requests so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests made to `key`
    pub fn count(&self, key: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.key == key).count()
    }

    fn response(status: u16, body: &serde_json::Value) -> RawResponse {
        RawResponse::new(status, body.to_string())
    }

    fn key_of(url: &Url) -> String {
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    fn serve(&self, key: &str) -> RawResponse {
        let mut routes = self.routes.lock();
        if let Some(response) = routes.queued.get_mut(key).and_then(VecDeque::pop_front) {
            return response;
        }
        routes.fixed.get(key).cloned().unwrap_or_else(|| Self::response(404, &serde_json::json!({"status": {"status_code": 404}})))
    }
}

impl HttpTransport for MockTransport {
    fn get<'a>(&'a self, url: &'a Url, headers: &'a [(&'static str, String)]) -> Pin<Box<dyn Future<Output = Result<RawResponse>> + Send + 'a>> {
        Box::pin(async move {
            let key = Self::key_of(url);
            let at = self.clock.as_ref().map(|clock| clock.now());
            self.requests.lock().push(RecordedRequest { url: url.to_string(), key: key.clone(), headers: headers.to_vec(), at });

            Ok(self.serve(&key))
        })
    }
}
