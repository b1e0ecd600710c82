//! In-memory transport and notifier for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use http::Method;

use crate::domain::{
    error::RequestError,
    notifier::Notifier,
    transport::{ApiRequest, ApiResponse, Transport},
};

type Reply = Result<ApiResponse, RequestError>;

/// Replies from a per-route script and records every request it sees.
///
/// Each route keeps a queue; the last reply is repeated once the queue is
/// down to one entry. Unscripted routes fail like a refused connection.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn respond(&self, method: Method, url: &str, status: u16, body: &str) {
        self.reply(method, url, Ok(ApiResponse { status, body: body.to_string() }));
    }

    pub fn fail(&self, method: Method, url: &str, err: RequestError) {
        self.reply(method, url, Err(err));
    }

    fn reply(&self, method: Method, url: &str, reply: Reply) {
        self.routes.lock().unwrap().entry(route(&method, url)).or_default().push_back(reply);
    }

    pub fn requests(&self) -> Vec<ApiRequest> { self.requests.lock().unwrap().clone() }

    /// `"METHOD url"` for every recorded request, in send order.
    pub fn calls(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| route(&r.method, &r.url)).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        let key = route(&request.method, &request.url);
        self.requests.lock().unwrap().push(request);
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&key) else {
            return Err(RequestError::transport(format!("connection refused: {key}")));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Err(RequestError::transport("empty script")))
        } else {
            queue.front().cloned().unwrap_or_else(|| Err(RequestError::transport("empty script")))
        }
    }
}

fn route(method: &Method, url: &str) -> String { format!("{method} {url}") }

#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> { self.successes.lock().unwrap().clone() }

    pub fn errors(&self) -> Vec<String> { self.errors.lock().unwrap().clone() }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) { self.successes.lock().unwrap().push(message.to_string()); }

    fn error(&self, message: &str) { self.errors.lock().unwrap().push(message.to_string()); }
}
