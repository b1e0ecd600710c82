//! Request lifecycle shared by the read hook and the mutation hooks.
//!
//! [`execute`] performs one round-trip, classifies the outcome, decodes the
//! body and raises the matching notice. Hooks only decide what to do with
//! the returned `Result`.

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::{
    error::RequestError,
    http_status::{is_success, status_text},
    notifier::Notifier,
    transport::{ApiRequest, Transport},
};

/// When a 2xx response gets a success notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessNotice {
    /// Every success is announced (mutations).
    Always,
    /// Only successes with a status other than `200` (reads).
    UnlessOk,
}

impl SuccessNotice {
    fn applies(self, status: u16) -> bool {
        match self {
            SuccessNotice::Always => true,
            SuccessNotice::UnlessOk => status != 200,
        }
    }
}

/// Last outcome held by a hook.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub error: Option<RequestError>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self { Self { data: None, error: None } }
}

impl<T> RequestState<T> {
    /// Success replaces the data; failure stores the error and drops the data.
    pub fn record(&mut self, outcome: Result<T, RequestError>) {
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                self.data = None;
                self.error = Some(err);
            }
        }
    }
}

pub async fn execute<T: DeserializeOwned>(
    transport: &dyn Transport,
    notifier: &dyn Notifier,
    request: ApiRequest,
    notice: SuccessNotice,
) -> Result<T, RequestError> {
    let method = request.method.clone();
    let url = request.url.clone();

    let outcome = match transport.send(request).await {
        Ok(response) if is_success(response.status) => {
            decode::<T>(&response.body).map(|data| (response.status, data))
        }
        Ok(response) => Err(RequestError::http(response.status, response.body)),
        Err(err) => Err(err),
    };

    match outcome {
        Ok((status, data)) => {
            info!(%method, %url, status, "request succeeded");
            if notice.applies(status) {
                notifier.success(&format!("Success: {}", status_text(status)));
            }
            Ok(data)
        }
        Err(err) => {
            warn!(%method, %url, code = err.code(), error = %err, "request failed");
            notifier.error(&err.notice());
            Err(err)
        }
    }
}

/// An empty body decodes as JSON `null`, so `Option<T>` targets accept `204`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
    let decoded = if body.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(body)
    };
    decoded.map_err(|e| RequestError::unexpected(format!("invalid response body: {e}")))
}
