//! Mutation hook shared by create, update and delete.
//!
//! One `Mutation<T>` per verb; the verb is fixed at construction and the
//! payload travels as an optional JSON body, so POST, PATCH and DELETE all
//! go through the same lifecycle.

use http::Method;
use serde::{de::DeserializeOwned, Serialize};

use super::request::{execute, RequestState, SuccessNotice};
use crate::domain::{
    error::RequestError,
    notifier::Notifier,
    transport::{ApiRequest, RequestConfig, Transport},
};

#[derive(Debug)]
pub struct Mutation<T> {
    method: Method,
    in_flight: usize,
    state: RequestState<T>,
}

impl<T: DeserializeOwned> Mutation<T> {
    pub fn new(method: Method) -> Self {
        Self { method, in_flight: 0, state: RequestState::default() }
    }

    pub fn post() -> Self { Self::new(Method::POST) }
    pub fn patch() -> Self { Self::new(Method::PATCH) }
    pub fn delete() -> Self { Self::new(Method::DELETE) }

    pub fn method(&self) -> &Method { &self.method }
    pub fn data(&self) -> Option<&T> { self.state.data.as_ref() }
    pub fn error(&self) -> Option<&RequestError> { self.state.error.as_ref() }

    /// True while at least one call is in flight.
    pub fn loading(&self) -> bool { self.in_flight > 0 }

    /// Marks a call in flight and builds its request.
    pub fn begin(&mut self, url: impl Into<String>, body: Option<serde_json::Value>, config: Option<RequestConfig>) -> ApiRequest {
        self.in_flight += 1;
        self.state.error = None;
        ApiRequest::new(self.method.clone(), url)
            .with_body(body)
            .with_config(config.unwrap_or_default())
    }

    /// [`begin`](Self::begin) with a typed body. An unencodable body is
    /// recorded as an unexpected error and no call is started.
    pub fn begin_json<B: Serialize>(&mut self, url: impl Into<String>, body: &B, config: Option<RequestConfig>) -> Result<ApiRequest, RequestError> {
        match serde_json::to_value(body) {
            Ok(value) => Ok(self.begin(url, Some(value), config)),
            Err(e) => {
                let err = RequestError::unexpected(format!("could not encode request body: {e}"));
                self.state.record(Err(err.clone()));
                Err(err)
            }
        }
    }

    /// Records the outcome of one call started with `begin`.
    pub fn settle(&mut self, outcome: Result<T, RequestError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.record(outcome);
    }

    /// Performs exactly one request and records its outcome.
    pub async fn mutate(
        &mut self,
        transport: &dyn Transport,
        notifier: &dyn Notifier,
        url: impl Into<String>,
        body: Option<serde_json::Value>,
        config: Option<RequestConfig>,
    ) {
        let request = self.begin(url, body, config);
        let outcome = execute(transport, notifier, request, SuccessNotice::Always).await;
        self.settle(outcome);
    }
}
