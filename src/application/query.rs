//! Read hook: a GET that re-runs whenever its URL or reload counter moves.

use http::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::request::{execute, RequestState, SuccessNotice};
use crate::domain::{
    error::RequestError,
    notifier::Notifier,
    transport::{ApiRequest, RequestConfig, Transport},
};

/// A fetch that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: ApiRequest,
}

#[derive(Debug)]
pub struct Query<T> {
    url: String,
    config: RequestConfig,
    reload: u64,
    /// `(url, reload)` of the last issued fetch.
    issued_for: Option<(String, u64)>,
    generation: u64,
    loading: bool,
    state: RequestState<T>,
}

impl<T: DeserializeOwned> Query<T> {
    /// The first fetch is due immediately, so a new query reports `loading`.
    pub fn new(url: impl Into<String>, config: RequestConfig) -> Self {
        Self {
            url: url.into(),
            config,
            reload: 0,
            issued_for: None,
            generation: 0,
            loading: true,
            state: RequestState::default(),
        }
    }

    pub fn url(&self) -> &str { &self.url }
    pub fn data(&self) -> Option<&T> { self.state.data.as_ref() }
    pub fn error(&self) -> Option<&RequestError> { self.state.error.as_ref() }
    pub fn loading(&self) -> bool { self.loading }

    pub fn set_url(&mut self, url: impl Into<String>) { self.url = url.into(); }

    pub fn refetch(&mut self) { self.reload += 1; }

    pub fn is_due(&self) -> bool {
        match &self.issued_for {
            Some((url, reload)) => *url != self.url || *reload != self.reload,
            None => true,
        }
    }

    /// Issues the next fetch if the URL or reload counter changed since the last one.
    pub fn poll_due(&mut self) -> Option<FetchTicket> {
        if !self.is_due() {
            return None;
        }
        self.issued_for = Some((self.url.clone(), self.reload));
        self.generation += 1;
        self.loading = true;
        self.state.error = None;
        let request = ApiRequest::new(Method::GET, self.url.clone()).with_config(self.config.clone());
        Some(FetchTicket { generation: self.generation, request })
    }

    /// Applies a finished fetch. Results from anything but the latest issued
    /// fetch are dropped; returns whether the outcome was applied.
    pub fn complete(&mut self, generation: u64, outcome: Result<T, RequestError>) -> bool {
        if generation != self.generation {
            debug!(url = %self.url, generation, latest = self.generation, "dropping stale fetch result");
            return false;
        }
        self.loading = false;
        self.state.record(outcome);
        true
    }

    /// Runs a due fetch to completion on the caller's task.
    pub async fn fetch(&mut self, transport: &dyn Transport, notifier: &dyn Notifier) -> bool {
        let Some(ticket) = self.poll_due() else { return false };
        let outcome = execute(transport, notifier, ticket.request, SuccessNotice::UnlessOk).await;
        self.complete(ticket.generation, outcome)
    }
}
