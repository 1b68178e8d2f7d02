//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::transport::{ApiRequest, Transport, TransportError, TransportFuture};

/// Scripted transport that returns pre-seeded responses in FIFO order.
///
/// Every executed request is recorded, so tests can assert on the exact
/// method, path, query and body an operation dispatched. Clones share the
/// same script and log.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<String, TransportError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    default_zone: Option<String>,
    default_organization_id: Option<String>,
    default_page_size: Option<u32>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses and no defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default zone.
    #[must_use]
    pub fn with_default_zone(mut self, zone: impl Into<String>) -> Self {
        self.default_zone = Some(zone.into());
        self
    }

    /// Sets the default organization identifier.
    #[must_use]
    pub fn with_default_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.default_organization_id = Some(organization_id.into());
        self
    }

    /// Sets the default page size.
    #[must_use]
    pub const fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = Some(page_size);
        self
    }

    /// Queues a raw response body.
    pub fn push_body(&self, body: impl Into<String>) {
        lock(&self.responses).push_back(Ok(body.into()));
    }

    /// Queues `value` encoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics when `value` cannot be encoded, which only happens for
    /// malformed test fixtures.
    pub fn push_json<V: Serialize>(&self, value: &V) {
        let body = serde_json::to_string(value)
            .unwrap_or_else(|err| panic!("scripted response must encode: {err}"));
        self.push_body(body);
    }

    /// Queues a transport failure.
    pub fn push_error(&self, error: TransportError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Returns a snapshot of all requests executed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Number of responses still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }
}

impl Transport for ScriptedTransport {
    fn execute<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a, String> {
        lock(&self.requests).push(request.clone());
        let next = lock(&self.responses).pop_front();
        Box::pin(async move {
            next.unwrap_or_else(|| {
                Err(TransportError::Http {
                    message: format!("no scripted response for {}", request.path),
                })
            })
        })
    }

    fn default_zone(&self) -> Option<String> {
        self.default_zone.clone()
    }

    fn default_organization_id(&self) -> Option<String> {
        self.default_organization_id.clone()
    }

    fn default_page_size(&self) -> Option<u32> {
        self.default_page_size
    }
}
