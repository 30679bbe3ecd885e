//! Scripted fakes for the transport and authenticator seams

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::fixtures;
use crate::authenticator::{AuthenticatorError, PlatformAuthenticator};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::webauthn::{AssertionResult, AttestationResult, CreationOptions, RequestOptions};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport answering from a queue and recording every request
///
/// An empty queue answers with a `TransportError`.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: HttpResponse) {
        lock(&self.replies).push_back(Ok(response));
    }

    pub fn push_error(&self, error: TransportError) {
        lock(&self.replies).push_back(Err(error));
    }

    /// Requests sent so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.to_string();
        lock(&self.requests).push(request);
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new(url, "no scripted reply")))
    }
}

/// Authenticator returning fixed results and remembering the challenges it saw
pub struct ScriptedAuthenticator {
    attestation: Result<AttestationResult, AuthenticatorError>,
    assertion: Result<AssertionResult, AuthenticatorError>,
    calls: AtomicUsize,
    challenges: Mutex<Vec<Vec<u8>>>,
}

impl Default for ScriptedAuthenticator {
    fn default() -> Self {
        Self {
            attestation: Ok(fixtures::attestation()),
            assertion: Ok(fixtures::assertion()),
            calls: AtomicUsize::new(0),
            challenges: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedAuthenticator {
    /// Succeeds with [`fixtures::attestation`] and [`fixtures::assertion`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The user dismisses every prompt
    #[must_use]
    pub fn cancelled() -> Self {
        Self::failing(AuthenticatorError::Cancelled)
    }

    #[must_use]
    pub fn failing(error: AuthenticatorError) -> Self {
        Self {
            attestation: Err(error.clone()),
            assertion: Err(error),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attestation(mut self, attestation: AttestationResult) -> Self {
        self.attestation = Ok(attestation);
        self
    }

    #[must_use]
    pub fn with_assertion(mut self, assertion: AssertionResult) -> Self {
        self.assertion = Ok(assertion);
        self
    }

    /// Number of prompts shown
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Challenge bytes received, one entry per prompt
    #[must_use]
    pub fn challenges(&self) -> Vec<Vec<u8>> {
        lock(&self.challenges).clone()
    }

    fn record(&self, challenge: &[u8]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.challenges).push(challenge.to_vec());
    }
}

#[async_trait]
impl PlatformAuthenticator for ScriptedAuthenticator {
    async fn make_credential(
        &self,
        options: &CreationOptions,
    ) -> Result<AttestationResult, AuthenticatorError> {
        self.record(options.challenge.as_bytes());
        self.attestation.clone()
    }

    async fn get_assertion(
        &self,
        options: &RequestOptions,
    ) -> Result<AssertionResult, AuthenticatorError> {
        self.record(options.challenge.as_bytes());
        self.assertion.clone()
    }
}
