//! Generic ceremony driver
//!
//! `Ceremony<K>` walks one attempt through the state machine, calling the
//! transport and the authenticator in order, and records every transition
//! in a `CeremonyReport`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::ApiFailure;
use crate::authenticator::PlatformAuthenticator;
use crate::ceremony::kind::CeremonyKind;
use crate::ceremony::state::CeremonyState;
use crate::errors::{CeremonyError, FailureKind};
use crate::transport::HttpTransport;

/// One ceremony attempt
///
/// Created `Idle` with a fresh attempt id and consumed by [`Ceremony::run`],
/// so an attempt can never be resumed or replayed.
pub struct Ceremony<K: CeremonyKind> {
    kind: K,
    attempt_id: Uuid,
    state: CeremonyState,
    trail: Vec<CeremonyState>,
}

/// Everything a finished attempt leaves behind
#[derive(Debug)]
pub struct CeremonyReport<T> {
    pub attempt_id: Uuid,
    /// Every state visited, starting with `Idle`
    pub trail: Vec<CeremonyState>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub result: Result<T, CeremonyError>,
}

impl<K: CeremonyKind> Ceremony<K> {
    #[must_use]
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            attempt_id: Uuid::new_v4(),
            state: CeremonyState::Idle,
            trail: vec![CeremonyState::Idle],
        }
    }

    #[must_use]
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    #[must_use]
    pub fn state(&self) -> CeremonyState {
        self.state
    }

    #[must_use]
    pub fn kind(&self) -> &K {
        &self.kind
    }

    fn advance(&mut self, next: CeremonyState) -> Result<(), CeremonyError> {
        if !self.state.can_advance_to(&next) {
            return Err(CeremonyError::Internal(format!(
                "illegal transition {} -> {next}",
                self.state
            )));
        }
        log::debug!("{} {}: {} -> {next}", K::NAME, self.attempt_id, self.state);
        self.state = next;
        self.trail.push(next);
        Ok(())
    }

    fn fail(&mut self, kind: FailureKind) {
        let failed = CeremonyState::Failed(kind);
        if self.state.can_advance_to(&failed) {
            log::debug!("{} {}: {} -> {failed}", K::NAME, self.attempt_id, self.state);
            self.state = failed;
            self.trail.push(failed);
        }
    }

    /// Drive the attempt to `Completed` or `Failed`
    ///
    /// Never retries. Every error ends the attempt at once and is returned in
    /// the report together with the matching `Failed` state.
    pub async fn run(
        mut self,
        transport: &dyn HttpTransport,
        authenticator: &dyn PlatformAuthenticator,
    ) -> CeremonyReport<K::Outcome> {
        let started_at = Utc::now();
        let result = self.drive(transport, authenticator).await;

        match &result {
            Ok(_) => log::info!("{} {} completed", K::NAME, self.attempt_id),
            Err(err) => {
                log::warn!(
                    "{} {} failed while {}: {err}",
                    K::NAME,
                    self.attempt_id,
                    self.state
                );
                self.fail(err.kind());
            }
        }

        CeremonyReport {
            attempt_id: self.attempt_id,
            trail: self.trail,
            started_at,
            finished_at: Utc::now(),
            result,
        }
    }

    async fn drive(
        &mut self,
        transport: &dyn HttpTransport,
        authenticator: &dyn PlatformAuthenticator,
    ) -> Result<K::Outcome, CeremonyError> {
        self.advance(CeremonyState::ChallengeRequested)?;
        let response = transport.send(self.kind.challenge_request()).await?;
        if !response.is_success() {
            return Err(ApiFailure::from_response(
                K::CHALLENGE_FAILURE,
                response.status,
                &response.body,
            )
            .into());
        }
        let options = self.kind.decode_options(&response.body)?;
        self.advance(CeremonyState::ChallengeReceived)?;

        self.advance(CeremonyState::AwaitingAuthenticator)?;
        let output = self
            .kind
            .invoke_authenticator(authenticator, &options)
            .await?;

        let body = self
            .kind
            .encode_submission(&output)
            .map_err(|e| CeremonyError::Internal(format!("Failed to encode submission: {e}")))?;
        self.advance(CeremonyState::ResponseSubmitted)?;
        let response = transport.send(self.kind.submission_request(body)).await?;

        let outcome = self.kind.interpret(&response)?;
        self.advance(CeremonyState::Completed)?;
        Ok(outcome)
    }
}

impl<T> CeremonyReport<T> {
    #[must_use]
    pub fn final_state(&self) -> CeremonyState {
        self.trail.last().copied().unwrap_or(CeremonyState::Idle)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.final_state() == CeremonyState::Completed
    }

    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.final_state() {
            CeremonyState::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&CeremonyError> {
        self.result.as_ref().err()
    }

    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// # Errors
    ///
    /// Returns the error the attempt failed with.
    pub fn into_result(self) -> Result<T, CeremonyError> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ceremony::Registration;
    use crate::testing::{fixtures, ScriptedAuthenticator, ScriptedTransport};
    use crate::transport::{HttpResponse, TransportError};

    fn registration() -> Ceremony<Registration> {
        Ceremony::new(Registration::new(
            fixtures::url("/auth/fido2/attestation/options?platform_only=true"),
            fixtures::url("/auth/fido2/register"),
            42,
        ))
    }

    #[test]
    fn test_new_attempt_is_idle_and_unique() {
        let first = registration();
        let second = registration();
        assert_eq!(first.state(), CeremonyState::Idle);
        assert_ne!(first.attempt_id(), second.attempt_id());
    }

    #[test]
    fn test_illegal_transition_is_internal_error() {
        let mut ceremony = registration();
        let err = ceremony.advance(CeremonyState::Completed).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Internal);
        assert_eq!(ceremony.state(), CeremonyState::Idle);
    }

    #[tokio::test]
    async fn test_transport_failure_on_challenge() {
        let transport = ScriptedTransport::new();
        transport.push_error(TransportError::new("https://rp.example", "connection refused"));
        let authenticator = ScriptedAuthenticator::new();

        let report = registration().run(&transport, &authenticator).await;
        assert_eq!(
            report.trail,
            vec![
                CeremonyState::Idle,
                CeremonyState::ChallengeRequested,
                CeremonyState::Failed(FailureKind::Transport),
            ]
        );
        assert_eq!(authenticator.calls(), 0);
    }

    #[tokio::test]
    async fn test_refused_challenge_carries_server_error() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse::new(401, r#"{"error":"bad token"}"#));
        let authenticator = ScriptedAuthenticator::new();

        let report = registration().run(&transport, &authenticator).await;
        assert_eq!(report.failure_kind(), Some(FailureKind::Api));
        match report.error() {
            Some(CeremonyError::Api(failure)) => {
                assert_eq!(failure.status, Some(401));
                assert_eq!(failure.server_error.as_deref(), Some("bad token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_completed_report() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse::new(200, fixtures::CREATION_OPTIONS_JSON));
        transport.push_response(HttpResponse::new(200, fixtures::CREDENTIAL_LIST_JSON));
        let authenticator = ScriptedAuthenticator::new();

        let report = registration().run(&transport, &authenticator).await;
        assert!(report.is_completed());
        assert_eq!(report.trail.len(), 6);
        assert!(report.elapsed() >= chrono::Duration::zero());
        assert_eq!(report.into_result().unwrap().len(), 1);
    }
}
