// End-to-end ceremony runs against scripted relying-party replies
use passkey_ceremony::ceremony::CeremonyState;
use passkey_ceremony::testing::constants::TEST_USER_ID;
use passkey_ceremony::testing::{fixtures, ScriptedAuthenticator, ScriptedTransport};
use passkey_ceremony::transport::{headers, HttpResponse, Method, TransportError};
use passkey_ceremony::{
    AuthenticatorError, CeremonyError, CredentialRecord, FailureKind, FidoClient, LoginOutcome,
};

fn client() -> FidoClient<ScriptedTransport> {
    FidoClient::new(ScriptedTransport::new(), fixtures::endpoints())
}

#[tokio::test]
async fn test_registration_round_trip() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::CREATION_OPTIONS_JSON));
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::CREDENTIAL_LIST_JSON));
    let authenticator = ScriptedAuthenticator::new();

    let report = client.register(TEST_USER_ID, &authenticator).await;

    assert_eq!(
        report.trail,
        vec![
            CeremonyState::Idle,
            CeremonyState::ChallengeRequested,
            CeremonyState::ChallengeReceived,
            CeremonyState::AwaitingAuthenticator,
            CeremonyState::ResponseSubmitted,
            CeremonyState::Completed,
        ]
    );
    assert_eq!(
        report.outcome(),
        Some(&vec![CredentialRecord::new(fixtures::CREDENTIAL_ID)])
    );

    // The challenge reaches the authenticator byte for byte
    assert_eq!(authenticator.challenges(), vec![b"challenge".to_vec()]);

    let sent = client.transport().requests();
    assert_eq!(sent.len(), 2);

    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(
        sent[0].url.as_str(),
        "https://rp.example/auth/fido2/attestation/options?platform_only=true"
    );
    assert_eq!(sent[0].header_value(headers::USER_TOKEN), Some("7"));

    assert_eq!(sent[1].method, Method::Post);
    assert_eq!(sent[1].url.as_str(), "https://rp.example/auth/fido2/register");
    assert_eq!(sent[1].header_value(headers::USER_TOKEN), Some("7"));
    assert_eq!(
        sent[1].header_value(headers::CONTENT_TYPE),
        Some("application/json")
    );
    assert_eq!(
        String::from_utf8(sent[1].body.clone().unwrap()).unwrap(),
        r#"{"id":"AQID","type":"public-key","rawId":"AQID","response":{"clientDataJSON":"e30","attestationObject":"oA"}}"#
    );
}

#[tokio::test]
async fn test_authentication_round_trip_with_credential_hint() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::REQUEST_OPTIONS_JSON));
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::LOGIN_SUCCESS_JSON));
    let authenticator = ScriptedAuthenticator::new();

    let report = client
        .authenticate(TEST_USER_ID, Some(fixtures::CREDENTIAL_ID), &authenticator)
        .await;

    assert!(report.is_completed());
    assert_eq!(
        report.outcome(),
        Some(&LoginOutcome::Success {
            user_id: 7,
            username: Some("alice".to_string())
        })
    );
    assert_eq!(authenticator.challenges(), vec![b"nonce".to_vec()]);

    let sent = client.transport().requests();
    assert_eq!(
        sent[0].url.as_str(),
        "https://rp.example/auth/fido2/assertion/options?credId=AQID"
    );
    assert_eq!(sent[0].header_value(headers::USER_ID), Some("7"));
    assert_eq!(sent[1].url.as_str(), "https://rp.example/auth/fido2/login");
    assert_eq!(sent[1].header_value(headers::USER_ID), None);
    assert_eq!(
        String::from_utf8(sent[1].body.clone().unwrap()).unwrap(),
        r#"{"id":"AQID","type":"public-key","rawId":"AQID","response":{"clientDataJSON":"e30","authenticatorData":"BAUG","signature":"Bwg","userHandle":"dTE"}}"#
    );
}

#[tokio::test]
async fn test_cancelled_prompt_submits_nothing() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::CREATION_OPTIONS_JSON));
    let authenticator = ScriptedAuthenticator::cancelled();

    let report = client.register(TEST_USER_ID, &authenticator).await;

    assert_eq!(report.failure_kind(), Some(FailureKind::Cancelled));
    assert_eq!(
        report.trail[report.trail.len() - 2..],
        [
            CeremonyState::AwaitingAuthenticator,
            CeremonyState::Failed(FailureKind::Cancelled)
        ]
    );
    assert_eq!(authenticator.calls(), 1);
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn test_authenticator_failure_is_not_cancellation() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::REQUEST_OPTIONS_JSON));
    let authenticator =
        ScriptedAuthenticator::failing(AuthenticatorError::Failed("no credentials".to_string()));

    let report = client.authenticate(TEST_USER_ID, None, &authenticator).await;

    assert_eq!(report.failure_kind(), Some(FailureKind::Authenticator));
    assert_eq!(client.transport().request_count(), 1);
}

#[tokio::test]
async fn test_malformed_options_never_reach_authenticator() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, r#"{"rp":{"id":"rp.example","name":"RP"}}"#));
    let authenticator = ScriptedAuthenticator::new();

    let report = client.register(TEST_USER_ID, &authenticator).await;

    assert_eq!(report.failure_kind(), Some(FailureKind::Decode));
    assert_eq!(
        report.trail,
        vec![
            CeremonyState::Idle,
            CeremonyState::ChallengeRequested,
            CeremonyState::Failed(FailureKind::Decode),
        ]
    );
    assert_eq!(authenticator.calls(), 0);
}

#[tokio::test]
async fn test_login_reply_without_user_fails() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::REQUEST_OPTIONS_JSON));
    client.transport().push_response(HttpResponse::new(200, "{}"));
    let authenticator = ScriptedAuthenticator::new();

    let report = client.authenticate(TEST_USER_ID, None, &authenticator).await;

    assert!(!report.is_completed());
    assert_eq!(report.failure_kind(), Some(FailureKind::Unconfirmed));
    assert_eq!(
        report.error().map(ToString::to_string).as_deref(),
        Some("Invalid login response")
    );
}

#[tokio::test]
async fn test_login_rejected_by_server() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::REQUEST_OPTIONS_JSON));
    client
        .transport()
        .push_response(HttpResponse::new(401, r#"{"error":"signature mismatch"}"#));
    let authenticator = ScriptedAuthenticator::new();

    let report = client.authenticate(TEST_USER_ID, None, &authenticator).await;

    match report.into_result() {
        Err(CeremonyError::Rejected { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Error calling updateLoginResponse");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submission_transport_failure() {
    let client = client();
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::CREATION_OPTIONS_JSON));
    client.transport().push_error(TransportError::new(
        "https://rp.example/auth/fido2/register",
        "connection reset",
    ));
    let authenticator = ScriptedAuthenticator::new();

    let report = client.register(TEST_USER_ID, &authenticator).await;

    assert_eq!(
        report.trail[report.trail.len() - 2..],
        [
            CeremonyState::ResponseSubmitted,
            CeremonyState::Failed(FailureKind::Transport)
        ]
    );
}

#[tokio::test]
async fn test_attempts_are_independent() {
    let client = client();
    let first = client.registration(TEST_USER_ID);
    let second = client.registration(TEST_USER_ID);
    assert_ne!(first.attempt_id(), second.attempt_id());

    client
        .transport()
        .push_response(HttpResponse::new(503, ""));
    let authenticator = ScriptedAuthenticator::new();
    let failed = first.run(client.transport(), &authenticator).await;
    assert_eq!(failed.failure_kind(), Some(FailureKind::Api));

    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::CREATION_OPTIONS_JSON));
    client
        .transport()
        .push_response(HttpResponse::new(200, fixtures::CREDENTIAL_LIST_JSON));
    let completed = second.run(client.transport(), &authenticator).await;
    assert!(completed.is_completed());
    assert_ne!(failed.attempt_id, completed.attempt_id);
}
