//! Relying-party client
//!
//! Binds the two ceremonies and the user-id lookup to concrete endpoint URLs
//! and a transport.

use anyhow::Context;
use url::Url;

use crate::api::{decode_login_result, ApiFailure, CredentialRecord, LoginOutcome};
use crate::authenticator::PlatformAuthenticator;
use crate::ceremony::{Authentication, Ceremony, CeremonyReport, Registration};
use crate::errors::CeremonyError;
use crate::settings::ClientSettings;
use crate::transport::{headers, HttpRequest, HttpTransport, ReqwestTransport};

/// Reason reported when the lookup answers 2xx but not 200
pub const FETCH_USER_ID_FAILED: &str = "Fetch UserId failed";

/// Absolute URLs of every relying-party call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub registration_options: Url,
    pub registration_submit: Url,
    pub login_options: Url,
    pub login_submit: Url,
    pub user_id_lookup: Url,
}

impl Endpoints {
    /// Resolve the configured paths against the base URL
    ///
    /// Paths are appended under the base URL's own path, so a relying party
    /// mounted at `https://host/prefix` keeps its prefix.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the base URL or a path is malformed.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(&settings.server.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let paths = &settings.endpoints;

        let mut registration_options = resolve(&base, &paths.registration_options)?;
        registration_options
            .query_pairs_mut()
            .append_pair("platform_only", if paths.platform_only { "true" } else { "false" });

        Ok(Self {
            registration_options,
            registration_submit: resolve(&base, &paths.registration_submit)?,
            login_options: resolve(&base, &paths.login_options)?,
            login_submit: resolve(&base, &paths.login_submit)?,
            user_id_lookup: resolve(&base, &paths.user_id_lookup)?,
        })
    }
}

fn resolve(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path.trim_start_matches('/'))
}

pub struct FidoClient<T: HttpTransport> {
    transport: T,
    endpoints: Endpoints,
}

impl FidoClient<ReqwestTransport> {
    /// Build a client backed by `reqwest`
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints cannot be resolved or the HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let endpoints =
            Endpoints::from_settings(settings).context("Invalid endpoint configuration")?;
        let transport = ReqwestTransport::new(&settings.http)?;
        Ok(Self::new(transport, endpoints))
    }
}

impl<T: HttpTransport> FidoClient<T> {
    #[must_use]
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A fresh, unstarted registration attempt
    #[must_use]
    pub fn registration(&self, user_id: i64) -> Ceremony<Registration> {
        Ceremony::new(Registration::new(
            self.endpoints.registration_options.clone(),
            self.endpoints.registration_submit.clone(),
            user_id,
        ))
    }

    /// A fresh, unstarted authentication attempt
    #[must_use]
    pub fn authentication(
        &self,
        user_id: i64,
        credential_id: Option<&str>,
    ) -> Ceremony<Authentication> {
        Ceremony::new(Authentication::new(
            self.endpoints.login_options.clone(),
            self.endpoints.login_submit.clone(),
            user_id,
            credential_id,
        ))
    }

    pub async fn register(
        &self,
        user_id: i64,
        authenticator: &dyn PlatformAuthenticator,
    ) -> CeremonyReport<Vec<CredentialRecord>> {
        self.registration(user_id)
            .run(&self.transport, authenticator)
            .await
    }

    pub async fn authenticate(
        &self,
        user_id: i64,
        credential_id: Option<&str>,
        authenticator: &dyn PlatformAuthenticator,
    ) -> CeremonyReport<LoginOutcome> {
        self.authentication(user_id, credential_id)
            .run(&self.transport, authenticator)
            .await
    }

    /// Look up the numeric user id for a username
    ///
    /// # Errors
    ///
    /// Returns `CeremonyError::Transport` if the call fails, `Api` on a non-2xx
    /// reply and `Decode` if a 200 body is malformed. A 2xx reply other than
    /// 200 is not an error but a `LoginOutcome::Failure`.
    pub async fn fetch_user_id(&self, username: &str) -> Result<LoginOutcome, CeremonyError> {
        let request = HttpRequest::get(self.endpoints.user_id_lookup.clone())
            .header(headers::USER_NAME, username);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(ApiFailure::from_response(
                "Error calling fetchUserId",
                response.status,
                &response.body,
            )
            .into());
        }
        if response.status != 200 {
            log::warn!("User id lookup answered {}", response.status);
            return Ok(LoginOutcome::failure(FETCH_USER_ID_FAILED));
        }
        if response.body.is_empty() {
            return Err(ApiFailure::new("Empty response from fetchUserId").into());
        }
        Ok(decode_login_result(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::testing::ScriptedTransport;
    use crate::transport::{HttpResponse, Method};

    fn client() -> FidoClient<ScriptedTransport> {
        let endpoints = Endpoints::from_settings(&ClientSettings::default()).unwrap();
        FidoClient::new(ScriptedTransport::new(), endpoints)
    }

    #[test]
    fn test_default_endpoint_layout() {
        let endpoints = Endpoints::from_settings(&ClientSettings::default()).unwrap();
        assert_eq!(
            endpoints.registration_options.as_str(),
            "https://fido2.apps.praphull.com/auth/fido2/attestation/options?platform_only=true"
        );
        assert_eq!(
            endpoints.login_submit.as_str(),
            "https://fido2.apps.praphull.com/auth/fido2/login"
        );
        assert_eq!(endpoints.user_id_lookup.path(), "/auth/fido2/user/id");
    }

    #[test]
    fn test_platform_only_is_configurable() {
        let mut settings = ClientSettings::default();
        settings.endpoints.platform_only = false;
        let endpoints = Endpoints::from_settings(&settings).unwrap();
        assert_eq!(endpoints.registration_options.query(), Some("platform_only=false"));
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        for base_url in ["https://rp.example/fido", "https://rp.example/fido/"] {
            let mut settings = ClientSettings::default();
            settings.server.base_url = base_url.to_string();
            let endpoints = Endpoints::from_settings(&settings).unwrap();
            assert_eq!(
                endpoints.registration_options.as_str(),
                "https://rp.example/fido/auth/fido2/attestation/options?platform_only=true"
            );
            assert_eq!(
                endpoints.registration_submit.as_str(),
                "https://rp.example/fido/auth/fido2/register"
            );
            assert_eq!(endpoints.user_id_lookup.path(), "/fido/auth/fido2/user/id");
        }
    }

    #[test]
    fn test_bad_base_url() {
        let mut settings = ClientSettings::default();
        settings.server.base_url = "relative/path".to_string();
        assert!(Endpoints::from_settings(&settings).is_err());
    }

    #[tokio::test]
    async fn test_fetch_user_id_success() {
        let client = client();
        client
            .transport()
            .push_response(HttpResponse::new(200, r#"{"userId":12,"username":"ana"}"#));

        let outcome = client.fetch_user_id("ana").await.unwrap();
        assert_eq!(outcome.user_id(), Some(12));

        let sent = client.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].header_value(headers::USER_NAME), Some("ana"));
    }

    #[tokio::test]
    async fn test_fetch_user_id_non_200_success_is_failure_outcome() {
        let client = client();
        client.transport().push_response(HttpResponse::new(204, ""));

        let outcome = client.fetch_user_id("ana").await.unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::Failure {
                reason: FETCH_USER_ID_FAILED.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_user_id_error_status() {
        let client = client();
        client
            .transport()
            .push_response(HttpResponse::new(404, r#"{"error":"no such user"}"#));

        let err = client.fetch_user_id("ghost").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Api);
        assert_eq!(err.to_string(), "Error calling fetchUserId; no such user");
    }

    #[tokio::test]
    async fn test_fetch_user_id_without_user_field() {
        let client = client();
        client.transport().push_response(HttpResponse::new(200, "{}"));
        let outcome = client.fetch_user_id("ana").await.unwrap();
        assert!(!outcome.is_success());
    }
}
