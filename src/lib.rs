#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the passkey-ceremony crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod api;
pub mod authenticator;
pub mod ceremony;
pub mod client;
pub mod errors;
pub mod settings;
pub mod transport;
pub mod webauthn;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use api::{ApiFailure, CredentialRecord, LoginOutcome};
pub use authenticator::{AuthenticatorError, PlatformAuthenticator};
pub use ceremony::{Authentication, Ceremony, CeremonyReport, CeremonyState, Registration};
pub use client::{Endpoints, FidoClient};
pub use errors::{CeremonyError, FailureKind};
pub use settings::ClientSettings;
pub use transport::{HttpTransport, ReqwestTransport};
