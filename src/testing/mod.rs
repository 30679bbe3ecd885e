//! Testing utilities for ceremony flows
//!
//! In-memory stand-ins for the two external parties of a ceremony plus
//! recorded relying-party payloads.
//!
//! - [`fixtures`] - Canned server bodies, authenticator outputs and URLs
//! - [`mock`] - Scripted transport and authenticator
//!
//! ## Usage
//!
//! ```rust
//! use passkey_ceremony::testing::{fixtures, ScriptedAuthenticator, ScriptedTransport};
//! use passkey_ceremony::transport::HttpResponse;
//!
//! let transport = ScriptedTransport::new();
//! transport.push_response(HttpResponse::new(200, fixtures::CREATION_OPTIONS_JSON));
//! let authenticator = ScriptedAuthenticator::cancelled();
//! # let _ = (transport, authenticator);
//! ```

pub mod fixtures;
pub mod mock;

pub use mock::{ScriptedAuthenticator, ScriptedTransport};

/// Common test constants
pub mod constants {
    /// Origin every fixture URL hangs off
    pub const TEST_BASE_URL: &str = "https://rp.example";

    /// Default test user id
    pub const TEST_USER_ID: i64 = 7;

    /// Default test username
    pub const TEST_USERNAME: &str = "alice";
}
