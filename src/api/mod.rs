//! Relying-party replies
//!
//! Result decoders for the registration and login endpoints and the
//! structured failure type shared by every server call.

mod results;
mod types;

pub use results::{decode_credential_list, decode_login_result, decode_server_error};
pub use types::{ApiFailure, CredentialRecord, LoginOutcome, INVALID_LOGIN_RESPONSE};
