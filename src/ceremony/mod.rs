//! Ceremony sequencer
//!
//! A single generic state machine drives both WebAuthn ceremonies:
//!
//! `Idle -> ChallengeRequested -> ChallengeReceived -> AwaitingAuthenticator
//! -> ResponseSubmitted -> Completed`, with `Failed(kind)` reachable from any
//! non-terminal state.

mod authentication;
mod kind;
mod registration;
mod sequencer;
mod state;

pub use authentication::{Authentication, LOGIN_REJECTED};
pub use kind::CeremonyKind;
pub use registration::Registration;
pub use sequencer::{Ceremony, CeremonyReport};
pub use state::CeremonyState;
