//! Guarded phone verification flow and its resend countdown.

mod controller;
mod countdown;

pub use controller::{FlowPhase, ResendOutcome, VerificationFlow, VerifiedOutcome};
pub use countdown::Countdown;
