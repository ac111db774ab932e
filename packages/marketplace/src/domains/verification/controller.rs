//! Phone verification flow: details → code → profile → request.
//!
//! ```text
//! CollectingDetails --request_code--> AwaitingCode --verify ok--> Verified
//!        ^                              |    ^
//!        +-------- change_number -------+    +-- bad code / insert failure
//! ```
//!
//! Every failing call leaves the state as it was.

use tracing::{error, info, warn};

use crate::common::is_blank;
use crate::domains::auth::models::{AuthContext, User};
use crate::domains::profiles::actions::{ensure_profile, ProfileWrite};
use crate::domains::requests::actions::insert_request;
use crate::domains::requests::models::{Request, RequestDetails};
use crate::error::{MarketError, RequiredField, Result, ValidationError};
use crate::kernel::MarketDeps;

use super::Countdown;

/// Externally visible flow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    CollectingDetails,
    AwaitingCode,
    Verified,
}

#[derive(Debug, Clone)]
struct PendingVerification {
    phone: String,
    details: RequestDetails,
    countdown: Countdown,
}

#[derive(Debug, Clone)]
enum FlowState {
    CollectingDetails,
    AwaitingCode(PendingVerification),
    Verified(Request),
}

/// Result of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedOutcome {
    pub user: User,
    pub request: Request,
    /// Best-effort profile write; a failure here did not stop the flow.
    pub profile: ProfileWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendOutcome {
    /// A new code was sent and the countdown restarted.
    Sent,
    /// Nothing was sent; the countdown is still running.
    Throttled { remaining_secs: u64 },
}

pub struct VerificationFlow {
    deps: MarketDeps,
    state: FlowState,
}

impl VerificationFlow {
    pub fn new(deps: MarketDeps) -> Self {
        Self {
            deps,
            state: FlowState::CollectingDetails,
        }
    }

    pub fn phase(&self) -> FlowPhase {
        match self.state {
            FlowState::CollectingDetails => FlowPhase::CollectingDetails,
            FlowState::AwaitingCode(_) => FlowPhase::AwaitingCode,
            FlowState::Verified(_) => FlowPhase::Verified,
        }
    }

    /// Seconds until a resend is allowed; 0 outside `AwaitingCode`.
    pub fn countdown_remaining(&self) -> u64 {
        match &self.state {
            FlowState::AwaitingCode(pending) => pending.countdown.remaining_secs(),
            _ => 0,
        }
    }

    /// Phone the code was sent to.
    pub fn pending_phone(&self) -> Option<&str> {
        match &self.state {
            FlowState::AwaitingCode(pending) => Some(&pending.phone),
            _ => None,
        }
    }

    /// The created request once the flow is `Verified`.
    pub fn request(&self) -> Option<&Request> {
        match &self.state {
            FlowState::Verified(request) => Some(request),
            _ => None,
        }
    }

    /// Validate the form and text a code to `phone`.
    ///
    /// Blank fields are all reported together and nothing is sent.
    pub async fn request_code(&mut self, details: RequestDetails, phone: &str) -> Result<()> {
        match self.state {
            FlowState::CollectingDetails => {}
            FlowState::AwaitingCode(_) => {
                return Err(MarketError::InvalidState("код уже отправлен"))
            }
            FlowState::Verified(_) => return Err(MarketError::InvalidState("запрос уже создан")),
        }

        let mut missing = details.missing_fields();
        if is_blank(phone) {
            missing.push(RequiredField::Phone);
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing).into());
        }
        details.validate()?;

        let phone = phone.trim().to_string();
        self.send_code(&phone).await?;

        self.state = FlowState::AwaitingCode(PendingVerification {
            phone,
            details,
            countdown: Countdown::start(self.deps.resend_cooldown),
        });
        Ok(())
    }

    /// Verify `code`, sign in, upsert the profile and create the request.
    pub async fn verify_code_and_create(
        &mut self,
        code: &str,
        auth: &mut AuthContext,
    ) -> Result<VerifiedOutcome> {
        let (phone, details) = match &self.state {
            FlowState::AwaitingCode(pending) => (pending.phone.clone(), pending.details.clone()),
            FlowState::CollectingDetails => {
                return Err(MarketError::InvalidState("сначала запросите код"))
            }
            FlowState::Verified(_) => return Err(MarketError::InvalidState("запрос уже создан")),
        };

        if is_blank(code) {
            return Err(MarketError::missing(vec![RequiredField::Code]));
        }

        let session = match self.deps.identity.verify_code(&phone, code.trim()).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Code verification failed for {}: {}", phone, e);
                return Err(MarketError::code_check(&e));
            }
        };
        info!("Phone {} verified as {}", phone, session.user.id);

        let verified_user = session.user.clone();
        auth.sign_in(session);

        let city = details.city();
        let profile = ensure_profile(&verified_user, &phone, city.as_deref(), &self.deps)
            .await;

        let user = match self.deps.identity.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                error!("No current user after verifying {}", phone);
                return Err(MarketError::AuthState);
            }
            Err(e) => {
                error!(
                    "Current user lookup failed after verifying {}: {}",
                    phone, e
                );
                return Err(MarketError::AuthState);
            }
        };

        let request = insert_request(&details, user.id, &self.deps).await?;
        self.state = FlowState::Verified(request.clone());

        Ok(VerifiedOutcome {
            user,
            request,
            profile,
        })
    }

    /// Send the code again once the countdown has run out.
    pub async fn resend(&mut self) -> Result<ResendOutcome> {
        let phone = match &self.state {
            FlowState::AwaitingCode(pending) => {
                let remaining_secs = pending.countdown.remaining_secs();
                if remaining_secs > 0 {
                    return Ok(ResendOutcome::Throttled { remaining_secs });
                }
                pending.phone.clone()
            }
            _ => return Err(MarketError::InvalidState("код ещё не отправлялся")),
        };

        self.send_code(&phone).await?;

        if let FlowState::AwaitingCode(pending) = &mut self.state {
            pending.countdown = Countdown::start(self.deps.resend_cooldown);
        }
        Ok(ResendOutcome::Sent)
    }

    /// Back to the details form, keeping what was typed.
    pub fn change_number(&mut self) -> Option<RequestDetails> {
        match std::mem::replace(&mut self.state, FlowState::CollectingDetails) {
            FlowState::AwaitingCode(pending) => Some(pending.details),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Signed-in branch of the dialog: no code, the request is created for
    /// the current user straight away.
    pub async fn publish_signed_in(
        &mut self,
        details: &RequestDetails,
        auth: &AuthContext,
    ) -> Result<Request> {
        if !matches!(self.state, FlowState::CollectingDetails) {
            return Err(MarketError::InvalidState("запрос уже отправлен"));
        }
        let user = auth.require_user()?;

        let request = insert_request(details, user.id, &self.deps).await?;
        self.state = FlowState::Verified(request.clone());
        Ok(request)
    }

    async fn send_code(&self, phone: &str) -> Result<()> {
        match self.deps.identity.send_verification_code(phone).await {
            Ok(()) => {
                info!("Verification code sent to {}", phone);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send verification code to {}: {}", phone, e);
                Err(MarketError::CodeSend {
                    reason: e.translated(),
                })
            }
        }
    }
}
