use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{non_blank, SecretToken, UserId};
use crate::error::GatewayError;

/// Authenticated identity as issued by the identity gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Validate a raw auth-server user. Blank contact fields become `None`.
    pub fn from_auth(user: supabase::AuthUser) -> Result<Self, GatewayError> {
        let id = UserId::parse(&user.id)
            .map_err(|e| GatewayError::Decode(format!("user id {:?}: {}", user.id, e)))?;

        Ok(Self {
            id,
            phone: user.phone.as_deref().and_then(non_blank),
            email: user.email.as_deref().and_then(non_blank),
        })
    }
}

/// A signed-in session. Tokens are kept out of `Debug` output.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: SecretToken,
    pub refresh_token: Option<SecretToken>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_auth(session: supabase::AuthSession) -> Result<Self, GatewayError> {
        let expires_at = session
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| {
                session
                    .expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            });

        Ok(Self {
            user: User::from_auth(session.user)?,
            access_token: SecretToken::new(session.access_token),
            refresh_token: session.refresh_token.map(SecretToken::new),
            expires_at,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Outcome of a sign-up. Projects with e-mail confirmation enabled return
/// the user without a session.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user: User,
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(id: &str, phone: &str, email: &str) -> supabase::AuthUser {
        supabase::AuthUser {
            id: id.to_string(),
            phone: Some(phone.to_string()),
            email: Some(email.to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_blank_contacts_become_none() {
        let user = User::from_auth(auth_user(
            "7d444840-9dc0-11d1-b245-5ffdce74fad2",
            "79991234567",
            "",
        ))
        .unwrap();
        assert_eq!(user.phone.as_deref(), Some("79991234567"));
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_invalid_id_is_decode_error() {
        let err = User::from_auth(auth_user("nope", "", "")).unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn test_session_expiry_from_expires_at() {
        let session = Session::from_auth(supabase::AuthSession {
            access_token: "a".to_string(),
            token_type: Some("bearer".to_string()),
            expires_in: Some(3600),
            expires_at: Some(1_700_000_000),
            refresh_token: None,
            user: auth_user("7d444840-9dc0-11d1-b245-5ffdce74fad2", "", ""),
        })
        .unwrap();

        let at = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
        assert_eq!(session.expires_at, Some(at));
        assert!(session.is_expired(at));
        assert!(!session.is_expired(at - chrono::Duration::seconds(1)));
    }
}
