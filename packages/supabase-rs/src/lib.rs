//! Minimal Supabase client: GoTrue auth endpoints and PostgREST tables.
//!
//! Only request/response plumbing lives here. The client keeps the bearer
//! token of the last session it obtained so table calls run under the
//! signed-in user's row-level security, the same way the JS client does.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod models;
pub mod query;

pub use error::{Result, SupabaseError};
pub use models::{AuthSession, AuthUser, SignUpResponse, UserAttributes};
pub use query::Query;

use crate::models::{
    ErrorBody, OtpRequest, PasswordRequest, PkceRequest, SignUpRequest, VerifyRequest,
};

#[derive(Debug, Clone)]
pub struct SupabaseOptions {
    pub url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SupabaseService {
    base_url: String,
    anon_key: String,
    http: Client,
    access_token: Arc<RwLock<Option<String>>>,
}

impl SupabaseService {
    pub fn new(options: SupabaseOptions) -> Result<Self> {
        let parsed = Url::parse(&options.url)?;
        let http = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            anon_key: options.anon_key,
            http,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer token of the current session, if any.
    pub fn access_token(&self) -> Option<String> {
        match self.access_token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_access_token(&self, token: Option<String>) {
        match self.access_token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    // ---------------------------------------------------------------------
    // Auth
    // ---------------------------------------------------------------------

    /// Ask the auth server to text a one-time code to `phone`.
    pub async fn send_otp(&self, phone: &str) -> Result<()> {
        let body = OtpRequest {
            phone,
            channel: "sms",
        };
        let response = self
            .authorized(self.http.post(self.auth_url("otp")))
            .json(&body)
            .send()
            .await?;
        expect_success(response).await?;
        debug!("OTP requested for {}", phone);
        Ok(())
    }

    pub async fn verify_otp(&self, phone: &str, token: &str) -> Result<AuthSession> {
        let body = VerifyRequest {
            kind: "sms",
            phone,
            token,
        };
        let response = self
            .authorized(self.http.post(self.auth_url("verify")))
            .json(&body)
            .send()
            .await?;
        let session: AuthSession = read_json(response).await?;
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = PasswordRequest { email, password };
        let response = self
            .authorized(self.http.post(self.auth_url("token")))
            .query(&[("grant_type", "password")])
            .json(&body)
            .send()
            .await?;
        let session: AuthSession = read_json(response).await?;
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    /// E-mail sign-up. GoTrue refuses a body carrying both `email` and
    /// `phone`, so the phone belongs on the profile row instead.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse> {
        let body = SignUpRequest { email, password };
        let response = self
            .authorized(self.http.post(self.auth_url("signup")))
            .json(&body)
            .send()
            .await?;
        let signed_up: SignUpResponse = read_json(response).await?;
        if let Some(session) = signed_up.session() {
            self.set_access_token(Some(session.access_token.clone()));
        }
        Ok(signed_up)
    }

    /// Exchange an OAuth authorization code (PKCE flow) for a session.
    pub async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<AuthSession> {
        let body = PkceRequest {
            auth_code,
            code_verifier,
        };
        let response = self
            .authorized(self.http.post(self.auth_url("token")))
            .query(&[("grant_type", "pkce")])
            .json(&body)
            .send()
            .await?;
        let session: AuthSession = read_json(response).await?;
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    /// Fetch the user behind the current bearer token.
    ///
    /// Returns `Ok(None)` when there is no session or the server no longer
    /// accepts the token.
    pub async fn get_user(&self) -> Result<Option<AuthUser>> {
        if self.access_token().is_none() {
            return Ok(None);
        }

        let response = self
            .authorized(self.http.get(self.auth_url("user")))
            .send()
            .await?;
        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        let user: AuthUser = read_json(response).await?;
        Ok(Some(user))
    }

    pub async fn update_user(&self, attributes: &UserAttributes) -> Result<AuthUser> {
        let response = self
            .authorized(self.http.put(self.auth_url("user")))
            .json(attributes)
            .send()
            .await?;
        read_json(response).await
    }

    /// Revoke the session server-side. The local token is dropped even if
    /// the server call fails.
    pub async fn sign_out(&self) -> Result<()> {
        if self.access_token().is_none() {
            return Ok(());
        }

        let result = self
            .authorized(self.http.post(self.auth_url("logout")))
            .send()
            .await;
        self.set_access_token(None);

        let response = result?;
        expect_success(response).await
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        let response = self
            .authorized(self.http.get(self.rest_url(table)))
            .query(query.pairs())
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn insert<B, T>(&self, table: &str, rows: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .authorized(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update<B, T>(&self, table: &str, query: &Query, patch: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .authorized(self.http.patch(self.rest_url(table)))
            .query(query.pairs())
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    /// Delete matching rows and return them.
    pub async fn delete<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        let response = self
            .authorized(self.http.delete(self.rest_url(table)))
            .query(query.pairs())
            .header("Prefer", "return=representation")
            .send()
            .await?;
        read_json(response).await
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());
        builder
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
    }
}

async fn expect_success(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(api_error(status, &body));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Build an API error from a failed response, preferring the server's own
/// message and falling back to the raw body, then to the status line.
pub(crate) fn api_error(status: StatusCode, body: &str) -> SupabaseError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            )
        });

    warn!("Supabase returned an error ({}): {}", status, message);
    SupabaseError::Api {
        status: status.as_u16(),
        message,
    }
}
