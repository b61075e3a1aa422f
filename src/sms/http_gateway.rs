//! HTTP client for an SMS account bridge.
//!
//! The bridge exposes two endpoints:
//! - `POST /login` with `{identity, secret}` returns a session token
//! - `POST /sms` with `{recipient, text, client_ref}` delivers one message
//!
//! Both answer with a `{success, data, error}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::gateway::SmsGateway;
use super::{mask_recipient, GatewayError};
use crate::credentials::GatewayCredentials;

/// HTTP connect timeout.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Error bodies longer than this are cut before logging.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Response envelope from the bridge HTTP API.
#[derive(Deserialize)]
struct BridgeResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct Session {
    session: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identity: &'a str,
    secret: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    recipient: &'a str,
    text: &'a str,
    client_ref: String,
}

/// Authenticated SMS gateway speaking to the account bridge over HTTP.
///
/// Construct once at startup with [`HttpSmsGateway::connect`] and share the
/// handle for every send.
pub struct HttpSmsGateway {
    client: reqwest::Client,
    base_url: String,
    session: String,
    secrets: Vec<String>,
}

impl std::fmt::Debug for HttpSmsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSmsGateway")
            .field("base_url", &self.base_url)
            .field("session", &"[REDACTED]")
            .finish()
    }
}

impl HttpSmsGateway {
    /// Authenticate against the bridge and return a ready gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Authentication`] if the bridge refuses the
    /// credentials, or [`GatewayError::Http`] if it cannot be reached.
    pub async fn connect(
        base_url: &str,
        credentials: &GatewayCredentials,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with timeouts, using default");
                reqwest::Client::default()
            });
        let base_url = base_url.trim_end_matches('/').to_owned();
        let secrets = credentials.secret_values();

        let url = format!("{base_url}/login");
        let resp = client
            .post(&url)
            .json(&LoginRequest {
                identity: credentials.identity(),
                secret: credentials.secret(),
            })
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Authentication(format!(
                "status {}: {}",
                status.as_u16(),
                sanitize_error_body(&raw, &secrets)
            )));
        }

        let envelope: BridgeResponse<Session> =
            serde_json::from_str(&raw).map_err(|e| GatewayError::Parse(e.to_string()))?;
        let session = match envelope {
            BridgeResponse {
                success: true,
                data: Some(Session { session }),
                ..
            } if !session.is_empty() => session,
            BridgeResponse { error, .. } => {
                let reason = error.unwrap_or_else(|| "no session returned".to_owned());
                return Err(GatewayError::Authentication(sanitize_error_body(
                    &reason, &secrets,
                )));
            }
        };

        info!(base_url = %base_url, "authenticated with SMS gateway");

        let mut secrets = secrets;
        secrets.push(session.clone());
        Ok(Self {
            client,
            base_url,
            session,
            secrets,
        })
    }

    /// Returns the base URL of the bridge.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, recipient: &str, body: &str) -> Result<(), GatewayError> {
        let url = format!("{}/sms", self.base_url);
        let client_ref = uuid::Uuid::new_v4().to_string();
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.session)
            .json(&SendRequest {
                recipient,
                text: body,
                client_ref: client_ref.clone(),
            })
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: sanitize_error_body(&raw, &self.secrets),
            });
        }

        let envelope: BridgeResponse<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| GatewayError::Parse(e.to_string()))?;
        if !envelope.success {
            let reason = envelope
                .error
                .unwrap_or_else(|| "bridge reported failure".to_owned());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: sanitize_error_body(&reason, &self.secrets),
            });
        }

        debug!(
            recipient = %mask_recipient(recipient),
            client_ref = %client_ref,
            "message accepted by SMS gateway"
        );
        Ok(())
    }
}

/// Collapse whitespace, strip known secrets and bearer tokens, and cap length.
pub(crate) fn sanitize_error_body(raw: &str, secrets: &[String]) -> String {
    let mut sanitized = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        sanitized = sanitized.replace(secret.as_str(), "[REDACTED]");
    }
    if let Ok(regex) = Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/=\-]+") {
        sanitized = regex
            .replace_all(&sanitized, "Bearer [REDACTED]")
            .into_owned();
    }

    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}
