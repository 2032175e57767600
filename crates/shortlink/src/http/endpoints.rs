//! Backend endpoint paths and request/response wire types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, SchemaError};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Exchange a username and password for an access token.
pub const LOGIN: &str = "/auth/login";

/// Create a new account.
pub const REGISTER: &str = "/auth/register";

/// Renew the access token using the backend session.
pub const REFRESH_TOKEN: &str = "/auth/refresh-token";

/// Summary for the signed-in user.
pub const DASHBOARD: &str = "/dashboard";

/// Paginated list of the user's short links.
pub const URLS: &str = "/urls";

/// Create a short link.
pub const SHORTEN: &str = "/shorten";

/// Per-link analytics: `/analytics/:id`.
pub fn analytics(id: u64) -> String {
    format!("/analytics/{}", id)
}

// ============================================================================
// Envelope
// ============================================================================

/// Value of the `status` field on a successful response.
pub const STATUS_SUCCESS: &str = "success";

/// Every JSON response from the backend is wrapped as `{status, message, data}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap `data`, rejecting envelopes that report failure or carry nothing.
    pub fn into_data(self, endpoint: &str, http_status: u16) -> Result<T, Error> {
        let schema_error = |message: Option<String>, detail: String| {
            Error::Schema(SchemaError {
                status: http_status,
                endpoint: endpoint.to_string(),
                message,
                detail,
            })
        };

        if let Some(status) = self.status.as_deref()
            && status != STATUS_SUCCESS
        {
            return Err(schema_error(
                self.message,
                format!("envelope status '{}'", status),
            ));
        }

        match self.data {
            Some(data) => Ok(data),
            None => Err(schema_error(self.message, "missing 'data'".to_string())),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": "..."}` and `{"message": ["...", "..."]}`.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) if !message.is_empty() => Some(message.clone()),
        serde_json::Value::Array(parts) => {
            let parts: Vec<&str> = parts.iter().filter_map(|p| p.as_str()).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `data` of a login response.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Request body for register.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for refresh-token. The session cookie does the real work;
/// a stored refresh companion is forwarded when there is one.
#[derive(Debug, Default, Serialize)]
pub struct RefreshTokenRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
}

/// Response from refresh-token. Not enveloped.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
