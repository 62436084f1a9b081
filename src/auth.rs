// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Identity service client: email/password sign in, registration and
//! password reset against an identity-toolkit style REST API.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::http_client;

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const PLACEHOLDER_KEY: &str = "YOUR_FIREBASE_WEB_API_KEY";
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    pub id_token: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

pub fn is_valid_api_key(key: &str) -> bool {
    !key.is_empty() && key != PLACEHOLDER_KEY && key.len() > 10
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(Error::Auth("Invalid email format".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Auth(
            "Password is too weak. Use at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// Map an identity-service error body to a message fit for the user.
pub fn friendly_error(body: &str) -> String {
    let code = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(String::from)
    });
    let Some(code) = code else {
        return "An error occurred. Please try again".to_string();
    };
    // codes may carry a detail suffix, e.g. "WEAK_PASSWORD : Password should be..."
    let head = code.split(" : ").next().unwrap_or(&code).trim().to_uppercase();
    match head.as_str() {
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => "Invalid email or password".into(),
        "INVALID_EMAIL" => "Invalid email format".into(),
        "EMAIL_NOT_FOUND" => "Email not found".into(),
        "EMAIL_EXISTS" => "This email is already registered".into(),
        "WEAK_PASSWORD" => "Password is too weak. Use at least 6 characters".into(),
        "USER_DISABLED" => "This account has been disabled".into(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" | "TOO_MANY_ATTEMPTS_LOGIN_RETRY_AFTER" => {
            "Too many failed login attempts. Try again later.".into()
        }
        h if h.contains("API") && h.contains("KEY") => {
            "Identity API key is not valid. Set it with `pennywise config set api_key <key>`".into()
        }
        _ => humanize(&head),
    }
}

fn humanize(code: &str) -> String {
    let cleaned = code.replace('_', " ").to_lowercase();
    let mut chars = cleaned.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "An error occurred. Please try again.".to_string(),
    }
}

pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(DEFAULT_IDENTITY_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self> {
        if !is_valid_api_key(api_key) {
            return Err(Error::Auth(
                "Identity API key is not configured (pennywise config set api_key <key>)".into(),
            ));
        }
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn post(&self, action: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/accounts:{}", self.base_url, action);
        debug!(action, "identity request");
        let resp = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(Error::Auth(friendly_error(&text)));
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let v = self.post(
            "signInWithPassword",
            &json!({ "email": email.trim(), "password": password, "returnSecureToken": true }),
        )?;
        Ok(serde_json::from_value(v)?)
    }

    pub fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;
        let v = self.post(
            "signUp",
            &json!({ "email": email.trim(), "password": password, "returnSecureToken": true }),
        )?;
        Ok(serde_json::from_value(v)?)
    }

    pub fn send_password_reset(&self, email: &str) -> Result<()> {
        if !is_valid_email(email) {
            return Err(Error::Auth("Invalid email format".into()));
        }
        self.post(
            "sendOobCode",
            &json!({ "requestType": "PASSWORD_RESET", "email": email.trim() }),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_checks() {
        assert!(is_valid_api_key("AIzaSyDummyKeyForTesting123456789"));
        assert!(!is_valid_api_key(""));
        assert!(!is_valid_api_key("YOUR_FIREBASE_WEB_API_KEY"));
        assert!(!is_valid_api_key("short"));
        assert!(IdentityClient::new("").is_err());
    }

    #[test]
    fn email_and_password_checks() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("john.doe+tag@example.co.uk"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("invalidemail"));
        assert!(!is_valid_email("noemail@"));
        assert!(validate_credentials("a@b.co", "12345").is_err());
        assert!(validate_credentials("a@b.co", "123456").is_ok());
    }

    #[test]
    fn known_codes_map_to_messages() {
        let body = r#"{"error":{"code":400,"message":"INVALID_LOGIN_CREDENTIALS"}}"#;
        assert_eq!(friendly_error(body), "Invalid email or password");
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#;
        assert_eq!(friendly_error(body), "This email is already registered");
        let body = r#"{"error":{"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        assert_eq!(
            friendly_error(body),
            "Password is too weak. Use at least 6 characters"
        );
    }

    #[test]
    fn unknown_codes_are_humanized() {
        let body = r#"{"error":{"message":"OPERATION_NOT_ALLOWED"}}"#;
        assert_eq!(friendly_error(body), "Operation not allowed");
        assert_eq!(friendly_error("not json"), "An error occurred. Please try again");
    }

    #[test]
    fn sign_in_response_decodes_to_session() {
        let body = r#"{"kind":"identitytoolkit#VerifyPasswordResponse","localId":"abc123",
            "email":"a@b.co","idToken":"tok","refreshToken":"r1","expiresIn":"3600","registered":true}"#;
        let session: Session = serde_json::from_str(body).unwrap();
        assert_eq!(session.local_id, "abc123");
        assert_eq!(session.id_token, "tok");
        assert!(session.display_name.is_none());
    }
}
