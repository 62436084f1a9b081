// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted JSON document store reached over HTTP.
//! Nodes live at `{base}/{path}.json`; an id token, when present, is sent as
//! the `auth` query parameter.

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::Gateway;
use crate::error::{Error, Result};
use crate::utils::http_client;

pub struct RestGateway {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RestGateway {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(Error::InvalidData(
                "store_url is not configured (pennywise config set store_url <url>)".into(),
            ));
        }
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            auth_token: auth_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn node_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.node_url(path);
        debug!(method = method.as_str(), url = url.as_str(), "store request");
        let req = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => req.query(&[("auth", token)]),
            None => req,
        }
    }
}

/// Turn a non-success response into an error carrying the store's message.
fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        message: store_error_message(&body),
    })
}

fn store_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let msg = parsed.as_ref().and_then(|v| match v.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(obj) => obj.get("message").and_then(|m| m.as_str()).map(String::from),
        None => None,
    });
    match msg {
        Some(m) if !m.is_empty() => m,
        _ if body.trim().is_empty() => "An error occurred. Please try again".to_string(),
        _ => body.trim().to_string(),
    }
}

impl Gateway for RestGateway {
    fn get_document(&self, path: &str) -> Result<Option<Value>> {
        let resp = check(self.request(Method::GET, path).send()?)?;
        let text = resp.text()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Null => Ok(None),
            v => Ok(Some(v)),
        }
    }

    fn put_document(&self, path: &str, body: &Value) -> Result<()> {
        check(self.request(Method::PUT, path).json(body).send()?)?;
        Ok(())
    }

    fn delete_document(&self, path: &str) -> Result<()> {
        check(self.request(Method::DELETE, path).send()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_urls_are_json_suffixed() {
        let gw = RestGateway::new("https://example-rtdb.test/", None).unwrap();
        assert_eq!(
            gw.node_url("/users/u1/expenses"),
            "https://example-rtdb.test/users/u1/expenses.json"
        );
    }

    #[test]
    fn missing_store_url_is_rejected() {
        assert!(RestGateway::new("  ", None).is_err());
    }

    #[test]
    fn store_errors_are_readable() {
        assert_eq!(
            store_error_message(r#"{"error": "Permission denied"}"#),
            "Permission denied"
        );
        assert_eq!(
            store_error_message(r#"{"error": {"message": "INVALID_ID_TOKEN"}}"#),
            "INVALID_ID_TOKEN"
        );
        assert_eq!(store_error_message(""), "An error occurred. Please try again");
        assert_eq!(store_error_message("Bad gateway"), "Bad gateway");
    }
}
