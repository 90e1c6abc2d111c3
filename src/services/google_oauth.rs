// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth client for the authorization-code flow.
//!
//! Handles:
//! - Building the consent-screen redirect
//! - Exchanging the authorization code for tokens
//! - Fetching the signed-in user's profile
//! - CSRF state tokens for the redirect round trip

use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::config::GoogleCredentials;
use crate::error::AppError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const OAUTH_SCOPE: &str = "openid email profile";
const STATE_TOKEN_BYTES: usize = 16;

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl Default for GoogleOAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleOAuthClient {
    /// Client talking to Google's production endpoints.
    pub fn new() -> Self {
        Self::with_endpoints(GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL)
    }

    /// Client talking to custom endpoints (local fakes in tests).
    pub fn with_endpoints(
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: auth_url.into(),
            token_url: token_url.into(),
            userinfo_url: userinfo_url.into(),
        }
    }

    /// URL of the consent screen the browser is sent to.
    pub fn authorization_url(&self, client_id: &str, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             include_granted_scopes=true&\
             access_type=offline&\
             prompt=consent&\
             state={}",
            self.auth_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        credentials: &GoogleCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Token exchange request failed: {}", e)))?;

        self.check_response_json(response, "Token exchange").await
    }

    /// Fetch the OpenID profile for an access token.
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::GoogleApi(format!("Userinfo request failed: {}", e)))?;

        self.check_response_json(response, "Userinfo").await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GoogleApi(format!(
                "{} failed: HTTP {}: {}",
                what, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleApi(format!("{} JSON parse error: {}", what, e)))
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// OpenID Connect userinfo response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleUserInfo {
    /// Display name, else email local part, else `user_` and the start of `sub`.
    pub fn preferred_nickname(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        if let Some(local) = self
            .email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|l| !l.is_empty())
        {
            return local.to_string();
        }
        let prefix: String = self.sub.chars().take(6).collect();
        format!("user_{}", prefix)
    }
}

/// Random CSRF state for the authorization redirect (hex).
pub fn generate_state_token() -> Result<String, AppError> {
    let mut bytes = [0u8; STATE_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System random source failed")))?;
    Ok(hex::encode(bytes))
}

/// Compare the state echoed by Google with the one stored in the cookie.
///
/// A missing or empty cookie never matches.
pub fn state_matches(expected: Option<&str>, returned: &str) -> bool {
    match expected {
        Some(expected) if !expected.is_empty() => {
            expected.as_bytes().ct_eq(returned.as_bytes()).into()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: Option<&str>, email: Option<&str>) -> GoogleUserInfo {
        GoogleUserInfo {
            sub: "1098765432".to_string(),
            email: email.map(String::from),
            name: name.map(String::from),
            given_name: None,
            family_name: None,
            picture: None,
        }
    }

    #[test]
    fn test_preferred_nickname_fallbacks() {
        assert_eq!(
            info(Some("Haneul Kim"), Some("sky@example.com")).preferred_nickname(),
            "Haneul Kim"
        );
        assert_eq!(
            info(None, Some("sky@example.com")).preferred_nickname(),
            "sky"
        );
        assert_eq!(info(Some("  "), None).preferred_nickname(), "user_109876");
    }

    #[test]
    fn test_state_token_shape() {
        let a = generate_state_token().unwrap();
        let b = generate_state_token().unwrap();

        assert_eq!(a.len(), STATE_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_state_matches() {
        assert!(state_matches(Some("abc123"), "abc123"));
        assert!(!state_matches(Some("abc123"), "abc124"));
        assert!(!state_matches(Some("abc123"), "abc"));
        assert!(!state_matches(None, "abc123"));
        assert!(!state_matches(Some(""), ""));
    }

    #[test]
    fn test_authorization_url_parameters() {
        let client = GoogleOAuthClient::new();
        let url = client.authorization_url(
            "client-1",
            "http://localhost:8080/auth/google/callback",
            "deadbeef",
        );

        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("state=deadbeef"));
    }
}
