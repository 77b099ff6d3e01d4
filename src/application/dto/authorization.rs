// src/application/dto/authorization.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who approved the grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSubject {
    pub user_id: i64,
    pub username: String,
}

/// PKCE challenge captured at the authorization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChallenge {
    pub challenge: String,
    pub method: ChallengeMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeMethod {
    #[serde(rename = "plain")]
    Plain,
    #[serde(rename = "S256")]
    S256,
}

/// Authentication state bound to an authorization code.
///
/// Any `Serialize + DeserializeOwned` type can be stored; this one covers the
/// usual authorization-code grant. `extensions` is a `BTreeMap` so encoding
/// stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    pub subject: GrantSubject,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<CodeChallenge>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
    pub authenticated_at: DateTime<Utc>,
}

impl AuthorizationContext {
    pub fn new(
        subject: GrantSubject,
        client_id: impl Into<String>,
        authenticated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            client_id: client_id.into(),
            redirect_uri: None,
            scopes: Vec::new(),
            code_challenge: None,
            extensions: BTreeMap::new(),
            authenticated_at,
        }
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_code_challenge(mut self, challenge: impl Into<String>, method: ChallengeMethod) -> Self {
        self.code_challenge = Some(CodeChallenge {
            challenge: challenge.into(),
            method,
        });
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
