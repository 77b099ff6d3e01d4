// src/domain/verification_code.rs
use crate::domain::errors::{DomainError, DomainResult};
use sha2::{Digest, Sha256};
use std::fmt;

/// Upper bound on the length of a presented code. Anything longer can never
/// have been issued and is rejected before reaching a backend.
pub const MAX_CODE_LEN: usize = 512;

/// A single-use bearer secret linking a later grant request to a stored
/// context.
///
/// `Debug` never prints the secret itself, only [`VerificationCode::fingerprint`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation(
                "verification code cannot be empty".into(),
            ));
        }
        if value.len() > MAX_CODE_LEN {
            return Err(DomainError::Validation(format!(
                "verification code exceeds {MAX_CODE_LEN} bytes"
            )));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::Validation(
                "verification code contains whitespace or control characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Short, non-reversible identifier safe to put in logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest[..6].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerificationCode")
            .field(&self.fingerprint())
            .finish()
    }
}

impl From<VerificationCode> for String {
    fn from(value: VerificationCode) -> Self {
        value.0
    }
}

/// Serialized context bytes. Never interpreted by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlob(Vec<u8>);

impl ContextBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ContextBlob {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}
