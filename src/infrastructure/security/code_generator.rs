// src/infrastructure/security/code_generator.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::code_generator::CodeGenerator;
use crate::domain::VerificationCode;
use crate::domain::errors::{DomainError, DomainResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand_core::{OsRng, TryRngCore};

pub const DEFAULT_CODE_BYTES: usize = 32;
pub const MIN_CODE_BYTES: usize = 16;
pub const MAX_CODE_BYTES: usize = 256;

/// Draws codes from the operating system CSPRNG and renders them as unpadded
/// URL-safe base64.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    byte_len: usize,
}

impl RandomCodeGenerator {
    pub fn new(byte_len: usize) -> DomainResult<Self> {
        if !(MIN_CODE_BYTES..=MAX_CODE_BYTES).contains(&byte_len) {
            return Err(DomainError::Validation(format!(
                "code length must be between {MIN_CODE_BYTES} and {MAX_CODE_BYTES} bytes, got {byte_len}"
            )));
        }
        Ok(Self { byte_len })
    }

    pub const fn byte_len(&self) -> usize {
        self.byte_len
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self {
            byte_len: DEFAULT_CODE_BYTES,
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ApplicationResult<VerificationCode> {
        let mut buf = vec![0u8; self.byte_len];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|err| ApplicationError::entropy_unavailable(err.to_string()))?;

        VerificationCode::new(URL_SAFE_NO_PAD.encode(&buf))
            .map_err(|err| ApplicationError::storage_integrity(err.to_string()))
    }
}
