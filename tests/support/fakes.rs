// tests/support/fakes.rs
use async_trait::async_trait;
use std::sync::Mutex;
use verification_codes::application::ApplicationResult;
use verification_codes::application::error::ApplicationError;
use verification_codes::application::ports::code_generator::CodeGenerator;
use verification_codes::application::ports::persistence::VerificationCodeBackend;
use verification_codes::domain::{ContextBlob, VerificationCode};

/// Always hands out the same code, to force collisions.
#[derive(Debug, Clone)]
pub struct FixedCodeGenerator {
    code: String,
}

impl FixedCodeGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> ApplicationResult<VerificationCode> {
        Ok(VerificationCode::new(self.code.clone()).expect("fixed code must be valid"))
    }
}

/// Simulates an exhausted entropy source.
#[derive(Debug, Default)]
pub struct FailingCodeGenerator;

impl CodeGenerator for FailingCodeGenerator {
    fn generate(&self) -> ApplicationResult<VerificationCode> {
        Err(ApplicationError::entropy_unavailable("getrandom unavailable"))
    }
}

/// Backend whose every call fails as if the server were down. Records how
/// many calls reached it.
#[derive(Debug, Default)]
pub struct UnreachableBackend {
    pub calls: Mutex<usize>,
}

#[async_trait]
impl VerificationCodeBackend for UnreachableBackend {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn put(&self, _code: &VerificationCode, _blob: &ContextBlob) -> ApplicationResult<()> {
        *self.calls.lock().unwrap() += 1;
        Err(ApplicationError::backend_unavailable("connection refused"))
    }

    async fn get_and_delete(&self, _code: &VerificationCode) -> ApplicationResult<Option<ContextBlob>> {
        *self.calls.lock().unwrap() += 1;
        Err(ApplicationError::backend_unavailable("connection refused"))
    }
}
