// src/application/ports/code_generator.rs
use crate::application::ApplicationResult;
use crate::domain::VerificationCode;

pub trait CodeGenerator: Send + Sync {
    /// Produce a fresh, unpredictable code. Fails only when the randomness
    /// source is unavailable.
    fn generate(&self) -> ApplicationResult<VerificationCode>;
}
