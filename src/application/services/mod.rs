// src/application/services/mod.rs
pub mod verification_codes;

pub use verification_codes::VerificationCodeService;
