// src/application/ports/mod.rs
pub mod code_generator;
pub mod persistence;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type CodeGeneratorPort = dyn code_generator::CodeGenerator;
pub type VerificationCodeBackendPort = dyn persistence::VerificationCodeBackend;
