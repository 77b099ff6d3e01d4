// src/infrastructure/security/mod.rs
pub mod code_generator;

pub use code_generator::RandomCodeGenerator;
