//! Single-use verification codes for authorization-code grants.
//!
//! [`VerificationCodeService`] stores an authorization context under a fresh
//! random code and later redeems that code exactly once. Persistence is
//! pluggable through [`VerificationCodeBackend`]; in-memory, PostgreSQL,
//! SQLite and Redis implementations live in [`infrastructure::persistence`].
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::ports::persistence::VerificationCodeBackend;
pub use application::services::VerificationCodeService;
pub use application::{ApplicationError, ApplicationResult};
pub use domain::VerificationCode;
