// src/application/ports/persistence.rs
use crate::application::ApplicationResult;
use crate::domain::{ContextBlob, VerificationCode};
use async_trait::async_trait;

#[async_trait]
pub trait VerificationCodeBackend: Send + Sync {
    /// Short backend name used in log fields.
    fn name(&self) -> &'static str;

    /// Insert a new row. Must fail with `DuplicateCode` rather than overwrite
    /// an existing live code.
    async fn put(&self, code: &VerificationCode, blob: &ContextBlob) -> ApplicationResult<()>;

    /// Atomically fetch and remove the row for `code`.
    ///
    /// Of any number of concurrent callers presenting the same code, at most one
    /// observes `Some`. The row must be gone once this returns `Ok`.
    async fn get_and_delete(&self, code: &VerificationCode) -> ApplicationResult<Option<ContextBlob>>;
}
