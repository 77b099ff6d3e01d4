// src/infrastructure/persistence/memory.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::persistence::VerificationCodeBackend;
use crate::domain::{ContextBlob, VerificationCode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

/// Process-local backend. Exclusivity comes from the map lock, so it is only
/// correct for a single instance; use a shared backend when scaling out.
#[derive(Default)]
pub struct InMemoryVerificationCodeBackend {
    // code -> serialized context
    inner: Mutex<HashMap<VerificationCode, ContextBlob>>,
}

impl InMemoryVerificationCodeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> ApplicationResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> ApplicationResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<VerificationCode, ContextBlob>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::storage_integrity("in-memory code map poisoned"))
    }
}

#[async_trait]
impl VerificationCodeBackend for InMemoryVerificationCodeBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, code: &VerificationCode, blob: &ContextBlob) -> ApplicationResult<()> {
        match self.lock()?.entry(code.clone()) {
            Entry::Occupied(_) => Err(ApplicationError::DuplicateCode),
            Entry::Vacant(slot) => {
                slot.insert(blob.clone());
                Ok(())
            }
        }
    }

    async fn get_and_delete(&self, code: &VerificationCode) -> ApplicationResult<Option<ContextBlob>> {
        Ok(self.lock()?.remove(code))
    }
}
