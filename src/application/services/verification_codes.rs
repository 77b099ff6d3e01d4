// src/application/services/verification_codes.rs
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use crate::application::{
    ApplicationResult,
    codec::ContextCodec,
    error::ApplicationError,
    ports::{CodeGeneratorPort, VerificationCodeBackendPort},
};
use crate::domain::{ContextBlob, VerificationCode};

/// Issues single-use verification codes and redeems them exactly once.
///
/// Holds no state of its own; every guarantee about exclusivity comes from the
/// backend's `get_and_delete`. Cloning is cheap and clones share the backend.
#[derive(Clone)]
pub struct VerificationCodeService {
    generator: Arc<CodeGeneratorPort>,
    backend: Arc<VerificationCodeBackendPort>,
    codec: ContextCodec,
}

impl VerificationCodeService {
    pub fn new(generator: Arc<CodeGeneratorPort>, backend: Arc<VerificationCodeBackendPort>) -> Self {
        Self {
            generator,
            backend,
            codec: ContextCodec::new(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Persist `context` under a freshly generated code and return the code.
    pub async fn store<T>(&self, context: &T) -> ApplicationResult<VerificationCode>
    where
        T: Serialize + Sync + ?Sized,
    {
        let code = self.generator.generate()?;
        let blob = self.codec.encode(context).inspect_err(|err| {
            warn!(
                backend = self.backend.name(),
                error = %err,
                "context rejected before storage"
            );
        })?;
        self.persist(code, blob).await
    }

    /// Like [`store`](Self::store) for callers that bring their own encoding.
    pub async fn store_blob(&self, blob: ContextBlob) -> ApplicationResult<VerificationCode> {
        let code = self.generator.generate()?;
        self.persist(code, blob).await
    }

    /// Redeem `code`, returning the context it was issued for.
    ///
    /// The row is removed before the context is decoded, so a stored blob that
    /// turns out to be corrupt is still gone afterwards.
    pub async fn consume<T>(&self, code: &str) -> ApplicationResult<T>
    where
        T: DeserializeOwned,
    {
        let blob = self.consume_blob(code).await?;
        self.codec.decode(&blob).inspect_err(|err| {
            error!(
                backend = self.backend.name(),
                error = %err,
                "consumed verification code carried an undecodable context"
            );
        })
    }

    /// Like [`consume`](Self::consume) without decoding the stored bytes.
    pub async fn consume_blob(&self, code: &str) -> ApplicationResult<ContextBlob> {
        let Ok(code) = VerificationCode::new(code) else {
            debug!("rejected malformed verification code");
            return Err(ApplicationError::InvalidCode);
        };

        match self.backend.get_and_delete(&code).await {
            Ok(Some(blob)) => {
                debug!(
                    backend = self.backend.name(),
                    code_fingerprint = %code.fingerprint(),
                    "verification code consumed"
                );
                Ok(blob)
            }
            Ok(None) => {
                debug!(
                    backend = self.backend.name(),
                    code_fingerprint = %code.fingerprint(),
                    "verification code not found"
                );
                Err(ApplicationError::InvalidCode)
            }
            Err(err) => {
                error!(
                    backend = self.backend.name(),
                    code_fingerprint = %code.fingerprint(),
                    error = %err,
                    "failed to consume verification code"
                );
                Err(err)
            }
        }
    }

    async fn persist(
        &self,
        code: VerificationCode,
        blob: ContextBlob,
    ) -> ApplicationResult<VerificationCode> {
        match self.backend.put(&code, &blob).await {
            Ok(()) => {
                debug!(
                    backend = self.backend.name(),
                    code_fingerprint = %code.fingerprint(),
                    context_bytes = blob.len(),
                    "verification code stored"
                );
                Ok(code)
            }
            Err(ApplicationError::DuplicateCode) => {
                error!(
                    backend = self.backend.name(),
                    code_fingerprint = %code.fingerprint(),
                    "generated verification code collided with a live code"
                );
                Err(ApplicationError::DuplicateCode)
            }
            Err(err) => {
                warn!(
                    backend = self.backend.name(),
                    error = %err,
                    "failed to store verification code"
                );
                Err(err)
            }
        }
    }
}
