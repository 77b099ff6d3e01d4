// src/application/codec.rs
//! Versioned serialization contract for stored contexts.
//!
//! Blobs are JSON documents of the form `{"version":1,"context":{...}}`, so any
//! consumer that can read JSON can decode a stored row without knowing the
//! Rust type that produced it.
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::ContextBlob;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

mod finite;

pub const CURRENT_VERSION: u16 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T: ?Sized> {
    version: u16,
    context: &'a T,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u16,
}

#[derive(Deserialize)]
struct Envelope<T> {
    context: T,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextCodec;

impl ContextCodec {
    pub const fn new() -> Self {
        Self
    }

    pub fn encode<T>(&self, context: &T) -> ApplicationResult<ContextBlob>
    where
        T: Serialize + ?Sized,
    {
        // JSON has no spelling for NaN or infinity.
        finite::ensure_finite(context)
            .map_err(|err| ApplicationError::invalid_context(err.to_string()))?;

        let envelope = EnvelopeRef {
            version: CURRENT_VERSION,
            context,
        };
        serde_json::to_vec(&envelope)
            .map(ContextBlob::new)
            .map_err(|err| {
                ApplicationError::invalid_context(format!("context could not be serialized: {err}"))
            })
    }

    pub fn decode<T>(&self, blob: &ContextBlob) -> ApplicationResult<T>
    where
        T: DeserializeOwned,
    {
        let header: VersionHeader = serde_json::from_slice(blob.as_bytes()).map_err(|err| {
            ApplicationError::storage_integrity(format!("stored context is not an envelope: {err}"))
        })?;

        if header.version != CURRENT_VERSION {
            return Err(ApplicationError::storage_integrity(format!(
                "unsupported context version {}",
                header.version
            )));
        }

        let envelope: Envelope<T> = serde_json::from_slice(blob.as_bytes()).map_err(|err| {
            ApplicationError::storage_integrity(format!("stored context could not be decoded: {err}"))
        })?;

        Ok(envelope.context)
    }
}
