//! Registry of payload decoders, keyed by TNF and record type.
//!
//! A process-wide instance seeded with the built-in record types backs [`Record::decode`]
//! through the free functions of this module.
//!
//! [`Record::decode`]: crate::ndef::Record::decode

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::error::{Error, Module, Reason};
use crate::logging::debug;
use crate::ndef::message;
use crate::ndef::record::{RecordBody, Tnf};
use crate::ndef::types::{
    handover_select, AlternativeCarrierRecord, BrandProtectionRecord, ErrorRecord,
    ExternalRecord, GenericRecord, HandoverSelectRecord, UriRecord,
};
use crate::Result;

/// Decodes a record payload into its body.
pub type Decoder = Arc<dyn Fn(&[u8]) -> Result<RecordBody> + Send + Sync>;

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::with_defaults()));

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::NdefRegistry, function, reason)
}

/// A table of decoders, one per TNF and record type.
#[derive(Default)]
pub struct Registry {
    decoders: HashMap<(Tnf, Vec<u8>), Decoder>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the decoders of the built-in record types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.seed();
        registry
    }

    fn seed(&mut self) {
        let defaults: [(Tnf, &[u8], Decoder); 5] = [
            (
                Tnf::WellKnown,
                UriRecord::TYPE,
                Arc::new(|payload: &[u8]| UriRecord::decode(payload).map(RecordBody::Uri)),
            ),
            (
                Tnf::WellKnown,
                HandoverSelectRecord::TYPE,
                handover_select::decoder(message::CODEC),
            ),
            (
                Tnf::WellKnown,
                AlternativeCarrierRecord::TYPE,
                Arc::new(|payload: &[u8]| {
                    AlternativeCarrierRecord::decode(payload).map(RecordBody::AlternativeCarrier)
                }),
            ),
            (
                Tnf::WellKnown,
                ErrorRecord::TYPE,
                Arc::new(|payload: &[u8]| ErrorRecord::decode(payload).map(RecordBody::Error)),
            ),
            (
                Tnf::External,
                BrandProtectionRecord::TYPE,
                Arc::new(|payload: &[u8]| {
                    BrandProtectionRecord::decode(payload).map(RecordBody::BrandProtection)
                }),
            ),
        ];

        for (tnf, record_type, decoder) in defaults {
            self.decoders.insert((tnf, record_type.to_vec()), decoder);
        }
    }

    /// Registers the decoder for the record type under the TNF.
    pub fn register(&mut self, tnf: Tnf, record_type: &[u8], decoder: Decoder) -> Result<()> {
        let key = (tnf, record_type.to_vec());
        if self.decoders.contains_key(&key) {
            return Err(error("register", Reason::AlreadyRegistered));
        }

        self.decoders.insert(key, decoder);

        Ok(())
    }

    /// Retrieves the decoder for the record type under the TNF.
    ///
    /// Unregistered types of TNF external decode as [`ExternalRecord`], any other unregistered
    /// type decodes as [`GenericRecord`].
    pub fn retrieve_handle(&self, tnf: Tnf, record_type: &[u8]) -> Decoder {
        if let Some(decoder) = self.decoders.get(&(tnf, record_type.to_vec())) {
            return Arc::clone(decoder);
        }

        match tnf {
            Tnf::External => Arc::new(|payload: &[u8]| {
                ExternalRecord::decode(payload).map(RecordBody::External)
            }),
            _ => Arc::new(|payload: &[u8]| {
                GenericRecord::decode(payload).map(RecordBody::Generic)
            }),
        }
    }

    /// Removes every decoder.
    pub fn release_resource(&mut self) {
        self.decoders.clear();
    }

    /// Restores the decoders of the built-in record types, dropping the others.
    pub fn reset(&mut self) {
        self.decoders.clear();
        self.seed();
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

fn lock() -> MutexGuard<'static, Registry> {
    REGISTRY
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registers the decoder for the record type in the process-wide registry.
pub fn register(tnf: Tnf, record_type: &[u8], decoder: Decoder) -> Result<()> {
    lock().register(tnf, record_type, decoder)?;

    debug!(
        "Registered NDEF record type: {:?} {}",
        tnf,
        hex::encode(record_type)
    );

    Ok(())
}

/// Retrieves the decoder for the record type from the process-wide registry.
///
/// The lock is released before returning, so the decoder may itself decode nested records.
pub fn retrieve_handle(tnf: Tnf, record_type: &[u8]) -> Decoder {
    lock().retrieve_handle(tnf, record_type)
}

/// Empties the process-wide registry. Only unregistered types decode afterwards.
pub fn release_resource() {
    lock().release_resource();
}

/// Reseeds the process-wide registry with the built-in record types.
pub fn reset() {
    lock().reset();
}
