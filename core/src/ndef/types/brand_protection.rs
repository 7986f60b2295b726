//! Brand-protection record: an external record carrying the X.509 certificate of the tag.
//!
//! The certificate is kept as encoded bytes. Converting it from and to a certificate object
//! needs [`CertificateHandlers`] from the caller, so this crate carries no X.509 parser.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::ndef::types::error;
use crate::{Reason, Result};

/// A certificate object of the caller's choice.
pub type Certificate = Arc<dyn Any + Send + Sync>;

/// Converters between a certificate object and its encoding.
#[derive(Copy, Clone)]
pub struct CertificateHandlers {
    pub encode: fn(&Certificate) -> Result<Vec<u8>>,
    pub decode: fn(&[u8]) -> Result<Certificate>,
}

impl fmt::Debug for CertificateHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateHandlers").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BrandProtectionRecord {
    payload: Option<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    handlers: Option<CertificateHandlers>,
}

impl PartialEq for BrandProtectionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl BrandProtectionRecord {
    pub const TYPE: &'static [u8] = b"infineon.com:nfc-bridge-tag.x509";

    /// Creates a record holding the encoded certificate.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
            handlers: None,
        }
    }

    pub fn set_certificate_handlers(&mut self, handlers: CertificateHandlers) {
        self.handlers = Some(handlers);
    }

    pub fn with_certificate_handlers(mut self, handlers: CertificateHandlers) -> Self {
        self.set_certificate_handlers(handlers);
        self
    }

    fn handlers(&self, function: &'static str) -> Result<&CertificateHandlers> {
        self.handlers
            .as_ref()
            .ok_or_else(|| error(function, Reason::CertHandlersNotDefined))
    }

    /// Encodes the certificate with the handlers and keeps the encoding as the payload.
    pub fn set_certificate(&mut self, certificate: &Certificate) -> Result<()> {
        let encode = self.handlers("set_certificate")?.encode;
        self.payload = Some(encode(certificate)?);

        Ok(())
    }

    /// Decodes the payload into a certificate with the handlers.
    pub fn get_certificate(&self) -> Result<Certificate> {
        let decode = self.handlers("get_certificate")?.decode;
        let payload = self
            .payload
            .as_deref()
            .ok_or_else(|| error("get_certificate", Reason::InvalidState))?;

        decode(payload)
    }

    /// Borrows the encoded certificate, failing if none has been set yet.
    pub fn payload(&self) -> Result<&[u8]> {
        self.payload
            .as_deref()
            .ok_or_else(|| error("payload", Reason::InvalidState))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.payload
            .clone()
            .ok_or_else(|| error("encode", Reason::InvalidState))
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self::new(payload.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(certificate: &Certificate) -> Result<Vec<u8>> {
        certificate
            .downcast_ref::<String>()
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| error("encode", Reason::IllegalArgument))
    }

    fn decode(payload: &[u8]) -> Result<Certificate> {
        let s = String::from_utf8(payload.to_vec())
            .map_err(|_| error("decode", Reason::IllegalArgument))?;

        Ok(Arc::new(s))
    }

    const HANDLERS: CertificateHandlers = CertificateHandlers { encode, decode };

    #[test]
    fn test_handlers_not_defined() {
        let mut record = BrandProtectionRecord::new(vec![0x30, 0x00]);
        let certificate: Certificate = Arc::new(String::from("cert"));

        assert_eq!(
            Reason::CertHandlersNotDefined,
            record.get_certificate().unwrap_err().reason,
        );
        assert_eq!(
            Reason::CertHandlersNotDefined,
            record.set_certificate(&certificate).unwrap_err().reason,
        );
        assert_eq!(vec![0x30, 0x00], record.encode().unwrap());
    }

    #[test]
    fn test_certificate_through_handlers() {
        let mut record = BrandProtectionRecord::default().with_certificate_handlers(HANDLERS);
        let certificate: Certificate = Arc::new(String::from("cert"));

        record.set_certificate(&certificate).unwrap();

        assert_eq!(b"cert", record.payload().unwrap());
        assert_eq!(
            Some(&String::from("cert")),
            record.get_certificate().unwrap().downcast_ref::<String>(),
        );
    }

    #[test]
    fn test_unset_payload() {
        let record = BrandProtectionRecord::default().with_certificate_handlers(HANDLERS);

        assert_eq!(Reason::InvalidState, record.encode().unwrap_err().reason);
        assert_eq!(
            Reason::InvalidState,
            record.get_certificate().unwrap_err().reason,
        );
    }

    #[test]
    fn test_equality_ignores_handlers() {
        assert_eq!(
            BrandProtectionRecord::new(vec![0x30]),
            BrandProtectionRecord::new(vec![0x30]).with_certificate_handlers(HANDLERS),
        );
    }
}
