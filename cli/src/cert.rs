use std::sync::Arc;

use nbt::ndef::types::{Certificate, CertificateHandlers};
use nbt::{Error, Module, Reason};
use x509_certificate::X509Certificate;

/// Converts brand-protection payloads from and to DER-encoded X.509 certificates.
pub const HANDLERS: CertificateHandlers = CertificateHandlers { encode, decode };

fn invalid(function: &'static str) -> Error {
    Error::new(Module::NdefRecordType, function, Reason::IllegalArgument)
}

fn encode(certificate: &Certificate) -> nbt::Result<Vec<u8>> {
    certificate
        .downcast_ref::<X509Certificate>()
        .ok_or_else(|| invalid("encode"))?
        .encode_der()
        .map_err(|_| invalid("encode"))
}

fn decode(payload: &[u8]) -> nbt::Result<Certificate> {
    let certificate = X509Certificate::from_der(payload).map_err(|_| invalid("decode"))?;

    Ok(Arc::new(certificate))
}

/// Common name of the subject of the certificate.
pub fn subject(certificate: &Certificate) -> Option<String> {
    certificate
        .downcast_ref::<X509Certificate>()
        .and_then(X509Certificate::subject_common_name)
}
