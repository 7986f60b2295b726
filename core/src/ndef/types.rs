//! Payload codecs of the supported record types.

pub mod alternative_carrier;
pub mod brand_protection;
pub mod error;
pub mod external;
pub mod generic;
pub mod handover_select;
pub mod uri;

pub use self::alternative_carrier::{AlternativeCarrierRecord, CarrierPowerState};
pub use self::brand_protection::{BrandProtectionRecord, Certificate, CertificateHandlers};
pub use self::error::ErrorRecord;
pub use self::external::ExternalRecord;
pub use self::generic::GenericRecord;
pub use self::handover_select::{HandoverSelectRecord, MessageCodec};
pub use self::uri::UriRecord;

fn error(function: &'static str, reason: crate::Reason) -> crate::Error {
    crate::Error::new(crate::Module::NdefRecordType, function, reason)
}
