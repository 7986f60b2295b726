//! Framing of a single NDEF record.
//!
//! ```text
//! header:  MB ME CF SR IL TNF(3)
//! type_length (1) | payload_length (1 if SR, else 4) | id_length (1, if IL)
//! type | id | payload
//! ```
//!
//! MB and ME are left to the message layer. Chunked records are not supported.

use crate::error::{Error, Module, Reason};
use crate::ndef::types::{
    AlternativeCarrierRecord, BrandProtectionRecord, ErrorRecord, ExternalRecord, GenericRecord,
    HandoverSelectRecord, UriRecord,
};
use crate::ndef::{message, registry};
use crate::reader::Reader;
use crate::Result;

pub const FLAG_MB: u8 = 0x80;
pub const FLAG_ME: u8 = 0x40;
pub const FLAG_CF: u8 = 0x20;
pub const FLAG_SR: u8 = 0x10;
pub const FLAG_IL: u8 = 0x08;
pub const TNF_MASK: u8 = 0x07;

const SHORT_PAYLOAD_MAX: usize = 0xFF;
const FIELD_LENGTH_MAX: usize = 0xFF;

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::NdefRecord, function, reason)
}

/// Type Name Format: how the type field of a record is to be interpreted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Tnf {
    Empty = 0x00,
    WellKnown = 0x01,
    Media = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl From<u8> for Tnf {
    /// Extracts the TNF from the low three bits of a record header.
    fn from(header: u8) -> Self {
        match header & TNF_MASK {
            0x00 => Self::Empty,
            0x01 => Self::WellKnown,
            0x02 => Self::Media,
            0x03 => Self::AbsoluteUri,
            0x04 => Self::External,
            0x05 => Self::Unknown,
            0x06 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }
}

/// Decoded payload of a record, one variant per supported record type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RecordBody {
    Uri(UriRecord),
    HandoverSelect(HandoverSelectRecord),
    AlternativeCarrier(AlternativeCarrierRecord),
    Error(ErrorRecord),
    External(ExternalRecord),
    BrandProtection(BrandProtectionRecord),
    Generic(GenericRecord),
}

impl RecordBody {
    /// Encodes the body into the record payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Self::Uri(record) => record.encode(),
            Self::HandoverSelect(record) => record.encode(&message::CODEC),
            Self::AlternativeCarrier(record) => record.encode(),
            Self::Error(record) => record.encode(),
            Self::External(record) => record.encode(),
            Self::BrandProtection(record) => record.encode(),
            Self::Generic(record) => record.encode(),
        }
    }
}

/// An NDEF record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Record {
    pub tnf: Tnf,
    pub record_type: Vec<u8>,
    /// Record identifier; empty when the record has none.
    pub id: Vec<u8>,
    pub body: RecordBody,
}

macro_rules! accessors {
    ($($variant: ident => $ty: ty, $get: ident, $get_mut: ident;)*) => {
        $(
            /// Borrows the body, failing if the record is of another type.
            pub fn $get(&self) -> Result<&$ty> {
                match &self.body {
                    RecordBody::$variant(record) => Ok(record),
                    _ => Err(error(stringify!($get), Reason::RecordInvalid)),
                }
            }

            /// Mutably borrows the body, failing if the record is of another type.
            pub fn $get_mut(&mut self) -> Result<&mut $ty> {
                match &mut self.body {
                    RecordBody::$variant(record) => Ok(record),
                    _ => Err(error(stringify!($get_mut), Reason::RecordInvalid)),
                }
            }
        )*
    };
}

macro_rules! well_known {
    ($($ty: ty => $variant: ident, $tnf: expr;)*) => {
        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Self::new($tnf, <$ty>::TYPE.to_vec(), RecordBody::$variant(record))
                }
            }
        )*
    };
}

well_known! {
    UriRecord => Uri, Tnf::WellKnown;
    HandoverSelectRecord => HandoverSelect, Tnf::WellKnown;
    AlternativeCarrierRecord => AlternativeCarrier, Tnf::WellKnown;
    ErrorRecord => Error, Tnf::WellKnown;
    BrandProtectionRecord => BrandProtection, Tnf::External;
}

impl Record {
    pub fn new(tnf: Tnf, record_type: Vec<u8>, body: RecordBody) -> Self {
        Self {
            tnf,
            record_type,
            id: Vec::new(),
            body,
        }
    }

    /// Creates an external record of the caller's type.
    pub fn external(record_type: Vec<u8>, record: ExternalRecord) -> Self {
        Self::new(Tnf::External, record_type, RecordBody::External(record))
    }

    /// Creates a record carrying an opaque payload.
    pub fn generic(tnf: Tnf, record_type: Vec<u8>, record: GenericRecord) -> Self {
        Self::new(tnf, record_type, RecordBody::Generic(record))
    }

    pub fn with_id(mut self, id: Vec<u8>) -> Self {
        self.id = id;
        self
    }

    accessors! {
        Uri => UriRecord, uri, uri_mut;
        HandoverSelect => HandoverSelectRecord, handover_select, handover_select_mut;
        AlternativeCarrier => AlternativeCarrierRecord, alternative_carrier, alternative_carrier_mut;
        Error => ErrorRecord, error_record, error_record_mut;
        External => ExternalRecord, external_record, external_record_mut;
        BrandProtection => BrandProtectionRecord, brand_protection, brand_protection_mut;
        Generic => GenericRecord, generic_record, generic_record_mut;
    }

    /// Frames the record. MB and ME are left clear.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.record_type.len() > FIELD_LENGTH_MAX || self.id.len() > FIELD_LENGTH_MAX {
            return Err(error("encode", Reason::IllegalArgument));
        }

        let payload = self.body.encode()?;
        let payload_length =
            u32::try_from(payload.len()).map_err(|_| error("encode", Reason::IllegalArgument))?;

        let short = payload.len() <= SHORT_PAYLOAD_MAX;
        let has_id = !self.id.is_empty();
        let size = 2
            + if short { 1 } else { 4 }
            + if has_id { 1 } else { 0 }
            + self.record_type.len()
            + self.id.len()
            + payload.len();

        let mut header = self.tnf as u8;
        if short {
            header |= FLAG_SR;
        }
        if has_id {
            header |= FLAG_IL;
        }

        let mut frame = Vec::with_capacity(size);
        frame.push(header);
        frame.push(self.record_type.len() as u8);
        match short {
            true => frame.push(payload_length as u8),
            _ => frame.extend_from_slice(&payload_length.to_be_bytes()),
        }
        if has_id {
            frame.push(self.id.len() as u8);
        }
        frame.extend_from_slice(&self.record_type);
        frame.extend_from_slice(&self.id);
        frame.extend_from_slice(&payload);

        Ok(frame)
    }

    /// Unframes the record at the start of the bytes, decoding its payload with the decoder
    /// registered for its type. Returns the record and the number of octets consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let invalid = || error("decode", Reason::InvalidMessage);

        let mut reader = Reader::new(bytes);
        let header = reader.next().ok_or_else(invalid)?;
        if header & FLAG_CF != 0 {
            return Err(invalid());
        }

        let type_length = reader.next().ok_or_else(invalid)? as usize;
        let payload_length = match header & FLAG_SR != 0 {
            true => reader.next().map(usize::from),
            _ => reader.read_u32().map(|length| length as usize),
        }
        .ok_or_else(invalid)?;
        let id_length = match header & FLAG_IL != 0 {
            true => reader.next().ok_or_else(invalid)? as usize,
            _ => 0,
        };

        let record_type = reader.read(type_length).ok_or_else(invalid)?.to_vec();
        let id = reader.read(id_length).ok_or_else(invalid)?.to_vec();
        let payload = reader.read(payload_length).ok_or_else(invalid)?;

        let tnf = Tnf::from(header);
        let decode = registry::retrieve_handle(tnf, &record_type);
        let body = decode(payload)?;

        Ok((
            Self {
                tnf,
                record_type,
                id,
                body,
            },
            reader.position(),
        ))
    }
}
