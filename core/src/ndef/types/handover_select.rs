//! Handover-select record: the version of the handover protocol followed by an NDEF message
//! of alternative-carrier records and at most one error record.

use std::sync::Arc;

use crate::ndef::record::{Record, RecordBody};
use crate::ndef::registry::Decoder;
use crate::ndef::types::{error, AlternativeCarrierRecord, ErrorRecord};
use crate::{Reason, Result};

const VERSION_MAX: u8 = 0x0F;

/// Encoder and decoder of NDEF messages, injected to decode the nested local records.
#[derive(Copy, Clone)]
pub struct MessageCodec {
    pub encode: fn(&[Record]) -> Result<Vec<u8>>,
    pub decode: fn(&[u8]) -> Result<Vec<Record>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HandoverSelectRecord {
    pub major_version: u8,
    pub minor_version: u8,
    pub local_records: Vec<Record>,
}

impl HandoverSelectRecord {
    pub const TYPE: &'static [u8] = b"Hs";

    pub fn new(major_version: u8, minor_version: u8) -> Self {
        Self {
            major_version,
            minor_version,
            local_records: vec![],
        }
    }

    pub fn with_local_record(mut self, record: Record) -> Self {
        self.local_records.push(record);
        self
    }

    /// Returns the error record among the local records, if any.
    pub fn error_record(&self) -> Option<&ErrorRecord> {
        self.local_records
            .iter()
            .find_map(|record| record.error_record().ok())
    }

    pub fn alternative_carriers(&self) -> impl Iterator<Item = &AlternativeCarrierRecord> {
        self.local_records
            .iter()
            .filter_map(|record| record.alternative_carrier().ok())
    }

    fn validate(&self, function: &'static str) -> Result<()> {
        if self.major_version > VERSION_MAX || self.minor_version > VERSION_MAX {
            return Err(error(function, Reason::IllegalArgument));
        }

        let mut errors = 0;
        for record in &self.local_records {
            match &record.body {
                RecordBody::AlternativeCarrier(_) => {}
                RecordBody::Error(_) => errors += 1,
                _ => return Err(error(function, Reason::IllegalArgument)),
            }
        }

        match errors > 1 {
            true => Err(error(function, Reason::IllegalArgument)),
            _ => Ok(()),
        }
    }

    pub fn encode(&self, codec: &MessageCodec) -> Result<Vec<u8>> {
        self.validate("encode")?;

        let mut payload = vec![(self.major_version << 4) | self.minor_version];
        if !self.local_records.is_empty() {
            payload.extend((codec.encode)(&self.local_records)?);
        }

        Ok(payload)
    }

    pub fn decode(payload: &[u8], codec: &MessageCodec) -> Result<Self> {
        let (version, message) = payload
            .split_first()
            .ok_or_else(|| error("decode", Reason::InvalidMessage))?;

        let local_records = match message.is_empty() {
            true => vec![],
            _ => (codec.decode)(message)?,
        };

        let record = Self {
            major_version: version >> 4,
            minor_version: version & VERSION_MAX,
            local_records,
        };
        record.validate("decode")?;

        Ok(record)
    }
}

/// Creates the decoder of handover-select payloads over the message codec.
pub fn decoder(codec: MessageCodec) -> Decoder {
    Arc::new(move |payload: &[u8]| {
        HandoverSelectRecord::decode(payload, &codec).map(RecordBody::HandoverSelect)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndef::message::CODEC;
    use crate::ndef::types::{CarrierPowerState, UriRecord};

    fn carrier() -> Record {
        Record::from(AlternativeCarrierRecord::new(
            CarrierPowerState::Active,
            b"0".to_vec(),
        ))
    }

    #[test]
    fn test_encode_without_local_records() {
        assert_eq!(
            vec![0x12],
            HandoverSelectRecord::new(1, 2).encode(&CODEC).unwrap(),
        );
    }

    #[test]
    fn test_encode() {
        let record = HandoverSelectRecord::new(1, 5).with_local_record(carrier());

        assert_eq!(
            vec![0x15, 0xD1, 0x02, 0x04, b'a', b'c', 0x01, 0x01, 0x30, 0x00],
            record.encode(&CODEC).unwrap(),
        );
    }

    #[test]
    fn test_nested_round_trip() {
        let record = HandoverSelectRecord::new(1, 3)
            .with_local_record(carrier())
            .with_local_record(Record::from(ErrorRecord::new(0x01, vec![0x10])));
        let payload = record.encode(&CODEC).unwrap();

        let decoded = HandoverSelectRecord::decode(&payload, &CODEC).unwrap();

        assert_eq!(record, decoded);
        assert_eq!(1, decoded.alternative_carriers().count());
        assert_eq!(Some(&ErrorRecord::new(0x01, vec![0x10])), decoded.error_record());
    }

    #[test]
    fn test_through_registry() {
        let record = Record::from(HandoverSelectRecord::new(1, 2).with_local_record(carrier()));

        let bytes = crate::ndef::message::encode(&[record.clone()]).unwrap();

        assert_eq!(vec![record], crate::ndef::message::decode(&bytes).unwrap());
    }

    #[test]
    fn test_multiple_error_records() {
        let record = HandoverSelectRecord::new(1, 2)
            .with_local_record(Record::from(ErrorRecord::new(0x01, vec![])))
            .with_local_record(Record::from(ErrorRecord::new(0x02, vec![])));

        assert_eq!(
            Reason::IllegalArgument,
            record.encode(&CODEC).unwrap_err().reason,
        );
    }

    #[test]
    fn test_unexpected_local_record() {
        let record = HandoverSelectRecord::new(1, 2)
            .with_local_record(Record::from(UriRecord::from_uri("tel:+1")));

        assert_eq!(
            Reason::IllegalArgument,
            record.encode(&CODEC).unwrap_err().reason,
        );
    }

    #[test]
    fn test_version_out_of_range() {
        assert_eq!(
            Reason::IllegalArgument,
            HandoverSelectRecord::new(16, 0)
                .encode(&CODEC)
                .unwrap_err()
                .reason,
        );
    }

    #[test]
    fn test_decode_empty_payload() {
        assert_eq!(
            Reason::InvalidMessage,
            HandoverSelectRecord::decode(&[], &CODEC).unwrap_err().reason,
        );
    }
}
