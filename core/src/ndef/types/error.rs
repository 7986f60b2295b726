//! Error record carried in a handover-select message.

use crate::ndef::types::error;
use crate::{Reason, Result};

/// The selector could not process the request for lack of memory for now. The data is the
/// number of octets it could process, in one octet.
pub const TEMPORARY_MEMORY_CONSTRAINTS: u8 = 0x01;
/// The selector will never be able to process a request this large. The data is the maximum
/// number of octets, in four octets.
pub const PERMANENT_MEMORY_CONSTRAINTS: u8 = 0x02;
/// The selector cannot process the request due to carrier constraints. The data is a time in
/// milliseconds, in one octet.
pub const CARRIER_SPECIFIC_CONSTRAINTS: u8 = 0x03;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ErrorRecord {
    pub reason: u8,
    pub data: Vec<u8>,
}

impl ErrorRecord {
    pub const TYPE: &'static [u8] = b"err";

    pub fn new(reason: u8, data: Vec<u8>) -> Self {
        Self { reason, data }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(1 + self.data.len());
        payload.push(self.reason);
        payload.extend_from_slice(&self.data);

        Ok(payload)
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        match payload.split_first() {
            Some((reason, data)) => Ok(Self::new(*reason, data.to_vec())),
            None => Err(error("decode", Reason::InvalidMessage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let record = ErrorRecord::new(PERMANENT_MEMORY_CONSTRAINTS, vec![0x00, 0x00, 0x10, 0x00]);

        assert_eq!(vec![0x02, 0x00, 0x00, 0x10, 0x00], record.encode().unwrap());
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            ErrorRecord::new(CARRIER_SPECIFIC_CONSTRAINTS, vec![0x64]),
            ErrorRecord::decode(&[0x03, 0x64]).unwrap(),
        );
        assert_eq!(
            ErrorRecord::new(TEMPORARY_MEMORY_CONSTRAINTS, vec![]),
            ErrorRecord::decode(&[0x01]).unwrap(),
        );
    }

    #[test]
    fn test_decode_empty_payload() {
        let error = ErrorRecord::decode(&[]).unwrap_err();

        assert_eq!(crate::Module::NdefRecordType, error.module);
        assert_eq!(Reason::InvalidMessage, error.reason);
    }
}
