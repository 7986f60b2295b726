use crate::ndef::types::error;
use crate::{Reason, Result};

/// Payload of an external record, opaque to this crate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ExternalRecord {
    payload: Option<Vec<u8>>,
}

impl ExternalRecord {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    /// Borrows the payload, failing if none has been set yet.
    pub fn payload(&self) -> Result<&[u8]> {
        self.payload
            .as_deref()
            .ok_or_else(|| error("payload", Reason::InvalidState))
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = Some(payload);
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

    #[test]
    fn test_unset_payload() {
        let mut record = ExternalRecord::default();

        assert_eq!(Reason::InvalidState, record.payload().unwrap_err().reason);
        assert_eq!(Reason::InvalidState, record.encode().unwrap_err().reason);

        record.set_payload(vec![0x01, 0x02]);
        assert_eq!(vec![0x01, 0x02], record.encode().unwrap());
    }

    #[test]
    fn test_empty_payload_is_set() {
        let record = ExternalRecord::decode(&[]).unwrap();

        assert!(record.payload().unwrap().is_empty());
        assert!(record.encode().unwrap().is_empty());
    }
}
