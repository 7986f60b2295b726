use crate::Result;

/// Payload of a record of a type with no registered decoder.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GenericRecord {
    pub payload: Vec<u8>,
}

impl GenericRecord {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(self.payload.clone())
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self::new(payload.to_vec()))
    }
}
