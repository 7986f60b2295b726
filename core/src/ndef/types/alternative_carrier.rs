//! Alternative-carrier record: points at the carrier configuration record of a handover
//! message.
//!
//! ```text
//! cps (1) | length (1) | carrier data reference | count (1) | (length (1) | auxiliary data reference)*
//! ```

use crate::ndef::types::error;
use crate::reader::Reader;
use crate::{Reason, Result};

const CPS_MASK: u8 = 0x03;
const REFERENCE_LENGTH_MAX: usize = 0xFF;
const AUXILIARY_COUNT_MAX: usize = 0xFF;

/// Power state of the alternative carrier.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum CarrierPowerState {
    Inactive = 0x00,
    Active = 0x01,
    Activating = 0x02,
    #[default]
    Unknown = 0x03,
}

impl From<u8> for CarrierPowerState {
    /// Takes the low two bits; the others are reserved.
    fn from(value: u8) -> Self {
        match value & CPS_MASK {
            0x00 => Self::Inactive,
            0x01 => Self::Active,
            0x02 => Self::Activating,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AlternativeCarrierRecord {
    pub cps: CarrierPowerState,
    pub carrier_data_reference: Vec<u8>,
    pub auxiliary_data_references: Vec<Vec<u8>>,
}

impl AlternativeCarrierRecord {
    pub const TYPE: &'static [u8] = b"ac";

    pub fn new(cps: CarrierPowerState, carrier_data_reference: Vec<u8>) -> Self {
        Self {
            cps,
            carrier_data_reference,
            auxiliary_data_references: vec![],
        }
    }

    pub fn with_auxiliary_data_reference(mut self, reference: Vec<u8>) -> Self {
        self.auxiliary_data_references.push(reference);
        self
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let references = || {
            std::iter::once(&self.carrier_data_reference).chain(&self.auxiliary_data_references)
        };

        if self.auxiliary_data_references.len() > AUXILIARY_COUNT_MAX
            || references().any(|reference| reference.len() > REFERENCE_LENGTH_MAX)
        {
            return Err(error("encode", Reason::IllegalArgument));
        }

        let size = 2 + references().map(|reference| 1 + reference.len()).sum::<usize>();
        let mut payload = Vec::with_capacity(size);
        payload.push(self.cps as u8);
        payload.push(self.carrier_data_reference.len() as u8);
        payload.extend_from_slice(&self.carrier_data_reference);
        payload.push(self.auxiliary_data_references.len() as u8);
        for reference in &self.auxiliary_data_references {
            payload.push(reference.len() as u8);
            payload.extend_from_slice(reference);
        }

        Ok(payload)
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let invalid = || error("decode", Reason::InvalidMessage);

        let mut reader = Reader::new(payload);
        let cps = CarrierPowerState::from(reader.next().ok_or_else(invalid)?);
        let carrier_data_reference = reader.read_prefixed().ok_or_else(invalid)?.to_vec();

        let count = reader.next().ok_or_else(invalid)?;
        let auxiliary_data_references = (0..count)
            .map(|_| reader.read_prefixed().map(<[u8]>::to_vec).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()?;

        match reader.is_empty() {
            true => Ok(Self {
                cps,
                carrier_data_reference,
                auxiliary_data_references,
            }),
            _ => Err(invalid()),
        }
    }
}
