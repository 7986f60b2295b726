//! DGI (Data Group Identifier) TLV codec.
//!
//! Each entity is `tag (2 octets, big-endian) || length || value`, where the length is a single
//! octet below `0xFF`, or `0xFF` followed by a big-endian `u16` otherwise.

use crate::error::{Error, Module, Reason};
use crate::reader::Reader;
use crate::Result;

const EXTENDED_LENGTH: u8 = 0xFF;
const VALUE_MAX: usize = 0xFFFF;

/// Well-known DGIs of the NBT applet.
pub mod tag {
    /// AES key for COTT (cryptographic one-time tag) generation.
    pub const AES_COTT_KEY: u16 = 0xA001;
    pub const ECC_KEY: u16 = 0xA002;
    pub const PASSWORDS: u16 = 0xA003;
    pub const NDEF_FILE: u16 = 0xE104;
    pub const PROPRIETARY_FILE_1: u16 = 0xE1A1;
    pub const PROPRIETARY_FILE_2: u16 = 0xE1A2;
    pub const PROPRIETARY_FILE_3: u16 = 0xE1A3;
    pub const PROPRIETARY_FILE_4: u16 = 0xE1A4;
    pub const FILE_ACCESS_POLICY: u16 = 0xE1AF;
    pub const FINALIZE_PERSONALIZATION: u16 = 0xBF63;
}

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::Dgi, function, reason)
}

/// A single DGI entity.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Dgi {
    pub tag: u16,
    pub value: Vec<u8>,
}

impl Dgi {
    pub fn new(tag: u16, value: Vec<u8>) -> Self {
        Self { tag, value }
    }

    /// Size of the encoded entity, in octets.
    pub fn encoded_len(&self) -> usize {
        2 + length_field_len(self.value.len()) + self.value.len()
    }
}

fn length_field_len(length: usize) -> usize {
    match length < EXTENDED_LENGTH as usize {
        true => 1,
        _ => 3,
    }
}

/// Encodes the entities into a fresh buffer, allocated once.
pub fn encode(entities: &[Dgi]) -> Result<Vec<u8>> {
    if entities.iter().any(|dgi| dgi.value.len() > VALUE_MAX) {
        return Err(error("encode", Reason::IllegalArgument));
    }

    let size = entities.iter().map(Dgi::encoded_len).sum();
    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| error("encode", Reason::OutOfMemory))?;

    for dgi in entities {
        buffer.extend_from_slice(&dgi.tag.to_be_bytes());

        let length = dgi.value.len();
        match length < EXTENDED_LENGTH as usize {
            true => buffer.push(length as u8),
            _ => {
                buffer.push(EXTENDED_LENGTH);
                buffer.extend_from_slice(&(length as u16).to_be_bytes());
            }
        }

        buffer.extend_from_slice(&dgi.value);
    }

    Ok(buffer)
}

/// Decodes every entity of the buffer.
pub fn decode(bytes: &[u8]) -> Result<Vec<Dgi>> {
    let mut entities = Vec::new();
    decode_into(bytes, &mut entities, usize::MAX)?;

    Ok(entities)
}

/// Decodes the buffer into `entities`, accepting at most `capacity` entities.
/// Returns the number of entities appended; nothing is appended on failure.
pub fn decode_into(bytes: &[u8], entities: &mut Vec<Dgi>, capacity: usize) -> Result<usize> {
    let invalid = || error("decode", Reason::DgiEncodedBytesInvalid);

    let mut reader = Reader::new(bytes);
    let mut decoded = Vec::new();

    while !reader.is_empty() {
        if decoded.len() == capacity {
            return Err(error("decode", Reason::IllegalArgument));
        }

        let tag = reader.read_u16().ok_or_else(invalid)?;
        let length = match reader.next().ok_or_else(invalid)? {
            EXTENDED_LENGTH => reader.read_u16().ok_or_else(invalid)? as usize,
            length => length as usize,
        };
        let value = reader.read(length).ok_or_else(invalid)?;

        decoded.push(Dgi::new(tag, value.to_vec()));
    }

    let count = decoded.len();
    entities.append(&mut decoded);

    Ok(count)
}
