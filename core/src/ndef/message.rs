//! NDEF messages: a sequence of records, the first flagged MB and the last flagged ME.

use crate::error::{Error, Module, Reason};
use crate::ndef::record::{Record, FLAG_ME, FLAG_MB};
use crate::ndef::types::handover_select::MessageCodec;
use crate::Result;

/// Encoding of a message with no records: a single empty record flagged MB, ME and SR.
pub const EMPTY_MESSAGE: [u8; 3] = [0xD0, 0x00, 0x00];

/// Message codec handed to records that nest messages in their payload.
pub const CODEC: MessageCodec = MessageCodec { encode, decode };

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::NdefMessage, function, reason)
}

/// Encodes the records into a message.
pub fn encode(records: &[Record]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Ok(EMPTY_MESSAGE.to_vec());
    }

    let mut bytes = vec![];
    let last = records.len() - 1;
    for (i, record) in records.iter().enumerate() {
        let mut frame = record.encode()?;
        if i == 0 {
            frame[0] |= FLAG_MB;
        }
        if i == last {
            frame[0] |= FLAG_ME;
        }

        bytes
            .try_reserve(frame.len())
            .map_err(|_| error("encode", Reason::OutOfMemory))?;
        bytes.extend_from_slice(&frame);
    }

    Ok(bytes)
}

/// Decodes a message into its records.
///
/// MB must be set on the first record only, and ME on the last record only. No octets may
/// follow the record flagged ME.
pub fn decode(bytes: &[u8]) -> Result<Vec<Record>> {
    let invalid = || error("decode", Reason::InvalidMessage);

    if bytes == EMPTY_MESSAGE {
        return Ok(vec![]);
    }

    let mut records = vec![];
    let mut offset = 0;
    loop {
        let header = *bytes.get(offset).ok_or_else(invalid)?;
        let first = offset == 0;
        if (header & FLAG_MB != 0) != first {
            return Err(invalid());
        }

        let (record, consumed) = Record::decode(&bytes[offset..])?;
        records.push(record);
        offset += consumed;

        if header & FLAG_ME != 0 {
            break;
        }
    }

    match offset == bytes.len() {
        true => Ok(records),
        _ => Err(invalid()),
    }
}
