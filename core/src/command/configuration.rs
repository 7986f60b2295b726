//! Configuration commands, sent with the proprietary class byte.

use crate::apdu::{Command, CLA_PROPRIETARY};
use crate::command::{error, ins};
use crate::error::Reason;
use crate::Result;

const VALUE_LENGTH_MAX: usize = 0xFF;

/// Constructs a `GET CONFIGURATION` command for the tag.
pub fn get_configuration(tag: u16) -> Command {
    Command::new_with_payload(
        CLA_PROPRIETARY,
        ins::GET_CONFIGURATION,
        0x00,
        0x00,
        tag.to_be_bytes().to_vec(),
    )
}

/// Constructs a `SET CONFIGURATION` command writing `tag || length || value`.
pub fn set_configuration(tag: u16, value: &[u8]) -> Result<Command> {
    if value.len() > VALUE_LENGTH_MAX {
        return Err(error("set_configuration", Reason::IllegalArgument));
    }

    let mut data = Vec::with_capacity(3 + value.len());
    data.extend_from_slice(&tag.to_be_bytes());
    data.push(value.len() as u8);
    data.extend_from_slice(value);

    Ok(Command::new_with_payload(
        CLA_PROPRIETARY,
        ins::SET_CONFIGURATION,
        0x00,
        0x00,
        data,
    ))
}
