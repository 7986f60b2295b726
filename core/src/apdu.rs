//! ISO/IEC 7816-4 APDU framing: command serialisation, response parsing and the status-word
//! diagnostic table.

mod command;
mod response;
pub mod status;

pub use command::{Command, Le};
pub use response::Response;

use crate::error::{Error, Module, Reason};

/// Inter-industry class byte.
pub const CLA_DEFAULT: u8 = 0x00;

/// Proprietary class byte, used by the configuration commands.
pub const CLA_PROPRIETARY: u8 = 0x20;

/// Status word reported on success.
pub const SW_SUCCESS: u16 = 0x9000;

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::Apdu, function, reason)
}
