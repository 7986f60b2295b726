//! Errors reported by every layer of the crate.
//!
//! A failure carries the module and the function where it was first detected, plus the reason.
//! [`Error::status`] packs the same information into the 32-bit status word used across FFI.

use std::fmt::{Display, Formatter};

use crate::protocol::TransportError;

/// Module that detected a failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Module {
    Apdu = 0x01,
    Dgi = 0x02,
    Protocol = 0x03,
    Command = 0x04,
    CommandSet = 0x05,
    NdefRecord = 0x06,
    NdefRegistry = 0x07,
    NdefRecordType = 0x08,
    NdefMessage = 0x09,
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Apdu => "apdu",
            Self::Dgi => "dgi",
            Self::Protocol => "protocol",
            Self::Command => "command",
            Self::CommandSet => "cmdset",
            Self::NdefRecord => "ndef::record",
            Self::NdefRegistry => "ndef::registry",
            Self::NdefRecordType => "ndef::types",
            Self::NdefMessage => "ndef::message",
        })
    }
}

/// Reason of a failure.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Reason {
    #[error("illegal argument")]
    IllegalArgument,

    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid state")]
    InvalidState,

    #[error("record type does not match the accessor")]
    RecordInvalid,

    #[error("record type is already registered")]
    AlreadyRegistered,

    #[error("certificate handlers are not defined")]
    CertHandlersNotDefined,

    #[error("DGI encoded bytes are invalid")]
    DgiEncodedBytesInvalid,

    #[error("NDEF message is invalid")]
    InvalidMessage,

    #[error("APDU response is invalid")]
    InvalidResponse,

    #[error("transport failed: {0}")]
    Protocol(#[source] TransportError),
}

impl Reason {
    /// Returns the reason byte of the packed status.
    pub fn code(&self) -> u8 {
        match self {
            Self::IllegalArgument => 0x01,
            Self::OutOfMemory => 0x02,
            Self::InvalidState => 0x03,
            Self::RecordInvalid => 0x04,
            Self::AlreadyRegistered => 0x05,
            Self::CertHandlersNotDefined => 0x06,
            Self::DgiEncodedBytesInvalid => 0x07,
            Self::InvalidMessage => 0x08,
            Self::InvalidResponse => 0x09,
            Self::Protocol(_) => 0x0A,
        }
    }
}

/// A failure, located by module and function.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{module}::{function}: {reason}")]
pub struct Error {
    pub module: Module,
    pub function: &'static str,
    #[source]
    pub reason: Reason,
}

impl Error {
    const STATUS_ERROR_FLAG: u32 = 0x8000_0000;

    pub fn new(module: Module, function: &'static str, reason: Reason) -> Self {
        Self {
            module,
            function,
            reason,
        }
    }

    /// Packs the error as `1 | module(15) | function(8) | reason(8)`.
    /// Functions are identified by name on this side, so the function byte is always zero.
    pub fn status(&self) -> u32 {
        Self::STATUS_ERROR_FLAG | ((self.module as u32) << 16) | self.reason.code() as u32
    }
}

pub type Result<T> = std::result::Result<T, Error>;
