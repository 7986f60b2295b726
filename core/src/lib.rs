//! A crate to talk to an NFC Bridge Tag (NBT) applet through an APDU transport.
//!
//! The crate is a synchronous translator: typed arguments are folded into APDUs, handed to a
//! [`protocol::Transport`] and the raw responses are returned to the caller. NDEF messages and
//! DGI TLVs carried in those APDUs are encoded and decoded by [`ndef`] and [`dgi`].

#[cfg(feature = "pcsc")]
pub mod pcsc;

pub mod apdu;
pub mod card;
pub mod cmdset;
pub mod command;
pub mod dgi;
pub mod error;
pub mod ndef;
pub mod protocol;

mod logging;
mod reader;

pub use card::Card;
pub use error::{Error, Module, Reason, Result};
