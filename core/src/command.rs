//! Builders that fold typed arguments into the APDUs of the NBT applet.
//!
//! Builders are pure functions: they validate their arguments, allocate exactly the data field
//! they need and return the command. They never talk to the transport.

pub mod configuration;
pub mod operational;
pub mod personalization;

pub use configuration::{get_configuration, set_configuration};
pub use operational::{
    authenticate_tag, change_password, create_password, delete_password, get_data,
    pass_through_fetch_data, pass_through_put_response, read_binary, select_application,
    select_file, select_file_with_password, unblock_password, update_binary, CreatePassword,
    DataReference, NBT_AID,
};
pub use personalization::{
    backend_test, backend_test_disable, finalize_personalization, personalize_data,
};

use crate::error::{Error, Module, Reason};
use crate::Result;

/// Instruction bytes of the applet.
pub mod ins {
    pub const SELECT: u8 = 0xA4;
    pub const READ_BINARY: u8 = 0xB0;
    pub const UPDATE_BINARY: u8 = 0xD6;
    pub const CREATE_PASSWORD: u8 = 0xE1;
    pub const CHANGE_OR_UNBLOCK_PASSWORD: u8 = 0x24;
    pub const DELETE_PASSWORD: u8 = 0xE4;
    pub const GET_DATA: u8 = 0x30;
    pub const AUTHENTICATE_TAG: u8 = 0x88;
    pub const PASS_THROUGH_FETCH_DATA: u8 = 0xCA;
    pub const GET_CONFIGURATION: u8 = 0x30;
    pub const SET_CONFIGURATION: u8 = 0x20;
    pub const PERSONALIZE_DATA: u8 = 0xE2;
    pub const BACKEND_TEST: u8 = 0xBE;
}

/// Smallest valid password identifier.
pub const PASSWORD_ID_MIN: u8 = 0x01;

/// Largest valid password identifier; identifiers are 5 bits wide.
pub const PASSWORD_ID_MAX: u8 = 0x1F;

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::Command, function, reason)
}

fn check_password_id(function: &'static str, id: u8) -> Result<u8> {
    match (PASSWORD_ID_MIN..=PASSWORD_ID_MAX).contains(&id) {
        true => Ok(id),
        _ => Err(error(function, Reason::IllegalArgument)),
    }
}
