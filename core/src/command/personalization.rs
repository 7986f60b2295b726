//! Personalization commands: DGI provisioning, finalization and backend self-tests.

use crate::apdu::{Command, CLA_DEFAULT};
use crate::command::{error, ins};
use crate::dgi::{self, Dgi};
use crate::error::Reason;
use crate::Result;

/// Bits 0 to 6 of the backend-test bitmap each select a test; bit 7 is reserved.
pub const BACKEND_TEST_ALL: u8 = 0x7F;
const BACKEND_TEST_RESERVED: u8 = 0x80;
const BACKEND_TEST_DISABLE_P1: u8 = 0xFF;
const DATA_LENGTH_MAX: usize = 0xFFFF;

/// Constructs a `PERSONALIZE DATA` command carrying the value under the DGI.
pub fn personalize_data(dgi: u16, value: &[u8]) -> Result<Command> {
    let data = dgi::encode(&[Dgi::new(dgi, value.to_vec())])?;
    if data.len() > DATA_LENGTH_MAX {
        return Err(error("personalize_data", Reason::IllegalArgument));
    }

    Ok(Command::new_with_payload(
        CLA_DEFAULT,
        ins::PERSONALIZE_DATA,
        0x00,
        0x00,
        data,
    ))
}

/// Constructs the `PERSONALIZE DATA` command closing the personalization phase.
pub fn finalize_personalization() -> Result<Command> {
    personalize_data(dgi::tag::FINALIZE_PERSONALIZATION, &[])
}

/// Constructs a `BACKEND TEST` command running the tests selected by the bitmap.
pub fn backend_test(tests: u8) -> Result<Command> {
    if tests & BACKEND_TEST_RESERVED != 0 {
        return Err(error("backend_test", Reason::IllegalArgument));
    }

    Ok(Command::new(CLA_DEFAULT, ins::BACKEND_TEST, 0x00, tests))
}

/// Constructs the `BACKEND TEST` command that disables the backend tests for good.
pub fn backend_test_disable() -> Command {
    Command::new(
        CLA_DEFAULT,
        ins::BACKEND_TEST,
        BACKEND_TEST_DISABLE_P1,
        0x00,
    )
}
