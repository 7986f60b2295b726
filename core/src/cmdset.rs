//! Command sets: one method per applet command.
//!
//! Every method builds the APDU, hands it to the [`Card`] and returns the response as received.
//! Status words are left to the caller. The first failure is logged once and returned unchanged.

pub mod configuration;
pub mod operational;
pub mod personalization;

pub use self::configuration::ConfigurationCommandSet;
pub use self::operational::OperationalCommandSet;
pub use self::personalization::PersonalizationCommandSet;

use crate::apdu::{Command, Response};
use crate::logging::warn;
use crate::protocol::Transport;
use crate::{Card, Result};

macro_rules! new {
    () => {
        /// Creates the command set over the card, shared with other command sets.
        pub fn new(card: std::rc::Rc<crate::Card<T>>) -> Self {
            Self { card }
        }

        /// Borrows the card the command set talks through.
        pub fn card(&self) -> &crate::Card<T> {
            &self.card
        }
    };
}

pub(crate) use new;

/// Transceives the built command, logging the first failure.
fn execute<T>(card: &Card<T>, operation: &'static str, command: Result<Command>) -> Result<Response>
where
    T: Transport,
{
    let command = command.map_err(|e| {
        warn!(operation, error = %e, "Failed to build the command");
        e
    })?;

    card.transceive(&command).map_err(|e| {
        warn!(operation, error = %e, "Failed to transceive the command");
        e
    })
}

/// Transceives a frame that is not an APDU, logging the first failure.
fn execute_raw<T>(card: &Card<T>, operation: &'static str, frame: Result<Vec<u8>>) -> Result<Response>
where
    T: Transport,
{
    let frame = frame.map_err(|e| {
        warn!(operation, error = %e, "Failed to build the frame");
        e
    })?;

    card.transceive_raw(&frame).map_err(|e| {
        warn!(operation, error = %e, "Failed to transceive the frame");
        e
    })
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use crate::protocol::{Transport, TransportError};

    /// Transport answering with canned responses and recording every frame it was given.
    /// Answers `90 00` once the canned responses run out.
    pub struct RecordingTransport {
        sent: RefCell<Vec<Vec<u8>>>,
        responses: RefCell<VecDeque<Result<Vec<u8>, TransportError>>>,
    }

    impl RecordingTransport {
        pub fn new(responses: Vec<Result<Vec<u8>, TransportError>>) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                responses: RefCell::new(responses.into()),
            }
        }

        pub fn sent(&self) -> Vec<Vec<u8>> {
            self.sent.borrow().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn transceive(&self, frame: &[u8]) -> Result<Vec<u8>, TransportError> {
            self.sent.borrow_mut().push(frame.to_vec());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![0x90, 0x00]))
        }
    }
}
