use crate::apdu::{Command, Response};
use crate::error::{Error, Module, Reason};
use crate::logging::debug;
use crate::protocol::Transport;
use crate::Result;

fn error(function: &'static str, reason: Reason) -> Error {
    Error::new(Module::Protocol, function, reason)
}

/// An adapter to communicate with the applet through the transport
pub struct Card<T>
where
    T: Transport,
{
    delegate: Box<T>,
}

impl<T> Card<T>
where
    T: Transport,
{
    /// Initiates an adapter with the delegate.
    pub fn new(delegate: Box<T>) -> Self {
        Self { delegate }
    }

    /// Borrows the transport.
    pub fn delegate(&self) -> &T {
        &self.delegate
    }

    /// Activates the link to the applet, returning the activation bytes.
    pub fn activate(&self) -> Result<Vec<u8>> {
        let activation = self
            .delegate
            .activate()
            .map_err(|e| error("activate", Reason::Protocol(e)))?;

        debug!("Activated: {}", hex::encode(&activation));

        Ok(activation)
    }

    /// Transmits the command, then parses the response from the applet.
    pub fn transceive(&self, command: &Command) -> Result<Response> {
        self.transceive_raw(&command.to_bytes()?)
    }

    /// Transmits a frame that is not an APDU, then parses the response from the applet.
    pub fn transceive_raw(&self, frame: &[u8]) -> Result<Response> {
        debug!("TX: {}", hex::encode(frame));

        let rx = self
            .delegate
            .transceive(frame)
            .map_err(|e| error("transceive", Reason::Protocol(e)))?;

        debug!("RX: {}", hex::encode(&rx));

        Response::try_from(rx)
    }
}
