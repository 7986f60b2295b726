//! PC/SC transport.
//! Can be enabled by turning `pcsc` feature on.
//!
//! PC/SC (Personal Computer/Smart Card) lets applications reach any reader that supports it
//! without depending on the driver. Windows and macOS ship it, Linux needs pcsc-lite.
//! Refer the documentation of pcsc-rust for details:
//! <https://github.com/bluetech/pcsc-rust>
//!
//! ## Usage
//! ```rust,no_run
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use nbt::Card;
//! use nbt::cmdset::OperationalCommandSet;
//! use nbt::pcsc::Context;
//!
//! let ctx = Context::try_new().unwrap();
//! let device = ctx.open().unwrap();
//! let pcsc_card = device.connect(&ctx, Some(Duration::from_secs(10))).unwrap();
//!
//! let card = Rc::new(Card::new(Box::new(pcsc_card)));
//! let operational = OperationalCommandSet::new(Rc::clone(&card));
//! operational.select_application().unwrap();
//! ```

use std::ffi::{CStr, CString};
use std::time::Duration;

use pcsc::{Attribute, Card, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};

use crate::logging::{debug, info};
use crate::protocol::{SystemTimer, Timer, Transport, TransportError};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error occurred while communicating with PC/SC: {0}")]
    PcscError(#[from] pcsc::Error),

    #[error("Reader not found on PC/SC service")]
    ReaderNotFound,

    #[error("No card was presented in time")]
    Timeout,
}

impl From<Error> for TransportError {
    fn from(e: Error) -> Self {
        TransportError::new(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// PC/SC context.
pub struct Context {
    ctx: pcsc::Context,
}

impl Context {
    /// Creates a PC/SC context in user scope.
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            ctx: pcsc::Context::establish(Scope::User)?,
        })
    }

    /// Finds the first reader known to the PC/SC service.
    pub fn open(&self) -> Result<Device> {
        let mut buf = [0u8; 2048];

        Ok(Device::new(
            self.ctx
                .list_readers(&mut buf)?
                .next()
                .ok_or(Error::ReaderNotFound)?,
        ))
    }
}

/// PC/SC reader handle.
pub struct Device {
    reader: CString,
}

impl Device {
    fn new(reader: &CStr) -> Self {
        debug!("Using device: {}", reader.to_str().unwrap_or_default());

        Self {
            reader: reader.to_owned(),
        }
    }

    /// Connects to the tag presented to the reader, polling every second until the timeout
    /// elapses. Waits forever without a timeout.
    pub fn connect(&self, ctx: &Context, timeout: Option<Duration>) -> Result<PcscCard> {
        let timer = timeout.map(|timeout| {
            let mut timer = SystemTimer::new();
            timer.set(timeout);
            timer
        });

        debug!("Waiting for a card");

        loop {
            match ctx
                .ctx
                .connect(&self.reader, ShareMode::Shared, Protocols::ANY)
            {
                Ok(card) => {
                    debug!("Connected to your card");

                    return Ok(PcscCard::new(card));
                }
                Err(pcsc::Error::NoSmartcard) => match &timer {
                    Some(timer) if timer.has_elapsed() => return Err(Error::Timeout),
                    Some(timer) => {
                        info!("Still waiting for your card...");
                        std::thread::sleep(POLL_INTERVAL.min(timer.remaining()));
                    }
                    None => {
                        info!("Still waiting for your card...");
                        std::thread::sleep(POLL_INTERVAL);
                    }
                },
                Err(e) => return Err(Error::PcscError(e)),
            }
        }
    }
}

/// A tag reached through PC/SC.
pub struct PcscCard {
    card: Card,
}

impl PcscCard {
    fn new(card: Card) -> Self {
        Self { card }
    }

    /// Transmits a frame to the card, then receives a response from them.
    pub fn transmit(&self, tx: &[u8]) -> Result<Vec<u8>> {
        let mut rx = [0u8; MAX_BUFFER_SIZE];
        let rx = self.card.transmit(tx, &mut rx)?;

        Ok(Vec::from(rx))
    }
}

impl Transport for PcscCard {
    /// Returns the ATR of the card.
    fn activate(&self) -> std::result::Result<Vec<u8>, TransportError> {
        Ok(self
            .card
            .get_attribute_owned(Attribute::AtrString)
            .map_err(Error::PcscError)?)
    }

    fn transceive(&self, frame: &[u8]) -> std::result::Result<Vec<u8>, TransportError> {
        Ok(self.transmit(frame)?)
    }
}
