//! Contracts of the layer below the core: the transport carrying frames to the applet, and the
//! timer it may use to bound waits.
//!
//! The core calls [`Transport::transceive`] exactly once per command. It never frames, retries or
//! schedules by itself.

use std::thread::sleep;
use std::time::{Duration, Instant};

/// A failure reported by the transport. The core propagates it unchanged.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A delegate to exchange frames with the applet.
pub trait Transport {
    /// Activates the link and returns the activation bytes (ATR, ATS), if the link has any.
    fn activate(&self) -> Result<Vec<u8>, TransportError> {
        Ok(Vec::new())
    }

    /// Transmits the frame to the applet, then receives the response from them.
    /// Implementations must return the response including the trailing status word.
    fn transceive(&self, frame: &[u8]) -> Result<Vec<u8>, TransportError>;
}

impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    fn activate(&self) -> Result<Vec<u8>, TransportError> {
        (**self).activate()
    }

    fn transceive(&self, frame: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).transceive(frame)
    }
}

/// A joinable one-shot timer.
pub trait Timer {
    /// Arms the timer to elapse after `duration` from now.
    fn set(&mut self, duration: Duration);

    /// Whether the armed duration has passed. An unarmed timer has always elapsed.
    fn has_elapsed(&self) -> bool;

    /// Blocks until the timer elapses.
    fn join(&mut self);
}

/// [`Timer`] backed by the monotonic system clock.
#[derive(Debug, Default)]
pub struct SystemTimer {
    deadline: Option<Instant>,
}

impl SystemTimer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Time left before the timer elapses.
    pub fn remaining(&self) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or_default()
    }
}

impl Timer for SystemTimer {
    fn set(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
    }

    fn has_elapsed(&self) -> bool {
        self.remaining().is_zero()
    }

    fn join(&mut self) {
        sleep(self.remaining());
    }
}
