//! Audio system error types.
//!
//! Every audio failure degrades to silence rather than aborting the timer,
//! so these errors are only ever logged or used to select the null player.

use thiserror::Error;

/// Errors that can occur while opening or driving the audio output.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No audio output device is available.
    #[error("no audio output device available: {0}")]
    DeviceUnavailable(String),

    /// The output stream could not be created or has failed.
    #[error("audio stream failure: {0}")]
    StreamError(String),
}

impl AudioError {
    /// Returns true if the error means the host has no usable output device.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceUnavailable(_))
    }
}
