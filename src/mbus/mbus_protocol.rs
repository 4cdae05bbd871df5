//! # M-Bus Protocol Implementation
//!
//! The two master requests used to talk to a slave, built as short frames
//! (`10 C A CS 16`):
//!
//! - SND_NKE (`C = 0x40`): link reset, answered by a single `E5`
//! - REQ_UD2 (`C = 0x5B`): request class 2 data, answered by an RSP_UD
//!
//! [`MBusProtocol`] runs them over any [`Transport`], which only has to
//! deliver the octets that came back within a time window.

use crate::constants::{MBUS_CONTROL_MASK_REQ_UD2, MBUS_CONTROL_MASK_SND_NKE, MBUS_FRAME_ACK};
use crate::error::MBusError;
use crate::mbus::frame::pack_short_frame;
use crate::mbus::serial::SerialConfig;
use crate::payload::telegram::{parse_telegram, ParsedTelegram};
use async_trait::async_trait;
use log::debug;
use std::time::Duration;

/// A byte channel to the bus. One call is one command and its answer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `command` and returns what arrived within `window`.
    /// An empty answer is not an error.
    async fn exchange(&self, command: &[u8], window: Duration) -> Result<Vec<u8>, MBusError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn exchange(&self, command: &[u8], window: Duration) -> Result<Vec<u8>, MBusError> {
        (**self).exchange(command, window).await
    }
}

/// Any short-frame command: start, control, address, checksum, stop.
pub fn short_command(control: u8, address: u8) -> Vec<u8> {
    pack_short_frame(control, address)
}

/// Link reset addressed to `address`.
pub fn snd_nke(address: u8) -> Vec<u8> {
    short_command(MBUS_CONTROL_MASK_SND_NKE, address)
}

/// Class 2 data request addressed to `address`.
pub fn req_ud2(address: u8) -> Vec<u8> {
    short_command(MBUS_CONTROL_MASK_REQ_UD2, address)
}

/// Ping and read against one transport.
pub struct MBusProtocol<T: Transport> {
    transport: T,
    ping_window: Duration,
    read_window: Duration,
}

impl<T: Transport> MBusProtocol<T> {
    /// Uses the windows of the default [`SerialConfig`].
    pub fn new(transport: T) -> Self {
        let config = SerialConfig::default();
        Self::with_windows(transport, config.ping_timeout, config.read_timeout)
    }

    pub fn with_windows(transport: T, ping_window: Duration, read_window: Duration) -> Self {
        MBusProtocol {
            transport,
            ping_window,
            read_window,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True when the slave acknowledged a link reset with `E5`.
    pub async fn ping(&self, address: u8) -> Result<bool, MBusError> {
        let answer = self
            .transport
            .exchange(&snd_nke(address), self.ping_window)
            .await?;
        let alive = answer.first() == Some(&MBUS_FRAME_ACK);
        debug!("Ping {}: {}", address, if alive { "alive" } else { "no answer" });
        Ok(alive)
    }

    /// Requests class 2 data and decodes the answer.
    pub async fn read_telegram(&self, address: u8) -> Result<ParsedTelegram, MBusError> {
        let answer = self
            .transport
            .exchange(&req_ud2(address), self.read_window)
            .await?;
        if answer.is_empty() {
            return Err(MBusError::Timeout { address });
        }
        parse_telegram(&answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_octets() {
        assert_eq!(snd_nke(1), vec![0x10, 0x40, 0x01, 0x41, 0x16]);
        assert_eq!(req_ud2(1), vec![0x10, 0x5B, 0x01, 0x5C, 0x16]);
        assert_eq!(req_ud2(0xFE), vec![0x10, 0x5B, 0xFE, 0x59, 0x16]);
    }
}
