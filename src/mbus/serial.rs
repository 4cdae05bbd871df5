//! # M-Bus Serial Communication
//!
//! Opening the port (2400 baud 8E1 by default), retrying while another
//! process holds it, and a single command/response exchange.
//!
//! The port is never kept open between exchanges: [`SerialTransport`] opens
//! it, writes the command, collects the answer and drops the stream on every
//! exit path. A cancelled exchange drops the stream as well.

use crate::error::MBusError;
use crate::logging::log_frame_hex;
use crate::mbus::frame::expected_frame_len;
use crate::mbus::mbus_protocol::Transport;
use async_trait::async_trait;
use bytes::BytesMut;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{sleep, timeout, Instant};
use tokio_serial::SerialPortBuilderExt;

/// Configuration for serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    /// Window for a data read (REQ_UD2).
    pub read_timeout: Duration,
    /// Window for the single acknowledgement octet of a ping.
    pub ping_timeout: Duration,
    /// Silence after the first octet that ends a read early.
    pub inter_byte_timeout: Duration,
    pub busy_retry_interval: Duration,
    /// Give up on a busy port after this long.
    pub busy_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: crate::constants::MBUS_DEFAULT_BAUDRATE,
            read_timeout: Duration::from_secs(2),
            ping_timeout: Duration::from_millis(150),
            inter_byte_timeout: Duration::from_millis(300),
            busy_retry_interval: Duration::from_secs(1),
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Messages the OS serial layer uses for a port held by someone else.
const BUSY_MARKERS: [&str; 4] = [
    "port already open",
    "Access is denied",
    "Device or resource busy",
    "Resource busy",
];

fn classify_open_error(message: String) -> MBusError {
    if BUSY_MARKERS.iter().any(|m| message.contains(m)) {
        MBusError::PortBusy(message)
    } else {
        MBusError::SerialPortError(message)
    }
}

/// Opens the port once, 8 data bits, even parity, 1 stop bit.
pub fn open_port(
    port_name: &str,
    config: &SerialConfig,
) -> Result<tokio_serial::SerialStream, MBusError> {
    tokio_serial::new(port_name, config.baudrate)
        .data_bits(tokio_serial::DataBits::Eight)
        .stop_bits(tokio_serial::StopBits::One)
        .parity(tokio_serial::Parity::Even)
        .timeout(config.read_timeout)
        .open_native_async()
        .map_err(|e| classify_open_error(e.to_string()))
}

/// Opens the port, waiting `busy_retry_interval` between attempts while it
/// is busy. Other failures, and a port still busy after `busy_timeout`, are
/// returned as they are.
pub async fn open_port_with_retry(
    port_name: &str,
    config: &SerialConfig,
) -> Result<tokio_serial::SerialStream, MBusError> {
    let started = Instant::now();
    loop {
        match open_port(port_name, config) {
            Err(e) if e.is_port_busy() && started.elapsed() < config.busy_timeout => {
                warn!(
                    "Port {} busy ({}), retrying in {:?}",
                    port_name, e, config.busy_retry_interval
                );
                sleep(config.busy_retry_interval).await;
            }
            other => return other,
        }
    }
}

/// Writes `command` and collects the answer.
///
/// Reading ends when a complete frame has arrived, when the line stays quiet
/// for `inter_byte` after the first octet, or when `window` runs out. An
/// empty vector means nobody answered.
pub async fn exchange<P>(
    port: &mut P,
    command: &[u8],
    window: Duration,
    inter_byte: Duration,
) -> Result<Vec<u8>, MBusError>
where
    P: AsyncRead + AsyncWrite + Unpin + Send,
{
    log_frame_hex("TX", command);
    port.write_all(command)
        .await
        .map_err(|e| MBusError::SerialPortError(e.to_string()))?;
    port.flush()
        .await
        .map_err(|e| MBusError::SerialPortError(e.to_string()))?;

    let deadline = Instant::now() + window;
    let mut buf = BytesMut::with_capacity(256);
    let mut chunk = [0u8; 256];

    loop {
        if let Ok(Some(total)) = expected_frame_len(&buf) {
            if buf.len() >= total {
                break;
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let wait = if buf.is_empty() {
            remaining
        } else {
            remaining.min(inter_byte)
        };

        match timeout(wait, port.read(&mut chunk)).await {
            Err(_) => break,
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => buf.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => return Err(MBusError::SerialPortError(e.to_string())),
        }
    }

    log_frame_hex("RX", &buf);
    Ok(buf.to_vec())
}

/// A [`Transport`] over a named serial port, opened per exchange.
#[derive(Debug, Clone)]
pub struct SerialTransport {
    port_name: String,
    config: SerialConfig,
}

impl SerialTransport {
    pub fn new(port_name: &str) -> Self {
        Self::with_config(port_name, SerialConfig::default())
    }

    pub fn with_config(port_name: &str, config: SerialConfig) -> Self {
        SerialTransport {
            port_name: port_name.to_string(),
            config,
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn exchange(&self, command: &[u8], window: Duration) -> Result<Vec<u8>, MBusError> {
        let mut port = open_port_with_retry(&self.port_name, &self.config).await?;
        debug!("Opened {} at {} baud", self.port_name, self.config.baudrate);

        let result = exchange(&mut port, command, window, self.config.inter_byte_timeout).await;

        drop(port);
        info!("Closed {}", self.port_name);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_messages_are_classified() {
        assert!(classify_open_error("serial: port already open".into()).is_port_busy());
        assert!(classify_open_error("Access is denied.".into()).is_port_busy());
        assert!(!classify_open_error("No such file or directory".into()).is_port_busy());
    }

    #[tokio::test]
    async fn test_exchange_stops_at_frame_end() {
        let (mut client, mut device) = tokio::io::duplex(64);
        device.write_all(&[0xE5, 0xAA]).await.unwrap();

        let answer = exchange(
            &mut client,
            &[0x10, 0x40, 0x01, 0x41, 0x16],
            Duration::from_millis(500),
            Duration::from_millis(50),
        )
        .await
        .unwrap();
        assert_eq!(answer[0], 0xE5);

        let mut sent = [0u8; 5];
        device.read_exact(&mut sent).await.unwrap();
        assert_eq!(sent, [0x10, 0x40, 0x01, 0x41, 0x16]);
    }

    #[tokio::test]
    async fn test_exchange_silence_yields_empty_answer() {
        let (mut client, _device) = tokio::io::duplex(64);
        let answer = exchange(
            &mut client,
            &[0x10, 0x40, 0x05, 0x45, 0x16],
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .await
        .unwrap();
        assert!(answer.is_empty());
    }
}
