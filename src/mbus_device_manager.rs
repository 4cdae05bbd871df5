//! # M-Bus Device Manager
//!
//! This module provides the MBusDeviceManager struct, the entry point for
//! talking to the slaves behind one serial port: ping an address, read its
//! telegram, or scan an address range.
//!
//! Results are reported as [`PingState`] / [`DeviceState`] envelopes that
//! carry the port, the address, a UTC timestamp and the error text (empty on
//! success), ready to be serialised.

use crate::error::MBusError;
use crate::mbus::mbus_protocol::{MBusProtocol, Transport};
use crate::payload::telegram::ParsedTelegram;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;

/// Outcome of a ping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingState {
    pub port: String,
    pub address: u8,
    pub state: bool,
    pub timestamp: DateTime<Utc>,
    pub error: String,
}

/// Outcome of a data read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    pub port: String,
    pub address: u8,
    pub data: Option<ParsedTelegram>,
    pub timestamp: DateTime<Utc>,
    pub error: String,
}

/// Scanner settings.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub start: u8,
    pub end: u8,
    /// Addresses probed at the same time.
    pub concurrency: usize,
    /// Ceiling for one ping or one read.
    pub attempt_timeout: Duration,
    /// Read every device that answered the ping.
    pub read: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            start: crate::constants::MBUS_ADDRESS_SLAVE_MIN,
            end: crate::constants::MBUS_ADDRESS_SLAVE_MAX,
            concurrency: 4,
            attempt_timeout: Duration::from_secs(5),
            read: false,
        }
    }
}

/// Everything a scan found, in address order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub pings: Vec<PingState>,
    pub devices: Vec<DeviceState>,
}

impl ScanReport {
    /// Addresses that acknowledged the ping.
    pub fn alive(&self) -> Vec<u8> {
        self.pings
            .iter()
            .filter(|p| p.state)
            .map(|p| p.address)
            .collect()
    }
}

/// Represents a manager for the slaves behind one port.
pub struct MBusDeviceManager<T: Transport + 'static> {
    port: String,
    protocol: Arc<MBusProtocol<T>>,
}

impl<T: Transport + 'static> MBusDeviceManager<T> {
    /// Creates a manager with the default ping and read windows.
    pub fn new(port: &str, transport: T) -> Self {
        Self::with_protocol(port, MBusProtocol::new(transport))
    }

    pub fn with_protocol(port: &str, protocol: MBusProtocol<T>) -> Self {
        MBusDeviceManager {
            port: port.to_string(),
            protocol: Arc::new(protocol),
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub async fn ping(&self, address: u8) -> PingState {
        ping_state(&self.port, address, self.protocol.ping(address).await)
    }

    pub async fn read(&self, address: u8) -> DeviceState {
        device_state(&self.port, address, self.protocol.read_telegram(address).await)
    }

    /// Pings `config.start..=config.end` with at most `config.concurrency`
    /// attempts in flight. Each attempt has its own timeout, so a silent
    /// address never holds up the others.
    pub async fn scan(&self, config: &ScanConfig) -> Result<ScanReport, MBusError> {
        if config.start > config.end {
            return Err(MBusError::Other(format!(
                "empty address range {}..={}",
                config.start, config.end
            )));
        }
        if config.concurrency == 0 {
            return Err(MBusError::Other("scan concurrency must be at least 1".into()));
        }

        info!(
            "Scanning {} addresses {}..={} ({} at a time)",
            self.port, config.start, config.end, config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(config.concurrency));
        let mut tasks = Vec::new();

        for address in config.start..=config.end {
            let semaphore = Arc::clone(&semaphore);
            let protocol = Arc::clone(&self.protocol);
            let port = self.port.clone();
            let attempt = config.attempt_timeout;
            let read = config.read;

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| MBusError::Other("scan semaphore closed".into()))?;

                let ping = match timeout(attempt, protocol.ping(address)).await {
                    Ok(result) => ping_state(&port, address, result),
                    Err(_) => ping_state(&port, address, Err(MBusError::Timeout { address })),
                };

                let device = if read && ping.state {
                    Some(match timeout(attempt, protocol.read_telegram(address)).await {
                        Ok(result) => device_state(&port, address, result),
                        Err(_) => device_state(&port, address, Err(MBusError::Timeout { address })),
                    })
                } else {
                    None
                };

                Ok::<_, MBusError>((ping, device))
            }));
        }

        let mut report = ScanReport::default();
        for task in tasks {
            let (ping, device) = task
                .await
                .map_err(|e| MBusError::Other(format!("scan task failed: {}", e)))??;
            if ping.state {
                info!("Found device at address {}", ping.address);
            }
            report.pings.push(ping);
            report.devices.extend(device);
        }

        Ok(report)
    }
}

fn ping_state(port: &str, address: u8, result: Result<bool, MBusError>) -> PingState {
    let (state, error) = match result {
        Ok(alive) => (alive, String::new()),
        Err(e) => {
            debug!("Ping {} failed: {}", address, e);
            (false, e.to_string())
        }
    };
    PingState {
        port: port.to_string(),
        address,
        state,
        timestamp: Utc::now(),
        error,
    }
}

fn device_state(
    port: &str,
    address: u8,
    result: Result<ParsedTelegram, MBusError>,
) -> DeviceState {
    let (data, error) = match result {
        Ok(telegram) => (Some(telegram), String::new()),
        Err(e) => {
            warn!("Read of address {} failed: {}", address, e);
            (None, e.to_string())
        }
    };
    DeviceState {
        port: port.to_string(),
        address,
        data,
        timestamp: Utc::now(),
        error,
    }
}
