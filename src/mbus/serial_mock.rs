//! Mock transport for testing
//!
//! Answers are queued per call and every command is recorded, so protocol
//! code can be exercised without a serial adapter.

use crate::error::MBusError;
use crate::mbus::frame::pack_long_frame;
use crate::mbus::mbus_protocol::Transport;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Scripted [`Transport`]. Clones share the same queues.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Answers handed out in order, regardless of the command.
    responses: Arc<Mutex<VecDeque<Result<Vec<u8>, MBusError>>>>,
    /// Fixed answers keyed by the full command octets.
    by_command: Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>,
    /// Commands written so far.
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    /// Simulated line delay per exchange.
    delay: Arc<Mutex<Duration>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue octets to be returned by the next exchange.
    pub async fn queue_response(&self, data: &[u8]) {
        self.responses.lock().await.push_back(Ok(data.to_vec()));
    }

    /// Queue an error for the next exchange.
    pub async fn queue_error(&self, error: MBusError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Queue an RSP_UD long frame around `data`.
    pub async fn queue_long_frame(
        &self,
        control: u8,
        address: u8,
        ci: u8,
        data: &[u8],
    ) -> Result<(), MBusError> {
        let frame = pack_long_frame(control, address, ci, data)?;
        self.queue_response(&frame).await;
        Ok(())
    }

    /// Always answer `command` with `answer`, after the queue is empty.
    pub async fn respond_to(&self, command: &[u8], answer: &[u8]) {
        self.by_command
            .lock()
            .await
            .insert(command.to_vec(), answer.to_vec());
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = delay;
    }

    /// Commands written so far.
    pub async fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn exchange(&self, command: &[u8], _window: Duration) -> Result<Vec<u8>, MBusError> {
        self.sent.lock().await.push(command.to_vec());

        let delay = *self.delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(queued) = self.responses.lock().await.pop_front() {
            return queued;
        }
        Ok(self
            .by_command
            .lock()
            .await
            .get(command)
            .cloned()
            .unwrap_or_default())
    }
}
