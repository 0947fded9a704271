use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::modules::chat::schema::{ClientEvent, ServerEvent};

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Channel is closed")]
    Closed,
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Connected,
    Disconnected,
    Server(ServerEvent),
}

// `emit` returning Ok only means the event reached the transport.
#[async_trait]
pub trait RealtimeChannel: Send {
    async fn emit(&mut self, event: &ClientEvent) -> Result<(), ChannelError>;

    async fn next_event(&mut self) -> Option<ChannelEvent>;

    async fn close(&mut self);
}

pub struct InMemoryChannel {
    inbound: mpsc::UnboundedReceiver<ChannelEvent>,
    emitted: Arc<Mutex<Vec<ClientEvent>>>,
    closed: bool,
}

#[derive(Clone)]
pub struct InMemoryServer {
    inbound: mpsc::UnboundedSender<ChannelEvent>,
    emitted: Arc<Mutex<Vec<ClientEvent>>>,
}

pub fn in_memory() -> (InMemoryChannel, InMemoryServer) {
    let (tx, rx) = mpsc::unbounded_channel();
    let emitted = Arc::new(Mutex::new(Vec::new()));

    (
        InMemoryChannel {
            inbound: rx,
            emitted: Arc::clone(&emitted),
            closed: false,
        },
        InMemoryServer {
            inbound: tx,
            emitted,
        },
    )
}

impl InMemoryServer {
    pub fn connect(&self) {
        let _ = self.inbound.send(ChannelEvent::Connected);
    }

    pub fn disconnect(&self) {
        let _ = self.inbound.send(ChannelEvent::Disconnected);
    }

    pub fn push(&self, event: ServerEvent) {
        let _ = self.inbound.send(ChannelEvent::Server(event));
    }

    pub fn emitted(&self) -> Vec<ClientEvent> {
        self.emitted.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn is_closed(&self) -> bool {
        self.inbound.is_closed()
    }
}

#[async_trait]
impl RealtimeChannel for InMemoryChannel {
    async fn emit(&mut self, event: &ClientEvent) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.emitted
            .lock()
            .map_err(|e| ChannelError::Transport(e.to_string()))?
            .push(event.clone());
        Ok(())
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        if self.closed {
            return None;
        }
        self.inbound.recv().await
    }

    async fn close(&mut self) {
        self.closed = true;
        self.inbound.close();
    }
}
