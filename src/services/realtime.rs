use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::modules::chat::channel::{ChannelError, ChannelEvent, RealtimeChannel};
use crate::modules::chat::schema::ClientEvent;
use crate::services::framing::{Decoded, Framing};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnect {
    pub attempts: u32,
    pub delay: Duration,
}

#[derive(Debug)]
enum Outbound {
    Frame(String),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ended {
    ByClient,
    ByServer,
}

struct Link {
    endpoint: String,
    framing: Framing,
    reconnect: Option<Reconnect>,
}

pub struct WebSocketChannel {
    framing: Framing,
    outbound: mpsc::UnboundedSender<Outbound>,
    events: mpsc::UnboundedReceiver<ChannelEvent>,
    task: JoinHandle<()>,
    closed: bool,
}

impl WebSocketChannel {
    pub async fn connect(
        url: &str,
        framing: Framing,
        reconnect: Option<Reconnect>,
    ) -> Result<Self, ChannelError> {
        let endpoint = framing.endpoint(url);
        info!(url = %endpoint, ?framing, "Connecting to chat server");
        let socket = open(&endpoint).await?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let link = Link {
            endpoint,
            framing,
            reconnect,
        };
        let task = tokio::spawn(drive(link, socket, outbound_rx, event_tx));

        Ok(Self {
            framing,
            outbound: outbound_tx,
            events: event_rx,
            task,
            closed: false,
        })
    }
}

async fn open(endpoint: &str) -> Result<Socket, ChannelError> {
    let (socket, _response) = tokio_tungstenite::connect_async(endpoint)
        .await
        .map_err(|e| ChannelError::Transport(e.to_string()))?;
    Ok(socket)
}

async fn drive(
    link: Link,
    mut socket: Socket,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
    loop {
        let ended = pump(socket, link.framing, &mut outbound, &events).await;
        let _ = events.send(ChannelEvent::Disconnected);

        if ended == Ended::ByClient {
            return;
        }

        let Some(policy) = link.reconnect else {
            return;
        };

        match retry(&link.endpoint, policy, &mut outbound).await {
            Some(next) => socket = next,
            None => return,
        }
    }
}

async fn dial_after(endpoint: &str, delay: Duration) -> Result<Socket, ChannelError> {
    tokio::time::sleep(delay).await;
    open(endpoint).await
}

// Stops redialing as soon as the client closes the channel.
async fn retry(
    endpoint: &str,
    policy: Reconnect,
    outbound: &mut mpsc::UnboundedReceiver<Outbound>,
) -> Option<Socket> {
    for attempt in 1..=policy.attempts {
        let dial = dial_after(endpoint, policy.delay);
        tokio::pin!(dial);

        loop {
            tokio::select! {
                opened = &mut dial => match opened {
                    Ok(socket) => {
                        info!(attempt, "Reconnected to chat server");
                        return Some(socket);
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "Reconnect failed");
                        break;
                    }
                },
                command = outbound.recv() => match command {
                    Some(Outbound::Frame(_)) => warn!("Dropping frame sent while reconnecting"),
                    Some(Outbound::Close) | None => {
                        info!(attempt, "Channel closed while reconnecting");
                        return None;
                    }
                },
            }
        }
    }
    None
}

/// Runs one socket until either side closes it.
async fn pump(
    socket: Socket,
    framing: Framing,
    outbound: &mut mpsc::UnboundedReceiver<Outbound>,
    events: &mpsc::UnboundedSender<ChannelEvent>,
) -> Ended {
    let (mut sink, mut stream) = socket.split();

    if framing.ready_on_open() && events.send(ChannelEvent::Connected).is_err() {
        return Ended::ByClient;
    }

    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Frame(text)) => {
                    if let Err(e) = sink.send(WsMessage::Text(text.into())).await {
                        warn!(error = %e, "Failed to send frame");
                        return Ended::ByServer;
                    }
                }
                Some(Outbound::Close) | None => {
                    if let Some(frame) = framing.close_frame() {
                        let _ = sink.send(WsMessage::Text(frame.to_string().into())).await;
                    }
                    let _ = sink.send(WsMessage::Close(None)).await;
                    return Ended::ByClient;
                }
            },
            message = stream.next() => match message {
                Some(Ok(WsMessage::Text(text))) => match framing.decode(&text) {
                    Decoded::Event(event) => {
                        if events.send(ChannelEvent::Server(event)).is_err() {
                            return Ended::ByClient;
                        }
                    }
                    Decoded::Reply(reply) => {
                        if let Err(e) = sink.send(WsMessage::Text(reply.into())).await {
                            warn!(error = %e, "Failed to answer server frame");
                            return Ended::ByServer;
                        }
                    }
                    Decoded::Connected => {
                        debug!("Namespace connected");
                        if events.send(ChannelEvent::Connected).is_err() {
                            return Ended::ByClient;
                        }
                    }
                    Decoded::Rejected(reason) => {
                        warn!(reason = %reason, "Chat server rejected the connection");
                        return Ended::ByServer;
                    }
                    Decoded::Closed => return Ended::ByServer,
                    Decoded::Ignored => debug!("Ignoring unrecognized frame"),
                },
                Some(Ok(WsMessage::Close(_))) | None => return Ended::ByServer,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket read failed");
                    return Ended::ByServer;
                }
            },
        }
    }
}

#[async_trait]
impl RealtimeChannel for WebSocketChannel {
    async fn emit(&mut self, event: &ClientEvent) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        let frame = self.framing.encode(event)?;
        self.outbound
            .send(Outbound::Frame(frame))
            .map_err(|_| ChannelError::Closed)
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.outbound.send(Outbound::Close);

        if tokio::time::timeout(CLOSE_GRACE, &mut self.task).await.is_err() {
            debug!("Chat transport still running after close, aborting");
        }
        self.task.abort();
    }
}

impl Drop for WebSocketChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}
