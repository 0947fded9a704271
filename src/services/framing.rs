use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::modules::chat::channel::ChannelError;
use crate::modules::chat::schema::{ClientEvent, ServerEvent};

const SOCKET_IO_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    #[default]
    SocketIo,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Event(ServerEvent),
    Reply(String),
    Connected,
    Rejected(String),
    Closed,
    Ignored,
}

impl Framing {
    pub fn endpoint(self, url: &str) -> String {
        let url = if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else {
            url.to_string()
        };

        match self {
            Framing::Json => url,
            Framing::SocketIo if url.contains("/socket.io/") => url,
            Framing::SocketIo => format!("{}{}", url.trim_end_matches('/'), SOCKET_IO_PATH),
        }
    }

    pub fn ready_on_open(self) -> bool {
        matches!(self, Framing::Json)
    }

    pub fn encode(self, event: &ClientEvent) -> Result<String, ChannelError> {
        match self {
            Framing::Json => Ok(serde_json::to_string(event)?),
            Framing::SocketIo => {
                let value = serde_json::to_value(event)?;
                let packet = Value::Array(vec![value["event"].clone(), value["data"].clone()]);
                Ok(format!("42{}", serde_json::to_string(&packet)?))
            }
        }
    }

    pub fn close_frame(self) -> Option<&'static str> {
        match self {
            Framing::Json => None,
            Framing::SocketIo => Some("41"),
        }
    }

    pub fn decode(self, text: &str) -> Decoded {
        match self {
            Framing::Json => match serde_json::from_str::<ServerEvent>(text) {
                Ok(event) => Decoded::Event(event),
                Err(_) => Decoded::Ignored,
            },
            Framing::SocketIo => decode_socket_io(text),
        }
    }
}

fn decode_socket_io(text: &str) -> Decoded {
    let mut chars = text.chars();
    match chars.next() {
        // engine.io open: connect the default namespace
        Some('0') => Decoded::Reply("40".to_string()),
        Some('1') => Decoded::Closed,
        Some('2') => Decoded::Reply(format!("3{}", chars.as_str())),
        Some('4') => decode_packet(chars.as_str()),
        _ => Decoded::Ignored,
    }
}

fn decode_packet(packet: &str) -> Decoded {
    let Some(kind) = packet.chars().next() else {
        return Decoded::Ignored;
    };
    let body = &packet[kind.len_utf8()..];

    // Only the default namespace is joined.
    if body.starts_with('/') {
        return Decoded::Ignored;
    }

    match kind {
        '0' => Decoded::Connected,
        '1' => Decoded::Closed,
        '2' => decode_event(body.trim_start_matches(|c: char| c.is_ascii_digit())),
        '4' => Decoded::Rejected(
            serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| body.to_string()),
        ),
        _ => Decoded::Ignored,
    }
}

fn decode_event(body: &str) -> Decoded {
    let Ok(Value::Array(mut items)) = serde_json::from_str::<Value>(body) else {
        return Decoded::Ignored;
    };
    if items.is_empty() {
        return Decoded::Ignored;
    }

    let name = items.remove(0);
    let data = items.into_iter().next().unwrap_or(Value::Null);

    match serde_json::from_value::<ServerEvent>(json!({ "event": name, "data": data })) {
        Ok(event) => Decoded::Event(event),
        Err(_) => Decoded::Ignored,
    }
}
