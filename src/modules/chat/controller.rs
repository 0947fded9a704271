use tracing::warn;
use validator::Validate;

use crate::modules::chat::model::{ChatMessage, ChatState, OfflinePolicy, Role, SessionState};
use crate::modules::chat::schema::{
    ClientEvent, JoinRoom, RequestExplanation, SendMessage, ServerEvent,
};

pub const USERNAME_REQUIRED: &str = "Please enter a username";
pub const NOT_CONNECTED: &str = "Not connected to the chat server";
pub const JOIN_FIRST: &str = "Join a room before sending messages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Connected,
    Disconnected,
    UsernameChanged(String),
    RoomChanged(String),
    RoleSelected(Role),
    TopicChanged(String),
    LanguagesSelected { user_lang: String, target_lang: String },
    JoinRequested,
    SendRequested { message: String, timestamp: String },
    ExplanationRequested { context: String },
    Received(ServerEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEffect {
    Emit(ClientEvent),
    Alert(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTransition {
    pub state: ChatState,
    pub effects: Vec<ChatEffect>,
}

impl ChatTransition {
    fn to(state: ChatState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: ChatEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub fn reduce(state: &ChatState, event: ChatEvent, policy: OfflinePolicy) -> ChatTransition {
    match event {
        ChatEvent::Connected => {
            // Rooms belong to a connection: a new socket must join again.
            let rejoin = state.session.joined.then(|| {
                ClientEvent::JoinRoom(JoinRoom {
                    room: state.session.room.clone(),
                    username: state.session.username.clone(),
                })
            });
            let effects = rejoin
                .into_iter()
                .chain(state.outbox.iter().cloned())
                .map(ChatEffect::Emit)
                .collect();
            ChatTransition {
                state: ChatState {
                    session: SessionState {
                        connected: true,
                        ..state.session.clone()
                    },
                    outbox: Vec::new(),
                    ..state.clone()
                },
                effects,
            }
        }
        ChatEvent::Disconnected => ChatTransition::to(ChatState {
            session: SessionState {
                connected: false,
                ..state.session.clone()
            },
            ..state.clone()
        }),
        ChatEvent::UsernameChanged(username) => edit_identity(state, |s| s.username = username),
        ChatEvent::RoomChanged(room) => edit_identity(state, |s| s.room = room),
        ChatEvent::RoleSelected(role) => edit_identity(state, |s| s.role = role),
        ChatEvent::TopicChanged(topic) => edit_identity(state, |s| s.topic = topic),
        ChatEvent::LanguagesSelected {
            user_lang,
            target_lang,
        } => ChatTransition::to(ChatState {
            user_lang,
            target_lang,
            ..state.clone()
        }),
        ChatEvent::JoinRequested => join(state),
        ChatEvent::SendRequested { message, timestamp } => {
            if message.trim().is_empty() {
                return ChatTransition::to(state.clone());
            }
            let event = ClientEvent::SendMessage(SendMessage {
                room: state.session.room.clone(),
                message,
                username: state.session.username.clone(),
                user_lang: state.user_lang.clone(),
                target_lang: state.target_lang.clone(),
                skill_topic: state.session.topic.clone(),
                user_role: state.session.role.as_str().to_string(),
                timestamp,
            });
            emit_when_joined(state, event, policy)
        }
        ChatEvent::ExplanationRequested { context } => {
            if context.trim().is_empty() {
                return ChatTransition::to(state.clone());
            }
            let event = ClientEvent::RequestExplanation(RequestExplanation {
                room: state.session.room.clone(),
                topic: state.session.topic.clone(),
                context,
            });
            emit_when_joined(state, event, policy)
        }
        ChatEvent::Received(event) => {
            let mut next = state.clone();
            next.messages.push(to_message(event));
            ChatTransition::to(next)
        }
    }
}

/// Identity fields (username, room, role, topic) are fixed once joined.
fn edit_identity<F>(state: &ChatState, edit: F) -> ChatTransition
where
    F: FnOnce(&mut SessionState),
{
    let mut next = state.clone();
    if !next.session.joined {
        edit(&mut next.session);
    }
    ChatTransition::to(next)
}

fn join(state: &ChatState) -> ChatTransition {
    if state.session.joined {
        return ChatTransition::to(state.clone());
    }

    let join = JoinRoom {
        room: state.session.room.clone(),
        username: state.session.username.clone(),
    };
    if join.validate().is_err() {
        return ChatTransition::to(state.clone()).with(ChatEffect::Alert(USERNAME_REQUIRED.to_string()));
    }

    if !state.session.connected {
        return ChatTransition::to(state.clone()).with(ChatEffect::Alert(NOT_CONNECTED.to_string()));
    }

    ChatTransition::to(ChatState {
        session: SessionState {
            joined: true,
            ..state.session.clone()
        },
        ..state.clone()
    })
    .with(ChatEffect::Emit(ClientEvent::JoinRoom(join)))
}

fn emit_when_joined(state: &ChatState, event: ClientEvent, policy: OfflinePolicy) -> ChatTransition {
    if !state.session.joined {
        return ChatTransition::to(state.clone()).with(ChatEffect::Alert(JOIN_FIRST.to_string()));
    }

    if state.session.connected {
        return ChatTransition::to(state.clone()).with(ChatEffect::Emit(event));
    }

    match policy {
        OfflinePolicy::Drop => {
            warn!(event = event.name(), "Channel disconnected, dropping outgoing event");
            ChatTransition::to(state.clone())
        }
        OfflinePolicy::Queue => {
            let mut next = state.clone();
            next.outbox.push(event);
            ChatTransition::to(next)
        }
    }
}

fn to_message(event: ServerEvent) -> ChatMessage {
    match event {
        ServerEvent::ReceiveMessage(m) => ChatMessage::User {
            username: m.username,
            message: m.message,
            translated_message: m.translated_message,
            original_lang: m.original_lang,
            target_lang: m.target_lang,
            timestamp: m.timestamp,
        },
        ServerEvent::AiMessage(m) => ChatMessage::Ai {
            message: m.message,
            ai_type: m.ai_type,
        },
        ServerEvent::UserJoined(u) => ChatMessage::system(format!("{} joined the room", u.username)),
    }
}
