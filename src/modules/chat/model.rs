use serde::{Deserialize, Serialize};

use crate::modules::chat::schema::ClientEvent;
use crate::modules::language::model::DEFAULT_SOURCE_LANG;

pub const DEFAULT_ROOM: &str = "general";
pub const DEFAULT_TOPIC: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    #[default]
    Learner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Learner => "learner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflinePolicy {
    #[default]
    Drop,
    Queue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatMessage {
    User {
        username: String,
        message: String,
        translated_message: Option<String>,
        original_lang: Option<String>,
        target_lang: Option<String>,
        timestamp: Option<String>,
    },
    Ai {
        message: String,
        ai_type: String,
    },
    System {
        message: String,
    },
}

impl ChatMessage {
    pub fn system(message: impl Into<String>) -> Self {
        ChatMessage::System {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatMessage::User {
                username,
                message,
                translated_message,
                ..
            } => {
                write!(f, "{}: {}", username, message)?;
                match translated_message {
                    Some(translated) if translated != message => write!(f, " ({})", translated),
                    _ => Ok(()),
                }
            }
            ChatMessage::Ai { message, ai_type } => write!(f, "[ai:{}] {}", ai_type, message),
            ChatMessage::System { message } => write!(f, "* {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub connected: bool,
    pub joined: bool,
    pub username: String,
    pub room: String,
    pub role: Role,
    pub topic: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            connected: false,
            joined: false,
            username: String::new(),
            room: DEFAULT_ROOM.to_string(),
            role: Role::default(),
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    pub session: SessionState,
    pub user_lang: String,
    pub target_lang: String,
    pub messages: Vec<ChatMessage>,
    pub outbox: Vec<ClientEvent>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            session: SessionState::default(),
            user_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_SOURCE_LANG.to_string(),
            messages: Vec::new(),
            outbox: Vec::new(),
        }
    }
}
