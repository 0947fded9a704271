use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JoinRoom {
    #[validate(length(min = 1, message = "Room cannot be empty"))]
    pub room: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SendMessage {
    pub room: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub message: String,
    pub username: String,
    pub user_lang: String,
    pub target_lang: String,
    pub skill_topic: String,
    pub user_role: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RequestExplanation {
    pub room: String,
    pub topic: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinRoom(JoinRoom),
    SendMessage(SendMessage),
    RequestExplanation(RequestExplanation),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom(_) => "join_room",
            ClientEvent::SendMessage(_) => "send_message",
            ClientEvent::RequestExplanation(_) => "request_explanation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveMessage {
    pub username: String,
    pub message: String,
    #[serde(default)]
    pub translated_message: Option<String>,
    #[serde(default)]
    pub original_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMessage {
    pub message: String,
    #[serde(rename = "type", default = "default_ai_type")]
    pub ai_type: String,
}

fn default_ai_type() -> String {
    "explanation".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJoined {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ReceiveMessage(ReceiveMessage),
    AiMessage(AiMessage),
    UserJoined(UserJoined),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_room_frame() {
        let event = ClientEvent::JoinRoom(JoinRoom {
            room: "general".to_string(),
            username: "ana".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "join_room", "data": { "room": "general", "username": "ana" } })
        );
        assert_eq!(event.name(), "join_room");
    }

    #[test]
    fn test_ai_message_type_field() {
        let event: ServerEvent = serde_json::from_value(json!({
            "event": "ai_message",
            "data": { "message": "Try again slowly", "type": "explanation" }
        }))
        .unwrap();

        assert_eq!(
            event,
            ServerEvent::AiMessage(AiMessage {
                message: "Try again slowly".to_string(),
                ai_type: "explanation".to_string(),
            })
        );
    }

    #[test]
    fn test_receive_message_tolerates_missing_optionals() {
        let event: ServerEvent = serde_json::from_value(json!({
            "event": "receive_message",
            "data": { "username": "raj", "message": "namaste", "translated_message": null }
        }))
        .unwrap();

        match event {
            ServerEvent::ReceiveMessage(m) => {
                assert_eq!(m.username, "raj");
                assert_eq!(m.translated_message, None);
                assert_eq!(m.timestamp, None);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_blank_username_fails_validation() {
        let join = JoinRoom {
            room: "general".to_string(),
            username: "  ".to_string(),
        };
        assert!(join.validate().is_err());
    }
}
