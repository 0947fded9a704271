use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::modules::chat::channel::{ChannelEvent, RealtimeChannel};
use crate::modules::chat::controller::{reduce, ChatEffect, ChatEvent};
use crate::modules::chat::model::{ChatMessage, ChatState, OfflinePolicy};
use crate::platform::Prompter;

pub struct ChatSession<C, P> {
    id: Uuid,
    state: ChatState,
    policy: OfflinePolicy,
    channel: C,
    prompter: P,
}

impl<C, P> ChatSession<C, P>
where
    C: RealtimeChannel,
    P: Prompter,
{
    pub fn new(channel: C, prompter: P, policy: OfflinePolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ChatState::default(),
            policy,
            channel,
            prompter,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub async fn dispatch(&mut self, event: ChatEvent) {
        let transition = reduce(&self.state, event, self.policy);
        self.state = transition.state;

        for effect in transition.effects {
            match effect {
                ChatEffect::Emit(event) => {
                    debug!(session_id = %self.id, event = event.name(), "Emitting");
                    if let Err(e) = self.channel.emit(&event).await {
                        warn!(session_id = %self.id, event = event.name(), error = %e, "Emit failed");
                    }
                }
                ChatEffect::Alert(message) => self.prompter.alert(&message),
            }
        }
    }

    pub async fn send(&mut self, message: &str) {
        self.dispatch(ChatEvent::SendRequested {
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
        .await;
    }

    pub async fn pump(&mut self) -> Option<Vec<ChatMessage>> {
        let before = self.state.messages.len();

        match self.channel.next_event().await {
            Some(ChannelEvent::Connected) => {
                info!(session_id = %self.id, "Channel connected");
                self.dispatch(ChatEvent::Connected).await;
            }
            Some(ChannelEvent::Disconnected) => {
                warn!(session_id = %self.id, "Channel disconnected");
                self.dispatch(ChatEvent::Disconnected).await;
            }
            Some(ChannelEvent::Server(event)) => self.dispatch(ChatEvent::Received(event)).await,
            None => {
                if self.state.session.connected {
                    self.dispatch(ChatEvent::Disconnected).await;
                }
                return None;
            }
        }

        Some(self.state.messages[before..].to_vec())
    }

    pub async fn shutdown(mut self) {
        info!(session_id = %self.id, messages = self.state.messages.len(), "Closing chat session");
        self.channel.close().await;
    }
}
