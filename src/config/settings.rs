use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::modules::chat::model::OfflinePolicy;
use crate::modules::translation::model::{
    AudioPolicy, LengthWarningPolicy, SubmitPolicy, MAX_TEXT_LENGTH, WARN_TEXT_LENGTH,
};
use crate::services::framing::Framing;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub translator_url: String,
    pub chat_url: String,
    pub chat_framing: Framing,
    pub stt_base_url: String,
    pub stt_api_key: Option<String>,
    pub stt_model: String,
    pub http_connect_timeout: Duration,
    pub submit_policy: SubmitPolicy,
    pub offline_policy: OfflinePolicy,
    pub chat_reconnect_attempts: u32,
    pub chat_reconnect_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translator_url: "http://localhost:5000".to_string(),
            chat_url: "http://localhost:5000".to_string(),
            chat_framing: Framing::default(),
            stt_base_url: "https://api.groq.com/openai/v1".to_string(),
            stt_api_key: None,
            stt_model: "whisper-large-v3-turbo".to_string(),
            http_connect_timeout: Duration::from_secs(10),
            submit_policy: SubmitPolicy::default(),
            offline_policy: OfflinePolicy::default(),
            chat_reconnect_attempts: 0,
            chat_reconnect_delay: Duration::from_secs(2),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let submit_policy = SubmitPolicy {
            audio: match get("AUDIO_POLICY") {
                Some(value) => parse_audio_policy(&value)?,
                None => AudioPolicy::default(),
            },
            length_warning: match get("LENGTH_WARNING_POLICY") {
                Some(value) => parse_length_warning_policy(&value)?,
                None => LengthWarningPolicy::default(),
            },
            enforce_hard_cap: parse_or("ENFORCE_HARD_CAP", get("ENFORCE_HARD_CAP"), true)?,
            max_text_length: parse_or("MAX_TEXT_LENGTH", get("MAX_TEXT_LENGTH"), MAX_TEXT_LENGTH)?,
            warn_text_length: parse_or("WARN_TEXT_LENGTH", get("WARN_TEXT_LENGTH"), WARN_TEXT_LENGTH)?,
        };

        let offline_policy = match get("OFFLINE_POLICY") {
            Some(value) => parse_offline_policy(&value)?,
            None => OfflinePolicy::default(),
        };

        let chat_framing = match get("CHAT_FRAMING") {
            Some(value) => parse_framing(&value)?,
            None => Framing::default(),
        };

        let timeout_secs = parse_or(
            "HTTP_CONNECT_TIMEOUT_SECS",
            get("HTTP_CONNECT_TIMEOUT_SECS"),
            defaults.http_connect_timeout.as_secs(),
        )?;

        let chat_reconnect_attempts = parse_or(
            "CHAT_RECONNECT_ATTEMPTS",
            get("CHAT_RECONNECT_ATTEMPTS"),
            defaults.chat_reconnect_attempts,
        )?;

        Ok(Self {
            translator_url: get("TRANSLATOR_URL").unwrap_or(defaults.translator_url),
            chat_url: get("CHAT_URL").unwrap_or(defaults.chat_url),
            chat_framing,
            stt_base_url: get("GROQ_BASE_URL").unwrap_or(defaults.stt_base_url),
            stt_api_key: get("GROQ_API_KEY"),
            stt_model: get("STT_MODEL").unwrap_or(defaults.stt_model),
            http_connect_timeout: Duration::from_secs(timeout_secs),
            submit_policy,
            offline_policy,
            chat_reconnect_attempts,
            chat_reconnect_delay: defaults.chat_reconnect_delay,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

pub fn parse_audio_policy(value: &str) -> Result<AudioPolicy, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "always" => Ok(AudioPolicy::Always),
        "when_supported" | "when-supported" => Ok(AudioPolicy::WhenSupported),
        _ => Err(ConfigError::InvalidValue {
            key: "AUDIO_POLICY",
            value: value.to_string(),
        }),
    }
}

pub fn parse_length_warning_policy(value: &str) -> Result<LengthWarningPolicy, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "advisory" => Ok(LengthWarningPolicy::Advisory),
        "confirm" => Ok(LengthWarningPolicy::Confirm),
        _ => Err(ConfigError::InvalidValue {
            key: "LENGTH_WARNING_POLICY",
            value: value.to_string(),
        }),
    }
}

pub fn parse_offline_policy(value: &str) -> Result<OfflinePolicy, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "drop" => Ok(OfflinePolicy::Drop),
        "queue" => Ok(OfflinePolicy::Queue),
        _ => Err(ConfigError::InvalidValue {
            key: "OFFLINE_POLICY",
            value: value.to_string(),
        }),
    }
}

pub fn parse_framing(value: &str) -> Result<Framing, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "socket_io" | "socketio" | "socket.io" => Ok(Framing::SocketIo),
        "json" => Ok(Framing::Json),
        _ => Err(ConfigError::InvalidValue {
            key: "CHAT_FRAMING",
            value: value.to_string(),
        }),
    }
}
