use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Http(u16),
    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Unsupported audio URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/ogg" => "ogg",
            "audio/webm" => "webm",
            _ => "bin",
        }
    }
}

pub fn decode_data_url(url: &str) -> Result<AudioClip, AudioError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AudioError::MalformedDataUrl("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AudioError::MalformedDataUrl("missing payload".to_string()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| AudioError::MalformedDataUrl("only base64 payloads are supported".to_string()))?;

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;

    Ok(AudioClip {
        mime_type: if mime_type.is_empty() {
            "audio/mpeg".to_string()
        } else {
            mime_type.to_string()
        },
        bytes,
    })
}

#[derive(Clone, Default)]
pub struct AudioFetcher {
    client: Client,
}

impl AudioFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<AudioClip, AudioError> {
        if url.starts_with("data:") {
            return decode_data_url(url);
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            let scheme = url.split(':').next().unwrap_or_default().to_string();
            return Err(AudioError::UnsupportedScheme(scheme));
        }

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AudioError::Http(response.status().as_u16()));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .unwrap_or_else(|| "audio/mpeg".to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(AudioClip { mime_type, bytes })
    }

    pub async fn save(&self, url: &str, output: Option<&Path>) -> Result<PathBuf, AudioError> {
        let clip = self.fetch(url).await?;

        let path = match output {
            Some(path) => {
                tokio::fs::write(path, &clip.bytes).await?;
                path.to_path_buf()
            }
            None => {
                let mut file = tempfile::Builder::new()
                    .prefix("translation-")
                    .suffix(&format!(".{}", clip.extension()))
                    .tempfile()?;
                file.write_all(&clip.bytes)?;
                let (_, path) = file.keep().map_err(|e| AudioError::IoError(e.error))?;
                path
            }
        };

        info!(path = %path.display(), bytes = clip.bytes.len(), "Audio saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_url() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"ID3fake");
        let clip = decode_data_url(&format!("data:audio/mp3;base64,{}", encoded)).unwrap();

        assert_eq!(clip.mime_type, "audio/mp3");
        assert_eq!(clip.bytes, b"ID3fake".to_vec());
        assert_eq!(clip.extension(), "mp3");
    }

    #[test]
    fn test_decode_rejects_non_base64_data_url() {
        assert!(matches!(
            decode_data_url("data:audio/mp3,raw"),
            Err(AudioError::MalformedDataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:audio/mp3;base64,@@@"),
            Err(AudioError::Base64(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let fetcher = AudioFetcher::default();
        assert!(matches!(
            fetcher.fetch("ftp://x/a.mp3").await,
            Err(AudioError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[tokio::test]
    async fn test_save_inline_audio_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.mp3");
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"abc");

        let fetcher = AudioFetcher::default();
        let path = fetcher
            .save(&format!("data:audio/mpeg;base64,{}", encoded), Some(&out))
            .await
            .unwrap();

        assert_eq!(path, out);
        assert_eq!(std::fs::read(&out).unwrap(), b"abc".to_vec());
    }
}
