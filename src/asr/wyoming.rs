//! Wyoming Protocol Client
//!
//! Sends a captured utterance to a Wyoming ASR service and returns the
//! transcript. Wyoming events are JSON lines over TCP.
//!
//! Reference: https://github.com/rhasspy/wyoming

use crate::error::{HearkenError, HearkenResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Audio format sent to the server: 16 kHz, 16-bit, mono
pub const SAMPLE_RATE: u32 = 16000;

/// Longest wait for a transcript after the audio is sent
const TRANSCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wyoming events used by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WyomingEvent {
    /// Transcription request carrying the language hint
    #[serde(rename = "transcribe")]
    Transcribe(TranscribeData),

    /// Start of audio stream
    #[serde(rename = "audio-start")]
    AudioStart(AudioFormat),

    /// Audio chunk
    #[serde(rename = "audio-chunk")]
    AudioChunk(AudioChunkData),

    /// End of audio stream
    #[serde(rename = "audio-stop")]
    AudioStop,

    /// Transcript result
    #[serde(rename = "transcript")]
    Transcript(TranscriptData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscribeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub rate: u32,
    pub width: u8,
    pub channels: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioChunkData {
    pub rate: u32,
    pub width: u8,
    pub channels: u8,
    #[serde(with = "base64_bytes")]
    pub audio: Vec<u8>,
    #[serde(default)]
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptData {
    pub text: String,
}

/// Base64 serialization for audio bytes
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Little-endian PCM bytes for 16-bit samples
pub fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Wyoming client for ASR services
#[derive(Debug, Clone)]
pub struct WyomingClient {
    host: String,
    port: u16,
    language: Option<String>,
}

impl WyomingClient {
    /// Create a new Wyoming client
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            language: None,
        }
    }

    /// Ask the server to transcribe in a specific language (`en`, `de`, ...)
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Events sent for one utterance, in order
    pub fn request_events(&self, samples: &[i16]) -> Vec<WyomingEvent> {
        let format = AudioFormat {
            rate: SAMPLE_RATE,
            width: 2,
            channels: 1,
        };
        vec![
            WyomingEvent::Transcribe(TranscribeData {
                language: self.language.clone(),
            }),
            WyomingEvent::AudioStart(format),
            WyomingEvent::AudioChunk(AudioChunkData {
                rate: format.rate,
                width: format.width,
                channels: format.channels,
                audio: pcm_bytes(samples),
                timestamp: 0,
            }),
            WyomingEvent::AudioStop,
        ]
    }

    /// Connect to the server. Failure here means the service is unavailable.
    pub async fn connect(&self) -> std::io::Result<TcpStream> {
        TcpStream::connect((&*self.host, self.port)).await
    }

    /// Transcribe an utterance over an open connection
    pub async fn transcribe(&self, stream: TcpStream, samples: &[i16]) -> HearkenResult<String> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        for event in self.request_events(samples) {
            let line = serde_json::to_string(&event)?;
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;

        debug!(
            "Sent audio ({} samples), waiting for transcript...",
            samples.len()
        );

        let transcript = tokio::time::timeout(TRANSCRIPT_TIMEOUT, read_transcript(&mut reader))
            .await
            .map_err(|_| HearkenError::Asr("timeout waiting for transcript".to_string()))??;

        info!("📝 Wyoming transcript: '{}'", transcript);
        Ok(transcript)
    }
}

/// Read events until a transcript arrives
async fn read_transcript<R>(reader: &mut R) -> HearkenResult<String>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(HearkenError::Asr(
                "connection closed before transcript".to_string(),
            ));
        }

        if let Some(text) = parse_transcript(&line) {
            return Ok(text);
        }
    }
}

/// Extract transcript text from one event line, ignoring other events
pub fn parse_transcript(line: &str) -> Option<String> {
    let event: serde_json::Value = serde_json::from_str(line.trim()).ok()?;
    if event.get("type").and_then(|t| t.as_str()) != Some("transcript") {
        return None;
    }
    event
        .get("data")
        .and_then(|d| d.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn test_audio_stop_serialize() {
        let json = serde_json::to_value(&WyomingEvent::AudioStop).unwrap();
        assert_eq!(json["type"], "audio-stop");
    }

    #[test]
    fn test_request_events_order() {
        let client = WyomingClient::new("localhost", 10300).with_language("en");
        let events = client.request_events(&[1, -1]);
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], WyomingEvent::Transcribe(_)));
        assert!(matches!(events[3], WyomingEvent::AudioStop));

        let chunk = serde_json::to_value(&events[2]).unwrap();
        assert_eq!(chunk["type"], "audio-chunk");
        assert_eq!(chunk["data"]["rate"], 16000);
        assert_eq!(chunk["data"]["audio"], STANDARD.encode([1u8, 0, 255, 255]));

        let transcribe = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(transcribe["data"]["language"], "en");
    }

    #[test]
    fn test_parse_transcript() {
        assert_eq!(
            parse_transcript(r#"{"type": "transcript", "data": {"text": "hello there"}}"#),
            Some("hello there".to_string())
        );
        assert_eq!(parse_transcript(r#"{"type": "info", "data": {}}"#), None);
        assert_eq!(parse_transcript("garbage"), None);
    }

    #[tokio::test]
    async fn test_transcribe_against_local_server() {
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = socket.into_split();
            let mut lines = BufReader::new(reader).lines();
            while let Some(line) = lines.next_line().await.unwrap() {
                if line.contains("audio-stop") {
                    break;
                }
            }
            writer
                .write_all(b"{\"type\":\"transcript\",\"data\":{\"text\":\"what time is it\"}}\n")
                .await
                .unwrap();
        });

        let client = WyomingClient::new("127.0.0.1", port);
        let stream = client.connect().await.unwrap();
        let text = client.transcribe(stream, &[0i16; 160]).await.unwrap();
        assert_eq!(text, "what time is it");
        server.await.unwrap();
    }
}
