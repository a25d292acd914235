//! Microphone speech input
//!
//! Cuts one phrase out of the live audio stream with the energy VAD and
//! hands it to a Wyoming server for transcription.

use super::{normalize_transcript, ListenError, ListenWindow, SpeechInput, WyomingClient};
use crate::audio::{self, AudioCapture, PhraseRecorder};
use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

/// Audio sampled to estimate background noise
const CALIBRATION_DURATION: Duration = Duration::from_millis(500);

pub struct MicrophoneInput {
    capture: AudioCapture,
    client: WyomingClient,
    threshold: f32,
}

impl MicrophoneInput {
    pub fn new(config: &Config) -> Result<Self> {
        let capture = AudioCapture::start(config.input_device)?;
        let client = WyomingClient::new(&config.wyoming_host, config.wyoming_port)
            .with_language(&config.language_subtag());

        info!(
            "  - Using Wyoming ASR at {}:{}",
            config.wyoming_host, config.wyoming_port
        );

        Ok(Self {
            capture,
            client,
            threshold: audio::MIN_ENERGY_THRESHOLD,
        })
    }

    /// Measure background noise and set the speech threshold from it
    async fn calibrate(&mut self) -> Result<(), ListenError> {
        let wanted = audio::samples_for(CALIBRATION_DURATION);
        let deadline = Instant::now() + CALIBRATION_DURATION * 2;
        let mut ambient = Vec::with_capacity(wanted);

        while ambient.len() < wanted {
            match tokio::time::timeout_at(deadline, self.capture.next_chunk()).await {
                Ok(Some(chunk)) => ambient.extend_from_slice(&chunk),
                Ok(None) => return Err(stream_ended()),
                Err(_) => break,
            }
        }

        self.threshold = audio::ambient_threshold(audio::calculate_energy(&ambient));
        debug!("Calibrated speech threshold: {:.0}", self.threshold);
        Ok(())
    }

    /// Record one phrase, or fail with `NoSpeech` if none starts in time
    async fn record(&mut self, window: ListenWindow) -> Result<Vec<i16>, ListenError> {
        let mut recorder = PhraseRecorder::new(self.threshold, window.phrase_limit);
        let start_deadline = Instant::now() + window.timeout;
        let mut phrase_deadline = None;

        loop {
            let deadline = phrase_deadline.unwrap_or(start_deadline);
            let chunk = match tokio::time::timeout_at(deadline, self.capture.next_chunk()).await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => return Err(stream_ended()),
                Err(_) if recorder.started() => break,
                Err(_) => return Err(ListenError::NoSpeech),
            };

            let done = recorder.push(&chunk);
            if recorder.started() && phrase_deadline.is_none() {
                phrase_deadline = Some(Instant::now() + window.phrase_limit);
            }
            if done {
                break;
            }
        }

        Ok(recorder.into_samples())
    }
}

fn stream_ended() -> ListenError {
    ListenError::ServiceUnavailable("microphone stream ended".to_string())
}

#[async_trait]
impl SpeechInput for MicrophoneInput {
    async fn listen(&mut self, window: ListenWindow) -> Result<String, ListenError> {
        self.capture.drain();
        if window.calibrate {
            self.calibrate().await?;
        }

        let samples = self.record(window).await?;
        debug!("Captured phrase ({} samples)", samples.len());

        let stream = match timeout(Duration::from_secs(5), self.client.connect()).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ListenError::ServiceUnavailable(e.to_string())),
            Err(_) => {
                return Err(ListenError::ServiceUnavailable(
                    "connection timed out".to_string(),
                ))
            }
        };

        match self.client.transcribe(stream, &samples).await {
            Ok(text) => normalize_transcript(&text),
            Err(e) => {
                warn!("⚠️ Transcription failed: {}", e);
                Err(ListenError::ServiceUnavailable(e.to_string()))
            }
        }
    }

    fn name(&self) -> &str {
        "microphone"
    }
}
