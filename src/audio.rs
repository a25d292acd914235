//! Audio capture module using cpal
//!
//! Captures 16 kHz mono samples on a dedicated thread and provides the
//! energy-based voice activity helpers used to cut one phrase out of the
//! stream.

use crate::error::{HearkenError, HearkenResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

pub const SAMPLE_RATE: u32 = 16000;
const CHUNK_SIZE: usize = 1024;

/// Energy floor for speech, used before calibration and as a minimum after it
pub const MIN_ENERGY_THRESHOLD: f32 = 300.0;

/// Speech must exceed ambient noise by this factor
const AMBIENT_MULTIPLIER: f32 = 1.5;

/// Silence that ends a phrase
pub const PAUSE_DURATION: Duration = Duration::from_millis(800);

/// Live microphone stream
pub struct AudioCapture {
    rx: UnboundedReceiver<Vec<i16>>,
    stop: Arc<AtomicBool>,
}

impl AudioCapture {
    /// Start audio capture on the default device, or on `device_index`
    pub fn start(device_index: Option<usize>) -> HearkenResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        // cpal streams are not Send; the stream lives and dies on this thread
        std::thread::Builder::new()
            .name("hearken-audio".to_string())
            .spawn(move || {
                let stream = match open_stream(device_index, tx) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                while !thread_stop.load(Ordering::Relaxed) {
                    std::thread::sleep(Duration::from_millis(200));
                }
                drop(stream);
                debug!("Audio capture stopped");
            })?;

        ready_rx
            .recv()
            .map_err(|_| HearkenError::Audio("audio thread exited during setup".to_string()))??;

        info!("🎙️ Audio capture started");
        Ok(Self { rx, stop })
    }

    /// Next captured chunk; `None` once the stream has ended
    pub async fn next_chunk(&mut self) -> Option<Vec<i16>> {
        self.rx.recv().await
    }

    /// Discard audio captured while nobody was listening (including our own speech)
    pub fn drain(&mut self) {
        let mut dropped = 0;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("Drained {} stale audio chunks", dropped);
        }
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn open_stream(
    device_index: Option<usize>,
    tx: mpsc::UnboundedSender<Vec<i16>>,
) -> HearkenResult<cpal::Stream> {
    let host = cpal::default_host();

    // List available devices
    info!("Available audio input devices:");
    for (i, device) in host.input_devices().map_err(audio_err)?.enumerate() {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let marker = if device_index == Some(i) { "*" } else { " " };
        info!("  {} [{}] {}", marker, i, name);
    }

    // Select device
    let device = match device_index {
        Some(idx) => host
            .input_devices()
            .map_err(audio_err)?
            .nth(idx)
            .ok_or_else(|| HearkenError::Audio(format!("device index {} out of range", idx)))?,
        None => host
            .default_input_device()
            .ok_or_else(|| HearkenError::Audio("no default input device".to_string()))?,
    };

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    info!("Using audio device: {}", device_name);

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Fixed(CHUNK_SIZE as u32),
    };

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if tx.send(data.to_vec()).is_err() {
                    debug!("Audio receiver dropped");
                }
            },
            |err| {
                warn!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(audio_err)?;

    stream.play().map_err(audio_err)?;
    Ok(stream)
}

fn audio_err(e: impl std::fmt::Display) -> HearkenError {
    HearkenError::Audio(e.to_string())
}

/// Calculate audio energy (RMS) for VAD
pub fn calculate_energy(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: i64 = samples.iter().map(|&s| (s as i64).pow(2)).sum();
    (sum as f32 / samples.len() as f32).sqrt()
}

/// Speech threshold for a measured ambient energy
pub fn ambient_threshold(ambient_energy: f32) -> f32 {
    (ambient_energy * AMBIENT_MULTIPLIER).max(MIN_ENERGY_THRESHOLD)
}

/// Number of samples covering `duration`
pub fn samples_for(duration: Duration) -> usize {
    (duration.as_secs_f64() * SAMPLE_RATE as f64) as usize
}

/// Collects one phrase: starts at the first loud chunk, ends after a pause
/// or when the phrase limit is reached
#[derive(Debug)]
pub struct PhraseRecorder {
    threshold: f32,
    pause_samples: usize,
    limit_samples: usize,
    silent_run: usize,
    samples: Vec<i16>,
}

impl PhraseRecorder {
    pub fn new(threshold: f32, phrase_limit: Duration) -> Self {
        Self {
            threshold,
            pause_samples: samples_for(PAUSE_DURATION),
            limit_samples: samples_for(phrase_limit),
            silent_run: 0,
            samples: Vec::new(),
        }
    }

    /// Whether speech has started
    pub fn started(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Feed a chunk; returns `true` once the phrase is complete
    pub fn push(&mut self, chunk: &[i16]) -> bool {
        let loud = calculate_energy(chunk) > self.threshold;

        if !self.started() {
            if !loud {
                return false;
            }
            debug!("Speech started");
        }

        self.samples.extend_from_slice(chunk);
        if loud {
            self.silent_run = 0;
        } else {
            self.silent_run += chunk.len();
        }

        self.silent_run >= self.pause_samples || self.samples.len() >= self.limit_samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}
