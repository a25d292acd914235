//! Console speech input
//!
//! Treats each typed line on stdin as one utterance.

use super::{normalize_transcript, ListenError, ListenWindow, SpeechInput};
use crate::error::HearkenResult;
use async_trait::async_trait;
use std::io::{BufRead, BufReader, Read};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

pub struct ConsoleInput {
    lines: UnboundedReceiver<std::io::Result<String>>,
}

impl ConsoleInput {
    pub fn new() -> HearkenResult<Self> {
        Self::from_reader(std::io::stdin())
    }

    /// Read lines from `reader` on a detached thread.
    ///
    /// A blocked read must never keep the runtime from shutting down, so the
    /// reader does not go through tokio's blocking pool.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> HearkenResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("hearken-stdin".to_string())
            .spawn(move || {
                for line in BufReader::new(reader).lines() {
                    let failed = line.is_err();
                    if tx.send(line).is_err() || failed {
                        break;
                    }
                }
                debug!("Console input closed");
            })?;

        Ok(Self { lines: rx })
    }
}

#[async_trait]
impl SpeechInput for ConsoleInput {
    async fn listen(&mut self, window: ListenWindow) -> Result<String, ListenError> {
        match tokio::time::timeout(window.timeout, self.lines.recv()).await {
            Ok(Some(Ok(line))) => {
                debug!("Typed: '{}'", line);
                normalize_transcript(&line)
            }
            Ok(Some(Err(e))) => Err(ListenError::ServiceUnavailable(e.to_string())),
            Ok(None) => Err(ListenError::ServiceUnavailable("stdin closed".to_string())),
            Err(_) => Err(ListenError::NoSpeech),
        }
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, Receiver};
    use std::time::Duration;

    /// Blocks on read until the test hands it bytes
    struct ChannelReader {
        rx: Receiver<Vec<u8>>,
        pending: Vec<u8>,
    }

    impl ChannelReader {
        fn new(rx: Receiver<Vec<u8>>) -> Self {
            Self {
                rx,
                pending: Vec::new(),
            }
        }
    }

    impl Read for ChannelReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pending.is_empty() {
                match self.rx.recv() {
                    Ok(bytes) => self.pending = bytes,
                    Err(_) => return Ok(0),
                }
            }
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            Ok(n)
        }
    }

    fn short_window() -> ListenWindow {
        ListenWindow {
            timeout: Duration::from_millis(50),
            ..ListenWindow::WAKE_WORD
        }
    }

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let mut input =
            ConsoleInput::from_reader(&b"Hey Assistant\n\nwhat time is it\n"[..]).unwrap();

        assert_eq!(
            input.listen(ListenWindow::COMMAND).await,
            Ok("hey assistant".to_string())
        );
        assert_eq!(
            input.listen(ListenWindow::COMMAND).await,
            Err(ListenError::Unintelligible)
        );
        assert_eq!(
            input.listen(ListenWindow::COMMAND).await,
            Ok("what time is it".to_string())
        );
        assert!(matches!(
            input.listen(ListenWindow::COMMAND).await,
            Err(ListenError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_quiet_input_times_out_as_no_speech() {
        let (tx, rx) = channel();
        let mut input = ConsoleInput::from_reader(ChannelReader::new(rx)).unwrap();

        assert_eq!(input.listen(short_window()).await, Err(ListenError::NoSpeech));

        tx.send(b"Hello\n".to_vec()).unwrap();
        let heard = tokio_test::assert_ok!(input.listen(ListenWindow::COMMAND).await);
        assert_eq!(heard, "hello");
    }

    #[test]
    fn test_blocked_read_does_not_hold_runtime_open() {
        let (tx, rx) = channel::<Vec<u8>>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let mut input = ConsoleInput::from_reader(ChannelReader::new(rx)).unwrap();

        assert_eq!(
            runtime.block_on(input.listen(short_window())),
            Err(ListenError::NoSpeech)
        );

        // The reader thread is still parked in read(); shutdown must not wait for it
        let (done_tx, done_rx) = channel();
        std::thread::spawn(move || {
            drop(input);
            drop(runtime);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        drop(tx);
    }
}
