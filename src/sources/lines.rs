//! Newline delimited payload source

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use super::{PayloadSource, SourceEvent};

/// One payload per line, read on a background thread
pub struct LineSource {
    rx: Receiver<Result<String, String>>,
    reader: Option<JoinHandle<()>>,
    closed: bool,
}

impl LineSource {
    pub fn new<R>(input: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let reader = thread::spawn(move || {
            for line in input.lines() {
                let msg = match line {
                    Ok(l) if l.trim().is_empty() => continue,
                    Ok(l) => Ok(l.trim().to_string()),
                    Err(e) => Err(format!("Failed on read some line: {}", e)),
                };
                let failed = msg.is_err();
                if tx.send(msg).is_err() || failed {
                    break;
                }
            }
        });

        Self {
            rx,
            reader: Some(reader),
            closed: false,
        }
    }
}

impl PayloadSource for LineSource {
    fn poll(&mut self, wait: Duration) -> Result<Option<SourceEvent>, String> {
        if self.closed {
            return Ok(Some(SourceEvent::Closed));
        }

        match self.rx.recv_timeout(wait) {
            Ok(Ok(line)) => Ok(Some(SourceEvent::Payload(line))),
            Ok(Err(e)) => {
                self.closed = true;
                Err(e)
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                self.closed = true;
                if let Some(reader) = self.reader.take() {
                    let _ = reader.join();
                }
                debug!("payload stream closed");
                Ok(Some(SourceEvent::Closed))
            }
        }
    }
}
