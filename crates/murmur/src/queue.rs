//! Serialized transcription job queue.
//!
//! One background worker drains submitted jobs in order, so at most one
//! spectrogram build (and one lazy resource use) is ever in flight.
//! Results travel back through a per-job channel. Dropping the queue
//! closes the intake, lets the worker finish what was already queued,
//! and joins it.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Result;
use tracing::debug;

use crate::pipeline::TranscriptionEngine;

struct Job {
    wav_bytes: Vec<u8>,
    done: Sender<Result<String>>,
}

/// Handle for one submitted request.
pub struct TranscriptionJob {
    rx: Receiver<Result<String>>,
}

impl TranscriptionJob {
    /// Block until the transcript (or its error) is available.
    ///
    /// Reports an error if the queue shut down before this job ran.
    pub fn wait(self) -> Result<String> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(anyhow::anyhow!("transcription queue shut down")))
    }
}

pub struct TranscriptionQueue {
    tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl TranscriptionQueue {
    #[must_use]
    pub fn new(engine: Arc<TranscriptionEngine>) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let worker = std::thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                let result = engine.transcribe_wav_bytes(&job.wav_bytes);
                // the submitter may have dropped its handle already
                let _ = job.done.send(result);
            }
            debug!("transcription queue worker exiting");
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Enqueue one request. Jobs run strictly in submission order.
    pub fn submit(&self, wav_bytes: Vec<u8>) -> TranscriptionJob {
        let (done, rx) = mpsc::channel();
        if let Some(tx) = &self.tx {
            let _ = tx.send(Job { wav_bytes, done });
        }
        TranscriptionJob { rx }
    }
}

impl Drop for TranscriptionQueue {
    fn drop(&mut self) {
        // closing the intake ends the worker loop after the queued jobs
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
