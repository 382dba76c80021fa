//! Render session with last-submission-wins semantics.
//!
//! Every submitted image gets a monotonically increasing [`Generation`].
//! Decodes run on worker threads and may finish in any order; a completion
//! is only rendered if its generation is still the latest one submitted.
//! Anything older is discarded without touching the current output.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::{self, Artwork};
use crate::raster::{spawn_decode_tagged, ImageSource, PixelBuffer};
use crate::types::RenderConfig;

/// Identifies one submission. Later submissions compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a finished decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The decode was current and its artwork is now the session output.
    Rendered(Generation),
    /// A newer submission exists; the result was dropped.
    Stale(Generation),
}

/// The artwork currently shown by a session.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub generation: Generation,
    /// Label of the source that produced it.
    pub source: String,
    pub artwork: Artwork,
}

type Message = ((Generation, String), Result<PixelBuffer>);

/// Explicit render state: config, generation counter and last good output.
pub struct RenderSession {
    config: RenderConfig,
    scale: u32,
    latest: u64,
    in_flight: usize,
    output: Option<SessionOutput>,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
}

impl RenderSession {
    pub fn new(config: RenderConfig, scale: u32) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            config,
            scale: scale.max(1),
            latest: 0,
            in_flight: 0,
            output: None,
            sender,
            receiver,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The most recently issued generation, if anything was submitted.
    pub fn latest(&self) -> Option<Generation> {
        (self.latest > 0).then_some(Generation(self.latest))
    }

    /// The last successfully rendered artwork.
    pub fn output(&self) -> Option<&SessionOutput> {
        self.output.as_ref()
    }

    /// Decodes submitted but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Issue a new generation, superseding every earlier one.
    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Apply a finished decode.
    ///
    /// Stale generations are discarded, even if they carry an error. For the
    /// current generation a decode or render error is returned and the
    /// previous output is kept; on success the new artwork replaces it.
    pub fn complete(
        &mut self,
        generation: Generation,
        source: &str,
        decoded: Result<PixelBuffer>,
    ) -> Result<Completion> {
        if generation.0 != self.latest {
            debug!(%generation, latest = self.latest, source, "discarding stale decode");
            return Ok(Completion::Stale(generation));
        }

        let pixels = decoded.inspect_err(|e| warn!(%generation, source, error = %e, "decode failed"))?;
        let artwork = pipeline::render(&pixels, &self.config, self.scale)?;

        self.output = Some(SessionOutput {
            generation,
            source: source.to_string(),
            artwork,
        });
        debug!(%generation, source, "session output replaced");
        Ok(Completion::Rendered(generation))
    }

    /// Submit a source for decoding on a worker thread.
    ///
    /// Sources with an unsupported file type are rejected up front and do
    /// not supersede earlier submissions.
    pub fn submit(&mut self, source: ImageSource) -> Result<Generation> {
        source.check_file_type()?;
        let generation = self.begin();
        let label = source.label();
        debug!(%generation, source = %label, "submitted");

        spawn_decode_tagged(source, (generation, label), self.sender.clone());
        self.in_flight += 1;
        Ok(generation)
    }

    /// Apply every decode that has already finished, without blocking.
    pub fn poll(&mut self) -> Vec<Result<Completion>> {
        let mut outcomes = Vec::new();
        while let Ok(((generation, label), decoded)) = self.receiver.try_recv() {
            self.in_flight -= 1;
            outcomes.push(self.complete(generation, &label, decoded));
        }
        outcomes
    }

    /// Block until one in-flight decode finishes and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub fn wait_next(&mut self) -> Option<Result<Completion>> {
        if self.in_flight == 0 {
            return None;
        }
        let ((generation, label), decoded) = self.receiver.recv().ok()?;
        self.in_flight -= 1;
        Some(self.complete(generation, &label, decoded))
    }

    /// Block until every in-flight decode has been applied.
    pub fn wait_idle(&mut self) -> Vec<Result<Completion>> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.wait_next() {
            outcomes.push(outcome);
        }
        outcomes
    }
}
