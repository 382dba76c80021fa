//! Image decoding.
//!
//! Decoding is the only step of the pipeline that may block for a while, so
//! besides the synchronous [`decode`] there is [`spawn_decode`], which runs on
//! a worker thread and reports back over a channel.

use std::fs;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::ImageFormat;
use tracing::{debug, warn};

use crate::error::{Result, SquiggleError};

use super::{ImageSource, PixelBuffer};

/// Size of the bundled default image.
const BUILTIN_WIDTH: u32 = 320;
const BUILTIN_HEIGHT: u32 = 240;

/// Decode an image source into RGBA pixels.
#[tracing::instrument(skip_all, fields(source = %source))]
pub fn decode(source: &ImageSource) -> Result<PixelBuffer> {
    let buffer = match source {
        ImageSource::Builtin => builtin_image(),
        ImageSource::Path(path) => {
            let bytes = fs::read(path).map_err(|e| SquiggleError::Io {
                path: path.clone(),
                message: format!("Failed to read image: {}", e),
            })?;
            decode_bytes(&bytes)?
        }
        ImageSource::Bytes { bytes, .. } => decode_bytes(bytes)?,
    };
    debug!(width = buffer.width(), height = buffer.height(), "decoded image");
    Ok(buffer)
}

/// Decode PNG or JPEG bytes, sniffing the format from the content.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(SquiggleError::Decode {
            message: "input is empty".to_string(),
            help: None,
        });
    }

    let format = image::guess_format(bytes).map_err(|e| SquiggleError::Decode {
        message: format!("unrecognized image data: {}", e),
        help: Some("Only PNG and JPEG images are supported".to_string()),
    })?;

    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(SquiggleError::Decode {
            message: format!("{:?} images are not supported", format),
            help: Some("Convert the image to PNG or JPEG".to_string()),
        });
    }

    let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        SquiggleError::Decode {
            message: e.to_string(),
            help: None,
        }
    })?;

    Ok(PixelBuffer::from(img.to_rgba8()))
}

/// The bundled default image: a dark vignetted disc on a light gradient.
///
/// Generated rather than embedded so the binary ships without assets.
pub fn builtin_image() -> PixelBuffer {
    let cx = BUILTIN_WIDTH as f32 / 2.0;
    let cy = BUILTIN_HEIGHT as f32 / 2.0;
    let radius = BUILTIN_HEIGHT as f32 * 0.4;

    PixelBuffer::from_fn(BUILTIN_WIDTH, BUILTIN_HEIGHT, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let d = (dx * dx + dy * dy).sqrt() / radius;

        // Light horizontal ramp behind a disc that darkens toward its centre.
        let ramp = 200.0 + 55.0 * (x as f32 / BUILTIN_WIDTH as f32);
        let disc = if d < 1.0 { 40.0 + 160.0 * d * d } else { ramp };
        let v = disc.min(ramp).round().clamp(0.0, 255.0) as u8;
        [v, v, v, 255]
    })
}

/// A decode running on a worker thread.
pub struct PendingDecode {
    receiver: Receiver<Result<PixelBuffer>>,
}

impl PendingDecode {
    /// Block until the decode finishes.
    pub fn wait(self) -> Result<PixelBuffer> {
        self.receiver.recv().unwrap_or_else(|_| Err(worker_lost()))
    }
}

/// Start decoding on a worker thread.
pub fn spawn_decode(source: ImageSource) -> PendingDecode {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        if sender.send(decode(&source)).is_err() {
            debug!(source = %source, "decode result dropped");
        }
    });
    PendingDecode { receiver }
}

/// Start decoding on a worker thread, sending `(tag, result)` to `sender`.
///
/// Several decodes may share one channel; the tag tells completions apart.
/// No ordering between concurrent decodes is guaranteed.
pub fn spawn_decode_tagged<T>(
    source: ImageSource,
    tag: T,
    sender: Sender<(T, Result<PixelBuffer>)>,
) where
    T: Send + 'static,
{
    thread::spawn(move || {
        let result = decode(&source);
        if sender.send((tag, result)).is_err() {
            warn!(source = %source, "decode finished after its receiver was dropped");
        }
    });
}

/// Decodes sources in order with at most `window` decodes in flight.
///
/// The next decode starts only when a finished one is taken, so a long batch
/// never holds more than `window` decoded images at once.
pub struct DecodeQueue {
    waiting: std::vec::IntoIter<ImageSource>,
    running: VecDeque<(ImageSource, PendingDecode)>,
    window: usize,
}

impl DecodeQueue {
    pub fn new(sources: Vec<ImageSource>, window: usize) -> Self {
        let mut queue = Self {
            waiting: sources.into_iter(),
            running: VecDeque::new(),
            window: window.max(1),
        };
        queue.fill();
        queue
    }

    /// Decodes started but not yet taken.
    pub fn in_flight(&self) -> usize {
        self.running.len()
    }

    fn fill(&mut self) {
        while self.running.len() < self.window {
            let Some(source) = self.waiting.next() else {
                break;
            };
            let pending = spawn_decode(source.clone());
            self.running.push_back((source, pending));
        }
    }
}

impl Iterator for DecodeQueue {
    type Item = (ImageSource, Result<PixelBuffer>);

    fn next(&mut self) -> Option<Self::Item> {
        let (source, pending) = self.running.pop_front()?;
        let decoded = pending.wait();
        self.fill();
        Some((source, decoded))
    }
}

fn worker_lost() -> SquiggleError {
    SquiggleError::Decode {
        message: "decode worker exited without a result".to_string(),
        help: None,
    }
}
