//! The frame loop.
//!
//! [`run`] pulls frames from a [`FrameSource`], passes them through a [`Pipeline`], draws the
//! session status on top and hands the result to a [`FrameSink`] until the source runs dry, fails,
//! or the sink asks to quit.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::Config;
use crate::drop::defer;
use crate::image::{draw, Color, Image};
use crate::pipeline::{Annotator, DetectionSession, LandmarkProvider, Pipeline};
use crate::timer::FpsCounter;

/// Text drawn at the bottom of every frame.
pub const INSTRUCTIONS: &str = "Press 'q' to quit, 'r' to reset";

/// A source of video frames, like a camera.
pub trait FrameSource {
    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` once the end of the stream is reached.
    fn read(&mut self) -> anyhow::Result<Option<Image>>;

    /// Releases the underlying device.
    ///
    /// Called exactly once by [`run`] when the loop ends, no matter why it ended.
    fn release(&mut self) {}
}

/// Receives processed frames, typically to display them.
pub trait FrameSink {
    /// Presents `frame` and returns the user's request, if any.
    fn show(&mut self, frame: &Image, status: &FrameStatus) -> anyhow::Result<Option<Control>>;
}

/// User requests that can be issued while the loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Stops the loop.
    Quit,
    /// Resets the detection counter to 0.
    ResetCounter,
}

/// Status of the frame that is passed to [`FrameSink::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStatus {
    /// Whether any hand in the frame was flagged.
    pub any_flagged: bool,
    /// Number of flagged frames in the session so far, including this one.
    pub detections: u64,
}

/// A [`FrameSource`] that yields copies of a single still image.
#[derive(Debug, Clone)]
pub struct StillImage {
    image: Image,
    remaining: usize,
}

impl StillImage {
    /// Creates a source that yields `image` `count` times.
    pub fn new(image: Image, count: usize) -> Self {
        Self {
            image,
            remaining: count,
        }
    }

    /// Loads the image at `path` and yields it `count` times.
    pub fn load<P: AsRef<Path>>(path: P, count: usize) -> anyhow::Result<Self> {
        Ok(Self::new(Image::load(path)?, count))
    }
}

impl FrameSource for StillImage {
    fn read(&mut self) -> anyhow::Result<Option<Image>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(self.image.clone()))
    }
}

/// A [`FrameSink`] that writes every frame to a numbered PNG file in a directory.
#[derive(Debug)]
pub struct PngSink {
    dir: PathBuf,
    frames: usize,
}

impl PngSink {
    /// Creates a sink writing into `dir`, which is created if it does not exist.
    pub fn new<P: Into<PathBuf>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self { dir, frames: 0 })
    }

    /// Returns the number of frames written so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl FrameSink for PngSink {
    fn show(&mut self, frame: &Image, status: &FrameStatus) -> anyhow::Result<Option<Control>> {
        let path = self.dir.join(format!("frame_{:04}.png", self.frames));
        frame.save(&path)?;
        log::debug!(
            "wrote {} (flagged: {}, detections: {})",
            path.display(),
            status.any_flagged,
            status.detections,
        );
        self.frames += 1;
        Ok(None)
    }
}

/// Runs the frame loop until the source is exhausted, a frame cannot be read, or `sink` requests
/// [`Control::Quit`].
///
/// Frames are mirrored first if [`Config::mirror`] is set. `source` is released before this
/// function returns or unwinds, also when `sink` fails or a stage panics. Returns the final
/// detection session.
pub fn run<S, P, A, K>(
    source: &mut S,
    pipeline: &mut Pipeline<P, A>,
    sink: &mut K,
    config: &Config,
) -> anyhow::Result<DetectionSession>
where
    S: FrameSource + ?Sized,
    P: LandmarkProvider,
    A: Annotator,
    K: FrameSink + ?Sized,
{
    log::info!("started (mirror: {})", config.mirror);
    let _stopped = defer(|| log::info!("stopped"));

    let mut source = Release(source);
    let mut session = DetectionSession::new();
    run_loop(&mut *source.0, pipeline, sink, config, &mut session)?;
    Ok(session)
}

/// Releases the wrapped source when dropped, including during unwinding.
struct Release<'a, S: FrameSource + ?Sized>(&'a mut S);

impl<S: FrameSource + ?Sized> Drop for Release<'_, S> {
    fn drop(&mut self) {
        self.0.release();
    }
}

fn run_loop<S, P, A, K>(
    source: &mut S,
    pipeline: &mut Pipeline<P, A>,
    sink: &mut K,
    config: &Config,
    session: &mut DetectionSession,
) -> anyhow::Result<()>
where
    S: FrameSource + ?Sized,
    P: LandmarkProvider,
    A: Annotator,
    K: FrameSink + ?Sized,
{
    let mut fps = FpsCounter::new("frame loop");
    loop {
        let mut frame = match source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::debug!("end of stream");
                return Ok(());
            }
            Err(e) => {
                log::error!("failed to read frame: {:#}", e);
                return Ok(());
            }
        };

        if config.mirror {
            frame.flip_horizontal_in_place();
        }

        let report = pipeline.process(&mut frame, session);
        let status = FrameStatus {
            any_flagged: report.any_flagged(),
            detections: report.detections,
        };
        draw_status(&mut frame, &status);

        match sink.show(&frame, &status)? {
            Some(Control::Quit) => return Ok(()),
            Some(Control::ResetCounter) => {
                session.reset();
                log::info!("Detection counter reset");
            }
            None => {}
        }

        fps.tick_with(pipeline.timers());
    }
}

fn draw_status(frame: &mut Image, status: &FrameStatus) {
    let (width, height) = (frame.width() as i32, frame.height() as i32);

    let detections = format!("Detections: {}", status.detections);
    draw::text(frame, width - 200, 30, &detections)
        .color(Color::WHITE)
        .align_left()
        .align_bottom();
    draw::text(frame, 10, height - 20, INSTRUCTIONS)
        .color(Color::WHITE)
        .align_left()
        .align_bottom();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_image_yields_copies() {
        let mut image = Image::new(4, 3);
        image.set(1, 1, Color::BLUE);
        let mut source = StillImage::new(image.clone(), 2);
        assert!(source.read().unwrap().unwrap() == image);
        assert!(source.read().unwrap().unwrap() == image);
        assert!(source.read().unwrap().is_none());
        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn status_is_drawn() {
        let mut frame = Image::new(320, 240);
        draw_status(
            &mut frame,
            &FrameStatus {
                any_flagged: false,
                detections: 3,
            },
        );
        assert!(frame.data().chunks(4).any(|px| px == [255, 255, 255, 255]));
        assert_eq!(frame.resolution(), crate::resolution::Resolution::new(320, 240));
    }

    #[test]
    fn status_fits_tiny_frames() {
        let mut frame = Image::new(8, 8);
        draw_status(
            &mut frame,
            &FrameStatus {
                any_flagged: true,
                detections: 1,
            },
        );
        assert_eq!(frame.width(), 8);
    }
}
