//! Per-frame gesture detection and redaction.
//!
//! [`Pipeline::process`] runs the whole core for one frame: it asks a [`LandmarkProvider`] for the
//! hands in the frame, classifies each of them independently, redacts and marks every flagged
//! hand, and records the frame in the caller's [`DetectionSession`].

use crate::config::Config;
use crate::hand::gesture::{classify, Verdict};
use crate::hand::landmark::HandLandmarks;
use crate::image::{draw, Color, Image};
use crate::redact::{Redaction, Redactor};
use crate::timer::Timer;

/// Text drawn onto frames that contain a flagged hand.
pub const WARNING_TEXT: &str = "INAPPROPRIATE GESTURE DETECTED!";

/// Options forwarded to a [`LandmarkProvider`].
///
/// The pipeline itself does not interpret any of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderOptions {
    /// Maximum number of hands to report per frame.
    pub max_hands: usize,
    /// Minimum confidence for a new hand detection to be reported.
    pub min_detection_confidence: f32,
    /// Minimum confidence for a tracked hand to keep being reported.
    pub min_tracking_confidence: f32,
    /// Whether every frame should be treated as an unrelated still image.
    pub static_image_mode: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_hands: 2,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
            static_image_mode: false,
        }
    }
}

/// Supplies hand landmarks for video frames.
///
/// Implementations wrap a hand landmark estimator. Landmark positions must be normalized to the
/// frame's width and height, and every returned hand should have its landmarks in
/// [`LandmarkIdx`] order.
///
/// [`LandmarkIdx`]: crate::hand::landmark::LandmarkIdx
pub trait LandmarkProvider {
    /// Returns the landmarks of every hand visible in `frame`.
    fn detect(&mut self, frame: &Image) -> anyhow::Result<Vec<HandLandmarks>>;
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for &mut P {
    fn detect(&mut self, frame: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        (**self).detect(frame)
    }
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for Box<P> {
    fn detect(&mut self, frame: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        (**self).detect(frame)
    }
}

/// Draws annotations for hands that were not flagged.
pub trait Annotator {
    fn annotate_normal(&mut self, frame: &mut Image, hand: &HandLandmarks);
}

/// Does not draw anything.
impl Annotator for () {
    fn annotate_normal(&mut self, _: &mut Image, _: &HandLandmarks) {}
}

/// The default [`Annotator`], which optionally draws the hand skeleton.
#[derive(Debug, Clone, Copy)]
pub struct Overlay {
    skeleton: bool,
}

impl Overlay {
    pub fn new(skeleton: bool) -> Self {
        Self { skeleton }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Annotator for Overlay {
    fn annotate_normal(&mut self, frame: &mut Image, hand: &HandLandmarks) {
        if self.skeleton {
            hand.draw(frame);
        }
    }
}

/// Counts the frames in which a flagged gesture was detected.
///
/// The session is owned by the frame loop and handed to [`Pipeline::process`] for every frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetectionSession {
    detections: u64,
}

impl DetectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of frames with at least one flagged hand since the last reset.
    #[inline]
    pub fn detections(&self) -> u64 {
        self.detections
    }

    /// Sets the detection count back to 0.
    pub fn reset(&mut self) {
        self.detections = 0;
    }

    fn record_frame(&mut self, any_flagged: bool) {
        if any_flagged {
            self.detections += 1;
        }
    }
}

/// What happened to a single hand during [`Pipeline::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandOutcome {
    /// The final verdict for the hand.
    pub verdict: Verdict,
    /// The redaction applied to the hand's region, for flagged hands.
    pub redaction: Option<Redaction>,
}

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// One entry per hand reported by the provider, in provider order.
    pub hands: Vec<HandOutcome>,
    /// The session's detection count after this frame.
    pub detections: u64,
}

impl FrameReport {
    /// Returns `true` if at least one hand in the frame was flagged.
    pub fn any_flagged(&self) -> bool {
        self.hands.iter().any(|hand| hand.verdict.is_flagged())
    }
}

/// Frame processing pipeline.
pub struct Pipeline<P, A = Overlay> {
    provider: P,
    annotator: A,
    redactor: Redactor,
    t_detect: Timer,
    t_classify: Timer,
    t_redact: Timer,
}

impl<P: LandmarkProvider> Pipeline<P> {
    /// Creates a pipeline that reads hands from `provider` and redacts them as configured in
    /// `config`.
    pub fn new(provider: P, config: &Config) -> Self {
        Self {
            provider,
            annotator: Overlay::new(config.draw_skeleton),
            redactor: Redactor::new(config.padding, config.blur_kernel),
            t_detect: Timer::new("detect"),
            t_classify: Timer::new("classify"),
            t_redact: Timer::new("redact"),
        }
    }
}

impl<P: LandmarkProvider, A: Annotator> Pipeline<P, A> {
    /// Replaces the [`Annotator`] used for hands that are not flagged.
    pub fn with_annotator<B: Annotator>(self, annotator: B) -> Pipeline<P, B> {
        Pipeline {
            provider: self.provider,
            annotator,
            redactor: self.redactor,
            t_detect: self.t_detect,
            t_classify: self.t_classify,
            t_redact: self.t_redact,
        }
    }

    /// Returns profiling timers for the stages of the pipeline.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        [&self.t_detect, &self.t_classify, &self.t_redact].into_iter()
    }

    /// Processes a single frame in place.
    ///
    /// Every flagged hand gets its region blurred and the frame gets a warning marker. The
    /// `session` is advanced by exactly one detection if any hand was flagged, no matter how many.
    ///
    /// Failures are contained: if the provider fails, the frame is treated as containing no hands,
    /// and if a hand cannot be redacted, that hand is treated as [`Verdict::Normal`].
    pub fn process(&mut self, frame: &mut Image, session: &mut DetectionSession) -> FrameReport {
        let hands = match self.t_detect.time(|| self.provider.detect(frame)) {
            Ok(hands) => hands,
            Err(e) => {
                log::warn!("landmark provider failed on {:?}: {:#}", frame, e);
                Vec::new()
            }
        };

        let hands = hands
            .iter()
            .map(|hand| self.process_hand(frame, hand))
            .collect::<Vec<_>>();

        let any_flagged = hands.iter().any(|hand| hand.verdict.is_flagged());
        session.record_frame(any_flagged);
        FrameReport {
            hands,
            detections: session.detections(),
        }
    }

    fn process_hand(&mut self, frame: &mut Image, hand: &HandLandmarks) -> HandOutcome {
        let verdict = self.t_classify.time(|| classify(hand));

        if verdict == Verdict::Flagged {
            match self.t_redact.time(|| self.redactor.redact(frame, hand)) {
                Ok(redaction) => {
                    log::trace!("flagged hand redacted: {:?}", redaction);
                    draw::text(frame, 50, 50, WARNING_TEXT)
                        .color(Color::RED)
                        .size(draw::FontSize::Large)
                        .align_left()
                        .align_bottom();
                    return HandOutcome {
                        verdict,
                        redaction: Some(redaction),
                    };
                }
                Err(e) => {
                    log::warn!("failed to redact flagged hand, treating it as normal: {}", e);
                }
            }
        }

        self.annotator.annotate_normal(frame, hand);
        HandOutcome {
            verdict: Verdict::Normal,
            redaction: None,
        }
    }
}
