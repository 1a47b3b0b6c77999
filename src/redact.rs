//! Redaction of hand regions in video frames.

use itertools::Itertools;
use thiserror::Error;

use crate::hand::landmark::HandLandmarks;
use crate::image::{gaussian_blur, BlurKernel, Image, Rect};
use crate::resolution::Resolution;

/// Errors that prevent a hand region from being redacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedactError {
    #[error("hand has {0} landmarks (expected {n})", n = HandLandmarks::NUM_LANDMARKS)]
    WrongLandmarkCount(usize),
    #[error("hand landmark {0} has a non-finite coordinate")]
    NonFiniteLandmark(usize),
}

/// Outcome of a successful [`Redactor::redact`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    /// The given frame region was blurred.
    Applied(Rect),
    /// The padded hand region did not cover any pixel of the frame, so nothing was changed.
    Skipped,
}

/// Blurs the image region covered by a hand.
#[derive(Debug, Clone, Copy)]
pub struct Redactor {
    padding: u32,
    kernel: BlurKernel,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PADDING, BlurKernel::DEFAULT)
    }
}

impl Redactor {
    /// The default padding of 50 pixels added around the hand.
    pub const DEFAULT_PADDING: u32 = 50;

    /// Creates a redactor that pads hand regions by `padding` pixels on each side and blurs them
    /// using `kernel`.
    pub fn new(padding: u32, kernel: BlurKernel) -> Self {
        Self { padding, kernel }
    }

    #[inline]
    pub fn padding(&self) -> u32 {
        self.padding
    }

    #[inline]
    pub fn kernel(&self) -> BlurKernel {
        self.kernel
    }

    /// Computes the frame region covered by `hand`.
    ///
    /// The landmarks are projected into the pixel grid of `res`, their bounding box is padded on
    /// every side and clamped to `0..width` and `0..height`. Returns `Ok(None)` if the clamped
    /// region is empty.
    pub fn region(
        &self,
        hand: &HandLandmarks,
        res: Resolution,
    ) -> Result<Option<Rect>, RedactError> {
        if !hand.is_complete() {
            return Err(RedactError::WrongLandmarkCount(hand.len()));
        }
        if let Some(index) = hand
            .landmarks()
            .iter()
            .position(|lm| !lm.x().is_finite() || !lm.y().is_finite())
        {
            return Err(RedactError::NonFiniteLandmark(index));
        }

        let (xs, ys): (Vec<i32>, Vec<i32>) = hand.landmarks().project(res).unzip();
        let (Some((x_min, x_max)), Some((y_min, y_max))) = (
            xs.into_iter().minmax().into_option(),
            ys.into_iter().minmax().into_option(),
        ) else {
            return Ok(None);
        };

        let rect = Rect::span(x_min, y_min, x_max, y_max).grow(self.padding);
        Ok(rect.intersection(&res.rect()))
    }

    /// Irreversibly blurs the region of `frame` covered by `hand`.
    ///
    /// Frame dimensions never change; only pixels inside the returned region are modified.
    pub fn redact(
        &self,
        frame: &mut Image,
        hand: &HandLandmarks,
    ) -> Result<Redaction, RedactError> {
        let Some(rect) = self.region(hand, frame.resolution())? else {
            log::trace!("hand region of {:?} is empty, skipping redaction", frame);
            return Ok(Redaction::Skipped);
        };

        match gaussian_blur(frame, rect, self.kernel) {
            Some(rect) => Ok(Redaction::Applied(rect)),
            None => Ok(Redaction::Skipped),
        }
    }
}
