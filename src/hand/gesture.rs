//! Classification of hand gestures from landmark geometry.
//!
//! The classifier looks at one [`HandLandmarks`] set at a time and compares the height of each
//! fingertip with the height of the PIP joint of the same finger. Landmark Y coordinates grow
//! downwards, so a fingertip *above* its PIP joint (smaller Y) means that the finger is extended.
//!
//! A hand is [`Verdict::Flagged`] when the middle finger is extended while the index, ring and
//! pinky fingers are all folded. There is no smoothing across frames; every frame is classified
//! from scratch.
//!
//! # Limitations
//!
//! The thumb is not taken into account. Its orientation relative to the camera varies too much for
//! a tip-vs-joint height comparison to say anything reliable about it, so a middle finger gesture
//! is flagged regardless of what the thumb does.

use std::fmt;

use super::landmark::{HandLandmarks, LandmarkIdx};

/// Result of classifying a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The hand does not show a flagged gesture, or its landmarks were unusable.
    Normal,
    /// The hand shows the flagged gesture and should be redacted.
    Flagged,
}

impl Verdict {
    #[inline]
    pub fn is_flagged(self) -> bool {
        self == Self::Flagged
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Normal => "normal",
            Verdict::Flagged => "flagged",
        })
    }
}

/// The non-thumb fingers of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Returns the landmark of the finger's PIP joint.
    pub fn pip(self) -> LandmarkIdx {
        match self {
            Finger::Index => LandmarkIdx::IndexFingerPip,
            Finger::Middle => LandmarkIdx::MiddleFingerPip,
            Finger::Ring => LandmarkIdx::RingFingerPip,
            Finger::Pinky => LandmarkIdx::PinkyPip,
        }
    }

    /// Returns the landmark of the fingertip.
    pub fn tip(self) -> LandmarkIdx {
        match self {
            Finger::Index => LandmarkIdx::IndexFingerTip,
            Finger::Middle => LandmarkIdx::MiddleFingerTip,
            Finger::Ring => LandmarkIdx::RingFingerTip,
            Finger::Pinky => LandmarkIdx::PinkyTip,
        }
    }
}

/// Whether a finger points up or down, judged by the height of its tip relative to its PIP joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerState {
    /// The tip is above the PIP joint.
    Extended,
    /// The tip is below the PIP joint.
    Folded,
    /// The tip is exactly level with the PIP joint, or a coordinate is NaN.
    ///
    /// A level finger counts as neither extended nor folded, so it can never complete the flagged
    /// gesture.
    Level,
}

impl FingerState {
    fn from_heights(tip_y: f32, pip_y: f32) -> Self {
        if tip_y < pip_y {
            FingerState::Extended
        } else if tip_y > pip_y {
            FingerState::Folded
        } else {
            FingerState::Level
        }
    }
}

/// The finger states of a complete hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandPose {
    fingers: [FingerState; 4],
}

impl HandPose {
    /// Computes the pose of `hand`.
    ///
    /// Returns `None` if `hand` does not have exactly [`HandLandmarks::NUM_LANDMARKS`] landmarks.
    pub fn new(hand: &HandLandmarks) -> Option<Self> {
        let mut fingers = [FingerState::Level; 4];
        for (state, finger) in fingers.iter_mut().zip(Finger::ALL) {
            let tip = hand.landmark(finger.tip())?;
            let pip = hand.landmark(finger.pip())?;
            *state = FingerState::from_heights(tip.y(), pip.y());
        }
        Some(Self { fingers })
    }

    pub fn finger(&self, finger: Finger) -> FingerState {
        self.fingers[finger as usize]
    }

    pub fn verdict(&self) -> Verdict {
        use FingerState::*;

        match (
            self.finger(Finger::Index),
            self.finger(Finger::Middle),
            self.finger(Finger::Ring),
            self.finger(Finger::Pinky),
        ) {
            (Folded, Extended, Folded, Folded) => Verdict::Flagged,
            _ => Verdict::Normal,
        }
    }
}

/// Classifies the gesture shown by `hand`.
///
/// Malformed landmark sets (anything but exactly 21 landmarks) are classified as
/// [`Verdict::Normal`].
pub fn classify(hand: &HandLandmarks) -> Verdict {
    match HandPose::new(hand) {
        Some(pose) => pose.verdict(),
        None => {
            log::debug!(
                "ignoring malformed hand with {} landmarks (expected {})",
                hand.len(),
                HandLandmarks::NUM_LANDMARKS
            );
            Verdict::Normal
        }
    }
}
