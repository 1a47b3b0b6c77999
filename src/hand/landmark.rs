//! Hand landmarks.

use crate::image::{draw, Color, Image};
use crate::landmark::{Landmark, Landmarks};

/// The landmarks of a single detected hand.
///
/// A well-formed set has exactly [`HandLandmarks::NUM_LANDMARKS`] entries, ordered as listed in
/// [`LandmarkIdx`]. Sets of any other length can still be constructed, since they are produced by
/// an external estimator, but [`HandLandmarks::landmark`] will not return anything for them.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    landmarks: Landmarks,
}

impl HandLandmarks {
    pub const NUM_LANDMARKS: usize = 21;

    pub fn new(landmarks: impl Into<Landmarks>) -> Self {
        Self {
            landmarks: landmarks.into(),
        }
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Returns `true` if this set has exactly [`HandLandmarks::NUM_LANDMARKS`] entries.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.len() == Self::NUM_LANDMARKS
    }

    /// Returns the landmark named by `idx`.
    ///
    /// Returns `None` if this landmark set is not complete.
    pub fn landmark(&self, idx: LandmarkIdx) -> Option<Landmark> {
        if !self.is_complete() {
            return None;
        }
        self.landmarks.get(idx as usize)
    }

    /// Draws the hand skeleton onto `image`.
    ///
    /// Incomplete landmark sets are drawn as unconnected markers.
    pub fn draw(&self, image: &mut Image) {
        let res = image.resolution();
        let positions = self.landmarks.project(res).collect::<Vec<_>>();

        if self.is_complete() {
            for &(a, b) in CONNECTIVITY {
                let (ax, ay) = positions[a as usize];
                let (bx, by) = positions[b as usize];
                draw::line(image, ax, ay, bx, by)
                    .color(Color::GREEN)
                    .stroke_width(2);
            }
        }
        for (x, y) in positions {
            draw::marker(image, x, y).color(Color::RED);
        }
    }
}

impl From<Vec<Landmark>> for HandLandmarks {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(len: usize) -> HandLandmarks {
        HandLandmarks::new(
            (0..len)
                .map(|i| Landmark::xy(0.2 + i as f32 * 0.03, 0.1 + i as f32 * 0.04))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn anatomical_indices() {
        assert_eq!(LandmarkIdx::Wrist as usize, 0);
        assert_eq!(LandmarkIdx::ThumbTip as usize, 4);
        assert_eq!(LandmarkIdx::IndexFingerPip as usize, 6);
        assert_eq!(LandmarkIdx::IndexFingerTip as usize, 8);
        assert_eq!(LandmarkIdx::MiddleFingerPip as usize, 10);
        assert_eq!(LandmarkIdx::MiddleFingerTip as usize, 12);
        assert_eq!(LandmarkIdx::RingFingerTip as usize, 16);
        assert_eq!(LandmarkIdx::PinkyTip as usize, 20);
        assert_eq!(CONNECTIVITY.len(), 21);
    }

    #[test]
    fn incomplete_sets_have_no_named_landmarks() {
        assert!(hand(21).is_complete());
        assert!(hand(21).landmark(LandmarkIdx::PinkyTip).is_some());
        assert_eq!(hand(20).landmark(LandmarkIdx::Wrist), None);
        assert_eq!(hand(22).landmark(LandmarkIdx::Wrist), None);
        assert!(hand(0).is_empty());
    }

    #[test]
    fn draw_skeleton() {
        let mut image = Image::new(64, 64);
        hand(21).draw(&mut image);
        assert_eq!(image.resolution(), crate::resolution::Resolution::new(64, 64));
        assert!(image.data().iter().any(|&b| b != 0));

        let mut image = Image::new(64, 64);
        hand(3).draw(&mut image);
        let (x, y) = (0.2 * 64.0, 0.1 * 64.0);
        assert_eq!(image.get(x as u32, y as u32), Color::RED);
    }
}
