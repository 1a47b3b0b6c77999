//! Common code for visual landmarks.
//!
//! Landmark coordinates produced by landmark estimators are normalized to the `[0, 1]` range
//! relative to the width and height of the image they were computed from. X points right, Y points
//! *down* (like image rows), and Z is a relative depth that is carried along but not interpreted.

use crate::resolution::Resolution;

type Position = [f32; 3];

/// An immutable list of landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.positions.iter().map(|&pos| Landmark::new(pos))
    }

    /// Returns the landmark at `index`, or `None` if there is no such landmark.
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.positions.get(index).map(|&pos| Landmark::new(pos))
    }

    /// Projects the X and Y coordinates of all landmarks into the pixel space of an image with the
    /// given resolution.
    pub fn project(&self, res: Resolution) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.iter().map(move |lm| res.project(lm.x(), lm.y()))
    }
}

impl FromIterator<Landmark> for Landmarks {
    fn from_iter<T: IntoIterator<Item = Landmark>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().map(|lm| lm.pos).collect(),
        }
    }
}

impl From<Vec<Landmark>> for Landmarks {
    fn from(landmarks: Vec<Landmark>) -> Self {
        landmarks.into_iter().collect()
    }
}

/// A landmark in normalized image coordinates.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: [f32; 3],
}

impl Landmark {
    pub fn new(position: [f32; 3]) -> Self {
        Self { pos: position }
    }

    /// Creates a landmark with a depth of 0.
    pub fn xy(x: f32, y: f32) -> Self {
        Self::new([x, y, 0.0])
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }
}
