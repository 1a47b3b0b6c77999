//! Pose classification of human hands.
//!
//! Hands are described by the 21 [`landmark::LandmarkIdx`] points produced by an external hand
//! landmark estimator. The [`gesture`] module classifies them.

pub mod gesture;
pub mod landmark;
