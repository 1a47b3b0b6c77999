//! Hand gesture detection and redaction for live video.
//!
//! Frames are processed by a [`pipeline::Pipeline`]: a [`pipeline::LandmarkProvider`] reports the
//! hands visible in a frame, every hand is classified by [`hand::gesture::classify`], and the
//! region of every flagged hand is blurred by a [`redact::Redactor`]. [`capture::run`] drives the
//! pipeline from a frame source and keeps the [`pipeline::DetectionSession`] counter.
//!
//! # Coordinates
//!
//! Landmark coordinates are normalized to the frame: X goes from 0 at the left edge to 1 at the
//! right edge, and Y goes from 0 at the top edge to 1 at the bottom edge, so Y points *down*.
//! Pixel positions are obtained by multiplying with the frame's width and height and truncating.
//!
//! # Environment Variables
//!
//! [`config::Config::from_env`] reads the following variables:
//!
//! * `FINGERBAN_PADDING`: pixels added around the bounding box of a flagged hand (default 50).
//! * `FINGERBAN_BLUR_KERNEL`: size of the redaction blur kernel; must be odd (default 51).
//! * `FINGERBAN_MAX_HANDS`: maximum number of hands reported per frame (default 2).
//! * `FINGERBAN_MIN_DETECTION_CONFIDENCE`: forwarded to the landmark provider (default 0.7).
//! * `FINGERBAN_MIN_TRACKING_CONFIDENCE`: forwarded to the landmark provider (default 0.5).
//! * `FINGERBAN_MIRROR`: whether frames are mirrored before processing (default `true`).
//!
//! Log output is controlled by `RUST_LOG`, see [`init_logger!`].

use log::LevelFilter;

pub mod capture;
pub mod config;
pub mod drop;
pub mod fixture;
pub mod hand;
pub mod image;
pub mod landmark;
pub mod pipeline;
pub mod redact;
pub mod resolution;
pub mod timer;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library log at *debug* level, unless overridden by `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
