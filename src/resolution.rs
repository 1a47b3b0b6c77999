//! Types for representing image resolutions.

use std::fmt;

use crate::image::Rect;

/// Resolution (`width x height`) of an image, video frame or camera.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Creates a new [`Resolution`] of `width x height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width of this [`Resolution`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this [`Resolution`].
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a [`Rect`] positioned at `(0, 0)` that covers the whole resolution.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0, 0, self.width, self.height)
    }

    /// Projects coordinates normalized to `[0, 1]` onto this resolution.
    ///
    /// The fractional part is truncated towards zero. Coordinates outside of `[0, 1]` result in
    /// pixel positions outside of the resolution. NaN maps to 0 and
    /// infinities saturate to `i32::MIN` or `i32::MAX`.
    pub fn project(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x * self.width as f32) as i32,
            (y * self.height as f32) as i32,
        )
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project() {
        let res = Resolution::new(640, 480);
        assert_eq!(res.project(0.0, 0.0), (0, 0));
        assert_eq!(res.project(0.5, 0.5), (320, 240));
        assert_eq!(res.project(1.0, 1.0), (640, 480));
        assert_eq!(res.project(0.999, 0.001), (639, 0));
        assert_eq!(res.project(-0.001, 1.5), (0, 720));
        assert_eq!(res.project(-0.5, f32::NAN), (-320, 0));
        assert_eq!(
            res.project(f32::INFINITY, f32::NEG_INFINITY),
            (i32::MAX, i32::MIN)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Resolution::new(1280, 720).to_string(), "1280x720");
        assert_eq!(Resolution::new(3, 2).rect(), Rect::from_top_left(0, 0, 3, 2));
    }
}
