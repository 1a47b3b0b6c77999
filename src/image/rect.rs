use std::fmt;

use embedded_graphics::prelude::*;

/// An axis-aligned rectangle.
///
/// This rectangle type uses (signed) integer pixel coordinates and is meant to be used with the
/// [`crate::image`] module. It covers the half-open ranges `x()..x() + width()` and
/// `y()..y() + height()`.
///
/// Rectangles are allowed to have zero height and/or width.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub(crate) rect: embedded_graphics::primitives::Rectangle,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: i32, top_left_y: i32, width: u32, height: u32) -> Self {
        Self {
            rect: embedded_graphics::primitives::Rectangle {
                top_left: Point {
                    x: top_left_x,
                    y: top_left_y,
                },
                size: Size { width, height },
            },
        }
    }

    /// Creates a rectangle spanning the half-open ranges `x_min..x_max` and `y_min..y_max`.
    ///
    /// If a maximum is smaller than its minimum, the resulting rectangle has a width or height of
    /// 0.
    pub fn span(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        let width = (i64::from(x_max) - i64::from(x_min)).max(0);
        let height = (i64::from(y_max) - i64::from(y_min)).max(0);
        Self::from_top_left(
            x_min,
            y_min,
            u32::try_from(width).unwrap_or(u32::MAX),
            u32::try_from(height).unwrap_or(u32::MAX),
        )
    }

    /// Grows each side of this rectangle by `amount` pixels.
    #[must_use]
    pub fn grow(&self, amount: u32) -> Self {
        let amount = i64::from(amount);
        let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self::span(
            clamp(i64::from(self.x()) - amount),
            clamp(i64::from(self.y()) - amount),
            clamp(self.x_end() + amount),
            clamp(self.y_end() + amount),
        )
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> i32 {
        self.rect.top_left.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> i32 {
        self.rect.top_left.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.rect.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.rect.size.height
    }

    /// Returns the exclusive X coordinate of the right side.
    #[inline]
    pub fn x_end(&self) -> i64 {
        i64::from(self.x()) + i64::from(self.width())
    }

    /// Returns the exclusive Y coordinate of the bottom side.
    #[inline]
    pub fn y_end(&self) -> i64 {
        i64::from(self.y()) + i64::from(self.height())
    }

    /// Returns the number of pixels covered by this rectangle.
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Returns `true` if this rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Computes the intersection of `self` and `other`.
    ///
    /// Returns `None` when the intersection is empty (ie. the rectangles do not overlap).
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x_min = self.x().max(other.x());
        let y_min = self.y().max(other.y());
        let x_max = self.x_end().min(other.x_end());
        let y_max = self.y_end().min(other.y_end());
        if i64::from(x_min) >= x_max || i64::from(y_min) >= y_max {
            return None;
        }
        // Both maxima are bounded by an `i32` start plus a `u32` size of the same rectangle and
        // larger than an `i32` minimum, so the width and height fit into a `u32`.
        Some(Rect::from_top_left(
            x_min,
            y_min,
            (x_max - i64::from(x_min)) as u32,
            (y_max - i64::from(y_min)) as u32,
        ))
    }

    /// Returns whether `self` contains `other`.
    ///
    /// Empty rectangles are contained in `self` if their position lies within `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.x() <= other.x()
            && self.y() <= other.y()
            && self.x_end() >= other.x_end()
            && self.y_end() >= other.y_end()
    }

    /// Returns whether the pixel at `(x, y)` lies inside of `self`.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        i64::from(self.x()) <= x && x < self.x_end() && i64::from(self.y()) <= y && y < self.y_end()
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = (self.x(), self.y());
        let (w, h) = (self.width(), self.height());
        let (bx, by) = (self.x_end(), self.y_end());
        write!(f, "Rect @ ({x},{y})-({bx},{by})/{w}x{h}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_rect() {
        let outer = Rect::from_top_left(-8, -8, 16, 16);
        assert!(outer.contains_rect(&outer));
        assert!(outer.contains_rect(&Rect::from_top_left(-8, -8, 15, 15)));
        assert!(outer.contains_rect(&Rect::from_top_left(-7, -7, 15, 15)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-7, -8, 16, 16)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-8, -7, 16, 16)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-8, -8, 17, 16)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-9, -8, 10, 10)));
    }

    #[test]
    fn test_intersection() {
        assert_eq!(
            Rect::span(0, 0, 11, 11).intersection(&Rect::span(5, 5, 6, 6)),
            Some(Rect::span(5, 5, 6, 6))
        );
        assert_eq!(
            Rect::span(5, 5, 6, 6).intersection(&Rect::span(0, 0, 11, 11)),
            Some(Rect::span(5, 5, 6, 6))
        );
        assert_eq!(Rect::span(5, 5, 6, 6).intersection(&Rect::span(6, 0, 11, 11)), None);
        assert_eq!(Rect::span(-20, -20, -5, 40).intersection(&Rect::span(0, 0, 10, 10)), None);
    }

    #[test]
    fn test_span_and_grow() {
        assert!(Rect::span(5, 5, 5, 9).is_empty());
        assert!(Rect::span(5, 5, 2, 9).is_empty());
        assert_eq!(Rect::span(0, 0, 4, 2).grow(1), Rect::span(-1, -1, 5, 3));
        assert_eq!(Rect::span(3, 3, 3, 3).grow(2), Rect::from_top_left(1, 1, 4, 4));
    }

    #[test]
    fn test_contains() {
        let rect = Rect::span(0, 0, 3, 2);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(2, 1));
        assert!(!rect.contains(3, 1));
        assert!(!rect.contains(2, 2));
        assert!(!rect.contains(-1, 0));
    }
}
