//! Points, spans and axis-aligned rectangles.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Int;

/// A point in two-dimensional layout space.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Point {
    pub x: Int,
    pub y: Int,
}

impl Point {
    #[inline]
    pub const fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }
}

/// A closed one-dimensional interval `[start, stop]`.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Span {
    start: Int,
    stop: Int,
}

impl Span {
    /// Creates a span, sorting the endpoints if needed.
    pub fn new(a: Int, b: Int) -> Self {
        Self {
            start: a.min(b),
            stop: a.max(b),
        }
    }

    #[inline]
    pub const fn start(&self) -> Int {
        self.start
    }

    #[inline]
    pub const fn stop(&self) -> Int {
        self.stop
    }

    #[inline]
    pub const fn length(&self) -> Int {
        self.stop - self.start
    }

    /// Length of the overlap between two spans.
    ///
    /// Negative if the spans are separated, zero if they only touch.
    #[inline]
    pub fn overlap(&self, other: &Span) -> Int {
        self.stop.min(other.stop) - self.start.max(other.start)
    }
}

/// An axis-aligned rectangle, specified by its four sides.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    left: Int,
    bot: Int,
    right: Int,
    top: Int,
}

impl Rect {
    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Panics
    ///
    /// Panics if `left > right` or `bot > top`.
    #[inline]
    pub fn from_sides(left: Int, bot: Int, right: Int, top: Int) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({left}) <= right ({right})"
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({bot}) <= top ({top})"
        );
        Self {
            left,
            bot,
            right,
            top,
        }
    }

    #[inline]
    pub const fn left(&self) -> Int {
        self.left
    }

    #[inline]
    pub const fn bot(&self) -> Int {
        self.bot
    }

    #[inline]
    pub const fn right(&self) -> Int {
        self.right
    }

    #[inline]
    pub const fn top(&self) -> Int {
        self.top
    }

    #[inline]
    pub const fn width(&self) -> Int {
        self.right - self.left
    }

    #[inline]
    pub const fn height(&self) -> Int {
        self.top - self.bot
    }

    #[inline]
    pub fn hspan(&self) -> Span {
        Span::new(self.left, self.right)
    }

    #[inline]
    pub fn vspan(&self) -> Span {
        Span::new(self.bot, self.top)
    }

    pub fn area(&self) -> i128 {
        self.width() as i128 * self.height() as i128
    }

    /// True if the rectangle encloses no area.
    ///
    /// Inverted rectangles (only reachable through deserialization) count as
    /// degenerate.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// The exact horizontal center of the rectangle.
    pub fn center_x(&self) -> Decimal {
        (Decimal::from(self.left) + Decimal::from(self.right)) / Decimal::TWO
    }

    /// Moves the rectangle by `p`, or [`None`] if a side overflows.
    pub fn checked_translate(&self, p: Point) -> Option<Self> {
        Some(Self {
            left: self.left.checked_add(p.x)?,
            bot: self.bot.checked_add(p.y)?,
            right: self.right.checked_add(p.x)?,
            top: self.top.checked_add(p.y)?,
        })
    }

    /// Mirrors the rectangle about the horizontal line `y = axis2 / 2`.
    ///
    /// The axis is given in half-units so that mirroring about the center of
    /// an odd-height box stays on grid. Returns [`None`] on overflow.
    pub fn checked_reflect_vert(&self, axis2: Int) -> Option<Self> {
        Some(Self {
            left: self.left,
            bot: axis2.checked_sub(self.top)?,
            right: self.right,
            top: axis2.checked_sub(self.bot)?,
        })
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn bounding_union(&self, other: &Rect) -> Self {
        Self {
            left: self.left.min(other.left),
            bot: self.bot.min(other.bot),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// True if the two rectangles overlap or share a boundary segment of
    /// positive length. Rectangles meeting only at a corner are not connected.
    pub fn connects(&self, other: &Rect) -> bool {
        let xo = self.hspan().overlap(&other.hspan());
        let yo = self.vspan().overlap(&other.vspan());
        (xo > 0 && yo >= 0) || (xo >= 0 && yo > 0)
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[({}, {}), ({}, {})]",
            self.left, self.bot, self.right, self.top
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_rect_center_is_exact() {
        let r = Rect::from_sides(0, 0, 15, 10);
        assert_eq!(r.center_x(), dec!(7.5));
        assert_eq!(Rect::from_sides(-3, 0, 0, 1).center_x(), dec!(-1.5));
    }

    #[test]
    fn test_reflect_vert() {
        let r = Rect::from_sides(0, 16, 100, 30);
        let m = r.checked_reflect_vert(60).unwrap();
        assert_eq!(m, Rect::from_sides(0, 30, 100, 44));
        assert_eq!(m.checked_reflect_vert(60), Some(r));
        assert_eq!(r.checked_reflect_vert(Int::MIN), None);
    }

    #[test]
    fn test_connects() {
        let a = Rect::from_sides(0, 0, 10, 10);
        assert!(a.connects(&Rect::from_sides(5, 5, 20, 20)));
        assert!(a.connects(&Rect::from_sides(10, 0, 20, 10)));
        assert!(!a.connects(&Rect::from_sides(10, 10, 20, 20)));
        assert!(!a.connects(&Rect::from_sides(11, 0, 20, 10)));
    }

    #[test]
    fn test_checked_translate() {
        let r = Rect::from_sides(0, 16, 100, 30);
        assert_eq!(
            r.checked_translate(Point::new(5, 60)),
            Some(Rect::from_sides(5, 76, 105, 90))
        );
        assert_eq!(r.checked_translate(Point::new(0, Int::MAX)), None);
    }
}
