//! Integer Manhattan geometry used by the layout generator.
//!
//! The rest of the crate only relies on the narrow [`GeometryKernel`]
//! capability; [`ManhattanKernel`] is the rectilinear implementation
//! that ships with the crate.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod kernel;
pub mod rect;
pub mod region;

pub use kernel::{GeometryKernel, ManhattanKernel};
pub use rect::{Point, Rect, Span};
pub use region::Region;

/// The integer type used for all layout coordinates, in grid units.
pub type Int = i64;

/// A shape stored in a layer collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rect(Rect),
    Region(Region),
}

impl Shape {
    /// The axis-aligned bounding box of the shape.
    ///
    /// Returns [`None`] for an empty region.
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            Self::Region(r) => r.bbox(),
        }
    }

    pub fn area(&self) -> i128 {
        match self {
            Self::Rect(r) => r.area(),
            Self::Region(r) => r.area(),
        }
    }
}

impl From<Rect> for Shape {
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<Region> for Shape {
    fn from(value: Region) -> Self {
        Self::Region(value)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rect(r) => write!(f, "{r}"),
            Self::Region(r) => write!(f, "region({} rects)", r.rects().len()),
        }
    }
}
