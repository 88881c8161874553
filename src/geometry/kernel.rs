use super::{Rect, Region};

/// The geometric capability required by the region utilities.
///
/// Implementations must be pure: the result of every operation depends only
/// on its arguments. The core never asks a kernel to mutate shared state, so
/// a kernel that is `Sync` may be shared freely across worker threads.
pub trait GeometryKernel {
    /// The kernel's representation of a (possibly disconnected) region.
    type Region: Clone;

    /// Builds a region covering exactly `rect`.
    fn region_from_rect(&self, rect: Rect) -> Self::Region;

    /// The boolean union of two regions.
    fn union(&self, a: &Self::Region, b: &Self::Region) -> Self::Region;

    /// Rewrites a region as a minimal set of disjoint shapes.
    fn merge(&self, region: Self::Region) -> Self::Region;

    /// The bounding box of a region, or [`None`] if it is empty.
    fn bbox(&self, region: &Self::Region) -> Option<Rect>;

    /// An empty region.
    fn empty(&self) -> Self::Region;
}

/// A kernel for rectilinear geometry backed by [`Region`].
///
/// [`Region`] is canonical on construction, so [`GeometryKernel::merge`] is
/// the identity here.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ManhattanKernel;

impl GeometryKernel for ManhattanKernel {
    type Region = Region;

    fn region_from_rect(&self, rect: Rect) -> Region {
        Region::from_rect(rect)
    }

    fn union(&self, a: &Region, b: &Region) -> Region {
        a.union(b)
    }

    fn merge(&self, region: Region) -> Region {
        region
    }

    fn bbox(&self, region: &Region) -> Option<Rect> {
        region.bbox()
    }

    fn empty(&self) -> Region {
        Region::new()
    }
}
