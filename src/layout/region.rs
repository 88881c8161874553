//! Region merging and shape queries over generated layers.

use rust_decimal::Decimal;

use super::rules::{NDIFF, PDIFF};
use super::ShapeMap;
use crate::geometry::{GeometryKernel, Shape};

fn layer_region<K: GeometryKernel>(kernel: &K, shapes: &[Shape]) -> K::Region {
    let rects = shapes.iter().flat_map(|shape| match shape {
        Shape::Rect(r) => vec![*r],
        Shape::Region(r) => r.rects().to_vec(),
    });
    let region = rects.fold(kernel.empty(), |acc, r| {
        kernel.union(&acc, &kernel.region_from_rect(r))
    });
    kernel.merge(region)
}

/// Merges the p- and n-type diffusion shapes into one canonical region.
///
/// Each polarity is merged on its own first, then the two results are
/// combined and merged again. The result does not depend on the order in
/// which shapes were inserted.
pub fn calculate_nanosheet_region<K: GeometryKernel>(kernel: &K, shapes: &ShapeMap) -> K::Region {
    let p = layer_region(kernel, shapes.layer(PDIFF));
    let n = layer_region(kernel, shapes.layer(NDIFF));
    kernel.merge(kernel.union(&p, &n))
}

/// The horizontal bounding-box center of every shape on `layer`.
///
/// Centers are listed in insertion order, one per shape, so index `i` is the
/// center of `shapes.layer(layer)[i]`. A layer without shapes yields an
/// empty list.
pub fn polygon_centers(shapes: &ShapeMap, layer: &str) -> Vec<Decimal> {
    shapes
        .layer(layer)
        .iter()
        .filter_map(Shape::bbox)
        .map(|bbox| bbox.center_x())
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::geometry::{ManhattanKernel, Rect, Region};
    use crate::layout::rules::{NWELL, PWELL};

    #[test]
    fn test_overlapping_diffusion_merges() {
        let mut shapes = ShapeMap::new();
        shapes.insert(PDIFF, Rect::from_sides(0, 0, 10, 10));
        shapes.insert(PDIFF, Rect::from_sides(5, 0, 15, 10));
        let region = calculate_nanosheet_region(&ManhattanKernel, &shapes);
        assert_eq!(region.area(), 150);
        assert_eq!(region.components().len(), 1);
        assert_eq!(region.rects(), &[Rect::from_sides(0, 0, 15, 10)]);
    }

    #[test]
    fn test_disjoint_diffusion_stays_separate() {
        let mut shapes = ShapeMap::new();
        shapes.insert(NDIFF, Rect::from_sides(0, 0, 10, 10));
        shapes.insert(NDIFF, Rect::from_sides(20, 0, 30, 10));
        let region = calculate_nanosheet_region(&ManhattanKernel, &shapes);
        assert_eq!(region.area(), 200);
        assert_eq!(region.components().len(), 2);
    }

    #[test]
    fn test_both_polarities_are_combined() {
        let mut shapes = ShapeMap::new();
        shapes.insert(PDIFF, Rect::from_sides(0, 32, 20, 42));
        shapes.insert(NDIFF, Rect::from_sides(0, 18, 20, 28));
        shapes.insert(NDIFF, Rect::from_sides(10, 18, 30, 28));
        // Wells do not contribute.
        shapes.insert(NWELL, Rect::from_sides(0, 0, 100, 100));
        let region = calculate_nanosheet_region(&ManhattanKernel, &shapes);
        assert_eq!(region.area(), 200 + 300);
        assert_eq!(region.components().len(), 2);
        assert_eq!(region.bbox(), Some(Rect::from_sides(0, 18, 30, 42)));
    }

    #[test]
    fn test_region_is_order_independent() {
        let rects = [
            Rect::from_sides(0, 0, 10, 10),
            Rect::from_sides(5, 5, 15, 15),
            Rect::from_sides(40, 0, 50, 10),
        ];
        let mut forward = ShapeMap::new();
        let mut backward = ShapeMap::new();
        for r in rects {
            forward.insert(PDIFF, r);
        }
        for r in rects.into_iter().rev() {
            backward.insert(PDIFF, r);
        }
        assert_eq!(
            calculate_nanosheet_region(&ManhattanKernel, &forward),
            calculate_nanosheet_region(&ManhattanKernel, &backward)
        );
    }

    #[test]
    fn test_merged_regions_are_accepted_as_input() {
        let mut shapes = ShapeMap::new();
        shapes.insert(
            PDIFF,
            Region::from_rects([Rect::from_sides(0, 0, 10, 10), Rect::from_sides(0, 10, 5, 20)]),
        );
        shapes.insert(PDIFF, Rect::from_sides(5, 10, 10, 20));
        let region = calculate_nanosheet_region(&ManhattanKernel, &shapes);
        assert_eq!(region.rects(), &[Rect::from_sides(0, 0, 10, 20)]);
    }

    #[test]
    fn test_no_diffusion_gives_empty_region() {
        let region = calculate_nanosheet_region(&ManhattanKernel, &ShapeMap::new());
        assert!(region.is_empty());
    }

    #[test]
    fn test_polygon_centers() {
        let mut shapes = ShapeMap::new();
        shapes.insert(PDIFF, Rect::from_sides(0, 0, 10, 10));
        shapes.insert(PDIFF, Rect::from_sides(10, 0, 20, 10));
        shapes.insert(PDIFF, Rect::from_sides(20, 0, 30, 10));
        assert_eq!(
            polygon_centers(&shapes, PDIFF),
            vec![dec!(5), dec!(15), dec!(25)]
        );
        assert!(polygon_centers(&shapes, PWELL).is_empty());
    }

    #[test]
    fn test_polygon_centers_keep_insertion_order() {
        let mut shapes = ShapeMap::new();
        shapes.insert(NDIFF, Rect::from_sides(20, 0, 31, 10));
        shapes.insert(NDIFF, Region::from_rect(Rect::from_sides(0, 0, 10, 10)));
        shapes.insert(NDIFF, Region::new());
        assert_eq!(shapes.layer(NDIFF).len(), 2);
        assert_eq!(polygon_centers(&shapes, NDIFF), vec![dec!(25.5), dec!(5)]);
    }
}
