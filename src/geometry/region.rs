//! Rectilinear regions with a canonical disjoint-rectangle representation.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{Int, Rect};

/// A rectilinear region, stored as a canonical set of disjoint rectangles.
///
/// The representation is made of maximal horizontal strips, with vertically
/// adjacent strips of identical extent coalesced. Two regions covering the
/// same point set therefore compare equal, regardless of how they were built.
/// Deserialized regions are normalized again.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Rect>", into = "Vec<Rect>")]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::from_rects([rect])
    }

    /// Builds the region covered by the union of `rects`.
    ///
    /// Zero-area rectangles cover nothing and are dropped.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            rects: normalize(rects.into_iter().filter(|r| !r.is_degenerate()).collect()),
        }
    }

    /// The canonical disjoint rectangles making up this region.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn area(&self) -> i128 {
        self.rects.iter().map(Rect::area).sum()
    }

    pub fn bbox(&self) -> Option<Rect> {
        self.rects.iter().copied().reduce(|a, b| a.bounding_union(&b))
    }

    pub fn union(&self, other: &Region) -> Region {
        Self::from_rects(self.rects.iter().chain(other.rects.iter()).copied())
    }

    /// Splits the region into its connected pieces.
    ///
    /// Pieces are ordered by their lowest, then leftmost, rectangle.
    pub fn components(&self) -> Vec<Region> {
        let n = self.rects.len();
        let mut parent = (0..n).collect::<Vec<_>>();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for (i, j) in (0..n).tuple_combinations() {
            if self.rects[i].connects(&self.rects[j]) {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }

        let mut groups: Vec<(usize, Vec<Rect>)> = Vec::new();
        for i in 0..n {
            let root = find(&mut parent, i);
            match groups.iter_mut().find(|(r, _)| *r == root) {
                Some((_, rects)) => rects.push(self.rects[i]),
                None => groups.push((root, vec![self.rects[i]])),
            }
        }

        // Canonical rects are already sorted, so each group stays sorted too.
        groups
            .into_iter()
            .map(|(_, rects)| Region { rects })
            .collect()
    }
}

impl From<Rect> for Region {
    fn from(value: Rect) -> Self {
        Self::from_rect(value)
    }
}

impl From<Vec<Rect>> for Region {
    fn from(value: Vec<Rect>) -> Self {
        Self::from_rects(value)
    }
}

impl From<Region> for Vec<Rect> {
    fn from(value: Region) -> Self {
        value.rects
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<T: IntoIterator<Item = Rect>>(iter: T) -> Self {
        Self::from_rects(iter)
    }
}

/// Computes the canonical strip decomposition of the union of `rects`.
fn normalize(rects: Vec<Rect>) -> Vec<Rect> {
    if rects.is_empty() {
        return Vec::new();
    }

    let xs = rects
        .iter()
        .flat_map(|r| [r.left(), r.right()])
        .sorted()
        .dedup()
        .collect::<Vec<_>>();
    let ys = rects
        .iter()
        .flat_map(|r| [r.bot(), r.top()])
        .sorted()
        .dedup()
        .collect::<Vec<_>>();

    let index = |coords: &[Int], v: Int| coords.partition_point(|&c| c < v);

    let cols = xs.len() - 1;
    let bands = ys.len() - 1;
    let mut covered = vec![vec![false; cols]; bands];
    for r in rects.iter() {
        let (x0, x1) = (index(&xs, r.left()), index(&xs, r.right()));
        let (y0, y1) = (index(&ys, r.bot()), index(&ys, r.top()));
        for row in covered.iter_mut().take(y1).skip(y0) {
            for cell in row.iter_mut().take(x1).skip(x0) {
                *cell = true;
            }
        }
    }

    let mut out = Vec::new();
    // Open strips as (left, right, bottom).
    let mut open: Vec<(Int, Int, Int)> = Vec::new();

    for (j, row) in covered.iter().enumerate() {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < cols {
            if row[i] {
                let start = i;
                while i < cols && row[i] {
                    i += 1;
                }
                runs.push((xs[start], xs[i]));
            } else {
                i += 1;
            }
        }

        let mut next = Vec::with_capacity(runs.len());
        for &(l, r, b) in open.iter() {
            if runs.contains(&(l, r)) {
                next.push((l, r, b));
            } else {
                out.push(Rect::from_sides(l, b, r, ys[j]));
            }
        }
        for &(l, r) in runs.iter() {
            if !next.iter().any(|&(nl, nr, _)| nl == l && nr == r) {
                next.push((l, r, ys[j]));
            }
        }
        open = next;
    }

    let top = ys[bands];
    out.extend(open.into_iter().map(|(l, r, b)| Rect::from_sides(l, b, r, top)));
    out.sort_by_key(|r| (r.bot(), r.left(), r.top(), r.right()));
    out
}
