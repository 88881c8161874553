//! Single-row and folded transistor placements.

use std::path::Path;

use grid::Grid;
use serde::{Deserialize, Serialize};

use crate::mos::{Slot, Transistor};

pub mod placer;

pub use placer::{FoldPlacer, Placer, PlacerKind, SingleRowPlacer};

/// A single-row placement: one row per polarity, aligned by column.
///
/// By convention the upper row holds p-type devices and the lower row
/// n-type devices.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub upper: Vec<Slot>,
    pub lower: Vec<Slot>,
    /// Number of columns.
    pub width: usize,
}

impl Cell {
    /// Creates a cell from its two rows, taking the width from the upper row.
    pub fn new(upper: Vec<Slot>, lower: Vec<Slot>) -> Self {
        let width = upper.len();
        Self {
            upper,
            lower,
            width,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let txt = std::fs::read_to_string(path)?;
        Self::from_json(&txt)
    }

    pub fn from_json(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Checks the structural invariants of the placement.
    pub fn validate(&self) -> Result<(), PlacementError> {
        if self.upper.len() != self.lower.len() {
            return Err(PlacementError::MismatchedRows {
                upper: self.upper.len(),
                lower: self.lower.len(),
            });
        }
        if self.width != self.upper.len() {
            return Err(PlacementError::WidthMismatch {
                width: self.width,
                columns: self.upper.len(),
            });
        }
        if self.width == 0 {
            return Err(PlacementError::EmptyCell);
        }
        Ok(())
    }

    /// Number of non-placeholder transistors.
    pub fn transistor_count(&self) -> usize {
        self.upper.iter().chain(self.lower.iter()).flatten().count()
    }
}

/// A folded placement: pairs of rows stacked into fold levels.
///
/// Row 0 is the top row. Rows `2k` and `2k + 1` form fold level `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMultiHeight {
    grid: Grid<Slot>,
    mirrored: Vec<bool>,
}

impl CellMultiHeight {
    /// Builds a folded placement from its rows, top first.
    ///
    /// `mirrored[k]` records whether fold level `k` was flipped. The caller
    /// guarantees there are `2 * mirrored.len()` non-empty rows of equal length.
    pub(crate) fn from_rows(rows: Vec<Vec<Slot>>, mirrored: Vec<bool>) -> Self {
        debug_assert_eq!(rows.len(), 2 * mirrored.len());
        let cols = rows.first().map(Vec::len).unwrap_or_default();
        debug_assert!(rows.iter().all(|r| r.len() == cols));
        let grid = Grid::from_vec(rows.into_iter().flatten().collect(), cols);
        Self { grid, mirrored }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    /// Number of rows. Always even.
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.rows()
    }

    /// Number of fold levels (row pairs).
    #[inline]
    pub fn levels(&self) -> usize {
        self.mirrored.len()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Transistor> {
        self.grid.get(row, col)?.as_ref()
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = &Slot> {
        self.grid.iter_row(row)
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Slot>> {
        (0..self.height()).map(|i| self.row(i).collect())
    }

    /// True if fold level `level` is a flipped copy of its source block.
    #[inline]
    pub fn is_mirrored(&self, level: usize) -> bool {
        self.mirrored.get(level).copied().unwrap_or_default()
    }

    pub fn grid(&self) -> &Grid<Slot> {
        &self.grid
    }

    /// Number of non-placeholder transistors.
    pub fn transistor_count(&self) -> usize {
        self.grid.iter().flatten().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("invalid fold height: {0} (must be at least 1)")]
    InvalidHeight(usize),
    #[error("mismatched row lengths (upper has {upper} columns, lower has {lower})")]
    MismatchedRows { upper: usize, lower: usize },
    #[error("cell width {width} does not match its {columns} columns")]
    WidthMismatch { width: usize, columns: usize },
    #[error("cell has no columns to place")]
    EmptyCell,
}
