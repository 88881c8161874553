//! Strategies turning a single-row placement into a folded one.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{Cell, CellMultiHeight, PlacementError};
use crate::mos::Slot;

/// Transforms a single-row placement into a multi-row placement.
pub trait Placer {
    /// Folds `cell` into `height_req` stacked two-row levels.
    ///
    /// The source cell is never modified.
    fn fold(&self, cell: &Cell, height_req: usize) -> Result<CellMultiHeight, PlacementError>;
}

fn validate(cell: &Cell, height_req: usize) -> Result<(), PlacementError> {
    if height_req == 0 {
        return Err(PlacementError::InvalidHeight(height_req));
    }
    cell.validate()
}

/// Leaves the placement as a single two-row level.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SingleRowPlacer;

impl Placer for SingleRowPlacer {
    fn fold(&self, cell: &Cell, height_req: usize) -> Result<CellMultiHeight, PlacementError> {
        validate(cell, height_req)?;
        if height_req > 1 {
            warn!("single-row placer ignoring requested fold height {height_req}");
        }
        Ok(CellMultiHeight::from_rows(
            vec![cell.upper.clone(), cell.lower.clone()],
            vec![false],
        ))
    }
}

/// Folds a row into `height_req` column blocks stacked in zig-zag order.
///
/// The source row is padded on the right to a multiple of `height_req`
/// columns and cut into equal blocks. Blocks are stacked last block on top.
/// Starting with the top level, every other level is flipped both vertically
/// and horizontally, and the devices of flipped levels have their source and
/// drain exchanged. A fold height of 1 is the identity.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FoldPlacer;

impl Placer for FoldPlacer {
    fn fold(&self, cell: &Cell, height_req: usize) -> Result<CellMultiHeight, PlacementError> {
        validate(cell, height_req)?;
        if height_req == 1 {
            return SingleRowPlacer.fold(cell, height_req);
        }

        let pad_width = (height_req - cell.width % height_req) % height_req;
        let block_width = (cell.width + pad_width) / height_req;
        debug!(
            "folding {} columns into {height_req} levels of {block_width} (padding {pad_width})",
            cell.width
        );

        let pad = |row: &[Slot]| {
            let mut row = row.to_vec();
            row.resize(cell.width + pad_width, None);
            row
        };
        let upper = pad(&cell.upper);
        let lower = pad(&cell.lower);

        let mut rows = Vec::with_capacity(2 * height_req);
        let mut mirrored = Vec::with_capacity(height_req);

        // Placeholders are mirrored along with the devices in their block.
        for (pos, (top, bot)) in upper
            .chunks(block_width)
            .zip(lower.chunks(block_width))
            .rev()
            .enumerate()
        {
            let (mut top, mut bot) = (top.to_vec(), bot.to_vec());
            let flip = pos % 2 == 0;
            if flip {
                top.reverse();
                bot.reverse();
                std::mem::swap(&mut top, &mut bot);
            }
            rows.push(top);
            rows.push(bot);
            mirrored.push(flip);
        }

        // Polarity correction applies to even row pairs, i.e. the flipped levels.
        for (i, row) in rows.iter_mut().enumerate() {
            if (i / 2) % 2 == 0 {
                row.iter_mut().flatten().for_each(|t| t.flip());
            }
        }

        let folded = CellMultiHeight::from_rows(rows, mirrored);
        info!(
            "folded {}-column cell into {}x{} placement",
            cell.width,
            folded.height(),
            folded.width()
        );
        Ok(folded)
    }
}

/// The available placement strategies.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacerKind {
    SingleRow,
    #[default]
    Fold,
}

impl Placer for PlacerKind {
    fn fold(&self, cell: &Cell, height_req: usize) -> Result<CellMultiHeight, PlacementError> {
        match self {
            Self::SingleRow => SingleRowPlacer.fold(cell, height_req),
            Self::Fold => FoldPlacer.fold(cell, height_req),
        }
    }
}
