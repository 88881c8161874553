//! Layer geometry generation.

use std::collections::BTreeMap;

use arcstr::ArcStr;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geometry::{Int, Point, Rect, Shape};
use crate::placement::CellMultiHeight;
use crate::tech::{ConfigError, TechField, TechParams};

pub mod region;
pub mod rules;

pub use region::{calculate_nanosheet_region, polygon_centers};
pub use rules::{LayerRule, Row, LAYER_RULES};

/// The bounding extents of a placement, in grid units.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extents {
    pub width: Int,
    pub height: Int,
}

impl Extents {
    pub fn new(width: Int, height: Int) -> Self {
        Self { width, height }
    }

    /// The extents of a single fold level of `cell`.
    pub fn of_level(cell: &CellMultiHeight, tech: &TechParams) -> Result<Self, LayerError> {
        let pitch = tech.require_positive(TechField::GatePitch)?;
        let height = tech.require_positive(TechField::RowHeight)?;
        Ok(Self {
            width: scale(cell.width(), pitch)?,
            height,
        })
    }

    /// The extents of the whole folded cell.
    pub fn of_cell(cell: &CellMultiHeight, tech: &TechParams) -> Result<Self, LayerError> {
        let level = Self::of_level(cell, tech)?;
        Ok(Self {
            width: level.width,
            height: scale(cell.levels(), level.height)?,
        })
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GeometryError::EmptyExtents {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// `count` repetitions of `step`, failing on overflow.
fn scale(count: usize, step: Int) -> Result<Int, GeometryError> {
    Int::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(step))
        .ok_or_else(|| GeometryError::Overflow {
            layer: rules::BOUNDARY.to_string(),
        })
}

/// Shapes grouped by layer name.
///
/// Within a layer, shapes keep their insertion order. Empty regions cover
/// nothing and are never stored, so every stored shape has a bounding box.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ArcStr, Vec<Shape>>", into = "BTreeMap<ArcStr, Vec<Shape>>")]
pub struct ShapeMap {
    layers: BTreeMap<ArcStr, Vec<Shape>>,
}

impl ShapeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `shape` to `layer`. Empty regions are dropped.
    pub fn insert(&mut self, layer: impl Into<ArcStr>, shape: impl Into<Shape>) {
        let shape = shape.into();
        if shape.bbox().is_none() {
            return;
        }
        self.layers.entry(layer.into()).or_default().push(shape);
    }

    /// The shapes on `layer`, empty if the layer has none.
    pub fn layer(&self, layer: &str) -> &[Shape] {
        self.layers.get(layer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn layers(&self) -> impl Iterator<Item = (&ArcStr, &[Shape])> {
        self.layers.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Total number of shapes across all layers.
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves all shapes of `other` to the end of the matching layers of `self`.
    pub fn append(&mut self, other: ShapeMap) {
        for (layer, shapes) in other.layers {
            self.layers.entry(layer).or_default().extend(shapes);
        }
    }
}

impl From<BTreeMap<ArcStr, Vec<Shape>>> for ShapeMap {
    fn from(value: BTreeMap<ArcStr, Vec<Shape>>) -> Self {
        let mut shapes = Self::new();
        for (layer, list) in value {
            for shape in list {
                shapes.insert(layer.clone(), shape);
            }
        }
        shapes
    }
}

impl From<ShapeMap> for BTreeMap<ArcStr, Vec<Shape>> {
    fn from(value: ShapeMap) -> Self {
        value.layers
    }
}

/// Computes the shape of `layer` for a placement of the given extents.
pub fn layer_rect(layer: &str, extents: &Extents, tech: &TechParams) -> Result<Rect, LayerError> {
    let rule = rules::rule(layer)?;
    extents.validate()?;
    let (bot, top) = (rule.span)(extents, tech)?.resolve(rule.name)?;
    Ok(Rect::from_sides(0, bot, extents.width, top))
}

/// Generates the shape of `layer` and appends it to `shapes`.
///
/// On error, `shapes` is left untouched.
pub fn generate_layer(
    layer: &str,
    extents: &Extents,
    tech: &TechParams,
    shapes: &mut ShapeMap,
) -> Result<Rect, LayerError> {
    let rect = layer_rect(layer, extents, tech)?;
    debug!("generated {layer} shape {rect}");
    shapes.insert(layer, rect);
    Ok(rect)
}

/// Generates several layers, committing them only if all succeed.
pub fn generate_layers<'a>(
    layers: impl IntoIterator<Item = &'a str>,
    extents: &Extents,
    tech: &TechParams,
    shapes: &mut ShapeMap,
) -> Result<(), LayerError> {
    let staged = layers
        .into_iter()
        .map(|layer| Ok((layer, layer_rect(layer, extents, tech)?)))
        .collect::<Result<Vec<_>, LayerError>>()?;
    for (layer, rect) in staged {
        shapes.insert(layer, rect);
    }
    Ok(())
}

/// Generates the full shape set of folded cells for one technology.
#[derive(Debug, Copy, Clone)]
pub struct LayoutGenerator<'a> {
    tech: &'a TechParams,
}

impl<'a> LayoutGenerator<'a> {
    pub fn new(tech: &'a TechParams) -> Self {
        Self { tech }
    }

    /// Draws every fold level of `cell`.
    ///
    /// Level 0 is on top. Each level gets its boundary and wells, reflected
    /// vertically when the level was mirrored during folding, plus one
    /// column-wide diffusion rectangle per device. Devices in the top row of
    /// a level sit on the upper nanosheet, devices in the bottom row on the
    /// lower one; the diffusion layer follows the device polarity.
    pub fn generate_cell(&self, cell: &CellMultiHeight) -> Result<ShapeMap, LayerError> {
        let level = Extents::of_level(cell, self.tech)?;
        level.validate()?;
        // Fails early if the stacked levels do not fit the coordinate range.
        Extents::of_cell(cell, self.tech)?;
        let pitch = self.tech.require_positive(TechField::GatePitch)?;

        let wells = LAYER_RULES
            .iter()
            .filter(|r| r.diffusion.is_none())
            .map(|r| Ok((r.name, layer_rect(r.name, &level, self.tech)?)))
            .collect::<Result<Vec<_>, LayerError>>()?;

        let mut sheets = Vec::with_capacity(2);
        for row in [Row::Upper, Row::Lower] {
            let rule = rules::sheet_rule(row)?;
            sheets.push((rule.span)(&level, self.tech)?.resolve(rule.name)?);
        }

        let mut shapes = ShapeMap::new();
        let levels = cell.levels();
        for k in 0..levels {
            let offset = Point::new(0, (levels - 1 - k) as Int * level.height);
            let mirrored = cell.is_mirrored(k);
            debug!("drawing level {k} at y = {} (mirrored: {mirrored})", offset.y);

            for &(name, rect) in wells.iter() {
                let rect = if mirrored {
                    rect.checked_reflect_vert(level.height)
                } else {
                    Some(rect)
                };
                let placed = rect.and_then(|r| r.checked_translate(offset));
                shapes.insert(name, overflow_check(name, placed)?);
            }

            for (r, &(bot, top)) in sheets.iter().enumerate() {
                for (c, slot) in cell.row(2 * k + r).enumerate() {
                    if let Some(t) = slot {
                        let left = c as Int * pitch;
                        let layer = rules::diffusion_rule(t.mos_type)?.name;
                        let rect = Rect::from_sides(left, bot, left + pitch, top)
                            .checked_translate(offset);
                        shapes.insert(layer, overflow_check(layer, rect)?);
                    }
                }
            }
        }

        info!(
            "generated {} shapes on {} layers for {levels}-level cell",
            shapes.len(),
            shapes.layers().count()
        );
        Ok(shapes)
    }
}

fn overflow_check(layer: &str, rect: Option<Rect>) -> Result<Rect, GeometryError> {
    rect.ok_or_else(|| GeometryError::Overflow {
        layer: layer.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("layer `{layer}` has non-positive height (bottom {bot} >= top {top})")]
    EmptySpan {
        layer: String,
        bot: Decimal,
        top: Decimal,
    },
    #[error("layer `{layer}` has off-grid coordinate {coord}")]
    OffGrid { layer: String, coord: Decimal },
    #[error("placement extents must be positive (got {width} x {height})")]
    EmptyExtents { width: Int, height: Int },
    #[error("coordinates of layer `{layer}` overflow the layout grid")]
    Overflow { layer: String },
}

/// A failure generating a single layer.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
