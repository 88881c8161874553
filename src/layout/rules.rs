//! Per-layer generation rules.
//!
//! Each rule maps the extents of one fold level and the technology constants
//! to the vertical span its shape occupies. Spans are computed in half grid
//! units so that centering on odd dimensions is exact.

use rust_decimal::Decimal;

use super::{Extents, GeometryError, LayerError};
use crate::geometry::Int;
use crate::mos::MosType;
use crate::tech::{ConfigError, TechField, TechParams};

pub const BOUNDARY: &str = "boundary";
pub const NWELL: &str = "nwell";
pub const PWELL: &str = "pwell";
pub const PDIFF: &str = "pdiff";
pub const NDIFF: &str = "ndiff";

/// The two device rows of a fold level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Row {
    Upper,
    Lower,
}

/// A vertical span in half grid units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HalfSpan {
    pub bot2: Int,
    pub top2: Int,
}

impl HalfSpan {
    /// Converts to whole grid units, rejecting empty or off-grid spans.
    pub fn resolve(&self, layer: &str) -> Result<(Int, Int), GeometryError> {
        if self.bot2 >= self.top2 {
            return Err(GeometryError::EmptySpan {
                layer: layer.to_string(),
                bot: half(self.bot2),
                top: half(self.top2),
            });
        }
        for coord2 in [self.bot2, self.top2] {
            if coord2 % 2 != 0 {
                return Err(GeometryError::OffGrid {
                    layer: layer.to_string(),
                    coord: half(coord2),
                });
            }
        }
        Ok((self.bot2 / 2, self.top2 / 2))
    }
}

fn half(v: Int) -> Decimal {
    Decimal::from(v) / Decimal::TWO
}

/// Checked arithmetic on layer coordinates, reporting overflow against `layer`.
fn checked(layer: &str, value: Option<Int>) -> Result<Int, GeometryError> {
    value.ok_or_else(|| GeometryError::Overflow {
        layer: layer.to_string(),
    })
}

pub type SpanFn = fn(&Extents, &TechParams) -> Result<HalfSpan, LayerError>;

/// A named layer and how to derive its shape.
#[derive(Copy, Clone)]
pub struct LayerRule {
    pub name: &'static str,
    /// The half of the level the layer belongs to, if any.
    pub row: Option<Row>,
    /// For diffusion layers, the device polarity drawn on this layer.
    pub diffusion: Option<MosType>,
    pub span: SpanFn,
}

impl std::fmt::Debug for LayerRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerRule")
            .field("name", &self.name)
            .field("row", &self.row)
            .field("diffusion", &self.diffusion)
            .finish()
    }
}

pub static LAYER_RULES: &[LayerRule] = &[
    LayerRule {
        name: BOUNDARY,
        row: None,
        diffusion: None,
        span: boundary_span,
    },
    LayerRule {
        name: NWELL,
        row: Some(Row::Upper),
        diffusion: None,
        span: nwell_span,
    },
    LayerRule {
        name: PWELL,
        row: Some(Row::Lower),
        diffusion: None,
        span: pwell_span,
    },
    LayerRule {
        name: PDIFF,
        row: Some(Row::Upper),
        diffusion: Some(MosType::Pmos),
        span: upper_nanosheet_span,
    },
    LayerRule {
        name: NDIFF,
        row: Some(Row::Lower),
        diffusion: Some(MosType::Nmos),
        span: lower_nanosheet_span,
    },
];

pub fn rule(layer: &str) -> Result<&'static LayerRule, ConfigError> {
    LAYER_RULES
        .iter()
        .find(|r| r.name == layer)
        .ok_or_else(|| ConfigError::UnknownLayer(layer.to_string()))
}

/// The diffusion rule drawing devices of polarity `mos_type`.
pub fn diffusion_rule(mos_type: MosType) -> Result<&'static LayerRule, ConfigError> {
    find_diffusion(LAYER_RULES, mos_type)
}

/// The diffusion rule whose nanosheet holds the devices of `row`.
pub fn sheet_rule(row: Row) -> Result<&'static LayerRule, ConfigError> {
    find_sheet(LAYER_RULES, row)
}

fn find_diffusion(rules: &[LayerRule], mos_type: MosType) -> Result<&LayerRule, ConfigError> {
    rules
        .iter()
        .find(|r| r.diffusion == Some(mos_type))
        .ok_or_else(|| ConfigError::MissingRule(format!("{mos_type} diffusion")))
}

fn find_sheet(rules: &[LayerRule], row: Row) -> Result<&LayerRule, ConfigError> {
    rules
        .iter()
        .find(|r| r.diffusion.is_some() && r.row == Some(row))
        .ok_or_else(|| ConfigError::MissingRule(format!("{row:?} nanosheet")))
}

fn boundary_span(ext: &Extents, _tech: &TechParams) -> Result<HalfSpan, LayerError> {
    Ok(HalfSpan {
        bot2: 0,
        top2: checked(BOUNDARY, ext.height.checked_mul(2))?,
    })
}

fn upper_nanosheet_span(ext: &Extents, tech: &TechParams) -> Result<HalfSpan, LayerError> {
    let nsw = tech.require(TechField::NanosheetWidth)?;
    let np = tech.require(TechField::NpSpacing)?;
    let bot2 = checked(PDIFF, ext.height.checked_add(np))?;
    let top2 = checked(PDIFF, nsw.checked_mul(2).and_then(|w| bot2.checked_add(w)))?;
    Ok(HalfSpan { bot2, top2 })
}

fn lower_nanosheet_span(ext: &Extents, tech: &TechParams) -> Result<HalfSpan, LayerError> {
    let nsw = tech.require(TechField::NanosheetWidth)?;
    let np = tech.require(TechField::NpSpacing)?;
    let top2 = checked(NDIFF, ext.height.checked_sub(np))?;
    let bot2 = checked(NDIFF, nsw.checked_mul(2).and_then(|w| top2.checked_sub(w)))?;
    Ok(HalfSpan { bot2, top2 })
}

/// Grows a nanosheet span by the gate extension on both sides.
fn well_span(layer: &str, sheet: HalfSpan, tech: &TechParams) -> Result<HalfSpan, LayerError> {
    let ge2 = checked(layer, tech.require(TechField::GateExtension)?.checked_mul(2))?;
    Ok(HalfSpan {
        bot2: checked(layer, sheet.bot2.checked_sub(ge2))?,
        top2: checked(layer, sheet.top2.checked_add(ge2))?,
    })
}

fn nwell_span(ext: &Extents, tech: &TechParams) -> Result<HalfSpan, LayerError> {
    well_span(NWELL, upper_nanosheet_span(ext, tech)?, tech)
}

/// `top = h/2 - np/2 + ge`, `bot = h/2 - np/2 - nsw - ge`.
fn pwell_span(ext: &Extents, tech: &TechParams) -> Result<HalfSpan, LayerError> {
    well_span(PWELL, lower_nanosheet_span(ext, tech)?, tech)
}
