//! Standard-cell placement folding and layer geometry generation.
//!
//! A single-row [`placement::Cell`] is folded by a [`placement::Placer`]
//! into a [`placement::CellMultiHeight`], whose per-layer shapes are then
//! derived from [`tech::TechParams`] by the [`layout`] module.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mos;
pub mod paths;
pub mod placement;
pub mod plan;
pub mod tech;

pub use error::{CellgenError, Result};
