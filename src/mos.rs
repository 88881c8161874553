use std::fmt::Display;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::geometry::Int;

/// MOSFET Types
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MosType {
    /// An n-channel transistor
    #[default]
    Nmos,
    /// A p-channel transistor
    Pmos,
}

impl Display for MosType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            MosType::Nmos => write!(f, "nmos"),
            MosType::Pmos => write!(f, "pmos"),
        }
    }
}

/// A single placed transistor.
///
/// Transistors are produced by netlist extraction and are immutable apart
/// from their source/drain assignment, which folding may exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transistor {
    pub mos_type: MosType,
    pub gate_net: ArcStr,
    pub source_net: ArcStr,
    pub drain_net: ArcStr,
    /// Device width, if the extractor sized it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Int>,
}

/// A placement slot: a transistor, or [`None`] for an empty placeholder.
pub type Slot = Option<Transistor>;

impl Transistor {
    pub fn new(
        mos_type: MosType,
        gate_net: impl Into<ArcStr>,
        source_net: impl Into<ArcStr>,
        drain_net: impl Into<ArcStr>,
    ) -> Self {
        Self {
            mos_type,
            gate_net: gate_net.into(),
            source_net: source_net.into(),
            drain_net: drain_net.into(),
            width: None,
        }
    }

    pub fn nmos(
        gate_net: impl Into<ArcStr>,
        source_net: impl Into<ArcStr>,
        drain_net: impl Into<ArcStr>,
    ) -> Self {
        Self::new(MosType::Nmos, gate_net, source_net, drain_net)
    }

    pub fn pmos(
        gate_net: impl Into<ArcStr>,
        source_net: impl Into<ArcStr>,
        drain_net: impl Into<ArcStr>,
    ) -> Self {
        Self::new(MosType::Pmos, gate_net, source_net, drain_net)
    }

    #[inline]
    pub fn with_width(mut self, width: Int) -> Self {
        self.width = Some(width);
        self
    }

    /// Exchanges the source and drain nets.
    #[inline]
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.source_net, &mut self.drain_net);
    }
}

impl Display for Transistor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(g={}, s={}, d={})",
            self.mos_type, self.gate_net, self.source_net, self.drain_net
        )
    }
}
