//! Per-technology constants.

use std::fmt::Display;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Int;

/// Spacing and size constants for one manufacturing technology.
///
/// All values are in layout grid units. Fields are optional so that a
/// technology file only has to provide what the layers it is used with
/// actually need; [`TechParams::require`] reports anything missing.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_builder::Builder,
)]
#[builder(default, setter(into))]
pub struct TechParams {
    /// Technology name, for diagnostics only.
    #[serde(default)]
    pub name: String,
    /// Width of a nanosheet (the active channel strip).
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    pub nanosheet_width: Option<Int>,
    /// Vertical spacing between the n-type and p-type nanosheets.
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    pub np_spacing: Option<Int>,
    /// Extension of the gate beyond the nanosheet edge.
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    pub gate_extension: Option<Int>,
    /// Horizontal pitch of one placement column.
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    pub gate_pitch: Option<Int>,
    /// Height of one two-row cell (one fold level).
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    pub row_height: Option<Int>,
}

/// The named fields of [`TechParams`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechField {
    NanosheetWidth,
    NpSpacing,
    GateExtension,
    GatePitch,
    RowHeight,
}

impl Display for TechField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::NanosheetWidth => write!(f, "nanosheet_width"),
            Self::NpSpacing => write!(f, "np_spacing"),
            Self::GateExtension => write!(f, "gate_extension"),
            Self::GatePitch => write!(f, "gate_pitch"),
            Self::RowHeight => write!(f, "row_height"),
        }
    }
}

impl TechParams {
    pub fn builder() -> TechParamsBuilder {
        TechParamsBuilder::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let txt = std::fs::read_to_string(path)?;
        Self::from_toml(&txt)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn get(&self, field: TechField) -> Option<Int> {
        match field {
            TechField::NanosheetWidth => self.nanosheet_width,
            TechField::NpSpacing => self.np_spacing,
            TechField::GateExtension => self.gate_extension,
            TechField::GatePitch => self.gate_pitch,
            TechField::RowHeight => self.row_height,
        }
    }

    /// Returns the value of `field`, which must be set.
    ///
    /// Signs are not checked here: spacing rules may legitimately use
    /// negative extensions, and inconsistent combinations are caught when
    /// the resulting geometry is validated.
    pub fn require(&self, field: TechField) -> Result<Int, ConfigError> {
        self.get(field).ok_or_else(|| ConfigError::MissingField {
            tech: self.name.clone(),
            field,
        })
    }

    /// Like [`TechParams::require`], but the value must also be strictly positive.
    pub fn require_positive(&self, field: TechField) -> Result<Int, ConfigError> {
        match self.require(field)? {
            value if value <= 0 => Err(ConfigError::InvalidField { field, value }),
            value => Ok(value),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("technology `{tech}` does not set required field `{field}`")]
    MissingField { tech: String, field: TechField },
    #[error("invalid value for technology field `{field}`: {value}")]
    InvalidField { field: TechField, value: Int },
    #[error("no generation rule for layer `{0}`")]
    UnknownLayer(String),
    #[error("no layer rule for {0}")]
    MissingRule(String),

    #[error("could not read technology file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse technology file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize technology: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const NANOSHEET_TOML: &str = r#"
        name = "ns3"
        nanosheet_width = 10
        np_spacing = 4
        gate_extension = 2
        gate_pitch = 24
    "#;

    #[test]
    fn test_parse_tech() -> Result<(), Box<dyn std::error::Error>> {
        let tech = TechParams::from_toml(NANOSHEET_TOML)?;
        assert_eq!(tech.name, "ns3");
        assert_eq!(tech.require(TechField::NanosheetWidth)?, 10);
        assert_eq!(tech.require(TechField::NpSpacing)?, 4);
        assert_eq!(tech.require(TechField::GateExtension)?, 2);
        assert_eq!(tech.row_height, None);
        Ok(())
    }

    #[test]
    fn test_missing_field() {
        let tech = TechParams::from_toml(NANOSHEET_TOML).unwrap();
        let err = tech.require(TechField::RowHeight).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: TechField::RowHeight,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "technology `ns3` does not set required field `row_height`"
        );
    }

    #[test]
    fn test_invalid_fields() {
        let tech = TechParams::builder()
            .np_spacing(-1)
            .gate_pitch(0)
            .build()
            .unwrap();
        assert_eq!(tech.require(TechField::NpSpacing).unwrap(), -1);
        assert!(matches!(
            tech.require_positive(TechField::NpSpacing),
            Err(ConfigError::InvalidField { value: -1, .. })
        ));
        assert_eq!(tech.require(TechField::GatePitch).unwrap(), 0);
        assert!(matches!(
            tech.require_positive(TechField::GatePitch),
            Err(ConfigError::InvalidField {
                field: TechField::GatePitch,
                value: 0
            })
        ));
    }

    #[test]
    fn test_toml_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let tech = TechParams::builder()
            .name("ns3")
            .nanosheet_width(10)
            .row_height(60)
            .build()?;
        let txt = tech.to_toml()?;
        assert_eq!(TechParams::from_toml(&txt)?, tech);
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ns3.toml");
        std::fs::write(&path, NANOSHEET_TOML)?;
        let tech = TechParams::load(&path)?;
        assert_eq!(tech.gate_pitch, Some(24));

        assert!(matches!(
            TechParams::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
        Ok(())
    }
}
