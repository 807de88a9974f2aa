use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display unit for area labels
///
/// Declared areas are always carried in hectares; the unit only decides how
/// a label is converted and suffixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AreaUnit {
    #[serde(rename = "ha")]
    Hectares,
    #[serde(rename = "ac")]
    Acres,
    #[serde(rename = "km2")]
    SquareKilometers,
    #[serde(rename = "mi2")]
    SquareMiles,
    #[serde(rename = "ft2")]
    SquareFeet,
    #[serde(rename = "yd2")]
    SquareYards,
    #[default]
    #[serde(rename = "m2")]
    SquareMeters,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown area unit {0:?} (expected one of ha, ac, km2, mi2, ft2, yd2, m2)")]
pub struct UnknownUnit(pub String);

impl AreaUnit {
    pub const ALL: [AreaUnit; 7] = [
        AreaUnit::Hectares,
        AreaUnit::Acres,
        AreaUnit::SquareKilometers,
        AreaUnit::SquareMiles,
        AreaUnit::SquareFeet,
        AreaUnit::SquareYards,
        AreaUnit::SquareMeters,
    ];

    /// Lenient lookup used for live selector values: anything unrecognised
    /// shows square meters
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Selector code, e.g. `km2`
    pub fn code(self) -> &'static str {
        match self {
            AreaUnit::Hectares => "ha",
            AreaUnit::Acres => "ac",
            AreaUnit::SquareKilometers => "km2",
            AreaUnit::SquareMiles => "mi2",
            AreaUnit::SquareFeet => "ft2",
            AreaUnit::SquareYards => "yd2",
            AreaUnit::SquareMeters => "m2",
        }
    }

    /// Label suffix, e.g. `km²`
    pub fn symbol(self) -> &'static str {
        match self {
            AreaUnit::Hectares => "ha",
            AreaUnit::Acres => "ac",
            AreaUnit::SquareKilometers => "km²",
            AreaUnit::SquareMiles => "mi²",
            AreaUnit::SquareFeet => "ft²",
            AreaUnit::SquareYards => "yd²",
            AreaUnit::SquareMeters => "m²",
        }
    }

    /// How many of this unit make up one hectare
    pub fn per_hectare(self) -> f64 {
        match self {
            AreaUnit::Hectares => 1.0,
            AreaUnit::Acres => 2.47105,
            AreaUnit::SquareKilometers => 0.01,
            AreaUnit::SquareMiles => 0.00386102,
            AreaUnit::SquareFeet => 107639.0,
            AreaUnit::SquareYards => 11959.9,
            AreaUnit::SquareMeters => 10000.0,
        }
    }

    pub fn from_hectares(self, hectares: f64) -> f64 {
        hectares * self.per_hectare()
    }
}

impl FromStr for AreaUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.code() == code || unit.symbol() == code)
            .ok_or_else(|| UnknownUnit(code.to_string()))
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
