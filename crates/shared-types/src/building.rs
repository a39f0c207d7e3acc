//! General building attributes shared by every DB-SI section
//!
//! The project context is entered once and then read by all six section
//! evaluators. Each section accepts its own subset of [`BuildingUse`].

use serde::{Deserialize, Serialize};

/// Building use ("uso") as named in CTE DB-SI tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingUse {
    Residential,
    /// Single-family dwelling ("vivienda unifamiliar")
    ResidentialSingle,
    Office,
    Commercial,
    Restaurant,
    Industrial,
    Educational,
    Healthcare,
    Hotel,
    /// Public assembly ("pública concurrencia")
    Assembly,
    /// Car park in a building of exclusive use
    ParkingExclusive,
    /// Car park located below another use
    ParkingUnder,
}

impl BuildingUse {
    /// Uses accepted for the general project data
    pub const PROJECT: [BuildingUse; 7] = [
        BuildingUse::Residential,
        BuildingUse::Office,
        BuildingUse::Commercial,
        BuildingUse::Industrial,
        BuildingUse::Educational,
        BuildingUse::Healthcare,
        BuildingUse::Hotel,
    ];

    /// Machine code used in forms and project files
    pub fn code(&self) -> &'static str {
        match self {
            BuildingUse::Residential => "residential",
            BuildingUse::ResidentialSingle => "residential_single",
            BuildingUse::Office => "office",
            BuildingUse::Commercial => "commercial",
            BuildingUse::Restaurant => "restaurant",
            BuildingUse::Industrial => "industrial",
            BuildingUse::Educational => "educational",
            BuildingUse::Healthcare => "healthcare",
            BuildingUse::Hotel => "hotel",
            BuildingUse::Assembly => "assembly",
            BuildingUse::ParkingExclusive => "parking_exclusive",
            BuildingUse::ParkingUnder => "parking_under",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            BuildingUse::Residential => "Residential",
            BuildingUse::ResidentialSingle => "Single-family dwelling",
            BuildingUse::Office => "Office",
            BuildingUse::Commercial => "Commercial",
            BuildingUse::Restaurant => "Restaurant",
            BuildingUse::Industrial => "Industrial",
            BuildingUse::Educational => "Educational",
            BuildingUse::Healthcare => "Healthcare",
            BuildingUse::Hotel => "Hotel",
            BuildingUse::Assembly => "Public assembly",
            BuildingUse::ParkingExclusive => "Car park (exclusive building)",
            BuildingUse::ParkingUnder => "Car park (below another use)",
        }
    }
}

impl std::fmt::Display for BuildingUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for BuildingUse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residential" => Ok(BuildingUse::Residential),
            "residential_single" => Ok(BuildingUse::ResidentialSingle),
            "office" => Ok(BuildingUse::Office),
            "commercial" => Ok(BuildingUse::Commercial),
            "restaurant" => Ok(BuildingUse::Restaurant),
            "industrial" => Ok(BuildingUse::Industrial),
            "educational" => Ok(BuildingUse::Educational),
            "healthcare" => Ok(BuildingUse::Healthcare),
            "hotel" => Ok(BuildingUse::Hotel),
            "assembly" => Ok(BuildingUse::Assembly),
            "parking_exclusive" => Ok(BuildingUse::ParkingExclusive),
            "parking_under" => Ok(BuildingUse::ParkingUnder),
            other => Err(format!("Unknown building use: {}", other)),
        }
    }
}

/// Setting of the building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingLocation {
    Urban,
    Rural,
    /// Industrial estate
    Industrial,
}

impl BuildingLocation {
    pub fn label(&self) -> &'static str {
        match self {
            BuildingLocation::Urban => "Urban",
            BuildingLocation::Rural => "Rural",
            BuildingLocation::Industrial => "Industrial estate",
        }
    }
}

impl std::str::FromStr for BuildingLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urban" => Ok(BuildingLocation::Urban),
            "rural" => Ok(BuildingLocation::Rural),
            "industrial" => Ok(BuildingLocation::Industrial),
            other => Err(format!("Unknown building location: {}", other)),
        }
    }
}

/// Validated general project data
///
/// Numeric fields are guaranteed finite and strictly positive once a
/// context has been built by the validation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub project_name: String,
    pub us_building: BuildingUse,
    /// Total built surface (m²)
    pub total_surface: f64,
    /// Evacuation height (m)
    pub evacuation_height: f64,
    pub floors: f64,
    /// Maximum occupancy (persons)
    pub max_occupancy: f64,
    pub building_location: BuildingLocation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_building_use_code_roundtrip() {
        for code in [
            "residential",
            "residential_single",
            "office",
            "commercial",
            "restaurant",
            "industrial",
            "educational",
            "healthcare",
            "hotel",
            "assembly",
            "parking_exclusive",
            "parking_under",
        ] {
            let parsed: BuildingUse = code.parse().unwrap();
            assert_eq!(parsed.code(), code);
        }
    }

    #[test]
    fn test_building_use_rejects_unknown() {
        assert!("warehouse".parse::<BuildingUse>().is_err());
        assert!("".parse::<BuildingUse>().is_err());
    }

    #[test]
    fn test_building_use_serde_matches_code() {
        let json = serde_json::to_string(&BuildingUse::ParkingUnder).unwrap();
        assert_eq!(json, "\"parking_under\"");
    }

    #[test]
    fn test_location_parse_is_case_insensitive() {
        assert_eq!(
            " Urban ".parse::<BuildingLocation>(),
            Ok(BuildingLocation::Urban)
        );
    }
}
