//! SI 6 - Structural fire resistance
//!
//! The required R rating comes from a matrix of use group, sector location
//! and height band. A declared special-risk zone overrides the matrix.
//! The only verdict check is the height limit of the simplified tables;
//! everything else is advisory.

use serde::{Deserialize, Serialize};
use shared_types::{BuildingUse, Calculation, ProjectContext, SectionId};

use crate::classes::FireRating;
use crate::engine::{Assessment, Outcome, Section};
use crate::error::ValidationError;
use crate::extractors::numeric::format_quantity;
use crate::fields::FieldReader;
use crate::tables::{
    above_grade_rating, below_grade_rating, StructuralGroup, SI6_HIGH_RISE_HEIGHT,
    SI6_MAX_TABULATED_HEIGHT,
};

pub const STRUCTURE_USES: [BuildingUse; 9] = [
    BuildingUse::ResidentialSingle,
    BuildingUse::Residential,
    BuildingUse::Office,
    BuildingUse::Commercial,
    BuildingUse::Assembly,
    BuildingUse::Educational,
    BuildingUse::Healthcare,
    BuildingUse::ParkingExclusive,
    BuildingUse::ParkingUnder,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Concrete,
    Steel,
    Wood,
    Masonry,
    Mixed,
}

impl StructureType {
    pub fn label(&self) -> &'static str {
        match self {
            StructureType::Concrete => "Reinforced concrete",
            StructureType::Steel => "Steel",
            StructureType::Wood => "Timber",
            StructureType::Masonry => "Masonry",
            StructureType::Mixed => "Mixed structure",
        }
    }
}

impl std::str::FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concrete" => Ok(StructureType::Concrete),
            "steel" => Ok(StructureType::Steel),
            "wood" => Ok(StructureType::Wood),
            "masonry" => Ok(StructureType::Masonry),
            "mixed" => Ok(StructureType::Mixed),
            other => Err(format!("Unknown structure type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorLocation {
    Basement,
    Ground,
    Roof,
}

impl SectorLocation {
    pub fn label(&self) -> &'static str {
        match self {
            SectorLocation::Basement => "Below grade",
            SectorLocation::Ground => "Above grade",
            SectorLocation::Roof => "Roof",
        }
    }
}

impl std::str::FromStr for SectorLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basement" => Ok(SectorLocation::Basement),
            "ground" | "above_grade" => Ok(SectorLocation::Ground),
            "roof" => Ok(SectorLocation::Roof),
            other => Err(format!("Unknown sector location: {}", other)),
        }
    }
}

/// Special-risk classification of the zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialRisk {
    #[default]
    Normal,
    Low,
    Medium,
    High,
}

impl SpecialRisk {
    /// Rating that replaces the matrix value, if any
    pub fn override_rating(&self) -> Option<FireRating> {
        match self {
            SpecialRisk::Normal => None,
            SpecialRisk::Low => Some(FireRating::R(90)),
            SpecialRisk::Medium => Some(FireRating::R(120)),
            SpecialRisk::High => Some(FireRating::R(180)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpecialRisk::Normal => "Normal risk",
            SpecialRisk::Low => "Low special risk",
            SpecialRisk::Medium => "Medium special risk",
            SpecialRisk::High => "High special risk",
        }
    }
}

impl std::str::FromStr for SpecialRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(SpecialRisk::Normal),
            "low" => Ok(SpecialRisk::Low),
            "medium" => Ok(SpecialRisk::Medium),
            "high" => Ok(SpecialRisk::High),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

/// Fire load density of the sector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadLevel {
    Low,
    #[default]
    Normal,
    High,
}

impl std::str::FromStr for LoadLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(LoadLevel::Low),
            "normal" => Ok(LoadLevel::Normal),
            "high" => Ok(LoadLevel::High),
            other => Err(format!("Unknown fire load level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureInput {
    pub building_height: String,
    pub us_building: String,
    pub structure_type: String,
    pub sector_location: String,
    pub risk_level: String,
    pub load_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureThresholds {
    pub building_height: f64,
    pub us_building: BuildingUse,
    pub structure_type: StructureType,
    pub sector_location: SectorLocation,
    pub risk_level: SpecialRisk,
    pub load_level: LoadLevel,
    /// Matrix value before any special-risk override
    pub base_resistance: FireRating,
    pub required_resistance: FireRating,
    pub max_height: f64,
}

pub fn required_resistance(
    group: StructuralGroup,
    location: SectorLocation,
    height: f64,
    risk: SpecialRisk,
) -> FireRating {
    let base = match location {
        SectorLocation::Basement => below_grade_rating(group, height),
        SectorLocation::Ground | SectorLocation::Roof => above_grade_rating(group).lookup(height),
    };
    risk.override_rating().unwrap_or(base)
}

pub struct Structure;

impl Section for Structure {
    type Input = StructureInput;
    type Thresholds = StructureThresholds;

    const ID: SectionId = SectionId::Si6;

    fn assess(
        context: &ProjectContext,
        input: &StructureInput,
    ) -> Result<Assessment<StructureThresholds>, ValidationError> {
        let mut fields = FieldReader::new();
        let height =
            fields.number_or("building_height", &input.building_height, context.evacuation_height);
        let us_building = fields.choice_or("us_building", &input.us_building, context.us_building);
        let us_building = fields.accepted("us_building", us_building, &STRUCTURE_USES);
        let structure = fields.choice::<StructureType>("structure_type", &input.structure_type);
        let location = fields.choice::<SectorLocation>("sector_location", &input.sector_location);
        let risk = fields.choice_or("risk_level", &input.risk_level, SpecialRisk::Normal);
        let load = fields.choice_or("load_level", &input.load_level, LoadLevel::Normal);

        let (Some(height), Some(us_building), Some(structure), Some(location), Some(risk), Some(load)) =
            (height, us_building, structure, location, risk, load)
        else {
            return Err(fields.into_error(Some(Self::ID)));
        };
        let Some(group) = StructuralGroup::of(us_building) else {
            return Err(ValidationError::new(Some(Self::ID), vec!["us_building".to_string()]));
        };
        fields.finish(Some(Self::ID))?;

        let base_resistance = required_resistance(group, location, height, SpecialRisk::Normal);
        let resistance = required_resistance(group, location, height, risk);

        let mut outcomes = Vec::new();
        if height > SI6_HIGH_RISE_HEIGHT {
            outcomes.push(Outcome::Advisory(
                "High-rise building: consider advanced calculation methods".to_string(),
            ));
        }
        match structure {
            StructureType::Steel => outcomes.push(Outcome::Advisory(
                "Steel structure: verify passive fire protection".to_string(),
            )),
            StructureType::Wood => outcomes.push(Outcome::Advisory(
                "Timber structure: verify minimum section dimensions".to_string(),
            )),
            _ => {}
        }
        if matches!(us_building, BuildingUse::Commercial | BuildingUse::Assembly) {
            outcomes.push(Outcome::Advisory(
                "Public assembly use: pay special attention to exits".to_string(),
            ));
        }
        outcomes.push(
            Outcome::requirement(
                format!(
                    "Height within simplified tables (<= {} m)",
                    SI6_MAX_TABULATED_HEIGHT
                ),
                height <= SI6_MAX_TABULATED_HEIGHT,
            )
            .advise("Excessive height: apply special calculation methods"),
        );
        if location == SectorLocation::Roof && height <= SI6_HIGH_RISE_HEIGHT {
            outcomes.push(Outcome::Advisory(
                "Lightweight roof: R 30 may be accepted if stability is not compromised"
                    .to_string(),
            ));
        }
        if load == LoadLevel::High {
            outcomes.push(Outcome::Advisory(
                "High fire load: verify the rating with the time-equivalence method".to_string(),
            ));
        }

        Ok(Assessment {
            thresholds: StructureThresholds {
                building_height: height,
                us_building,
                structure_type: structure,
                sector_location: location,
                risk_level: risk,
                load_level: load,
                base_resistance,
                required_resistance: resistance,
                max_height: SI6_MAX_TABULATED_HEIGHT,
            },
            outcomes,
        })
    }

    fn calculations(t: &StructureThresholds) -> Vec<Calculation> {
        vec![
            Calculation::new("Building use", t.us_building.label()),
            Calculation::new("Structure type", t.structure_type.label()),
            Calculation::new("Sector location", t.sector_location.label()),
            Calculation::new("Risk level", t.risk_level.label()),
            Calculation::new("Building height", format_quantity(t.building_height, "m")),
            Calculation::new("Required resistance", t.required_resistance.to_string()),
        ]
    }
}
