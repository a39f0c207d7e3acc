//! Static DB-SI lookup tables
//!
//! Height bands are NOT shared between sections. Each table lists its own
//! upper bounds, and a band always includes its upper bound: with bands
//! `[(15.0, a), (28.0, b)]` and `above: c`, a height of exactly 15 m yields
//! `a` and 15.01 m yields `b`.

use shared_types::BuildingUse;

use crate::classes::{Euroclass, FireRating};

/// Value selected by height with inclusive upper band limits
#[derive(Debug, Clone, Copy)]
pub struct HeightBands<T: 'static> {
    pub bands: &'static [(f64, T)],
    pub above: T,
}

impl<T: Copy> HeightBands<T> {
    pub fn lookup(&self, height: f64) -> T {
        self.bands
            .iter()
            .find(|(limit, _)| height <= *limit)
            .map(|(_, value)| *value)
            .unwrap_or(self.above)
    }
}

// ============================================================================
// SI 1 - Interior spread (compartmentation)
// ============================================================================

/// Maximum fire-sector area (m²) and boundary rating for a use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorLimit {
    pub max_area: f64,
    pub resistance: FireRating,
}

const SECTOR_2500_EI60: SectorLimit = SectorLimit {
    max_area: 2500.0,
    resistance: FireRating::Ei(60),
};
const SECTOR_1500_EI90: SectorLimit = SectorLimit {
    max_area: 1500.0,
    resistance: FireRating::Ei(90),
};
const SECTOR_1000_EI90: SectorLimit = SectorLimit {
    max_area: 1000.0,
    resistance: FireRating::Ei(90),
};

/// Above this evacuation height every sector boundary needs EI 120
pub const SI1_HIGH_RISE_HEIGHT: f64 = 28.0;
pub const SI1_HIGH_RISE_RESISTANCE: FireRating = FireRating::Ei(120);

pub fn sector_limits(us_building: BuildingUse) -> HeightBands<SectorLimit> {
    match us_building {
        BuildingUse::Residential => HeightBands {
            bands: &[(15.0, SECTOR_2500_EI60)],
            above: SECTOR_1000_EI90,
        },
        BuildingUse::Commercial => HeightBands {
            bands: &[(10.0, SECTOR_2500_EI60)],
            above: SECTOR_1500_EI90,
        },
        BuildingUse::Industrial => HeightBands {
            bands: &[],
            above: SECTOR_1000_EI90,
        },
        // Office, educational, healthcare and hotel share the general limit
        _ => HeightBands {
            bands: &[],
            above: SECTOR_2500_EI60,
        },
    }
}

// ============================================================================
// SI 2 - Exterior spread
// ============================================================================

pub const SI2_BASE_SEPARATION: f64 = 3.0;
/// Above this façade height the separation grows with the height
pub const SI2_SEPARATION_HEIGHT: f64 = 15.0;
pub const SI2_SEPARATION_FACTOR: f64 = 0.2;
/// Opening share above which the separation is multiplied
pub const SI2_OPENING_SURCHARGE_FROM: f64 = 40.0;
pub const SI2_OPENING_SURCHARGE: f64 = 1.5;
pub const SI2_MAX_OPENING_PERCENTAGE: f64 = 60.0;

/// Class of façade finishes covering more than 10% of the surface
pub const FACADE_CLASS: HeightBands<Euroclass> = HeightBands {
    bands: &[(10.0, Euroclass::D), (18.0, Euroclass::C)],
    above: Euroclass::B,
};

/// Class of insulation inside ventilated façade cavities
pub const CAVITY_INSULATION_CLASS: HeightBands<Euroclass> = HeightBands {
    bands: &[(10.0, Euroclass::D), (28.0, Euroclass::B)],
    above: Euroclass::A2,
};

// ============================================================================
// SI 3 - Evacuation
// ============================================================================

/// Occupation density in m² per person
pub fn occupancy_density(us_building: BuildingUse) -> Option<f64> {
    match us_building {
        BuildingUse::Residential => Some(20.0),
        BuildingUse::Office => Some(10.0),
        BuildingUse::Commercial => Some(2.0),
        BuildingUse::Restaurant => Some(1.5),
        BuildingUse::Educational => Some(1.5),
        BuildingUse::Healthcare => Some(6.0),
        BuildingUse::Assembly => Some(1.0),
        _ => None,
    }
}

/// Exit width module: 0.80 m for every started block of 200 occupants
pub const SI3_PERSONS_PER_MODULE: f64 = 200.0;
pub const SI3_MODULE_WIDTH: f64 = 0.80;

pub const SI3_TRAVEL_SINGLE_FLOOR: f64 = 50.0;
pub const SI3_TRAVEL_MULTI_FLOOR: f64 = 35.0;
pub const SI3_TRAVEL_CROWDED_USE: f64 = 30.0;

/// Occupancy thresholds (exclusive) raising the number of exits
pub const SI3_TWO_EXITS_FROM: f64 = 100.0;
pub const SI3_THREE_EXITS_FROM: f64 = 500.0;
/// Floor area (exclusive) above which two exits are needed regardless of occupancy
pub const SI3_TWO_EXITS_AREA: f64 = 1500.0;

pub const SI3_EMERGENCY_LIFT_OCCUPANCY: f64 = 500.0;
pub const SI3_EMERGENCY_LIFT_FLOORS: f64 = 3.0;
pub const SI3_PUBLIC_ADDRESS_OCCUPANCY: f64 = 300.0;

// ============================================================================
// SI 4 - Protection installations
// ============================================================================

pub const SI4_HOSE_REEL_AREA: f64 = 500.0;
pub const SI4_HOSE_REEL_HEIGHT: f64 = 15.0;
pub const SI4_DRY_RISER_HEIGHT: f64 = 28.0;
pub const SI4_DETECTION_AREA: f64 = 1000.0;
pub const SI4_SPRINKLER_AREA: f64 = 2000.0;
pub const SI4_EMERGENCY_LIGHTING_HEIGHT: f64 = 15.0;
pub const SI4_PUBLIC_ADDRESS_AREA: f64 = 1500.0;
pub const SI4_SMOKE_EXTRACTION_AREA: f64 = 1000.0;

// ============================================================================
// SI 5 - Fire brigade intervention
// ============================================================================

/// Access road and approach requirements for a height band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessRequirement {
    /// Minimum free width of the access road (m)
    pub road_width: f64,
    /// Maximum distance from the manoeuvring space to the façade (m)
    pub max_distance: f64,
}

pub const FIRE_BRIGADE_ACCESS: HeightBands<AccessRequirement> = HeightBands {
    bands: &[
        (
            15.0,
            AccessRequirement {
                road_width: 3.5,
                max_distance: 30.0,
            },
        ),
        (
            28.0,
            AccessRequirement {
                road_width: 6.0,
                max_distance: 15.0,
            },
        ),
    ],
    above: AccessRequirement {
        road_width: 8.0,
        max_distance: 10.0,
    },
};

pub const SI5_FIRE_LIFT_HEIGHT: f64 = 28.0;
pub const SI5_HYDRANT_HEIGHT_STEP: f64 = 15.0;
pub const SI5_HYDRANT_FACADE_STEP: f64 = 5000.0;
pub const SI5_MAX_HYDRANT_DISTANCE: f64 = 100.0;

// ============================================================================
// SI 6 - Structural resistance
// ============================================================================

/// Row groups of the structural resistance matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralGroup {
    SingleFamily,
    /// Residential, educational and office
    Housing,
    /// Commercial, assembly and healthcare
    PublicAccess,
    ParkingExclusive,
    ParkingUnder,
}

impl StructuralGroup {
    pub fn of(us_building: BuildingUse) -> Option<Self> {
        match us_building {
            BuildingUse::ResidentialSingle => Some(StructuralGroup::SingleFamily),
            BuildingUse::Residential | BuildingUse::Educational | BuildingUse::Office => {
                Some(StructuralGroup::Housing)
            }
            BuildingUse::Commercial | BuildingUse::Assembly | BuildingUse::Healthcare => {
                Some(StructuralGroup::PublicAccess)
            }
            BuildingUse::ParkingExclusive => Some(StructuralGroup::ParkingExclusive),
            BuildingUse::ParkingUnder => Some(StructuralGroup::ParkingUnder),
            _ => None,
        }
    }
}

/// Threshold (exclusive) above which a building is high-rise for SI 6
pub const SI6_HIGH_RISE_HEIGHT: f64 = 28.0;
/// Above this height the simplified tables no longer apply
pub const SI6_MAX_TABULATED_HEIGHT: f64 = 100.0;

/// Required structural rating for sectors below grade
pub fn below_grade_rating(group: StructuralGroup, height: f64) -> FireRating {
    match group {
        StructuralGroup::SingleFamily => FireRating::R(30),
        StructuralGroup::Housing => FireRating::R(120),
        StructuralGroup::PublicAccess if height > SI6_HIGH_RISE_HEIGHT => FireRating::R(180),
        StructuralGroup::PublicAccess => FireRating::R(120),
        StructuralGroup::ParkingExclusive => FireRating::R(90),
        StructuralGroup::ParkingUnder => FireRating::R(120),
    }
}

/// Required structural rating for sectors above grade (roofs included)
pub fn above_grade_rating(group: StructuralGroup) -> HeightBands<FireRating> {
    match group {
        StructuralGroup::SingleFamily => HeightBands {
            bands: &[],
            above: FireRating::R(30),
        },
        StructuralGroup::Housing => HeightBands {
            bands: &[(15.0, FireRating::R(60)), (28.0, FireRating::R(90))],
            above: FireRating::R(120),
        },
        StructuralGroup::PublicAccess => HeightBands {
            bands: &[(15.0, FireRating::R(90)), (28.0, FireRating::R(120))],
            above: FireRating::R(180),
        },
        StructuralGroup::ParkingExclusive => HeightBands {
            bands: &[],
            above: FireRating::R(90),
        },
        StructuralGroup::ParkingUnder => HeightBands {
            bands: &[],
            above: FireRating::R(120),
        },
    }
}
