//! SI 3 - Occupant evacuation
//!
//! Occupancy is taken from the form when given, otherwise derived from the
//! floor area and the occupation density of the use. From it follow the
//! exit width (one 0.80 m module per started block of 200 people) and the
//! number of exits. Travel distance limits depend on the floor count and on
//! crowded uses.

use serde::{Deserialize, Serialize};
use shared_types::{BuildingUse, Calculation, ProjectContext, SectionId};

use crate::engine::{Assessment, Bound, Outcome, Section};
use crate::error::ValidationError;
use crate::extractors::numeric::{format_number, format_quantity};
use crate::fields::FieldReader;
use crate::tables::{
    occupancy_density, SI3_EMERGENCY_LIFT_FLOORS, SI3_EMERGENCY_LIFT_OCCUPANCY,
    SI3_MODULE_WIDTH, SI3_PERSONS_PER_MODULE, SI3_PUBLIC_ADDRESS_OCCUPANCY,
    SI3_THREE_EXITS_FROM, SI3_TRAVEL_CROWDED_USE, SI3_TRAVEL_MULTI_FLOOR,
    SI3_TRAVEL_SINGLE_FLOOR, SI3_TWO_EXITS_AREA, SI3_TWO_EXITS_FROM,
};

/// Uses with a tabulated occupation density
pub const EVACUATION_USES: [BuildingUse; 7] = [
    BuildingUse::Residential,
    BuildingUse::Office,
    BuildingUse::Commercial,
    BuildingUse::Restaurant,
    BuildingUse::Educational,
    BuildingUse::Healthcare,
    BuildingUse::Assembly,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvacuationInput {
    pub us_building: String,
    pub floor_area: String,
    pub occupant_load: String,
    pub exit_width: String,
    pub travel_distance: String,
    pub number_of_floors: String,
    pub number_of_exits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvacuationThresholds {
    pub us_building: BuildingUse,
    pub occupancy: f64,
    pub required_exit_width: f64,
    pub exit_width: f64,
    pub max_travel_distance: f64,
    pub travel_distance: f64,
    pub required_exits: u32,
    pub number_of_exits: Option<f64>,
}

fn is_crowded(us_building: BuildingUse) -> bool {
    matches!(us_building, BuildingUse::Commercial | BuildingUse::Assembly)
}

/// Occupants from floor area and density, rounded up to whole people
pub fn occupancy_from_area(floor_area: f64, density: f64) -> f64 {
    (floor_area / density).ceil()
}

/// Exit width for an occupancy
pub fn required_exit_width(occupancy: f64) -> f64 {
    (occupancy / SI3_PERSONS_PER_MODULE).ceil() * SI3_MODULE_WIDTH
}

pub fn max_travel_distance(us_building: BuildingUse, floors: f64) -> f64 {
    if is_crowded(us_building) {
        SI3_TRAVEL_CROWDED_USE
    } else if floors > 1.0 {
        SI3_TRAVEL_MULTI_FLOOR
    } else {
        SI3_TRAVEL_SINGLE_FLOOR
    }
}

pub fn required_exits(occupancy: f64, floor_area: f64) -> u32 {
    let mut exits = if occupancy > SI3_THREE_EXITS_FROM {
        3
    } else if occupancy > SI3_TWO_EXITS_FROM {
        2
    } else {
        1
    };
    if floor_area > SI3_TWO_EXITS_AREA {
        exits = exits.max(2);
    }
    exits
}

pub struct Evacuation;

impl Section for Evacuation {
    type Input = EvacuationInput;
    type Thresholds = EvacuationThresholds;

    const ID: SectionId = SectionId::Si3;

    fn assess(
        context: &ProjectContext,
        input: &EvacuationInput,
    ) -> Result<Assessment<EvacuationThresholds>, ValidationError> {
        let mut fields = FieldReader::new();
        let us_building = fields.choice_or("us_building", &input.us_building, context.us_building);
        let us_building = fields.accepted("us_building", us_building, &EVACUATION_USES);
        let floor_area = fields.number("floor_area", &input.floor_area);
        let occupant_load = fields.optional_number("occupant_load", &input.occupant_load);
        let exit_width = fields.number("exit_width", &input.exit_width);
        let travel_distance = fields.number("travel_distance", &input.travel_distance);
        let floors = fields.number_or("number_of_floors", &input.number_of_floors, context.floors);
        let exits = fields.optional_number("number_of_exits", &input.number_of_exits);

        let (Some(us_building), Some(floor_area), Some(exit_width), Some(travel_distance), Some(floors)) =
            (us_building, floor_area, exit_width, travel_distance, floors)
        else {
            return Err(fields.into_error(Some(Self::ID)));
        };
        let Some(density) = occupancy_density(us_building) else {
            return Err(ValidationError::new(Some(Self::ID), vec!["us_building".to_string()]));
        };
        fields.finish(Some(Self::ID))?;

        let occupancy = occupant_load.unwrap_or_else(|| occupancy_from_area(floor_area, density));
        let required_width = required_exit_width(occupancy);
        let max_travel = max_travel_distance(us_building, floors);
        let required_exits = required_exits(occupancy, floor_area);

        let mut outcomes = vec![
            Outcome::limit("Exit width", exit_width, required_width, Bound::AtLeast).advise(
                format!("Increase exit width to {:.2} m minimum", required_width),
            ),
            Outcome::limit(
                "Travel distance",
                travel_distance,
                max_travel,
                Bound::AtMost,
            )
            .advise(format!("Reduce travel distance below {} m", max_travel))
            .advise("Add additional exits"),
        ];

        if let Some(exits) = exits {
            outcomes.push(
                Outcome::limit(
                    "Number of exits",
                    exits,
                    required_exits as f64,
                    Bound::AtLeast,
                )
                .advise(format!("Provide at least {} exits", required_exits)),
            );
        }

        if occupancy > SI3_EMERGENCY_LIFT_OCCUPANCY && floors > SI3_EMERGENCY_LIFT_FLOORS {
            outcomes.push(Outcome::Advisory("Consider an emergency lift".to_string()));
        }
        if is_crowded(us_building) && occupancy > SI3_PUBLIC_ADDRESS_OCCUPANCY {
            outcomes.push(Outcome::Advisory(
                "Install a public address system".to_string(),
            ));
            outcomes.push(Outcome::Advisory(
                "Install illuminated emergency signage".to_string(),
            ));
        }

        Ok(Assessment {
            thresholds: EvacuationThresholds {
                us_building,
                occupancy,
                required_exit_width: required_width,
                exit_width,
                max_travel_distance: max_travel,
                travel_distance,
                required_exits,
                number_of_exits: exits,
            },
            outcomes,
        })
    }

    fn calculations(t: &EvacuationThresholds) -> Vec<Calculation> {
        let mut rows = vec![
            Calculation::new("Building use", t.us_building.label()),
            Calculation::new("Calculated occupancy", format_quantity(t.occupancy, "persons")),
            Calculation::new(
                "Required exit width",
                format!("{:.2} m", t.required_exit_width),
            ),
            Calculation::new("Exit width", format_quantity(t.exit_width, "m")),
            Calculation::new(
                "Maximum travel distance",
                format_quantity(t.max_travel_distance, "m"),
            ),
            Calculation::new("Travel distance", format_quantity(t.travel_distance, "m")),
            Calculation::new("Required exits", t.required_exits.to_string()),
        ];
        if let Some(exits) = t.number_of_exits {
            rows.push(Calculation::new("Number of exits", format_number(exits)));
        }
        rows
    }
}
