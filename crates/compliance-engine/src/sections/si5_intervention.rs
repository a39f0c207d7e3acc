//! SI 5 - Fire brigade intervention
//!
//! Access road width and approach distance by height band, hydrant count,
//! hydrant distance and the fire-fighters lift of high-rise buildings.

use serde::{Deserialize, Serialize};
use shared_types::{Calculation, ProjectContext, SectionId};

use crate::engine::{Assessment, Bound, Outcome, Section};
use crate::error::ValidationError;
use crate::extractors::numeric::format_quantity;
use crate::fields::FieldReader;
use crate::tables::{
    FIRE_BRIGADE_ACCESS, SI5_FIRE_LIFT_HEIGHT, SI5_HYDRANT_FACADE_STEP, SI5_HYDRANT_HEIGHT_STEP,
    SI5_MAX_HYDRANT_DISTANCE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterventionInput {
    pub building_height: String,
    /// Façade length facing the access road
    pub building_width: String,
    pub access_road_width: String,
    pub distance_to_access: String,
    pub hydrant_distance: String,
    pub has_fire_lift: bool,
    pub has_hydrants: bool,
    pub accessible_roof: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionThresholds {
    pub building_height: f64,
    pub building_width: f64,
    pub access_road_width: f64,
    pub distance_to_access: f64,
    pub required_road_width: f64,
    pub max_distance_to_building: f64,
    pub required_hydrants: u32,
    pub hydrant_distance: Option<f64>,
    pub needs_fire_lift: bool,
}

fn hydrant_count(n: u32) -> String {
    if n == 1 {
        "1 hydrant".to_string()
    } else {
        format!("{} hydrants", n)
    }
}

pub fn required_hydrants(height: f64, facade_length: f64) -> u32 {
    (height / SI5_HYDRANT_HEIGHT_STEP)
        .max(facade_length / SI5_HYDRANT_FACADE_STEP)
        .ceil() as u32
}

pub struct Intervention;

impl Section for Intervention {
    type Input = InterventionInput;
    type Thresholds = InterventionThresholds;

    const ID: SectionId = SectionId::Si5;

    fn assess(
        context: &ProjectContext,
        input: &InterventionInput,
    ) -> Result<Assessment<InterventionThresholds>, ValidationError> {
        let mut fields = FieldReader::new();
        let height =
            fields.number_or("building_height", &input.building_height, context.evacuation_height);
        let width = fields.number("building_width", &input.building_width);
        let road_width = fields.number("access_road_width", &input.access_road_width);
        let distance = fields.number("distance_to_access", &input.distance_to_access);
        let hydrant_distance = fields.optional_number("hydrant_distance", &input.hydrant_distance);

        let (Some(height), Some(width), Some(road_width), Some(distance)) =
            (height, width, road_width, distance)
        else {
            return Err(fields.into_error(Some(Self::ID)));
        };
        fields.finish(Some(Self::ID))?;

        let access = FIRE_BRIGADE_ACCESS.lookup(height);
        let hydrants = required_hydrants(height, width);
        let needs_fire_lift = height > SI5_FIRE_LIFT_HEIGHT;

        let mut outcomes = vec![
            Outcome::limit(
                "Access road width",
                road_width,
                access.road_width,
                Bound::AtLeast,
            )
            .advise(format!(
                "Insufficient access width. Minimum: {} m",
                access.road_width
            )),
            Outcome::limit(
                "Distance to access",
                distance,
                access.max_distance,
                Bound::AtMost,
            )
            .advise(format!(
                "Excessive approach distance. Maximum: {} m",
                access.max_distance
            )),
            Outcome::requirement(
                format!("{} available", hydrant_count(hydrants)),
                input.has_hydrants,
            )
            .advise(format!("Provide {} for the building", hydrant_count(hydrants))),
        ];

        if let Some(hydrant_distance) = hydrant_distance {
            outcomes.push(
                Outcome::limit(
                    "Hydrant distance",
                    hydrant_distance,
                    SI5_MAX_HYDRANT_DISTANCE,
                    Bound::AtMost,
                )
                .advise("Hydrant too far (maximum 100 m from the building)"),
            );
        }

        if needs_fire_lift {
            outcomes.push(
                Outcome::requirement("Fire-fighters lift", input.has_fire_lift)
                    .advise("Install a fire-fighters lift"),
            );
            if !input.accessible_roof {
                outcomes.push(Outcome::Advisory(
                    "Provide fire brigade access to the roof".to_string(),
                ));
            }
        }

        Ok(Assessment {
            thresholds: InterventionThresholds {
                building_height: height,
                building_width: width,
                access_road_width: road_width,
                distance_to_access: distance,
                required_road_width: access.road_width,
                max_distance_to_building: access.max_distance,
                required_hydrants: hydrants,
                hydrant_distance,
                needs_fire_lift,
            },
            outcomes,
        })
    }

    fn calculations(t: &InterventionThresholds) -> Vec<Calculation> {
        let mut rows = vec![
            Calculation::new(
                "Required road width",
                format_quantity(t.required_road_width, "m"),
            ),
            Calculation::new("Access road width", format_quantity(t.access_road_width, "m")),
            Calculation::new(
                "Maximum distance to building",
                format_quantity(t.max_distance_to_building, "m"),
            ),
            Calculation::new("Distance to access", format_quantity(t.distance_to_access, "m")),
            Calculation::new("Required hydrants", t.required_hydrants.to_string()),
        ];
        if let Some(distance) = t.hydrant_distance {
            rows.push(Calculation::new("Hydrant distance", format_quantity(distance, "m")));
        }
        rows.push(Calculation::new(
            "Fire-fighters lift required",
            if t.needs_fire_lift { "Yes" } else { "No" },
        ));
        rows
    }
}
