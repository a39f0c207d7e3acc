//! SI 2 - Exterior fire spread
//!
//! Separation to the neighbouring property, share of openings in the façade,
//! reaction-to-fire class of the façade finish and of the insulation in
//! ventilated cavities.

use serde::{Deserialize, Serialize};
use shared_types::{Calculation, ProjectContext, SectionId};

use crate::classes::Euroclass;
use crate::engine::{Assessment, Bound, Outcome, Section};
use crate::error::ValidationError;
use crate::extractors::numeric::format_quantity;
use crate::fields::FieldReader;
use crate::tables::{
    CAVITY_INSULATION_CLASS, FACADE_CLASS, SI2_BASE_SEPARATION, SI2_MAX_OPENING_PERCENTAGE,
    SI2_OPENING_SURCHARGE, SI2_OPENING_SURCHARGE_FROM, SI2_SEPARATION_FACTOR,
    SI2_SEPARATION_HEIGHT,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExteriorSpreadInput {
    pub facade_height: String,
    pub distance_to_property: String,
    pub opening_percentage: String,
    pub facade_material: String,
    /// Insulation class inside a ventilated façade cavity, blank when there is none
    pub cavity_insulation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExteriorSpreadThresholds {
    pub facade_height: f64,
    pub distance_to_property: f64,
    pub opening_percentage: Option<f64>,
    pub min_distance: f64,
    pub max_opening_percentage: f64,
    pub facade_material: Euroclass,
    pub required_facade_class: Euroclass,
    pub cavity_insulation: Option<Euroclass>,
    pub required_cavity_class: Euroclass,
}

/// Minimum separation for a façade height and opening share
pub fn min_separation(facade_height: f64, opening_percentage: Option<f64>) -> f64 {
    let mut distance = SI2_BASE_SEPARATION;
    if facade_height > SI2_SEPARATION_HEIGHT {
        distance = distance.max(facade_height * SI2_SEPARATION_FACTOR);
    }
    if opening_percentage.is_some_and(|p| p > SI2_OPENING_SURCHARGE_FROM) {
        distance *= SI2_OPENING_SURCHARGE;
    }
    distance
}

pub struct ExteriorSpread;

impl Section for ExteriorSpread {
    type Input = ExteriorSpreadInput;
    type Thresholds = ExteriorSpreadThresholds;

    const ID: SectionId = SectionId::Si2;

    fn assess(
        _context: &ProjectContext,
        input: &ExteriorSpreadInput,
    ) -> Result<Assessment<ExteriorSpreadThresholds>, ValidationError> {
        let mut fields = FieldReader::new();
        let height = fields.number("facade_height", &input.facade_height);
        let distance = fields.number("distance_to_property", &input.distance_to_property);
        let openings = fields.optional_number("opening_percentage", &input.opening_percentage);
        let material = fields.choice::<Euroclass>("facade_material", &input.facade_material);
        let cavity = fields.optional_choice::<Euroclass>("cavity_insulation", &input.cavity_insulation);

        let (Some(height), Some(distance), Some(material)) = (height, distance, material) else {
            return Err(fields.into_error(Some(Self::ID)));
        };
        fields.finish(Some(Self::ID))?;

        let min_distance = min_separation(height, openings);
        let required_facade_class = FACADE_CLASS.lookup(height);
        let required_cavity_class = CAVITY_INSULATION_CLASS.lookup(height);

        let mut outcomes = vec![Outcome::limit(
            "Separation to neighbouring property",
            distance,
            min_distance,
            Bound::AtLeast,
        )
        .advise(format!("Increase the separation distance to {:.1} m", min_distance))
        .advise("Reduce the percentage of openings")
        .advise("Improve the façade materials")];

        if let Some(openings) = openings {
            outcomes.push(
                Outcome::limit(
                    "Façade openings (%)",
                    openings,
                    SI2_MAX_OPENING_PERCENTAGE,
                    Bound::AtMost,
                )
                .advise(format!(
                    "Reduce openings below {}%",
                    SI2_MAX_OPENING_PERCENTAGE
                )),
            );
        }

        outcomes.push(
            Outcome::requirement(
                format!("Façade material class {} or better", required_facade_class),
                material.satisfies(required_facade_class),
            )
            .advise(format!(
                "Use façade materials of class {} or better",
                required_facade_class
            )),
        );

        // A failing cavity insulation carries no advice of its own
        if let Some(cavity) = cavity {
            outcomes.push(Outcome::requirement(
                format!("Cavity insulation class {} or better", required_cavity_class),
                cavity.satisfies(required_cavity_class),
            ));
        }

        Ok(Assessment {
            thresholds: ExteriorSpreadThresholds {
                facade_height: height,
                distance_to_property: distance,
                opening_percentage: openings,
                min_distance,
                max_opening_percentage: SI2_MAX_OPENING_PERCENTAGE,
                facade_material: material,
                required_facade_class,
                cavity_insulation: cavity,
                required_cavity_class,
            },
            outcomes,
        })
    }

    fn calculations(t: &ExteriorSpreadThresholds) -> Vec<Calculation> {
        let mut rows = vec![
            Calculation::new("Minimum separation distance", format!("{:.1} m", t.min_distance)),
            Calculation::new(
                "Separation to neighbouring property",
                format_quantity(t.distance_to_property, "m"),
            ),
            Calculation::new(
                "Maximum opening percentage",
                format_quantity(t.max_opening_percentage, "%"),
            ),
        ];
        if let Some(openings) = t.opening_percentage {
            rows.push(Calculation::new(
                "Opening percentage",
                format_quantity(openings, "%"),
            ));
        }
        rows.push(Calculation::new(
            "Required façade class",
            t.required_facade_class.code(),
        ));
        rows.push(Calculation::new("Façade material class", t.facade_material.code()));
        if let Some(cavity) = t.cavity_insulation {
            rows.push(Calculation::new(
                "Required cavity insulation class",
                t.required_cavity_class.code(),
            ));
            rows.push(Calculation::new("Cavity insulation class", cavity.code()));
        }
        rows
    }
}
