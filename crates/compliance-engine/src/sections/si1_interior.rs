//! SI 1 - Interior fire spread
//!
//! Checks the fire-sector (compartment) area against the maximum allowed for
//! the building use and evacuation height, and derives the fire resistance
//! required for the sector boundaries.

use serde::{Deserialize, Serialize};
use shared_types::{BuildingUse, Calculation, ProjectContext, SectionId};

use crate::classes::{Euroclass, FireRating};
use crate::engine::{Assessment, Bound, Outcome, Section};
use crate::error::ValidationError;
use crate::extractors::numeric::{format_number, format_quantity};
use crate::fields::FieldReader;
use crate::tables::{sector_limits, SI1_HIGH_RISE_HEIGHT, SI1_HIGH_RISE_RESISTANCE};

/// Raw SI 1 form
///
/// `us_building`, `evacuation_height` and `surface_area` fall back to the
/// project data when left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteriorSpreadInput {
    pub us_building: String,
    pub evacuation_height: String,
    pub surface_area: String,
    pub compartment_area: String,
    pub material_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteriorSpreadThresholds {
    pub us_building: BuildingUse,
    pub evacuation_height: f64,
    pub surface_area: f64,
    pub compartment_area: f64,
    pub max_compartment_area: f64,
    pub required_resistance: FireRating,
    /// Sectors needed to split the whole surface at the maximum area
    pub min_sectors: u32,
    pub material_type: Euroclass,
}

pub struct InteriorSpread;

impl Section for InteriorSpread {
    type Input = InteriorSpreadInput;
    type Thresholds = InteriorSpreadThresholds;

    const ID: SectionId = SectionId::Si1;

    fn assess(
        context: &ProjectContext,
        input: &InteriorSpreadInput,
    ) -> Result<Assessment<InteriorSpreadThresholds>, ValidationError> {
        let mut fields = FieldReader::new();
        let us_building = fields.choice_or("us_building", &input.us_building, context.us_building);
        let us_building = fields.accepted("us_building", us_building, &BuildingUse::PROJECT);
        let height = fields.number_or(
            "evacuation_height",
            &input.evacuation_height,
            context.evacuation_height,
        );
        let surface_area =
            fields.number_or("surface_area", &input.surface_area, context.total_surface);
        let compartment_area = fields.number("compartment_area", &input.compartment_area);
        let material_type = fields.choice::<Euroclass>("material_type", &input.material_type);

        let (Some(us_building), Some(height), Some(surface_area), Some(compartment_area), Some(material_type)) =
            (us_building, height, surface_area, compartment_area, material_type)
        else {
            return Err(fields.into_error(Some(Self::ID)));
        };
        fields.finish(Some(Self::ID))?;

        let limit = sector_limits(us_building).lookup(height);
        let mut required_resistance = limit.resistance;

        let mut outcomes = vec![Outcome::limit(
            "Fire sector area",
            compartment_area,
            limit.max_area,
            Bound::AtMost,
        )
        .advise("Reduce the area of the fire sector")
        .advise("Install automatic extinguishing systems")
        .advise("Improve the compartmentation")];

        if height > SI1_HIGH_RISE_HEIGHT {
            outcomes.push(Outcome::Advisory(
                "Meet the additional requirements for high-rise buildings".to_string(),
            ));
            required_resistance = SI1_HIGH_RISE_RESISTANCE;
        }

        Ok(Assessment {
            thresholds: InteriorSpreadThresholds {
                us_building,
                evacuation_height: height,
                surface_area,
                compartment_area,
                max_compartment_area: limit.max_area,
                required_resistance,
                min_sectors: (surface_area / limit.max_area).ceil() as u32,
                material_type,
            },
            outcomes,
        })
    }

    fn calculations(t: &InteriorSpreadThresholds) -> Vec<Calculation> {
        vec![
            Calculation::new("Building use", t.us_building.label()),
            Calculation::new(
                "Maximum fire sector area",
                format_quantity(t.max_compartment_area, "m²"),
            ),
            Calculation::new("Fire sector area", format_quantity(t.compartment_area, "m²")),
            Calculation::new(
                "Required resistance of sector boundaries",
                t.required_resistance.to_string(),
            ),
            Calculation::new("Minimum number of fire sectors", format_number(t.min_sectors as f64)),
            Calculation::new("Lining material class", t.material_type.code()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{evaluate_section, EvaluationOptions};
    use crate::test_support::project;
    use pretty_assertions::assert_eq;

    fn input(compartment_area: &str) -> InteriorSpreadInput {
        InteriorSpreadInput {
            compartment_area: compartment_area.to_string(),
            material_type: "b".to_string(),
            ..Default::default()
        }
    }

    fn run(
        context: &ProjectContext,
        input: &InteriorSpreadInput,
    ) -> crate::engine::Evaluation<InteriorSpreadThresholds> {
        evaluate_section::<InteriorSpread>(context, input, &EvaluationOptions::default()).unwrap()
    }

    #[test]
    fn test_office_within_limit() {
        let ctx = project(BuildingUse::Office, 10.0);
        let eval = run(&ctx, &input("2000"));

        assert_eq!(eval.thresholds.max_compartment_area, 2500.0);
        assert_eq!(eval.thresholds.required_resistance.to_string(), "EI 60");
        assert!(eval.compliance());
        assert!(eval.recommendations().is_empty());
    }

    #[test]
    fn test_residential_above_15m_exceeds_limit() {
        let ctx = project(BuildingUse::Residential, 20.0);
        let eval = run(&ctx, &input("1500"));

        assert_eq!(eval.thresholds.max_compartment_area, 1000.0);
        assert_eq!(eval.thresholds.required_resistance, FireRating::Ei(90));
        assert!(!eval.compliance());
        assert!(eval
            .recommendations()
            .iter()
            .any(|r| r.contains("Reduce the area of the fire sector")));
    }

    #[test]
    fn test_residential_at_15m_keeps_lower_band() {
        let ctx = project(BuildingUse::Residential, 15.0);
        let eval = run(&ctx, &input("2500"));
        assert_eq!(eval.thresholds.max_compartment_area, 2500.0);
        assert!(eval.compliance());
    }

    #[test]
    fn test_area_equal_to_limit_complies() {
        let ctx = project(BuildingUse::Industrial, 8.0);
        let eval = run(&ctx, &input("1000"));
        assert!(eval.compliance());
    }

    #[test]
    fn test_commercial_above_10m() {
        let ctx = project(BuildingUse::Commercial, 12.0);
        let eval = run(&ctx, &input("1400"));
        assert_eq!(eval.thresholds.max_compartment_area, 1500.0);
        assert_eq!(eval.thresholds.required_resistance, FireRating::Ei(90));
    }

    #[test]
    fn test_high_rise_raises_resistance_without_failing() {
        let ctx = project(BuildingUse::Office, 30.0);
        let eval = run(&ctx, &input("2000"));

        assert_eq!(eval.thresholds.required_resistance, FireRating::Ei(120));
        assert!(eval.compliance());
        assert_eq!(
            eval.recommendations(),
            ["Meet the additional requirements for high-rise buildings"]
        );
    }

    #[test]
    fn test_section_overrides_take_precedence() {
        let ctx = project(BuildingUse::Office, 10.0);
        let mut form = input("1200");
        form.us_building = "residential".to_string();
        form.evacuation_height = "18".to_string();
        let eval = run(&ctx, &form);
        assert_eq!(eval.thresholds.us_building, BuildingUse::Residential);
        assert_eq!(eval.thresholds.max_compartment_area, 1000.0);
    }

    #[test]
    fn test_min_sectors_from_total_surface() {
        let ctx = project(BuildingUse::Industrial, 8.0);
        let mut form = input("900");
        form.surface_area = "2500".to_string();
        let eval = run(&ctx, &form);
        assert_eq!(eval.thresholds.min_sectors, 3);
    }

    #[test]
    fn test_validation_names_offending_fields() {
        let ctx = project(BuildingUse::Office, 10.0);
        let form = InteriorSpreadInput {
            compartment_area: "-5".to_string(),
            material_type: "x".to_string(),
            ..Default::default()
        };
        let err = evaluate_section::<InteriorSpread>(&ctx, &form, &EvaluationOptions::default())
            .unwrap_err();
        assert_eq!(err.section, Some(SectionId::Si1));
        assert_eq!(err.fields, vec!["compartment_area", "material_type"]);
    }

    #[test]
    fn test_rejects_use_outside_section_set() {
        let ctx = project(BuildingUse::Office, 10.0);
        let mut form = input("1000");
        form.us_building = "parking_under".to_string();
        let err = evaluate_section::<InteriorSpread>(&ctx, &form, &EvaluationOptions::default())
            .unwrap_err();
        assert_eq!(err.fields, vec!["us_building"]);
    }
}
