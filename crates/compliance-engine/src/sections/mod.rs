//! The six DB-SI section evaluators
//!
//! Each module implements [`Section`](crate::engine::Section) for one
//! section. [`SectionInput`] is the closed set of raw inputs and
//! [`evaluate`] dispatches to the matching evaluator.

pub mod si1_interior;
pub mod si2_exterior;
pub mod si3_evacuation;
pub mod si4_installations;
pub mod si5_intervention;
pub mod si6_structure;

use serde::{Deserialize, Serialize};
use shared_types::{ProjectContext, SectionId, SectionResult};

use crate::engine::{evaluate_section, EvaluationOptions};
use crate::error::ValidationError;

pub use si1_interior::{InteriorSpread, InteriorSpreadInput};
pub use si2_exterior::{ExteriorSpread, ExteriorSpreadInput};
pub use si3_evacuation::{Evacuation, EvacuationInput};
pub use si4_installations::{Installations, InstallationsInput, ProtectionSystem};
pub use si5_intervention::{Intervention, InterventionInput};
pub use si6_structure::{Structure, StructureInput};

/// Raw input for one section, tagged by section code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum SectionInput {
    Si1(InteriorSpreadInput),
    Si2(ExteriorSpreadInput),
    Si3(EvacuationInput),
    Si4(InstallationsInput),
    Si5(InterventionInput),
    Si6(StructureInput),
}

impl SectionInput {
    pub fn section_id(&self) -> SectionId {
        match self {
            SectionInput::Si1(_) => SectionId::Si1,
            SectionInput::Si2(_) => SectionId::Si2,
            SectionInput::Si3(_) => SectionId::Si3,
            SectionInput::Si4(_) => SectionId::Si4,
            SectionInput::Si5(_) => SectionId::Si5,
            SectionInput::Si6(_) => SectionId::Si6,
        }
    }
}

/// Evaluate one section against the project context
pub fn evaluate(
    context: &ProjectContext,
    input: &SectionInput,
    options: &EvaluationOptions,
) -> Result<SectionResult, ValidationError> {
    let result = match input {
        SectionInput::Si1(input) => evaluate_section::<InteriorSpread>(context, input, options)?.result,
        SectionInput::Si2(input) => evaluate_section::<ExteriorSpread>(context, input, options)?.result,
        SectionInput::Si3(input) => evaluate_section::<Evacuation>(context, input, options)?.result,
        SectionInput::Si4(input) => evaluate_section::<Installations>(context, input, options)?.result,
        SectionInput::Si5(input) => evaluate_section::<Intervention>(context, input, options)?.result,
        SectionInput::Si6(input) => evaluate_section::<Structure>(context, input, options)?.result,
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::project;
    use pretty_assertions::assert_eq;
    use shared_types::BuildingUse;

    #[test]
    fn test_input_deserializes_from_tagged_json() {
        let input: SectionInput = serde_json::from_str(
            r#"{"section": "si1", "compartment_area": "2000", "material_type": "b"}"#,
        )
        .unwrap();
        assert_eq!(input.section_id(), SectionId::Si1);

        let ctx = project(BuildingUse::Office, 10.0);
        let result = evaluate(&ctx, &input, &EvaluationOptions::default()).unwrap();
        assert_eq!(result.section_id, SectionId::Si1);
        assert_eq!(result.title, "SI 1 - Interior fire spread");
        assert!(result.compliance());
    }

    #[test]
    fn test_installed_systems_deserialize_as_list() {
        let input: SectionInput = serde_json::from_str(
            r#"{"section": "si4", "risk_level": "low", "installed_systems": ["extinguishers", "bie"]}"#,
        )
        .unwrap();
        let ctx = project(BuildingUse::Office, 10.0);
        let result = evaluate(&ctx, &input, &EvaluationOptions::default()).unwrap();
        assert!(result.compliance());
    }

    #[test]
    fn test_validation_error_carries_section() {
        let ctx = project(BuildingUse::Office, 10.0);
        let err = evaluate(
            &ctx,
            &SectionInput::Si5(InterventionInput::default()),
            &EvaluationOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.section, Some(SectionId::Si5));
        assert_eq!(
            err.to_string(),
            "SI 5: missing or invalid fields: building_width, access_road_width, distance_to_access"
        );
    }
}
