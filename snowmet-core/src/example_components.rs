#![allow(dead_code)]

use crate::component::{Component, RequirementDefinition, RequirementType};
use crate::errors::SnowMetResult;
use crate::field::FieldStore;
use serde::{Deserialize, Serialize};

// ============================================================================
// ScaleField - minimal component used to exercise the model runner
// ============================================================================

/// Writes `output = scale * input` at every node and counts its steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ScaleField {
    pub input: String,
    pub output: String,
    pub scale: f64,
    pub steps_taken: usize,
}

impl ScaleField {
    pub fn new(input: &str, output: &str, scale: f64) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            scale,
            steps_taken: 0,
        }
    }

    /// Core calculation - extracted for testability
    pub fn calculate(&self, value: f64) -> f64 {
        value * self.scale
    }
}

#[typetag::serde]
impl Component for ScaleField {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::new(&self.input, "1", RequirementType::Input),
            RequirementDefinition::new(&self.output, "1", RequirementType::Output),
        ]
    }

    fn run_one_step(&mut self, fields: &mut dyn FieldStore, _dt: f64) -> SnowMetResult<()> {
        let result = fields.get(&self.input)?.mapv(|v| self.calculate(v));
        fields.set(&self.output, result)?;
        self.steps_taken += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NodeFields;
    use ndarray::array;

    #[test]
    fn test_scale_field_step() {
        let mut fields = NodeFields::new(2).with_field("a__x", &[1.0, 2.0]).unwrap();
        let mut component = ScaleField::new("a__x", "b__x", 3.0);

        component.run_one_step(&mut fields, 1.0).unwrap();

        assert_eq!(fields.get("b__x").unwrap(), &array![3.0, 6.0]);
        assert_eq!(component.steps_taken, 1);
        assert_eq!(component.input_names(), vec!["a__x".to_string()]);
        assert_eq!(component.output_names(), vec!["b__x".to_string()]);
    }
}
