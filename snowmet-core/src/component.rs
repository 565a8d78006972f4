//! Component abstraction.
//!
//! A component is a process that reads node fields, updates its own state and writes
//! node fields once per time step. Components declare the fields they consume and
//! produce through [`RequirementDefinition`]s so a [`Model`](crate::model::Model) can
//! order them and check that every input has a source before the first step.

use crate::errors::SnowMetResult;
use crate::field::FieldStore;
use crate::variable::StaticVariableDefinition;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Whether a component reads or writes a field
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RequirementType {
    Input,
    Output,
}

impl Display for RequirementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementType::Input => write!(f, "Input"),
            RequirementType::Output => write!(f, "Output"),
        }
    }
}

/// A field a component consumes or produces
#[derive(Debug, Eq, PartialEq, Clone, Hash, Serialize, Deserialize)]
pub struct RequirementDefinition {
    pub name: String,
    pub unit: String,
    pub requirement_type: RequirementType,
}

impl RequirementDefinition {
    pub fn new(name: &str, unit: &str, requirement_type: RequirementType) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            requirement_type,
        }
    }

    /// Input requirement taken from a registered variable
    pub fn input(variable: &StaticVariableDefinition) -> Self {
        Self::new(variable.name, variable.unit, RequirementType::Input)
    }

    /// Output requirement taken from a registered variable
    pub fn output(variable: &StaticVariableDefinition) -> Self {
        Self::new(variable.name, variable.unit, RequirementType::Output)
    }
}

/// Component of a node-based energy balance model
#[typetag::serde(tag = "type")]
pub trait Component: Debug + Send + Sync {
    /// Fields read and written by the component
    fn definitions(&self) -> Vec<RequirementDefinition>;

    fn inputs(&self) -> Vec<RequirementDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::Input)
            .collect()
    }

    fn input_names(&self) -> Vec<String> {
        self.inputs().into_iter().map(|d| d.name).collect()
    }

    fn outputs(&self) -> Vec<RequirementDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::Output)
            .collect()
    }

    fn output_names(&self) -> Vec<String> {
        self.outputs().into_iter().map(|d| d.name).collect()
    }

    /// Advance the component by `dt` seconds, writing its outputs to `fields`
    ///
    /// A failed step may leave some outputs written; callers must not trust any
    /// output of a step that returned an error.
    fn run_one_step(&mut self, fields: &mut dyn FieldStore, dt: f64) -> SnowMetResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_variables::{VAR_AIR_TEMPERATURE, VAR_SENSIBLE_HEAT_FLUX};

    #[test]
    fn test_requirement_from_variable() {
        let input = RequirementDefinition::input(&VAR_AIR_TEMPERATURE);
        assert_eq!(input.name, "atmosphere_bottom_air__temperature");
        assert_eq!(input.unit, "deg_C");
        assert_eq!(input.requirement_type, RequirementType::Input);

        let output = RequirementDefinition::output(&VAR_SENSIBLE_HEAT_FLUX);
        assert_eq!(output.requirement_type, RequirementType::Output);
        assert_eq!(format!("{}", output.requirement_type), "Output");
    }
}
