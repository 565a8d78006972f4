//! Variable registration system for snowmet.
//!
//! Node fields are identified by long, standardised names such as
//! `atmosphere_bottom_air__temperature`. This module keeps the metadata for
//! those names in one place so components, the model builder and users agree on
//! units and on the default value an optional driver takes when a caller never
//! supplies it.
//!
//! This module provides:
//! - [`StaticVariableDefinition`] for compile-time variable metadata
//! - [`VariableDefinition`], an owned, serialisable copy of that metadata
//! - [`VariableRegistry`] and the global [`VARIABLE_REGISTRY`] for lookups
//! - [`define_static_variable!`] for registering a variable at compile time
//!
//! # Usage
//!
//! ```rust
//! use snowmet_core::variable::VARIABLE_REGISTRY;
//!
//! let albedo = VARIABLE_REGISTRY.get("land_surface__albedo").unwrap();
//! assert_eq!(albedo.unit, "1");
//! assert_eq!(albedo.default, Some(0.3));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Owned definition of a node variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Unique field name
    pub name: String,
    /// Canonical unit
    pub unit: String,
    /// Value used to create the field when a caller does not provide it
    pub default: Option<f64>,
    /// Human-readable description
    pub description: String,
}

impl VariableDefinition {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        default: Option<f64>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            default,
            description: description.into(),
        }
    }
}

impl fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.unit)
    }
}

/// Static variable definition holder for compile-time registration.
///
/// Holds `&'static str` references so it can be built in const contexts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticVariableDefinition {
    /// Variable name
    pub name: &'static str,
    /// Canonical unit
    pub unit: &'static str,
    /// Default value for optional drivers
    pub default: Option<f64>,
    /// Description
    pub description: &'static str,
}

impl StaticVariableDefinition {
    /// Create a new static variable definition.
    pub const fn new(
        name: &'static str,
        unit: &'static str,
        default: Option<f64>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            unit,
            default,
            description,
        }
    }

    /// Convert to a [`VariableDefinition`].
    pub fn to_variable_definition(&self) -> VariableDefinition {
        VariableDefinition::new(self.name, self.unit, self.default, self.description)
    }
}

inventory::collect!(StaticVariableDefinition);

/// Lookup table over every variable registered with [`define_static_variable!`].
#[derive(Debug)]
pub struct VariableRegistry {
    by_name: HashMap<&'static str, &'static StaticVariableDefinition>,
}

impl VariableRegistry {
    fn from_inventory() -> Self {
        let by_name = inventory::iter::<StaticVariableDefinition>
            .into_iter()
            .map(|var| (var.name, var))
            .collect();
        Self { by_name }
    }

    /// Get a variable definition by name.
    pub fn get(&self, name: &str) -> Option<&'static StaticVariableDefinition> {
        self.by_name.get(name).copied()
    }

    /// Get a variable definition by name, failing for unregistered names.
    pub fn require(
        &self,
        name: &str,
    ) -> crate::errors::SnowMetResult<&'static StaticVariableDefinition> {
        self.get(name)
            .ok_or_else(|| crate::errors::SnowMetError::UnknownVariable(name.to_string()))
    }

    /// Default value of a registered variable, if it has one.
    pub fn default_for(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|var| var.default)
    }

    /// Check if a variable is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// List all registered variables, sorted by name.
    pub fn list_all(&self) -> Vec<VariableDefinition> {
        let mut result: Vec<VariableDefinition> = self
            .by_name
            .values()
            .map(|var| var.to_variable_definition())
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Global registry of all compile-time variables.
pub static VARIABLE_REGISTRY: LazyLock<VariableRegistry> =
    LazyLock::new(VariableRegistry::from_inventory);

/// Macro for defining variables at compile time using static strings.
///
/// Variables defined with this macro are automatically registered with the global
/// [`VARIABLE_REGISTRY`] when the program starts.
///
/// # Usage
///
/// ```rust
/// use snowmet_core::define_static_variable;
///
/// define_static_variable!(
///     MY_VARIABLE,
///     name = "my_surface__thing",
///     unit = "m",
///     default = 1.5,
///     description = "A test variable",
/// );
///
/// assert_eq!(MY_VARIABLE.default, Some(1.5));
/// ```
///
/// The `default` entry is optional and is omitted for required drivers and
/// derived outputs.
#[macro_export]
macro_rules! define_static_variable {
    (
        $var_name:ident,
        name = $name:literal,
        unit = $unit:literal,
        description = $desc:literal $(,)?
    ) => {
        $crate::define_static_variable!(@register $var_name, $name, $unit, ::core::option::Option::None, $desc);
    };
    (
        $var_name:ident,
        name = $name:literal,
        unit = $unit:literal,
        default = $default:expr,
        description = $desc:literal $(,)?
    ) => {
        $crate::define_static_variable!(@register $var_name, $name, $unit, ::core::option::Option::Some($default), $desc);
    };
    (@register $var_name:ident, $name:literal, $unit:literal, $default:expr, $desc:literal) => {
        #[doc = concat!("Static variable definition for `", $name, "`")]
        pub static $var_name: $crate::variable::StaticVariableDefinition =
            $crate::variable::StaticVariableDefinition::new($name, $unit, $default, $desc);

        $crate::inventory::submit! {
            $crate::variable::StaticVariableDefinition::new($name, $unit, $default, $desc)
        }
    };
}

pub use crate::define_static_variable;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_variables::{VAR_AIR_TEMPERATURE, VAR_ALBEDO, VAR_NET_ENERGY_FLUX};

    #[test]
    fn test_variable_definition_new() {
        let var = VariableDefinition::new("snowpack__depth", "m", Some(0.0), "Snow depth");

        assert_eq!(var.name, "snowpack__depth");
        assert_eq!(var.unit, "m");
        assert_eq!(var.default, Some(0.0));
        assert_eq!(format!("{}", var), "snowpack__depth [m]");
    }

    #[test]
    fn test_variable_definition_serialization() {
        let var = VAR_ALBEDO.to_variable_definition();

        let json = serde_json::to_string(&var).unwrap();
        let deserialized: VariableDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, var);
    }

    #[test]
    fn test_registry_contains_standard_variables() {
        let temperature = VARIABLE_REGISTRY
            .get("atmosphere_bottom_air__temperature")
            .expect("air temperature should be registered");
        assert_eq!(temperature, &VAR_AIR_TEMPERATURE);
        assert_eq!(temperature.default, None);

        assert!(VARIABLE_REGISTRY.is_registered(VAR_NET_ENERGY_FLUX.name));
        assert_eq!(VARIABLE_REGISTRY.default_for(VAR_ALBEDO.name), Some(0.3));
    }

    #[test]
    fn test_registry_unknown_variable() {
        assert!(VARIABLE_REGISTRY.get("not_a__variable").is_none());
        assert!(matches!(
            VARIABLE_REGISTRY.require("not_a__variable"),
            Err(crate::errors::SnowMetError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_list_all_sorted() {
        let all = VARIABLE_REGISTRY.list_all();
        assert_eq!(all.len(), VARIABLE_REGISTRY.len());
        assert!(all.windows(2).all(|w| w[0].name <= w[1].name));
    }

    define_static_variable!(
        TEST_ONLY_VARIABLE,
        name = "test_only__variable",
        unit = "K",
        description = "Registered from a test module",
    );

    #[test]
    fn test_macro_registers_variable() {
        assert_eq!(TEST_ONLY_VARIABLE.unit, "K");
        assert!(VARIABLE_REGISTRY.is_registered("test_only__variable"));
    }
}
