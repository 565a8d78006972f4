//! Core traits and field storage for node-based snow energy balance models.
//!
//! - [`field`]: the [`FieldStore`](field::FieldStore) trait and the in-memory
//!   [`NodeFields`](field::NodeFields) store
//! - [`component`]: the [`Component`](component::Component) trait
//! - [`model`]: dependency-ordered model runner
//! - [`variable`] and [`standard_variables`]: registered field names, units and defaults

pub mod component;
#[cfg(test)]
mod example_components;
pub mod field;
pub mod model;
pub mod standard_variables;
pub mod variable;

pub mod errors;

// Used by `define_static_variable!` in downstream crates
#[doc(hidden)]
pub use inventory;
