//! Near-surface meteorology and energy balance for snowpack models.
//!
//! This crate bundles the workspace members:
//!
//! - [`snowmet_core`]: field storage, the component trait, the model runner and the
//!   registered variables
//! - [`snowmet_components`]: the [`Meteorology`](snowmet_components::meteorology::Meteorology)
//!   energy balance component
//!
//! ```no_run
//! use snowmet::prelude::*;
//!
//! # fn main() -> SnowMetResult<()> {
//! let mut fields = NodeFields::new(2)
//!     .with_full(VAR_AIR_TEMPERATURE.name, 1.0)?
//!     .with_full(VAR_SURFACE_TEMPERATURE.name, -1.0)?
//!     .with_full(VAR_LATITUDE.name, 40.0)?
//!     .with_full(VAR_LONGITUDE.name, -105.0)?;
//!
//! let config = MeteorologyConfig::new("2023-01-01 12:00:00").with_gmt_offset(-7.0);
//! let mut meteorology = Meteorology::new(&mut fields, config)?;
//! meteorology.run_one_step(&mut fields, 3600.0)?;
//!
//! let q_sum = fields.get(VAR_NET_ENERGY_FLUX.name)?;
//! # Ok(())
//! # }
//! ```

pub use snowmet_components;
pub use snowmet_core;

/// Commonly used types
pub mod prelude {
    pub use snowmet_components::meteorology::{
        Layer, Meteorology, MeteorologyConfig, MeteorologyParameters, PhysicalConstants,
        PressureUnit, SaturationMethod,
    };
    pub use snowmet_core::component::Component;
    pub use snowmet_core::errors::{SnowMetError, SnowMetResult};
    pub use snowmet_core::field::{FieldStore, NodeFields, NodeValue};
    pub use snowmet_core::model::{Model, ModelBuilder};
    pub use snowmet_core::standard_variables::*;
}
