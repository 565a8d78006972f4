//! Components for snowmet
//!
//! - [`meteorology`]: near-surface energy balance of a snowpack, from turbulent
//!   exchange, moisture, solar geometry and radiation stages
//!
//! Each stage is backed by pure per-node functions re-exported from the module, so the
//! physics can be evaluated without a field store.

pub mod meteorology;
