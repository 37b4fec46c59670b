//! Adapters that turn external files into calculator inputs.
//!
//! * [`VehicleLoader`] reads vehicle options from CSV.
//! * [`RuleSetLoader`] reads tax rule sets from TOML.

mod rule_set_loader;
mod vehicle_loader;

pub use rule_set_loader::{RuleSetLoader, RuleSetLoaderError};
pub use vehicle_loader::{VehicleLoader, VehicleLoaderError, VehicleRecord};
