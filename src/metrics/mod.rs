//! Metrics derived from panel variables and written back into it.

pub mod energy;

pub use energy::{cumulative_energy_kwh, derive_energy, total_energy_kwh};
