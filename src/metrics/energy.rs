//! Cumulative energy from instantaneous power.

use tracing::info;

use crate::error::{AnalysisError, DuplicateVariableError};
use crate::panel::Panel;

/// Joules to kilowatt-hours.
pub const J_TO_KWH: f64 = 1.0 / 3600.0 / 1000.0;

/// Running total of `power[t] * dt_seconds`, converted to kWh.
///
/// A left-to-right cumulative sum, not a trapezoidal integral: the first
/// value is `power[0] * dt_seconds * J_TO_KWH`.
///
/// # Examples
///
/// ```
/// use household_panel::metrics::energy::cumulative_energy_kwh;
///
/// let kwh = cumulative_energy_kwh(&[100.0, 100.0, 100.0], 120.0);
/// assert!((kwh[2] - 0.01).abs() < 1e-12);
/// ```
pub fn cumulative_energy_kwh(power_w: &[f64], dt_seconds: f64) -> Vec<f64> {
    let mut joules = 0.0_f64;
    power_w
        .iter()
        .map(|p| {
            joules += p * dt_seconds;
            joules * J_TO_KWH
        })
        .collect()
}

/// Adds the energy variable to the panel, one cumulative series per entity.
///
/// The panel is unchanged when this fails.
///
/// # Errors
///
/// Returns [`AnalysisError::DuplicateVariable`] if `energy_variable` is
/// already present and [`AnalysisError::UnknownVariable`] if the panel has
/// no `power_variable`.
pub fn derive_energy(
    panel: &mut Panel,
    power_variable: &str,
    energy_variable: &str,
    dt_seconds: f64,
) -> Result<(), AnalysisError> {
    if panel.has_variable(energy_variable) {
        return Err(DuplicateVariableError {
            variable: energy_variable.to_string(),
        }
        .into());
    }
    let power = panel
        .variable(power_variable)
        .ok_or_else(|| AnalysisError::UnknownVariable(power_variable.to_string()))?;

    let columns: Vec<Vec<f64>> = power
        .iter()
        .map(|(_, column)| cumulative_energy_kwh(column, dt_seconds))
        .collect();

    panel.add_variable(energy_variable, columns)?;
    info!(variable = energy_variable, dt_seconds, "derived cumulative energy");
    Ok(())
}

/// Final cumulative value per entity, in panel entity order.
///
/// # Errors
///
/// Returns [`AnalysisError::UnknownVariable`] if the energy variable has
/// not been derived.
pub fn total_energy_kwh(
    panel: &Panel,
    energy_variable: &str,
) -> Result<Vec<(String, f64)>, AnalysisError> {
    let energy = panel
        .variable(energy_variable)
        .ok_or_else(|| AnalysisError::UnknownVariable(energy_variable.to_string()))?;
    Ok(energy
        .iter()
        .map(|(entity, column)| (entity.to_string(), column.last().copied().unwrap_or(0.0)))
        .collect())
}
