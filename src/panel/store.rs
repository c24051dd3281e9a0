//! The aligned entity × time × variable panel.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{AlignmentError, DuplicateVariableError, PanelWriteError};

use super::types::sampling_interval;

/// Values of one variable for every entity over the shared time index.
#[derive(Debug, Clone, PartialEq)]
struct VariableSlice {
    name: String,
    /// One column per entity, in panel entity order.
    columns: Vec<Vec<f64>>,
}

/// Borrowed view of one variable across all entities.
#[derive(Debug, Clone, Copy)]
pub struct VariableView<'a> {
    panel: &'a Panel,
    slice: &'a VariableSlice,
}

impl<'a> VariableView<'a> {
    pub fn name(&self) -> &'a str {
        &self.slice.name
    }

    /// Shared time index.
    pub fn time_index(&self) -> &'a [NaiveDateTime] {
        &self.panel.index
    }

    /// Column for one entity.
    pub fn column(&self, entity: &str) -> Option<&'a [f64]> {
        let e = self.panel.entity_position(entity)?;
        Some(&self.slice.columns[e])
    }

    /// `(entity, column)` pairs in panel entity order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a [f64])> + 'a {
        self.panel
            .entities
            .iter()
            .map(String::as_str)
            .zip(self.slice.columns.iter().map(Vec::as_slice))
    }
}

/// Borrowed view of one entity across all variables.
#[derive(Debug, Clone, Copy)]
pub struct EntityView<'a> {
    panel: &'a Panel,
    position: usize,
}

impl<'a> EntityView<'a> {
    pub fn key(&self) -> &'a str {
        &self.panel.entities[self.position]
    }

    /// Column of one variable for this entity.
    pub fn column(&self, variable: &str) -> Option<&'a [f64]> {
        let slice = self.panel.slice(variable)?;
        Some(&slice.columns[self.position])
    }

    /// `(variable, column)` pairs in panel variable order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a [f64])> + 'a {
        let position = self.position;
        self.panel
            .slices
            .iter()
            .map(move |s| (s.name.as_str(), s.columns[position].as_slice()))
    }
}

/// Aligned structure keyed by (entity, timestamp, variable).
///
/// Stored as one slice per variable so that derived variables
/// are appended without touching existing data. Built by
/// [`build_panel`](super::builder::build_panel).
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    entities: Vec<String>,
    index: Vec<NaiveDateTime>,
    slices: Vec<VariableSlice>,
}

impl Panel {
    /// Assembles a panel from already-validated parts.
    pub(super) fn from_parts(
        entities: Vec<String>,
        index: Vec<NaiveDateTime>,
        slices: Vec<(String, Vec<Vec<f64>>)>,
    ) -> Self {
        Self {
            entities,
            index,
            slices: slices
                .into_iter()
                .map(|(name, columns)| VariableSlice { name, columns })
                .collect(),
        }
    }

    /// Entity keys in panel order.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Shared time index.
    pub fn time_index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Variable names in panel order.
    pub fn variables(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn has_variable(&self, variable: &str) -> bool {
        self.slice(variable).is_some()
    }

    /// Observed spacing of the time index when uniform.
    pub fn sampling_interval(&self) -> Option<TimeDelta> {
        sampling_interval(&self.index)
    }

    fn entity_position(&self, entity: &str) -> Option<usize> {
        self.entities.iter().position(|e| e == entity)
    }

    fn slice(&self, variable: &str) -> Option<&VariableSlice> {
        self.slices.iter().find(|s| s.name == variable)
    }

    /// One variable across every entity and the full time range.
    pub fn variable(&self, variable: &str) -> Option<VariableView<'_>> {
        self.slice(variable)
            .map(|slice| VariableView { panel: self, slice })
    }

    /// One entity across every variable.
    pub fn entity(&self, entity: &str) -> Option<EntityView<'_>> {
        self.entity_position(entity)
            .map(|position| EntityView {
                panel: self,
                position,
            })
    }

    /// Column of values for `(entity, variable)` aligned to the time index.
    pub fn column(&self, entity: &str, variable: &str) -> Option<&[f64]> {
        let e = self.entity_position(entity)?;
        self.slice(variable).map(|s| s.columns[e].as_slice())
    }

    /// Scalar at `(entity, timestamp, variable)`.
    pub fn value(&self, entity: &str, timestamp: NaiveDateTime, variable: &str) -> Option<f64> {
        let t = self.index.binary_search(&timestamp).ok()?;
        self.column(entity, variable).map(|c| c[t])
    }

    /// Adds a new variable slice, one column per entity in panel order.
    ///
    /// The panel is left untouched when this returns an error.
    ///
    /// # Errors
    ///
    /// Returns [`PanelWriteError::Duplicate`] if the variable exists and
    /// [`PanelWriteError::Shape`] if the columns do not match the panel.
    pub fn add_variable(
        &mut self,
        variable: impl Into<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<(), PanelWriteError> {
        let variable = variable.into();
        if self.has_variable(&variable) {
            return Err(DuplicateVariableError { variable }.into());
        }
        if columns.len() != self.entities.len() {
            return Err(AlignmentError::SliceEntities {
                variable,
                expected: self.entities.len(),
                found: columns.len(),
            }
            .into());
        }
        if let Some((e, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != self.index.len())
        {
            return Err(AlignmentError::SliceShape {
                variable,
                entity: self.entities[e].clone(),
                expected: self.index.len(),
                found: col.len(),
            }
            .into());
        }

        self.slices.push(VariableSlice {
            name: variable,
            columns,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 2, 1)
            .and_then(|d| d.and_hms_opt(0, minute, 0))
            .unwrap()
    }

    fn sample() -> Panel {
        Panel::from_parts(
            vec!["house1".into(), "house2".into()],
            vec![at(0), at(2), at(4)],
            vec![
                ("Power".into(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]),
                ("Vrms".into(), vec![vec![230.0; 3], vec![231.0; 3]]),
            ],
        )
    }

    #[test]
    fn scalar_lookup() {
        let panel = sample();
        assert_eq!(panel.value("house2", at(2), "Power"), Some(5.0));
        assert_eq!(panel.value("house2", at(3), "Power"), None);
        assert_eq!(panel.value("house3", at(2), "Power"), None);
    }

    #[test]
    fn variable_view_iterates_entities_in_order() {
        let panel = sample();
        let view = panel.variable("Power").unwrap();
        let keys: Vec<&str> = view.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["house1", "house2"]);
        assert_eq!(view.column("house1"), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(view.time_index().len(), 3);
    }

    #[test]
    fn entity_view_iterates_variables_in_order() {
        let panel = sample();
        let view = panel.entity("house1").unwrap();
        let names: Vec<&str> = view.iter().map(|(v, _)| v).collect();
        assert_eq!(names, vec!["Power", "Vrms"]);
        assert_eq!(view.column("Vrms"), Some(&[230.0; 3][..]));
        assert_eq!(view.key(), "house1");
    }

    #[test]
    fn add_variable_appends_slice() {
        let mut panel = sample();
        panel
            .add_variable("Irms", vec![vec![0.1; 3], vec![0.2; 3]])
            .unwrap();
        assert_eq!(panel.variables(), vec!["Power", "Vrms", "Irms"]);
        assert_eq!(panel.column("house2", "Irms"), Some(&[0.2; 3][..]));
    }

    #[test]
    fn add_existing_variable_is_rejected_and_panel_unchanged() {
        let mut panel = sample();
        let before = panel.clone();
        let err = panel
            .add_variable("Power", vec![vec![0.0; 3], vec![0.0; 3]])
            .unwrap_err();
        assert_eq!(
            err,
            PanelWriteError::Duplicate(DuplicateVariableError {
                variable: "Power".into()
            })
        );
        assert_eq!(panel, before);
    }

    #[test]
    fn add_variable_checks_shape() {
        let mut panel = sample();
        let err = panel
            .add_variable("Irms", vec![vec![0.1; 3], vec![0.2; 2]])
            .unwrap_err();
        assert!(matches!(
            err,
            PanelWriteError::Shape(AlignmentError::SliceShape { found: 2, .. })
        ));
        let err = panel.add_variable("Irms", vec![vec![0.1; 3]]).unwrap_err();
        assert!(matches!(
            err,
            PanelWriteError::Shape(AlignmentError::SliceEntities { found: 1, .. })
        ));
        assert!(!panel.has_variable("Irms"));
    }
}
