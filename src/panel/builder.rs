//! Panel builder: validates alignment and transposes tables into slices.

use std::collections::HashSet;

use tracing::info;

use crate::error::AlignmentError;

use super::store::Panel;
use super::types::Entity;

/// Builds a [`Panel`] from per-entity tables.
///
/// Entities are ordered by key. Every entity must have a non-empty,
/// well-formed table, the same strictly increasing time index as the first
/// entity, and the same variables in the same order. Nothing is built unless all checks pass.
///
/// # Errors
///
/// Returns the first [`AlignmentError`] found, naming the reference entity
/// and the entity that disagrees with it.
pub fn build_panel(mut entities: Vec<Entity>) -> Result<Panel, AlignmentError> {
    entities.sort_by(|a, b| a.key.cmp(&b.key));
    check_alignment(&entities)?;

    let n_vars = entities[0].table.variables.len();
    let variables = entities[0].table.variables.clone();
    let index = entities[0].table.index.clone();

    let mut slices: Vec<(String, Vec<Vec<f64>>)> = variables
        .into_iter()
        .map(|name| (name, Vec::with_capacity(entities.len())))
        .collect();
    let mut keys = Vec::with_capacity(entities.len());

    for entity in entities {
        keys.push(entity.key);
        for (slice, column) in slices.iter_mut().zip(entity.table.columns) {
            slice.1.push(column);
        }
    }

    info!(
        entities = keys.len(),
        timestamps = index.len(),
        variables = n_vars,
        "built aligned panel"
    );
    Ok(Panel::from_parts(keys, index, slices))
}

/// Runs every alignment check against the first entity as reference.
///
/// Each table must be well formed (one column per variable, one value per
/// timestamp) and the reference index strictly increasing; the remaining
/// entities must then match the reference exactly.
///
/// # Errors
///
/// Returns the first disagreement found.
pub fn check_alignment(entities: &[Entity]) -> Result<(), AlignmentError> {
    let reference = entities.first().ok_or(AlignmentError::NoEntities)?;

    if let Some(empty) = entities.iter().find(|e| e.table.is_empty()) {
        return Err(AlignmentError::EmptyTable {
            entity: empty.key.clone(),
        });
    }

    let mut seen = HashSet::new();
    for entity in entities {
        if !seen.insert(entity.key.as_str()) {
            return Err(AlignmentError::DuplicateEntity {
                entity: entity.key.clone(),
            });
        }
        check_shape(entity)?;
    }

    if let Some(position) = reference
        .table
        .index
        .windows(2)
        .position(|w| w[0] >= w[1])
    {
        return Err(AlignmentError::UnorderedIndex {
            entity: reference.key.clone(),
            position: position + 1,
        });
    }

    for entity in &entities[1..] {
        check_index(reference, entity)?;
        check_variables(reference, entity)?;
    }
    Ok(())
}

fn check_shape(entity: &Entity) -> Result<(), AlignmentError> {
    let table = &entity.table;
    if table.columns.len() != table.variables.len() {
        return Err(AlignmentError::ColumnCount {
            entity: entity.key.clone(),
            variables: table.variables.len(),
            columns: table.columns.len(),
        });
    }
    match table
        .variables
        .iter()
        .zip(&table.columns)
        .find(|(_, c)| c.len() != table.index.len())
    {
        Some((variable, column)) => Err(AlignmentError::ColumnLength {
            entity: entity.key.clone(),
            variable: variable.clone(),
            expected: table.index.len(),
            found: column.len(),
        }),
        None => Ok(()),
    }
}

fn check_index(reference: &Entity, entity: &Entity) -> Result<(), AlignmentError> {
    let expected = &reference.table.index;
    let found = &entity.table.index;

    if expected.len() != found.len() {
        return Err(AlignmentError::IndexLength {
            reference: reference.key.clone(),
            entity: entity.key.clone(),
            expected: expected.len(),
            found: found.len(),
        });
    }

    match expected.iter().zip(found).position(|(a, b)| a != b) {
        Some(position) => Err(AlignmentError::IndexValue {
            reference: reference.key.clone(),
            entity: entity.key.clone(),
            position,
            expected: expected[position],
            found: found[position],
        }),
        None => Ok(()),
    }
}

fn check_variables(reference: &Entity, entity: &Entity) -> Result<(), AlignmentError> {
    if reference.table.variables == entity.table.variables {
        return Ok(());
    }
    Err(AlignmentError::Variables {
        reference: reference.key.clone(),
        entity: entity.key.clone(),
        expected: reference.table.variables.clone(),
        found: entity.table.variables.clone(),
    })
}
