//! Children delegation for managed event types.
//!
//! Mirrors the host reconciler over `ChildAssignment` records.

use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::ChildAssignment;

/// Fill the delegation list from the pool, or keep it as is when deactivated.
pub fn toggle_assign_all_children(
    children: &[ChildAssignment],
    active: bool,
    pool: &[ChildAssignment],
) -> Vec<ChildAssignment> {
    if active {
        pool.to_vec()
    } else {
        children.to_vec()
    }
}

/// Replace the delegation list with the chosen owners.
///
/// Owners already delegated keep their record (and its `hidden`/`created`
/// state); new owners take the pool record.
pub fn update_children(
    children: &[ChildAssignment],
    owner_ids: &[i64],
    pool: &[ChildAssignment],
) -> Result<Vec<ChildAssignment>, AppError> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(owner_ids.len());

    for &id in owner_ids {
        if !seen.insert(id) {
            continue;
        }
        let record = children
            .iter()
            .find(|c| c.owner_id() == id)
            .or_else(|| pool.iter().find(|c| c.owner_id() == id))
            .ok_or_else(|| {
                AppError::Validation(format!("Member {} is not eligible for delegation", id))
            })?;
        result.push(record.clone());
    }

    Ok(result)
}

/// Pool records whose owner is not delegated yet.
pub fn available_children<'a>(
    pool: &'a [ChildAssignment],
    children: &[ChildAssignment],
) -> Vec<&'a ChildAssignment> {
    let taken: HashSet<i64> = children.iter().map(|c| c.owner_id()).collect();
    pool.iter().filter(|c| !taken.contains(&c.owner_id())).collect()
}
