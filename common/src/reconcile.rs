//! Planning the row writes needed to make a table match the editor.
//!
//! The editor always sends the complete list of rows it wants a table to have.
//! Rows it has never saved carry no id; rows it loaded from the server carry
//! theirs. Comparing that list with the ids currently stored for the table
//! yields three disjoint action sets:
//!
//! - **deletions**: stored ids that the editor no longer lists;
//! - **insertions**: listed rows without an id;
//! - **updates**: listed rows whose id is stored for this table.
//!
//! A listed id that is not stored for the table (deleted elsewhere, or owned by
//! another table) is neither inserted nor updated. Callers apply deletions
//! first, then insertions, then updates, each as an independent write.

use std::collections::BTreeSet;

use crate::model::row::Row;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Ascending.
    pub deletions: Vec<i64>,
    /// In the order they appear in the desired list.
    pub insertions: Vec<Row>,
    pub updates: Vec<Row>,
}

impl ReconcilePlan {
    /// Diffs `desired` against the ids currently stored for the table.
    ///
    /// Rows in the plan are [`Row::sanitized`] so non-finite numbers are never
    /// written.
    pub fn build(previous_ids: &[i64], desired: &[Row]) -> Self {
        let previous: BTreeSet<i64> = previous_ids.iter().copied().collect();
        let kept: BTreeSet<i64> = desired.iter().filter_map(|row| row.id).collect();

        let deletions = previous.difference(&kept).copied().collect();
        let insertions = desired
            .iter()
            .filter(|row| row.id.is_none())
            .map(Row::sanitized)
            .collect();
        let updates = desired
            .iter()
            .filter(|row| row.id.is_some_and(|id| previous.contains(&id)))
            .map(Row::sanitized)
            .collect();

        Self {
            deletions,
            insertions,
            updates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.updates.is_empty()
    }
}
