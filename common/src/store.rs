//! The editor's collection of plan tables.
//!
//! `PlanStore` is owned by a single controller (the editor component). Every
//! mutation goes through one of its methods, is validated there, and returns
//! the new immutable [`Snapshot`]; nothing else holds a mutable reference to
//! the tables. Snapshots are cheap to clone and are what the save queue sends
//! and what the view pipeline reads.

use std::sync::Arc;

use thiserror::Error;

use crate::date;
use crate::model::purchase::Purchase;
use crate::model::row::{Row, RowEdit};
use crate::model::table::{PlanTable, TableKey};
use crate::responses::SavedTable;
use crate::template;

pub type Snapshot = Arc<[PlanTable]>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("a date is required")]
    EmptyDate,
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("a table dated {0} already exists")]
    DuplicateDate(String),
    #[error("table {0} was not found")]
    UnknownTable(TableKey),
    #[error("row {index} was not found in table {table}")]
    UnknownRow { table: TableKey, index: usize },
}

#[derive(Debug, Clone)]
pub struct PlanStore {
    tables: Snapshot,
    next_token: u64,
}

impl Default for PlanStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PlanStore {
    pub fn new(tables: Vec<PlanTable>) -> Self {
        Self {
            tables: tables.into(),
            next_token: 1,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.tables)
    }

    pub fn tables(&self) -> &[PlanTable] {
        &self.tables
    }

    pub fn table(&self, key: &TableKey) -> Option<&PlanTable> {
        self.tables.iter().find(|table| &table.id == key)
    }

    /// Replaces everything, e.g. after a fresh load from the server.
    pub fn replace(&mut self, tables: Vec<PlanTable>) -> Snapshot {
        self.tables = tables.into();
        self.snapshot()
    }

    /// Validates `date` and checks it against every table except `except`.
    /// Returns the trimmed date.
    pub fn check_date(&self, date: &str, except: Option<&TableKey>) -> Result<String, StoreError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(StoreError::EmptyDate);
        }
        if !date::is_valid(date) {
            return Err(StoreError::InvalidDate(date.to_string()));
        }
        let taken = self
            .tables
            .iter()
            .any(|table| Some(&table.id) != except && table.date == date);
        if taken {
            return Err(StoreError::DuplicateDate(date.to_string()));
        }
        Ok(date.to_string())
    }

    /// Adds an unsaved table; it is persisted by the next save.
    pub fn add_pending_table(&mut self, date: &str) -> Result<(TableKey, Snapshot), StoreError> {
        let date = self.check_date(date, None)?;
        let key = TableKey::Pending(format!("tmp-{}", self.next_token));
        self.next_token += 1;
        let table = PlanTable {
            id: key.clone(),
            date,
            rows: Vec::new(),
        };
        let snapshot = self.mutate(|tables| tables.push(table));
        Ok((key, snapshot))
    }

    pub fn set_date(&mut self, key: &TableKey, date: &str) -> Result<Snapshot, StoreError> {
        let date = self.check_date(date, Some(key))?;
        self.with_table(key, |table| {
            table.date = date;
            Ok(())
        })
    }

    pub fn remove_table(&mut self, key: &TableKey) -> Result<Snapshot, StoreError> {
        let position = self.position(key)?;
        Ok(self.mutate(|tables| {
            tables.remove(position);
        }))
    }

    pub fn push_row(&mut self, key: &TableKey, mut row: Row) -> Result<Snapshot, StoreError> {
        row.table_id = key.persisted_id();
        self.with_table(key, |table| {
            table.rows.push(row);
            Ok(())
        })
    }

    /// Removes the row at `index` (position in the table, not in a filtered view).
    pub fn remove_row(&mut self, key: &TableKey, index: usize) -> Result<(Row, Snapshot), StoreError> {
        let mut removed = None;
        let snapshot = self.with_table(key, |table| {
            if index >= table.rows.len() {
                return Err(StoreError::UnknownRow {
                    table: key.clone(),
                    index,
                });
            }
            removed = Some(table.rows.remove(index));
            Ok(())
        })?;
        let row = removed.ok_or_else(|| StoreError::UnknownRow {
            table: key.clone(),
            index,
        })?;
        Ok((row, snapshot))
    }

    pub fn edit_row(&mut self, key: &TableKey, index: usize, edit: RowEdit) -> Result<Snapshot, StoreError> {
        self.with_row(key, index, |row| edit.apply(row))
    }

    /// Sets the buyer and fills the dependent fields from its purchase template.
    pub fn set_buyer(
        &mut self,
        key: &TableKey,
        index: usize,
        buyer: &str,
        purchases: &[Purchase],
    ) -> Result<Snapshot, StoreError> {
        self.with_row(key, index, |row| template::apply_buyer(row, buyer, purchases))
    }

    /// Adopts the ids reported by a batch save.
    ///
    /// A pending table takes its persisted id; rows still lacking an id take
    /// the inserted ids in order. Tables no longer in the store are skipped.
    pub fn apply_saved(&mut self, saved: &[SavedTable]) -> Snapshot {
        self.mutate(|tables| {
            for report in saved {
                let Some(table) = tables.iter_mut().find(|table| table.id == report.key) else {
                    continue;
                };
                table.id = TableKey::Persisted(report.id);
                let mut new_ids = report.inserted_row_ids.iter().copied();
                for row in table.rows.iter_mut() {
                    row.table_id = Some(report.id);
                    if row.id.is_none() {
                        row.id = new_ids.next();
                    }
                }
            }
        })
    }

    fn position(&self, key: &TableKey) -> Result<usize, StoreError> {
        self.tables
            .iter()
            .position(|table| &table.id == key)
            .ok_or_else(|| StoreError::UnknownTable(key.clone()))
    }

    fn mutate<F>(&mut self, change: F) -> Snapshot
    where
        F: FnOnce(&mut Vec<PlanTable>),
    {
        let mut tables = self.tables.to_vec();
        change(&mut tables);
        self.tables = tables.into();
        self.snapshot()
    }

    fn with_table<F>(&mut self, key: &TableKey, change: F) -> Result<Snapshot, StoreError>
    where
        F: FnOnce(&mut PlanTable) -> Result<(), StoreError>,
    {
        let position = self.position(key)?;
        let mut tables = self.tables.to_vec();
        change(&mut tables[position])?;
        self.tables = tables.into();
        Ok(self.snapshot())
    }

    fn with_row<F>(&mut self, key: &TableKey, index: usize, change: F) -> Result<Snapshot, StoreError>
    where
        F: FnOnce(&mut Row),
    {
        self.with_table(key, |table| match table.rows.get_mut(index) {
            Some(row) => {
                change(row);
                Ok(())
            }
            None => Err(StoreError::UnknownRow {
                table: key.clone(),
                index,
            }),
        })
    }
}
