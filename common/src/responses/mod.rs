//! JSON response bodies produced under `/api`.

use serde::{Deserialize, Serialize};

use crate::model::table::TableKey;

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Tables a batch save had already written before it failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<SavedTable>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            saved: Vec::new(),
        }
    }
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `201` body of `POST /api/tables/create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTable {
    pub id: i64,
}

/// What a batch save did to one table, so the editor can adopt the new ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTable {
    /// The key the table was sent with.
    pub key: TableKey,
    /// The table's persisted id (new for tables sent as pending).
    pub id: i64,
    /// Ids given to the rows sent without one, in the order they were sent.
    pub inserted_row_ids: Vec<i64>,
}

/// `200` body of `POST /api/tables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReport {
    pub message: String,
    pub tables: Vec<SavedTable>,
}
