use serde::{Deserialize, Serialize};

use super::lenient;

/// One line of a sales plan.
///
/// A row created in the editor has no `id` until the server accepts it; from
/// then on the id is the only handle used to update or delete it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub forest: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub buyer: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub product: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub species: String,
    /// Cubic metres.
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: f64,
    /// Hryvnia, VAT excluded.
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
}

impl Row {
    /// An empty, unsaved row.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Copy of the row with numeric fields forced to finite values, as written
    /// to the datastore.
    pub fn sanitized(&self) -> Self {
        Self {
            volume: lenient::finite_or_zero(self.volume),
            amount: lenient::finite_or_zero(self.amount),
            ..self.clone()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// A single-field edit made in the editor grid.
///
/// The buyer is deliberately absent: changing it goes through
/// [`crate::template::apply_buyer`], which rewrites the dependent fields too.
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    Forest(String),
    Product(String),
    Species(String),
    Volume(f64),
    Amount(f64),
}

impl RowEdit {
    pub fn apply(self, row: &mut Row) {
        match self {
            RowEdit::Forest(value) => row.forest = value,
            RowEdit::Product(value) => row.product = value,
            RowEdit::Species(value) => row.species = value,
            RowEdit::Volume(value) => row.volume = lenient::finite_or_zero(value),
            RowEdit::Amount(value) => row.amount = lenient::finite_or_zero(value),
        }
    }
}
