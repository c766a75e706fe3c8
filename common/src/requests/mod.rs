//! JSON request bodies and query strings accepted under `/api`.
//!
//! Required fields are modelled as `Option` (or defaulted strings) so that a
//! missing value reaches the handler and is answered with a specific
//! validation message instead of a generic parse failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::lenient;
use crate::model::row::Row;
use crate::model::table::PlanTable;

/// `POST /api/tables/create`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTableRequest {
    #[serde(default)]
    pub date: String,
}

/// `POST /api/tables`: the full desired state of every table the editor holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveTablesRequest {
    #[serde(default)]
    pub tables: Option<Vec<PlanTable>>,
}

/// `DELETE /api/tables/delete`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteTableRequest {
    #[serde(default)]
    pub id: Option<i64>,
}

/// `DELETE /api/tables/delete-row`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTableRowRequest {
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub row_id: Option<i64>,
}

/// `POST`/`DELETE` on `/api/forests`, `/api/products`, `/api/species`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

/// `POST /api/purchases`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPurchaseRequest {
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Why the purchase form cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseFormError {
    #[error("buyer, product and species are required")]
    MissingField,
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

impl NewPurchaseRequest {
    /// Builds a request from the raw text of the purchase form.
    pub fn from_form(
        buyer: &str,
        product: &str,
        species: &str,
        volume: &str,
        amount: &str,
    ) -> Result<Self, PurchaseFormError> {
        let (buyer, product, species) = (buyer.trim(), product.trim(), species.trim());
        if buyer.is_empty() || product.is_empty() || species.is_empty() {
            return Err(PurchaseFormError::MissingField);
        }
        Ok(Self {
            buyer: buyer.to_string(),
            product: product.to_string(),
            species: species.to_string(),
            volume: Some(form_quantity(volume, "volume")?),
            amount: Some(form_quantity(amount, "amount")?),
        })
    }
}

fn form_quantity(text: &str, field: &'static str) -> Result<f64, PurchaseFormError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| PurchaseFormError::NotANumber(field))?;
    if !value.is_finite() {
        return Err(PurchaseFormError::NotANumber(field));
    }
    if value <= 0.0 {
        return Err(PurchaseFormError::NotPositive(field));
    }
    Ok(value)
}

/// `POST /api/rows`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRowRequest {
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub forest: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub buyer: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub product: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub species: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
}

impl NewRowRequest {
    pub fn into_row(self, table_id: i64) -> Row {
        Row {
            id: None,
            table_id: Some(table_id),
            forest: self.forest,
            buyer: self.buyer,
            product: self.product,
            species: self.species,
            volume: self.volume,
            amount: self.amount,
        }
    }
}

/// `PATCH /api/rows?id=`: only the fields present are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl RowPatch {
    pub fn apply(self, row: &mut Row) {
        if let Some(forest) = self.forest {
            row.forest = forest;
        }
        if let Some(buyer) = self.buyer {
            row.buyer = buyer;
        }
        if let Some(product) = self.product {
            row.product = product;
        }
        if let Some(species) = self.species {
            row.species = species;
        }
        if let Some(volume) = self.volume {
            row.volume = lenient::finite_or_zero(volume);
        }
        if let Some(amount) = self.amount {
            row.amount = lenient::finite_or_zero(amount);
        }
    }
}

/// `GET /api/rows?tableId=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowsQuery {
    #[serde(default, rename = "tableId")]
    pub table_id: Option<i64>,
}

/// `?id=` on `PATCH`/`DELETE /api/rows`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowIdQuery {
    #[serde(default)]
    pub id: Option<i64>,
}

/// `POST /api/export`: the table plus the view the user is looking at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub table_data: Option<PlanTable>,
    #[serde(default)]
    pub filtered_and_sorted_rows: Option<Vec<Row>>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

/// Download name of an exported plan: `table_<date>.xlsx`, keeping only
/// characters that are safe in a file name.
pub fn export_file_name(date: &str) -> String {
    let safe: String = date
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if safe.is_empty() {
        "table_undated.xlsx".to_string()
    } else {
        format!("table_{}.xlsx", safe)
    }
}
