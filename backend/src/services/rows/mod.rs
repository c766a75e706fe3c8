//! # Row Service
//!
//! Single-row access under `/api/rows`, used for edits that do not go through
//! the table batch save:
//!
//! * **`GET /?tableId=`**: rows of one table, or all rows without the filter.
//! * **`POST /`**: creates a row in `table_id`; numeric fields given as text
//!   are parsed, anything unusable becomes `0`.
//! * **`PATCH /?id=`**: changes only the fields present in the body.
//! * **`DELETE /?id=`**: removes one row.

mod create;
mod delete;
mod list;
mod update;

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/rows";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("", patch().to(update::process))
        .route("", delete().to(delete::process))
}

/// `?id=` is required on the single-row routes.
fn required_id(id: Option<i64>) -> Result<i64, crate::error::ApiError> {
    id.ok_or_else(|| crate::error::ApiError::Validation("id is required".to_string()))
}
