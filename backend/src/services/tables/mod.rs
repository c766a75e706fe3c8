//! # Plan Table Service
//!
//! Routes under `/api/tables`:
//!
//! * **`GET /`**: every table with its rows ([`list::process`]).
//! * **`POST /`**: batch save of the editor's tables; pending tables are
//!   created, and rows are reconciled against what is stored ([`save::process`]).
//! * **`POST /create`**: a new, empty table for a date ([`create::process`]).
//! * **`DELETE /delete`**: a table and all of its rows ([`delete::process`]).
//! * **`DELETE /delete-row`**: one row, after checking it belongs to the given
//!   table ([`delete_row::process`]).

mod create;
mod delete;
mod delete_row;
mod list;
mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/tables";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(save::process))
        .route("/create", post().to(create::process))
        .route("/delete", delete().to(delete::process))
        .route("/delete-row", delete().to(delete_row::process))
}
