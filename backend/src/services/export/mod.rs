//! # Spreadsheet Export Service
//!
//! `POST /api/export` turns the rows the user is currently looking at (already
//! filtered and sorted by the editor) into a styled `.xlsx` download.
//!
//! * `workbook`: builds the single-sheet workbook in memory.
//! * `download`: the handler; builds off the async executor and streams the
//!   bytes back as an attachment.

mod download;
pub mod workbook;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/export";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(download::process))
}
