//! # Purchase Service
//!
//! Historical purchases under `/api/purchases`. A purchase is identified by
//! its buyer, product and species; posting an existing triple replaces its
//! volume and amount.

mod create;
mod delete;
mod list;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/purchases";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("", delete().to(delete::process))
}
