//! HTTP surface of the server. Every resource lives in its own module exposing
//! a `configure_routes()` scope; [`configure`] wires them into an `App`
//! together with the shared datastore and the JSON error handlers.

pub mod export;
pub mod purchases;
pub mod references;
pub mod rows;
pub mod tables;

use actix_web::web;
use common::model::reference::ReferenceKind;

use crate::db::DbState;
use crate::error::{json_error_handler, query_error_handler};

pub fn configure(cfg: &mut web::ServiceConfig, db: DbState, json_limit: usize) {
    cfg.app_data(web::Data::new(db))
        .app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(tables::configure_routes())
        .service(rows::configure_routes())
        .service(purchases::configure_routes())
        .service(export::configure_routes());
    for kind in ReferenceKind::ALL {
        cfg.service(references::configure_routes(kind));
    }
}
