use actix_web::{web, HttpResponse};
use common::model::reference::ReferenceKind;
use rusqlite::Connection;

use crate::db::DbState;
use crate::error::ApiError;

pub async fn process(
    db: web::Data<DbState>,
    kind: web::Data<ReferenceKind>,
) -> Result<HttpResponse, ApiError> {
    let names = db.with_conn(|conn| list_names(conn, **kind))?;
    Ok(HttpResponse::Ok().json(names))
}

pub fn list_names(conn: &Connection, kind: ReferenceKind) -> Result<Vec<String>, ApiError> {
    let names = conn
        .prepare(&format!("SELECT name FROM {} ORDER BY name", kind.collection()))?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}
