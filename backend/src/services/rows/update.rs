use actix_web::{web, HttpResponse};
use common::model::row::Row;
use common::requests::{RowIdQuery, RowPatch};
use rusqlite::Connection;

use super::required_id;
use crate::db::{self, DbState};
use crate::error::ApiError;

/// `PATCH /api/rows?id=`: `200` with the row as stored after the change.
pub async fn process(
    db: web::Data<DbState>,
    query: web::Query<RowIdQuery>,
    payload: web::Json<RowPatch>,
) -> Result<HttpResponse, ApiError> {
    let id = required_id(query.id)?;
    let row = db.with_conn(|conn| patch_row(conn, id, payload.into_inner()))?;
    Ok(HttpResponse::Ok().json(row))
}

fn patch_row(conn: &Connection, id: i64, patch: RowPatch) -> Result<Row, ApiError> {
    let mut row = db::rows::find(conn, id)?
        .ok_or_else(|| ApiError::NotFound(format!("row {} not found", id)))?;
    patch.apply(&mut row);
    db::rows::update(conn, id, &row)?;
    Ok(row)
}
