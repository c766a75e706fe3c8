use actix_web::{web, HttpResponse};
use common::model::row::Row;
use common::requests::NewRowRequest;
use rusqlite::Connection;

use crate::db::{self, DbState};
use crate::error::ApiError;

/// `POST /api/rows`: `201` with the stored row.
pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<NewRowRequest>,
) -> Result<HttpResponse, ApiError> {
    let row = db.with_conn(|conn| create_row(conn, payload.into_inner()))?;
    Ok(HttpResponse::Created().json(row))
}

fn create_row(conn: &Connection, request: NewRowRequest) -> Result<Row, ApiError> {
    let table_id = request
        .table_id
        .ok_or_else(|| ApiError::Validation("table_id is required".to_string()))?;
    if !db::table_exists(conn, table_id)? {
        return Err(ApiError::NotFound(format!("table {} not found", table_id)));
    }
    let id = db::rows::insert(conn, table_id, &request.into_row(table_id))?;
    db::rows::find(conn, id)?
        .ok_or_else(|| ApiError::Internal(format!("row {} vanished after insert", id)))
}
