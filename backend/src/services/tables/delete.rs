use actix_web::{web, HttpResponse};
use common::requests::DeleteTableRequest;
use common::responses::Message;
use log::info;
use rusqlite::{params, Connection};

use crate::db::DbState;
use crate::error::ApiError;

/// `DELETE /api/tables/delete`: removes the table and every row in it.
pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<DeleteTableRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::Validation("id is required".to_string()))?;
    db.with_conn(|conn| delete_table(conn, id))?;
    Ok(HttpResponse::Ok().json(Message::new(format!("table {} deleted", id))))
}

fn delete_table(conn: &Connection, id: i64) -> Result<(), ApiError> {
    // Rows also cascade through the foreign key; deleting them first keeps the
    // count in the log accurate.
    let rows = conn.execute("DELETE FROM rows WHERE table_id = ?1", params![id])?;
    if conn.execute("DELETE FROM tables WHERE id = ?1", params![id])? == 0 {
        return Err(ApiError::NotFound(format!("table {} not found", id)));
    }
    info!("Deleted table {} with {} rows", id, rows);
    Ok(())
}
