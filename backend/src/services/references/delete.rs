use actix_web::{web, HttpResponse};
use common::model::reference::ReferenceKind;
use common::requests::NameRequest;
use common::responses::Message;
use log::info;
use rusqlite::{params, Connection};

use super::required_name;
use crate::db::DbState;
use crate::error::ApiError;

pub async fn process(
    db: web::Data<DbState>,
    kind: web::Data<ReferenceKind>,
    payload: web::Json<NameRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = required_name(&payload.name)?;
    db.with_conn(|conn| delete_name(conn, **kind, name))?;
    Ok(HttpResponse::Ok().json(Message::new(format!("{} '{}' deleted", kind.label(), name))))
}

fn delete_name(conn: &Connection, kind: ReferenceKind, name: &str) -> Result<(), ApiError> {
    let column = kind.column();
    let rows: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM rows WHERE {} = ?1", column),
        params![name],
        |row| row.get(0),
    )?;
    let purchases: i64 = if kind.used_by_purchases() {
        conn.query_row(
            &format!("SELECT COUNT(*) FROM purchases WHERE {} = ?1", column),
            params![name],
            |row| row.get(0),
        )?
    } else {
        0
    };
    if rows > 0 || purchases > 0 {
        return Err(ApiError::Conflict(format!(
            "{} '{}' is still used by {} rows and {} purchases",
            kind.label(),
            name,
            rows,
            purchases
        )));
    }

    let deleted = conn.execute(
        &format!("DELETE FROM {} WHERE name = ?1", kind.collection()),
        params![name],
    )?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("{} '{}' not found", kind.label(), name)));
    }
    info!("Deleted {} '{}'", column, name);
    Ok(())
}
