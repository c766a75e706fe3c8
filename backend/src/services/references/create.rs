use actix_web::{web, HttpResponse};
use common::model::reference::ReferenceKind;
use common::requests::NameRequest;
use common::responses::Message;
use log::info;
use rusqlite::{params, Connection};

use super::required_name;
use crate::db::DbState;
use crate::error::ApiError;

/// `POST /api/<kind>`: `201 {message}` whether or not the name was new.
pub async fn process(
    db: web::Data<DbState>,
    kind: web::Data<ReferenceKind>,
    payload: web::Json<NameRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = required_name(&payload.name)?;
    let added = db.with_conn(|conn| add_name(conn, **kind, name))?;
    let message = if added {
        format!("{} '{}' added", kind.label(), name)
    } else {
        format!("{} '{}' already exists", kind.label(), name)
    };
    Ok(HttpResponse::Created().json(Message::new(message)))
}

fn add_name(conn: &Connection, kind: ReferenceKind, name: &str) -> Result<bool, ApiError> {
    let added = conn.execute(
        &format!(
            "INSERT INTO {} (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            kind.collection()
        ),
        params![name],
    )? > 0;
    if added {
        info!("Added {} '{}'", kind.column(), name);
    }
    Ok(added)
}
