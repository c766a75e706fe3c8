use actix_web::{web, HttpResponse};
use common::model::purchase::Purchase;
use rusqlite::Connection;

use crate::db::DbState;
use crate::error::ApiError;

pub async fn process(db: web::Data<DbState>) -> Result<HttpResponse, ApiError> {
    let purchases = db.with_conn(list_purchases)?;
    Ok(HttpResponse::Ok().json(purchases))
}

/// Ordered by buyer, then by insertion so a buyer's first purchase stays first.
fn list_purchases(conn: &Connection) -> Result<Vec<Purchase>, ApiError> {
    let purchases = conn
        .prepare(
            "SELECT buyer, product, species, volume, amount FROM purchases ORDER BY buyer, id",
        )?
        .query_map([], |row| {
            Ok(Purchase {
                buyer: row.get(0)?,
                product: row.get(1)?,
                species: row.get(2)?,
                volume: row.get(3)?,
                amount: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(purchases)
}
