use actix_web::{web, HttpResponse};
use common::model::purchase::PurchaseKey;
use common::responses::Message;
use log::info;
use rusqlite::{params, Connection};

use crate::db::DbState;
use crate::error::ApiError;

/// `DELETE /api/purchases` `{buyer, product, species}`.
pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<PurchaseKey>,
) -> Result<HttpResponse, ApiError> {
    let key = payload.into_inner();
    if !key.is_complete() {
        return Err(ApiError::Validation(
            "buyer, product and species are required".to_string(),
        ));
    }
    db.with_conn(|conn| delete_purchase(conn, &key))?;
    Ok(HttpResponse::Ok().json(Message::new("purchase deleted")))
}

fn delete_purchase(conn: &Connection, key: &PurchaseKey) -> Result<(), ApiError> {
    let (buyer, product, species) = (key.buyer.trim(), key.product.trim(), key.species.trim());
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rows WHERE buyer = ?1 AND product = ?2 AND species = ?3",
        params![buyer, product, species],
        |row| row.get(0),
    )?;
    if used > 0 {
        return Err(ApiError::Conflict(format!(
            "purchase {}/{}/{} is still used by {} rows",
            buyer, product, species, used
        )));
    }
    let deleted = conn.execute(
        "DELETE FROM purchases WHERE buyer = ?1 AND product = ?2 AND species = ?3",
        params![buyer, product, species],
    )?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "purchase {}/{}/{} not found",
            buyer, product, species
        )));
    }
    info!("Deleted purchase {}/{}/{}", buyer, product, species);
    Ok(())
}
