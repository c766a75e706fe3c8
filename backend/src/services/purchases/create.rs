use actix_web::{web, HttpResponse};
use common::requests::NewPurchaseRequest;
use common::responses::Message;
use log::info;
use rusqlite::{params, Connection};

use crate::db::DbState;
use crate::error::ApiError;

/// `POST /api/purchases`: inserts, or updates volume and amount of an
/// existing buyer/product/species triple.
pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<NewPurchaseRequest>,
) -> Result<HttpResponse, ApiError> {
    let purchase = payload.into_inner();
    db.with_conn(|conn| upsert_purchase(conn, &purchase))?;
    Ok(HttpResponse::Created().json(Message::new(format!(
        "purchase of {} {} by {} saved",
        purchase.species.trim(),
        purchase.product.trim(),
        purchase.buyer.trim()
    ))))
}

fn upsert_purchase(conn: &Connection, purchase: &NewPurchaseRequest) -> Result<(), ApiError> {
    let (buyer, product, species) = (
        purchase.buyer.trim(),
        purchase.product.trim(),
        purchase.species.trim(),
    );
    if buyer.is_empty() || product.is_empty() || species.is_empty() {
        return Err(ApiError::Validation(
            "buyer, product and species are required".to_string(),
        ));
    }
    let volume = quantity("volume", purchase.volume)?;
    let amount = quantity("amount", purchase.amount)?;

    conn.execute(
        "INSERT INTO purchases (buyer, product, species, volume, amount)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(buyer, product, species)
         DO UPDATE SET volume = excluded.volume, amount = excluded.amount",
        params![buyer, product, species, volume, amount],
    )?;
    info!("Saved purchase {}/{}/{}", buyer, product, species);
    Ok(())
}

fn quantity(field: &str, value: Option<f64>) -> Result<f64, ApiError> {
    match value {
        Some(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Some(_) => Err(ApiError::Validation(format!("{} must not be negative", field))),
        None => Err(ApiError::Validation(format!("{} is required", field))),
    }
}
