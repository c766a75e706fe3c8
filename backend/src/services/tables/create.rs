use actix_web::{web, HttpResponse};
use common::date;
use common::requests::CreateTableRequest;
use common::responses::CreatedTable;
use log::info;
use rusqlite::{params, Connection};

use crate::db::DbState;
use crate::error::ApiError;

/// `POST /api/tables/create`: `201 {id}` for a new, empty table.
pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<CreateTableRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = db.with_conn(|conn| insert_table(conn, &payload.date))?;
    Ok(HttpResponse::Created().json(CreatedTable { id }))
}

/// Validates `date` and inserts a table for it, refusing dates already taken.
pub(super) fn insert_table(conn: &Connection, date: &str) -> Result<i64, ApiError> {
    let date = checked_date(date)?;
    if date_taken(conn, date)? {
        return Err(ApiError::Conflict(format!("a table dated {} already exists", date)));
    }
    conn.execute("INSERT INTO tables (date) VALUES (?1)", params![date])?;
    let id = conn.last_insert_rowid();
    info!("Created table {} for {}", id, date);
    Ok(id)
}

pub(super) fn checked_date(date: &str) -> Result<&str, ApiError> {
    let date = date.trim();
    if date.is_empty() {
        return Err(ApiError::Validation("date is required".to_string()));
    }
    if !date::is_valid(date) {
        return Err(ApiError::Validation(format!(
            "date '{}' must be formatted as YYYY-MM-DD",
            date
        )));
    }
    Ok(date)
}

/// `true` when a table already uses `date`.
fn date_taken(conn: &Connection, date: &str) -> Result<bool, ApiError> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tables WHERE date = ?1)",
        params![date],
        |row| row.get(0),
    )?;
    Ok(taken)
}

#[cfg(test)]
mod tests {
    use crate::services::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::responses::{CreatedTable, ErrorBody};
    use serde_json::json;

    #[actix_web::test]
    async fn duplicate_date_is_rejected_and_count_stays_one() {
        let db = testing::memory_db();
        let app = test::init_service(App::new().configure(testing::app(db.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/tables/create")
            .set_json(json!({ "date": "2024-01-01" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: CreatedTable = test::read_body_json(resp).await;
        assert!(created.id > 0);

        let req = test::TestRequest::post()
            .uri("/api/tables/create")
            .set_json(json!({ "date": "2024-01-01" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert!(body.error.contains("2024-01-01"));

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM tables", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[actix_web::test]
    async fn malformed_dates_are_rejected() {
        let app = test::init_service(App::new().configure(testing::app(testing::memory_db()))).await;
        for body in [json!({ "date": "" }), json!({ "date": "01.02.2024" }), json!({})] {
            let req = test::TestRequest::post()
                .uri("/api/tables/create")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn unparseable_body_gets_the_error_shape() {
        let app = test::init_service(App::new().configure(testing::app(testing::memory_db()))).await;
        let req = test::TestRequest::post()
            .uri("/api/tables/create")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert!(body.error.starts_with("malformed request body"));
    }
}
