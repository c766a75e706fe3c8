use actix_web::{web, HttpResponse};
use common::requests::DeleteTableRowRequest;
use common::responses::Message;
use log::info;
use rusqlite::Connection;

use crate::db::{self, DbState};
use crate::error::ApiError;

/// `DELETE /api/tables/delete-row`: deletes `rowId` only if it belongs to
/// `tableId`.
pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<DeleteTableRowRequest>,
) -> Result<HttpResponse, ApiError> {
    let (table_id, row_id) = match (payload.table_id, payload.row_id) {
        (Some(table_id), Some(row_id)) => (table_id, row_id),
        _ => {
            return Err(ApiError::Validation(
                "tableId and rowId are required".to_string(),
            ))
        }
    };
    db.with_conn(|conn| delete_owned_row(conn, table_id, row_id))?;
    Ok(HttpResponse::Ok().json(Message::new(format!("row {} deleted", row_id))))
}

fn delete_owned_row(conn: &Connection, table_id: i64, row_id: i64) -> Result<(), ApiError> {
    let row = db::rows::find(conn, row_id)?
        .ok_or_else(|| ApiError::NotFound(format!("row {} not found", row_id)))?;
    if row.table_id != Some(table_id) {
        return Err(ApiError::Validation(format!(
            "row {} does not belong to table {}",
            row_id, table_id
        )));
    }
    db::rows::delete(conn, row_id)?;
    info!("Deleted row {} of table {}", row_id, table_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::services::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::row::Row;
    use serde_json::json;

    #[actix_web::test]
    async fn row_must_belong_to_the_named_table() {
        let db = testing::memory_db();
        let row_id = db
            .with_conn(|conn| {
                conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-02-01')", [])?;
                db::rows::insert(conn, 1, &Row::blank())
            })
            .unwrap();
        let app = test::init_service(App::new().configure(testing::app(db.clone()))).await;

        let req = test::TestRequest::delete()
            .uri("/api/tables/delete-row")
            .set_json(json!({ "tableId": 2, "rowId": row_id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete()
            .uri("/api/tables/delete-row")
            .set_json(json!({ "tableId": 1, "rowId": row_id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri("/api/tables/delete-row")
            .set_json(json!({ "tableId": 1, "rowId": row_id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/api/tables/delete-row")
            .set_json(json!({ "tableId": 1 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
