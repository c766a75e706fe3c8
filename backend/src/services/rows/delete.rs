use actix_web::{web, HttpResponse};
use common::requests::RowIdQuery;
use common::responses::Message;

use super::required_id;
use crate::db::{self, DbState};
use crate::error::ApiError;

pub async fn process(
    db: web::Data<DbState>,
    query: web::Query<RowIdQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = required_id(query.id)?;
    if !db.with_conn(|conn| db::rows::delete(conn, id))? {
        return Err(ApiError::NotFound(format!("row {} not found", id)));
    }
    Ok(HttpResponse::Ok().json(Message::new(format!("row {} deleted", id))))
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::services::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::row::Row;

    #[actix_web::test]
    async fn deletes_once() {
        let db = testing::memory_db();
        let id = db
            .with_conn(|conn| {
                conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
                db::rows::insert(conn, 1, &Row::blank())
            })
            .unwrap();
        let app = test::init_service(App::new().configure(testing::app(db))).await;

        let uri = format!("/api/rows?id={}", id);
        let req = test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let req = test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
