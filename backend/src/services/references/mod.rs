//! # Reference List Service
//!
//! The forest, product and species lists share one implementation; each kind
//! gets its own scope (`/api/forests`, `/api/products`, `/api/species`) with
//! the [`ReferenceKind`] stored as scope data:
//!
//! * **`GET /`**: names ordered alphabetically.
//! * **`POST /`** `{name}`: adds a trimmed name; an existing name is a no-op.
//! * **`DELETE /`** `{name}`: removes a name unless a row (or, for products
//!   and species, a purchase) still uses it.

mod create;
mod delete;
mod list;

use actix_web::web::{self, delete, get, post, scope};
use actix_web::Scope;
use common::model::reference::ReferenceKind;

use crate::error::ApiError;

pub fn configure_routes(kind: ReferenceKind) -> Scope {
    scope(&format!("/api/{}", kind.collection()))
        .app_data(web::Data::new(kind))
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("", delete().to(delete::process))
}

fn required_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::services::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::row::Row;
    use common::responses::ErrorBody;
    use serde_json::json;

    #[actix_web::test]
    async fn names_are_trimmed_unique_and_sorted() {
        let app = test::init_service(App::new().configure(testing::app(testing::memory_db()))).await;
        for name in ["Pine", " Oak ", "Pine", "Ash"] {
            let req = test::TestRequest::post()
                .uri("/api/species")
                .set_json(json!({ "name": name }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }
        let req = test::TestRequest::get().uri("/api/species").to_request();
        let names: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(names, vec!["Ash", "Oak", "Pine"]);

        let req = test::TestRequest::get().uri("/api/forests").to_request();
        let names: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert!(names.is_empty());

        let req = test::TestRequest::post()
            .uri("/api/products")
            .set_json(json!({ "name": "   " }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn names_in_use_cannot_be_deleted() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO forests (name) VALUES ('North'), ('South')", [])?;
            conn.execute("INSERT INTO products (name) VALUES ('Logs')", [])?;
            conn.execute(
                "INSERT INTO purchases (buyer, product, species, volume, amount)
                 VALUES ('Acme', 'Logs', 'Pine', 1, 1)",
                [],
            )?;
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
            let row = Row {
                forest: "North".into(),
                ..Row::default()
            };
            db::rows::insert(conn, 1, &row)?;
            Ok(())
        })
        .unwrap();
        let app = test::init_service(App::new().configure(testing::app(db))).await;

        let req = test::TestRequest::delete()
            .uri("/api/forests")
            .set_json(json!({ "name": "North" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert!(body.error.contains("North"));

        let req = test::TestRequest::delete()
            .uri("/api/products")
            .set_json(json!({ "name": "Logs" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::delete()
            .uri("/api/forests")
            .set_json(json!({ "name": "South" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri("/api/forests")
            .set_json(json!({ "name": "South" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
