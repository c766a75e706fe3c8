use actix_web::{web, HttpResponse};
use common::requests::RowsQuery;

use crate::db::{self, DbState};
use crate::error::ApiError;

pub async fn process(
    db: web::Data<DbState>,
    query: web::Query<RowsQuery>,
) -> Result<HttpResponse, ApiError> {
    let rows = db.with_conn(|conn| db::rows::list(conn, query.table_id))?;
    Ok(HttpResponse::Ok().json(rows))
}
