use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use common::model::table::{PlanTable, TableKey};
use rusqlite::Connection;

use crate::db::{self, DbState};
use crate::error::ApiError;

/// `GET /api/tables`: tables ordered by id, each with its rows ordered by id.
pub async fn process(db: web::Data<DbState>) -> Result<HttpResponse, ApiError> {
    let tables = db.with_conn(list_tables)?;
    Ok(HttpResponse::Ok().json(tables))
}

pub fn list_tables(conn: &Connection) -> Result<Vec<PlanTable>, ApiError> {
    let mut tables = conn
        .prepare("SELECT id, date FROM tables ORDER BY id")?
        .query_map([], |row| {
            Ok(PlanTable {
                id: TableKey::Persisted(row.get(0)?),
                date: row.get(1)?,
                rows: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let positions: HashMap<i64, usize> = tables
        .iter()
        .enumerate()
        .filter_map(|(index, table)| table.persisted_id().map(|id| (id, index)))
        .collect();
    for row in db::rows::list(conn, None)? {
        if let Some(&index) = row.table_id.and_then(|id| positions.get(&id)) {
            tables[index].rows.push(row);
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use actix_web::{test, App};
    use common::model::row::Row;

    #[actix_web::test]
    async fn rows_are_grouped_under_their_tables() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-02-01')", [])?;
            for (table_id, forest) in [(2, "South"), (1, "North"), (2, "East")] {
                db::rows::insert(conn, table_id, &Row { forest: forest.into(), ..Row::default() })?;
            }
            Ok(())
        })
        .unwrap();

        let app = test::init_service(App::new().configure(testing::app(db))).await;
        let req = test::TestRequest::get().uri("/api/tables").to_request();
        let tables: Vec<PlanTable> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].id, TableKey::Persisted(1));
        assert_eq!(tables[0].rows.len(), 1);
        let second: Vec<_> = tables[1].rows.iter().map(|r| r.forest.as_str()).collect();
        assert_eq!(second, vec!["South", "East"]);
    }
}
