//! Batch save of the editor's tables.
//!
//! 1. Every dated table in the request is checked up front: dates must be
//!    valid, distinct within the batch, and not held by a table the batch
//!    does not list. Pending tables without a date are skipped.
//! 2. Date changes of persisted tables are written in one transaction, so a
//!    batch that shifts dates between its own tables never trips the unique
//!    index half way.
//! 3. Then, per table in request order, pending tables are inserted and the
//!    stored row ids are diffed against the submitted rows with
//!    [`ReconcilePlan::build`]. Deletions, insertions and updates each commit
//!    on their own.
//!
//! A failure in step 3 keeps what was already written and the error reports
//! those tables, so the editor can adopt their ids before retrying.

use std::collections::HashSet;

use actix_web::{web, HttpResponse};
use common::model::table::{PlanTable, TableKey};
use common::reconcile::ReconcilePlan;
use common::requests::SaveTablesRequest;
use common::responses::{SaveReport, SavedTable};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::create::{checked_date, insert_table};
use crate::db::{self, DbState};
use crate::error::ApiError;

pub async fn process(
    db: web::Data<DbState>,
    payload: web::Json<SaveTablesRequest>,
) -> Result<HttpResponse, ApiError> {
    let tables = payload
        .into_inner()
        .tables
        .ok_or_else(|| ApiError::Validation("tables must be an array".to_string()))?;
    let saved = db.with_conn(|conn| save_tables(conn, &tables))?;
    Ok(HttpResponse::Ok().json(SaveReport {
        message: format!("{} tables saved", saved.len()),
        tables: saved,
    }))
}

pub fn save_tables(conn: &Connection, tables: &[PlanTable]) -> Result<Vec<SavedTable>, ApiError> {
    let renames = check_dates(conn, tables)?;
    rewrite_dates(conn, &renames)?;

    let mut saved = Vec::with_capacity(tables.len());
    for table in tables {
        if let Err(cause) = save_table(conn, table, &mut saved) {
            return Err(ApiError::partial(saved, cause));
        }
    }
    Ok(saved)
}

/// Validates every date of the batch and returns the `(id, date)` pairs of
/// the persisted tables.
fn check_dates<'a>(conn: &Connection, tables: &'a [PlanTable]) -> Result<Vec<(i64, &'a str)>, ApiError> {
    let listed: HashSet<i64> = tables.iter().filter_map(PlanTable::persisted_id).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut renames = Vec::new();

    for table in tables {
        if matches!(table.id, TableKey::Pending(_)) && table.date.trim().is_empty() {
            continue;
        }
        let date = checked_date(&table.date)?;
        if !seen.insert(date) {
            return Err(ApiError::Conflict(format!("a table dated {} already exists", date)));
        }
        let holder: Option<i64> = conn
            .query_row("SELECT id FROM tables WHERE date = ?1", params![date], |row| row.get(0))
            .optional()?;
        if holder.is_some_and(|id| !listed.contains(&id)) {
            return Err(ApiError::Conflict(format!("a table dated {} already exists", date)));
        }
        if let TableKey::Persisted(id) = table.id {
            renames.push((id, date));
        }
    }
    Ok(renames)
}

/// Moves every listed table to a placeholder date first, then to its new
/// one, inside a single transaction.
fn rewrite_dates(conn: &Connection, renames: &[(i64, &str)]) -> Result<(), ApiError> {
    if renames.is_empty() {
        return Ok(());
    }
    let tx = conn.unchecked_transaction()?;
    for (id, _) in renames {
        if tx.execute("UPDATE tables SET date = '#' || id WHERE id = ?1", params![id])? == 0 {
            return Err(ApiError::NotFound(format!("table {} not found", id)));
        }
    }
    for (id, date) in renames {
        tx.execute("UPDATE tables SET date = ?1 WHERE id = ?2", params![date, id])?;
    }
    tx.commit()?;
    debug!("Rewrote the dates of {} tables", renames.len());
    Ok(())
}

/// Saves one table. Once the table has an id it is reported in `saved`,
/// together with every row id handed out, even if a later write fails.
fn save_table(conn: &Connection, table: &PlanTable, saved: &mut Vec<SavedTable>) -> Result<(), ApiError> {
    let id = match &table.id {
        TableKey::Pending(token) if table.date.trim().is_empty() => {
            debug!("Skipping unsaved table '{}' without a date", token);
            return Ok(());
        }
        TableKey::Pending(_) => insert_table(conn, &table.date)?,
        TableKey::Persisted(id) => *id,
    };

    let mut report = SavedTable {
        key: table.id.clone(),
        id,
        inserted_row_ids: Vec::new(),
    };
    let result = db::rows::ids_for_table(conn, id).and_then(|previous| {
        let plan = ReconcilePlan::build(&previous, &table.rows);
        apply_plan(conn, id, &plan, &mut report.inserted_row_ids)
    });
    saved.push(report);
    result
}

/// Executes `plan` against table `table_id`, appending the ids of inserted
/// rows to `inserted` in plan order as they are created.
fn apply_plan(
    conn: &Connection,
    table_id: i64,
    plan: &ReconcilePlan,
    inserted: &mut Vec<i64>,
) -> Result<(), ApiError> {
    for id in &plan.deletions {
        db::rows::delete(conn, *id)?;
    }
    for row in &plan.insertions {
        inserted.push(db::rows::insert(conn, table_id, row)?);
    }
    for row in &plan.updates {
        if let Some(id) = row.id {
            db::rows::update(conn, id, row)?;
        }
    }
    info!(
        "Table {}: {} rows deleted, {} inserted, {} updated",
        table_id,
        plan.deletions.len(),
        inserted.len(),
        plan.updates.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::row::Row;
    use common::responses::ErrorBody;
    use serde_json::json;

    fn row(id: Option<i64>, forest: &str, volume: f64) -> Row {
        Row {
            id,
            forest: forest.into(),
            volume,
            ..Row::default()
        }
    }

    fn table(id: TableKey, date: &str, rows: Vec<Row>) -> PlanTable {
        PlanTable {
            id,
            date: date.into(),
            rows,
        }
    }

    fn stored_dates(db: &DbState) -> Vec<(i64, String)> {
        db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, date FROM tables ORDER BY id")?;
            let dates = stmt
                .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(dates)
        })
        .unwrap()
    }

    #[actix_web::test]
    async fn pending_tables_are_created_and_rows_reconciled() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            let draft = PlanTable {
                id: TableKey::Pending("tmp-1".into()),
                date: "2024-03-01".into(),
                rows: vec![row(None, "North", 1.0), row(None, "South", 2.0)],
            };
            let skipped = PlanTable {
                id: TableKey::Pending("tmp-2".into()),
                date: String::new(),
                rows: vec![row(None, "Lost", 1.0)],
            };
            let saved = save_tables(conn, &[draft, skipped])?;
            assert_eq!(saved.len(), 1);
            assert_eq!(saved[0].key, TableKey::Pending("tmp-1".into()));
            assert_eq!(saved[0].inserted_row_ids.len(), 2);

            let table_id = saved[0].id;
            let kept = saved[0].inserted_row_ids[1];
            let edited = PlanTable {
                id: TableKey::Persisted(table_id),
                date: "2024-03-02".into(),
                rows: vec![row(Some(kept), "South", 9.0), row(None, "East", 3.0)],
            };
            let saved = save_tables(conn, &[edited])?;
            assert_eq!(saved[0].inserted_row_ids.len(), 1);

            let rows = db::rows::list(conn, Some(table_id))?;
            let stored: Vec<_> = rows.iter().map(|r| (r.forest.as_str(), r.volume)).collect();
            assert_eq!(stored, vec![("South", 9.0), ("East", 3.0)]);
            let date: String =
                conn.query_row("SELECT date FROM tables WHERE id = ?1", params![table_id], |r| r.get(0))?;
            assert_eq!(date, "2024-03-02");
            Ok(())
        })
        .unwrap();
    }

    #[actix_web::test]
    async fn rows_of_other_tables_are_left_alone() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-02-01')", [])?;
            let foreign = db::rows::insert(conn, 2, &row(None, "Foreign", 1.0))?;
            let table = PlanTable {
                id: TableKey::Persisted(1),
                date: "2024-01-01".into(),
                rows: vec![row(Some(foreign), "Hijacked", 5.0)],
            };
            save_tables(conn, &[table])?;
            let untouched = db::rows::find(conn, foreign)?.unwrap();
            assert_eq!(untouched.forest, "Foreign");
            assert!(db::rows::list(conn, Some(1))?.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[actix_web::test]
    async fn unknown_table_is_not_found() {
        let app = test::init_service(App::new().configure(testing::app(testing::memory_db()))).await;
        let req = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(json!({ "tables": [{ "id": 42, "date": "2024-01-01", "rows": [] }] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn missing_tables_array_is_rejected() {
        let app = test::init_service(App::new().configure(testing::app(testing::memory_db()))).await;
        let req = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "tables must be an array");
    }

    #[actix_web::test]
    async fn renaming_onto_a_taken_date_conflicts() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-02-01')", [])?;
            Ok(())
        })
        .unwrap();
        let app = test::init_service(App::new().configure(testing::app(db))).await;
        let req = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(json!({ "tables": [{ "id": 2, "date": "2024-01-01", "rows": [] }] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn report_carries_new_ids() {
        let app = test::init_service(App::new().configure(testing::app(testing::memory_db()))).await;
        let req = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(json!({ "tables": [{
                "id": "tmp-7",
                "date": "2024-05-05",
                "rows": [{ "forest": "North", "volume": "12.5" }]
            }] }))
            .to_request();
        let report: SaveReport = test::call_and_read_body_json(&app, req).await;
        assert_eq!(report.tables.len(), 1);
        assert_eq!(report.tables[0].key, TableKey::Pending("tmp-7".into()));
        assert_eq!(report.tables[0].inserted_row_ids.len(), 1);
    }

    #[actix_web::test]
    async fn dates_can_shift_between_tables_in_one_batch() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-01-02')", [])?;
            Ok(())
        })
        .unwrap();

        let batch = [
            table(TableKey::Persisted(1), "2024-01-02", vec![]),
            table(TableKey::Persisted(2), "2024-01-03", vec![]),
        ];
        let saved = db.with_conn(|conn| save_tables(conn, &batch)).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(
            stored_dates(&db),
            vec![(1, "2024-01-02".to_string()), (2, "2024-01-03".to_string())]
        );

        let swapped = [
            table(TableKey::Persisted(1), "2024-01-03", vec![]),
            table(TableKey::Persisted(2), "2024-01-02", vec![]),
        ];
        db.with_conn(|conn| save_tables(conn, &swapped)).unwrap();
        assert_eq!(
            stored_dates(&db),
            vec![(1, "2024-01-03".to_string()), (2, "2024-01-02".to_string())]
        );
    }

    #[actix_web::test]
    async fn duplicate_dates_within_a_batch_write_nothing() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-01-02')", [])?;
            Ok(())
        })
        .unwrap();

        let batch = [
            table(TableKey::Persisted(1), "2024-01-05", vec![]),
            table(TableKey::Pending("tmp-1".into()), "2024-01-05", vec![]),
        ];
        let result = db.with_conn(|conn| Ok(save_tables(conn, &batch))).unwrap();
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        let unlisted = [table(TableKey::Persisted(1), "2024-01-02", vec![])];
        let result = db.with_conn(|conn| Ok(save_tables(conn, &unlisted))).unwrap();
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        assert_eq!(
            stored_dates(&db),
            vec![(1, "2024-01-01".to_string()), (2, "2024-01-02".to_string())]
        );
    }

    #[actix_web::test]
    async fn unknown_table_aborts_before_anything_is_inserted() {
        let db = testing::memory_db();
        let batch = [
            table(TableKey::Pending("tmp-1".into()), "2024-05-01", vec![]),
            table(TableKey::Persisted(99), "2024-05-02", vec![]),
        ];
        let result = db.with_conn(|conn| Ok(save_tables(conn, &batch))).unwrap();
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(stored_dates(&db).is_empty());

        let retry = [table(TableKey::Pending("tmp-1".into()), "2024-05-01", vec![])];
        let saved = db.with_conn(|conn| save_tables(conn, &retry)).unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[actix_web::test]
    async fn failed_batch_reports_tables_already_written() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_row BEFORE INSERT ON rows WHEN NEW.forest = 'Blocked'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )?;
            Ok(())
        })
        .unwrap();

        let batch = [
            table(TableKey::Pending("tmp-1".into()), "2024-05-01", vec![row(None, "North", 1.0)]),
            table(
                TableKey::Pending("tmp-2".into()),
                "2024-05-02",
                vec![row(None, "East", 2.0), row(None, "Blocked", 3.0)],
            ),
        ];
        let result = db.with_conn(|conn| Ok(save_tables(conn, &batch))).unwrap();
        let (saved, cause) = match result {
            Err(ApiError::PartialSave { saved, cause }) => (saved, cause),
            other => panic!("expected a partial save, got {:?}", other),
        };
        assert!(matches!(*cause, ApiError::Database(_)));
        let keys: Vec<_> = saved.iter().map(|s| s.key.clone()).collect();
        assert_eq!(
            keys,
            vec![TableKey::Pending("tmp-1".into()), TableKey::Pending("tmp-2".into())]
        );
        assert_eq!(saved[0].inserted_row_ids.len(), 1);
        assert_eq!(saved[1].inserted_row_ids.len(), 1);

        // The editor adopts the reported ids and sends the same tables again.
        db.with_conn(|conn| {
            conn.execute_batch("DROP TRIGGER reject_row;")?;
            Ok(())
        })
        .unwrap();
        let retry = [
            table(
                TableKey::Persisted(saved[0].id),
                "2024-05-01",
                vec![row(Some(saved[0].inserted_row_ids[0]), "North", 1.0)],
            ),
            table(
                TableKey::Persisted(saved[1].id),
                "2024-05-02",
                vec![
                    row(Some(saved[1].inserted_row_ids[0]), "East", 2.0),
                    row(None, "Blocked", 3.0),
                ],
            ),
        ];
        db.with_conn(|conn| save_tables(conn, &retry)).unwrap();
        assert_eq!(stored_dates(&db).len(), 2);
        let rows = db.with_conn(|conn| db::rows::list(conn, Some(saved[1].id))).unwrap();
        let forests: Vec<_> = rows.iter().map(|r| r.forest.as_str()).collect();
        assert_eq!(forests, vec!["East", "Blocked"]);
    }

    #[actix_web::test]
    async fn partial_failure_response_carries_saved_tables() {
        let db = testing::memory_db();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_row BEFORE INSERT ON rows WHEN NEW.forest = 'Blocked'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )?;
            Ok(())
        })
        .unwrap();
        let app = test::init_service(App::new().configure(testing::app(db))).await;
        let req = test::TestRequest::post()
            .uri("/api/tables")
            .set_json(json!({ "tables": [
                { "id": "tmp-1", "date": "2024-06-01", "rows": [] },
                { "id": "tmp-2", "date": "2024-06-02", "rows": [{ "forest": "Blocked" }] }
            ] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.saved.len(), 2);
        assert_eq!(body.saved[0].key, TableKey::Pending("tmp-1".into()));
    }
}
