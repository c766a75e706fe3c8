//! Row SQL shared by the table batch save and the `/api/rows` endpoints.

use common::model::row::Row;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::ApiError;

const SELECT_ROWS: &str =
    "SELECT id, table_id, forest, buyer, product, species, volume, amount FROM rows";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    Ok(Row {
        id: Some(row.get(0)?),
        table_id: Some(row.get(1)?),
        forest: row.get(2)?,
        buyer: row.get(3)?,
        product: row.get(4)?,
        species: row.get(5)?,
        volume: row.get(6)?,
        amount: row.get(7)?,
    })
}

/// All rows, or those of one table, in insertion order.
pub fn list(conn: &Connection, table_id: Option<i64>) -> Result<Vec<Row>, ApiError> {
    let rows = match table_id {
        Some(table_id) => conn
            .prepare(&format!("{SELECT_ROWS} WHERE table_id = ?1 ORDER BY id"))?
            .query_map(params![table_id], read_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => conn
            .prepare(&format!("{SELECT_ROWS} ORDER BY id"))?
            .query_map([], read_row)?
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<Row>, ApiError> {
    let row = conn
        .query_row(&format!("{SELECT_ROWS} WHERE id = ?1"), params![id], read_row)
        .optional()?;
    Ok(row)
}

pub fn ids_for_table(conn: &Connection, table_id: i64) -> Result<Vec<i64>, ApiError> {
    let ids = conn
        .prepare("SELECT id FROM rows WHERE table_id = ?1 ORDER BY id")?
        .query_map(params![table_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

/// Inserts `row` into `table_id`, ignoring any id it carries. Returns the new id.
pub fn insert(conn: &Connection, table_id: i64, row: &Row) -> Result<i64, ApiError> {
    let row = row.sanitized();
    conn.execute(
        "INSERT INTO rows (table_id, forest, buyer, product, species, volume, amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            table_id,
            row.forest,
            row.buyer,
            row.product,
            row.species,
            row.volume,
            row.amount
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites the editable fields of the row with `id`. Returns `false` when no
/// such row exists.
pub fn update(conn: &Connection, id: i64, row: &Row) -> Result<bool, ApiError> {
    let row = row.sanitized();
    let changed = conn.execute(
        "UPDATE rows SET forest = ?1, buyer = ?2, product = ?3, species = ?4, volume = ?5, amount = ?6
         WHERE id = ?7",
        params![
            row.forest,
            row.buyer,
            row.product,
            row.species,
            row.volume,
            row.amount,
            id
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, id: i64) -> Result<bool, ApiError> {
    Ok(conn.execute("DELETE FROM rows WHERE id = ?1", params![id])? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbState;

    fn sample(forest: &str, volume: f64) -> Row {
        Row {
            forest: forest.into(),
            buyer: "Acme".into(),
            volume,
            amount: volume * 10.0,
            ..Row::default()
        }
    }

    #[test]
    fn insert_then_list_by_table() {
        let db = DbState::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01'), ('2024-02-01')", [])?;
            let first = insert(conn, 1, &sample("North", 2.0))?;
            insert(conn, 2, &sample("South", 3.0))?;
            insert(conn, 1, &sample("East", f64::NAN))?;

            let rows = list(conn, Some(1))?;
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].id, Some(first));
            assert_eq!(rows[0].table_id, Some(1));
            assert_eq!(rows[1].volume, 0.0);
            assert_eq!(list(conn, None)?.len(), 3);
            assert_eq!(ids_for_table(conn, 2)?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn update_and_delete_report_missing_rows() {
        let db = DbState::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO tables (date) VALUES ('2024-01-01')", [])?;
            let id = insert(conn, 1, &sample("North", 2.0))?;

            assert!(update(conn, id, &sample("West", 5.0))?);
            assert_eq!(find(conn, id)?.unwrap().forest, "West");
            assert!(!update(conn, id + 1, &sample("West", 5.0))?);

            assert!(delete(conn, id)?);
            assert!(!delete(conn, id)?);
            assert!(find(conn, id)?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
