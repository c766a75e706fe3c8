use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::row::Row;

/// Identity of a plan table.
///
/// On the wire this is the table's `id` field: a number for tables the server
/// knows about, a string token for tables that only exist in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableKey {
    Persisted(i64),
    Pending(String),
}

impl Default for TableKey {
    fn default() -> Self {
        TableKey::Pending(String::new())
    }
}

impl TableKey {
    pub fn persisted_id(&self) -> Option<i64> {
        match self {
            TableKey::Persisted(id) => Some(*id),
            TableKey::Pending(_) => None,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Persisted(id) => write!(f, "#{}", id),
            TableKey::Pending(token) => write!(f, "unsaved table '{}'", token),
        }
    }
}

fn key_or_pending<'de, D>(deserializer: D) -> Result<TableKey, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TableKey>::deserialize(deserializer)?.unwrap_or_default())
}

/// A dated sales plan and its rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTable {
    #[serde(default, deserialize_with = "key_or_pending")]
    pub id: TableKey,
    /// ISO `YYYY-MM-DD`; unique across tables.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl PlanTable {
    pub fn persisted_id(&self) -> Option<i64> {
        self.id.persisted_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_is_persisted_and_string_id_is_pending() {
        let saved: PlanTable = serde_json::from_str(r#"{"id":7,"date":"2024-01-01"}"#).unwrap();
        assert_eq!(saved.id, TableKey::Persisted(7));
        assert!(saved.rows.is_empty());

        let draft: PlanTable =
            serde_json::from_str(r#"{"id":"tmp-3","date":"2024-01-02","rows":[]}"#).unwrap();
        assert_eq!(draft.id, TableKey::Pending("tmp-3".into()));
    }

    #[test]
    fn missing_or_null_id_is_pending() {
        let absent: PlanTable = serde_json::from_str(r#"{"date":"2024-01-01"}"#).unwrap();
        let null: PlanTable = serde_json::from_str(r#"{"id":null,"date":"2024-01-01"}"#).unwrap();
        assert_eq!(absent.id, TableKey::default());
        assert_eq!(null.id, TableKey::default());
    }

    #[test]
    fn keys_serialize_as_bare_values() {
        assert_eq!(serde_json::to_string(&TableKey::Persisted(4)).unwrap(), "4");
        assert_eq!(
            serde_json::to_string(&TableKey::Pending("tmp-1".into())).unwrap(),
            "\"tmp-1\""
        );
    }
}
