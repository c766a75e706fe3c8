//! Named reference lists: forest units, products and species.
//!
//! Each list is just a set of unique names. Rows store the name itself rather
//! than a foreign key, so `ReferenceKind` also records which row column (and,
//! for products and species, which purchase column) holds a given name; the
//! backend uses that to refuse deleting a name that is still in use.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Forest,
    Product,
    Species,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Forest,
        ReferenceKind::Product,
        ReferenceKind::Species,
    ];

    /// Datastore table and URL segment (`/api/<collection>`).
    pub fn collection(self) -> &'static str {
        match self {
            ReferenceKind::Forest => "forests",
            ReferenceKind::Product => "products",
            ReferenceKind::Species => "species",
        }
    }

    /// Row (and purchase) column holding a name of this kind.
    pub fn column(self) -> &'static str {
        match self {
            ReferenceKind::Forest => "forest",
            ReferenceKind::Product => "product",
            ReferenceKind::Species => "species",
        }
    }

    pub fn used_by_purchases(self) -> bool {
        !matches!(self, ReferenceKind::Forest)
    }

    pub fn label(self) -> &'static str {
        match self {
            ReferenceKind::Forest => "Forest unit",
            ReferenceKind::Product => "Product",
            ReferenceKind::Species => "Species",
        }
    }
}

/// A reference entry as some clients send it: a bare string or a `{name}` record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReferenceName {
    Plain(String),
    Record { name: String },
}

impl ReferenceName {
    pub fn into_name(self) -> String {
        match self {
            ReferenceName::Plain(name) | ReferenceName::Record { name } => name,
        }
    }
}

/// Collapses a mixed list into trimmed, non-empty, first-seen-unique names.
pub fn normalize_names<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = ReferenceName>,
{
    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let name = entry.into_name().trim().to_string();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_shapes_normalize_to_names() {
        let entries: Vec<ReferenceName> =
            serde_json::from_str(r#"["Oak", {"name": " Pine "}, "", {"name": "Oak"}]"#).unwrap();
        assert_eq!(normalize_names(entries), vec!["Oak", "Pine"]);
    }

    #[test]
    fn only_forests_are_unused_by_purchases() {
        let in_purchases: Vec<_> = ReferenceKind::ALL
            .iter()
            .filter(|kind| kind.used_by_purchases())
            .map(|kind| kind.column())
            .collect();
        assert_eq!(in_purchases, vec!["product", "species"]);
    }
}
