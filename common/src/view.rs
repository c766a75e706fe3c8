//! Display pipeline for one plan table: filter, sort, total and aggregate.
//!
//! [`PlanView::derive`] is what both the editor grid and the spreadsheet export
//! consume, so the exported file always matches what the user sees.
//!
//! Filtering keeps a row when its forest, buyer and species each contain the
//! corresponding filter text, ignoring case; empty filter text matches
//! everything. Sorting is stable, so rows with equal keys keep their input
//! order, and a descending sort is the exact reverse of the ascending
//! comparator.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::row::Row;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    #[serde(default)]
    pub forest: String,
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub species: String,
}

impl RowFilter {
    pub fn matches(&self, row: &Row) -> bool {
        contains_folded(&row.forest, &self.forest)
            && contains_folded(&row.buyer, &self.buyer)
            && contains_folded(&row.species, &self.species)
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty() && self.buyer.is_empty() && self.species.is_empty()
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Orders text the way a person reading the list expects: letters compare
/// regardless of case first, and only strings that differ solely in case fall
/// back to their exact code-point order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Forest,
    Buyer,
    Product,
    Species,
    Volume,
    Amount,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Forest,
        SortField::Buyer,
        SortField::Product,
        SortField::Species,
        SortField::Volume,
        SortField::Amount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Forest => "Forest unit",
            SortField::Buyer => "Buyer",
            SortField::Product => "Product",
            SortField::Species => "Species",
            SortField::Volume => "Volume (m³)",
            SortField::Amount => "Amount (UAH)",
        }
    }

    fn compare(self, a: &Row, b: &Row) -> Ordering {
        match self {
            SortField::Forest => locale_compare(&a.forest, &b.forest),
            SortField::Buyer => locale_compare(&a.buyer, &b.buyer),
            SortField::Product => locale_compare(&a.product, &b.product),
            SortField::Species => locale_compare(&a.species, &b.species),
            SortField::Volume => a.volume.total_cmp(&b.volume),
            SortField::Amount => a.amount.total_cmp(&b.amount),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Which column a table is sorted by. `field: None` keeps input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Header-click behaviour: the current field flips direction, any other
    /// field becomes the sort key in ascending order.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn sort(&self, rows: &mut [Row]) {
        let Some(field) = self.field else {
            return;
        };
        match self.direction {
            SortDirection::Ascending => rows.sort_by(|a, b| field.compare(a, b)),
            SortDirection::Descending => rows.sort_by(|a, b| field.compare(a, b).reverse()),
        }
    }

    /// Sorts indices into `rows` by the rows they point at.
    fn sort_positions(&self, positions: &mut [usize], rows: &[Row]) {
        let Some(field) = self.field else {
            return;
        };
        match self.direction {
            SortDirection::Ascending => {
                positions.sort_by(|a, b| field.compare(&rows[*a], &rows[*b]))
            }
            SortDirection::Descending => {
                positions.sort_by(|a, b| field.compare(&rows[*a], &rows[*b]).reverse())
            }
        }
    }
}

/// Rounds a quantity the way it is displayed and exported.
pub fn display_round(value: f64) -> f64 {
    if value.is_finite() { value.round() } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestVolume {
    pub forest: String,
    pub volume: f64,
}

/// Derived, display-ready state of one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanView {
    pub rows: Vec<Row>,
    /// Index of each visible row in the unfiltered input, parallel to `rows`.
    pub positions: Vec<usize>,
    pub total_volume: f64,
    pub total_amount: f64,
    /// One entry per known forest unit, in reference-list order.
    pub forest_volumes: Vec<ForestVolume>,
}

impl PlanView {
    pub fn derive(rows: &[Row], filter: &RowFilter, sort: &SortSpec, forests: &[String]) -> Self {
        let mut positions: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(row))
            .map(|(index, _)| index)
            .collect();
        sort.sort_positions(&mut positions, rows);
        let visible: Vec<Row> = positions.iter().map(|&index| rows[index].clone()).collect();

        let (total_volume, total_amount) = totals(&visible);
        let forest_volumes = forests
            .iter()
            .map(|forest| ForestVolume {
                forest: forest.clone(),
                volume: visible
                    .iter()
                    .filter(|row| &row.forest == forest)
                    .map(|row| row.volume)
                    .sum(),
            })
            .collect();

        Self {
            rows: visible,
            positions,
            total_volume,
            total_amount,
            forest_volumes,
        }
    }

    /// Largest per-forest volume, used to scale chart bars.
    pub fn peak_forest_volume(&self) -> f64 {
        self.forest_volumes
            .iter()
            .map(|entry| entry.volume)
            .fold(0.0, f64::max)
    }
}

/// Sums of volume and amount over `rows`.
pub fn totals(rows: &[Row]) -> (f64, f64) {
    rows.iter()
        .fold((0.0, 0.0), |(volume, amount), row| (volume + row.volume, amount + row.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(forest: &str, buyer: &str, species: &str, volume: f64, amount: f64) -> Row {
        Row {
            forest: forest.into(),
            buyer: buyer.into(),
            product: format!("{}-{}", forest, species),
            species: species.into(),
            volume,
            amount,
            ..Row::default()
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row("North", "Acme", "Oak", 10.0, 100.0),
            row("south", "Birch Co", "Pine", 5.5, 40.0),
            row("North", "acme mill", "Pine", 2.0, 30.0),
            row("East", "Zeta", "Oak", 7.0, 70.0),
        ]
    }

    #[test]
    fn filter_is_case_insensitive_and_conjunctive() {
        let filter = RowFilter {
            forest: "NORTH".into(),
            buyer: "acme".into(),
            species: "pin".into(),
        };
        let kept: Vec<_> = sample().into_iter().filter(|r| filter.matches(r)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].buyer, "acme mill");
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = RowFilter::default();
        assert!(filter.is_empty());
        assert!(sample().iter().all(|r| filter.matches(r)));
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let filter = RowFilter {
            species: "oak".into(),
            ..RowFilter::default()
        };
        let once = PlanView::derive(&sample(), &filter, &SortSpec::default(), &[]);
        let twice = PlanView::derive(&once.rows, &filter, &SortSpec::default(), &[]);
        assert_eq!(once.rows, twice.rows);
    }

    #[test]
    fn descending_is_the_reverse_of_ascending_for_distinct_keys() {
        let distinct = vec![
            row("North", "Acme", "Oak", 10.0, 100.0),
            row("south", "Birch Co", "Pine", 5.5, 40.0),
            row("East", "acme mill", "Ash", 2.0, 30.0),
            row("West", "Zeta", "beech", 7.0, 70.0),
        ];
        for field in SortField::ALL {
            let mut asc = distinct.clone();
            SortSpec::by(field, SortDirection::Ascending).sort(&mut asc);
            let mut desc = distinct.clone();
            SortSpec::by(field, SortDirection::Descending).sort(&mut desc);
            desc.reverse();
            assert_eq!(asc, desc, "field {:?}", field);
        }
    }

    #[test]
    fn text_sort_ignores_case_and_numbers_sort_numerically() {
        let mut rows = sample();
        SortSpec::by(SortField::Forest, SortDirection::Ascending).sort(&mut rows);
        let forests: Vec<_> = rows.iter().map(|r| r.forest.as_str()).collect();
        assert_eq!(forests, vec!["East", "North", "North", "south"]);

        SortSpec::by(SortField::Volume, SortDirection::Ascending).sort(&mut rows);
        let volumes: Vec<_> = rows.iter().map(|r| r.volume).collect();
        assert_eq!(volumes, vec![2.0, 5.5, 7.0, 10.0]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut rows = sample();
        SortSpec::by(SortField::Forest, SortDirection::Descending).sort(&mut rows);
        let north: Vec<_> = rows
            .iter()
            .filter(|r| r.forest == "North")
            .map(|r| r.buyer.as_str())
            .collect();
        assert_eq!(north, vec!["Acme", "acme mill"]);
    }

    #[test]
    fn positions_point_back_into_the_input() {
        let input = sample();
        let filter = RowFilter {
            species: "pine".into(),
            ..RowFilter::default()
        };
        let view = PlanView::derive(
            &input,
            &filter,
            &SortSpec::by(SortField::Volume, SortDirection::Ascending),
            &[],
        );
        assert_eq!(view.positions, vec![2, 1]);
        for (row, &index) in view.rows.iter().zip(&view.positions) {
            assert_eq!(row, &input[index]);
        }
    }

    #[test]
    fn positions_follow_a_descending_sort() {
        let input = sample();
        let view = PlanView::derive(
            &input,
            &RowFilter::default(),
            &SortSpec::by(SortField::Volume, SortDirection::Descending),
            &[],
        );
        assert_eq!(view.positions, vec![0, 3, 1, 2]);
        assert_eq!(view.rows[1].buyer, "Zeta");
    }

    #[test]
    fn toggle_flips_same_field_and_resets_new_field() {
        let mut sort = SortSpec::default();
        sort.toggle(SortField::Amount);
        assert_eq!(sort, SortSpec::by(SortField::Amount, SortDirection::Ascending));
        sort.toggle(SortField::Amount);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.toggle(SortField::Buyer);
        assert_eq!(sort, SortSpec::by(SortField::Buyer, SortDirection::Ascending));
    }

    #[test]
    fn totals_cover_filtered_rows_only() {
        let filter = RowFilter {
            forest: "north".into(),
            ..RowFilter::default()
        };
        let view = PlanView::derive(&sample(), &filter, &SortSpec::default(), &[]);
        assert_eq!(view.total_volume, 12.0);
        assert_eq!(view.total_amount, 130.0);
    }

    #[test]
    fn forest_volumes_follow_the_reference_list() {
        let forests = vec!["North".to_string(), "West".to_string(), "East".to_string()];
        let view = PlanView::derive(&sample(), &RowFilter::default(), &SortSpec::default(), &forests);
        let volumes: Vec<_> = view
            .forest_volumes
            .iter()
            .map(|f| (f.forest.as_str(), f.volume))
            .collect();
        assert_eq!(volumes, vec![("North", 12.0), ("West", 0.0), ("East", 7.0)]);
        assert_eq!(view.peak_forest_volume(), 12.0);
    }

    #[test]
    fn display_rounding_is_to_nearest() {
        assert_eq!(display_round(12.6), 13.0);
        assert_eq!(display_round(999.4), 999.0);
        assert_eq!(display_round(2.5), 3.0);
        assert_eq!(display_round(f64::NAN), 0.0);
    }
}
