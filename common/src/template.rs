//! Filling a row from the buyer's historical purchase.
//!
//! Choosing a buyer in the editor rewrites product, species, volume and amount
//! together: either all four come from the first purchase recorded for that
//! buyer, or all four are cleared. A row never ends up with a mix of template
//! and stale values.

use crate::model::purchase::Purchase;
use crate::model::row::Row;

/// First purchase whose buyer matches exactly.
pub fn find_template<'a>(buyer: &str, purchases: &'a [Purchase]) -> Option<&'a Purchase> {
    if buyer.is_empty() {
        return None;
    }
    purchases.iter().find(|purchase| purchase.buyer == buyer)
}

/// Sets `row.buyer` and replaces the four dependent fields.
pub fn apply_buyer(row: &mut Row, buyer: &str, purchases: &[Purchase]) {
    row.buyer = buyer.to_string();
    match find_template(buyer, purchases) {
        Some(template) => {
            row.product = template.product.clone();
            row.species = template.species.clone();
            row.volume = template.volume;
            row.amount = template.amount;
        }
        None => {
            row.product.clear();
            row.species.clear();
            row.volume = 0.0;
            row.amount = 0.0;
        }
    }
}

/// Distinct buyers in first-seen order, for the buyer picker.
pub fn buyers(purchases: &[Purchase]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for purchase in purchases {
        if !names.contains(&purchase.buyer) {
            names.push(purchase.buyer.clone());
        }
    }
    names
}
