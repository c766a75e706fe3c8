use serde::{Deserialize, Serialize};

use super::lenient;

/// A historical purchase, used as the fill-in template for a buyer.
///
/// Unique on `(buyer, product, species)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(default, deserialize_with = "lenient::text")]
    pub buyer: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub product: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub species: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
}

impl Purchase {
    pub fn key(&self) -> PurchaseKey {
        PurchaseKey {
            buyer: self.buyer.clone(),
            product: self.product.clone(),
            species: self.species.clone(),
        }
    }
}

/// The unique part of a [`Purchase`]; the body of a delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurchaseKey {
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub species: String,
}

impl PurchaseKey {
    pub fn is_complete(&self) -> bool {
        [&self.buyer, &self.product, &self.species]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}
