//! Forgiving deserializers for fields typed by hand in the browser.
//!
//! Numeric inputs arrive as numbers, numeric strings, `null` or not at all;
//! every form that is not a finite number is stored as `0`.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Replaces NaN and infinities with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberLike::deserialize(deserializer)? {
        NumberLike::Number(n) => n,
        NumberLike::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        NumberLike::Other(_) => 0.0,
    };
    Ok(finite_or_zero(value))
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
