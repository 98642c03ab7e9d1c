//! Cart payload parsing.
//!
//! The checkout form submits the browser cart as a JSON string in the
//! `cart_data` field:
//!
//! ```json
//! [{"name": "Brocoli", "price": 2.67, "qty": 2}, {"price": "1.76", "qty": "1"}]
//! ```
//!
//! Only `price` and `qty` (alias `quantity`) are required. `product_id` is
//! optional and carried through to order items. Unknown fields are ignored.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::ProductId;

/// Reasons a cart payload is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The form had no `cart_data` field, or it was blank.
    #[error("cart payload is missing")]
    Missing,

    /// The payload is not JSON at all.
    #[error("cart payload is not valid JSON: {0}")]
    InvalidJson(String),

    /// The payload is JSON but not an array.
    #[error("cart payload must be a JSON array of line items")]
    NotAnArray,

    /// A line item is not a JSON object.
    #[error("line {index}: expected an object")]
    NotAnObject {
        /// Zero-based position in the array.
        index: usize,
    },

    /// A required field is absent or null.
    #[error("line {index}: missing required field `{field}`")]
    MissingField {
        /// Zero-based position in the array.
        index: usize,
        /// Name of the absent field.
        field: &'static str,
    },

    /// `price` is not a non-negative number.
    #[error("line {index}: invalid price {value}")]
    InvalidPrice {
        /// Zero-based position in the array.
        index: usize,
        /// The offending JSON value.
        value: String,
    },

    /// `qty` is not a non-negative whole number.
    #[error("line {index}: invalid quantity {value}")]
    InvalidQuantity {
        /// Zero-based position in the array.
        index: usize,
        /// The offending JSON value.
        value: String,
    },

    /// The cart's totals do not fit in a decimal.
    #[error("cart total is too large")]
    TotalOverflow,

    /// `product_id` is present but not an integer.
    #[error("line {index}: invalid product_id {value}")]
    InvalidProductId {
        /// Zero-based position in the array.
        index: usize,
        /// The offending JSON value.
        value: String,
    },
}

/// One validated cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// Catalog product, when the client sent one.
    pub product_id: Option<ProductId>,
    /// Unit price in dollars, never negative.
    pub price: Decimal,
    /// Units ordered.
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity`, or `None` if the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Largest quantity an order item can store (`INT4`).
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// A parsed, validated cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartPayload {
    lines: Vec<CartLine>,
}

impl CartPayload {
    /// Build a payload from already-validated lines.
    #[must_use]
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Parse the raw `cart_data` form value.
    ///
    /// An empty array is accepted and yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] describing the first problem found.
    pub fn parse(raw: &str) -> Result<Self, CartError> {
        if raw.trim().is_empty() {
            return Err(CartError::Missing);
        }

        let value: Value =
            serde_json::from_str(raw).map_err(|e| CartError::InvalidJson(e.to_string()))?;
        let Value::Array(items) = value else {
            return Err(CartError::NotAnArray);
        };

        let lines = items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => parse_line(index, fields),
                _ => Err(CartError::NotAnObject { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { lines })
    }

    /// The validated lines in submission order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

fn parse_line(index: usize, fields: &Map<String, Value>) -> Result<CartLine, CartError> {
    let price = required(index, fields, &["price"], "price")?;
    let price = decimal_from_json(price)
        .filter(|p| !p.is_sign_negative() || p.is_zero())
        .ok_or_else(|| CartError::InvalidPrice {
            index,
            value: price.to_string(),
        })?;

    let qty = required(index, fields, &["qty", "quantity"], "qty")?;
    let quantity = quantity_from_json(qty).ok_or_else(|| CartError::InvalidQuantity {
        index,
        value: qty.to_string(),
    })?;

    let product_id = match fields.get("product_id") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(product_id_from_json(raw).ok_or_else(|| {
            CartError::InvalidProductId {
                index,
                value: raw.to_string(),
            }
        })?),
    };

    Ok(CartLine {
        product_id,
        price,
        quantity,
    })
}

fn required<'a>(
    index: usize,
    fields: &'a Map<String, Value>,
    keys: &[&str],
    field: &'static str,
) -> Result<&'a Value, CartError> {
    keys.iter()
        .find_map(|k| fields.get(*k).filter(|v| !v.is_null()))
        .ok_or(CartError::MissingField { index, field })
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn quantity_from_json(value: &Value) -> Option<u32> {
    let quantity = match value {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                u32::try_from(whole).ok()
            } else {
                // 2.0 is a whole number; 2.5 and negatives are not
                let float = n.as_f64()?;
                if float.fract() != 0.0 || float < 0.0 || float > f64::from(u32::MAX) {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Some(float as u32)
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (quantity <= MAX_QUANTITY).then_some(quantity)
}

fn product_id_from_json(value: &Value) -> Option<ProductId> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .map(ProductId::new),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
