//! Order totals.
//!
//! `subtotal = Σ price × quantity`, `tax = subtotal × TAX_RATE`,
//! `total = subtotal + tax`. All three are exact decimals; nothing is rounded
//! until display. Arithmetic is checked; a cart whose totals do not fit in a
//! `Decimal` has no totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::{CartError, CartLine, CartPayload};

/// Flat sales tax applied to every order (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Monetary summary of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a set of cart lines, or `None` on overflow.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Option<Self> {
        let subtotal = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
            sum.checked_add(line.line_total()?)
        })?;
        Self::from_subtotal(subtotal)
    }

    /// Compute tax and total from an already-summed subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Option<Self> {
        let tax = subtotal.checked_mul(TAX_RATE)?;
        Some(Self {
            subtotal,
            tax,
            total: subtotal.checked_add(tax)?,
        })
    }
}

impl TryFrom<&CartPayload> for OrderTotals {
    type Error = CartError;

    fn try_from(cart: &CartPayload) -> Result<Self, Self::Error> {
        Self::from_lines(cart.lines()).ok_or(CartError::TotalOverflow)
    }
}
