//! Break-even Volume Solver
//!
//! Profitability requires `(V - F) * S * (1 - R) > V * B` where V is the
//! traded volume, F the fixed fee, S the sell price, R the fee rate and B the
//! buy price. Solving for V at the boundary gives
//! `V0 = F * S * (1 - R) / (S * (1 - R) - B)`; when the per-unit margin after
//! fees never clears the buy price no volume amortizes the fixed fee and the
//! threshold is unbounded.

use super::{check_price, CommissionProfile, EngineError};

/// Minimum volume in USD at which the chain stops losing money, or
/// `f64::INFINITY` when no finite volume is ever profitable.
///
/// Uses the same arithmetic as [`super::compute`]'s viability condition, so
/// volumes above the returned threshold are viable and volumes below are not,
/// up to floating-point boundary equality.
pub fn minimum_volume(
    buy_price: f64,
    sell_price: f64,
    fees: &CommissionProfile,
) -> Result<f64, EngineError> {
    let buy_price = check_price(buy_price)?;
    let sell_price = check_price(sell_price)?;

    let denominator = sell_price * (1.0 - fees.fee_rate()) - buy_price;
    if denominator <= 0.0 {
        return Ok(f64::INFINITY);
    }

    let volume = (fees.fixed_fee() * sell_price * (1.0 - fees.fee_rate())) / denominator;
    Ok(volume.max(0.0))
}
