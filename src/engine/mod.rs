//! Arbitrage calculation engine
//!
//! Pure scalar math over quoted prices: the full cash-flow breakdown for a
//! buy-official / sell-elsewhere conversion chain, and the closed-form
//! break-even volume for the same commission structure. No I/O, no state.

pub mod breakeven;
pub mod calculator;

pub use breakeven::minimum_volume;
pub use calculator::{compute, compute_mep, ArbitrageResult, CommissionProfile, MepResult};

use thiserror::Error;

/// Rejections for numeric inputs the engine refuses to evaluate.
///
/// The upstream quote providers never guarantee sane numbers, so every price,
/// volume and fee is checked once at the engine boundary instead of letting a
/// zero buy price turn into a NaN ROI downstream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("price must be a positive finite number, got {0}")]
    InvalidPrice(f64),
    #[error("volume must be a positive finite number, got {0}")]
    InvalidVolume(f64),
    #[error("fee rate must be a fraction in [0, 1], got {0}")]
    InvalidFeeRate(f64),
    #[error("fixed fee must be a non-negative finite number, got {0}")]
    InvalidFixedFee(f64),
}

pub(crate) fn check_price(price: f64) -> Result<f64, EngineError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(EngineError::InvalidPrice(price))
    }
}

pub(crate) fn check_volume(volume: f64) -> Result<f64, EngineError> {
    if volume.is_finite() && volume > 0.0 {
        Ok(volume)
    } else {
        Err(EngineError::InvalidVolume(volume))
    }
}
