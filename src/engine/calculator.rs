//! Arbitrage Calculator
//!
//! Computes the outcome of one conversion chain at a fixed volume:
//! buy USD at the official rate, bridge to USDT 1:1, sell the USDT on an
//! exchange, deduct the transfer fee and the exchange commission. A second
//! entry point covers the official -> MEP path, which has no crypto fees.

use serde::Serialize;

use super::{check_price, check_volume, EngineError};

/// Commission structure of the crypto leg.
///
/// `fee_rate` is a fraction in [0, 1] applied to gross proceeds;
/// `fixed_fee` is charged in USDT, off the transferred volume, before the sale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommissionProfile {
    fee_rate: f64,
    fixed_fee: f64,
}

impl CommissionProfile {
    pub fn new(fee_rate: f64, fixed_fee: f64) -> Result<Self, EngineError> {
        if !fee_rate.is_finite() || !(0.0..=1.0).contains(&fee_rate) {
            return Err(EngineError::InvalidFeeRate(fee_rate));
        }
        if !fixed_fee.is_finite() || fixed_fee < 0.0 {
            return Err(EngineError::InvalidFixedFee(fixed_fee));
        }
        Ok(Self { fee_rate, fixed_fee })
    }

    /// Frictionless profile, used by the MEP path and as a neutral baseline.
    pub fn none() -> Self {
        Self { fee_rate: 0.0, fixed_fee: 0.0 }
    }

    pub fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    pub fn fixed_fee(&self) -> f64 {
        self.fixed_fee
    }
}

/// Full cash-flow breakdown of one arbitrage evaluation.
///
/// Immutable once returned; the scanner only reads it for ranking and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageResult {
    /// ARS spent buying `volume` USD at the official rate
    pub initial_cost_ars: f64,
    /// USDT left to sell after the fixed transfer fee
    pub net_usdt: f64,
    /// ARS received for the USDT before commission
    pub gross_proceeds_ars: f64,
    /// Exchange commission deducted from gross proceeds
    pub commission_ars: f64,
    /// ARS kept after commission
    pub net_proceeds_ars: f64,
    /// Net proceeds minus initial cost
    pub profit_ars: f64,
    /// Profit converted back at the buy price
    pub profit_usd: f64,
    /// Profit over initial cost, in percent
    pub roi_pct: f64,
    /// Strictly positive profit; break-even is not viable
    pub viable: bool,
}

/// Outcome of selling official dollars on the MEP market. No crypto fees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MepResult {
    pub initial_cost_ars: f64,
    pub proceeds_ars: f64,
    pub profit_ars: f64,
    pub profit_usd: f64,
    pub roi_pct: f64,
    pub viable: bool,
}

/// Evaluate the official -> USDT -> ARS chain at `volume` USD.
///
/// When the fixed fee consumes the whole volume the trade cannot proceed:
/// the principal is spent and nothing comes back, so the result reports a
/// total loss (`roi_pct = -100`) rather than an error.
pub fn compute(
    buy_price: f64,
    sell_price: f64,
    volume: f64,
    fees: &CommissionProfile,
) -> Result<ArbitrageResult, EngineError> {
    let buy_price = check_price(buy_price)?;
    let sell_price = check_price(sell_price)?;
    let volume = check_volume(volume)?;

    let initial_cost_ars = volume * buy_price;
    let net_usdt = volume - fees.fixed_fee;

    if net_usdt <= 0.0 {
        return Ok(ArbitrageResult {
            initial_cost_ars,
            net_usdt: 0.0,
            gross_proceeds_ars: 0.0,
            commission_ars: 0.0,
            net_proceeds_ars: 0.0,
            profit_ars: -initial_cost_ars,
            profit_usd: -volume,
            roi_pct: -100.0,
            viable: false,
        });
    }

    let gross_proceeds_ars = net_usdt * sell_price;
    let commission_ars = gross_proceeds_ars * fees.fee_rate;
    let net_proceeds_ars = gross_proceeds_ars - commission_ars;
    let profit_ars = net_proceeds_ars - initial_cost_ars;
    let profit_usd = profit_ars / buy_price;
    let roi_pct = if initial_cost_ars > 0.0 {
        (profit_ars / initial_cost_ars) * 100.0
    } else {
        0.0
    };

    Ok(ArbitrageResult {
        initial_cost_ars,
        net_usdt,
        gross_proceeds_ars,
        commission_ars,
        net_proceeds_ars,
        profit_ars,
        profit_usd,
        roi_pct,
        viable: profit_ars > 0.0,
    })
}

/// Evaluate the official -> MEP chain at `volume` USD.
///
/// Equivalent to [`compute`] with no fees, minus the degenerate-volume branch
/// (with no fixed fee the full volume always reaches the sale).
pub fn compute_mep(
    buy_price: f64,
    sell_price: f64,
    volume: f64,
) -> Result<MepResult, EngineError> {
    let buy_price = check_price(buy_price)?;
    let sell_price = check_price(sell_price)?;
    let volume = check_volume(volume)?;

    let initial_cost_ars = volume * buy_price;
    let proceeds_ars = volume * sell_price;
    let profit_ars = proceeds_ars - initial_cost_ars;
    let profit_usd = profit_ars / buy_price;
    let roi_pct = if initial_cost_ars > 0.0 {
        (profit_ars / initial_cost_ars) * 100.0
    } else {
        0.0
    };

    Ok(MepResult {
        initial_cost_ars,
        proceeds_ars,
        profit_ars,
        profit_usd,
        roi_pct,
        viable: profit_ars > 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fees(rate: f64, fixed: f64) -> CommissionProfile {
        CommissionProfile::new(rate, fixed).unwrap()
    }

    #[test]
    fn test_profitable_chain_breakdown() {
        // 1000 USD at 1000 ARS, sold at 1050 with 1% + 1 USDT fees
        let result = compute(1000.0, 1050.0, 1000.0, &fees(0.01, 1.0)).unwrap();

        assert_eq!(result.initial_cost_ars, 1_000_000.0);
        assert_eq!(result.net_usdt, 999.0);
        assert_eq!(result.gross_proceeds_ars, 1_048_950.0);
        assert_eq!(result.commission_ars, 10_489.5);
        assert_eq!(result.net_proceeds_ars, 1_038_460.5);
        assert_eq!(result.profit_ars, 38_460.5);
        assert!((result.roi_pct - 3.84605).abs() < 1e-9);
        assert!(result.viable);
    }

    #[test]
    fn test_profit_identity() {
        let result = compute(1234.5, 1301.2, 750.0, &fees(0.007, 2.5)).unwrap();
        assert_eq!(result.profit_ars, result.net_proceeds_ars - result.initial_cost_ars);
        assert_eq!(result.net_proceeds_ars, result.gross_proceeds_ars - result.commission_ars);
        assert_eq!(result.viable, result.profit_ars > 0.0);
    }

    #[test]
    fn test_fixed_fee_consumes_volume() {
        // Fee exceeds the transferred amount: total loss of the principal
        let result = compute(1000.0, 1050.0, 0.5, &fees(0.01, 1.0)).unwrap();

        assert_eq!(result.net_usdt, 0.0);
        assert_eq!(result.gross_proceeds_ars, 0.0);
        assert_eq!(result.net_proceeds_ars, 0.0);
        assert_eq!(result.profit_ars, -500.0);
        assert_eq!(result.profit_usd, -0.5);
        assert_eq!(result.roi_pct, -100.0);
        assert!(!result.viable);
    }

    #[test]
    fn test_fixed_fee_equals_volume_is_degenerate() {
        let result = compute(1000.0, 1050.0, 1.0, &fees(0.0, 1.0)).unwrap();
        assert_eq!(result.roi_pct, -100.0);
        assert!(!result.viable);
    }

    #[test]
    fn test_zero_profit_is_not_viable() {
        // Identical prices, no fees: exact break-even
        let result = compute(1000.0, 1000.0, 100.0, &CommissionProfile::none()).unwrap();
        assert_eq!(result.profit_ars, 0.0);
        assert!(!result.viable);
    }

    #[test]
    fn test_losing_chain() {
        let result = compute(1000.0, 980.0, 500.0, &fees(0.02, 1.0)).unwrap();
        assert!(result.profit_ars < 0.0);
        assert!(result.profit_usd < 0.0);
        assert!(!result.viable);
    }

    #[test]
    fn test_mep_matches_feeless_compute() {
        let mep = compute_mep(1000.0, 1080.0, 1000.0).unwrap();
        let full = compute(1000.0, 1080.0, 1000.0, &CommissionProfile::none()).unwrap();

        assert_eq!(mep.initial_cost_ars, full.initial_cost_ars);
        assert_eq!(mep.proceeds_ars, full.net_proceeds_ars);
        assert_eq!(mep.profit_ars, full.profit_ars);
        assert_eq!(mep.profit_usd, full.profit_usd);
        assert_eq!(mep.roi_pct, full.roi_pct);
        assert_eq!(mep.viable, full.viable);
    }

    #[test]
    fn test_mep_below_official_is_not_viable() {
        let mep = compute_mep(1000.0, 950.0, 1000.0).unwrap();
        assert_eq!(mep.profit_ars, -50_000.0);
        assert!(!mep.viable);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let ok = fees(0.01, 1.0);
        assert!(matches!(
            compute(0.0, 1050.0, 1000.0, &ok),
            Err(EngineError::InvalidPrice(_))
        ));
        assert!(matches!(
            compute(1000.0, -1.0, 1000.0, &ok),
            Err(EngineError::InvalidPrice(_))
        ));
        assert!(matches!(
            compute(1000.0, 1050.0, 0.0, &ok),
            Err(EngineError::InvalidVolume(_))
        ));
        assert!(matches!(
            compute(f64::NAN, 1050.0, 1000.0, &ok),
            Err(EngineError::InvalidPrice(_))
        ));
        assert!(matches!(
            compute_mep(1000.0, f64::INFINITY, 1000.0),
            Err(EngineError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_rejects_bad_fees() {
        assert!(matches!(
            CommissionProfile::new(1.5, 0.0),
            Err(EngineError::InvalidFeeRate(_))
        ));
        assert!(matches!(
            CommissionProfile::new(-0.1, 0.0),
            Err(EngineError::InvalidFeeRate(_))
        ));
        assert!(matches!(
            CommissionProfile::new(0.01, -1.0),
            Err(EngineError::InvalidFixedFee(_))
        ));
        assert!(CommissionProfile::new(1.0, 0.0).is_ok());
        assert!(CommissionProfile::new(0.0, 0.0).is_ok());
    }
}
