//! User-configurable trade parameters
//!
//! Resolution order for each knob: CLI flag, then environment variable, then
//! the compile-time default. The fee percentage is surfaced as 0-100 and
//! stored as a fraction.

use eyre::{eyre, Result, WrapErr};

use crate::config::{DEFAULT_FEE_PCT, DEFAULT_FIXED_FEE_USDT, DEFAULT_VOLUME_USD};
use crate::engine::CommissionProfile;

pub const VOLUME_ENV: &str = "DOLAR_ARB_VOLUME";
pub const FEE_PCT_ENV: &str = "DOLAR_ARB_FEE_PCT";
pub const FIXED_FEE_ENV: &str = "DOLAR_ARB_FIXED_FEE";

#[derive(Debug, Clone, Copy)]
pub struct TradeParams {
    /// Official dollars to buy, in USD
    pub volume_usd: f64,
    pub fees: CommissionProfile,
}

impl TradeParams {
    /// Build from optional CLI overrides, falling back to env then defaults.
    pub fn resolve(
        volume: Option<f64>,
        fee_pct: Option<f64>,
        fixed_fee: Option<f64>,
    ) -> Result<Self> {
        let volume_usd = pick(volume, VOLUME_ENV, DEFAULT_VOLUME_USD)?;
        let fee_pct = pick(fee_pct, FEE_PCT_ENV, DEFAULT_FEE_PCT)?;
        let fixed_fee = pick(fixed_fee, FIXED_FEE_ENV, DEFAULT_FIXED_FEE_USDT)?;

        if !volume_usd.is_finite() || volume_usd <= 0.0 {
            return Err(eyre!("trade volume must be positive, got {volume_usd}"));
        }

        let fees = CommissionProfile::new(fee_pct / 100.0, fixed_fee)
            .map_err(|e| eyre!("invalid commission settings: {e}"))?;

        Ok(Self { volume_usd, fees })
    }
}

fn pick(flag: Option<f64>, env_key: &str, default: f64) -> Result<f64> {
    if let Some(value) = flag {
        return Ok(value);
    }
    match std::env::var(env_key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .wrap_err_with(|| format!("{env_key} is not a number: {raw:?}")),
        Err(_) => Ok(default),
    }
}
