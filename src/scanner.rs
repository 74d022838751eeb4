//! Scan cycle: fetch every quote, evaluate both strategies, rank the results
//!
//! The fiat rates and the exchange quotes are fetched concurrently; any
//! source that fails or times out is simply omitted from the report. The
//! numeric work is split into pure helpers so it is testable without I/O.

use std::time::Instant;

use futures::{stream, StreamExt};
use tracing::{debug, warn};

use crate::config::MAX_CONCURRENT_FETCHES;
use crate::engine::{self, ArbitrageResult, MepResult};
use crate::params::TradeParams;
use crate::quotes::{FxRate, QuoteClient};

/// Evaluation of one exchange against the official rate.
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub exchange: String,
    /// USDT/ARS price the venue pays (totalBid)
    pub usdt_price: f64,
    /// USDT price vs official buy price, in percent
    pub spread_pct: f64,
    pub result: ArbitrageResult,
    /// Break-even volume in USD, infinite when no volume is profitable
    pub min_volume_usd: f64,
}

/// Everything one refresh cycle produced. Sources that could not be reached
/// show up as `None` / missing rows, never as errors.
#[derive(Debug)]
pub struct ScanReport {
    pub official: Option<FxRate>,
    pub mep: Option<FxRate>,
    pub mep_result: Option<MepResult>,
    /// Per-exchange outcomes, sorted by profit descending
    pub exchanges: Vec<ExchangeOutcome>,
    pub requested: usize,
    pub elapsed_ms: u128,
}

/// Which strategy wins this cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// Sell on MEP; `over_crypto_usd` is the USD edge over the best viable
    /// exchange, if any exchange is viable at all
    Mep { over_crypto_usd: Option<f64> },
    /// Sell USDT on `exchange`; `over_mep_usd` is the edge over MEP when the
    /// MEP path is also viable
    Crypto {
        exchange: String,
        over_mep_usd: Option<f64>,
    },
    /// Nothing is profitable at the configured volume
    Neither,
}

impl ScanReport {
    pub fn best_viable(&self) -> Option<&ExchangeOutcome> {
        self.exchanges.iter().find(|o| o.result.viable)
    }

    pub fn viable_count(&self) -> usize {
        self.exchanges.iter().filter(|o| o.result.viable).count()
    }

    pub fn recommendation(&self) -> Recommendation {
        let mep_viable = self.mep_result.as_ref().filter(|r| r.viable);
        let best_crypto = self.best_viable();

        match (mep_viable, best_crypto) {
            (Some(mep), Some(crypto)) => {
                if mep.profit_usd > crypto.result.profit_usd {
                    Recommendation::Mep {
                        over_crypto_usd: Some(mep.profit_usd - crypto.result.profit_usd),
                    }
                } else {
                    Recommendation::Crypto {
                        exchange: crypto.exchange.clone(),
                        over_mep_usd: Some(crypto.result.profit_usd - mep.profit_usd),
                    }
                }
            }
            (Some(_), None) => Recommendation::Mep { over_crypto_usd: None },
            (None, Some(crypto)) => Recommendation::Crypto {
                exchange: crypto.exchange.clone(),
                over_mep_usd: None,
            },
            (None, None) => Recommendation::Neither,
        }
    }
}

/// Run one full refresh cycle over the selected exchanges.
pub async fn scan(client: &QuoteClient, params: &TradeParams, exchanges: &[String]) -> ScanReport {
    let started = Instant::now();

    let (official, mep) = tokio::join!(client.official_rate(), client.mep_rate());

    let official = match official {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!("official rate unavailable: {e}");
            None
        }
    };
    let mep = match mep {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!("MEP rate unavailable: {e}");
            None
        }
    };

    // Strategy 2: buy at the official venta, sell at the MEP compra
    let mep_result = match (&official, &mep) {
        (Some(official), Some(mep)) => {
            match engine::compute_mep(official.venta, mep.compra, params.volume_usd) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("MEP computation rejected: {e}");
                    None
                }
            }
        }
        _ => None,
    };

    // Strategy 1 needs the official rate; without it there is nothing to buy
    let quotes = match &official {
        Some(_) => fetch_exchange_quotes(client, exchanges).await,
        None => Vec::new(),
    };

    let outcomes = match &official {
        Some(official) => build_outcomes(official.venta, &quotes, params),
        None => Vec::new(),
    };

    ScanReport {
        official,
        mep,
        mep_result,
        exchanges: outcomes,
        requested: exchanges.len(),
        elapsed_ms: started.elapsed().as_millis(),
    }
}

/// Fetch USDT/ARS quotes with bounded parallelism, dropping failed venues.
async fn fetch_exchange_quotes(client: &QuoteClient, exchanges: &[String]) -> Vec<(String, f64)> {
    stream::iter(exchanges.iter().cloned())
        .map(|exchange| async move {
            match client.usdt_ars(&exchange).await {
                Ok(quote) => Some((exchange, quote.total_bid)),
                Err(e) => {
                    debug!(%exchange, "quote unavailable: {e}");
                    None
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_FETCHES)
        .filter_map(|item| async move { item })
        .collect()
        .await
}

/// Evaluate every retrieved quote against the official buy price and rank by
/// profit. Pure over already-fetched data; quotes the engine rejects (zero or
/// negative prices from a glitching venue) are dropped.
pub fn build_outcomes(
    official_buy: f64,
    quotes: &[(String, f64)],
    params: &TradeParams,
) -> Vec<ExchangeOutcome> {
    let mut outcomes: Vec<ExchangeOutcome> = quotes
        .iter()
        .filter_map(|(exchange, usdt_price)| {
            let result =
                match engine::compute(official_buy, *usdt_price, params.volume_usd, &params.fees) {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(%exchange, "dropping quote: {e}");
                        return None;
                    }
                };
            // Same validated inputs, cannot fail past this point
            let min_volume_usd =
                engine::minimum_volume(official_buy, *usdt_price, &params.fees).ok()?;

            Some(ExchangeOutcome {
                exchange: exchange.clone(),
                usdt_price: *usdt_price,
                spread_pct: ((usdt_price - official_buy) / official_buy) * 100.0,
                result,
                min_volume_usd,
            })
        })
        .collect();

    outcomes.sort_by(|a, b| {
        b.result
            .profit_ars
            .partial_cmp(&a.result.profit_ars)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{compute_mep, CommissionProfile};

    fn params() -> TradeParams {
        TradeParams {
            volume_usd: 1000.0,
            fees: CommissionProfile::new(0.01, 1.0).unwrap(),
        }
    }

    fn quotes(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(n, p)| (n.to_string(), *p)).collect()
    }

    #[test]
    fn test_outcomes_ranked_by_profit() {
        let outcomes = build_outcomes(
            1000.0,
            &quotes(&[("slow", 1010.0), ("best", 1090.0), ("mid", 1050.0)]),
            &params(),
        );

        let names: Vec<&str> = outcomes.iter().map(|o| o.exchange.as_str()).collect();
        assert_eq!(names, ["best", "mid", "slow"]);
        assert!(outcomes[0].result.profit_ars > outcomes[1].result.profit_ars);
    }

    #[test]
    fn test_bad_quotes_are_dropped() {
        let outcomes = build_outcomes(
            1000.0,
            &quotes(&[("ok", 1050.0), ("glitch", 0.0), ("negative", -5.0)]),
            &params(),
        );
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].exchange, "ok");
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(build_outcomes(1000.0, &[], &params()).is_empty());
    }

    #[test]
    fn test_spread_and_min_volume() {
        let outcomes = build_outcomes(1000.0, &quotes(&[("x", 1050.0)]), &params());
        let o = &outcomes[0];
        assert!((o.spread_pct - 5.0).abs() < 1e-12);
        assert!(o.min_volume_usd.is_finite());

        // A venue under water has no finite break-even
        let losing = build_outcomes(1000.0, &quotes(&[("y", 990.0)]), &params());
        assert!(losing[0].min_volume_usd.is_infinite());
        assert!(!losing[0].result.viable);
    }

    fn report_with(
        mep_result: Option<MepResult>,
        exchanges: Vec<ExchangeOutcome>,
    ) -> ScanReport {
        ScanReport {
            official: None,
            mep: None,
            mep_result,
            exchanges,
            requested: 0,
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_recommendation_prefers_higher_profit() {
        // MEP: 1000 -> 1080, crypto best: 1090 with fees
        let mep = compute_mep(1000.0, 1080.0, 1000.0).unwrap();
        let outcomes = build_outcomes(1000.0, &quotes(&[("best", 1090.0)]), &params());
        let report = report_with(Some(mep.clone()), outcomes);

        match report.recommendation() {
            Recommendation::Mep { over_crypto_usd: Some(edge) } => {
                assert!(edge > 0.0);
                assert!(mep.profit_usd > report.best_viable().unwrap().result.profit_usd);
            }
            other => panic!("expected MEP recommendation, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendation_crypto_when_mep_missing() {
        let outcomes = build_outcomes(1000.0, &quotes(&[("best", 1090.0)]), &params());
        let report = report_with(None, outcomes);
        assert_eq!(
            report.recommendation(),
            Recommendation::Crypto {
                exchange: "best".into(),
                over_mep_usd: None
            }
        );
    }

    #[test]
    fn test_recommendation_neither() {
        let mep = compute_mep(1000.0, 950.0, 1000.0).unwrap();
        let outcomes = build_outcomes(1000.0, &quotes(&[("under", 990.0)]), &params());
        let report = report_with(Some(mep), outcomes);
        assert_eq!(report.recommendation(), Recommendation::Neither);
    }

    #[test]
    fn test_viable_count() {
        let outcomes = build_outcomes(
            1000.0,
            &quotes(&[("win", 1090.0), ("lose", 990.0)]),
            &params(),
        );
        let report = report_with(None, outcomes);
        assert_eq!(report.viable_count(), 1);
        assert_eq!(report.best_viable().unwrap().exchange, "win");
    }
}
