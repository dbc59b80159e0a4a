// Indicator Kernels - Pure functions over a read-only bar slice
// Deterministic and referentially transparent; short input yields empty/NaN

pub mod atr;
pub mod bollinger;
pub mod ma;
pub mod macd;
pub mod rsi;

pub use atr::{atr, ATR_PERIOD};
pub use bollinger::{bollinger, BollingerBands, BB_PERIOD, BB_STD_DEV};
pub use ma::{ema, ma_set, sma, MaPoint, MA_PERIODS};
pub use macd::{macd, MacdPoint, MACD_FAST, MACD_SIGNAL, MACD_SLOW};
pub use rsi::{rsi, RSI_PERIOD};

use crate::core::types::Bar;
use std::collections::HashMap;

/// All indicator outputs for one bar sequence, computed with the standard
/// parameter set.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub ma: HashMap<usize, Vec<MaPoint>>,
    pub macd: Vec<MacdPoint>,
    pub rsi: Vec<f64>,
    pub bollinger: BollingerBands,
    pub atr: Vec<f64>,
}

/// Run every kernel over the bars.
pub fn compute_all(bars: &[Bar]) -> IndicatorSet {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    IndicatorSet {
        ma: ma_set(bars),
        macd: macd(bars, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
        rsi: rsi(&closes, RSI_PERIOD),
        bollinger: bollinger(&closes, BB_PERIOD, BB_STD_DEV),
        atr: atr(bars, ATR_PERIOD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_all_on_empty_input() {
        let set = compute_all(&[]);
        assert!(set.macd.is_empty());
        assert!(set.rsi.is_empty());
        assert!(set.atr.is_empty());
        assert!(set.bollinger.is_empty());
        assert!(set.ma.values().all(|points| points.is_empty()));
    }

    #[test]
    fn test_compute_all_alignment() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let c = 100.0 + (i % 7) as f64;
                Bar::new(i as i64 * 60, c, c + 1.0, c - 1.0, c)
            })
            .collect();
        let set = compute_all(&bars);

        assert_eq!(set.rsi.len(), bars.len());
        assert_eq!(set.atr.len(), bars.len());
        assert_eq!(set.bollinger.len(), bars.len());
        assert!(set.rsi[RSI_PERIOD - 1].is_nan());
        assert!(!set.rsi[RSI_PERIOD].is_nan());
        assert!(set.atr[ATR_PERIOD - 1].is_nan());
        assert!(!set.atr[ATR_PERIOD].is_nan());
    }
}
