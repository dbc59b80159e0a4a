// MACD - DIF/DEA/histogram over closes
// DEA is the signal EMA over the compacted valid-DIF series

use crate::core::types::Bar;
use crate::indicators::ma::ema;
use serde::Serialize;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// One fully defined MACD point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdPoint {
    pub time: i64,
    pub dif: f64,
    pub dea: f64,
    pub histogram: f64,
}

/// MACD restricted to positions where DIF, DEA and histogram are all
/// defined. Returns empty when `bars.len() < slow + signal`.
pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal: usize) -> Vec<MacdPoint> {
    if bars.len() < slow + signal {
        return Vec::new();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema(&closes, fast);
    let ema_slow = ema(&closes, slow);

    // DIF exists where both EMAs do, i.e. from index slow-1 on.
    let mut dif_times = Vec::with_capacity(bars.len() - (slow - 1));
    let mut dif_values = Vec::with_capacity(bars.len() - (slow - 1));
    for i in (slow - 1)..bars.len() {
        dif_times.push(bars[i].time_s);
        dif_values.push(ema_fast[i] - ema_slow[i]);
    }

    let dea_values = ema(&dif_values, signal);

    let mut out = Vec::new();
    for (j, dea) in dea_values.iter().enumerate() {
        if dea.is_nan() {
            continue;
        }
        let dif = dif_values[j];
        out.push(MacdPoint {
            time: dif_times[j],
            dif,
            dea: *dea,
            histogram: (dif - *dea) * 2.0,
        });
    }

    out
}
