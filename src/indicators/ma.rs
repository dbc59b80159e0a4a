// Moving Averages - SMA, EMA, and the standard MA period set
// Outputs are index-aligned with the input; undefined positions are NaN

use crate::core::types::Bar;
use serde::Serialize;
use std::collections::HashMap;

/// SMA periods computed for the chart overlay set.
pub const MA_PERIODS: [usize; 7] = [5, 10, 20, 30, 60, 120, 250];

/// One defined moving-average point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaPoint {
    pub time: i64,
    pub value: f64,
}

/// Simple moving average over a trailing window of `period` values.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = sum / period as f64;
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = sum / period as f64;
    }

    out
}

/// Exponential moving average seeded with the SMA of the first `period`
/// values, then `EMA[i] = v[i]*k + EMA[i-1]*(1-k)` with `k = 2/(period+1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = seed;

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in period..values.len() {
        prev = values[i] * k + prev * (1.0 - k);
        out[i] = prev;
    }

    out
}

/// SMA of closes for each period in [`MA_PERIODS`], keeping only the
/// positions with a defined value.
pub fn ma_set(bars: &[Bar]) -> HashMap<usize, Vec<MaPoint>> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut out = HashMap::new();

    for &period in &MA_PERIODS {
        let series = sma(&closes, period);
        let points: Vec<MaPoint> = series
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, &value)| MaPoint {
                time: bars[i].time_s,
                value,
            })
            .collect();
        out.insert(period, points);
    }

    out
}
