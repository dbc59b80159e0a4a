// Bollinger Bands - SMA middle band with population-stddev envelopes

use crate::indicators::ma::sma;

pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;

/// Index-aligned band series; NaN where the window is not yet full.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

/// Bollinger bands over closes. The deviation uses the population formula
/// (divide by `period`, not `period - 1`).
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(closes, period);
    let mut upper = vec![f64::NAN; closes.len()];
    let mut lower = vec![f64::NAN; closes.len()];

    if period == 0 || closes.len() < period {
        return BollingerBands { middle, upper, lower };
    }

    for i in (period - 1)..closes.len() {
        let window = &closes[i + 1 - period..=i];
        let mean = middle[i];
        let variance =
            window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let dev = variance.sqrt() * std_dev;
        upper[i] = mean + dev;
        lower[i] = mean - dev;
    }

    BollingerBands { middle, upper, lower }
}
