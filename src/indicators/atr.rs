// ATR - Wilder's Average True Range
// True range over adjacent bar pairs, simple seed, Wilder smoothing

use crate::core::types::Bar;

pub const ATR_PERIOD: usize = 14;

/// ATR aligned to the bar index; NaN where undefined. The first value sits
/// at index `period` (mean of the first `period` true ranges).
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    let true_range = |cur: &Bar, prev: &Bar| -> f64 {
        (cur.high - cur.low)
            .max((cur.high - prev.close).abs())
            .max((cur.low - prev.close).abs())
    };

    let mut seed = 0.0;
    for i in 1..=period {
        seed += true_range(&bars[i], &bars[i - 1]);
    }
    let mut value = seed / period as f64;
    out[period] = value;

    for i in (period + 1)..bars.len() {
        let tr = true_range(&bars[i], &bars[i - 1]);
        value = (value * (period as f64 - 1.0) + tr) / period as f64;
        out[i] = value;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atr_seed_and_smoothing() {
        let bars = vec![
            Bar::new(0, 9.0, 10.0, 8.0, 9.0),
            Bar::new(60, 10.0, 11.0, 9.0, 10.0),  // TR = 2
            Bar::new(120, 11.0, 12.0, 10.0, 11.0), // TR = 2
            Bar::new(180, 12.0, 14.0, 10.0, 12.0), // TR = 4
        ];
        let out = atr(&bars, 2);

        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!((out[2] - 2.0).abs() < 1e-12, "seed = mean of first 2 TRs");
        assert!((out[3] - 3.0).abs() < 1e-12, "(2*1 + 4) / 2");
    }

    #[test]
    fn test_atr_gap_uses_prev_close() {
        // Gap up: the high-to-prev-close leg dominates the bar range.
        let bars = vec![
            Bar::new(0, 10.0, 10.0, 10.0, 10.0),
            Bar::new(60, 20.0, 21.0, 20.0, 20.5), // TR = max(1, 11, 10) = 11
            Bar::new(120, 20.5, 21.0, 20.0, 20.5),
        ];
        let out = atr(&bars, 2);
        // seed = (11 + 1) / 2
        assert!((out[2] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_atr_short_input() {
        let bars = vec![Bar::new(0, 1.0, 1.0, 1.0, 1.0); 14];
        let out = atr(&bars, 14);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
