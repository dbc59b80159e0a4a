// RSI - Wilder's Relative Strength Index
// First value from simple averages, Wilder smoothing afterwards

pub const RSI_PERIOD: usize = 14;

/// RSI over closes, aligned to the input index; NaN where undefined. The
/// first value sits at index `period`. When the average loss is zero the
/// RSI saturates at 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let diff = closes[i] - closes[i - 1];
        if diff > 0.0 {
            avg_gain += diff;
        } else {
            avg_loss += -diff;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..closes.len() {
        let diff = closes[i] - closes[i - 1];
        let (gain, loss) = if diff > 0.0 { (diff, 0.0) } else { (0.0, -diff) };

        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_alignment_and_padding() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let out = rsi(&closes, 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(!out[3].is_nan());
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let out = rsi(&closes, 3);
        assert_eq!(out[3], 100.0);
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // diffs: +1, +1, +1, -1, +1 with period 3
        let closes = [1.0, 2.0, 3.0, 4.0, 3.0, 4.0];
        let out = rsi(&closes, 3);

        // index 3: simple averages -> gain 1, loss 0 -> 100
        assert_eq!(out[3], 100.0);

        // index 4: gain (1*2+0)/3 = 2/3, loss (0*2+1)/3 = 1/3 -> RS=2
        assert!((out[4] - (100.0 - 100.0 / 3.0)).abs() < 1e-9);

        // index 5: gain (2/3*2+1)/3 = 7/9, loss (1/3*2+0)/3 = 2/9 -> RS=3.5
        assert!((out[5] - (100.0 - 100.0 / 4.5)).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_short_input() {
        let out = rsi(&[1.0, 2.0, 3.0], 14);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
