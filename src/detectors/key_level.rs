// Key Level Breakout - Close clearing the recent high for the first time

use crate::core::types::SignalKind;
use crate::detectors::{clamp_strength, DetectorContext, Draft};

const MAX_LOOKBACK: usize = 20;

pub(crate) fn detect(ctx: &DetectorContext<'_>) -> Option<Draft> {
    let n = ctx.bars.len();
    if n < 2 {
        return None;
    }

    // Highest high over the lookback window, current bar excluded.
    let lookback = MAX_LOOKBACK.min(n - 1);
    let prev_high = ctx.bars[n - 1 - lookback..n - 1]
        .iter()
        .map(|b| b.high)
        .fold(f64::MIN, f64::max);

    let prev_close = ctx.bars[n - 2].close;
    let last_close = ctx.bars[n - 1].close;
    if !(prev_close <= prev_high && last_close > prev_high) {
        return None;
    }

    Some(Draft {
        kind: SignalKind::KeyLevelBreakout,
        strength: clamp_strength(45.0 + 15.0 * ctx.timeframe.weight()),
        price: last_close,
        description: format!(
            "close {:.4} broke the {}-bar high {:.4}",
            last_close, lookback, prev_high
        ),
        key_levels: None,
    })
}
