// Volatility Surge - ATR expanding sharply against its level five bars ago

use crate::core::types::SignalKind;
use crate::detectors::{clamp_strength, DetectorContext, Draft};

const MIN_BARS: usize = 20;
const SURGE_THRESHOLD: f64 = 0.3;

pub(crate) fn detect(ctx: &DetectorContext<'_>) -> Option<Draft> {
    let n = ctx.bars.len();
    if n < MIN_BARS {
        return None;
    }

    let atr = &ctx.indicators.atr;
    if atr.len() < n || n < 6 {
        return None;
    }

    let last = atr[n - 1];
    let reference = atr[n - 6];
    if last.is_nan() || reference.is_nan() || reference <= 0.0 {
        return None;
    }

    let delta = (last - reference) / reference;
    if delta <= SURGE_THRESHOLD {
        return None;
    }

    let price = ctx.bars.last()?.close;
    Some(Draft {
        kind: SignalKind::VolatilitySurge,
        strength: clamp_strength(25.0 + 50.0 * delta),
        price,
        description: format!("ATR expanded {:.1}% in 5 bars", delta * 100.0),
        key_levels: None,
    })
}
