// RSI Reversal - Crossing back through the 30/70 bands

use crate::core::types::SignalKind;
use crate::detectors::{clamp_strength, DetectorContext, Draft};

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;

pub(crate) fn detect(ctx: &DetectorContext<'_>) -> Option<Draft> {
    let rsi = &ctx.indicators.rsi;
    let n = rsi.len();
    if n < 2 {
        return None;
    }

    let prev = rsi[n - 2];
    let last = rsi[n - 1];
    if prev.is_nan() || last.is_nan() {
        return None;
    }

    let oversold_reversal = prev <= OVERSOLD && last > OVERSOLD;
    let overbought_reversal = prev >= OVERBOUGHT && last < OVERBOUGHT;
    if !oversold_reversal && !overbought_reversal {
        return None;
    }

    let price = ctx.bars.last()?.close;
    let (kind, label) = if oversold_reversal {
        (SignalKind::RsiOversoldReversal, "oversold")
    } else {
        (SignalKind::RsiOverboughtReversal, "overbought")
    };

    Some(Draft {
        kind,
        strength: clamp_strength(35.0 + 15.0 * ctx.timeframe.weight()),
        price,
        description: format!("RSI left the {} zone: {:.2} -> {:.2}", label, prev, last),
        key_levels: None,
    })
}
