// Large Body Candle - Last body dwarfing the recent average body

use crate::core::types::SignalKind;
use crate::detectors::{clamp_strength, DetectorContext, Draft};

const WINDOW: usize = 20;
const BODY_MULTIPLE: f64 = 2.5;

pub(crate) fn detect(ctx: &DetectorContext<'_>) -> Option<Draft> {
    let n = ctx.bars.len();
    if n == 0 {
        return None;
    }

    let window = &ctx.bars[n.saturating_sub(WINDOW)..];
    let mean_body = window.iter().map(|b| b.body()).sum::<f64>() / window.len() as f64;
    if mean_body <= 0.0 {
        return None;
    }

    let last = &ctx.bars[n - 1];
    if last.body() <= BODY_MULTIPLE * mean_body {
        return None;
    }

    Some(Draft {
        kind: SignalKind::LargeBodyCandle,
        strength: clamp_strength(20.0 + 10.0 * ctx.timeframe.weight()),
        price: last.close,
        description: format!(
            "body {:.4} is {:.1}x the recent average",
            last.body(),
            last.body() / mean_body
        ),
        key_levels: None,
    })
}
