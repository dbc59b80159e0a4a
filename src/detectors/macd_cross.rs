// MACD Cross - DIF/DEA crossover between the last two defined points

use crate::core::types::SignalKind;
use crate::detectors::{clamp_strength, DetectorContext, Draft};

pub(crate) fn detect(ctx: &DetectorContext<'_>) -> Option<Draft> {
    let macd = &ctx.indicators.macd;
    let n = macd.len();
    if n < 2 {
        return None;
    }

    let prev = &macd[n - 2];
    let last = &macd[n - 1];

    let golden = prev.dif <= prev.dea && last.dif > last.dea;
    let death = prev.dif >= prev.dea && last.dif < last.dea;
    if !golden && !death {
        return None;
    }

    let mut strength = 30.0 + 12.0 * ctx.timeframe.weight();
    // Bonus when DIF hugs the zero axis.
    if last.dif.abs() < last.dif.abs() * 0.1 {
        strength += 10.0;
    }

    let price = ctx.bars.last()?.close;
    let (kind, label) = if golden {
        (SignalKind::MacdGoldenCross, "golden")
    } else {
        (SignalKind::MacdDeathCross, "death")
    };

    Some(Draft {
        kind,
        strength: clamp_strength(strength),
        price,
        description: format!(
            "{} cross: DIF {:.6} vs DEA {:.6}",
            label, last.dif, last.dea
        ),
        key_levels: None,
    })
}
