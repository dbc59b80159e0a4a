// Bollinger Breakout - Close crossing a band between the last two bars

use crate::core::types::SignalKind;
use crate::detectors::{clamp_strength, DetectorContext, Draft};

pub(crate) fn detect(ctx: &DetectorContext<'_>) -> Option<Draft> {
    let bands = &ctx.indicators.bollinger;
    let n = ctx.bars.len();
    if n < 2 || bands.len() < n {
        return None;
    }

    let prev_close = ctx.bars[n - 2].close;
    let last_close = ctx.bars[n - 1].close;
    let strength = clamp_strength(40.0 + 15.0 * ctx.timeframe.weight());

    let prev_upper = bands.upper[n - 2];
    let last_upper = bands.upper[n - 1];
    if !prev_upper.is_nan() && !last_upper.is_nan() && prev_close <= prev_upper && last_close > last_upper {
        return Some(Draft {
            kind: SignalKind::BollingerBreakoutUp,
            strength,
            price: last_close,
            description: format!(
                "close {:.4} pushed above the upper band {:.4}",
                last_close, last_upper
            ),
            key_levels: None,
        });
    }

    let prev_lower = bands.lower[n - 2];
    let last_lower = bands.lower[n - 1];
    if !prev_lower.is_nan() && !last_lower.is_nan() && prev_close >= prev_lower && last_close < last_lower {
        return Some(Draft {
            kind: SignalKind::BollingerBreakoutDown,
            strength,
            price: last_close,
            description: format!(
                "close {:.4} fell below the lower band {:.4}",
                last_close, last_lower
            ),
            key_levels: None,
        });
    }

    None
}
