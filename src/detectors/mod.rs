// Signal Detectors - Independent checks over bars plus indicator outputs
// Every emission is gated on the shared deduper

pub mod bollinger_breakout;
pub mod key_level;
pub mod large_body;
pub mod macd_cross;
pub mod rsi_reversal;
pub mod volatility_surge;

use crate::chanlun::{ChanlunResult, ThirdBuyStatus};
use crate::core::dedup::SignalDeduper;
use crate::core::types::{Bar, KeyLevels, Market, Signal, SignalKind, Timeframe};
use crate::indicators::IndicatorSet;
use tracing::debug;

/// Read-only inputs shared by every detector.
pub struct DetectorContext<'a> {
    pub bars: &'a [Bar],
    pub indicators: &'a IndicatorSet,
    pub symbol: &'a str,
    pub market: Market,
    pub timeframe: Timeframe,
}

/// A detector hit before dedup gating and id assignment.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub kind: SignalKind,
    pub strength: f64,
    pub price: f64,
    pub description: String,
    pub key_levels: Option<KeyLevels>,
}

pub(crate) fn clamp_strength(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Run every detector plus the third-buy conversion, dedup-gate the hits,
/// and stamp them into full signals at `now_ms`.
pub fn run_all(
    ctx: &DetectorContext<'_>,
    chanlun: &ChanlunResult,
    deduper: &SignalDeduper,
    now_ms: i64,
) -> Vec<Signal> {
    let mut drafts: Vec<Draft> = Vec::new();

    drafts.extend(bollinger_breakout::detect(ctx));
    drafts.extend(macd_cross::detect(ctx));
    drafts.extend(rsi_reversal::detect(ctx));
    drafts.extend(volatility_surge::detect(ctx));
    drafts.extend(large_body::detect(ctx));
    drafts.extend(key_level::detect(ctx));
    drafts.extend(convert_third_buys(chanlun));

    let mut signals = Vec::new();
    for draft in drafts {
        if !deduper.should_emit(ctx.symbol, ctx.timeframe, draft.kind, now_ms) {
            debug!(symbol = %ctx.symbol, kind = %draft.kind, "Signal suppressed by dedup window");
            continue;
        }

        let mut signal = Signal::new(
            ctx.symbol.to_string(),
            ctx.market,
            ctx.timeframe,
            draft.kind,
            draft.strength,
            draft.price,
            now_ms,
            draft.description,
        );
        if let Some(levels) = draft.key_levels {
            signal = signal.with_key_levels(levels);
        }
        signals.push(signal);
    }

    signals
}

/// Third-buy records become signals: 85 for confirmed, 55 for candidates,
/// with the zhongshu levels attached.
pub(crate) fn convert_third_buys(chanlun: &ChanlunResult) -> Vec<Draft> {
    let mut out = Vec::new();

    for tb in &chanlun.third_buys {
        let zhongshu = match chanlun.zhongshus.get(tb.zhongshu_id) {
            Some(z) => z,
            None => continue,
        };

        let (kind, strength, price) = match tb.status {
            ThirdBuyStatus::Confirmed => (
                SignalKind::ThirdBuyConfirmed,
                85.0,
                tb.confirm_price.unwrap_or(tb.breakout_price),
            ),
            ThirdBuyStatus::Candidate => (SignalKind::ThirdBuyCandidate, 55.0, tb.breakout_price),
        };

        let description = match tb.status {
            ThirdBuyStatus::Confirmed => format!(
                "third buy confirmed above zhongshu [{:.4}, {:.4}]",
                zhongshu.low, zhongshu.high
            ),
            ThirdBuyStatus::Candidate => format!(
                "third buy candidate above zhongshu [{:.4}, {:.4}]",
                zhongshu.low, zhongshu.high
            ),
        };

        out.push(Draft {
            kind,
            strength,
            price,
            description,
            key_levels: Some(KeyLevels {
                zhongshu_high: zhongshu.high,
                zhongshu_low: zhongshu.low,
                pullback_low: tb.pullback_low,
                confirm_price: tb.confirm_price,
            }),
        });
    }

    out
}
