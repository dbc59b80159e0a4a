// Chanlun Pipeline - Five sequential structural passes over one bar series
// containment -> fractals -> bis -> zhongshus -> third-buys

pub mod bi;
pub mod containment;
pub mod fractal;
pub mod third_buy;
pub mod zhongshu;

pub use bi::{Bi, BiDirection};
pub use containment::ProcessedBar;
pub use fractal::{Fractal, FractalKind};
pub use third_buy::{ThirdBuy, ThirdBuyStatus};
pub use zhongshu::Zhongshu;

use crate::core::config::ChanlunParams;
use crate::core::types::{Bar, Market, Timeframe};
use serde::Serialize;
use tracing::debug;

/// Output of every stage for one run. Each stage tolerates short input by
/// producing an empty output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanlunResult {
    pub processed: Vec<ProcessedBar>,
    pub fractals: Vec<Fractal>,
    pub bis: Vec<Bi>,
    pub zhongshus: Vec<Zhongshu>,
    pub third_buys: Vec<ThirdBuy>,
}

/// Run the full pipeline. `atr` is the raw-bar ATR series used by the
/// bi-move and third-buy thresholds.
pub fn analyze(
    bars: &[Bar],
    atr: &[f64],
    params: &ChanlunParams,
    symbol: &str,
    market: Market,
    timeframe: Timeframe,
) -> ChanlunResult {
    let processed = containment::reduce(bars);
    let fractals = fractal::detect(&processed);
    let bis = bi::build(&fractals, atr, params);
    let zhongshus = zhongshu::detect(&bis);
    let third_buys = third_buy::detect(&zhongshus, &bis, atr, params, symbol, market, timeframe);

    debug!(
        symbol = %symbol,
        bars = bars.len(),
        processed = processed.len(),
        fractals = fractals.len(),
        bis = bis.len(),
        zhongshus = zhongshus.len(),
        third_buys = third_buys.len(),
        "Chanlun pipeline complete"
    );

    ChanlunResult {
        processed,
        fractals,
        bis,
        zhongshus,
        third_buys,
    }
}
