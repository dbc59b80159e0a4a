// Analysis Orchestrator - One run: indicators, Chanlun, detectors, store
// Stateless between runs apart from the shared deduper and store

use crate::chanlun::{self, ChanlunResult};
use crate::core::config::{ConfigError, MonitorConfig};
use crate::core::dedup::SignalDeduper;
use crate::core::store::SignalStore;
use crate::core::types::{Bar, Market, Signal, Timeframe};
use crate::detectors::{self, DetectorContext};
use crate::indicators;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: String },
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation flag, checked between pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Report
// ============================================================================

/// Outcome of one successful run: the structural read plus the signals that
/// survived dedup gating (already posted to the store).
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub symbol: String,
    pub market: Market,
    pub timeframe: Timeframe,
    pub chanlun: ChanlunResult,
    pub signals: Vec<Signal>,
}

// ============================================================================
// Analyzer
// ============================================================================

/// Orchestrates the full pipeline for one `(bars, symbol, market,
/// timeframe)` input. Safe to share across threads; concurrent runs contend
/// only on the deduper and the store.
pub struct Analyzer {
    config: MonitorConfig,
    deduper: Arc<SignalDeduper>,
    store: SignalStore,
}

impl Analyzer {
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let deduper = Arc::new(SignalDeduper::new(config.dedup_window_ms));
        let store = SignalStore::new(
            config.store_capacity,
            config.toast_capacity,
            config.toast_lifetime_ms,
        );

        info!(
            store_capacity = config.store_capacity,
            dedup_window_ms = config.dedup_window_ms,
            "Analyzer initialized"
        );
        Ok(Self {
            config,
            deduper,
            store,
        })
    }

    pub fn store(&self) -> &SignalStore {
        &self.store
    }

    pub fn deduper(&self) -> &SignalDeduper {
        &self.deduper
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run against the wall clock.
    pub fn run(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
    ) -> Result<AnalysisReport, AnalyzerError> {
        self.run_at(bars, symbol, market, timeframe, wall_clock_ms())
    }

    /// Run with an injected wall-clock reading; signal timestamps and the
    /// dedup window both use it.
    pub fn run_at(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        now_ms: i64,
    ) -> Result<AnalysisReport, AnalyzerError> {
        let report = self.run_stages(bars, symbol, market, timeframe, now_ms, None)?;
        Ok(report.expect("uncancellable run always completes"))
    }

    /// Like [`run_at`](Self::run_at) but checks the token between stages.
    /// A cancelled run returns `Ok(None)` and leaves the deduper and store
    /// untouched.
    pub fn run_with_cancel(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        now_ms: i64,
        cancel: &CancelToken,
    ) -> Result<Option<AnalysisReport>, AnalyzerError> {
        self.run_stages(bars, symbol, market, timeframe, now_ms, Some(cancel))
    }

    fn run_stages(
        &self,
        bars: &[Bar],
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        now_ms: i64,
        cancel: Option<&CancelToken>,
    ) -> Result<Option<AnalysisReport>, AnalyzerError> {
        validate_bars(bars)?;

        let is_cancelled = || cancel.map_or(false, CancelToken::is_cancelled);
        if is_cancelled() {
            return Ok(None);
        }

        let indicator_set = indicators::compute_all(bars);
        if is_cancelled() {
            return Ok(None);
        }

        let params = self.config.chanlun_params(market);
        let chanlun = chanlun::analyze(bars, &indicator_set.atr, &params, symbol, market, timeframe);
        if is_cancelled() {
            return Ok(None);
        }

        let ctx = DetectorContext {
            bars,
            indicators: &indicator_set,
            symbol,
            market,
            timeframe,
        };
        let signals = detectors::run_all(&ctx, &chanlun, &self.deduper, now_ms);
        if is_cancelled() {
            return Ok(None);
        }

        if !signals.is_empty() {
            self.store.add_batch(signals.clone());
        }

        debug!(
            symbol = %symbol,
            market = %market,
            timeframe = %timeframe,
            bars = bars.len(),
            signals = signals.len(),
            "Analysis run complete"
        );

        Ok(Some(AnalysisReport {
            symbol: symbol.to_string(),
            market,
            timeframe,
            chanlun,
            signals,
        }))
    }
}

fn wall_clock_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn validate_bars(bars: &[Bar]) -> Result<(), AnalyzerError> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_well_formed() {
            return Err(AnalyzerError::MalformedBar {
                index,
                reason: "non-finite value or violated OHLC ordering".to_string(),
            });
        }
        if index > 0 && bar.time_s <= bars[index - 1].time_s {
            return Err(AnalyzerError::MalformedBar {
                index,
                reason: format!(
                    "time {} does not ascend past {}",
                    bar.time_s,
                    bars[index - 1].time_s
                ),
            });
        }
    }
    Ok(())
}
