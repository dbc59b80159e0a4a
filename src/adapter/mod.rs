// Market-Data Adapter Contract - Capability trait plus process-wide registry
// Adapters live outside the core; only their in-memory contract is defined

use crate::core::types::{Bar, Market, Quote, Timeframe};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::info;

/// Minimum bar count a successful kline fetch must return.
pub const MIN_KLINE_BARS: usize = 5;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("insufficient data: got {got} bars, need {need}")]
    InsufficientData { got: usize, need: usize },
    #[error("unsupported market: {0}")]
    UnsupportedMarket(Market),
}

// ============================================================================
// Capability Trait
// ============================================================================

pub type QuoteCallback = Arc<dyn Fn(Quote) + Send + Sync>;

/// Capability set of one market-data source. `get_klines` returns bars
/// oldest first; the newest bar may still be forming. Streaming quotes are
/// optional.
pub trait MarketDataAdapter: Send + Sync {
    fn get_klines(
        &self,
        symbol: &str,
        market: Market,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, AdapterError>;

    fn get_quote(&self, symbol: &str, market: Market) -> Result<Quote, AdapterError>;

    fn subscribe_quote(
        &self,
        _symbol: &str,
        _market: Market,
        _callback: QuoteCallback,
    ) -> Option<QuoteSubscription> {
        None
    }
}

/// RAII handle for a streaming quote subscription; dropping it cancels the
/// upstream stream.
pub struct QuoteSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl QuoteSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for QuoteSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

// ============================================================================
// Adapter Registry
// ============================================================================

/// Process-wide map of market segment to adapter.
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<Market, Arc<dyn MarketDataAdapter>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, market: Market, adapter: Arc<dyn MarketDataAdapter>) {
        self.adapters.write().insert(market, adapter);
        info!(market = %market, "Market data adapter registered");
    }

    pub fn get(&self, market: Market) -> Result<Arc<dyn MarketDataAdapter>, AdapterError> {
        self.adapters
            .read()
            .get(&market)
            .cloned()
            .ok_or(AdapterError::UnsupportedMarket(market))
    }

    pub fn registered_markets(&self) -> Vec<Market> {
        self.adapters.read().keys().copied().collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: OnceLock<Arc<AdapterRegistry>> = OnceLock::new();

/// Get the global adapter registry (singleton).
pub fn get_adapter_registry() -> Arc<AdapterRegistry> {
    Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(AdapterRegistry::new())))
}
