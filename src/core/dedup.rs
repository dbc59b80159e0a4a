// Signal Deduper - Cooldown window per (symbol, timeframe, kind)
// Shared by every detector; lives for the whole process

use crate::core::types::{SignalKind, Timeframe};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Default cooldown between two emissions of the same signal key.
pub const DEFAULT_DEDUP_WINDOW_MS: i64 = 5 * 60 * 1000;

type DedupKey = (String, Timeframe, SignalKind);

#[derive(Debug, Default)]
struct DeduperState {
    last_emit: HashMap<DedupKey, i64>,
    emitted: u64,
    suppressed: u64,
}

/// Keyed wall-clock cooldown cache. The key space is bounded by
/// symbol x timeframe x kind, so no eviction is needed.
pub struct SignalDeduper {
    window_ms: i64,
    state: Mutex<DeduperState>,
}

impl SignalDeduper {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            state: Mutex::new(DeduperState::default()),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// True iff the key has never fired or its cooldown has elapsed.
    /// A true result records the emission under the same lock.
    pub fn should_emit(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        kind: SignalKind,
        now_ms: i64,
    ) -> bool {
        let mut state = self.state.lock();
        let key = (symbol.to_string(), timeframe, kind);

        if let Some(&last) = state.last_emit.get(&key) {
            if now_ms - last < self.window_ms {
                state.suppressed += 1;
                return false;
            }
        }

        state.last_emit.insert(key, now_ms);
        state.emitted += 1;
        true
    }

    pub fn get_stats(&self) -> DeduperStats {
        let state = self.state.lock();
        DeduperStats {
            tracked_keys: state.last_emit.len(),
            emitted: state.emitted,
            suppressed: state.suppressed,
        }
    }
}

impl Default for SignalDeduper {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW_MS)
    }
}

/// Snapshot of deduper statistics.
#[derive(Debug, Clone)]
pub struct DeduperStats {
    pub tracked_keys: usize,
    pub emitted: u64,
    pub suppressed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_emission_allowed() {
        let deduper = SignalDeduper::default();
        assert!(deduper.should_emit("BTCUSDT", Timeframe::Hour1, SignalKind::MacdGoldenCross, 0));
    }

    #[test]
    fn test_within_window_suppressed() {
        let deduper = SignalDeduper::default();
        assert!(deduper.should_emit("BTCUSDT", Timeframe::Hour1, SignalKind::MacdGoldenCross, 0));
        assert!(!deduper.should_emit(
            "BTCUSDT",
            Timeframe::Hour1,
            SignalKind::MacdGoldenCross,
            60_000
        ));
        assert!(!deduper.should_emit(
            "BTCUSDT",
            Timeframe::Hour1,
            SignalKind::MacdGoldenCross,
            299_999
        ));
    }

    #[test]
    fn test_window_boundary_allows() {
        let deduper = SignalDeduper::default();
        assert!(deduper.should_emit("BTCUSDT", Timeframe::Hour1, SignalKind::MacdGoldenCross, 0));
        assert!(deduper.should_emit(
            "BTCUSDT",
            Timeframe::Hour1,
            SignalKind::MacdGoldenCross,
            300_000
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let deduper = SignalDeduper::default();
        assert!(deduper.should_emit("BTCUSDT", Timeframe::Hour1, SignalKind::MacdGoldenCross, 0));
        assert!(deduper.should_emit("BTCUSDT", Timeframe::Hour1, SignalKind::MacdDeathCross, 0));
        assert!(deduper.should_emit("BTCUSDT", Timeframe::Hour4, SignalKind::MacdGoldenCross, 0));
        assert!(deduper.should_emit("ETHUSDT", Timeframe::Hour1, SignalKind::MacdGoldenCross, 0));
    }

    #[test]
    fn test_emission_refreshes_window() {
        let deduper = SignalDeduper::new(1_000);
        assert!(deduper.should_emit("X", Timeframe::Minute5, SignalKind::VolatilitySurge, 0));
        assert!(deduper.should_emit("X", Timeframe::Minute5, SignalKind::VolatilitySurge, 1_000));
        // The second emission restarted the cooldown.
        assert!(!deduper.should_emit("X", Timeframe::Minute5, SignalKind::VolatilitySurge, 1_500));
    }

    #[test]
    fn test_stats() {
        let deduper = SignalDeduper::new(1_000);
        deduper.should_emit("X", Timeframe::Minute5, SignalKind::VolatilitySurge, 0);
        deduper.should_emit("X", Timeframe::Minute5, SignalKind::VolatilitySurge, 10);
        let stats = deduper.get_stats();
        assert_eq!(stats.tracked_keys, 1);
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.suppressed, 1);
    }
}
