// Core Type Definitions for the Chan Watch monitor
// Input/output DTOs shared by every analytical stage

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Enums
// ============================================================================

/// Supported chart timeframes. Serialized with the literal interval tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    Day1,
    #[serde(rename = "4H")]
    Hour4,
    #[serde(rename = "1H")]
    Hour1,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "5m")]
    Minute5,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day1 => "1D",
            Timeframe::Hour4 => "4H",
            Timeframe::Hour1 => "1H",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute5 => "5m",
        }
    }

    /// Strength weight applied by the signal detectors.
    pub fn weight(&self) -> f64 {
        match self {
            Timeframe::Day1 => 3.0,
            Timeframe::Hour4 => 2.0,
            Timeframe::Hour1 => 1.5,
            Timeframe::Minute15 => 1.0,
            Timeframe::Minute5 => 0.7,
        }
    }

    pub fn all() -> Vec<Timeframe> {
        vec![
            Timeframe::Day1,
            Timeframe::Hour4,
            Timeframe::Hour1,
            Timeframe::Minute15,
            Timeframe::Minute5,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1D" => Ok(Timeframe::Day1),
            "4H" => Ok(Timeframe::Hour4),
            "1H" => Ok(Timeframe::Hour1),
            "15m" => Ok(Timeframe::Minute15),
            "5m" => Ok(Timeframe::Minute5),
            _ => Err(format!("Invalid timeframe: '{}'", s)),
        }
    }
}

/// Market segment a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Fx,
    Cn,
    Hk,
    Us,
    Crypto,
    Commodities,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Fx => "fx",
            Market::Cn => "cn",
            Market::Hk => "hk",
            Market::Us => "us",
            Market::Crypto => "crypto",
            Market::Commodities => "commodities",
        }
    }

    pub fn all() -> Vec<Market> {
        vec![
            Market::Fx,
            Market::Cn,
            Market::Hk,
            Market::Us,
            Market::Crypto,
            Market::Commodities,
        ]
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fx" => Ok(Market::Fx),
            "cn" => Ok(Market::Cn),
            "hk" => Ok(Market::Hk),
            "us" => Ok(Market::Us),
            "crypto" => Ok(Market::Crypto),
            "commodities" => Ok(Market::Commodities),
            _ => Err(format!("Invalid market: '{}'", s)),
        }
    }
}

// ============================================================================
// Bar
// ============================================================================

/// One OHLC bar. `time_s` is seconds since epoch; bars arrive oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time_s: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(time_s: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time_s,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Absolute size of the candle body.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Checks finiteness and the OHLC ordering invariant.
    pub fn is_well_formed(&self) -> bool {
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.map_or(true, f64::is_finite);

        finite
            && self.low <= self.open.min(self.close)
            && self.open.max(self.close) <= self.high
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bar(t={}, O={:.4}, H={:.4}, L={:.4}, C={:.4})",
            self.time_s, self.open, self.high, self.low, self.close
        )
    }
}

// ============================================================================
// Quote
// ============================================================================

/// Latest traded price for a symbol, supplied by a market-data adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub time_ms: i64,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quote(symbol={}, price={:.4})", self.symbol, self.price)
    }
}

// ============================================================================
// Signal
// ============================================================================

/// Closed set of signal kinds the detectors can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    BollingerBreakoutUp,
    BollingerBreakoutDown,
    MacdGoldenCross,
    MacdDeathCross,
    RsiOversoldReversal,
    RsiOverboughtReversal,
    VolatilitySurge,
    LargeBodyCandle,
    KeyLevelBreakout,
    MultiTimeframeResonance,
    ThirdBuyCandidate,
    ThirdBuyConfirmed,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::BollingerBreakoutUp => "bollinger_breakout_up",
            SignalKind::BollingerBreakoutDown => "bollinger_breakout_down",
            SignalKind::MacdGoldenCross => "macd_golden_cross",
            SignalKind::MacdDeathCross => "macd_death_cross",
            SignalKind::RsiOversoldReversal => "rsi_oversold_reversal",
            SignalKind::RsiOverboughtReversal => "rsi_overbought_reversal",
            SignalKind::VolatilitySurge => "volatility_surge",
            SignalKind::LargeBodyCandle => "large_body_candle",
            SignalKind::KeyLevelBreakout => "key_level_breakout",
            SignalKind::MultiTimeframeResonance => "multi_timeframe_resonance",
            SignalKind::ThirdBuyCandidate => "third_buy_candidate",
            SignalKind::ThirdBuyConfirmed => "third_buy_confirmed",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural price levels attached to third-buy signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    pub zhongshu_high: f64,
    pub zhongshu_low: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pullback_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_price: Option<f64>,
}

/// One emitted trading signal. `time` is wall-clock milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub symbol: String,
    pub market: Market,
    pub timeframe: Timeframe,
    pub kind: SignalKind,
    pub strength: f64,
    pub price: f64,
    pub time: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_levels: Option<KeyLevels>,
    pub acknowledged: bool,
}

impl Signal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: String,
        market: Market,
        timeframe: Timeframe,
        kind: SignalKind,
        strength: f64,
        price: f64,
        time: i64,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            symbol,
            market,
            timeframe,
            kind,
            strength,
            price,
            time,
            description,
            key_levels: None,
            acknowledged: false,
        }
    }

    pub fn with_key_levels(mut self, levels: KeyLevels) -> Self {
        self.key_levels = Some(levels);
        self
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signal(kind={}, symbol={}, tf={}, strength={:.0}, price={:.4})",
            self.kind, self.symbol, self.timeframe, self.strength, self.price
        )
    }
}
