// Chan Watch - Analytical core of a multi-market live monitor
// Bars in, structural read (Chanlun) plus deduplicated signals out

// Foundational types, config, logging, signal services
pub mod core;

// Pure indicator kernels
pub mod indicators;

// Chanlun structural pipeline
pub mod chanlun;

// Indicator-driven signal detectors
pub mod detectors;

// Orchestrator tying one run together
pub mod analyzer;

// Market-data collaborator contract
pub mod adapter;

// Re-export the main entry points
pub use crate::analyzer::{AnalysisReport, Analyzer, AnalyzerError, CancelToken};
pub use crate::core::{
    Bar, ChanlunParams, ConfirmRule, Market, MonitorConfig, Signal, SignalDeduper, SignalKind,
    SignalStore, Timeframe,
};
