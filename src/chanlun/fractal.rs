// Fractal Detection - Local extrema over the containment-reduced bars

use crate::chanlun::containment::ProcessedBar;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    Top,
    Bottom,
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FractalKind::Top => write!(f, "top"),
            FractalKind::Bottom => write!(f, "bottom"),
        }
    }
}

/// Local extremum at `index` within the processed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fractal {
    pub index: usize,
    pub time: i64,
    pub price: f64,
    pub kind: FractalKind,
}

/// Interior bars strictly above both neighbors on highs are tops, strictly
/// below on lows are bottoms. Containment reduction guarantees a bar cannot
/// be both.
pub fn detect(processed: &[ProcessedBar]) -> Vec<Fractal> {
    let mut out = Vec::new();
    if processed.len() < 3 {
        return out;
    }

    for i in 1..processed.len() - 1 {
        let (left, mid, right) = (&processed[i - 1], &processed[i], &processed[i + 1]);

        if mid.high > left.high && mid.high > right.high {
            out.push(Fractal {
                index: i,
                time: mid.time,
                price: mid.high,
                kind: FractalKind::Top,
            });
        } else if mid.low < left.low && mid.low < right.low {
            out.push(Fractal {
                index: i,
                time: mid.time,
                price: mid.low,
                kind: FractalKind::Bottom,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(values: &[f64]) -> Vec<ProcessedBar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ProcessedBar {
                orig_index: i,
                time: i as i64 * 60,
                high: v,
                low: v,
                close: v,
            })
            .collect()
    }

    #[test]
    fn test_simple_top_and_bottom() {
        // Flat-bar ridge: top at index 2, bottom at index 5.
        let bars = processed(&[100.0, 101.0, 102.0, 101.0, 100.0, 99.0, 100.0]);
        let fractals = detect(&bars);

        assert_eq!(fractals.len(), 2);
        assert_eq!(fractals[0].index, 2);
        assert_eq!(fractals[0].kind, FractalKind::Top);
        assert_eq!(fractals[0].price, 102.0);
        assert_eq!(fractals[1].index, 5);
        assert_eq!(fractals[1].kind, FractalKind::Bottom);
        assert_eq!(fractals[1].price, 99.0);
    }

    #[test]
    fn test_strict_inequality_required() {
        // Plateau: equal neighbor highs never form a top.
        let bars = processed(&[100.0, 102.0, 102.0, 100.0]);
        assert!(detect(&bars).is_empty());
    }

    #[test]
    fn test_monotonic_has_no_fractals() {
        let bars = processed(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(detect(&bars).is_empty());
    }

    #[test]
    fn test_short_input() {
        assert!(detect(&processed(&[1.0, 2.0])).is_empty());
        assert!(detect(&[]).is_empty());
    }
}
