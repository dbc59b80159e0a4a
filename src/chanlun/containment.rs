// Containment Reduction - Collapse mutually containing adjacent bars
// First Chanlun stage; output feeds fractal detection

use crate::core::types::Bar;
use serde::Serialize;

/// Bar after containment reduction. `orig_index` is the index of the last
/// source bar it absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessedBar {
    pub orig_index: usize,
    pub time: i64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl ProcessedBar {
    fn from_bar(index: usize, bar: &Bar) -> Self {
        Self {
            orig_index: index,
            time: bar.time_s,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }

    /// True when this bar's [low, high] fully spans the other's.
    pub fn contains(&self, other: &ProcessedBar) -> bool {
        self.low <= other.low && self.high >= other.high
    }
}

/// Left-to-right reduction: a bar containing (or contained by) the current
/// tail merges into the tail, directed by the running trend; otherwise it
/// is appended. The merged bar always takes the newcomer's close and time.
pub fn reduce(bars: &[Bar]) -> Vec<ProcessedBar> {
    let mut out: Vec<ProcessedBar> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let cur = ProcessedBar::from_bar(i, bar);

        let prev = match out.last() {
            Some(&prev) => prev,
            None => {
                out.push(cur);
                continue;
            }
        };

        if !(cur.contains(&prev) || prev.contains(&cur)) {
            out.push(cur);
            continue;
        }

        // Trend from the bar before the tail; a lone tail defaults to
        // uptrend.
        let n = out.len();
        let uptrend = n < 2 || out[n - 1].high > out[n - 2].high;

        let (high, low) = if uptrend {
            (prev.high.max(cur.high), prev.low.max(cur.low))
        } else {
            (prev.high.min(cur.high), prev.low.min(cur.low))
        };

        *out.last_mut().expect("tail exists when merging") = ProcessedBar {
            orig_index: i,
            time: cur.time,
            high,
            low,
            close: cur.close,
        };
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, high: f64, low: f64) -> Bar {
        let close = (high + low) / 2.0;
        Bar::new(time, close, high, low, close)
    }

    #[test]
    fn test_no_containment_appends() {
        let bars = vec![bar(0, 10.0, 5.0), bar(60, 12.0, 6.0)];
        let out = reduce(&bars);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].orig_index, 1);
    }

    #[test]
    fn test_uptrend_merge_keeps_highs() {
        let bars = vec![bar(0, 10.0, 5.0), bar(60, 12.0, 6.0), bar(120, 11.0, 7.0)];
        let out = reduce(&bars);

        assert_eq!(out.len(), 2);
        let merged = out[1];
        assert_eq!(merged.high, 12.0, "max of highs in an uptrend");
        assert_eq!(merged.low, 7.0, "max of lows in an uptrend");
        assert_eq!(merged.time, 120);
        assert_eq!(merged.orig_index, 2);
        assert_eq!(merged.close, bars[2].close);
    }

    #[test]
    fn test_downtrend_merge_keeps_lows() {
        let bars = vec![bar(0, 12.0, 6.0), bar(60, 10.0, 5.0), bar(120, 9.5, 5.5)];
        let out = reduce(&bars);

        assert_eq!(out.len(), 2);
        let merged = out[1];
        assert_eq!(merged.high, 9.5, "min of highs in a downtrend");
        assert_eq!(merged.low, 5.0, "min of lows in a downtrend");
    }

    #[test]
    fn test_lone_tail_defaults_to_uptrend() {
        let bars = vec![bar(0, 10.0, 5.0), bar(60, 9.0, 6.0)];
        let out = reduce(&bars);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].high, 10.0);
        assert_eq!(out[0].low, 6.0);
        assert_eq!(out[0].close, bars[1].close);
    }

    #[test]
    fn test_no_adjacent_containment_remains() {
        // Noisy sequence; the invariant must hold regardless of shape.
        let highs = [10.0, 12.0, 11.0, 15.0, 14.5, 9.0, 9.5, 16.0, 15.0, 15.5];
        let lows = [5.0, 6.0, 7.0, 8.0, 9.0, 7.5, 8.5, 8.0, 9.5, 9.0];
        let bars: Vec<Bar> = highs
            .iter()
            .zip(lows.iter())
            .enumerate()
            .map(|(i, (&h, &l))| bar(i as i64 * 60, h, l))
            .collect();

        let out = reduce(&bars);
        for pair in out.windows(2) {
            assert!(
                !pair[0].contains(&pair[1]) && !pair[1].contains(&pair[0]),
                "adjacent containment left after reduction: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(reduce(&[]).is_empty());
    }
}
