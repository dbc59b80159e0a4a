// Bi Formation - Directed segments between alternating fractals
// Gates: minimum k-bar span and an ATR-scaled minimum price move

use crate::chanlun::fractal::{Fractal, FractalKind};
use crate::core::config::ChanlunParams;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BiDirection {
    Up,
    Down,
}

impl fmt::Display for BiDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiDirection::Up => write!(f, "up"),
            BiDirection::Down => write!(f, "down"),
        }
    }
}

/// Directed segment joining two fractals of opposite kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bi {
    pub id: usize,
    pub direction: BiDirection,
    pub start: Fractal,
    pub end: Fractal,
    pub kbar_count: usize,
}

impl Bi {
    pub fn range_low(&self) -> f64 {
        self.start.price.min(self.end.price)
    }

    pub fn range_high(&self) -> f64 {
        self.start.price.max(self.end.price)
    }
}

/// Mean of the defined ATR values over the inclusive index span; 0.0 when
/// nothing is defined there.
pub(crate) fn avg_atr_over(atr: &[f64], start: usize, end: usize) -> f64 {
    if atr.is_empty() || start > end {
        return 0.0;
    }

    let hi = end.min(atr.len().saturating_sub(1));
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in atr.iter().take(hi + 1).skip(start) {
        if !value.is_nan() {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Reduce the fractal list to a strictly alternating sequence: a repeat of
/// the previous kind replaces it when more extreme.
fn filter_alternating(fractals: &[Fractal]) -> Vec<Fractal> {
    let mut out: Vec<Fractal> = Vec::new();

    for &fractal in fractals {
        match out.last() {
            Some(last) if last.kind == fractal.kind => {
                let more_extreme = match fractal.kind {
                    FractalKind::Top => fractal.price > last.price,
                    FractalKind::Bottom => fractal.price < last.price,
                };
                if more_extreme {
                    *out.last_mut().expect("non-empty") = fractal;
                }
            }
            _ => out.push(fractal),
        }
    }

    out
}

/// Build bis from adjacent alternating fractal pairs, applying the k-bar
/// and ATR-move gates. Ids are dense and 0-based in emission order.
pub fn build(fractals: &[Fractal], atr: &[f64], params: &ChanlunParams) -> Vec<Bi> {
    let alternating = filter_alternating(fractals);
    let mut out = Vec::new();

    for pair in alternating.windows(2) {
        let (start, end) = (pair[0], pair[1]);

        let kbar_count = end.index - start.index;
        if kbar_count < params.min_bi_kbars {
            continue;
        }

        let avg_atr = avg_atr_over(atr, start.index, end.index);
        let price_move = (end.price - start.price).abs();
        if avg_atr > 0.0 && price_move < params.min_bi_move_atr * avg_atr {
            continue;
        }

        let direction = if start.kind == FractalKind::Bottom {
            BiDirection::Up
        } else {
            BiDirection::Down
        };

        out.push(Bi {
            id: out.len(),
            direction,
            start,
            end,
            kbar_count,
        });
    }

    out
}
