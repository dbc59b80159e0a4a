// Third-Buy Detection - Breakout, pullback, confirmation walk per zhongshu
// A confirmed setup keeps its candidate record alongside it

use crate::chanlun::bi::{avg_atr_over, Bi, BiDirection};
use crate::chanlun::zhongshu::Zhongshu;
use crate::core::config::{ChanlunParams, ConfirmRule};
use crate::core::types::{Market, Timeframe};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdBuyStatus {
    Candidate,
    Confirmed,
}

/// A third-buy setup anchored to a zhongshu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThirdBuy {
    pub id: usize,
    pub zhongshu_id: usize,
    pub status: ThirdBuyStatus,
    pub breakout_time: i64,
    pub breakout_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pullback_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pullback_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_price: Option<f64>,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub market: Market,
}

/// Scan each zhongshu for a breakout bi, a tolerated pullback, and an
/// optional confirming bi.
pub fn detect(
    zhongshus: &[Zhongshu],
    bis: &[Bi],
    atr: &[f64],
    params: &ChanlunParams,
    symbol: &str,
    market: Market,
    timeframe: Timeframe,
) -> Vec<ThirdBuy> {
    let mut out: Vec<ThirdBuy> = Vec::new();

    for zhongshu in zhongshus {
        let last_member = match zhongshu.bi_ids.last() {
            Some(&id) => id,
            None => continue,
        };

        // First up bi past the zhongshu clearing the top with enough margin.
        let breakout_pos = bis.iter().position(|bi| {
            bi.id > last_member
                && bi.direction == BiDirection::Up
                && bi.end.price > zhongshu.high
                && bi.end.price - zhongshu.high
                    >= params.breakout_atr * avg_atr_over(atr, bi.start.index, bi.end.index)
        });
        let breakout_pos = match breakout_pos {
            Some(pos) => pos,
            None => continue,
        };
        let b_out = &bis[breakout_pos];

        let candidate = |id: usize| ThirdBuy {
            id,
            zhongshu_id: zhongshu.id,
            status: ThirdBuyStatus::Candidate,
            breakout_time: b_out.end.time,
            breakout_price: b_out.end.price,
            pullback_time: None,
            pullback_low: None,
            confirm_time: None,
            confirm_price: None,
            symbol: symbol.to_string(),
            timeframe,
            market,
        };

        let b_back = match bis.get(breakout_pos + 1) {
            None => {
                out.push(candidate(out.len()));
                continue;
            }
            Some(next) if next.direction != BiDirection::Down => {
                out.push(candidate(out.len()));
                continue;
            }
            Some(next) => next,
        };

        let pullback_low = b_back.end.price;
        let tolerance = params.pullback_tolerance_atr
            * avg_atr_over(atr, b_back.start.index, b_back.end.index);
        if pullback_low < zhongshu.high - tolerance {
            debug!(
                zhongshu_id = zhongshu.id,
                pullback_low, "Pullback re-entered the zhongshu, setup discarded"
            );
            continue;
        }

        let mut held = candidate(out.len());
        held.pullback_time = Some(b_back.end.time);
        held.pullback_low = Some(pullback_low);

        let confirmed = bis
            .get(breakout_pos + 2)
            .filter(|conf| conf.direction == BiDirection::Up)
            .filter(|conf| match params.confirm_rule {
                ConfirmRule::NewHigh => conf.end.price > b_out.end.price,
                ConfirmRule::BreakPullbackHigh => conf.end.price > b_back.start.price,
            });

        match confirmed {
            Some(conf) => {
                let mut record = held.clone();
                out.push(held);

                record.id = out.len();
                record.status = ThirdBuyStatus::Confirmed;
                record.confirm_time = Some(conf.end.time);
                record.confirm_price = Some(conf.end.price);
                out.push(record);
            }
            None => out.push(held),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chanlun::fractal::{Fractal, FractalKind};

    fn bi(id: usize, start_idx: usize, from: f64, to: f64) -> Bi {
        let (direction, start_kind, end_kind) = if to > from {
            (BiDirection::Up, FractalKind::Bottom, FractalKind::Top)
        } else {
            (BiDirection::Down, FractalKind::Top, FractalKind::Bottom)
        };
        let end_idx = start_idx + 5;

        Bi {
            id,
            direction,
            start: Fractal {
                index: start_idx,
                time: start_idx as i64 * 60,
                price: from,
                kind: start_kind,
            },
            end: Fractal {
                index: end_idx,
                time: end_idx as i64 * 60,
                price: to,
                kind: end_kind,
            },
            kbar_count: 5,
        }
    }

    fn zhongshu() -> Zhongshu {
        Zhongshu {
            id: 0,
            high: 109.0,
            low: 105.0,
            start_time: 0,
            end_time: 900,
            bi_ids: vec![0, 1, 2],
            active: true,
        }
    }

    fn params_with(rule: ConfirmRule) -> ChanlunParams {
        ChanlunParams {
            confirm_rule: rule,
            ..ChanlunParams::default()
        }
    }

    #[test]
    fn test_confirmed_setup_keeps_candidate() {
        // Breakout to 115, pullback to 110 (inside tolerance), confirm at
        // 117 under the new-high rule.
        let bis = vec![
            bi(3, 15, 107.0, 115.0),
            bi(4, 20, 115.0, 110.0),
            bi(5, 25, 110.0, 117.0),
        ];
        let params = params_with(ConfirmRule::NewHigh);
        let out = detect(&[zhongshu()], &bis, &[], &params, "AAPL", Market::Us, Timeframe::Day1);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].status, ThirdBuyStatus::Candidate);
        assert_eq!(out[0].pullback_low, Some(110.0));
        assert_eq!(out[1].status, ThirdBuyStatus::Confirmed);
        assert_eq!(out[1].confirm_price, Some(117.0));
        assert_eq!(out[1].confirm_time, Some(bis[2].end.time));
        assert_ne!(out[0].id, out[1].id);
        assert_eq!(out[0].breakout_price, 115.0);
    }

    #[test]
    fn test_deep_pullback_discards() {
        // Pullback to 106 dives below high - tolerance: nothing emitted.
        let bis = vec![
            bi(3, 15, 107.0, 115.0),
            bi(4, 20, 115.0, 106.0),
            bi(5, 25, 106.0, 117.0),
        ];
        let params = params_with(ConfirmRule::NewHigh);
        let out = detect(&[zhongshu()], &bis, &[], &params, "AAPL", Market::Us, Timeframe::Day1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_breakout_only_candidate() {
        let bis = vec![bi(3, 15, 107.0, 115.0)];
        let params = ChanlunParams::default();
        let out = detect(&[zhongshu()], &bis, &[], &params, "AAPL", Market::Us, Timeframe::Day1);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, ThirdBuyStatus::Candidate);
        assert_eq!(out[0].pullback_low, None);
        assert_eq!(out[0].breakout_price, 115.0);
    }

    #[test]
    fn test_unconfirmed_pullback_stays_candidate() {
        // Confirming bi too weak under the new-high rule.
        let bis = vec![
            bi(3, 15, 107.0, 115.0),
            bi(4, 20, 115.0, 110.0),
            bi(5, 25, 110.0, 114.0),
        ];
        let params = params_with(ConfirmRule::NewHigh);
        let out = detect(&[zhongshu()], &bis, &[], &params, "AAPL", Market::Us, Timeframe::Day1);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, ThirdBuyStatus::Candidate);
        assert_eq!(out[0].pullback_low, Some(110.0));
    }

    #[test]
    fn test_break_pullback_high_rule() {
        // Non-contiguous bis: the pullback starts from 113 while the
        // breakout ended at 115. 114 clears the pullback start but is no
        // new high.
        let bis = vec![
            bi(3, 15, 107.0, 115.0),
            bi(4, 20, 113.0, 110.0),
            bi(5, 25, 110.0, 114.0),
        ];

        let out = detect(
            &[zhongshu()],
            &bis,
            &[],
            &params_with(ConfirmRule::BreakPullbackHigh),
            "AAPL",
            Market::Us,
            Timeframe::Day1,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].status, ThirdBuyStatus::Confirmed);

        let out = detect(
            &[zhongshu()],
            &bis,
            &[],
            &params_with(ConfirmRule::NewHigh),
            "AAPL",
            Market::Us,
            Timeframe::Day1,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, ThirdBuyStatus::Candidate);
    }

    #[test]
    fn test_breakout_margin_gate() {
        // Constant ATR 2.0 with breakout_atr 0.5 demands 1.0 of margin;
        // 109.5 clears the top by only 0.5.
        let bis = vec![bi(3, 15, 107.0, 109.5)];
        let atr = vec![2.0; 25];
        let params = ChanlunParams::default();
        let out = detect(&[zhongshu()], &bis, &atr, &params, "AAPL", Market::Us, Timeframe::Day1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_down_follow_up_is_breakout_candidate() {
        // Two up bis in a row (possible after bi-gate rejections): the
        // setup falls back to a breakout-only candidate.
        let bis = vec![bi(3, 15, 107.0, 115.0), bi(4, 22, 116.0, 120.0)];
        let params = ChanlunParams::default();
        let out = detect(&[zhongshu()], &bis, &[], &params, "AAPL", Market::Us, Timeframe::Day1);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, ThirdBuyStatus::Candidate);
        assert_eq!(out[0].pullback_low, None);
    }
}
