// Zhongshu Detection - Overlap region of three consecutive bi ranges
// Later intersecting bis extend the membership without moving the range

use crate::chanlun::bi::Bi;
use serde::Serialize;

/// Central overlap region. `high`/`low` are fixed at construction; extension
/// only appends bi ids and pushes `end_time` forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zhongshu {
    pub id: usize,
    pub high: f64,
    pub low: f64,
    pub start_time: i64,
    pub end_time: i64,
    pub bi_ids: Vec<usize>,
    pub active: bool,
}

impl Zhongshu {
    /// True when the bi's [low, high] intersects this region.
    pub fn intersects(&self, bi: &Bi) -> bool {
        bi.range_low() <= self.high && bi.range_high() >= self.low
    }
}

/// Walk every contiguous bi triple. A triple whose ranges overlap either
/// extends the most recent zhongshu (when it is still active, its last
/// member precedes the triple, and the third bi intersects the range) or
/// opens a new one, retiring the previous.
pub fn detect(bis: &[Bi]) -> Vec<Zhongshu> {
    let mut out: Vec<Zhongshu> = Vec::new();
    if bis.len() < 3 {
        return out;
    }

    for triple in bis.windows(3) {
        let (a, b, c) = (&triple[0], &triple[1], &triple[2]);

        let z_high = a.range_high().min(b.range_high()).min(c.range_high());
        let z_low = a.range_low().max(b.range_low()).max(c.range_low());
        if z_high <= z_low {
            continue;
        }

        if let Some(last) = out.last_mut() {
            let last_member = *last.bi_ids.last().expect("zhongshu has members");
            if last.active && last_member < a.id && last.intersects(c) {
                last.end_time = c.end.time;
                last.bi_ids.push(c.id);
                continue;
            }
        }

        if let Some(prev) = out.last_mut() {
            prev.active = false;
        }

        out.push(Zhongshu {
            id: out.len(),
            high: z_high,
            low: z_low,
            start_time: a.start.time,
            end_time: c.end.time,
            bi_ids: vec![a.id, b.id, c.id],
            active: true,
        });
    }

    out
}
