use keyfall_ports::types::Seconds;

pub type Tick = i64;

pub const DEFAULT_US_PER_QUARTER: u32 = 500_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempoPoint {
    pub tick: Tick,
    pub us_per_quarter: u32,
}

/// Piecewise-constant tempo, converting ticks to wall time.
#[derive(Clone, Debug)]
pub struct TempoMap {
    ppq: u16,
    segments: Vec<TempoSegment>,
}

#[derive(Clone, Copy, Debug)]
struct TempoSegment {
    start_tick: Tick,
    start_us: i64,
    us_per_quarter: u32,
}

impl TempoMap {
    pub fn new(ppq: u16, mut points: Vec<TempoPoint>) -> Self {
        let ppq = ppq.max(1);
        points.sort_by_key(|p| p.tick);
        if points.first().map_or(true, |p| p.tick != 0) {
            points.insert(
                0,
                TempoPoint {
                    tick: 0,
                    us_per_quarter: DEFAULT_US_PER_QUARTER,
                },
            );
        }

        let mut segments: Vec<TempoSegment> = Vec::with_capacity(points.len());
        let mut current_us = 0i64;
        for (idx, point) in points.iter().enumerate() {
            if idx > 0 {
                let prev = &points[idx - 1];
                current_us += ticks_to_us(point.tick - prev.tick, prev.us_per_quarter, ppq);
            }
            // Later tempo events on the same tick win.
            if let Some(last) = segments.last_mut() {
                if last.start_tick == point.tick {
                    last.us_per_quarter = point.us_per_quarter;
                    continue;
                }
            }
            segments.push(TempoSegment {
                start_tick: point.tick,
                start_us: current_us,
                us_per_quarter: point.us_per_quarter,
            });
        }

        Self { ppq, segments }
    }

    pub fn tick_to_micros(&self, tick: Tick) -> i64 {
        let idx = self
            .segments
            .partition_point(|seg| seg.start_tick <= tick)
            .saturating_sub(1);
        let seg = self.segments[idx];
        seg.start_us + ticks_to_us(tick - seg.start_tick, seg.us_per_quarter, self.ppq)
    }

    pub fn tick_to_secs(&self, tick: Tick) -> Seconds {
        self.tick_to_micros(tick) as f64 / 1_000_000.0
    }
}

fn ticks_to_us(ticks: Tick, us_per_quarter: u32, ppq: u16) -> i64 {
    let ticks = ticks as i128;
    let us_per_quarter = us_per_quarter as i128;
    let ppq = ppq as i128;
    ((ticks * us_per_quarter) / ppq) as i64
}
