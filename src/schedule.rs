// src/schedule.rs

//! Mapping of work items onto the fixed tick scale.
//!
//! The bar always runs `TICKS` ticks (`0..TICKS`). With `n` items the scale
//! is split into `n + 1` equal intervals and item `k` fires on the
//! `k + 1`-th interval boundary, so the last item still leaves an idle
//! stretch before the bar completes.
//!
//! Everything here is pure; the tick loop itself lives in
//! [`engine`](crate::engine).

/// Number of ticks in one run.
pub const TICKS: u64 = 100;

/// Width of one scheduling interval for `n` items.
///
/// `n == 0` yields `TICKS`, which no tick reaches, so nothing is ever due.
/// `n >= 100` truncates to `0`; see [`is_due`] for how that is handled.
pub fn compute_interval(n: usize) -> u64 {
    TICKS / (n as u64).saturating_add(1)
}

/// Whether the next unfired item should run on `tick`.
///
/// `fired` is how many items have already run. Once it reaches `n` nothing
/// is due, no matter how many ticks still pass the modulus test.
///
/// With `interval == 0` every tick is due, so items fire back-to-back from
/// tick 0 until they or the ticks run out.
pub fn is_due(tick: u64, interval: u64, fired: usize, n: usize) -> bool {
    if fired >= n {
        return false;
    }
    if interval == 0 {
        return true;
    }
    tick >= interval && (tick == interval || tick % interval == 0)
}

/// One planned firing: item `index` runs on `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub tick: u64,
    pub index: usize,
}

/// The full firing plan for a run of `n` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    interval: u64,
    item_count: usize,
    slots: Vec<Slot>,
}

impl Schedule {
    /// Compute the plan the driver will follow for `n` items.
    pub fn plan(n: usize) -> Self {
        let interval = compute_interval(n);
        let mut slots = Vec::with_capacity(n.min(TICKS as usize));
        let mut fired = 0;
        for tick in 0..TICKS {
            if is_due(tick, interval, fired, n) {
                slots.push(Slot { tick, index: fired });
                fired += 1;
            }
        }
        Self {
            interval,
            item_count: n,
            slots,
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Items that will never fire because the ticks ran out.
    pub fn unfired(&self) -> usize {
        self.item_count - self.slots.len()
    }

    pub fn fire_ticks(&self) -> Vec<u64> {
        self.slots.iter().map(|s| s.tick).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_items_fire_at_quarters() {
        let schedule = Schedule::plan(3);
        assert_eq!(schedule.interval(), 25);
        assert_eq!(schedule.fire_ticks(), vec![25, 50, 75]);
        let order: Vec<_> = schedule.slots().iter().map(|s| s.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn zero_items_never_fire() {
        let schedule = Schedule::plan(0);
        assert_eq!(schedule.interval(), TICKS);
        assert!(schedule.slots().is_empty());
        assert_eq!(schedule.unfired(), 0);
    }

    #[test]
    fn single_item_fires_at_midpoint() {
        assert_eq!(Schedule::plan(1).fire_ticks(), vec![50]);
    }

    #[test]
    fn ninety_nine_items_fill_ticks_one_onwards() {
        let schedule = Schedule::plan(99);
        assert_eq!(schedule.interval(), 1);
        assert_eq!(schedule.fire_ticks(), (1..100).collect::<Vec<_>>());
    }

    #[test]
    fn degenerate_interval_fires_every_tick_without_panicking() {
        let schedule = Schedule::plan(250);
        assert_eq!(schedule.interval(), 0);
        assert_eq!(schedule.fire_ticks(), (0..100).collect::<Vec<_>>());
        assert_eq!(schedule.unfired(), 150);
    }

    #[test]
    fn nothing_due_after_all_items_fired() {
        let interval = compute_interval(2);
        assert!(is_due(interval, interval, 0, 2));
        assert!(!is_due(interval * 2, interval, 2, 2));
        assert!(!is_due(5, 0, 7, 7));
    }
}
