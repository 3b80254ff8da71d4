// tests/schedule_property.rs

use proptest::prelude::*;
use wrapbar::schedule::{Schedule, TICKS, compute_interval, is_due};

proptest! {
    #[test]
    fn every_item_gets_a_distinct_tick_in_order(n in 0usize..=500) {
        let schedule = Schedule::plan(n);
        let slots = schedule.slots();

        // Exactly min(n, TICKS) items fire; all of them when n < 100.
        prop_assert_eq!(slots.len(), n.min(TICKS as usize));
        if n < 100 {
            prop_assert_eq!(schedule.unfired(), 0);
        }

        for (position, slot) in slots.iter().enumerate() {
            prop_assert_eq!(slot.index, position, "items must fire in input order");
            prop_assert!(slot.tick < TICKS);
        }
        for pair in slots.windows(2) {
            prop_assert!(pair[0].tick < pair[1].tick, "ticks must be strictly increasing");
        }
    }

    #[test]
    fn due_ticks_are_interval_multiples(n in 1usize..100) {
        let interval = compute_interval(n);
        prop_assert!(interval >= 1);
        for slot in Schedule::plan(n).slots() {
            prop_assert_eq!(slot.tick % interval, 0);
            prop_assert!(slot.tick >= interval);
        }
    }

    #[test]
    fn nothing_is_due_once_all_items_fired(n in 0usize..=500, tick in 0u64..TICKS) {
        prop_assert!(!is_due(tick, compute_interval(n), n, n));
    }
}

#[test]
fn three_items_fire_on_quarter_ticks() {
    assert_eq!(Schedule::plan(3).fire_ticks(), vec![25, 50, 75]);
}

#[test]
fn hundred_items_use_every_tick() {
    let schedule = Schedule::plan(100);
    assert_eq!(schedule.interval(), 0);
    assert_eq!(schedule.fire_ticks(), (0..TICKS).collect::<Vec<_>>());
    assert_eq!(schedule.unfired(), 0);
}
