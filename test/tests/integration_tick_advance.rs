use std::time::Duration;

use proptest::prelude::*;
use tether_server::ServerProcessList;
use tether_shared::{NoInputs, ProcessList, TickConfig};
use tether_test::{Journal, Recorder};

fn tick_config(millis: u64) -> TickConfig {
    TickConfig::new(Duration::from_millis(millis))
}

#[test]
fn two_half_ticks_make_one_tick() {
    let mut list = ProcessList::new(&TickConfig::default());
    list.add_participant(Recorder::new("a"));
    let mut journal = Journal::new();

    let first = list.advance(Duration::from_millis(16), &mut journal, &mut NoInputs);
    let second = list.advance(Duration::from_millis(16), &mut journal, &mut NoInputs);

    assert_eq!(first.ticks, 0);
    assert_eq!(first.delta, 0.5);
    assert_eq!(second.ticks, 1);
    assert_eq!(second.delta, 0.0);
    assert_eq!(list.total_ticks(), 1);
    assert_eq!(journal.count("a"), 1);
}

#[test]
fn dependents_tick_after_their_dependency() {
    let mut processes = ServerProcessList::new(&tick_config(10));
    let rider = processes.add(Recorder::new("rider"));
    let horse = processes.add(Recorder::new("horse"));
    processes.set_dependency(&rider, Some(horse)).unwrap();
    let mut journal = Journal::new();

    processes.advance(Duration::from_millis(20), &mut journal, &mut NoInputs);

    assert_eq!(journal.ticked_on(1), vec!["horse", "rider"]);
    assert_eq!(journal.ticked_on(2), vec!["horse", "rider"]);
    let ticks: Vec<_> = processes.take_tick_events().read().collect();
    assert_eq!(ticks, vec![1, 2]);
}

#[test]
fn tick_counter_wraps() {
    let mut list: ProcessList<Recorder> = ProcessList::new(&tick_config(1));
    let mut journal = Journal::new();

    list.advance(Duration::from_millis(65_537), &mut journal, &mut NoInputs);

    assert_eq!(list.total_ticks(), 65_537);
    assert_eq!(list.current_tick(), 1);
}

proptest! {
    #[test]
    fn prop_advance_is_batching_invariant(
        steps in prop::collection::vec(0u64..100_000_000, 1..40),
        tick_millis in 1u64..64,
    ) {
        let config = tick_config(tick_millis);
        let total: u64 = steps.iter().sum();

        let mut batched: ProcessList<Recorder> = ProcessList::new(&config);
        let mut stepped: ProcessList<Recorder> = ProcessList::new(&config);
        let mut journal = Journal::new();

        let once = batched.advance(Duration::from_nanos(total), &mut journal, &mut NoInputs);
        let mut ticks = 0;
        let mut last = None;
        for step in &steps {
            let report = stepped.advance(Duration::from_nanos(*step), &mut journal, &mut NoInputs);
            ticks += report.ticks;
            last = Some(report);
        }

        prop_assert_eq!(ticks, once.ticks);
        prop_assert_eq!(stepped.total_ticks(), batched.total_ticks());
        prop_assert_eq!(last.map(|report| report.delta), Some(once.delta));
        prop_assert_eq!(stepped.clock().elapsed(), batched.clock().elapsed());
    }
}
