/// PROPERTY-BASED TESTS: dependency ordering
///
/// Reordering an acyclic forest puts every dependency ahead of its dependent,
/// and reordering any graph, cycles included, keeps every participant exactly
/// once.

use std::{collections::HashSet, time::Duration};

use proptest::prelude::*;
use tether_shared::{ProcessKey, ProcessList, TickConfig};
use tether_test::{assert_dependencies_honored, Journal, Recorder};

fn build(count: usize) -> (ProcessList<Recorder>, Vec<ProcessKey>) {
    let mut list = ProcessList::new(&TickConfig::new(Duration::from_millis(32)));
    let keys = (0..count).map(|_| list.add_participant(Recorder::new("p"))).collect();
    (list, keys)
}

// each participant may depend on one with a lower index, which keeps the graph acyclic
fn forest_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    (1usize..24).prop_flat_map(|count| {
        (0..count)
            .map(|i| {
                if i == 0 {
                    Just(None).boxed()
                } else {
                    prop::option::of(0..i).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

// any participant may depend on any other, itself included
fn graph_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    (1usize..24).prop_flat_map(|count| prop::collection::vec(prop::option::of(0..count), count))
}

proptest! {
    #[test]
    fn prop_forest_dependencies_come_first(
        parents in forest_strategy(),
        shuffle in any::<bool>(),
    ) {
        let (mut list, keys) = build(parents.len());
        let edges: Vec<(usize, usize)> = parents
            .iter()
            .enumerate()
            .filter_map(|(child, parent)| parent.map(|parent| (child, parent)))
            .collect();
        // set edges in either order, the result must not depend on it
        let ordered: Box<dyn Iterator<Item = &(usize, usize)>> = if shuffle {
            Box::new(edges.iter().rev())
        } else {
            Box::new(edges.iter())
        };
        for (child, parent) in ordered {
            list.set_dependency(&keys[*child], Some(keys[*parent])).unwrap();
        }

        list.reorder();

        prop_assert!(!list.is_dirty());
        assert_dependencies_honored!(list);
    }

    #[test]
    fn prop_cycles_keep_every_participant_once(
        targets in graph_strategy(),
    ) {
        let (mut list, keys) = build(targets.len());
        for (index, target) in targets.iter().enumerate() {
            list.set_dependency(&keys[index], target.map(|t| keys[t])).unwrap();
        }

        list.reorder();

        let order = list.ordered_keys();
        prop_assert_eq!(order.len(), keys.len());
        let unique: HashSet<_> = order.iter().collect();
        prop_assert_eq!(unique.len(), keys.len());

        // ticking a cyclic list still runs everyone once
        let mut journal = Journal::new();
        list.tick_all(&mut journal, &mut tether_shared::NoInputs);
        prop_assert_eq!(journal.ticks.len(), keys.len());
    }
}

#[test]
fn reorder_ignores_slot_reuse() {
    let (mut list, keys) = build(3);
    list.remove_participant(&keys[0]).unwrap();
    // reuses slot 0 but was inserted last
    let late = list.add_participant(Recorder::new("late"));

    list.reorder();

    assert_eq!(list.ordered_keys(), vec![keys[1], keys[2], late]);
}

#[test]
fn two_cycle_collapses_in_insertion_order() {
    let (mut list, keys) = build(2);
    list.set_dependency(&keys[0], Some(keys[1])).unwrap();
    list.set_dependency(&keys[1], Some(keys[0])).unwrap();

    list.reorder();

    // the first popped participant pulls its target ahead of itself
    assert_eq!(list.ordered_keys(), vec![keys[1], keys[0]]);
}
