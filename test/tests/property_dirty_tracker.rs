/// PROPERTY-BASED TESTS: dirty mask fan-out
///
/// Between two flushes, what a binding that started idle owes after the flush
/// is every marked bit, minus the bits cleared after they were marked.

use proptest::prelude::*;
use tether_shared::{ConnectionKey, DirtyMask, DirtyTracker};
use tether_test::TestEntity;

#[derive(Clone, Debug)]
enum Op {
    Mark(u32),
    Clear(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::Mark),
        any::<u32>().prop_map(Op::Clear),
    ]
}

fn tracker_with(connections: u64) -> (DirtyTracker<TestEntity>, TestEntity) {
    let mut tracker = DirtyTracker::new();
    let entity = TestEntity::new(1);
    tracker.register_entity(entity).unwrap();
    for id in 0..connections {
        let connection = ConnectionKey::from_u64(id);
        tracker.add_connection(connection).unwrap();
        tracker.bind(&entity, connection, DirtyMask::EMPTY).unwrap();
    }
    (tracker, entity)
}

proptest! {
    #[test]
    fn prop_flushed_mask_is_marks_minus_clears(
        ops in prop::collection::vec(op_strategy(), 0..32),
        connections in 1u64..5,
    ) {
        let (mut tracker, entity) = tracker_with(connections);

        let mut expected = 0u32;
        for op in &ops {
            match op {
                Op::Mark(bits) => {
                    tracker.mark_dirty(&entity, DirtyMask::from_bits(*bits)).unwrap();
                    expected |= bits;
                }
                Op::Clear(bits) => {
                    tracker.clear_aspect(&entity, DirtyMask::from_bits(*bits)).unwrap();
                    expected &= !bits;
                }
            }
        }
        prop_assert_eq!(tracker.is_dirty(&entity), expected != 0);

        tracker.flush();

        for id in 0..connections {
            let connection = ConnectionKey::from_u64(id);
            prop_assert_eq!(
                tracker.binding_mask(&entity, &connection),
                Some(DirtyMask::from_bits(expected))
            );
            prop_assert_eq!(tracker.has_active(&connection), expected != 0);
        }
        prop_assert_eq!(tracker.dirty_count(), 0);
    }

    #[test]
    fn prop_second_flush_does_nothing(
        marks in prop::collection::vec(any::<u32>(), 0..8),
    ) {
        let (mut tracker, entity) = tracker_with(2);
        for bits in &marks {
            tracker.mark_dirty(&entity, DirtyMask::from_bits(*bits)).unwrap();
        }
        tracker.flush();
        let connection = ConnectionKey::from_u64(0);
        let after_first = tracker.binding_mask(&entity, &connection);

        let report = tracker.flush();

        prop_assert_eq!(report.entities, 0);
        prop_assert_eq!(report.activated, 0);
        prop_assert_eq!(tracker.binding_mask(&entity, &connection), after_first);
    }
}
