/// Assert that every "after" edge is honored by the list's current order
#[macro_export]
macro_rules! assert_dependencies_honored {
    ($list:expr) => {
        let order = $list.ordered_keys();
        for (position, key) in order.iter().enumerate() {
            if let Some(target) = $list.dependency(key) {
                let target_position = order
                    .iter()
                    .position(|other| *other == target)
                    .expect("dependency target missing from order");
                assert!(
                    target_position < position,
                    "{:?} should come after {:?}",
                    key,
                    target
                );
            }
        }
    };
}

/// Assert the binding of an entity to a connection owes exactly `bits`
#[macro_export]
macro_rules! assert_owes {
    ($tracker:expr, $entity:expr, $connection:expr, $bits:expr) => {
        assert_eq!(
            $tracker.binding_mask(&$entity, &$connection),
            Some(tether_shared::DirtyMask::from_bits($bits)),
            "binding of {:?} to {:?}",
            $entity,
            $connection
        );
    };
}
