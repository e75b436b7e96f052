use std::time::Duration;

use tether_client::ClientStrings;
use tether_server::{HostError, InputError, ReplicationHost, ServerConfig};
use tether_shared::{ConnectionKey, DirtyMask, TickConfig};
use tether_test::{assert_owes, deliver_packet, drop_packet, init_logging, Mover, TestEntity};

fn host() -> ReplicationHost<TestEntity, Mover> {
    init_logging();
    ReplicationHost::new(ServerConfig {
        tick: TickConfig::new(Duration::from_millis(10)),
        max_buffered_inputs: 4,
    })
}

#[test]
fn frame_flushes_marks_made_during_ticks() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    let ship = TestEntity::new(1);
    host.add_user(user).unwrap();
    host.tracker_mut().register_entity(ship).unwrap();
    host.tracker_mut().bind(&ship, user, DirtyMask::EMPTY).unwrap();
    host.processes_mut().add(Mover::new(ship, 0b10));

    let report = host.frame(Duration::from_millis(30));

    assert_eq!(report.advance.ticks, 3);
    assert_eq!(report.flush.entities, 1);
    assert_eq!(report.flush.activated, 1);
    assert_owes!(host.tracker(), ship, user, 0b10);
    assert_eq!(host.tracker().dirty_count(), 0);
}

#[test]
fn frame_without_ticks_still_flushes_manual_marks() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    let crate_entity = TestEntity::new(5);
    host.add_user(user).unwrap();
    host.tracker_mut().register_entity(crate_entity).unwrap();
    host.tracker_mut().bind(&crate_entity, user, DirtyMask::EMPTY).unwrap();
    host.tracker_mut().mark_dirty(&crate_entity, DirtyMask::from_bits(0b1)).unwrap();

    let report = host.frame(Duration::from_millis(3));

    assert_eq!(report.advance.ticks, 0);
    assert_eq!(report.flush.entities, 1);
}

#[test]
fn inputs_drive_controlled_movers() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    let ship = TestEntity::new(1);
    host.add_user(user).unwrap();
    host.tracker_mut().register_entity(ship).unwrap();
    host.tracker_mut().bind(&ship, user, DirtyMask::EMPTY).unwrap();
    let key = host.processes_mut().add(Mover::new(ship, 0));
    host.processes_mut().set_controller(&key, Some(user)).unwrap();

    host.receive_input(&user, 0, 0b001).unwrap();
    host.receive_input(&user, 1, 0b100).unwrap();
    host.frame(Duration::from_millis(10));
    assert_owes!(host.tracker(), ship, user, 0b001);

    host.frame(Duration::from_millis(10));
    assert_owes!(host.tracker(), ship, user, 0b101);

    assert_eq!(
        host.receive_input(&user, 1, 0),
        Err(InputError::StaleInput {
            tick: 1,
            last_consumed: 1
        })
    );
}

#[test]
fn dropped_updates_return_and_delivered_ones_do_not() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    let ship = TestEntity::new(1);
    host.add_user(user).unwrap();
    host.tracker_mut().register_entity(ship).unwrap();
    host.tracker_mut().bind(&ship, user, DirtyMask::from_bits(0b11)).unwrap();
    let mut client = ClientStrings::new();

    let lost = drop_packet(&mut host, &user, 0);
    assert_eq!(lost.updates, vec![(ship, DirtyMask::from_bits(0b11))]);
    assert_owes!(host.tracker(), ship, user, 0b11);

    let delivered = deliver_packet(&mut host, &user, 1, &mut client);
    assert_eq!(delivered.updates.len(), 1);
    assert_owes!(host.tracker(), ship, user, 0);
    assert_eq!(host.in_flight_packets(&user), 0);
}

#[test]
fn dropped_update_for_unbound_entity_is_discarded() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    let ship = TestEntity::new(1);
    host.add_user(user).unwrap();
    host.tracker_mut().register_entity(ship).unwrap();
    host.tracker_mut().bind(&ship, user, DirtyMask::from_bits(0b1)).unwrap();

    host.collect_packet(&user, 0).unwrap();
    host.tracker_mut().unbind(&ship, &user).unwrap();

    host.notify_packet_dropped(&user, 0).unwrap();
    assert!(!host.tracker().is_bound(&ship, &user));
}

#[test]
fn destroying_entity_reports_connections() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    let ship = TestEntity::new(1);
    host.add_user(user).unwrap();
    host.tracker_mut().register_entity(ship).unwrap();
    host.tracker_mut().bind(&ship, user, DirtyMask::EMPTY).unwrap();

    assert_eq!(host.destroy_entity(&ship).unwrap(), vec![user]);
    assert!(matches!(
        host.destroy_entity(&ship),
        Err(HostError::Replication(_))
    ));
}

#[test]
fn removed_user_is_unknown() {
    let mut host = host();
    let user = ConnectionKey::from_u64(1);
    host.add_user(user).unwrap();
    host.remove_user(&user).unwrap();

    assert!(!host.has_user(&user));
    assert_eq!(
        host.collect_packet(&user, 0),
        Err(HostError::UserNotFound { connection: 1 })
    );
    assert!(matches!(
        host.receive_input(&user, 0, 1),
        Err(InputError::ConnectionNotFound { .. })
    ));
}
