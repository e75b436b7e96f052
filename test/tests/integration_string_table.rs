use tether_client::ClientStrings;
use tether_server::{ReplicationHost, ServerConfig};
use tether_shared::{BitReader, BitWriter, ConnectionKey, Serde, StringRef, StringTable, STRING_TABLE_SIZE};
use tether_test::{deliver_packet, drop_packet, init_logging, Mover, TestEntity};

#[test]
fn interning_twice_returns_same_index() {
    let mut table = StringTable::new();
    let (first, confirmed) = table.intern_or_lookup("goblin");
    assert!(!confirmed);

    for mapping in table.take_outgoing_mappings() {
        table.notify_delivered(&mapping);
    }

    assert_eq!(table.intern_or_lookup("goblin"), (first, true));
    assert!(!table.has_outgoing_mappings());
}

#[test]
fn overflow_evicts_exactly_the_first_string() {
    let mut table = StringTable::new();
    for i in 0..=STRING_TABLE_SIZE {
        table.intern_or_lookup(&format!("name-{}", i));
    }

    assert_eq!(table.index_of("name-0"), None);
    for i in 1..=STRING_TABLE_SIZE {
        assert!(table.index_of(&format!("name-{}", i)).is_some(), "name-{} evicted", i);
    }
    assert_eq!(table.index_of(&format!("name-{}", STRING_TABLE_SIZE)), Some(0));
    assert_eq!(table.take_outgoing_mappings().len(), STRING_TABLE_SIZE + 1);
}

#[test]
fn client_resolves_references_after_mappings() {
    init_logging();
    let user = ConnectionKey::from_u64(1);
    let mut host: ReplicationHost<TestEntity, Mover> = ReplicationHost::new(ServerConfig::default());
    host.add_user(user).unwrap();
    let mut client = ClientStrings::new();

    let (index, _) = host.intern_string(&user, "healing_potion").unwrap();
    deliver_packet(&mut host, &user, 0, &mut client);

    let mut writer = BitWriter::new();
    StringRef(index).ser(&mut writer);
    let bytes = writer.to_bytes();
    let mut reader = BitReader::new(&bytes);

    assert_eq!(client.read_string_ref(&mut reader).unwrap(), Some("healing_potion"));
    assert_eq!(host.intern_string(&user, "healing_potion").unwrap(), (index, true));
}

#[test]
fn lost_mapping_rides_the_next_packet() {
    init_logging();
    let user = ConnectionKey::from_u64(1);
    let mut host: ReplicationHost<TestEntity, Mover> = ReplicationHost::new(ServerConfig::default());
    host.add_user(user).unwrap();
    let mut client = ClientStrings::new();

    let (index, _) = host.intern_string(&user, "torch").unwrap();
    let lost = drop_packet(&mut host, &user, 0);
    assert_eq!(lost.mappings.len(), 1);
    assert_eq!(host.intern_string(&user, "torch").unwrap(), (index, false));

    let resent = deliver_packet(&mut host, &user, 1, &mut client);

    assert_eq!(resent.mappings, lost.mappings);
    assert_eq!(client.lookup(index), Some("torch"));
    assert!(host.string_table(&user).unwrap().is_confirmed(index));
}

#[test]
fn late_confirmation_for_reused_slot_is_ignored() {
    let mut table = StringTable::new();
    table.intern_or_lookup("first");
    let in_flight = table.take_outgoing_mappings();

    for i in 0..STRING_TABLE_SIZE {
        table.intern_or_lookup(&format!("filler-{}", i));
    }
    // slot 0 now holds a different string
    assert_eq!(table.lookup(0), Some("filler-255"));

    assert!(!table.notify_delivered(&in_flight[0]));
    assert!(!table.is_confirmed(0));
}
