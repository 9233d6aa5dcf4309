//! Registry Tests
//!
//! Tests verify:
//! - Lookup on an empty registry
//! - Insert / find / remove
//! - MRU slot maintenance
//! - One record per connection, including under concurrent inserts

use std::sync::Arc;

use xfixes::registry::{ExtensionRecord, ExtensionRegistry, ProtocolVersion};
use xfixes::{ConnectionId, ExtensionCodes};

// =============================================================================
// Helper Functions
// =============================================================================

fn codes(opcode: u8) -> ExtensionCodes {
    ExtensionCodes {
        extension: 3,
        major_opcode: opcode,
        first_event: 87,
        first_error: 140,
    }
}

fn present(id: u64) -> ExtensionRecord {
    ExtensionRecord::present(ConnectionId::new(id), codes(138), ProtocolVersion::new(6, 0))
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_registry_is_empty() {
    let registry = ExtensionRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert_eq!(registry.cached_connection(), None);
}

#[test]
fn test_find_before_insert_returns_none() {
    let registry = ExtensionRegistry::new();
    for id in [0, 1, 42, u64::MAX] {
        assert!(registry.find(ConnectionId::new(id)).is_none());
    }
    assert_eq!(registry.cached_connection(), None);
}

#[test]
fn test_default_registry_is_usable() {
    let registry = ExtensionRegistry::default();
    registry.insert(present(1));
    assert!(registry.find(ConnectionId::new(1)).is_some());
}

#[test]
fn test_insert_and_find() {
    let registry = ExtensionRegistry::new();
    let inserted = registry.insert(present(1));

    let found = registry.find(ConnectionId::new(1)).unwrap();
    assert!(Arc::ptr_eq(&inserted, &found));
    assert_eq!(found.major_opcode(), Some(138));
    assert_eq!(found.version(), Some(ProtocolVersion::new(6, 0)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_find_other_connection_misses() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));

    assert!(registry.find(ConnectionId::new(2)).is_none());
    // A miss does not disturb the cache
    assert_eq!(registry.cached_connection(), Some(ConnectionId::new(1)));
}

#[test]
fn test_absent_record_hides_version() {
    let registry = ExtensionRegistry::new();
    registry.insert(ExtensionRecord::absent(ConnectionId::new(5)));

    let record = registry.find(ConnectionId::new(5)).unwrap();
    assert!(!record.has_extension());
    assert_eq!(record.codes(), None);
    assert_eq!(record.version(), None);
    assert_eq!(record.major_opcode(), None);
    assert_eq!(record.first_event(), None);
}

// =============================================================================
// MRU Tests
// =============================================================================

#[test]
fn test_insert_sets_mru() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));
    assert_eq!(registry.cached_connection(), Some(ConnectionId::new(1)));

    registry.insert(present(2));
    assert_eq!(registry.cached_connection(), Some(ConnectionId::new(2)));
}

#[test]
fn test_find_hit_updates_mru() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));
    registry.insert(present(2));

    registry.find(ConnectionId::new(1)).unwrap();
    assert_eq!(registry.cached_connection(), Some(ConnectionId::new(1)));
}

#[test]
fn test_remove_clears_mru_for_removed_record() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));

    assert!(registry.remove(ConnectionId::new(1)));
    assert_eq!(registry.cached_connection(), None);
    assert!(registry.find(ConnectionId::new(1)).is_none());
}

#[test]
fn test_remove_keeps_mru_for_other_record() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));
    registry.insert(present(2));

    assert!(registry.remove(ConnectionId::new(1)));
    assert_eq!(registry.cached_connection(), Some(ConnectionId::new(2)));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_then_find_returns_none() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(7));
    registry.insert(present(8));

    assert!(registry.remove(ConnectionId::new(7)));
    assert!(registry.find(ConnectionId::new(7)).is_none());
    assert!(registry.find(ConnectionId::new(8)).is_some());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_remove_unregistered_connection() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));

    assert!(!registry.remove(ConnectionId::new(99)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_remove_twice() {
    let registry = ExtensionRegistry::new();
    registry.insert(present(1));

    assert!(registry.remove(ConnectionId::new(1)));
    assert!(!registry.remove(ConnectionId::new(1)));
    assert!(registry.is_empty());
}

#[test]
fn test_handle_outlives_removal() {
    let registry = ExtensionRegistry::new();
    let record = registry.insert(present(1));
    registry.remove(ConnectionId::new(1));

    // Handles already given out stay readable
    assert_eq!(record.major_opcode(), Some(138));
}

// =============================================================================
// Uniqueness Tests
// =============================================================================

#[test]
fn test_duplicate_insert_keeps_first_record() {
    let registry = ExtensionRegistry::new();
    let first = registry.insert(present(1));
    let second = registry.insert(ExtensionRecord::present(
        ConnectionId::new(1),
        codes(200),
        ProtocolVersion::new(5, 0),
    ));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.major_opcode(), Some(138));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_insert_if_absent_reports_winner() {
    let registry = ExtensionRegistry::new();

    let (first, inserted) = registry.insert_if_absent(present(1));
    assert!(inserted);

    let (second, inserted) = registry.insert_if_absent(ExtensionRecord::absent(ConnectionId::new(1)));
    assert!(!inserted);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(second.has_extension());
}

#[test]
fn test_concurrent_inserts_same_connection() {
    let registry = ExtensionRegistry::new();
    let id = ConnectionId::new(77);

    let records: Vec<Arc<ExtensionRecord>> = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = &registry;
                scope.spawn(move |_| {
                    registry.insert(ExtensionRecord::present(
                        id,
                        codes(100 + i as u8),
                        ProtocolVersion::new(6, 0),
                    ))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(registry.len(), 1);
    let stored = registry.find(id).unwrap();
    for record in &records {
        assert!(Arc::ptr_eq(record, &stored));
    }
}

#[test]
fn test_concurrent_find_and_remove_distinct_connections() {
    let registry = ExtensionRegistry::new();
    for id in 0..32 {
        registry.insert(present(id));
    }

    crossbeam::thread::scope(|scope| {
        for id in 0..32u64 {
            let registry = &registry;
            scope.spawn(move |_| {
                for _ in 0..100 {
                    let record = registry.find(ConnectionId::new(id)).unwrap();
                    assert_eq!(record.connection(), ConnectionId::new(id));
                }
                if id % 2 == 0 {
                    assert!(registry.remove(ConnectionId::new(id)));
                }
            });
        }
    })
    .unwrap();

    assert_eq!(registry.len(), 16);
    for id in 0..32u64 {
        assert_eq!(registry.find(ConnectionId::new(id)).is_some(), id % 2 == 1);
    }
}
