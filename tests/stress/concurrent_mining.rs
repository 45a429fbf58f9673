//! Concurrency test: identities minted on parallel threads are independent
//! and every one of them validates.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

use ztidentity::{mine_identities, mine_identity};

#[test]
fn stress_8_threads_mining_independently() {
    let identities = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let identities = Arc::clone(&identities);
        let handle = thread::spawn(move || {
            for _ in 0..4 {
                let identity = mine_identity().expect("mining should succeed");
                identities.lock().unwrap().push(identity);
            }
        });
        handles.push(handle);
    }

    for h in handles {
        h.join().unwrap();
    }

    let identities = identities.lock().unwrap();
    assert_eq!(identities.len(), 32);

    let addresses: HashSet<_> = identities.iter().map(|id| id.address()).collect();
    assert_eq!(addresses.len(), 32, "addresses must be distinct");
}

#[test]
fn stress_batch_mining_validates() {
    let identities = mine_identities(16, 4).expect("batch mining should succeed");
    assert_eq!(identities.len(), 16);

    let addresses: HashSet<_> = identities.iter().map(|id| id.address()).collect();
    assert_eq!(addresses.len(), 16);

    for identity in &identities {
        identity
            .validate()
            .unwrap_or_else(|e| panic!("{} should validate: {e}", identity.id_string()));
    }
}

#[test]
fn stress_batch_with_more_jobs_than_identities() {
    let identities = mine_identities(2, 16).expect("batch mining should succeed");
    assert_eq!(identities.len(), 2);
}
