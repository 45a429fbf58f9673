//! Stress test: mine 200 identities in sequence, verify all addresses and
//! public keys are pairwise distinct and every one carries a valid proof.

use std::collections::HashSet;

use ztidentity::identity::accept_digest;
use ztidentity::{memory_hard_hash, mine_identity, Identity};

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[test]
fn stress_200_unique_identities() {
    let mut addresses = HashSet::new();
    let mut public_keys = HashSet::new();

    for i in 0..200 {
        let identity = mine_identity().expect("mining should succeed");

        assert!(
            addresses.insert(identity.address()),
            "Duplicate address at iteration {i}: {}",
            identity.id_string()
        );
        assert!(
            public_keys.insert(*identity.public_key()),
            "Duplicate public key at iteration {i}"
        );

        let address = identity.address().as_u64();
        assert!((1..=(1u64 << 40) - 1).contains(&address));
    }

    assert_eq!(addresses.len(), 200);
    assert_eq!(public_keys.len(), 200);
}

#[test]
fn stress_20_identities_hold_proof_of_work() {
    let identities: Vec<Identity> = (0..20)
        .map(|_| mine_identity().expect("mining should succeed"))
        .collect();

    for identity in &identities {
        let digest = memory_hard_hash(identity.public_key().as_bytes()).unwrap();
        assert!(digest[0] < 17, "{} fails threshold", identity.id_string());
        assert_ne!(digest[59], 0xff);

        let from_digest = digest.as_bytes()[59..]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        assert_eq!(from_digest, identity.address().as_u64());
        assert_eq!(accept_digest(&digest), Some(identity.address()));
    }
}

#[test]
fn stress_20_identities_encode_cleanly() {
    for _ in 0..20 {
        let identity = mine_identity().expect("mining should succeed");
        let public = identity.public_key_string();
        let secret = identity.private_key_string();

        assert_eq!(public.len(), 10 + 3 + 128);
        assert_eq!(secret.len(), public.len() + 1 + 128);
        assert!(secret.starts_with(&public));
        assert_eq!(identity.id_string(), &public[..10]);
        assert!(is_lower_hex(&public[..10]));
        assert_eq!(&public[10..13], ":0:");
        assert!(is_lower_hex(&public[13..]));
        assert!(is_lower_hex(&secret[public.len() + 1..]));
    }
}
