//! Identity mining.
//!
//! Candidates are generated and hashed until one digest passes the
//! acceptance test:
//!
//! - `digest[0] < 17`
//! - `digest[59] != 0xff`
//! - the big-endian value of `digest[59..64]` is nonzero
//!
//! That value becomes the node address. Rejected candidates are dropped and
//! the search continues; only a dead random source or a failed scratch
//! allocation ends it early.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand_core::{CryptoRng, RngCore};

use crate::crypto::keys::generate_dual_keypair;
use crate::crypto::memory_hard::{memory_hard_hash, MemoryHardDigest};
use crate::crypto::random::OsRng;
use crate::error::Result;
use crate::identity::address::NodeAddress;
use crate::identity::value::Identity;

/// The first digest byte must be strictly below this value.
pub const HASHCASH_FIRST_BYTE_LESS_THAN: u8 = 17;

/// Apply the acceptance test to a digest, returning the address it yields.
pub fn accept_digest(digest: &MemoryHardDigest) -> Option<NodeAddress> {
    if digest[0] >= HASHCASH_FIRST_BYTE_LESS_THAN {
        return None;
    }
    NodeAddress::from_digest(digest)
}

/// Outcome of one mining step.
#[derive(Debug)]
pub enum MinerState {
    /// The candidate was rejected; keep going.
    Searching,
    /// The candidate was accepted.
    Found(Identity),
}

/// Drives the generate, hash, test loop over an injected random source.
pub struct IdentityMiner<R> {
    rng: R,
    attempts: u64,
}

impl<R: RngCore + CryptoRng> IdentityMiner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, attempts: 0 }
    }

    /// Number of candidates generated so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Generate and test a single candidate.
    pub fn step(&mut self) -> Result<MinerState> {
        let (public_key, private_key) = generate_dual_keypair(&mut self.rng)?;
        let digest = memory_hard_hash(public_key.as_bytes())?;
        self.attempts += 1;

        match accept_digest(&digest) {
            Some(address) => {
                log::debug!(
                    "mined identity {address} after {} attempt(s)",
                    self.attempts
                );
                Ok(MinerState::Found(Identity::from_parts(
                    address,
                    public_key,
                    Some(private_key),
                )))
            }
            None => {
                log::trace!(
                    "candidate {} rejected (digest[0]={:#04x})",
                    self.attempts,
                    digest[0]
                );
                Ok(MinerState::Searching)
            }
        }
    }

    /// Step until a candidate is accepted.
    pub fn mine(mut self) -> Result<Identity> {
        loop {
            if let MinerState::Found(identity) = self.step()? {
                return Ok(identity);
            }
        }
    }
}

/// Mine one identity using the operating system's random source.
///
/// Usually takes a few hundred milliseconds.
pub fn mine_identity() -> Result<Identity> {
    IdentityMiner::new(OsRng).mine()
}

/// Mine one identity using the given random source.
pub fn mine_identity_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Identity> {
    IdentityMiner::new(rng).mine()
}

/// Mine `count` identities on up to `jobs` threads.
///
/// Each worker draws from its own OS random handle and owns its own scratch
/// buffers. See [`mine_identities_with`].
pub fn mine_identities(count: usize, jobs: usize) -> Result<Vec<Identity>> {
    mine_identities_with(count, jobs, || OsRng)
}

/// Mine `count` identities on up to `jobs` threads, each worker drawing from
/// a random source built by `make_rng`.
///
/// Workers check for cancellation before every attempt. The first fatal
/// error stops every worker at its next attempt boundary and is returned
/// alone: identities minted before the failure are discarded.
pub fn mine_identities_with<R, F>(count: usize, jobs: usize, make_rng: F) -> Result<Vec<Identity>>
where
    R: RngCore + CryptoRng,
    F: Fn() -> R + Sync,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    let jobs = jobs.clamp(1, count);
    let claimed = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);

    log::debug!("mining {count} identities on {jobs} thread(s)");

    std::thread::scope(|scope| {
        let mut workers = Vec::with_capacity(jobs);
        for _ in 0..jobs {
            workers.push(scope.spawn(|| -> Result<Vec<Identity>> {
                let mut miner = IdentityMiner::new(make_rng());
                let mut minted = Vec::new();
                while claimed.fetch_add(1, Ordering::Relaxed) < count {
                    loop {
                        if failed.load(Ordering::Relaxed) {
                            return Ok(minted);
                        }
                        match miner.step() {
                            Ok(MinerState::Found(identity)) => {
                                minted.push(identity);
                                break;
                            }
                            Ok(MinerState::Searching) => {}
                            Err(e) => {
                                failed.store(true, Ordering::Relaxed);
                                return Err(e);
                            }
                        }
                    }
                }
                Ok(minted)
            }));
        }

        let mut identities = Vec::with_capacity(count);
        let mut first_error = None;
        for worker in workers {
            match worker
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            {
                Ok(minted) => identities.extend(minted),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => {
                log::debug!(
                    "batch aborted, discarding {} minted identities",
                    identities.len()
                );
                Err(e)
            }
            None => Ok(identities),
        }
    })
}
