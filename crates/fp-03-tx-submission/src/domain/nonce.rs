//! # Nonce Cache
//!
//! Signer-scoped next-nonce counter. Lock-free: concurrent callers each
//! take a distinct value, and a conflicting value is repaired by the retry
//! protocol rather than by mutual exclusion.

use shared_types::Address;
use std::sync::atomic::{AtomicU64, Ordering};

const EMPTY: u64 = u64::MAX;

/// Next-nonce cache for one signing account.
#[derive(Debug)]
pub struct NonceCache {
    signer: Address,
    next: AtomicU64,
    resets: AtomicU64,
}

impl NonceCache {
    /// Empty cache for `signer`; the first take seeds it from the chain.
    pub fn new(signer: Address) -> Self {
        Self {
            signer,
            next: AtomicU64::new(EMPTY),
            resets: AtomicU64::new(0),
        }
    }

    /// Account whose nonces are cached.
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Next cached nonce without taking it.
    pub fn peek(&self) -> Option<u64> {
        match self.next.load(Ordering::Acquire) {
            EMPTY => None,
            n => Some(n),
        }
    }

    /// Take the next nonce, or `None` if the cache is empty.
    pub fn take(&self) -> Option<u64> {
        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n != EMPTY).then(|| n + 1)
            })
            .ok()
    }

    /// Seed an empty cache with the chain's pending count and take it.
    ///
    /// Returns `None` if another caller seeded first; take again.
    pub fn seed(&self, chain_nonce: u64) -> Option<u64> {
        self.next
            .compare_exchange(EMPTY, chain_nonce + 1, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| chain_nonce)
    }

    /// Discard the cached value.
    pub fn reset(&self) {
        self.next.store(EMPTY, Ordering::Release);
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of resets so far.
    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::Relaxed)
    }
}
