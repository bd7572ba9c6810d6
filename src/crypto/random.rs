// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Random source selection
//!
//! Production code draws from the operating system CSPRNG. If the OS source
//! cannot be read at startup, challenge nonces fall back to a time-seeded
//! PRNG and the degradation is logged as a warning. Key material and IVs
//! never use the fallback: those paths go straight to `OsRng` and surface
//! `CryptoError::Environment` instead.

use rand::{distributions::Alphanumeric, rngs::OsRng, rngs::StdRng, Rng, RngCore, SeedableRng};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use super::CryptoError;

enum Source {
    Os,
    Degraded(Mutex<StdRng>),
}

/// Random source for challenge nonces
pub struct SecureRandom {
    source: Source,
}

impl SecureRandom {
    /// Probe the OS source and fall back to a seeded PRNG if it is unusable
    pub fn detect() -> Self {
        let mut probe = [0u8; 16];
        match OsRng.try_fill_bytes(&mut probe) {
            Ok(()) => Self::os(),
            Err(e) => {
                tracing::warn!(
                    "⚠️  OS random source unavailable ({}); nonces use a DEGRADED non-cryptographic PRNG",
                    e
                );
                Self::degraded()
            }
        }
    }

    /// OS-backed CSPRNG
    pub fn os() -> Self {
        Self { source: Source::Os }
    }

    /// Time-seeded PRNG. Not suitable for production.
    pub fn degraded() -> Self {
        Self {
            source: Source::Degraded(Mutex::new(time_seeded_rng())),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.source, Source::Degraded(_))
    }

    /// Draw `len` characters uniformly from `[A-Za-z0-9]`
    ///
    /// The OS source reseeds a ChaCha-based `StdRng` per call. If that read
    /// fails after a successful `detect`, this call degrades and logs.
    pub fn alphanumeric(&self, len: usize) -> String {
        match &self.source {
            Source::Os => match StdRng::from_rng(OsRng) {
                Ok(mut rng) => sample_alphanumeric(&mut rng, len),
                Err(e) => {
                    tracing::warn!(
                        "⚠️  OS random source failed ({}); nonce drawn from a DEGRADED PRNG",
                        e
                    );
                    sample_alphanumeric(&mut time_seeded_rng(), len)
                }
            },
            Source::Degraded(rng) => {
                let mut rng = match rng.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                sample_alphanumeric(&mut *rng, len)
            }
        }
    }
}

fn time_seeded_rng() -> StdRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seed = nanos ^ (std::process::id() as u64).rotate_left(32);
    StdRng::seed_from_u64(seed)
}

fn sample_alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

impl Default for SecureRandom {
    fn default() -> Self {
        Self::detect()
    }
}

/// Fill `buf` from the OS CSPRNG, failing instead of degrading
pub fn fill_secure(buf: &mut [u8]) -> Result<(), CryptoError> {
    OsRng.try_fill_bytes(buf)?;
    Ok(())
}
