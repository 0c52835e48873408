//! Location seeds.
//!
//! A [`Seed`] turns a location identifier into the `u64` that keys the
//! synthesis PRNG and the urbanicity partition. All-digit identifiers
//! (ZIP codes) use their numeric value so neighbouring ZIPs spread evenly
//! across the partition; anything else is hashed.

use opportunity_map_location_models::Urbanicity;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use sha2::{Digest as _, Sha256};

/// Deterministic seed derived from a location identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Seed {
    value: u64,
    label: String,
}

impl Seed {
    /// Derives a seed from an identifier string.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        let label = identifier.trim();
        let value = if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
            label.parse::<u64>().unwrap_or_else(|_| hash_identifier(label))
        } else {
            hash_identifier(label)
        };

        Self {
            value,
            label: label.to_string(),
        }
    }

    /// Numeric seed value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// The identifier this seed was derived from.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fresh PRNG positioned at the start of this seed's stream.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.value)
    }

    /// Urbanicity from a fixed partition of the seed space: last digit
    /// 0-2 is urban, 3-7 suburban, 8-9 rural.
    #[must_use]
    pub const fn urbanicity(&self) -> Urbanicity {
        match self.value % 10 {
            0..=2 => Urbanicity::Urban,
            3..=7 => Urbanicity::Suburban,
            _ => Urbanicity::Rural,
        }
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::from_identifier(value)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self {
            value,
            label: value.to_string(),
        }
    }
}

impl From<usize> for Seed {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

fn hash_identifier(identifier: &str) -> u64 {
    let digest = Sha256::digest(identifier.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
