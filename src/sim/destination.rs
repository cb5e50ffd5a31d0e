//! Delivery destination catalog
//!
//! Fixed identity table: city code, display name, lightbulb color. Catalog
//! order doubles as the unlock order over the course of a round.

use rand::Rng;
use serde::Serialize;

use super::SimError;

/// A named, colored delivery target identity.
///
/// Values are copies of catalog entries; two destinations are equal when
/// their codes match.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Destination {
    /// Three-letter city code shown on parcels and bulbs
    pub code: &'static str,
    /// Full city name
    pub name: &'static str,
    /// Display color, 0xRRGGBB
    pub color: u32,
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Destination {}

/// The full catalog, in unlock order.
pub const CATALOG: [Destination; 8] = [
    Destination { code: "BER", name: "Berlin", color: 0x3399cc },
    Destination { code: "LON", name: "London", color: 0xcc3333 },
    Destination { code: "PAR", name: "Paris", color: 0x33cc33 },
    Destination { code: "MAD", name: "Madrid", color: 0xcccc33 },
    Destination { code: "ROM", name: "Rome", color: 0xcc3390 },
    Destination { code: "LIS", name: "Lisbon", color: 0x33cccc },
    Destination { code: "VIE", name: "Vienna", color: 0xff8c00 },
    Destination { code: "PRA", name: "Prague", color: 0x9d33cc },
];

impl Destination {
    /// Uniform pick among the first `active_count` catalog entries.
    pub fn random_from<R: Rng>(rng: &mut R, active_count: usize) -> Result<Self, SimError> {
        if active_count == 0 || active_count > CATALOG.len() {
            return Err(SimError::DestinationOutOfRange(active_count));
        }
        Ok(CATALOG[rng.random_range(0..active_count)])
    }

    /// Catalog entry at `index`.
    pub fn by_index(index: usize) -> Result<Self, SimError> {
        CATALOG
            .get(index)
            .copied()
            .ok_or(SimError::DestinationOutOfRange(index))
    }
}
