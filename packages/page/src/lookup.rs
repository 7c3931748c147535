//! Postal code to hotspot resolution.
//!
//! There is no real geocoding behind the lookup yet. [`RandomResolver`]
//! picks a uniformly random hotspot regardless of the code entered; a real
//! postal-district mapping can replace it by implementing
//! [`PostalCodeResolver`] without touching the controller or views.

use std::sync::{Mutex, PoisonError};

use flood_map_flood_models::Hotspot;
use rand::SeedableRng as _;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom as _;

/// Minimum number of characters before a lookup is attempted.
pub const MIN_POSTAL_CODE_LEN: usize = 6;

/// Resolves a postal code to one of the catalog hotspots.
pub trait PostalCodeResolver: Send + Sync {
    /// Returns the hotspot for `postal_code`, or `None` if nothing matches.
    fn resolve(&self, postal_code: &str, catalog: &'static [Hotspot]) -> Option<&'static Hotspot>;
}

/// Whether `postal_code` is long enough to look up. Surrounding whitespace
/// does not count.
#[must_use]
pub fn is_lookup_ready(postal_code: &str) -> bool {
    postal_code.trim().chars().count() >= MIN_POSTAL_CODE_LEN
}

/// Placeholder resolver: uniform random pick from the catalog.
#[derive(Debug, Default)]
pub struct RandomResolver;

impl PostalCodeResolver for RandomResolver {
    fn resolve(
        &self,
        _postal_code: &str,
        catalog: &'static [Hotspot],
    ) -> Option<&'static Hotspot> {
        catalog.choose(&mut rand::thread_rng())
    }
}

/// Random resolver with a fixed seed, for reproducible runs.
#[derive(Debug)]
pub struct SeededResolver {
    rng: Mutex<SmallRng>,
}

impl SeededResolver {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl PostalCodeResolver for SeededResolver {
    fn resolve(
        &self,
        _postal_code: &str,
        catalog: &'static [Hotspot],
    ) -> Option<&'static Hotspot> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        catalog.choose(&mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_flood_models::catalog;

    #[test]
    fn requires_six_characters() {
        assert!(!is_lookup_ready(""));
        assert!(!is_lookup_ready("23883"));
        assert!(!is_lookup_ready("  2388  "));
        assert!(is_lookup_ready("238839"));
        assert!(is_lookup_ready(" 238839 "));
    }

    #[test]
    fn random_resolver_picks_from_catalog() {
        let resolver = RandomResolver;
        for _ in 0..50 {
            let hotspot = resolver.resolve("238839", catalog()).unwrap();
            assert!(catalog().iter().any(|h| h.name == hotspot.name));
        }
    }

    #[test]
    fn resolvers_handle_empty_catalog() {
        assert!(RandomResolver.resolve("238839", &[]).is_none());
        assert!(SeededResolver::new(7).resolve("238839", &[]).is_none());
    }

    #[test]
    fn seeded_resolver_is_reproducible() {
        let a = SeededResolver::new(42);
        let b = SeededResolver::new(42);
        for _ in 0..10 {
            let x = a.resolve("238839", catalog()).map(|h| h.name);
            let y = b.resolve("049315", catalog()).map(|h| h.name);
            assert_eq!(x, y);
        }
    }
}
