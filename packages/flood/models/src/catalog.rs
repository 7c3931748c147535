//! Compiled-in catalog of historical flood hotspots.

use crate::{Hotspot, Severity};

const HOTSPOTS: &[Hotspot] = &[
    Hotspot {
        name: "Orchard Road",
        latitude: 1.3048,
        longitude: 103.8318,
        incident_frequency: 8,
        severity: Severity::High,
    },
    Hotspot {
        name: "Bukit Timah",
        latitude: 1.3294,
        longitude: 103.8078,
        incident_frequency: 12,
        severity: Severity::High,
    },
    Hotspot {
        name: "Macpherson",
        latitude: 1.3273,
        longitude: 103.8859,
        incident_frequency: 6,
        severity: Severity::Medium,
    },
    Hotspot {
        name: "Changi",
        latitude: 1.3644,
        longitude: 103.9915,
        incident_frequency: 4,
        severity: Severity::Medium,
    },
    Hotspot {
        name: "Jurong",
        latitude: 1.3329,
        longitude: 103.7436,
        incident_frequency: 5,
        severity: Severity::Medium,
    },
];

/// Returns the fixed, ordered hotspot catalog.
#[must_use]
pub const fn catalog() -> &'static [Hotspot] {
    HOTSPOTS
}

/// Looks up a hotspot by exact name.
#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static Hotspot> {
    HOTSPOTS.iter().find(|h| h.name == name)
}

/// Sum of incident frequencies across the catalog.
#[must_use]
pub fn total_incidents() -> u64 {
    HOTSPOTS
        .iter()
        .map(|h| u64::from(h.incident_frequency))
        .sum()
}
