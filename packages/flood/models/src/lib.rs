#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Flood hotspot types, severity tiers, and risk classification.
//!
//! This crate defines the compiled-in catalog of historical flood hotspots
//! in Singapore and the frequency-based [`classify`] function that turns an
//! incident count into the risk label shown to visitors. Everything here is
//! pure data; nothing performs I/O.

mod catalog;

pub use catalog::{catalog, find_by_name, total_incidents};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Qualitative severity tier stored alongside each hotspot.
///
/// Drives marker styling. Stored independently of the incident frequency,
/// so it can be more conservative than [`classify`] would suggest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Severity {
    /// Returns the numeric rank of this severity (1-3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Marker color used by map adapters.
    #[must_use]
    pub const fn marker_color(self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "yellow",
        }
    }

    /// Whether the hotspot gets the pulsing emphasis and circle overlay.
    #[must_use]
    pub const fn is_emphasized(self) -> bool {
        matches!(self, Self::High)
    }
}

/// Frequency-derived risk tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskTier {
    Lower = 1,
    Medium = 2,
    High = 3,
}

impl RiskTier {
    /// Incident count at or above which a hotspot is [`RiskTier::Medium`].
    pub const MEDIUM_THRESHOLD: i64 = 6;
    /// Incident count at or above which a hotspot is [`RiskTier::High`].
    pub const HIGH_THRESHOLD: i64 = 10;

    /// Returns the numeric rank of this tier (1-3), comparable with
    /// [`Severity::rank`].
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Human-readable label, e.g. `"High Risk"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::Lower => "Lower Risk",
        }
    }

    /// Legend text describing the incident range of this tier.
    #[must_use]
    pub const fn legend(self) -> &'static str {
        match self {
            Self::High => "High Risk (10+ incidents)",
            Self::Medium => "Medium Risk (6-9 incidents)",
            Self::Lower => "Lower Risk (1-5 incidents)",
        }
    }

    /// Returns all tiers from most to least severe.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Lower]
    }
}

/// Display form of a risk tier: label plus text and background style tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevel {
    pub tier: RiskTier,
    pub label: &'static str,
    pub color_token: &'static str,
    pub background_token: &'static str,
}

impl From<RiskTier> for RiskLevel {
    fn from(tier: RiskTier) -> Self {
        let (color_token, background_token) = match tier {
            RiskTier::High => ("text-red-600", "bg-red-50"),
            RiskTier::Medium => ("text-orange-600", "bg-orange-50"),
            RiskTier::Lower => ("text-yellow-600", "bg-yellow-50"),
        };
        Self {
            tier,
            label: tier.label(),
            color_token,
            background_token,
        }
    }
}

/// Classifies an incident frequency into a [`RiskLevel`].
///
/// Total over all integers: anything below the medium threshold, negative
/// counts included, is [`RiskTier::Lower`].
#[must_use]
pub fn classify(frequency: i64) -> RiskLevel {
    let tier = if frequency >= RiskTier::HIGH_THRESHOLD {
        RiskTier::High
    } else if frequency >= RiskTier::MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Lower
    };
    tier.into()
}

/// A named location with historical flood incident statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Flood incidents recorded over the past ten years.
    pub incident_frequency: u32,
    pub severity: Severity,
}

impl Hotspot {
    /// Risk level derived from [`Self::incident_frequency`].
    #[must_use]
    pub fn risk(&self) -> RiskLevel {
        classify(i64::from(self.incident_frequency))
    }

    /// Whether the stored severity is at least as severe as the
    /// frequency-derived tier.
    #[must_use]
    pub fn severity_covers_risk(&self) -> bool {
        self.severity.rank() >= self.risk().tier.rank()
    }
}
