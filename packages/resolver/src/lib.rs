#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location resolution: free-text incident locations to regional hubs.
//!
//! Incident records describe locations inconsistently ("near Kyiv region",
//! "Bakhmut direction", "Irpin, Kyiv oblast"). [`resolve`] maps any such
//! string to one of the gazetteer's [`Hub`]s, or to [`Region::Other`]:
//!
//! 1. Lowercase and trim the input.
//! 2. If any hub name occurs as a substring, the first hub in gazetteer
//!    order wins.
//! 3. Otherwise, if any known town occurs as a substring, the first town in
//!    gazetteer order is attributed to its geographically nearest hub.
//! 4. Otherwise the location is [`Region::Other`].
//!
//! Matching is plain substring containment, so a short town name inside an
//! unrelated word still matches ("uman" in "humanitarian"). Aggregate
//! outputs depend on this behavior; do not tighten it to word boundaries.

use std::sync::LazyLock;

use serde::{Serialize, Serializer};
use strike_map_gazetteer::{Hub, TOWNS, Town};
use strike_map_geo::{Coordinate, distance_km};

/// Display name of the fallback region.
pub const OTHER: &str = "Other";

/// Lowercased hub names in gazetteer order, built once.
static HUB_KEYS: LazyLock<Vec<(Hub, String)>> = LazyLock::new(|| {
    Hub::all()
        .iter()
        .map(|hub| (*hub, hub.name().to_lowercase()))
        .collect()
});

/// The region an incident is attributed to: a hub or the `Other` fallback.
///
/// Orders by display name, so `"Other"` sorts between `"Odesa"` and
/// `"Sevastopol"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// One of the gazetteer hubs.
    Hub(Hub),
    /// Location could not be attributed to any hub.
    Other,
}

impl Region {
    /// Display name: the hub's canonical name or `"Other"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hub(hub) => hub.name(),
            Self::Other => OTHER,
        }
    }

    /// The hub, if this region is not [`Region::Other`].
    #[must_use]
    pub const fn hub(self) -> Option<Hub> {
        match self {
            Self::Hub(hub) => Some(hub),
            Self::Other => None,
        }
    }

    /// Plotting coordinate; `Other` has none.
    #[must_use]
    pub fn coordinate(self) -> Option<Coordinate> {
        self.hub().map(Hub::coordinate)
    }
}

impl From<Hub> for Region {
    fn from(hub: Hub) -> Self {
        Self::Hub(hub)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Region {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == OTHER {
            return Ok(Self::Other);
        }
        s.parse::<Hub>().map(Self::Hub)
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().cmp(other.name())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// How a location string was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MatchRule {
    /// A hub name occurred in the input.
    HubName,
    /// A known town occurred in the input and was attributed to the nearest
    /// hub.
    Town {
        /// Name of the matched town.
        town: &'static str,
        /// Distance from the town to the chosen hub, in kilometers.
        distance_km: f64,
    },
    /// Nothing matched.
    Unmatched,
}

/// A resolved region together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// The assigned region.
    pub region: Region,
    /// The rule that matched.
    #[serde(flatten)]
    pub rule: MatchRule,
}

/// Lowercases and trims a raw location string.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Resolves a free-text location to a region.
#[must_use]
pub fn resolve(raw: &str) -> Region {
    explain(raw).region
}

/// Resolves any displayable value by first coercing it to its string form.
#[must_use]
pub fn resolve_value(value: impl std::fmt::Display) -> Region {
    resolve(&value.to_string())
}

/// Resolves a location and reports which rule matched.
#[must_use]
pub fn explain(raw: &str) -> Resolution {
    let name = normalize(raw);

    if let Some(hub) = match_hub_name(&name) {
        return Resolution {
            region: Region::Hub(hub),
            rule: MatchRule::HubName,
        };
    }

    if let Some(town) = match_town(&name)
        && let Some((hub, distance_km)) = nearest_hub(town.coordinate)
    {
        log::trace!(
            "{raw:?} matched town {} -> {hub} ({distance_km:.1} km)",
            town.name
        );
        return Resolution {
            region: Region::Hub(hub),
            rule: MatchRule::Town {
                town: town.name,
                distance_km,
            },
        };
    }

    Resolution {
        region: Region::Other,
        rule: MatchRule::Unmatched,
    }
}

/// First hub, in gazetteer order, whose lowercased name occurs in the
/// already-normalized input.
#[must_use]
pub fn match_hub_name(normalized: &str) -> Option<Hub> {
    HUB_KEYS
        .iter()
        .find(|(_, key)| normalized.contains(key.as_str()))
        .map(|(hub, _)| *hub)
}

/// First town, in gazetteer order, whose name occurs in the
/// already-normalized input.
#[must_use]
pub fn match_town(normalized: &str) -> Option<&'static Town> {
    TOWNS.iter().find(|town| normalized.contains(town.name))
}

/// The hub closest to `target`, with its distance in kilometers.
///
/// Returns `None` only if no distance compares (e.g. a NaN coordinate).
#[must_use]
pub fn nearest_hub(target: Coordinate) -> Option<(Hub, f64)> {
    nearest(
        target,
        Hub::all().iter().map(|hub| (*hub, hub.coordinate())),
    )
}

/// Exhaustive nearest-neighbor search over `candidates`.
///
/// Uses strict less-than, so among equidistant candidates the first one
/// encountered is kept.
#[must_use]
pub fn nearest<T>(
    target: Coordinate,
    candidates: impl IntoIterator<Item = (T, Coordinate)>,
) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    let mut min_dist = f64::INFINITY;

    for (candidate, coordinate) in candidates {
        let dist = distance_km(target, coordinate);
        if dist < min_dist {
            min_dist = dist;
            best = Some((candidate, dist));
        }
    }

    best
}
