#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Compiled-in reference coordinates for location resolution.
//!
//! The gazetteer is two closed sets: the 15 regional [`Hub`]s that incidents
//! are aggregated under, and the [`TOWNS`] list of smaller places that are
//! attributed to whichever hub lies nearest. Both are constant data; there
//! is no runtime mutation API. Declaration order is significant because the
//! resolver scans both sets front to back and stops at the first match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strike_map_geo::Coordinate;
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Number of hubs in the gazetteer.
pub const HUB_COUNT: usize = 15;

/// One of the fixed regional hubs incidents are aggregated under.
///
/// Includes hubs outside government-controlled territory (Donetsk,
/// Luhansk, Sevastopol, ...) since the dataset records strikes there too.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
pub enum Hub {
    Kyiv,
    Kharkiv,
    Odesa,
    Dnipro,
    Donetsk,
    Lviv,
    Zaporizhzhia,
    #[serde(rename = "Kryvyi Rih")]
    #[strum(serialize = "Kryvyi Rih")]
    KryvyiRih,
    Mykolaiv,
    Mariupol,
    Sevastopol,
    Luhansk,
    Vinnytsia,
    Makiivka,
    Simferopol,
}

impl Hub {
    /// Returns all hubs in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Kyiv,
            Self::Kharkiv,
            Self::Odesa,
            Self::Dnipro,
            Self::Donetsk,
            Self::Lviv,
            Self::Zaporizhzhia,
            Self::KryvyiRih,
            Self::Mykolaiv,
            Self::Mariupol,
            Self::Sevastopol,
            Self::Luhansk,
            Self::Vinnytsia,
            Self::Makiivka,
            Self::Simferopol,
        ]
    }

    /// Canonical display name (e.g. `"Kryvyi Rih"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// City-center coordinate of the hub.
    #[must_use]
    pub const fn coordinate(self) -> Coordinate {
        match self {
            Self::Kyiv => Coordinate::new(50.4501, 30.5234),
            Self::Kharkiv => Coordinate::new(49.9935, 36.2304),
            Self::Odesa => Coordinate::new(46.4825, 30.7233),
            Self::Dnipro => Coordinate::new(48.4647, 35.0462),
            Self::Donetsk => Coordinate::new(48.0159, 37.8028),
            Self::Lviv => Coordinate::new(49.8397, 24.0297),
            Self::Zaporizhzhia => Coordinate::new(47.8388, 35.1396),
            Self::KryvyiRih => Coordinate::new(47.9105, 33.3918),
            Self::Mykolaiv => Coordinate::new(46.9750, 31.9946),
            Self::Mariupol => Coordinate::new(47.0971, 37.5434),
            Self::Sevastopol => Coordinate::new(44.6166, 33.5254),
            Self::Luhansk => Coordinate::new(48.5740, 39.3078),
            Self::Vinnytsia => Coordinate::new(49.2331, 28.4682),
            Self::Makiivka => Coordinate::new(48.0556, 37.9615),
            Self::Simferopol => Coordinate::new(44.9572, 34.1108),
        }
    }
}

/// Heading a town is listed under. Only used for display.
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
#[serde(rename_all = "snake_case")]
pub enum TownGroup {
    #[strum(serialize = "Kyiv region")]
    KyivRegion,
    #[strum(serialize = "Donetsk region")]
    DonetskRegion,
    #[strum(serialize = "Luhansk region")]
    LuhanskRegion,
    #[strum(serialize = "South")]
    South,
    #[strum(serialize = "Kharkiv/Sumy/Central")]
    KharkivSumyCentral,
    #[strum(serialize = "West")]
    West,
}

/// A smaller place that is attributed to its nearest [`Hub`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Town {
    /// Lowercase name, matched as a substring of normalized input.
    pub name: &'static str,
    /// Heading the town is listed under.
    pub group: TownGroup,
    /// Town-center coordinate.
    pub coordinate: Coordinate,
}

const fn town(name: &'static str, group: TownGroup, latitude: f64, longitude: f64) -> Town {
    Town {
        name,
        group,
        coordinate: Coordinate::new(latitude, longitude),
    }
}

/// Known towns, scanned in this order by the resolver.
pub const TOWNS: &[Town] = &[
    // ── Kyiv region ─────────────────────────────────────
    town("bucha", TownGroup::KyivRegion, 50.5444, 30.2105),
    town("irpin", TownGroup::KyivRegion, 50.5167, 30.2500),
    town("boryspil", TownGroup::KyivRegion, 50.3425, 30.9511),
    town("bila tserkva", TownGroup::KyivRegion, 49.8044, 30.1288),
    // ── Donetsk region ──────────────────────────────────
    town("bakhmut", TownGroup::DonetskRegion, 48.5987, 38.0000),
    town("soledar", TownGroup::DonetskRegion, 48.6953, 38.0667),
    town("avdiivka", TownGroup::DonetskRegion, 48.1397, 37.7497),
    town("kramatorsk", TownGroup::DonetskRegion, 48.7392, 37.5839),
    town("sloviansk", TownGroup::DonetskRegion, 48.8500, 37.6167),
    town("volnovakha", TownGroup::DonetskRegion, 47.5833, 37.5000),
    town("lyman", TownGroup::DonetskRegion, 48.9833, 37.8000),
    // ── Luhansk region ──────────────────────────────────
    town("sievierodonetsk", TownGroup::LuhanskRegion, 48.9481, 38.4933),
    town("lysychansk", TownGroup::LuhanskRegion, 48.9167, 38.4333),
    town("kreminna", TownGroup::LuhanskRegion, 49.0500, 38.2167),
    // ── South ───────────────────────────────────────────
    town("melitopol", TownGroup::South, 46.8489, 35.3675),
    town("berdiansk", TownGroup::South, 46.7556, 36.7889),
    town("enerhodar", TownGroup::South, 47.4989, 34.6558),
    town("tokmak", TownGroup::South, 47.2500, 35.7000),
    town("kherson", TownGroup::South, 46.6354, 32.6169),
    town("nova kakhovka", TownGroup::South, 46.7667, 33.3667),
    town("ochakiv", TownGroup::South, 46.6167, 31.5500),
    // ── Kharkiv / Sumy / Central ────────────────────────
    town("izium", TownGroup::KharkivSumyCentral, 49.2000, 37.2833),
    town("kupiansk", TownGroup::KharkivSumyCentral, 49.7167, 37.6167),
    town("chuhuiv", TownGroup::KharkivSumyCentral, 49.8333, 36.6833),
    town("sumy", TownGroup::KharkivSumyCentral, 50.9077, 34.7981),
    town("okhtyrka", TownGroup::KharkivSumyCentral, 50.3167, 34.8833),
    town("poltava", TownGroup::KharkivSumyCentral, 49.5883, 34.5514),
    town("zhytomyr", TownGroup::KharkivSumyCentral, 50.2547, 28.6587),
    town("cherkasy", TownGroup::KharkivSumyCentral, 49.4444, 32.0597),
    town("uman", TownGroup::KharkivSumyCentral, 48.7484, 30.2218),
    town("kremenchuk", TownGroup::KharkivSumyCentral, 49.0631, 33.4040),
    // ── West ────────────────────────────────────────────
    town("lutsk", TownGroup::West, 50.7472, 25.3253),
    town("rivne", TownGroup::West, 50.6199, 26.2516),
    town("ternopil", TownGroup::West, 49.5535, 25.5948),
    town("ivano-frankivsk", TownGroup::West, 48.9226, 24.7111),
    town("uzhhorod", TownGroup::West, 48.6208, 22.2879),
    town("chernivtsi", TownGroup::West, 48.2917, 25.9356),
    town("khmelnytskyi", TownGroup::West, 49.4230, 26.9871),
];

/// Looks up a town by exact (case-insensitive, trimmed) name.
#[must_use]
pub fn find_town(name: &str) -> Option<&'static Town> {
    let key = name.trim().to_lowercase();
    TOWNS.iter().find(|t| t.name == key)
}

/// Problems detected by [`validate`].
#[derive(Debug, Error, PartialEq)]
pub enum GazetteerError {
    /// The hub set does not have exactly [`HUB_COUNT`] entries.
    #[error("expected {HUB_COUNT} hubs, found {found}")]
    HubCount {
        /// Number of hubs present.
        found: usize,
    },

    /// The town set is empty.
    #[error("town list is empty")]
    NoTowns,

    /// A coordinate is outside the valid latitude/longitude ranges.
    #[error("{name} has an invalid coordinate ({coordinate})")]
    InvalidCoordinate {
        /// Hub or town name.
        name: String,
        /// The offending coordinate.
        coordinate: Coordinate,
    },

    /// A town name is not lowercase and trimmed, so it could never match
    /// normalized input.
    #[error("town name {name:?} is not normalized")]
    UnnormalizedTownName {
        /// The offending name.
        name: String,
    },

    /// The same town name appears more than once.
    #[error("town {name:?} is listed more than once")]
    DuplicateTown {
        /// The duplicated name.
        name: String,
    },
}

/// Startup sanity check over the compiled-in tables.
///
/// # Errors
///
/// Returns the first [`GazetteerError`] found.
pub fn validate() -> Result<(), GazetteerError> {
    validate_tables(Hub::all(), TOWNS)
}

fn validate_tables(hubs: &[Hub], towns: &[Town]) -> Result<(), GazetteerError> {
    if hubs.len() != HUB_COUNT {
        return Err(GazetteerError::HubCount { found: hubs.len() });
    }
    if towns.is_empty() {
        return Err(GazetteerError::NoTowns);
    }

    for hub in hubs {
        let coordinate = hub.coordinate();
        if !coordinate.is_valid() {
            return Err(GazetteerError::InvalidCoordinate {
                name: hub.name().to_string(),
                coordinate,
            });
        }
    }

    let mut seen = BTreeSet::new();
    for town in towns {
        if !town.coordinate.is_valid() {
            return Err(GazetteerError::InvalidCoordinate {
                name: town.name.to_string(),
                coordinate: town.coordinate,
            });
        }
        if town.name.is_empty()
            || town.name.trim() != town.name
            || town.name.to_lowercase() != town.name
        {
            return Err(GazetteerError::UnnormalizedTownName {
                name: town.name.to_string(),
            });
        }
        if !seen.insert(town.name) {
            return Err(GazetteerError::DuplicateTown {
                name: town.name.to_string(),
            });
        }
    }

    Ok(())
}
