//! The fixed attribute schema shared by query records, catalog records and
//! bulk rows.
//!
//! Scoring always walks [`AttributeKey::ALL`] in order. Keys a caller supplies
//! outside this set are never compared, no matter where they come from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of attributes in the schema.
pub const ATTRIBUTE_COUNT: usize = 24;

/// One of the closed set of attributes compared between records.
///
/// Wire names are camelCase (`planetName`, `stellarTeff`, ...) and are what
/// catalog files, form payloads and CSV headers use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKey {
    Radius,
    Density,
    Parsecs,
    PlanetMass,
    VMagnitude,
    OrbitalPeriod,
    Eccentricity,
    Insolation,
    EqTemp,
    StellarType,
    StellarTeff,
    StellarRadius,
    StellarMass,
    StellarMetallicity,
    StellarGravity,
    SystemDistance,
    SystemVmag,
    SystemKmag,
    SystemGaiaMag,
    Ra,
    Dec,
    HostName,
    PlanetName,
    DiscoveryMethod,
}

impl AttributeKey {
    /// Canonical ordered key list.
    pub const ALL: [AttributeKey; ATTRIBUTE_COUNT] = [
        AttributeKey::Radius,
        AttributeKey::Density,
        AttributeKey::Parsecs,
        AttributeKey::PlanetMass,
        AttributeKey::VMagnitude,
        AttributeKey::OrbitalPeriod,
        AttributeKey::Eccentricity,
        AttributeKey::Insolation,
        AttributeKey::EqTemp,
        AttributeKey::StellarType,
        AttributeKey::StellarTeff,
        AttributeKey::StellarRadius,
        AttributeKey::StellarMass,
        AttributeKey::StellarMetallicity,
        AttributeKey::StellarGravity,
        AttributeKey::SystemDistance,
        AttributeKey::SystemVmag,
        AttributeKey::SystemKmag,
        AttributeKey::SystemGaiaMag,
        AttributeKey::Ra,
        AttributeKey::Dec,
        AttributeKey::HostName,
        AttributeKey::PlanetName,
        AttributeKey::DiscoveryMethod,
    ];

    /// Wire name used in JSON objects and CSV headers.
    pub const fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Radius => "radius",
            AttributeKey::Density => "density",
            AttributeKey::Parsecs => "parsecs",
            AttributeKey::PlanetMass => "planetMass",
            AttributeKey::VMagnitude => "vMagnitude",
            AttributeKey::OrbitalPeriod => "orbitalPeriod",
            AttributeKey::Eccentricity => "eccentricity",
            AttributeKey::Insolation => "insolation",
            AttributeKey::EqTemp => "eqTemp",
            AttributeKey::StellarType => "stellarType",
            AttributeKey::StellarTeff => "stellarTeff",
            AttributeKey::StellarRadius => "stellarRadius",
            AttributeKey::StellarMass => "stellarMass",
            AttributeKey::StellarMetallicity => "stellarMetallicity",
            AttributeKey::StellarGravity => "stellarGravity",
            AttributeKey::SystemDistance => "systemDistance",
            AttributeKey::SystemVmag => "systemVmag",
            AttributeKey::SystemKmag => "systemKmag",
            AttributeKey::SystemGaiaMag => "systemGaiaMag",
            AttributeKey::Ra => "ra",
            AttributeKey::Dec => "dec",
            AttributeKey::HostName => "hostName",
            AttributeKey::PlanetName => "planetName",
            AttributeKey::DiscoveryMethod => "discoveryMethod",
        }
    }

    /// Position of this key in [`AttributeKey::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a key by its exact wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is not one of the schema's wire names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute key: {0}")]
pub struct UnknownAttributeKey(pub String);

impl FromStr for AttributeKey {
    type Err = UnknownAttributeKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| UnknownAttributeKey(s.to_string()))
    }
}

/// Wire names in schema order.
pub fn attribute_names() -> impl Iterator<Item = &'static str> {
    AttributeKey::ALL.iter().map(|key| key.as_str())
}
