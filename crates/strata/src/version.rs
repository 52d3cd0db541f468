// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Closed version and platform axes used as schema resolution keys.
//!
//! The container format shipped in a fixed series of revisions, each with its
//! own physical record layouts. [`FormatVersion`] enumerates them in release
//! order, [`Platform`] distinguishes the original target from the remaster,
//! and [`Generation`] groups revisions coarsely for predicates that do not
//! care about individual builds. All three sets are fixed at compile time;
//! resolution never discovers new members at runtime.

use std::fmt;
use std::str::FromStr;

/// One shipped revision of the binary container format.
///
/// Ordering follows release order, so range predicates can use plain
/// comparisons (`Retail <= v && v <= Online700`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatVersion {
    /// Pre-release build; earliest layout still readable.
    Alpha,
    /// Initial retail release.
    Retail,
    /// Retail PC port.
    RetailPc,
    /// First expansion.
    Expansion1,
    /// Second expansion.
    Expansion2,
    /// Online service closed beta.
    OnlineBeta,
    /// Online service build 1.106.
    Online106,
    /// Online service build 2.35.
    Online235,
    /// Online service build 4.54.
    Online454,
    /// Online service build 7.0 (final online revision).
    Online700,
    /// Re-release of the series on the modern engine.
    Redux,
    /// Post-launch update to the re-release.
    ReduxUpdate,
}

impl FormatVersion {
    /// Every supported version, in release order.
    ///
    /// Used to enumerate cache partitions eagerly; resolution is closed over
    /// this set.
    pub const ALL: [Self; 12] = [
        Self::Alpha,
        Self::Retail,
        Self::RetailPc,
        Self::Expansion1,
        Self::Expansion2,
        Self::OnlineBeta,
        Self::Online106,
        Self::Online235,
        Self::Online454,
        Self::Online700,
        Self::Redux,
        Self::ReduxUpdate,
    ];

    /// Coarse generation this version belongs to.
    pub fn generation(self) -> Generation {
        match self {
            Self::Alpha | Self::Retail | Self::RetailPc => Generation::First,
            Self::Expansion1 | Self::Expansion2 => Generation::Second,
            Self::OnlineBeta
            | Self::Online106
            | Self::Online235
            | Self::Online454
            | Self::Online700 => Generation::Online,
            Self::Redux | Self::ReduxUpdate => Generation::Third,
        }
    }

    /// Inclusive range test with open bounds.
    ///
    /// `None` on either side means unbounded.
    pub fn is_between(self, min: Option<Self>, max: Option<Self>) -> bool {
        if let Some(min) = min {
            if self < min {
                return false;
            }
        }
        if let Some(max) = max {
            if self > max {
                return false;
            }
        }
        true
    }

    /// Stable lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Retail => "retail",
            Self::RetailPc => "retail_pc",
            Self::Expansion1 => "expansion1",
            Self::Expansion2 => "expansion2",
            Self::OnlineBeta => "online_beta",
            Self::Online106 => "online106",
            Self::Online235 => "online235",
            Self::Online454 => "online454",
            Self::Online700 => "online700",
            Self::Redux => "redux",
            Self::ReduxUpdate => "redux_update",
        }
    }

    /// Parse a version from its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseError::new("format version", s))
    }
}

/// Target platform axis, independent from [`FormatVersion`].
///
/// The same version can have two distinct physical layouts depending on which
/// platform the container was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    /// Original shipping target.
    Original,
    /// Certified remaster target.
    Remaster,
}

impl Platform {
    /// Both supported platforms.
    pub const ALL: [Self; 2] = [Self::Original, Self::Remaster];

    /// Stable lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Remaster => "remaster",
        }
    }

    /// Parse a platform from its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseError::new("platform", s))
    }
}

/// Coarse grouping of versions, usable in predicates instead of ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Generation {
    /// Alpha through the retail PC port.
    First,
    /// The two expansions.
    Second,
    /// Every online service build.
    Online,
    /// The re-release and its updates.
    Third,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Online => "online",
            Self::Third => "third",
        };
        f.write_str(name)
    }
}

/// Failure to parse a version-space name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    axis: &'static str,
    input: String,
}

impl ParseError {
    fn new(axis: &'static str, input: &str) -> Self {
        Self {
            axis,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.axis, self.input)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_order_follows_release_order() {
        for pair in FormatVersion::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_generation_mapping_is_total_and_grouped() {
        use FormatVersion::*;
        let expected = [
            (Alpha, Generation::First),
            (Retail, Generation::First),
            (RetailPc, Generation::First),
            (Expansion1, Generation::Second),
            (Expansion2, Generation::Second),
            (OnlineBeta, Generation::Online),
            (Online106, Generation::Online),
            (Online235, Generation::Online),
            (Online454, Generation::Online),
            (Online700, Generation::Online),
            (Redux, Generation::Third),
            (ReduxUpdate, Generation::Third),
        ];
        assert_eq!(expected.len(), FormatVersion::ALL.len());
        for (version, generation) in expected {
            assert_eq!(version.generation(), generation);
        }
    }

    #[test]
    fn test_is_between_bounds() {
        use FormatVersion::*;
        assert!(Online106.is_between(None, None));
        assert!(Online106.is_between(Some(Retail), Some(Online700)));
        assert!(Online106.is_between(Some(Online106), Some(Online106)));
        assert!(!Online106.is_between(Some(Online235), None));
        assert!(!Online106.is_between(None, Some(OnlineBeta)));
    }

    #[test]
    fn test_name_round_trip() {
        for version in FormatVersion::ALL {
            assert_eq!(FormatVersion::from_name(version.name()), Some(version));
            assert_eq!(version.name().parse::<FormatVersion>(), Ok(version));
        }
        for platform in Platform::ALL {
            assert_eq!(Platform::from_name(platform.name()), Some(platform));
        }
    }

    #[test]
    fn test_parse_error_reports_axis_and_input() {
        let err = "retail2".parse::<FormatVersion>().unwrap_err();
        assert_eq!(err.to_string(), "unknown format version: 'retail2'");
        let err = "dreamcast".parse::<Platform>().unwrap_err();
        assert_eq!(err.to_string(), "unknown platform: 'dreamcast'");
    }
}
