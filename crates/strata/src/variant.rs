// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variant declarations: candidate layouts guarded by applicability predicates.
//!
//! A record type declares one [`StructVariant`] per layout it has ever had,
//! and each logical field declares one [`FieldVariant`] per historical shape.
//! Resolution evaluates the attached [`Applicability`] predicates against a
//! concrete (version, platform) target and picks the first declared match.

use std::fmt;
use std::sync::Arc;

use crate::version::{FormatVersion, Generation, Platform};

/// Marshaling flags carried by a field variant.
///
/// Plain bit set; combine with [`FieldFlags::with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FieldFlags(pub u16);

impl FieldFlags {
    /// Bytes present in the stream but excluded from the logical model.
    pub const PADDING: Self = Self(0x0001);

    /// Field value is used for display, not as a layout hint.
    pub const LABEL: Self = Self(0x0002);

    /// Present in memory but never read or written from the stream.
    pub const RUNTIME: Self = Self(0x0004);

    /// Empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if flag is set
    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// Union of two flag sets.
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }
}

/// Four-character code identifying a record type in the container directory.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagCode(pub [u8; 4]);

impl TagCode {
    /// Wrap a four-byte code, e.g. `TagCode::new(*b"sbsp")`.
    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }
}

impl fmt::Display for TagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '?'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagCode({})", self)
    }
}

/// Conjunction of optional constraints deciding whether a variant applies to
/// a (version, platform) target.
///
/// A predicate with no constraints matches every target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Applicability {
    /// Matches only versions at or above this one.
    pub min: Option<FormatVersion>,
    /// Matches only versions at or below this one.
    pub max: Option<FormatVersion>,
    /// Matches exactly this version.
    pub exact: Option<FormatVersion>,
    /// Matches only this platform.
    pub platform: Option<Platform>,
    /// Matches only versions of this generation.
    pub generation: Option<Generation>,
}

impl Applicability {
    /// The unconstrained predicate: matches every (version, platform).
    pub const ANY: Self = Self {
        min: None,
        max: None,
        exact: None,
        platform: None,
        generation: None,
    };

    /// Evaluate the conjunction against a concrete target.
    pub fn matches(&self, version: FormatVersion, platform: Platform) -> bool {
        if let Some(exact) = self.exact {
            if version != exact {
                return false;
            }
        }
        if !version.is_between(self.min, self.max) {
            return false;
        }
        if let Some(required) = self.platform {
            if platform != required {
                return false;
            }
        }
        if let Some(required) = self.generation {
            if version.generation() != required {
                return false;
            }
        }
        true
    }

    /// True when no constraint is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::ANY
    }
}

/// One declared candidate layout for a whole record structure.
///
/// Carries the record's display name and directory tag code alongside the
/// declared byte size, since both have changed across format revisions.
#[derive(Debug, Clone)]
pub struct StructVariant {
    /// Display name of the record in this revision.
    pub name: Arc<str>,
    /// Directory tag code in this revision.
    pub tag: TagCode,
    /// Declared total byte size of this link's layout.
    pub size: u32,
    /// When this layout applies.
    pub applies: Applicability,
}

impl StructVariant {
    /// Declare a layout that applies everywhere until narrowed by the
    /// predicate setters below.
    pub fn new(name: impl Into<Arc<str>>, tag: [u8; 4], size: u32) -> Self {
        Self {
            name: name.into(),
            tag: TagCode::new(tag),
            size,
            applies: Applicability::ANY,
        }
    }

    /// Restrict to versions at or above `version`.
    pub fn min_version(mut self, version: FormatVersion) -> Self {
        self.applies.min = Some(version);
        self
    }

    /// Restrict to versions at or below `version`.
    pub fn max_version(mut self, version: FormatVersion) -> Self {
        self.applies.max = Some(version);
        self
    }

    /// Restrict to exactly `version`.
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.applies.exact = Some(version);
        self
    }

    /// Restrict to one platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.applies.platform = Some(platform);
        self
    }

    /// Restrict to one generation.
    pub fn generation(mut self, generation: Generation) -> Self {
        self.applies.generation = Some(generation);
        self
    }

    /// Whether this variant applies to the target.
    pub fn matches(&self, version: FormatVersion, platform: Platform) -> bool {
        self.applies.matches(version, platform)
    }
}

/// One declared candidate shape for a logical field.
///
/// A variant constructed without any predicate setter is the field's
/// *default*: it is only considered after every predicated variant has failed
/// to match, and at most one default may be declared per field.
#[derive(Debug, Clone)]
pub struct FieldVariant {
    /// Byte size of one element.
    pub size: u32,
    /// Element count; 1 for scalars, the run length for padding and inline
    /// arrays.
    pub count: u32,
    /// Alignment requirement for offset computation, if any.
    pub align: Option<u32>,
    /// Marshaling flags.
    pub flags: FieldFlags,
    /// Applicability predicate; `None` marks the default fallback variant.
    pub applies: Option<Applicability>,
}

impl FieldVariant {
    /// A scalar field occupying `size` bytes in the stream.
    pub fn bytes(size: u32) -> Self {
        Self {
            size,
            count: 1,
            align: None,
            flags: FieldFlags::empty(),
            applies: None,
        }
    }

    /// A run of `count` padding bytes: present in the stream, hidden from the
    /// logical model.
    pub fn padding(count: u32) -> Self {
        Self {
            size: 1,
            count,
            align: None,
            flags: FieldFlags::PADDING,
            applies: None,
        }
    }

    /// An inline array of `count` elements of `size` bytes each.
    pub fn array(size: u32, count: u32) -> Self {
        Self {
            size,
            count,
            align: None,
            flags: FieldFlags::empty(),
            applies: None,
        }
    }

    /// A runtime-only field: present in memory, never in the stream.
    pub fn runtime() -> Self {
        Self {
            size: 0,
            count: 1,
            align: None,
            flags: FieldFlags::RUNTIME,
            applies: None,
        }
    }

    /// Add a marshaling flag.
    pub fn flag(mut self, flag: FieldFlags) -> Self {
        self.flags = self.flags.with(flag);
        self
    }

    /// Require the field to start on an `align`-byte boundary.
    pub fn align(mut self, align: u32) -> Self {
        self.align = Some(align);
        self
    }

    /// Restrict to versions at or above `version`.
    pub fn min_version(mut self, version: FormatVersion) -> Self {
        self.applies.get_or_insert(Applicability::ANY).min = Some(version);
        self
    }

    /// Restrict to versions at or below `version`.
    pub fn max_version(mut self, version: FormatVersion) -> Self {
        self.applies.get_or_insert(Applicability::ANY).max = Some(version);
        self
    }

    /// Restrict to exactly `version`.
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.applies.get_or_insert(Applicability::ANY).exact = Some(version);
        self
    }

    /// Restrict to one platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.applies.get_or_insert(Applicability::ANY).platform = Some(platform);
        self
    }

    /// Restrict to one generation.
    pub fn generation(mut self, generation: Generation) -> Self {
        self.applies.get_or_insert(Applicability::ANY).generation = Some(generation);
        self
    }

    /// True for the predicate-less default fallback variant.
    pub fn is_default(&self) -> bool {
        self.applies.is_none()
    }

    /// Whether this variant's *predicate* matches the target.
    ///
    /// The default variant has no predicate and always returns false here;
    /// it is selected by the fallback step of resolution, never by matching.
    pub fn matches(&self, version: FormatVersion, platform: Platform) -> bool {
        match self.applies {
            Some(applies) => applies.matches(version, platform),
            None => false,
        }
    }

    /// Bytes this field occupies in the stream.
    pub fn byte_len(&self) -> u32 {
        if self.flags.contains(FieldFlags::RUNTIME) {
            0
        } else {
            self.size * self.count
        }
    }
}
