// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema resolution error types.

use std::fmt;

use crate::version::{FormatVersion, Platform};

/// Errors surfaced by catalog construction and schema resolution.
///
/// Every error here is deterministic: the same inputs always produce the same
/// error, so callers never retry. A field whose variants simply do not match
/// the requested context is *not* an error — it is omitted from the
/// enumeration (the field does not exist in that version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type declares structure variants, but none match the requested
    /// (version, platform). The type claims to exist yet has no layout for
    /// this context; treating it as zero-size would silently corrupt the
    /// chain's cumulative size, so this is fatal.
    NoMatchingVariant {
        /// Name of the offending record type.
        type_name: String,
        /// Requested format version.
        version: FormatVersion,
        /// Requested platform.
        platform: Platform,
    },

    /// A field lookup named a field that the type neither declares nor
    /// inherits. Programmer error; propagate immediately.
    FieldNotOwnedByType {
        /// Name of the queried record type.
        type_name: String,
        /// Name of the unknown field.
        field: String,
    },

    /// A name-based catalog lookup did not match any registered type.
    UnknownType(String),

    /// A declaration handed to the catalog builder is malformed (duplicate
    /// type or field name, unresolvable or cyclic parent, more than one
    /// default variant for a field).
    InvalidDeclaration(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoMatchingVariant {
                type_name,
                version,
                platform,
            } => write!(
                f,
                "no structure variant of '{}' matches {}/{}",
                type_name, version, platform
            ),
            Error::FieldNotOwnedByType { type_name, field } => write!(
                f,
                "type '{}' neither declares nor inherits field '{}'",
                type_name, field
            ),
            Error::UnknownType(name) => write!(f, "unknown record type: '{}'", name),
            Error::InvalidDeclaration(msg) => write!(f, "invalid declaration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for API results using the public [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
