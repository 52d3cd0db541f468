// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Strata - Versioned Binary Schema Resolution
//!
//! A record type in a long-lived binary container rarely has *one* layout:
//! field sizes change, fields appear and disappear, padding moves, and the
//! remaster lays things out differently than the original. Strata lets one
//! logical record type declare every layout it has ever had, then resolves
//! the winning layout for a concrete (format version, platform) target —
//! once — and serves every later lookup from a concurrent cache.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::{
//!     FieldVariant, FormatVersion, Platform, RecordTypeBuilder, SchemaCache, StructVariant,
//!     TypeCatalog,
//! };
//!
//! fn main() -> strata::Result<()> {
//!     let catalog = TypeCatalog::builder()
//!         .register(
//!             RecordTypeBuilder::new("instanced_geometry")
//!                 .variant(
//!                     StructVariant::new("instanced_geometry", *b"igeo", 0xB8)
//!                         .max_version(FormatVersion::Online700),
//!                 )
//!                 .variant(
//!                     StructVariant::new("instanced_geometry", *b"igeo", 0xC8)
//!                         .min_version(FormatVersion::Redux),
//!                 )
//!                 .field("checksum", FieldVariant::bytes(4))
//!                 .field(
//!                     "bounds_radius",
//!                     FieldVariant::bytes(4).max_version(FormatVersion::Online700),
//!                 ),
//!         )
//!         .build()?;
//!
//!     let cache = SchemaCache::new(Arc::new(catalog));
//!     let id = cache.catalog().require("instanced_geometry")?;
//!
//!     // Resolve once; every later call for this target is a cache hit.
//!     let size = cache.structure_size(id, FormatVersion::Redux, Platform::Original)?;
//!     assert_eq!(size, 0xC8);
//!
//!     let fields = cache.field_enumeration(id, FormatVersion::Redux, Platform::Original);
//!     assert_eq!(fields.len(), 1); // bounds_radius left the format after Online700
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                    Consumers (external)                      |
//! |      record readers/writers iterating resolved fields        |
//! +--------------------------------------------------------------+
//! |  SchemaCache   one partition per (version, platform);        |
//! |                at-most-once resolution per key               |
//! +--------------------------------------------------------------+
//! |  Resolver      first-match variant selection, chain walk,    |
//! |                cumulative size                               |
//! +--------------------------------------------------------------+
//! |  TypeCatalog   frozen variant declarations (builder-built)   |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeCatalog`] | Frozen table of every record type's declared variants |
//! | [`SchemaCache`] | Concurrent memoization of resolution results |
//! | [`StructVariant`] | One candidate structure layout plus its predicate |
//! | [`FieldVariant`] | One candidate field shape plus its predicate |
//! | [`ResolvedFields`] | Ordered field enumeration for one target |
//!
//! ## Modules Overview
//!
//! - [`version`] - the closed version/platform/generation axes
//! - [`variant`] - variant declarations and applicability predicates
//! - [`catalog`] - the static type catalog and its builders
//! - [`resolver`] - uncached resolution primitives
//! - [`cache`] - the concurrent resolution cache

pub mod cache;
pub mod catalog;
pub mod error;
pub mod resolver;
pub mod variant;
pub mod version;

pub use cache::{LookupStats, SchemaCache};
pub use catalog::{
    CatalogBuilder, Chain, FieldDef, RecordTypeBuilder, RecordTypeDef, TypeCatalog, TypeId,
};
pub use error::{Error, Result};
pub use resolver::{
    field_variant, resolve_fields, resolve_structure, structure_attribute, structure_size,
    ChainLink, ResolvedField, ResolvedFields, ResolvedStruct,
};
pub use variant::{Applicability, FieldFlags, FieldVariant, StructVariant, TagCode};
pub use version::{FormatVersion, Generation, Platform};
