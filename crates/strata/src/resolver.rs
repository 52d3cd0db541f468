// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema resolution: pick the winning variants for a concrete target.
//!
//! Resolution is a pure function of the declared catalog: identical
//! (type, version, platform) inputs always produce identical outputs.
//! Variants are evaluated in declaration order and the first match wins.
//!
//! Structure and field resolution deliberately fail differently. A chain
//! link that declares structure variants but matches none is a fatal
//! [`Error::NoMatchingVariant`] — the layout would otherwise be summed
//! wrong. A field that matches no variant and has no default is simply
//! omitted: the field does not exist in that revision.

use std::sync::Arc;

use crate::catalog::{TypeCatalog, TypeId};
use crate::error::{Error, Result};
use crate::variant::{FieldVariant, StructVariant};
use crate::version::{FormatVersion, Platform};

/// One contributing link of a resolved inheritance chain.
#[derive(Debug, Clone)]
pub struct ChainLink {
    /// The type contributing this stretch of the layout.
    pub type_id: TypeId,
    /// Its winning structure variant.
    pub variant: StructVariant,
}

/// The resolved structure layout for one (type, version, platform).
#[derive(Debug, Clone)]
pub struct ResolvedStruct {
    /// The most-derived type this resolution was requested for.
    pub type_id: TypeId,
    /// Requested format version.
    pub version: FormatVersion,
    /// Requested platform.
    pub platform: Platform,
    /// Contributing links, most-derived first. Chain links that declare no
    /// structure variants carry no layout and are absent, not zero-sized.
    pub chain: Vec<ChainLink>,
    /// Sum of the winning variant sizes across the whole chain.
    pub total_size: u32,
}

/// One entry of a resolved field enumeration.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Field identity, stable across all variants of the field.
    pub name: Arc<str>,
    /// The chain link that declares the field.
    pub owner: TypeId,
    /// Its winning variant for the requested target.
    pub variant: FieldVariant,
}

/// Ordered field enumeration for one (type, version, platform).
///
/// Fields appear base-most link first, then each more-derived link's fields
/// in declaration order — the order marshaling code walks the stream in.
/// Fields with no matching variant and no default are absent.
#[derive(Debug, Clone)]
pub struct ResolvedFields {
    type_id: TypeId,
    version: FormatVersion,
    platform: Platform,
    fields: Vec<ResolvedField>,
}

impl ResolvedFields {
    /// The most-derived type this enumeration was requested for.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Requested format version.
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Requested platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Number of fields present in this revision.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field survived resolution.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in marshaling order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedField> {
        self.fields.iter()
    }

    /// Find a field by name.
    pub fn get(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Bytes the enumerated fields occupy in the stream (runtime-only
    /// fields contribute zero).
    pub fn stream_len(&self) -> u32 {
        self.fields.iter().map(|f| f.variant.byte_len()).sum()
    }
}

impl<'a> IntoIterator for &'a ResolvedFields {
    type Item = &'a ResolvedField;
    type IntoIter = std::slice::Iter<'a, ResolvedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Resolve the structure layout of `id` for a concrete target.
///
/// Walks the inheritance chain from the most-derived type to the root. Links
/// that declare no structure variants are skipped silently; links that
/// declare variants but match none abort the resolution.
///
/// # Errors
///
/// [`Error::NoMatchingVariant`] when a chain link has structure variants
/// declared and none matches the target.
pub fn resolve_structure(
    catalog: &TypeCatalog,
    id: TypeId,
    version: FormatVersion,
    platform: Platform,
) -> Result<ResolvedStruct> {
    let mut chain = Vec::new();
    let mut total_size = 0u32;

    for link in catalog.chain(id) {
        let def = catalog.get(link);
        if def.struct_variants().is_empty() {
            continue;
        }
        let winner = def
            .struct_variants()
            .iter()
            .find(|v| v.matches(version, platform))
            .ok_or_else(|| Error::NoMatchingVariant {
                type_name: def.name().to_string(),
                version,
                platform,
            })?;
        total_size += winner.size;
        chain.push(ChainLink {
            type_id: link,
            variant: winner.clone(),
        });
    }

    log::trace!(
        "resolved structure '{}' at {}/{}: {} links, {} bytes",
        catalog.get(id).name(),
        version,
        platform,
        chain.len(),
        total_size
    );

    Ok(ResolvedStruct {
        type_id: id,
        version,
        platform,
        chain,
        total_size,
    })
}

/// Resolve the ordered field enumeration of `id` for a concrete target.
///
/// Per field, the first variant whose predicate matches wins; with no match
/// the declared default wins; with neither the field is omitted. Inherited
/// fields enumerate before the declaring type's own.
pub fn resolve_fields(
    catalog: &TypeCatalog,
    id: TypeId,
    version: FormatVersion,
    platform: Platform,
) -> ResolvedFields {
    let mut links: Vec<TypeId> = catalog.chain(id).collect();
    links.reverse();

    let mut fields = Vec::new();
    for link in links {
        for def in catalog.get(link).fields() {
            if let Some(winner) = select_field_variant(def.variants(), version, platform) {
                fields.push(ResolvedField {
                    name: def.shared_name(),
                    owner: link,
                    variant: winner.clone(),
                });
            }
        }
    }

    log::trace!(
        "resolved fields of '{}' at {}/{}: {} present",
        catalog.get(id).name(),
        version,
        platform,
        fields.len()
    );

    ResolvedFields {
        type_id: id,
        version,
        platform,
        fields,
    }
}

/// The winning structure variant of the most-derived type alone.
///
/// This is a metadata query (current name and tag code of the record), not a
/// layout computation: it returns `None` both when the type declares no
/// structure variants and when none matches, unlike [`resolve_structure`].
pub fn structure_attribute<'a>(
    catalog: &'a TypeCatalog,
    id: TypeId,
    version: FormatVersion,
    platform: Platform,
) -> Option<&'a StructVariant> {
    catalog
        .get(id)
        .struct_variants()
        .iter()
        .find(|v| v.matches(version, platform))
}

/// Cumulative structure size across the inheritance chain.
///
/// # Errors
///
/// Same as [`resolve_structure`].
pub fn structure_size(
    catalog: &TypeCatalog,
    id: TypeId,
    version: FormatVersion,
    platform: Platform,
) -> Result<u32> {
    Ok(resolve_structure(catalog, id, version, platform)?.total_size)
}

/// Resolve one field's winning variant.
///
/// `Ok(None)` means the field exists in the catalog but not in this revision
/// (no match, no default).
///
/// # Errors
///
/// [`Error::FieldNotOwnedByType`] when `id` neither declares nor inherits a
/// field named `field`.
pub fn field_variant<'a>(
    catalog: &'a TypeCatalog,
    id: TypeId,
    field: &str,
    version: FormatVersion,
    platform: Platform,
) -> Result<Option<&'a FieldVariant>> {
    let Some((_, def)) = catalog.find_field(id, field) else {
        return Err(Error::FieldNotOwnedByType {
            type_name: catalog.get(id).name().to_string(),
            field: field.to_string(),
        });
    };
    Ok(select_field_variant(def.variants(), version, platform))
}

fn select_field_variant<'a>(
    variants: &'a [FieldVariant],
    version: FormatVersion,
    platform: Platform,
) -> Option<&'a FieldVariant> {
    variants
        .iter()
        .find(|v| v.matches(version, platform))
        .or_else(|| variants.iter().find(|v| v.is_default()))
}
