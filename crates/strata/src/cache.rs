// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent memoization of schema resolution results.
//!
//! The `SchemaCache` ensures that the variant-matching work in
//! [`crate::resolver`] happens at most once per (type, version, platform)
//! combination, however many threads ask. One partition exists per
//! (version, platform) pair — created eagerly, since both axes are small
//! closed enums — and each partition keeps three independent maps: winning
//! structure variant, resolved structure info, resolved field enumeration.
//! Entries are never evicted; the key space is bounded by the finite
//! type × version × platform product.
//!
//! Lookups take an uncontended read-lock fast path. On a miss the partition
//! lock is taken for writing, existence is re-checked (another thread may
//! have finished first), and only then is the resolver invoked and the
//! result published behind an `Arc`. Failed resolutions are not stored:
//! resolution is deterministic, so a retry recomputes the identical error.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{TypeCatalog, TypeId};
use crate::error::Result;
use crate::resolver;
use crate::resolver::{ResolvedFields, ResolvedStruct};
use crate::variant::StructVariant;
use crate::version::{FormatVersion, Platform};

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
}

/// Per-(version, platform) memoization maps.
///
/// Mirrors the three resolution products; each map has its own lock so an
/// expensive field enumeration never blocks a structure-size lookup.
struct Partition {
    attributes: RwLock<HashMap<TypeId, Option<Arc<StructVariant>>>>,
    structures: RwLock<HashMap<TypeId, Arc<ResolvedStruct>>>,
    fields: RwLock<HashMap<TypeId, Arc<ResolvedFields>>>,
}

impl Partition {
    fn new() -> Self {
        Self {
            attributes: RwLock::new(HashMap::new()),
            structures: RwLock::new(HashMap::new()),
            fields: RwLock::new(HashMap::new()),
        }
    }
}

/// Process-wide resolution cache over one frozen [`TypeCatalog`].
///
/// Owned by the consumer and shared via `Arc`; there is no global state.
/// All methods are safe for concurrent use, and for any single key the
/// underlying resolution runs exactly once — every caller observes the same
/// published `Arc`.
pub struct SchemaCache {
    catalog: Arc<TypeCatalog>,
    partitions: Vec<Partition>,
    stats: RwLock<LookupStats>,
}

impl SchemaCache {
    /// Create a cache with one (empty) partition per (version, platform).
    #[must_use]
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        let count = FormatVersion::ALL.len() * Platform::ALL.len();
        Self {
            catalog,
            partitions: (0..count).map(|_| Partition::new()).collect(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// The catalog this cache resolves against.
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    fn partition(&self, version: FormatVersion, platform: Platform) -> &Partition {
        &self.partitions[version as usize * Platform::ALL.len() + platform as usize]
    }

    /// Cached form of [`resolver::resolve_structure`].
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::NoMatchingVariant`]; errors are recomputed,
    /// never cached.
    pub fn structure_info(
        &self,
        id: TypeId,
        version: FormatVersion,
        platform: Platform,
    ) -> Result<Arc<ResolvedStruct>> {
        let partition = self.partition(version, platform);

        if let Some(hit) = partition.structures.read().get(&id) {
            self.record_hit();
            return Ok(Arc::clone(hit));
        }

        let mut map = partition.structures.write();
        if let Some(hit) = map.get(&id) {
            self.record_hit();
            return Ok(Arc::clone(hit));
        }

        let info = Arc::new(resolver::resolve_structure(
            &self.catalog,
            id,
            version,
            platform,
        )?);
        log::debug!(
            "cached structure '{}' at {}/{}: {} bytes",
            self.catalog.get(id).name(),
            version,
            platform,
            info.total_size
        );
        map.insert(id, Arc::clone(&info));
        self.record_miss();
        Ok(info)
    }

    /// Cached form of [`resolver::resolve_fields`].
    pub fn field_enumeration(
        &self,
        id: TypeId,
        version: FormatVersion,
        platform: Platform,
    ) -> Arc<ResolvedFields> {
        let partition = self.partition(version, platform);

        if let Some(hit) = partition.fields.read().get(&id) {
            self.record_hit();
            return Arc::clone(hit);
        }

        let mut map = partition.fields.write();
        if let Some(hit) = map.get(&id) {
            self.record_hit();
            return Arc::clone(hit);
        }

        let fields = Arc::new(resolver::resolve_fields(
            &self.catalog,
            id,
            version,
            platform,
        ));
        log::debug!(
            "cached field enumeration of '{}' at {}/{}: {} fields",
            self.catalog.get(id).name(),
            version,
            platform,
            fields.len()
        );
        map.insert(id, Arc::clone(&fields));
        self.record_miss();
        fields
    }

    /// Cached form of [`resolver::structure_attribute`].
    ///
    /// Negative results (no variant matches) are cached too — the answer is
    /// as deterministic as a positive one.
    pub fn structure_attribute(
        &self,
        id: TypeId,
        version: FormatVersion,
        platform: Platform,
    ) -> Option<Arc<StructVariant>> {
        let partition = self.partition(version, platform);

        if let Some(hit) = partition.attributes.read().get(&id) {
            self.record_hit();
            return hit.clone();
        }

        let mut map = partition.attributes.write();
        if let Some(hit) = map.get(&id) {
            self.record_hit();
            return hit.clone();
        }

        let attribute = resolver::structure_attribute(&self.catalog, id, version, platform)
            .map(|v| Arc::new(v.clone()));
        map.insert(id, attribute.clone());
        self.record_miss();
        attribute
    }

    /// Cumulative structure size, through the structure-info cache.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaCache::structure_info`].
    pub fn structure_size(
        &self,
        id: TypeId,
        version: FormatVersion,
        platform: Platform,
    ) -> Result<u32> {
        Ok(self.structure_info(id, version, platform)?.total_size)
    }

    /// Snapshot of the hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
    }
}

#[cfg(test)]
mod tests;
