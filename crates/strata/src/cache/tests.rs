// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for SchemaCache.

use super::*;
use crate::catalog::RecordTypeBuilder;
use crate::error::Error;
use crate::variant::{FieldVariant, StructVariant};
use crate::version::FormatVersion::*;
use std::sync::Barrier;
use std::thread;

fn sample_catalog() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::builder()
        .register(
            RecordTypeBuilder::new("geometry_block")
                .variant(StructVariant::new("geometry_block", *b"gblk", 8).min_version(Expansion1))
                .field("vertex_count", FieldVariant::bytes(4)),
        )
        .register(
            RecordTypeBuilder::new("instanced_geometry")
                .extends("geometry_block")
                .variant(StructVariant::new("instanced_geometry", *b"igeo", 4))
                .field("checksum", FieldVariant::bytes(4))
                .field(
                    "bounds_offset",
                    FieldVariant::bytes(12).max_version(Online700),
                ),
        )
        .register(
            RecordTypeBuilder::new("cluster_data")
                .variant(StructVariant::new("cluster_data", *b"clst", 64).min_version(Redux)),
        )
        .register(RecordTypeBuilder::new("bare"))
        .build()
        .expect("catalog builds");
    Arc::new(catalog)
}

#[test]
fn test_hit_and_miss_paths() {
    let cache = SchemaCache::new(sample_catalog());
    let id = cache.catalog().lookup("instanced_geometry").expect("registered");

    let first = cache
        .structure_info(id, Online454, Platform::Original)
        .expect("resolves");
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);

    let second = cache
        .structure_info(id, Online454, Platform::Original)
        .expect("resolves");
    assert!(Arc::ptr_eq(&first, &second));

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_partitions_are_independent() {
    let cache = SchemaCache::new(sample_catalog());
    let id = cache.catalog().lookup("instanced_geometry").expect("registered");

    // Every (version, platform) pair resolves separately and keeps its own
    // entry; the derived type has a layout everywhere.
    for version in FormatVersion::ALL {
        for platform in Platform::ALL {
            let info = cache
                .structure_info(id, version, platform)
                .expect("resolves");
            let expected = if version >= Expansion1 { 12 } else { 4 };
            assert_eq!(info.total_size, expected, "at {}/{}", version, platform);
        }
    }

    let pairs = (FormatVersion::ALL.len() * Platform::ALL.len()) as u64;
    let stats = cache.stats();
    assert_eq!(stats.misses, pairs);
    assert_eq!(stats.hits, 0);
}

#[test]
fn test_field_enumeration_is_cached_per_partition() {
    let cache = SchemaCache::new(sample_catalog());
    let id = cache.catalog().lookup("instanced_geometry").expect("registered");

    let online = cache.field_enumeration(id, Online454, Platform::Original);
    assert_eq!(online.len(), 3);
    let again = cache.field_enumeration(id, Online454, Platform::Original);
    assert!(Arc::ptr_eq(&online, &again));

    // A different partition sees a different enumeration: bounds_offset
    // ends at Online700.
    let redux = cache.field_enumeration(id, Redux, Platform::Original);
    assert_eq!(redux.len(), 2);
    assert!(redux.get("bounds_offset").is_none());
}

#[test]
fn test_errors_propagate_and_are_not_cached() {
    let cache = SchemaCache::new(sample_catalog());
    let id = cache.catalog().lookup("cluster_data").expect("registered");

    for _ in 0..2 {
        let err = cache
            .structure_info(id, Online235, Platform::Original)
            .unwrap_err();
        assert!(matches!(err, Error::NoMatchingVariant { .. }));
    }

    // Neither failed attempt produced a stored entry.
    let stats = cache.stats();
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.hits, 0);

    // The same key still resolves fine where a layout exists.
    assert_eq!(
        cache
            .structure_size(id, Redux, Platform::Original)
            .expect("declared layout"),
        64
    );
}

#[test]
fn test_negative_attribute_results_are_cached() {
    let cache = SchemaCache::new(sample_catalog());
    let bare = cache.catalog().lookup("bare").expect("registered");

    assert!(cache
        .structure_attribute(bare, Retail, Platform::Original)
        .is_none());
    assert!(cache
        .structure_attribute(bare, Retail, Platform::Original)
        .is_none());

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_attribute_cache_returns_winning_descriptor() {
    let cache = SchemaCache::new(sample_catalog());
    let id = cache.catalog().lookup("instanced_geometry").expect("registered");

    let attribute = cache
        .structure_attribute(id, Retail, Platform::Original)
        .expect("variant matches");
    assert_eq!(&*attribute.name, "instanced_geometry");
    assert_eq!(attribute.tag.to_string(), "igeo");
    assert_eq!(attribute.size, 4);
}

#[test]
fn test_concurrent_first_access_computes_exactly_once() {
    const THREADS: usize = 8;

    let cache = Arc::new(SchemaCache::new(sample_catalog()));
    let id = cache.catalog().lookup("instanced_geometry").expect("registered");
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let info = cache
                .structure_info(id, Online454, Platform::Original)
                .expect("resolves");
            Arc::as_ptr(&info) as usize
        }));
    }

    let pointers: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().expect("thread should succeed"))
        .collect();

    // Exactly one computation happened and every thread observed the same
    // published value.
    assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, (THREADS as u64) - 1);
}

#[test]
fn test_concurrent_mixed_load_is_mostly_hits() {
    let cache = Arc::new(SchemaCache::new(sample_catalog()));
    let names = ["geometry_block", "instanced_geometry", "bare"];
    let ids: Vec<TypeId> = names
        .iter()
        .map(|n| cache.catalog().lookup(n).expect("registered"))
        .collect();

    let barrier = Arc::new(Barrier::new(8));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        let ids = ids.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..1_000 {
                let id = ids[fastrand::usize(..ids.len())];
                let version = FormatVersion::ALL[fastrand::usize(..FormatVersion::ALL.len())];
                let platform = Platform::ALL[fastrand::usize(..Platform::ALL.len())];
                let fields = cache.field_enumeration(id, version, platform);
                let _ = fields.stream_len();
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread should succeed");
    }

    let stats = cache.stats();
    assert!(stats.hits > stats.misses);
    // Key space bounds the number of computations.
    let key_space = (names.len() * FormatVersion::ALL.len() * Platform::ALL.len()) as u64;
    assert!(stats.misses <= key_space);
}

#[test]
fn test_cached_and_uncached_resolution_agree() {
    let catalog = sample_catalog();
    let cache = SchemaCache::new(Arc::clone(&catalog));
    let id = catalog.lookup("instanced_geometry").expect("registered");

    for version in FormatVersion::ALL {
        for platform in Platform::ALL {
            let cached = cache.field_enumeration(id, version, platform);
            let direct = crate::resolver::resolve_fields(&catalog, id, version, platform);
            assert_eq!(cached.len(), direct.len());
            assert_eq!(cached.stream_len(), direct.stream_len());
        }
    }
}
