// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolution Latency Benchmark
//!
//! Measures the schema cache hot path (repeat lookups against a warmed
//! partition) against uncached resolution, which is what the cache saves per
//! record instance.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box as bb;
use std::sync::Arc;
use strata::{
    FieldVariant, FormatVersion, Platform, RecordTypeBuilder, SchemaCache, StructVariant,
    TypeCatalog,
};

fn bench_catalog() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::builder()
        .register(
            RecordTypeBuilder::new("geometry_block")
                .variant(
                    StructVariant::new("geometry_block", *b"gblk", 0x20)
                        .max_version(FormatVersion::Online700),
                )
                .variant(
                    StructVariant::new("geometry_block", *b"gblk", 0x28)
                        .min_version(FormatVersion::Redux),
                )
                .field("vertex_count", FieldVariant::bytes(4))
                .field("index_count", FieldVariant::bytes(4))
                .field(
                    "compression_flags",
                    FieldVariant::bytes(2).min_version(FormatVersion::OnlineBeta),
                ),
        )
        .register(
            RecordTypeBuilder::new("instanced_geometry")
                .extends("geometry_block")
                .variant(StructVariant::new("instanced_geometry", *b"igeo", 0xB8))
                .field("checksum", FieldVariant::bytes(4))
                .field_variants(
                    "bounds",
                    [
                        FieldVariant::bytes(16).max_version(FormatVersion::Online700),
                        FieldVariant::bytes(20),
                    ],
                )
                .field(
                    "reserved",
                    FieldVariant::padding(12).platform(Platform::Original),
                )
                .field("scratch", FieldVariant::runtime())
                .field("mesh_index", FieldVariant::bytes(2))
                .field("compression_index", FieldVariant::bytes(2)),
        )
        .build()
        .expect("benchmark catalog builds");
    Arc::new(catalog)
}

fn bench_cached_lookup(c: &mut Criterion) {
    let cache = SchemaCache::new(bench_catalog());
    let id = cache
        .catalog()
        .require("instanced_geometry")
        .expect("registered");

    // Warm the partition so every measured call takes the read-lock fast
    // path.
    let _ = cache.field_enumeration(id, FormatVersion::Online454, Platform::Original);
    let _ = cache.structure_size(id, FormatVersion::Online454, Platform::Original);

    c.bench_function("field_enumeration_hot", |b| {
        b.iter(|| {
            bb(cache.field_enumeration(bb(id), FormatVersion::Online454, Platform::Original))
        });
    });

    c.bench_function("structure_size_hot", |b| {
        b.iter(|| {
            bb(cache
                .structure_size(bb(id), FormatVersion::Online454, Platform::Original)
                .expect("layout declared"))
        });
    });
}

fn bench_uncached_resolution(c: &mut Criterion) {
    let catalog = bench_catalog();
    let id = catalog.require("instanced_geometry").expect("registered");

    c.bench_function("resolve_fields_cold", |b| {
        b.iter(|| {
            bb(strata::resolve_fields(
                &catalog,
                bb(id),
                FormatVersion::Online454,
                Platform::Original,
            ))
        });
    });

    c.bench_function("resolve_structure_cold", |b| {
        b.iter(|| {
            bb(strata::resolve_structure(
                &catalog,
                bb(id),
                FormatVersion::Online454,
                Platform::Original,
            )
            .expect("layout declared"))
        });
    });
}

criterion_group!(benches, bench_cached_lookup, bench_uncached_resolution);
criterion_main!(benches);
