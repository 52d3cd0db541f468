// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declare a small record chain and print its layout across every format
//! revision.
//!
//! Run with: `cargo run --example resolve_record`

use std::sync::Arc;
use strata::{
    FieldVariant, FormatVersion, Platform, RecordTypeBuilder, SchemaCache, StructVariant,
    TypeCatalog,
};

fn main() -> strata::Result<()> {
    let catalog = TypeCatalog::builder()
        .register(
            RecordTypeBuilder::new("geometry_block")
                .variant(
                    StructVariant::new("geometry_block", *b"gblk", 0x18)
                        .min_version(FormatVersion::Expansion1),
                )
                .field("vertex_count", FieldVariant::bytes(4))
                .field("index_count", FieldVariant::bytes(4)),
        )
        .register(
            RecordTypeBuilder::new("instanced_geometry")
                .extends("geometry_block")
                .variant(
                    StructVariant::new("instanced_geometry", *b"igeo", 0xB8)
                        .max_version(FormatVersion::Online700),
                )
                .variant(
                    StructVariant::new("instanced_geometry", *b"igeo", 0xC8)
                        .min_version(FormatVersion::Redux),
                )
                .field("checksum", FieldVariant::bytes(4))
                .field_variants(
                    "bounds",
                    [
                        FieldVariant::bytes(16).max_version(FormatVersion::Online700),
                        FieldVariant::bytes(20),
                    ],
                )
                .field(
                    "lightmap_scale",
                    FieldVariant::bytes(4).max_version(FormatVersion::Online700),
                ),
        )
        .build()?;

    let cache = SchemaCache::new(Arc::new(catalog));
    let id = cache.catalog().require("instanced_geometry")?;

    for version in FormatVersion::ALL {
        let platform = Platform::Original;
        let size = cache.structure_size(id, version, platform)?;
        let fields = cache.field_enumeration(id, version, platform);
        let names: Vec<&str> = fields.iter().map(|f| &*f.name).collect();
        println!(
            "{:>14}  size {:#05x}  stream {:>3} bytes  fields: {}",
            version.to_string(),
            size,
            fields.stream_len(),
            names.join(", ")
        );
    }

    let stats = cache.stats();
    println!("cache: {} misses, {} hits", stats.misses, stats.hits);
    Ok(())
}
