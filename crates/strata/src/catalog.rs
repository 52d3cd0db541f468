// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static type catalog: every record type's declared variants, built once.
//!
//! The catalog replaces attribute reflection with an explicit table. Record
//! types are declared through [`RecordTypeBuilder`], collected by
//! [`CatalogBuilder`], validated, and frozen into an immutable
//! [`TypeCatalog`] that resolution reads without locking.
//!
//! ```rust
//! use strata::{FieldVariant, FormatVersion, RecordTypeBuilder, StructVariant, TypeCatalog};
//!
//! let catalog = TypeCatalog::builder()
//!     .register(
//!         RecordTypeBuilder::new("render_block")
//!             .variant(StructVariant::new("render_block", *b"rblk", 8))
//!             .field("mesh_index", FieldVariant::bytes(2))
//!             .field("lod_count", FieldVariant::bytes(2)),
//!     )
//!     .register(
//!         RecordTypeBuilder::new("instanced_geometry")
//!             .extends("render_block")
//!             .variant(StructVariant::new("instanced_geometry", *b"igeo", 16))
//!             .field("checksum", FieldVariant::bytes(4))
//!             .field(
//!                 "bounds_offset",
//!                 FieldVariant::bytes(12).max_version(FormatVersion::Online700),
//!             ),
//!     )
//!     .build()
//!     .expect("valid catalog");
//!
//! let id = catalog.lookup("instanced_geometry").expect("registered");
//! assert_eq!(catalog.chain(id).count(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::variant::{FieldVariant, StructVariant};

/// Opaque handle to a record type inside one [`TypeCatalog`].
///
/// Handles are only meaningful for the catalog that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A logical field: stable identity plus its declared variants.
///
/// The field name is the identity; it stays the same across every variant of
/// the field. Variants are kept in declaration order, which is also the
/// tie-break order during resolution.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: Arc<str>,
    variants: Vec<FieldVariant>,
}

impl FieldDef {
    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared variants, in declaration order.
    pub fn variants(&self) -> &[FieldVariant] {
        &self.variants
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

/// A registered record type: inheritance link, structure variants, fields.
#[derive(Debug)]
pub struct RecordTypeDef {
    name: Arc<str>,
    parent: Option<TypeId>,
    variants: Vec<StructVariant>,
    fields: Vec<FieldDef>,
}

impl RecordTypeDef {
    /// Registered type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent type, if this type inherits a base layout.
    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    /// Declared structure variants, in declaration order.
    ///
    /// Empty for chain links that carry no binary layout of their own.
    pub fn struct_variants(&self) -> &[StructVariant] {
        &self.variants
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field declared directly on this type (not inherited).
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Immutable, name-indexed table of every registered record type.
///
/// Built once before any resolution call and shared read-only afterwards;
/// declared variant metadata needs no locking.
#[derive(Debug)]
pub struct TypeCatalog {
    types: Vec<RecordTypeDef>,
    by_name: HashMap<Arc<str>, TypeId>,
}

impl TypeCatalog {
    /// Start declaring a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder { types: Vec::new() }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Definition for a handle issued by this catalog.
    pub fn get(&self, id: TypeId) -> &RecordTypeDef {
        &self.types[id.index()]
    }

    /// Find a type by registered name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Find a type by name, erroring on a miss.
    pub fn require(&self, name: &str) -> Result<TypeId> {
        self.lookup(name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Walk the inheritance chain from `id` (most-derived) to the root.
    pub fn chain(&self, id: TypeId) -> Chain<'_> {
        Chain {
            catalog: self,
            next: Some(id),
        }
    }

    /// Find the declaring link and definition of a field visible on `id`,
    /// searching most-derived first so redeclared names shadow inherited
    /// ones.
    pub(crate) fn find_field(&self, id: TypeId, name: &str) -> Option<(TypeId, &FieldDef)> {
        self.chain(id)
            .find_map(|link| self.get(link).field(name).map(|def| (link, def)))
    }
}

/// Iterator over an inheritance chain, most-derived type first.
#[derive(Debug)]
pub struct Chain<'a> {
    catalog: &'a TypeCatalog,
    next: Option<TypeId>,
}

impl Iterator for Chain<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.next?;
        self.next = self.catalog.get(current).parent();
        Some(current)
    }
}

/// Fluent declaration of one record type.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: Arc<str>,
    parent: Option<Arc<str>>,
    variants: Vec<StructVariant>,
    fields: Vec<FieldDef>,
}

impl RecordTypeBuilder {
    /// Start declaring a record type.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            variants: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Inherit the base layout of `parent` (resolved by name at build time;
    /// forward references are fine).
    pub fn extends(mut self, parent: impl Into<Arc<str>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare a structure variant. Declaration order is match order.
    pub fn variant(mut self, variant: StructVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Declare a field with a single variant.
    pub fn field(self, name: impl Into<Arc<str>>, variant: FieldVariant) -> Self {
        self.field_variants(name, [variant])
    }

    /// Declare a field with several variants, in match order.
    pub fn field_variants(
        mut self,
        name: impl Into<Arc<str>>,
        variants: impl IntoIterator<Item = FieldVariant>,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            variants: variants.into_iter().collect(),
        });
        self
    }
}

/// Collects record type declarations and freezes them into a [`TypeCatalog`].
#[derive(Debug)]
pub struct CatalogBuilder {
    types: Vec<RecordTypeBuilder>,
}

impl CatalogBuilder {
    /// Add one record type declaration.
    pub fn register(mut self, ty: RecordTypeBuilder) -> Self {
        self.types.push(ty);
        self
    }

    /// Validate every declaration and freeze the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDeclaration`] for duplicate type names,
    /// duplicate field names within a type, more than one default variant on
    /// a field, or a parent that is unregistered or forms a cycle.
    pub fn build(self) -> Result<TypeCatalog> {
        let mut by_name: HashMap<Arc<str>, TypeId> = HashMap::with_capacity(self.types.len());
        for (index, ty) in self.types.iter().enumerate() {
            let id = TypeId(index as u32);
            if by_name.insert(Arc::clone(&ty.name), id).is_some() {
                return Err(Error::InvalidDeclaration(format!(
                    "type '{}' registered twice",
                    ty.name
                )));
            }
        }

        let mut types = Vec::with_capacity(self.types.len());
        for ty in self.types {
            let parent = match &ty.parent {
                Some(name) => Some(*by_name.get(name).ok_or_else(|| {
                    Error::InvalidDeclaration(format!(
                        "type '{}' extends unregistered type '{}'",
                        ty.name, name
                    ))
                })?),
                None => None,
            };

            for (index, field) in ty.fields.iter().enumerate() {
                if ty.fields[..index].iter().any(|f| f.name == field.name) {
                    return Err(Error::InvalidDeclaration(format!(
                        "type '{}' declares field '{}' twice",
                        ty.name, field.name
                    )));
                }
                let defaults = field.variants.iter().filter(|v| v.is_default()).count();
                if defaults > 1 {
                    return Err(Error::InvalidDeclaration(format!(
                        "field '{}.{}' declares {} default variants, at most one is allowed",
                        ty.name, field.name, defaults
                    )));
                }
            }

            types.push(RecordTypeDef {
                name: ty.name,
                parent,
                variants: ty.variants,
                fields: ty.fields,
            });
        }

        // Parent links must form a forest; a cycle would make chain walks
        // diverge.
        for start in 0..types.len() {
            let mut current = types[start].parent;
            let mut steps = 0;
            while let Some(link) = current {
                steps += 1;
                if steps > types.len() {
                    return Err(Error::InvalidDeclaration(format!(
                        "inheritance cycle through type '{}'",
                        types[start].name
                    )));
                }
                current = types[link.index()].parent;
            }
        }

        log::debug!("type catalog frozen: {} types", types.len());
        Ok(TypeCatalog { types, by_name })
    }
}
