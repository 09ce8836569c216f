//! Type table
//!
//! A document stores each type once in its `TypeInfos` block; everything else refers to
//! a type through its position (`typref`). Reading goes position → type through
//! [`TypeTable`], writing goes type → position through a [`TypeIndex`] built once per
//! write and dropped with it.
use std::collections::HashMap;

use log::debug;

use crate::{
    magic::{ATTR_ID, ATTR_TYPREF, TAG_TYPE, TAG_TYPE_INFOS},
    markup::Element,
    types::BType,
    utils::error::{PogError, PogResult},
};

/// Ordered, position-addressed list of types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    types: Vec<BType>,
}

impl TypeTable {
    pub fn new(types: Vec<BType>) -> Self {
        Self { types }
    }

    /// Decode a `TypeInfos` element.
    ///
    /// Each `Type` child must declare an `id` equal to its zero-based position; gaps,
    /// duplicates and reorderings are rejected rather than renumbered.
    pub fn decode(element: &Element) -> PogResult<Self> {
        let mut types = Vec::with_capacity(element.children().len());

        for (position, entry) in element.children().iter().enumerate() {
            if entry.name() != TAG_TYPE {
                return Err(PogError::unexpected_tag(
                    entry.name(),
                    format!("'{}' tag", TAG_TYPE_INFOS),
                ));
            }

            let id: usize = entry.require_parsed_attribute(ATTR_ID)?;
            if id != position {
                return Err(PogError::TypeIdMismatch {
                    expected: position,
                    found: id,
                });
            }

            types.push(BType::decode(entry.single_child()?)?);
        }

        Ok(Self { types })
    }

    /// Type at position `typref`.
    pub fn resolve(&self, typref: usize) -> PogResult<&BType> {
        self.types.get(typref).ok_or(PogError::UnknownTypeRef {
            typref,
            len: self.types.len(),
        })
    }

    /// Resolve the `typref` attribute of `element`, if it has one.
    pub fn resolve_attribute(&self, element: &Element) -> PogResult<Option<BType>> {
        element
            .parse_attribute::<usize>(ATTR_TYPREF)?
            .map(|typref| self.resolve(typref).cloned())
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BType> {
        self.types.iter()
    }

    pub fn as_slice(&self) -> &[BType] {
        &self.types
    }

    pub fn into_inner(self) -> Vec<BType> {
        self.types
    }
}

/// Reverse lookup from a type to its position in a type table.
///
/// Distinct set carriers all decode to [`BType::Int`], so a table read from disk may
/// hold structurally equal entries. Such an entry maps to its last position, matching
/// the references written by the POG tools.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    lookup: HashMap<BType, usize>,
}

impl TypeIndex {
    pub fn build(types: &[BType]) -> Self {
        let mut lookup = HashMap::with_capacity(types.len());
        for (position, ty) in types.iter().enumerate() {
            if let Some(previous) = lookup.insert(ty.clone(), position) {
                debug!(
                    "Type `{}` at position {} duplicates position {}; references resolve to {}.",
                    ty, position, previous, position
                );
            }
        }
        Self { lookup }
    }

    /// Position of `ty` in the table this index was built from.
    pub fn index_of(&self, ty: &BType) -> PogResult<usize> {
        self.lookup
            .get(ty)
            .copied()
            .ok_or_else(|| PogError::UnregisteredType { ty: ty.to_string() })
    }

    /// Number of distinct types.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
