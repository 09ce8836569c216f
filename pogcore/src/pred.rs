//! Predicates
//!
//! The document codec treats predicates as opaque values; it only needs to read one
//! from an element, write one back, and tell whether it is a conjunction. [`Pred`] is
//! the default implementation of that contract: a typed markup term that keeps the
//! predicate (or expression) tree as found, except that every `typref` attribute is
//! replaced by the [`BType`] it denotes. Two predicates are therefore equal when they
//! have the same shape and the same types, whatever positions those types occupy in
//! their respective type tables.
use std::io::Write;

use smallvec::SmallVec;

use crate::{
    magic::{ATTR_OP, ATTR_TYPREF, OP_AND, TAG_BINARY_PRED, TAG_NARY_PRED},
    markup::{Element, XmlPrinter},
    types::{
        BType,
        table::{TypeIndex, TypeTable},
    },
    utils::error::PogResult,
};

/// A node of a predicate or expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pred {
    tag: String,
    attributes: SmallVec<[(String, String); 2]>,
    ty: Option<BType>,
    text: String,
    children: Vec<Pred>,
}

impl Pred {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: SmallVec::new(),
            ty: None,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute. `typref` is reserved; use [`Self::with_type`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert_ne!(name, ATTR_TYPREF, "types are attached with `with_type`");
        self.attributes.push((name, value.into()));
        self
    }

    /// Builder: attach the type of this node.
    pub fn with_type(mut self, ty: BType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: append a child node.
    pub fn with_child(mut self, child: Pred) -> Self {
        self.children.push(child);
        self
    }

    /// Conjunction of `conjuncts`, as an `&` `Nary_Pred`.
    pub fn and(conjuncts: impl IntoIterator<Item = Pred>) -> Self {
        let mut pred = Pred::new(TAG_NARY_PRED).with_attribute(ATTR_OP, OP_AND);
        pred.children.extend(conjuncts);
        pred
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn ty(&self) -> Option<&BType> {
        self.ty.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Pred] {
        &self.children
    }

    /// Whether the top-level connective is a conjunction.
    pub fn is_conjunction(&self) -> bool {
        (self.tag == TAG_NARY_PRED || self.tag == TAG_BINARY_PRED)
            && self.attribute(ATTR_OP) == Some(OP_AND)
    }

    /// Split a top-level conjunction into its conjuncts, recursively. Any other
    /// predicate yields itself.
    pub fn into_conjuncts(self) -> Vec<Pred> {
        let mut conjuncts = Vec::new();
        let mut pending = vec![self];

        // Children are pushed in reverse so conjuncts come out in document order.
        while let Some(pred) = pending.pop() {
            if pred.is_conjunction() {
                pending.extend(pred.children.into_iter().rev());
            } else {
                conjuncts.push(pred);
            }
        }
        conjuncts
    }

    /// Read a predicate, resolving every `typref` in the subtree through `types`.
    pub fn read(element: &Element, types: &TypeTable) -> PogResult<Pred> {
        let mut pred = Pred::new(element.name()).with_text(element.text());
        pred.ty = types.resolve_attribute(element)?;
        pred.attributes.extend(
            element
                .attributes()
                .filter(|(name, _)| *name != ATTR_TYPREF)
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        pred.children = element
            .children()
            .iter()
            .map(|child| Pred::read(child, types))
            .collect::<PogResult<_>>()?;
        Ok(pred)
    }

    /// Write this predicate, turning attached types back into `typref` positions.
    pub fn write<W: Write>(&self, printer: &mut XmlPrinter<W>, index: &TypeIndex) -> PogResult<()> {
        printer.open_element(&self.tag)?;
        for (name, value) in &self.attributes {
            printer.push_attribute(name, value)?;
        }
        if let Some(ty) = &self.ty {
            printer.push_attribute(ATTR_TYPREF, &index.index_of(ty)?.to_string())?;
        }
        if !self.text.is_empty() {
            printer.push_text(&self.text)?;
        }
        for child in &self.children {
            child.write(printer, index)?;
        }
        printer.close_element()
    }
}
