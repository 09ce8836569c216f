//! Types module
//!
//! Semantic types of the B language as they appear in POG documents:
//!
//! - [`BType`]: the closed type grammar (primitives, powerset, product, record).
//! - [`TypedVar`]: a name paired with its type.
//! - [`table`]: the document's ordered type table ([`table::TypeTable`]) and the
//!   reverse lookup used while writing ([`table::TypeIndex`]).
//! - [`codec`]: conversion between [`BType`] and its markup encoding.
//!
//! Every other part of a document refers to a type by its position in the type
//! table. The reader resolves those positions into owned [`BType`] values, so two
//! references are equal exactly when the types they denote are structurally equal.
use strum::EnumIs;

use crate::magic::{PRIM_BOOL, PRIM_FLOAT, PRIM_INTEGER, PRIM_REAL, PRIM_STRING};

pub mod codec;
pub mod table;

/// A B type.
///
/// Record fields are kept in declaration order; two records with the same fields in a
/// different order are different types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs)]
pub enum BType {
    /// `INTEGER`. Also stands in for abstract and enumerated set carriers, whose
    /// precise identity is not recorded by the type table.
    Int,
    /// `FLOAT`
    Float,
    /// `REAL`
    Real,
    /// `STRING`
    String,
    /// `BOOL`
    Bool,
    /// `POW(T)`
    Power(Box<BType>),
    /// `T1 * T2`
    Product(Box<BType>, Box<BType>),
    /// `struct(l1: T1, ..., ln: Tn)`
    Struct(Vec<(String, BType)>),
}

impl BType {
    pub fn power(inner: BType) -> Self {
        BType::Power(Box::new(inner))
    }

    pub fn product(first: BType, second: BType) -> Self {
        BType::Product(Box::new(first), Box::new(second))
    }

    pub fn structure<S: Into<String>>(fields: impl IntoIterator<Item = (S, BType)>) -> Self {
        BType::Struct(
            fields
                .into_iter()
                .map(|(label, ty)| (label.into(), ty))
                .collect(),
        )
    }

    /// Name used by the `Id` encoding of a primitive type, `None` for composite types.
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            BType::Int => Some(PRIM_INTEGER),
            BType::Float => Some(PRIM_FLOAT),
            BType::Real => Some(PRIM_REAL),
            BType::String => Some(PRIM_STRING),
            BType::Bool => Some(PRIM_BOOL),
            BType::Power(_) | BType::Product(_, _) | BType::Struct(_) => None,
        }
    }

    /// Inverse of [`Self::primitive_name`].
    pub fn from_primitive_name(name: &str) -> Option<Self> {
        match name {
            PRIM_INTEGER => Some(BType::Int),
            PRIM_FLOAT => Some(BType::Float),
            PRIM_REAL => Some(BType::Real),
            PRIM_STRING => Some(BType::String),
            PRIM_BOOL => Some(BType::Bool),
            _ => None,
        }
    }
}

impl std::fmt::Display for BType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BType::Power(inner) => write!(f, "POW({})", inner),
            BType::Product(first, second) => {
                // Products associate to the left, parenthesise a product on the right.
                if second.is_product() {
                    write!(f, "{}*({})", first, second)
                } else {
                    write!(f, "{}*{}", first, second)
                }
            }
            BType::Struct(fields) => {
                write!(f, "struct(")?;
                for (i, (label, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", label, ty)?;
                }
                write!(f, ")")
            }
            primitive => f.write_str(primitive.primitive_name().unwrap_or_default()),
        }
    }
}

/// A variable name paired with its type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedVar {
    pub name: String,
    pub ty: BType,
}

impl TypedVar {
    pub fn new(name: impl Into<String>, ty: BType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl std::fmt::Display for TypedVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}
