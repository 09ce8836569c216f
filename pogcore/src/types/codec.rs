//! Markup encoding of [`BType`].
//!
//! | Type | Encoding |
//! |------|----------|
//! | primitive | `<Id value="INTEGER"/>` (also `FLOAT`, `REAL`, `STRING`, `BOOL`) |
//! | `POW(T)` | `<Unary_Exp op="POW">T</Unary_Exp>` |
//! | `T1 * T2` | `<Binary_Exp op="*">T1 T2</Binary_Exp>` |
//! | record | `<Struct><Record_Item label="l">T</Record_Item>...</Struct>` |
//!
//! Decoding fails on the first element that does not fit one of these productions.
use std::io::Write;

use crate::{
    magic::{
        ATTR_LABEL, ATTR_OP, ATTR_SUFFIX, ATTR_VALUE, OP_POW, OP_PRODUCT, TAG_BINARY_EXP, TAG_ID,
        TAG_RECORD_ITEM, TAG_STRUCT, TAG_UNARY_EXP,
    },
    markup::{Element, XmlPrinter},
    types::BType,
    utils::error::{PogError, PogResult},
};

fn expect_operator(element: &Element, expected: &str) -> PogResult<()> {
    match element.attribute(ATTR_OP) {
        Some(op) if op == expected => Ok(()),
        found => Err(PogError::InvalidAttribute {
            tag: element.name().to_string(),
            attribute: ATTR_OP.to_string(),
            expected: expected.to_string(),
            found: found.map_or_else(|| "nothing".to_string(), |op| format!("'{}'", op)),
        }),
    }
}

impl BType {
    /// Decode a type from its markup encoding.
    ///
    /// An `Id` naming something other than a primitive type denotes an abstract or
    /// enumerated set. The type table does not say which, so such carriers decode to
    /// [`BType::Int`]; they may not carry a `suffix`.
    pub fn decode(element: &Element) -> PogResult<BType> {
        match element.name() {
            TAG_ID => {
                let value = element.require_attribute(ATTR_VALUE)?;
                match BType::from_primitive_name(value) {
                    Some(primitive) => Ok(primitive),
                    None if element.attribute(ATTR_SUFFIX).is_some() => {
                        Err(PogError::ForbiddenAttribute {
                            tag: TAG_ID.to_string(),
                            attribute: ATTR_SUFFIX.to_string(),
                            reason: format!("abstract or enumerated set `{}` cannot carry one", value),
                        })
                    }
                    None => Ok(BType::Int),
                }
            }
            TAG_UNARY_EXP => {
                expect_operator(element, OP_POW)?;
                let [inner] = element.exact_children::<1>()?;
                Ok(BType::power(BType::decode(inner)?))
            }
            TAG_BINARY_EXP => {
                expect_operator(element, OP_PRODUCT)?;
                let [first, second] = element.exact_children::<2>()?;
                Ok(BType::product(BType::decode(first)?, BType::decode(second)?))
            }
            TAG_STRUCT => {
                let fields = element
                    .children()
                    .iter()
                    .map(|item| {
                        if item.name() != TAG_RECORD_ITEM {
                            return Err(PogError::unexpected_tag(
                                item.name(),
                                format!("'{}' tag", TAG_STRUCT),
                            ));
                        }
                        let label = item.require_attribute(ATTR_LABEL)?;
                        let [field_type] = item.exact_children::<1>()?;
                        Ok((label.to_string(), BType::decode(field_type)?))
                    })
                    .collect::<PogResult<Vec<_>>>()?;
                Ok(BType::Struct(fields))
            }
            other => Err(PogError::unexpected_tag(other, "type definition")),
        }
    }

    /// Write the markup encoding of this type.
    pub fn encode<W: Write>(&self, printer: &mut XmlPrinter<W>) -> PogResult<()> {
        match self {
            BType::Power(inner) => {
                printer.open_element(TAG_UNARY_EXP)?;
                printer.push_attribute(ATTR_OP, OP_POW)?;
                inner.encode(printer)?;
                printer.close_element()
            }
            BType::Product(first, second) => {
                printer.open_element(TAG_BINARY_EXP)?;
                printer.push_attribute(ATTR_OP, OP_PRODUCT)?;
                first.encode(printer)?;
                second.encode(printer)?;
                printer.close_element()
            }
            BType::Struct(fields) => {
                printer.open_element(TAG_STRUCT)?;
                for (label, ty) in fields {
                    printer.open_element(TAG_RECORD_ITEM)?;
                    printer.push_attribute(ATTR_LABEL, label)?;
                    ty.encode(printer)?;
                    printer.close_element()?;
                }
                printer.close_element()
            }
            primitive => {
                printer.open_element(TAG_ID)?;
                printer.push_attribute(ATTR_VALUE, primitive.primitive_name().unwrap_or_default())?;
                printer.close_element()
            }
        }
    }
}
