//! Document writer
//!
//! [`PogXmlWriter`] serialises a [`Pog`] through the [`PogVisitor`] contract. Defines
//! and groups are written first, in their stored order; the `TypeInfos` block closes
//! the document, so that the layout matches what downstream provers expect even though
//! the reader needs the type table first.
use std::io::Write;

use log::debug;

use crate::{
    magic::{
        ATTR_GOAL_HASH, ATTR_HASH, ATTR_ID, ATTR_NAME, ATTR_NUM, ATTR_TYPREF, ATTR_VALUE,
        TAG_DEFINE, TAG_DEFINITION, TAG_ENUMERATED_VALUES, TAG_GOAL, TAG_HYPOTHESIS, TAG_ID,
        TAG_LOCAL_HYP, TAG_PO_GROUP, TAG_REF_HYP, TAG_ROOT, TAG_SET, TAG_SIMPLE_GOAL, TAG_TAG,
        TAG_TYPE, TAG_TYPE_INFOS,
    },
    markup::XmlPrinter,
    pog::{Define, DefineItem, PO, POGroup, Pog, Set},
    pred::Pred,
    types::{TypedVar, table::TypeIndex},
    utils::{
        conf::WriterConfig,
        error::{PogError, PogResult},
    },
    visitor::{PogVisitor, Visitable, walk_pog},
};

/// Markup serialiser for documents.
///
/// Typed values are written as positions into the type table of the document passed
/// to [`PogVisitor::visit_pog`]. Visiting a define or a group on its own, outside of a
/// document, only works for untyped content.
pub struct PogXmlWriter<W: Write> {
    printer: XmlPrinter<W>,
    index: TypeIndex,
}

impl<W: Write> PogXmlWriter<W> {
    pub fn new(out: W, config: &WriterConfig) -> Self {
        Self {
            printer: XmlPrinter::new(out, config),
            index: TypeIndex::default(),
        }
    }

    /// Flush the output and hand back the sink.
    pub fn finish(self) -> PogResult<W> {
        self.printer.finish()
    }

    fn text_element(&mut self, tag: &str, text: &str) -> PogResult<()> {
        self.printer.open_element(tag)?;
        self.printer.push_text(text)?;
        self.printer.close_element()
    }

    fn wrapped_predicate(&mut self, wrapper: &str, pred: &Pred) -> PogResult<()> {
        self.printer.open_element(wrapper)?;
        pred.write(&mut self.printer, &self.index)?;
        self.printer.close_element()
    }

    fn typed_var(&mut self, var: &TypedVar) -> PogResult<()> {
        let typref = self.index.index_of(&var.ty)?;
        self.printer.open_element(TAG_ID)?;
        self.printer.push_attribute(ATTR_VALUE, &var.name)?;
        self.printer.push_attribute(ATTR_TYPREF, &typref.to_string())?;
        self.printer.close_element()
    }
}

impl<W: Write> PogVisitor for PogXmlWriter<W> {
    type Error = PogError;

    fn visit_pog(&mut self, pog: &Pog) -> PogResult<()> {
        self.index = TypeIndex::build(&pog.type_infos);

        self.printer.open_element(TAG_ROOT)?;
        walk_pog(self, pog)?;

        self.printer.open_element(TAG_TYPE_INFOS)?;
        for (id, ty) in pog.type_infos.iter().enumerate() {
            self.printer.open_element(TAG_TYPE)?;
            self.printer.push_attribute(ATTR_ID, &id.to_string())?;
            ty.encode(&mut self.printer)?;
            self.printer.close_element()?;
        }
        self.printer.close_element()?;

        self.printer.close_element()
    }

    fn visit_define(&mut self, define: &Define) -> PogResult<()> {
        self.printer.open_element(TAG_DEFINE)?;
        self.printer.push_attribute(ATTR_NAME, &define.name)?;
        if define.hash != 0 {
            self.printer.push_attribute(ATTR_HASH, &define.hash.to_string())?;
        }
        for item in define.contents() {
            match item {
                DefineItem::Set(set) => self.visit_set(set)?,
                DefineItem::Predicate(pred) => pred.write(&mut self.printer, &self.index)?,
            }
        }
        self.printer.close_element()
    }

    fn visit_po_group(&mut self, group: &POGroup) -> PogResult<()> {
        self.printer.open_element(TAG_PO_GROUP)?;
        if group.goal_hash != 0 {
            self.printer
                .push_attribute(ATTR_GOAL_HASH, &group.goal_hash.to_string())?;
        }
        self.text_element(TAG_TAG, &group.tag)?;
        for name in &group.definitions {
            self.printer.open_element(TAG_DEFINITION)?;
            self.printer.push_attribute(ATTR_NAME, name)?;
            self.printer.close_element()?;
        }
        for hyp in group.hyps() {
            self.wrapped_predicate(TAG_HYPOTHESIS, hyp)?;
        }
        for hyp in group.local_hyps() {
            self.wrapped_predicate(TAG_LOCAL_HYP, hyp)?;
        }
        for po in &group.simple_goals {
            po.accept(self)?;
        }
        self.printer.close_element()
    }

    fn visit_po(&mut self, po: &PO) -> PogResult<()> {
        self.printer.open_element(TAG_SIMPLE_GOAL)?;
        self.text_element(TAG_TAG, &po.tag)?;
        for index in &po.local_hyps_ref {
            self.printer.open_element(TAG_REF_HYP)?;
            self.printer.push_attribute(ATTR_NUM, &index.to_string())?;
            self.printer.close_element()?;
        }
        self.wrapped_predicate(TAG_GOAL, &po.goal)?;
        self.printer.close_element()
    }

    fn visit_set(&mut self, set: &Set) -> PogResult<()> {
        self.printer.open_element(TAG_SET)?;
        self.typed_var(&set.set_name)?;
        if set.is_enumerated() {
            self.printer.open_element(TAG_ENUMERATED_VALUES)?;
            for elt in &set.elts {
                self.typed_var(elt)?;
            }
            self.printer.close_element()?;
        }
        self.printer.close_element()
    }
}

/// Write `pog` to `out` and return the sink once flushed.
pub fn write_document<W: Write>(pog: &Pog, out: W, config: &WriterConfig) -> PogResult<W> {
    let mut writer = PogXmlWriter::new(out, config);
    pog.accept(&mut writer)?;
    let out = writer.finish()?;

    debug!(
        "Wrote POG document: {} type(s), {} define(s), {} group(s).",
        pog.type_infos.len(),
        pog.defines.len(),
        pog.groups.len()
    );
    Ok(out)
}

/// Write `pog` into a string.
pub fn write_string(pog: &Pog, config: &WriterConfig) -> PogResult<String> {
    let bytes = write_document(pog, Vec::new(), config)?;
    String::from_utf8(bytes)
        .map_err(|e| PogError::Output(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BType;

    fn compact() -> WriterConfig {
        WriterConfig {
            indent: 0,
            xml_declaration: false,
        }
    }

    #[test]
    fn empty_document() {
        let out = write_string(&Pog::default(), &compact()).unwrap();
        assert_eq!(out, "<Proof_Obligations><TypeInfos/></Proof_Obligations>\n");
    }

    #[test]
    fn zero_hashes_are_omitted() {
        let mut pog = Pog::default();
        pog.defines.push(Define::new("a", 0));
        pog.defines.push(Define::new("b", 7));
        pog.groups
            .push(POGroup::new("g", 0, vec![], vec![], vec![], vec![]));
        pog.groups
            .push(POGroup::new("h", 9, vec![], vec![], vec![], vec![]));

        let out = write_string(&pog, &compact()).unwrap();
        assert_eq!(
            out,
            "<Proof_Obligations><Define name=\"a\"/><Define name=\"b\" hash=\"7\"/>\
             <Proof_Obligation><Tag>g</Tag></Proof_Obligation>\
             <Proof_Obligation goalHash=\"9\"><Tag>h</Tag></Proof_Obligation>\
             <TypeInfos/></Proof_Obligations>\n"
        );
    }

    #[test]
    fn deferred_set_has_no_enumeration_block() {
        let mut define = Define::new("ctx", 0);
        define.push_set(Set::deferred(TypedVar::new("S", BType::power(BType::Int))));
        let pog = Pog::new(vec![BType::power(BType::Int)], vec![define], vec![]);

        let out = write_string(&pog, &compact()).unwrap();
        assert!(out.contains("<Set><Id value=\"S\" typref=\"0\"/></Set>"), "{}", out);
        assert!(!out.contains("Enumerated_Values"));
    }

    #[test]
    fn unregistered_type_fails() {
        let mut define = Define::new("ctx", 0);
        define.push_set(Set::deferred(TypedVar::new("S", BType::Real)));
        let pog = Pog::new(vec![BType::Int], vec![define], vec![]);
        assert!(write_string(&pog, &compact()).unwrap_err().is_unregistered_type());
    }

    #[test]
    fn indented_layout() {
        let pog = Pog::new(
            vec![BType::Bool],
            vec![],
            vec![POGroup::new(
                "g",
                0,
                vec![],
                vec![],
                vec![],
                vec![PO::new(
                    "po",
                    vec![0],
                    Pred::new("Id").with_attribute("value", "x").with_type(BType::Bool),
                )],
            )],
        );
        let out = write_string(&pog, &WriterConfig::default()).unwrap();
        assert_eq!(
            out,
            r#"<Proof_Obligations>
    <Proof_Obligation>
        <Tag>g</Tag>
        <Simple_Goal>
            <Tag>po</Tag>
            <Ref_Hyp num="0"/>
            <Goal>
                <Id value="x" typref="0"/>
            </Goal>
        </Simple_Goal>
    </Proof_Obligation>
    <TypeInfos>
        <Type id="0">
            <Id value="BOOL"/>
        </Type>
    </TypeInfos>
</Proof_Obligations>
"#
        );
    }
}
