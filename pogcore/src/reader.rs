//! Document reader
//!
//! Builds a [`Pog`] from a parsed markup tree in a single top-down pass. The type table
//! is decoded first because every other element refers to it; defines and groups
//! follow in document order. The first violation aborts the whole read.
use std::path::Path;

use log::debug;

use crate::{
    magic::{
        ATTR_GOAL_HASH, ATTR_HASH, ATTR_NAME, ATTR_NUM, ATTR_TYPREF, ATTR_VALUE, TAG_DEFINE,
        TAG_DEFINITION, TAG_ENUMERATED_VALUES, TAG_GOAL, TAG_HYPOTHESIS, TAG_ID, TAG_LOCAL_HYP,
        TAG_PO_GROUP, TAG_REF_HYP, TAG_ROOT, TAG_SET, TAG_SIMPLE_GOAL, TAG_TAG, TAG_TYPE_INFOS,
    },
    markup::{Element, parse_document, parse_path},
    pog::{Define, PO, POGroup, Pog, Set},
    pred::Pred,
    types::{TypedVar, table::TypeTable},
    utils::{
        conf::ReaderConfig,
        error::{PogError, PogResult},
    },
};

struct Reader<'a> {
    config: &'a ReaderConfig,
    types: TypeTable,
}

impl Reader<'_> {
    /// Skip an element this reader does not know, or reject it in strict mode.
    fn unknown_child(&self, child: &Element, parent: &str) -> PogResult<()> {
        if self.config.strict_elements {
            Err(PogError::unexpected_tag(child.name(), format!("'{}' tag", parent)))
        } else {
            Ok(())
        }
    }

    /// Read the single predicate wrapped by `wrapper`, split into its conjuncts.
    fn read_hypothesis(&self, wrapper: &Element) -> PogResult<Vec<Pred>> {
        Ok(Pred::read(wrapper.single_child()?, &self.types)?.into_conjuncts())
    }

    fn read_typed_var(&self, id: &Element) -> PogResult<TypedVar> {
        let name = id.require_attribute(ATTR_VALUE)?;
        let typref: usize = id.require_parsed_attribute(ATTR_TYPREF)?;
        Ok(TypedVar::new(name, self.types.resolve(typref)?.clone()))
    }

    fn read_set(&self, element: &Element) -> PogResult<Set> {
        let set_name = self.read_typed_var(element.require_child(TAG_ID)?)?;
        let elts = match element.first_child(TAG_ENUMERATED_VALUES) {
            Some(values) => values
                .children_named(TAG_ID)
                .map(|id| self.read_typed_var(id))
                .collect::<PogResult<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(Set::enumerated(set_name, elts))
    }

    fn read_define(&self, element: &Element) -> PogResult<Define> {
        let mut define = Define::new(
            element.require_attribute(ATTR_NAME)?,
            element.hash_attribute(ATTR_HASH)?,
        );

        for child in element.children() {
            if child.name() == TAG_SET {
                define.push_set(self.read_set(child)?);
            } else {
                for conjunct in Pred::read(child, &self.types)?.into_conjuncts() {
                    define.push_predicate(conjunct);
                }
            }
        }
        Ok(define)
    }

    fn read_po(&self, element: &Element) -> PogResult<PO> {
        let tag = element.require_child(TAG_TAG)?.text();
        let mut local_hyps_ref: Vec<usize> = Vec::new();

        for child in element.children() {
            match child.name() {
                TAG_REF_HYP => local_hyps_ref.push(child.require_parsed_attribute(ATTR_NUM)?),
                TAG_TAG | TAG_GOAL => {}
                _ => self.unknown_child(child, TAG_SIMPLE_GOAL)?,
            }
        }

        let goal = element.require_child(TAG_GOAL)?.single_child()?;
        Ok(PO::new(tag, local_hyps_ref, Pred::read(goal, &self.types)?))
    }

    fn read_po_group(&self, element: &Element) -> PogResult<POGroup> {
        let goal_hash = element.hash_attribute(ATTR_GOAL_HASH)?;
        let tag = element.require_child(TAG_TAG)?.text();

        let mut definitions = Vec::new();
        let mut hyps = Vec::new();
        let mut local_hyps = Vec::new();
        let mut simple_goals = Vec::new();

        for child in element.children() {
            match child.name() {
                TAG_DEFINITION => {
                    definitions.push(child.require_attribute(ATTR_NAME)?.to_string());
                }
                TAG_HYPOTHESIS => hyps.extend(self.read_hypothesis(child)?),
                TAG_LOCAL_HYP => local_hyps.extend(self.read_hypothesis(child)?),
                TAG_SIMPLE_GOAL => simple_goals.push(self.read_po(child)?),
                TAG_TAG => {}
                _ => self.unknown_child(child, TAG_PO_GROUP)?,
            }
        }

        let group = POGroup::new(tag, goal_hash, definitions, hyps, local_hyps, simple_goals);
        if self.config.check_local_hyp_refs {
            group.check_local_hyp_refs()?;
        }
        Ok(group)
    }
}

/// Build a document from its root element.
pub fn read_document(root: &Element, config: &ReaderConfig) -> PogResult<Pog> {
    if root.name() != TAG_ROOT {
        return Err(PogError::MissingRoot {
            found: format!("'{}'", root.name()),
        });
    }

    let mut type_infos = root.children_named(TAG_TYPE_INFOS);
    let types = match type_infos.next() {
        Some(element) => TypeTable::decode(element)?,
        None => TypeTable::default(),
    };
    if type_infos.next().is_some() {
        return Err(PogError::DuplicateElement {
            tag: TAG_TYPE_INFOS.to_string(),
            parent: TAG_ROOT.to_string(),
        });
    }

    let reader = Reader { config, types };
    let mut defines = Vec::new();
    let mut groups = Vec::new();

    for child in root.children() {
        match child.name() {
            TAG_DEFINE => defines.push(reader.read_define(child)?),
            TAG_PO_GROUP => groups.push(reader.read_po_group(child)?),
            TAG_TYPE_INFOS => {}
            _ => reader.unknown_child(child, TAG_ROOT)?,
        }
    }

    let pog = Pog::new(reader.types.into_inner(), defines, groups);
    debug!(
        "Read POG document: {} type(s), {} define(s), {} group(s), {} goal(s).",
        pog.type_infos.len(),
        pog.defines.len(),
        pog.groups.len(),
        pog.goal_count()
    );
    Ok(pog)
}

/// Parse and read a document held in memory.
pub fn read_str(text: &str, config: &ReaderConfig) -> PogResult<Pog> {
    read_document(&parse_document(text, "<input>")?, config)
}

/// Parse and read a document from a file.
pub fn read_path(path: &Path, config: &ReaderConfig) -> PogResult<Pog> {
    read_document(&parse_path(path)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BType;

    const TYPES: &str = r#"<TypeInfos>
        <Type id="0"><Id value="INTEGER"/></Type>
        <Type id="1"><Id value="BOOL"/></Type>
        <Type id="2"><Unary_Exp op="POW"><Id value="INTEGER"/></Unary_Exp></Type>
    </TypeInfos>"#;

    fn read(body: &str) -> PogResult<Pog> {
        read_with(body, &ReaderConfig::default())
    }

    fn read_with(body: &str, config: &ReaderConfig) -> PogResult<Pog> {
        read_str(&format!("<Proof_Obligations>{}{}</Proof_Obligations>", body, TYPES), config)
    }

    const GOAL: &str = r#"<Goal><Id value="g" typref="1"/></Goal>"#;

    #[test]
    fn type_table_may_come_last() {
        let pog = read(r#"<Define name="ctx"><Id value="p" typref="1"/></Define>"#).unwrap();
        assert_eq!(pog.type_infos.len(), 3);
        let pred = pog.defines[0].predicates().next().unwrap();
        assert_eq!(pred.ty(), Some(&BType::Bool));
    }

    #[test]
    fn missing_type_table_is_empty() {
        let pog = read_str(
            r#"<Proof_Obligations><Define name="ctx"/></Proof_Obligations>"#,
            &ReaderConfig::default(),
        )
        .unwrap();
        assert!(pog.type_infos.is_empty());
        assert_eq!(pog.defines[0].name, "ctx");
    }

    #[test]
    fn second_type_table_is_rejected() {
        let err = read(TYPES).unwrap_err();
        assert!(err.is_duplicate_element());
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = read_str("<Proof_Obligation/>", &ReaderConfig::default()).unwrap_err();
        assert!(err.is_missing_root());
        assert!(err.to_string().contains("'Proof_Obligation'"));
    }

    #[test]
    fn hashes_accept_hex_and_default_to_zero() {
        let pog = read(&format!(
            r#"<Define name="a" hash="0x1F"/><Define name="b"/>
               <Proof_Obligation goalHash="42"><Tag>t</Tag></Proof_Obligation>
               <Proof_Obligation><Tag>u</Tag><Simple_Goal><Tag>g</Tag>{}</Simple_Goal></Proof_Obligation>"#,
            GOAL
        ))
        .unwrap();
        assert_eq!(pog.defines[0].hash, 31);
        assert_eq!(pog.defines[1].hash, 0);
        assert_eq!(pog.groups[0].goal_hash, 42);
        assert_eq!(pog.groups[1].goal_hash, 0);
    }

    #[test]
    fn define_needs_name() {
        let err = read("<Define/>").unwrap_err();
        assert_eq!(err.to_string(), "Missing 'name' attribute in 'Define' tag.");
    }

    #[test]
    fn set_without_id_is_rejected() {
        let err = read(r#"<Define name="ctx"><Set/></Define>"#).unwrap_err();
        assert!(err.is_missing_element());
    }

    #[test]
    fn set_id_needs_typref() {
        let err = read(r#"<Define name="ctx"><Set><Id value="S"/></Set></Define>"#).unwrap_err();
        assert!(matches!(err, PogError::MissingAttribute { ref attribute, .. } if attribute == "typref"));
    }

    #[test]
    fn deferred_and_enumerated_sets() {
        let pog = read(
            r#"<Define name="ctx">
                <Set><Id value="D" typref="2"/></Set>
                <Set><Id value="S" typref="2"/>
                    <Enumerated_Values><Id value="e1" typref="0"/><Id value="e2" typref="0"/></Enumerated_Values>
                </Set>
            </Define>"#,
        )
        .unwrap();
        let sets: Vec<&Set> = pog.defines[0].sets().collect();
        assert!(sets[0].is_deferred());
        assert_eq!(sets[0].set_name, TypedVar::new("D", BType::power(BType::Int)));
        let names: Vec<&str> = sets[1].elts.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["e1", "e2"]);
    }

    #[test]
    fn unknown_typref_in_set() {
        let err = read(r#"<Define name="ctx"><Set><Id value="S" typref="9"/></Set></Define>"#)
            .unwrap_err();
        assert!(err.is_unknown_type_ref());
    }

    #[test]
    fn conjunctive_hypothesis_is_split() {
        let pog = read(&format!(
            r#"<Proof_Obligation><Tag>t</Tag>
                <Hypothesis>
                    <Nary_Pred op="&amp;">
                        <Id value="a" typref="1"/>
                        <Binary_Pred op="&amp;"><Id value="b" typref="1"/><Id value="c" typref="1"/></Binary_Pred>
                    </Nary_Pred>
                </Hypothesis>
                <Local_Hyp><Binary_Pred op="=&gt;"><Id value="d" typref="1"/><Id value="e" typref="1"/></Binary_Pred></Local_Hyp>
                <Simple_Goal><Tag>g</Tag>{}</Simple_Goal>
            </Proof_Obligation>"#,
            GOAL
        ))
        .unwrap();

        let group = &pog.groups[0];
        let names: Vec<&str> = group
            .hyps()
            .iter()
            .map(|p| p.attribute("value").unwrap())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(group.local_hyps().len(), 1);
        assert_eq!(group.local_hyps()[0].attribute("op"), Some("=>"));
    }

    #[test]
    fn hypothesis_wraps_exactly_one_predicate() {
        let err = read(r#"<Proof_Obligation><Tag>t</Tag><Hypothesis/></Proof_Obligation>"#)
            .unwrap_err();
        assert!(err.is_child_count());
    }

    #[test]
    fn group_requires_tag() {
        let err = read("<Proof_Obligation/>").unwrap_err();
        assert_eq!(err.to_string(), "Missing 'Tag' element in 'Proof_Obligation' tag.");
    }

    #[test]
    fn simple_goal_requires_goal() {
        let err = read(
            r#"<Proof_Obligation><Tag>t</Tag><Simple_Goal><Tag>g</Tag></Simple_Goal></Proof_Obligation>"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing 'Goal' element in 'Simple_Goal' tag.");
    }

    #[test]
    fn ref_hyp_must_be_numeric() {
        let err = read(&format!(
            r#"<Proof_Obligation><Tag>t</Tag>
                <Simple_Goal><Tag>g</Tag><Ref_Hyp num="x"/>{}</Simple_Goal>
            </Proof_Obligation>"#,
            GOAL
        ))
        .unwrap_err();
        assert!(err.is_invalid_integer());
    }

    #[test]
    fn definitions_and_ref_hyps_keep_order() {
        let pog = read(&format!(
            r#"<Proof_Obligation><Tag>t</Tag>
                <Definition name="B"/><Definition name="A"/>
                <Simple_Goal><Tag>g</Tag><Ref_Hyp num="2"/><Ref_Hyp num="0"/>{}</Simple_Goal>
            </Proof_Obligation>"#,
            GOAL
        ))
        .unwrap();
        let group = &pog.groups[0];
        assert_eq!(group.definitions, ["B", "A"]);
        assert_eq!(group.simple_goals[0].local_hyps_ref, [2, 0]);
    }

    #[test]
    fn unknown_children_are_skipped_unless_strict() {
        let body = format!(
            r#"<Comment/><Proof_Obligation><Tag>t</Tag><Note/>
                <Simple_Goal><Tag>g</Tag><Hint/>{}</Simple_Goal>
            </Proof_Obligation>"#,
            GOAL
        );
        let pog = read(&body).unwrap();
        assert_eq!(pog.goal_count(), 1);

        let strict = ReaderConfig {
            strict_elements: true,
            ..Default::default()
        };
        let err = read_with(&body, &strict).unwrap_err();
        assert!(matches!(err, PogError::UnexpectedTag { ref tag, .. } if tag == "Comment"));
    }
}
