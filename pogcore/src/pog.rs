//! Document model
//!
//! A [`Pog`] is built once by the reader (or programmatically) and is read-only
//! afterwards. Hypotheses are stored one conjunct per entry: [`Define::push_predicate`]
//! and [`POGroup::new`] panic when handed a top-level conjunction, use
//! [`Pred::into_conjuncts`] first.
use strum::{EnumIs, EnumTryAs};

use crate::{
    pred::Pred,
    types::{BType, TypedVar},
    utils::error::{PogError, PogResult},
};

/// A carrier set declaration. Deferred sets have no elements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Set {
    pub set_name: TypedVar,
    pub elts: Vec<TypedVar>,
}

impl Set {
    pub fn deferred(set_name: TypedVar) -> Self {
        Self {
            set_name,
            elts: Vec::new(),
        }
    }

    pub fn enumerated(set_name: TypedVar, elts: Vec<TypedVar>) -> Self {
        Self { set_name, elts }
    }

    pub fn is_deferred(&self) -> bool {
        self.elts.is_empty()
    }

    pub fn is_enumerated(&self) -> bool {
        !self.elts.is_empty()
    }
}

/// One entry of a [`Define`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum DefineItem {
    Set(Set),
    Predicate(Pred),
}

/// A named bundle of sets and predicates shared by several groups.
///
/// Sets and predicates live in a single sequence: the order in which they are
/// interleaved is part of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Define {
    pub name: String,
    /// `0` when the document records no hash.
    pub hash: u64,
    contents: Vec<DefineItem>,
}

impl Define {
    pub fn new(name: impl Into<String>, hash: u64) -> Self {
        Self {
            name: name.into(),
            hash,
            contents: Vec::new(),
        }
    }

    pub fn push_set(&mut self, set: Set) {
        self.contents.push(DefineItem::Set(set));
    }

    /// Append a predicate.
    ///
    /// # Panics
    /// If `pred` is a top-level conjunction.
    pub fn push_predicate(&mut self, pred: Pred) {
        assert!(
            !pred.is_conjunction(),
            "define `{}` cannot store a conjunction, split it into conjuncts",
            self.name
        );
        self.contents.push(DefineItem::Predicate(pred));
    }

    pub fn contents(&self) -> &[DefineItem] {
        &self.contents
    }

    pub fn sets(&self) -> impl Iterator<Item = &Set> {
        self.contents.iter().filter_map(DefineItem::try_as_set_ref)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Pred> {
        self.contents
            .iter()
            .filter_map(DefineItem::try_as_predicate_ref)
    }
}

/// A single goal of a [`POGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PO {
    pub tag: String,
    /// Positions in the enclosing group's local hypotheses. Not range-checked on
    /// construction.
    pub local_hyps_ref: Vec<usize>,
    pub goal: Pred,
}

impl PO {
    pub fn new(tag: impl Into<String>, local_hyps_ref: Vec<usize>, goal: Pred) -> Self {
        Self {
            tag: tag.into(),
            local_hyps_ref,
            goal,
        }
    }

    /// Local hypotheses of `group` referenced by this goal, in reference order.
    /// References past the end of the group's local hypotheses are skipped.
    pub fn local_hyps<'a>(&'a self, group: &'a POGroup) -> impl Iterator<Item = &'a Pred> + 'a {
        self.local_hyps_ref
            .iter()
            .filter_map(|&index| group.local_hyps.get(index))
    }
}

/// Goals, hypotheses and local hypotheses produced for one verified construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct POGroup {
    pub tag: String,
    /// `0` when the document records no hash.
    pub goal_hash: u64,
    /// Names of the [`Define`]s this group depends on, unresolved.
    pub definitions: Vec<String>,
    hyps: Vec<Pred>,
    local_hyps: Vec<Pred>,
    pub simple_goals: Vec<PO>,
}

impl POGroup {
    /// # Panics
    /// If any hypothesis or local hypothesis is a top-level conjunction.
    pub fn new(
        tag: impl Into<String>,
        goal_hash: u64,
        definitions: Vec<String>,
        hyps: Vec<Pred>,
        local_hyps: Vec<Pred>,
        simple_goals: Vec<PO>,
    ) -> Self {
        let tag = tag.into();
        assert!(
            hyps.iter().chain(&local_hyps).all(|p| !p.is_conjunction()),
            "group `{}` cannot store a conjunction as hypothesis, split it into conjuncts",
            tag
        );

        Self {
            tag,
            goal_hash,
            definitions,
            hyps,
            local_hyps,
            simple_goals,
        }
    }

    pub fn hyps(&self) -> &[Pred] {
        &self.hyps
    }

    pub fn local_hyps(&self) -> &[Pred] {
        &self.local_hyps
    }

    /// Check that every goal only references existing local hypotheses.
    pub fn check_local_hyp_refs(&self) -> PogResult<()> {
        for po in &self.simple_goals {
            if let Some(&index) = po
                .local_hyps_ref
                .iter()
                .find(|&&index| index >= self.local_hyps.len())
            {
                return Err(PogError::LocalHypOutOfRange {
                    group: self.tag.clone(),
                    goal: po.tag.clone(),
                    index,
                    len: self.local_hyps.len(),
                });
            }
        }
        Ok(())
    }
}

/// A proof obligation document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pog {
    pub defines: Vec<Define>,
    pub groups: Vec<POGroup>,
    /// The type table; types are referenced by position in the encoded document.
    pub type_infos: Vec<BType>,
}

impl Pog {
    pub fn new(type_infos: Vec<BType>, defines: Vec<Define>, groups: Vec<POGroup>) -> Self {
        Self {
            defines,
            groups,
            type_infos,
        }
    }

    pub fn define(&self, name: &str) -> Option<&Define> {
        self.defines.iter().find(|define| define.name == name)
    }

    /// Defines referenced by `group`, in reference order. Names without a matching
    /// define are skipped.
    pub fn definitions_of<'a>(&'a self, group: &'a POGroup) -> impl Iterator<Item = &'a Define> + 'a {
        group
            .definitions
            .iter()
            .filter_map(move |name| self.define(name))
    }

    /// Total number of goals over all groups.
    pub fn goal_count(&self) -> usize {
        self.groups.iter().map(|group| group.simple_goals.len()).sum()
    }
}
