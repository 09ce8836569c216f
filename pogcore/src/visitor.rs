//! Traversal of the document model
//!
//! [`PogVisitor`] has one method per entity kind. The default implementations descend
//! into children through the `walk_*` functions, so a visitor only overrides what it
//! cares about and calls the matching `walk_*` to keep descending. Entities never
//! depend on a particular visitor: writing ([`crate::writer::PogXmlWriter`]) and
//! statistics ([`PogStats`]) are both plain implementations of this trait.
use std::{convert::Infallible, fmt};

use crate::pog::{Define, DefineItem, PO, POGroup, Pog, Set};

pub trait PogVisitor {
    type Error;

    fn visit_pog(&mut self, pog: &Pog) -> Result<(), Self::Error> {
        walk_pog(self, pog)
    }

    fn visit_define(&mut self, define: &Define) -> Result<(), Self::Error> {
        walk_define(self, define)
    }

    fn visit_po_group(&mut self, group: &POGroup) -> Result<(), Self::Error> {
        walk_po_group(self, group)
    }

    fn visit_po(&mut self, _po: &PO) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_set(&mut self, _set: &Set) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Visit every define, then every group.
pub fn walk_pog<V: PogVisitor + ?Sized>(visitor: &mut V, pog: &Pog) -> Result<(), V::Error> {
    for define in &pog.defines {
        visitor.visit_define(define)?;
    }
    for group in &pog.groups {
        visitor.visit_po_group(group)?;
    }
    Ok(())
}

/// Visit the sets of a define. Predicates are not entities and are not visited.
pub fn walk_define<V: PogVisitor + ?Sized>(visitor: &mut V, define: &Define) -> Result<(), V::Error> {
    for item in define.contents() {
        if let DefineItem::Set(set) = item {
            visitor.visit_set(set)?;
        }
    }
    Ok(())
}

pub fn walk_po_group<V: PogVisitor + ?Sized>(
    visitor: &mut V,
    group: &POGroup,
) -> Result<(), V::Error> {
    for po in &group.simple_goals {
        visitor.visit_po(po)?;
    }
    Ok(())
}

/// Entities that can be handed to a [`PogVisitor`].
pub trait Visitable {
    fn accept<V: PogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error>;
}

impl Visitable for Pog {
    fn accept<V: PogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_pog(self)
    }
}

impl Visitable for Define {
    fn accept<V: PogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_define(self)
    }
}

impl Visitable for POGroup {
    fn accept<V: PogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_po_group(self)
    }
}

impl Visitable for PO {
    fn accept<V: PogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_po(self)
    }
}

impl Visitable for Set {
    fn accept<V: PogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_set(self)
    }
}

/// Entity counts of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PogStats {
    pub types: usize,
    pub defines: usize,
    pub sets: usize,
    pub enumerated_sets: usize,
    pub define_predicates: usize,
    pub groups: usize,
    pub hyps: usize,
    pub local_hyps: usize,
    pub goals: usize,
    pub local_hyp_refs: usize,
}

impl PogStats {
    pub fn collect(pog: &Pog) -> Self {
        let mut stats = PogStats::default();
        let Ok(()) = pog.accept(&mut stats);
        stats
    }
}

impl PogVisitor for PogStats {
    type Error = Infallible;

    fn visit_pog(&mut self, pog: &Pog) -> Result<(), Infallible> {
        self.types += pog.type_infos.len();
        walk_pog(self, pog)
    }

    fn visit_define(&mut self, define: &Define) -> Result<(), Infallible> {
        self.defines += 1;
        self.define_predicates += define.predicates().count();
        walk_define(self, define)
    }

    fn visit_po_group(&mut self, group: &POGroup) -> Result<(), Infallible> {
        self.groups += 1;
        self.hyps += group.hyps().len();
        self.local_hyps += group.local_hyps().len();
        walk_po_group(self, group)
    }

    fn visit_po(&mut self, po: &PO) -> Result<(), Infallible> {
        self.goals += 1;
        self.local_hyp_refs += po.local_hyps_ref.len();
        Ok(())
    }

    fn visit_set(&mut self, set: &Set) -> Result<(), Infallible> {
        self.sets += 1;
        if set.is_enumerated() {
            self.enumerated_sets += 1;
        }
        Ok(())
    }
}

impl fmt::Display for PogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "types:             {}", self.types)?;
        writeln!(
            f,
            "defines:           {} ({} sets, {} enumerated, {} predicates)",
            self.defines, self.sets, self.enumerated_sets, self.define_predicates
        )?;
        writeln!(f, "groups:            {}", self.groups)?;
        writeln!(f, "hypotheses:        {}", self.hyps)?;
        writeln!(f, "local hypotheses:  {}", self.local_hyps)?;
        write!(
            f,
            "goals:             {} ({} local hypothesis references)",
            self.goals, self.local_hyp_refs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pred::Pred,
        types::{BType, TypedVar},
    };

    fn atom(name: &str) -> Pred {
        Pred::new("Id").with_attribute("value", name).with_type(BType::Bool)
    }

    fn sample() -> Pog {
        let mut ctx = Define::new("ctx", 0);
        ctx.push_set(Set::enumerated(
            TypedVar::new("S", BType::power(BType::Int)),
            vec![TypedVar::new("e1", BType::Int), TypedVar::new("e2", BType::Int)],
        ));
        ctx.push_set(Set::deferred(TypedVar::new("T", BType::power(BType::Int))));
        ctx.push_predicate(atom("p"));

        let group = POGroup::new(
            "PO1",
            0,
            vec!["ctx".into()],
            vec![atom("h1"), atom("h2")],
            vec![atom("l1")],
            vec![
                PO::new("G1", vec![0], atom("g1")),
                PO::new("G2", vec![], atom("g2")),
            ],
        );

        Pog::new(vec![BType::Int, BType::Bool], vec![ctx], vec![group])
    }

    #[test]
    fn stats_count_every_entity() {
        let stats = PogStats::collect(&sample());
        assert_eq!(
            stats,
            PogStats {
                types: 2,
                defines: 1,
                sets: 2,
                enumerated_sets: 1,
                define_predicates: 1,
                groups: 1,
                hyps: 2,
                local_hyps: 1,
                goals: 2,
                local_hyp_refs: 1,
            }
        );
        assert!(stats.to_string().contains("goals:             2"));
    }

    /// A visitor that stops at the first goal without a local hypothesis reference.
    struct FirstUnsupportedGoal;

    impl PogVisitor for FirstUnsupportedGoal {
        type Error = String;

        fn visit_po(&mut self, po: &PO) -> Result<(), String> {
            if po.local_hyps_ref.is_empty() {
                Err(po.tag.clone())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn errors_stop_the_walk() {
        assert_eq!(sample().accept(&mut FirstUnsupportedGoal), Err("G2".to_string()));
    }

    #[derive(Default)]
    struct Order(Vec<String>);

    impl PogVisitor for Order {
        type Error = Infallible;

        fn visit_define(&mut self, define: &Define) -> Result<(), Infallible> {
            self.0.push(format!("define {}", define.name));
            walk_define(self, define)
        }

        fn visit_set(&mut self, set: &Set) -> Result<(), Infallible> {
            self.0.push(format!("set {}", set.set_name.name));
            Ok(())
        }

        fn visit_po(&mut self, po: &PO) -> Result<(), Infallible> {
            self.0.push(format!("po {}", po.tag));
            Ok(())
        }
    }

    #[test]
    fn default_walk_follows_document_order() {
        let mut order = Order::default();
        let Ok(()) = sample().accept(&mut order);
        assert_eq!(order.0, ["define ctx", "set S", "set T", "po G1", "po G2"]);
    }
}
