use std::rc::Rc;

use crate::clause::{Clause, ClauseType};
use crate::clauseset::ClauseSet;
use crate::derivation::{Ancestor, Derivation};
use crate::unification::mgu;

/// Try to resolve clause1 at position lit1 against clause2 at position
/// lit2. The literals must have opposite polarity and unifiable atoms;
/// otherwise there is no resolvent and the result is None.
///
/// The premises must be variable-disjoint. The saturation loop
/// guarantees this by taking a fresh-variable copy of the given clause.
pub fn resolution(
    clause1: &Rc<Clause>,
    lit1: usize,
    clause2: &Rc<Clause>,
    lit2: usize,
) -> Option<Clause> {
    let l1 = clause1.get_literal(lit1);
    let l2 = clause2.get_literal(lit2);
    if l1.is_negative() == l2.is_negative() {
        return None;
    }
    let sigma = mgu(&l1.atom, &l2.atom)?;

    let mut literals = vec![];
    for (i, literal) in clause1.literals.iter().enumerate() {
        if i != lit1 {
            literals.push(literal.instantiate(&sigma));
        }
    }
    for (i, literal) in clause2.literals.iter().enumerate() {
        if i != lit2 {
            literals.push(literal.instantiate(&sigma));
        }
    }

    let mut res = Clause::new(literals, ClauseType::Plain);
    res.remove_dup_lits();
    res.derivation = Some(Derivation::flat(
        "resolution",
        &[
            Ancestor::Clause(clause1.clone()),
            Ancestor::Clause(clause2.clone()),
        ],
    ));
    res.part_of_sos
        .set(clause1.part_of_sos.get() || clause2.part_of_sos.get());
    Some(res)
}

/// Try to form a factor of the clause by unifying the literals at
/// positions lit1 and lit2 (which must have the same polarity). The
/// factor keeps the literal at lit1 and drops the one at lit2.
pub fn factor(clause: &Rc<Clause>, lit1: usize, lit2: usize) -> Option<Clause> {
    let l1 = clause.get_literal(lit1);
    let l2 = clause.get_literal(lit2);
    if l1.is_negative() != l2.is_negative() {
        return None;
    }
    let sigma = mgu(&l1.atom, &l2.atom)?;

    let mut literals = vec![];
    for (i, literal) in clause.literals.iter().enumerate() {
        if i != lit2 {
            literals.push(literal.instantiate(&sigma));
        }
    }

    let mut res = Clause::new(literals, ClauseType::Plain);
    res.remove_dup_lits();
    res.derivation = Some(Derivation::flat("factor", &[Ancestor::Clause(clause.clone())]));
    res.part_of_sos.set(clause.part_of_sos.get());
    Some(res)
}

/// Compute all binary resolvents between the given clause and the
/// clauses of the set.
///
/// This is the workhorse of the given-clause algorithm: when a clause
/// moves from unprocessed to processed, all resolvents between it and
/// the processed clauses are generated to maintain the invariant that
/// all inferences among processed clauses have been performed. Only
/// inference literals participate on either side.
pub fn compute_all_resolvents(clause: &Rc<Clause>, clauseset: &ClauseSet) -> Vec<Clause> {
    let mut res = vec![];
    for lit in 0..clause.len() {
        if !clause.get_literal(lit).is_inference_lit() {
            continue;
        }
        let partners = clauseset.get_resolution_literals(clause.get_literal(lit));
        for (clause2, lit2) in partners {
            if let Some(resolvent) = resolution(clause, lit, &clause2, lit2) {
                res.push(resolvent);
            }
        }
    }
    res
}

/// Compute all direct factors of the clause. Quadratic in the number
/// of literals, but factoring is almost never a critical operation:
/// single-clause operations are much cheaper than clause/clause-set
/// operations.
pub fn compute_all_factors(clause: &Rc<Clause>) -> Vec<Clause> {
    let mut res = vec![];
    for i in 0..clause.len() {
        for j in i + 1..clause.len() {
            if clause.get_literal(i).is_inference_lit() || clause.get_literal(j).is_inference_lit()
            {
                if let Some(fact) = factor(clause, i, j) {
                    res.push(fact);
                }
            }
        }
    }
    res
}
