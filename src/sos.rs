use std::rc::Rc;

use crate::clause::{Clause, ClauseType};

/// How the initial clause set is partitioned into the set of support
/// and the base set. The base set must be satisfiable on its own;
/// resolution restricted to derivations touching the SOS then stays
/// complete (Wos et al.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosKind {
    /// No clause is put into the SOS.
    NoSos,
    /// The negated conjecture clauses form the SOS. The axioms are
    /// assumed to be consistent on their own.
    Conjecture,
    /// Clauses with only negative literals form the SOS; interpreting
    /// every atom as true satisfies the rest.
    OnlyNegLit,
    /// Clauses with only positive literals form the SOS; interpreting
    /// every atom as false satisfies the rest.
    OnlyPosLit,
}

/// The SOS strategy names accepted on the command line.
pub const SOS_STRATEGY_NAMES: [&str; 4] = ["NoSos", "Conjecture", "OnlyNegLit", "OnlyPosLit"];

impl SosKind {
    pub fn from_name(name: &str) -> Option<SosKind> {
        match name {
            "NoSos" => Some(SosKind::NoSos),
            "Conjecture" => Some(SosKind::Conjecture),
            "OnlyNegLit" => Some(SosKind::OnlyNegLit),
            "OnlyPosLit" => Some(SosKind::OnlyPosLit),
            _ => None,
        }
    }
}

/// A partition strategy together with the ratio-based selection
/// policy. Ratio 0 means strict SOS: the strategy always asks for an
/// SOS clause, and saturation moves all non-SOS clauses straight into
/// the processed set. A positive ratio r yields r SOS picks followed
/// by one non-SOS pick.
#[derive(Debug, Clone)]
pub struct SosStrategy {
    pub kind: SosKind,
    pub ratio: usize,
    current: usize,
}

impl SosStrategy {
    pub fn new(kind: SosKind, ratio: usize) -> SosStrategy {
        SosStrategy {
            kind,
            ratio,
            current: 0,
        }
    }

    pub fn no_sos() -> SosStrategy {
        SosStrategy::new(SosKind::NoSos, 0)
    }

    pub fn should_mark_clause(&self, clause: &Clause) -> bool {
        match self.kind {
            SosKind::NoSos => false,
            SosKind::Conjecture => clause.ctype == ClauseType::NegatedConjecture,
            SosKind::OnlyNegLit => clause.literals.iter().all(|l| l.is_negative()),
            SosKind::OnlyPosLit => clause.literals.iter().all(|l| l.is_positive()),
        }
    }

    /// Mark every clause of the set, returning the number of SOS
    /// clauses.
    pub fn mark_sos(&self, clauses: &[Rc<Clause>]) -> usize {
        let mut num_sos_clauses = 0;
        for clause in clauses {
            let mark = self.should_mark_clause(clause);
            clause.part_of_sos.set(mark);
            if mark {
                num_sos_clauses += 1;
            }
        }
        num_sos_clauses
    }

    /// Whether the next pick should come from the set of support.
    pub fn should_apply(&mut self) -> bool {
        if self.kind == SosKind::NoSos {
            return false;
        }
        if self.ratio == 0 {
            return true;
        }
        self.current += 1;
        if self.current > self.ratio {
            self.current = 0;
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem() -> Vec<Rc<Clause>> {
        [
            "cnf(positive_axiom, axiom, p(X)|q(X)).",
            "cnf(negative_axiom, axiom, ~p(X)|~q(X)).",
            "cnf(mixed_axiom, axiom, ~p(X)|q(X)).",
            "cnf(positive_conjecture, negated_conjecture, p(X)|q(X)).",
            "cnf(negative_conjecture, negated_conjecture, ~p(X)|~q(X)).",
            "cnf(mixed_conjecture, negated_conjecture, ~p(X)|q(X)).",
        ]
        .iter()
        .map(|s| Rc::new(Clause::parse(s)))
        .collect()
    }

    fn marks(kind: SosKind) -> Vec<bool> {
        let clauses = problem();
        SosStrategy::new(kind, 0).mark_sos(&clauses);
        clauses.iter().map(|c| c.part_of_sos.get()).collect()
    }

    #[test]
    fn test_marking() {
        assert_eq!(
            marks(SosKind::NoSos),
            vec![false, false, false, false, false, false]
        );
        assert_eq!(
            marks(SosKind::Conjecture),
            vec![false, false, false, true, true, true]
        );
        assert_eq!(
            marks(SosKind::OnlyPosLit),
            vec![true, false, false, true, false, false]
        );
        assert_eq!(
            marks(SosKind::OnlyNegLit),
            vec![false, true, false, false, true, false]
        );
    }

    #[test]
    fn test_ratio_zero_always_applies() {
        let mut strategy = SosStrategy::new(SosKind::Conjecture, 0);
        let applied: Vec<bool> = (0..10).map(|_| strategy.should_apply()).collect();
        assert!(applied.iter().all(|&b| b));
    }

    #[test]
    fn test_ratio_two() {
        let mut strategy = SosStrategy::new(SosKind::Conjecture, 2);
        let applied: Vec<bool> = (0..10).map(|_| strategy.should_apply()).collect();
        assert_eq!(
            applied,
            vec![true, true, false, true, true, false, true, true, false, true]
        );
    }

    #[test]
    fn test_no_sos_never_applies() {
        let mut strategy = SosStrategy::new(SosKind::NoSos, 2);
        let applied: Vec<bool> = (0..10).map(|_| strategy.should_apply()).collect();
        assert!(applied.iter().all(|&b| !b));
    }
}
