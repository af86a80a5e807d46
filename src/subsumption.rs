use crate::clause::Clause;
use crate::clauseset::ClauseSet;
use crate::literal::Literal;
use crate::substitution::BtSubst;

// Try to extend subst so that subst(subsumer) becomes a multi-subset
// of subsumed. Recursive backtracking search: each literal of the
// subsumer must match a distinct literal of the subsumed clause under
// one common substitution.
fn subsume_lit_lists(subsumer: &[Literal], subsumed: &[&Literal], subst: &mut BtSubst) -> bool {
    if subsumer.is_empty() {
        return true;
    }
    let first = &subsumer[0];
    let rest_subsumer = &subsumer[1..];
    for (i, lit) in subsumed.iter().enumerate() {
        let state = subst.state();
        if first.match_lit(lit, subst) {
            let mut rest = subsumed.to_vec();
            rest.remove(i);
            if subsume_lit_lists(rest_subsumer, &rest, subst) {
                return true;
            }
        }
        subst.backtrack_to_state(state);
    }
    false
}

/// True if subsumer subsumes subsumed: some substitution sigma makes
/// sigma(subsumer) a multi-subset of subsumed.
pub fn subsumes(subsumer: &Clause, subsumed: &Clause) -> bool {
    if subsumer.len() > subsumed.len() {
        return false;
    }
    let mut subst = BtSubst::new();
    let subsumed_lits: Vec<&Literal> = subsumed.literals.iter().collect();
    subsume_lit_lists(&subsumer.literals, &subsumed_lits, &mut subst)
}

/// True if any clause of the set subsumes the given clause. A subsumed
/// given clause is redundant: all its inferences are covered by the
/// more general clause already processed.
pub fn forward_subsumption(set: &ClauseSet, clause: &Clause) -> bool {
    set.get_subsuming_candidates(clause)
        .iter()
        .any(|candidate| subsumes(candidate, clause))
}

/// Remove every clause of the set that the given clause subsumes.
/// Returns the number of clauses removed.
pub fn backward_subsumption(clause: &Clause, set: &mut ClauseSet) -> usize {
    let subsumed_ids: Vec<u64> = set
        .get_subsumed_candidates(clause)
        .iter()
        .filter(|candidate| subsumes(clause, candidate))
        .map(|candidate| candidate.id)
        .collect();
    let res = subsumed_ids.len();
    for id in subsumed_ids {
        set.extract_clause(id);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use std::rc::Rc;

    fn c(s: &str) -> Clause {
        Clause::parse(s)
    }

    #[test]
    fn test_subsumes() {
        let empty = c("cnf(c1, axiom, $false).");
        let ground_unit = c("cnf(c2, axiom, p(a)).");
        let var_unit = c("cnf(c3, axiom, p(X)).");
        let double = c("cnf(c4, axiom, p(a)|q(f(X))).");
        let triple = c("cnf(c5, axiom, p(a)|q(f(b))|p(X)).");
        let refl_x = c("cnf(c6, axiom, X=X).");
        let refl_y = c("cnf(c7, axiom, Y=Y).");

        // Everything subsumes itself.
        for clause in [&empty, &ground_unit, &var_unit, &double, &triple] {
            assert!(subsumes(clause, clause));
        }

        // The empty clause subsumes everything.
        assert!(subsumes(&empty, &ground_unit));
        assert!(!subsumes(&ground_unit, &empty));

        // p(X) subsumes p(a), not the other way around.
        assert!(subsumes(&var_unit, &ground_unit));
        assert!(!subsumes(&ground_unit, &var_unit));

        // p(a)|q(f(X)) subsumes p(a)|q(f(b))|p(X).
        assert!(subsumes(&double, &triple));
        assert!(!subsumes(&triple, &double));

        // Subsumption up to variable renaming.
        assert!(subsumes(&refl_x, &refl_y));
        assert!(subsumes(&refl_y, &refl_x));
    }

    #[test]
    fn test_multiset_discipline() {
        // p(X)|p(Y) needs two distinct literals in the target; a single
        // p(a) does not admit a multi-subset image.
        let two = c("cnf(d, axiom, p(X)|p(Y)).");
        let one = c("cnf(s, axiom, p(a)).");
        let two_ground = c("cnf(g, axiom, p(a)|p(b)).");
        assert!(!subsumes(&two, &one));
        assert!(subsumes(&two, &two_ground));
    }

    #[test]
    fn test_forward_and_backward() {
        let spec = "
cnf(c1, axiom, p(a)|p(X)).
cnf(c2, axiom, p(X)).
cnf(c3, axiom, q(a)|q(X)).
";
        let mut set = ClauseSet::new();
        let mut lexer = Lexer::new(spec);
        set.parse(&mut lexer).unwrap();

        // p(b)|p(c) is subsumed by p(X) in the set.
        let query = c("cnf(q1, axiom, p(b)|p(c)).");
        assert!(forward_subsumption(&set, &query));

        let query = c("cnf(q2, axiom, r(a)).");
        assert!(!forward_subsumption(&set, &query));

        // q(X) subsumes q(a)|q(X) but nothing else.
        let query = Rc::new(c("cnf(q3, axiom, q(X))."));
        let removed = backward_subsumption(&query, &mut set);
        assert_eq!(removed, 1);
        assert_eq!(set.len(), 2);
        assert!(set.clauses.iter().all(|clause| clause.name != "c3"));
    }

    #[test]
    fn test_indexed_candidates_are_sound() {
        // The indexed set must find the same subsumptions as the plain
        // one.
        let spec = "
cnf(c1, axiom, p(a)|p(X)).
cnf(c2, axiom, p(X)).
cnf(c3, axiom, q(a)|q(X)).
";
        let mut set = ClauseSet::indexed();
        let mut lexer = Lexer::new(spec);
        set.parse(&mut lexer).unwrap();

        let query = c("cnf(q1, axiom, p(b)|p(c)).");
        assert!(forward_subsumption(&set, &query));

        let query = c("cnf(q3, axiom, q(X)).");
        let removed = backward_subsumption(&query, &mut set);
        assert_eq!(removed, 1);
    }
}
