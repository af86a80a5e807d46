use std::collections::BTreeSet;

use crate::clause::Clause;
use crate::kbo::{kbo_compare, CompareResult, Ocb};
use crate::literal::Literal;

/// The negative-literal selection strategies. Each takes the negative
/// literals of a clause and picks the sublist (normally one literal)
/// that becomes the clause's inference literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralSelector {
    /// The first negative literal.
    First,
    /// The negative literal with the smallest symbol-count weight.
    Smallest,
    /// The negative literal with the largest symbol-count weight.
    Largest,
    /// Fewest distinct variables, ties broken by larger weight.
    LeastVars,
    /// Like LeastVars, but a pure variable equation X=Y wins outright.
    EqLeastVars,
}

/// The selector names accepted on the command line.
pub const LITERAL_SELECTOR_NAMES: [&str; 5] =
    ["first", "smallest", "largest", "leastvars", "eqleastvars"];

// Number of distinct variables, negated weight. Sorting by this pair
// prefers few variables and, among those, heavy literals.
fn var_size_eval(literal: &Literal) -> (usize, i64) {
    let mut vars = BTreeSet::new();
    literal.collect_vars(&mut vars);
    (vars.len(), -literal.weight(1, 1))
}

impl LiteralSelector {
    pub fn from_name(name: &str) -> Option<LiteralSelector> {
        match name {
            "first" => Some(LiteralSelector::First),
            "smallest" => Some(LiteralSelector::Smallest),
            "largest" => Some(LiteralSelector::Largest),
            "leastvars" => Some(LiteralSelector::LeastVars),
            "eqleastvars" => Some(LiteralSelector::EqLeastVars),
            _ => None,
        }
    }

    /// Pick the selected positions from candidates (positions into
    /// literals, all of them negative).
    pub fn select(&self, literals: &[Literal], candidates: &[usize]) -> Vec<usize> {
        assert!(!candidates.is_empty());
        match self {
            LiteralSelector::First => vec![candidates[0]],
            LiteralSelector::Smallest => {
                let best = candidates
                    .iter()
                    .copied()
                    .min_by_key(|&i| literals[i].weight(1, 1))
                    .unwrap();
                vec![best]
            }
            LiteralSelector::Largest => {
                let best = candidates
                    .iter()
                    .copied()
                    .max_by_key(|&i| literals[i].weight(1, 1))
                    .unwrap();
                vec![best]
            }
            LiteralSelector::LeastVars => {
                let best = candidates
                    .iter()
                    .copied()
                    .min_by_key(|&i| var_size_eval(&literals[i]))
                    .unwrap();
                vec![best]
            }
            LiteralSelector::EqLeastVars => {
                for &i in candidates {
                    if literals[i].is_pure_var_lit() {
                        return vec![i];
                    }
                }
                LiteralSelector::LeastVars.select(literals, candidates)
            }
        }
    }
}

/// KBO-ordered selection for clauses without negative literals: start
/// with every literal as an inference literal, then clear the flag of
/// the smaller side of every comparable pair. For uncomparable or
/// equal pairs of mixed polarity, the negative literal wins.
pub fn select_inference_lits_ordered(ocb: &Ocb, clause: &mut Clause) {
    for literal in &mut clause.literals {
        literal.set_inference_lit(true);
    }
    if clause.len() <= 1 {
        return;
    }

    for i in (1..clause.len()).rev() {
        for j in 0..i {
            let result = kbo_compare(
                ocb,
                &clause.literals[i].atom,
                &clause.literals[j].atom,
            );
            match result {
                CompareResult::Greater => clause.literals[j].set_inference_lit(false),
                CompareResult::Lesser => clause.literals[i].set_inference_lit(false),
                CompareResult::Uncomparable | CompareResult::Equal => {
                    if clause.literals[i].is_negative() {
                        if !clause.literals[j].is_negative() {
                            clause.literals[j].set_inference_lit(false);
                        }
                    } else if clause.literals[j].is_negative() {
                        clause.literals[i].set_inference_lit(false);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::literal::parse_literal_list;

    fn literals(s: &str) -> Vec<Literal> {
        let mut lexer = Lexer::new(s);
        parse_literal_list(&mut lexer).unwrap()
    }

    #[test]
    fn test_selectors() {
        let lits = literals("~p(a)|~p(f(X,g(a)))|X!=Y|~q(a,g(a))");
        let candidates: Vec<usize> = (0..lits.len()).collect();

        assert_eq!(LiteralSelector::First.select(&lits, &candidates), vec![0]);
        assert_eq!(LiteralSelector::Smallest.select(&lits, &candidates), vec![0]);
        assert_eq!(LiteralSelector::Largest.select(&lits, &candidates), vec![1]);
        // The ground literals have no variables; ~q(a,g(a)) is the
        // heavier of them.
        assert_eq!(LiteralSelector::LeastVars.select(&lits, &candidates), vec![3]);
        // X!=Y is a pure variable equation.
        assert_eq!(
            LiteralSelector::EqLeastVars.select(&lits, &candidates),
            vec![2]
        );

        let lits = literals("~p(a)|~p(f(X,g(a)))|~q(a,g(a))");
        let candidates: Vec<usize> = (0..lits.len()).collect();
        assert_eq!(
            LiteralSelector::EqLeastVars.select(&lits, &candidates),
            vec![2]
        );
    }

    #[test]
    fn test_selector_names() {
        for name in LITERAL_SELECTOR_NAMES {
            assert!(LiteralSelector::from_name(name).is_some());
        }
        assert!(LiteralSelector::from_name("bogus").is_none());
    }

    #[test]
    fn test_ordered_selection_maximal_literal() {
        let ocb = Ocb::new(
            ["p", "q", "f", "a"].iter().map(|s| s.to_string()).collect(),
        );
        let mut clause = Clause::parse("cnf(c, axiom, p(X)|q(f(X))).");
        select_inference_lits_ordered(&ocb, &mut clause);
        // q(f(X)) outweighs p(X), so only it stays eligible.
        assert!(!clause.get_literal(0).is_inference_lit());
        assert!(clause.get_literal(1).is_inference_lit());
    }

    #[test]
    fn test_ordered_selection_negative_wins_ties() {
        let ocb = Ocb::new(
            ["p", "q", "f", "a"].iter().map(|s| s.to_string()).collect(),
        );
        // The atoms are uncomparable (different variables), so the
        // negative literal keeps the flag.
        let mut clause = Clause::parse("cnf(c, axiom, ~p(X)|q(Y)).");
        select_inference_lits_ordered(&ocb, &mut clause);
        assert!(clause.get_literal(0).is_inference_lit());
        assert!(!clause.get_literal(1).is_inference_lit());
    }

    #[test]
    fn test_clause_selection_entry_point() {
        let mut clause = Clause::parse("cnf(c, axiom, p(X)|~q(X)|~r(f(X))).");
        clause.select_inference_lits(LiteralSelector::First, None);
        assert!(!clause.get_literal(0).is_inference_lit());
        assert!(clause.get_literal(1).is_inference_lit());
        assert!(!clause.get_literal(2).is_inference_lit());

        // Without negative literals and without an OCB, everything
        // stays eligible.
        let mut clause = Clause::parse("cnf(c, axiom, p(X)|q(X)).");
        clause.select_inference_lits(LiteralSelector::First, None);
        assert!(clause.get_literal(0).is_inference_lit());
        assert!(clause.get_literal(1).is_inference_lit());
    }
}
