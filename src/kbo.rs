use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use fxhash::FxHashMap;

use crate::clause::Clause;
use crate::term::Term;

/// The outcome of comparing two terms in a partial ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    Uncomparable,
    Equal,
    Greater,
    Lesser,
}

/// The order control block for the Knuth-Bendix ordering: a weight for
/// every function symbol, a total precedence given by registration
/// order, and a strictly positive variable weight.
#[derive(Debug, Clone)]
pub struct Ocb {
    fun_weights: FxHashMap<String, i64>,
    precedence: FxHashMap<String, usize>,
    pub var_weight: i64,
}

impl Ocb {
    /// Build an OCB over the given symbols, registered in order. Every
    /// symbol gets weight 1; a later registration means a greater
    /// precedence.
    pub fn new(symbols: Vec<String>) -> Ocb {
        let mut fun_weights = FxHashMap::default();
        let mut precedence = FxHashMap::default();
        for (index, symbol) in symbols.into_iter().enumerate() {
            fun_weights.entry(symbol.clone()).or_insert(1);
            precedence.entry(symbol).or_insert(index);
        }
        Ocb {
            fun_weights,
            precedence,
            var_weight: 1,
        }
    }

    /// The KBO weight of a term under this OCB.
    pub fn weight(&self, term: &Term) -> i64 {
        match term {
            Term::Var(_) => self.var_weight,
            Term::App(func, args) => {
                self.fun_weights[func.as_str()]
                    + args.iter().map(|arg| self.weight(arg)).sum::<i64>()
            }
        }
    }

    /// Compare two function symbols in the precedence. $true is the
    /// minimum by convention.
    pub fn fun_compare(&self, f1: &str, f2: &str) -> CompareResult {
        if f1 == f2 {
            return CompareResult::Equal;
        }
        if f1 == "$true" {
            return CompareResult::Lesser;
        }
        if f2 == "$true" {
            return CompareResult::Greater;
        }
        let idx1 = self.precedence[f1];
        let idx2 = self.precedence[f2];
        if idx1 > idx2 {
            CompareResult::Greater
        } else if idx1 < idx2 {
            CompareResult::Lesser
        } else {
            CompareResult::Equal
        }
    }
}

// Compare two terms of which at least one is a variable. Equal terms
// are equal; a term is greater than any variable occurring properly
// inside it; anything else is uncomparable.
fn kbo_compare_vars(s: &Term, t: &Term) -> CompareResult {
    if t.is_var() {
        if s == t {
            return CompareResult::Equal;
        }
        if s.contains(t) {
            return CompareResult::Greater;
        }
    } else {
        debug_assert!(s.is_var());
        if t.contains(s) {
            return CompareResult::Lesser;
        }
    }
    CompareResult::Uncomparable
}

// The variable condition: compare the per-variable occurrence counts
// of s and t. Greater means s has at least as many occurrences of
// every variable as t, and strictly more of some.
fn var_condition(s: &Term, t: &Term) -> CompareResult {
    let mut counts = BTreeMap::new();
    s.count_var_occurrences(1, &mut counts);
    t.count_var_occurrences(-1, &mut counts);
    let s_greater = counts.values().any(|&c| c > 0);
    let t_greater = counts.values().any(|&c| c < 0);
    match (s_greater, t_greater) {
        (true, true) => CompareResult::Uncomparable,
        (true, false) => CompareResult::Greater,
        (false, true) => CompareResult::Lesser,
        (false, false) => CompareResult::Equal,
    }
}

// Any proposed strict outcome must pass the variable condition in the
// same direction, otherwise the terms are uncomparable.
fn guard(proposed: CompareResult, s: &Term, t: &Term) -> CompareResult {
    match (proposed, var_condition(s, t)) {
        (CompareResult::Greater, CompareResult::Greater | CompareResult::Equal) => {
            CompareResult::Greater
        }
        (CompareResult::Lesser, CompareResult::Lesser | CompareResult::Equal) => {
            CompareResult::Lesser
        }
        _ => CompareResult::Uncomparable,
    }
}

/// Compare two terms in the Knuth-Bendix ordering: weight first, then
/// head precedence, then lexicographic recursion on the arguments.
pub fn kbo_compare(ocb: &Ocb, s: &Term, t: &Term) -> CompareResult {
    if s.is_var() || t.is_var() {
        return kbo_compare_vars(s, t);
    }

    let s_weight = ocb.weight(s);
    let t_weight = ocb.weight(t);
    if s_weight > t_weight {
        return guard(CompareResult::Greater, s, t);
    }
    if s_weight < t_weight {
        return guard(CompareResult::Lesser, s, t);
    }

    match ocb.fun_compare(s.func(), t.func()) {
        CompareResult::Uncomparable => CompareResult::Uncomparable,
        CompareResult::Greater => guard(CompareResult::Greater, s, t),
        CompareResult::Lesser => guard(CompareResult::Lesser, s, t),
        CompareResult::Equal => {
            debug_assert_eq!(s.args().len(), t.args().len());
            for (s_arg, t_arg) in s.args().iter().zip(t.args().iter()) {
                match kbo_compare(ocb, s_arg, t_arg) {
                    CompareResult::Equal => continue,
                    CompareResult::Greater => return guard(CompareResult::Greater, s, t),
                    CompareResult::Lesser => return guard(CompareResult::Lesser, s, t),
                    CompareResult::Uncomparable => return CompareResult::Uncomparable,
                }
            }
            CompareResult::Equal
        }
    }
}

/// Count, for every symbol, the number of literals it occurs in.
/// Returned in first-appearance order.
pub fn count_symbols(clauses: &[Rc<Clause>]) -> Vec<(String, u64)> {
    let mut counts: FxHashMap<String, u64> = FxHashMap::default();
    let mut order: Vec<String> = vec![];
    for clause in clauses {
        for literal in &clause.literals {
            let mut funs = BTreeSet::new();
            literal.collect_funs(&mut funs);
            for fun in funs {
                match counts.get_mut(&fun) {
                    Some(count) => *count += 1,
                    None => {
                        counts.insert(fun.clone(), 1);
                        order.push(fun);
                    }
                }
            }
        }
    }
    order
        .into_iter()
        .map(|fun| {
            let count = counts[&fun];
            (fun, count)
        })
        .collect()
}

/// Build the OCB for a clause set: symbols ordered by descending
/// occurrence count, ties broken by first appearance.
pub fn init_ocb(mut symbol_counts: Vec<(String, u64)>) -> Ocb {
    symbol_counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ocb::new(symbol_counts.into_iter().map(|(fun, _)| fun).collect())
}
