use std::rc::Rc;

use fxhash::FxHashMap;

use crate::clause::Clause;
use crate::literal::Literal;

/// The sorted sequence of (polarity, predicate) pairs of a clause.
pub type PredAbstraction = Vec<(bool, String)>;

/// An index returning resolution candidates for a query literal: the
/// recorded (clause, position) pairs whose literal has the opposite
/// polarity and the same top symbol. This is top-symbol hashing; the
/// caller still has to attempt unification.
///
/// Only inference literals are indexed.
#[derive(Debug, Default)]
pub struct ResolutionIndex {
    pos_idx: FxHashMap<String, Vec<(Rc<Clause>, usize)>>,
    neg_idx: FxHashMap<String, Vec<(Rc<Clause>, usize)>>,
}

impl ResolutionIndex {
    pub fn new() -> ResolutionIndex {
        ResolutionIndex::default()
    }

    fn index_for(&mut self, literal: &Literal) -> &mut FxHashMap<String, Vec<(Rc<Clause>, usize)>> {
        if literal.is_positive() {
            &mut self.pos_idx
        } else {
            &mut self.neg_idx
        }
    }

    pub fn insert_clause(&mut self, clause: &Rc<Clause>) {
        for (i, literal) in clause.literals.iter().enumerate() {
            if literal.is_inference_lit() {
                let topsymbol = literal.atom.func().to_string();
                self.index_for(literal)
                    .entry(topsymbol)
                    .or_default()
                    .push((clause.clone(), i));
            }
        }
    }

    pub fn remove_clause(&mut self, clause: &Rc<Clause>) {
        for (i, literal) in clause.literals.iter().enumerate() {
            if literal.is_inference_lit() {
                let id = clause.id;
                let bucket = self
                    .index_for(literal)
                    .get_mut(literal.atom.func())
                    .expect("clause not in resolution index");
                let position = bucket
                    .iter()
                    .position(|(c, pos)| c.id == id && *pos == i)
                    .expect("literal not in resolution index");
                bucket.remove(position);
            }
        }
    }

    /// All indexed occurrences a query literal could resolve against.
    pub fn get_resolution_literals(&self, literal: &Literal) -> Vec<(Rc<Clause>, usize)> {
        let idx = if literal.is_positive() {
            &self.neg_idx
        } else {
            &self.pos_idx
        };
        match idx.get(literal.atom.func()) {
            Some(bucket) => bucket.clone(),
            None => vec![],
        }
    }
}

/// Check if candidate is a subsequence of superseq. This is a necessary
/// condition for the clause behind candidate to subsume the clause
/// behind superseq.
pub fn pred_abstraction_is_subsequence(
    candidate: &PredAbstraction,
    superseq: &PredAbstraction,
) -> bool {
    let mut i = 0;
    for element in candidate {
        loop {
            if i >= superseq.len() {
                return false;
            }
            if &superseq[i] == element {
                i += 1;
                break;
            }
            i += 1;
        }
    }
    true
}

/// An index to speed up subsumption, organising clauses by their
/// predicate abstraction. A clause C can only subsume a clause D if
/// C's abstraction is a subsequence of D's (and in particular no
/// longer), so whole buckets can be skipped at once.
#[derive(Debug, Default)]
pub struct SubsumptionIndex {
    sets: FxHashMap<PredAbstraction, Vec<Rc<Clause>>>,
    // (length, abstraction) in ascending length order.
    sorted: Vec<(usize, PredAbstraction)>,
}

impl SubsumptionIndex {
    pub fn new() -> SubsumptionIndex {
        SubsumptionIndex::default()
    }

    pub fn insert_clause(&mut self, clause: &Rc<Clause>) {
        let pa = clause.predicate_abstraction();
        if !self.sets.contains_key(&pa) {
            let len = pa.len();
            let position = self
                .sorted
                .iter()
                .position(|(l, _)| *l >= len)
                .unwrap_or(self.sorted.len());
            self.sorted.insert(position, (len, pa.clone()));
            self.sets.insert(pa.clone(), vec![]);
        }
        self.sets.get_mut(&pa).unwrap().push(clause.clone());
    }

    /// Remove a clause. The entry for its abstraction stays; successful
    /// backward subsumption is rare, so empty buckets are rare too.
    pub fn remove_clause(&mut self, clause: &Rc<Clause>) {
        let pa = clause.predicate_abstraction();
        let bucket = self.sets.get_mut(&pa).expect("clause not in subsumption index");
        let position = bucket
            .iter()
            .position(|c| c.id == clause.id)
            .expect("clause not in subsumption index");
        bucket.remove(position);
    }

    pub fn is_indexed(&self, clause: &Clause) -> bool {
        match self.sets.get(&clause.predicate_abstraction()) {
            Some(bucket) => bucket.iter().any(|c| c.id == clause.id),
            None => false,
        }
    }

    /// All clauses that could potentially subsume the query.
    pub fn get_subsuming_candidates(&self, queryclause: &Clause) -> Vec<Rc<Clause>> {
        let pa = queryclause.predicate_abstraction();
        let mut res = vec![];
        for (len, candidate_pa) in &self.sorted {
            if *len > pa.len() {
                break;
            }
            if pred_abstraction_is_subsequence(candidate_pa, &pa) {
                res.extend(self.sets[candidate_pa].iter().cloned());
            }
        }
        res
    }

    /// All clauses that could potentially be subsumed by the query.
    pub fn get_subsumed_candidates(&self, queryclause: &Clause) -> Vec<Rc<Clause>> {
        let pa = queryclause.predicate_abstraction();
        let mut res = vec![];
        for (len, candidate_pa) in &self.sorted {
            if *len < pa.len() {
                continue;
            }
            if pred_abstraction_is_subsequence(&pa, candidate_pa) {
                res.extend(self.sets[candidate_pa].iter().cloned());
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses() -> Vec<Rc<Clause>> {
        [
            "cnf(c1, axiom, p(a,X)|p(X,a)).",
            "cnf(c2, axiom, ~p(a,b)|p(f(Y),a)).",
            "cnf(c3, axiom, q(Z,X)|~q(f(Z),X0)).",
            "cnf(c4, axiom, p(X,X)|p(a,f(Y))).",
            "cnf(c5, axiom, p(X)|~q(b)|p(a)|~q(a)|p(Y)).",
            "cnf(c6, axiom, ~p(a)).",
            "cnf(c7, axiom, q(f(a))).",
            "cnf(c8, axiom, r(f(a))).",
        ]
        .iter()
        .map(|s| Rc::new(Clause::parse(s)))
        .collect()
    }

    #[test]
    fn test_resolution_insert_remove() {
        let cs = clauses();
        let mut index = ResolutionIndex::new();
        index.insert_clause(&cs[0]);
        index.insert_clause(&cs[1]);

        assert_eq!(index.pos_idx.len(), 1);
        assert_eq!(index.pos_idx["p"].len(), 3);
        assert_eq!(index.neg_idx.len(), 1);
        assert_eq!(index.neg_idx["p"].len(), 1);

        index.insert_clause(&cs[2]);
        assert_eq!(index.pos_idx.len(), 2);
        assert_eq!(index.pos_idx["q"].len(), 1);
        assert_eq!(index.neg_idx["q"].len(), 1);

        index.remove_clause(&cs[2]);
        assert_eq!(index.pos_idx["p"].len(), 3);
        assert_eq!(index.neg_idx["p"].len(), 1);
        assert_eq!(index.pos_idx["q"].len(), 0);
        assert_eq!(index.neg_idx["q"].len(), 0);
    }

    #[test]
    fn test_resolution_retrieval() {
        let cs = clauses();
        let mut index = ResolutionIndex::new();
        for clause in &cs[0..5] {
            index.insert_clause(clause);
        }

        // ~p(a) resolves against positive p occurrences.
        let lit = cs[5].get_literal(0);
        let candidates = index.get_resolution_literals(lit);
        assert_eq!(candidates.len(), 8);
        for (clause, i) in &candidates {
            let found = clause.get_literal(*i);
            assert!(found.is_positive());
            assert_eq!(found.atom.func(), "p");
        }

        // q(f(a)) resolves against negative q occurrences.
        let lit = cs[6].get_literal(0);
        let candidates = index.get_resolution_literals(lit);
        assert_eq!(candidates.len(), 3);

        // Nothing under r at all.
        let lit = cs[7].get_literal(0);
        assert!(index.get_resolution_literals(lit).is_empty());
    }

    #[test]
    fn test_subsequence() {
        let pa = |s: &str| Clause::parse(s).predicate_abstraction();
        let small = pa("cnf(a, axiom, p(X)).");
        let large = pa("cnf(b, axiom, p(a)|~q(b)|p(Y)).");
        assert!(pred_abstraction_is_subsequence(&small, &large));
        assert!(!pred_abstraction_is_subsequence(&large, &small));
        assert!(pred_abstraction_is_subsequence(&large, &large));
        let other = pa("cnf(c, axiom, r(X)).");
        assert!(!pred_abstraction_is_subsequence(&other, &large));
    }

    #[test]
    fn test_subsumption_index() {
        let unit = Rc::new(Clause::parse("cnf(u, axiom, p(X))."));
        let double = Rc::new(Clause::parse("cnf(d, axiom, p(a)|q(f(X)))."));
        let triple = Rc::new(Clause::parse("cnf(t, axiom, p(a)|q(f(b))|p(X))."));

        let mut index = SubsumptionIndex::new();
        index.insert_clause(&unit);
        index.insert_clause(&double);
        index.insert_clause(&triple);
        assert!(index.is_indexed(&unit));
        assert!(index.is_indexed(&triple));

        // Everything at most as long as triple with a compatible
        // abstraction could subsume it.
        let candidates = index.get_subsuming_candidates(&triple);
        assert!(candidates.iter().any(|c| c.id == unit.id));
        assert!(candidates.iter().any(|c| c.id == double.id));

        // Only longer clauses can be subsumed by double.
        let candidates = index.get_subsumed_candidates(&double);
        assert!(candidates.iter().any(|c| c.id == triple.id));
        assert!(!candidates.iter().any(|c| c.id == unit.id));

        index.remove_clause(&unit);
        assert!(!index.is_indexed(&unit));
        let candidates = index.get_subsuming_candidates(&triple);
        assert!(!candidates.iter().any(|c| c.id == unit.id));
    }
}
