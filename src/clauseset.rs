use std::rc::Rc;

use crate::clause::{Clause, ClauseType};
use crate::error::Result;
use crate::heuristics::EvalStructure;
use crate::indexing::{ResolutionIndex, SubsumptionIndex};
use crate::lexer::Lexer;
use crate::literal::Literal;
use crate::signature::Signature;
use crate::sos::SosStrategy;

#[derive(Debug, Default)]
struct Indices {
    resolution: ResolutionIndex,
    subsumption: SubsumptionIndex,
}

/// A multiset of clauses. The indexed form additionally maintains a
/// resolution index and a subsumption index, kept in sync with every
/// add and extract; the plain form answers the same queries by linear
/// iteration.
#[derive(Debug, Default)]
pub struct ClauseSet {
    pub clauses: Vec<Rc<Clause>>,
    indices: Option<Indices>,
}

impl ClauseSet {
    pub fn new() -> ClauseSet {
        ClauseSet::default()
    }

    pub fn indexed() -> ClauseSet {
        ClauseSet {
            clauses: vec![],
            indices: Some(Indices::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn add_clause(&mut self, clause: Rc<Clause>) {
        if let Some(indices) = &mut self.indices {
            indices.resolution.insert_clause(&clause);
            indices.subsumption.insert_clause(&clause);
        }
        self.clauses.push(clause);
    }

    /// Remove and return the clause with the given id.
    pub fn extract_clause(&mut self, id: u64) -> Option<Rc<Clause>> {
        let position = self.clauses.iter().position(|c| c.id == id)?;
        let clause = self.clauses.remove(position);
        if let Some(indices) = &mut self.indices {
            indices.resolution.remove_clause(&clause);
            indices.subsumption.remove_clause(&clause);
        }
        Some(clause)
    }

    pub fn extract_first(&mut self) -> Option<Rc<Clause>> {
        if self.clauses.is_empty() {
            return None;
        }
        let id = self.clauses[0].id;
        self.extract_clause(id)
    }

    pub fn collect_sig(&self, sig: &mut Signature) {
        for clause in &self.clauses {
            clause.collect_sig(sig);
        }
    }

    /// All (clause, position) pairs the literal could potentially be
    /// resolved against. The indexed form filters by polarity and top
    /// symbol; the plain form returns every inference literal and
    /// leaves all the work to the unification attempt.
    pub fn get_resolution_literals(&self, literal: &Literal) -> Vec<(Rc<Clause>, usize)> {
        match &self.indices {
            Some(indices) => indices.resolution.get_resolution_literals(literal),
            None => {
                let mut res = vec![];
                for clause in &self.clauses {
                    for i in 0..clause.len() {
                        if clause.get_literal(i).is_inference_lit() {
                            res.push((clause.clone(), i));
                        }
                    }
                }
                res
            }
        }
    }

    /// A superset of the clauses that subsume the query.
    pub fn get_subsuming_candidates(&self, queryclause: &Clause) -> Vec<Rc<Clause>> {
        match &self.indices {
            Some(indices) => indices.subsumption.get_subsuming_candidates(queryclause),
            None => self.clauses.clone(),
        }
    }

    /// A superset of the clauses the query subsumes.
    pub fn get_subsumed_candidates(&self, queryclause: &Clause) -> Vec<Rc<Clause>> {
        match &self.indices {
            Some(indices) => indices.subsumption.get_subsumed_candidates(queryclause),
            None => self.clauses.clone(),
        }
    }

    pub fn negated_conjectures(&self) -> Vec<Rc<Clause>> {
        self.clauses
            .iter()
            .filter(|c| c.ctype == ClauseType::NegatedConjecture)
            .cloned()
            .collect()
    }

    /// Parse a sequence of cnf clauses off the lexer into the set.
    /// Returns the number of clauses read.
    pub fn parse(&mut self, lexer: &mut Lexer) -> Result<usize> {
        let mut count = 0;
        while lexer.test_lit("cnf")? {
            let clause = Clause::parse_from(lexer)?;
            self.add_clause(Rc::new(clause));
            count += 1;
        }
        Ok(count)
    }
}

/// A clause set with heuristic evaluations. Every inserted clause is
/// evaluated by all configured evaluation functions; extraction
/// returns the best clause according to the scheduled function,
/// restricted to the requested side of the SOS partition.
#[derive(Debug)]
pub struct HeuristicClauseSet {
    pub clauses: Vec<Rc<Clause>>,
    eval_functions: EvalStructure,
    sos_strategy: SosStrategy,
    num_sos_clauses: usize,
}

impl HeuristicClauseSet {
    pub fn new(eval_functions: EvalStructure, sos_strategy: SosStrategy) -> HeuristicClauseSet {
        HeuristicClauseSet {
            clauses: vec![],
            eval_functions,
            sos_strategy,
            num_sos_clauses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn add_clause(&mut self, clause: Rc<Clause>) {
        let evals = self.eval_functions.evaluate(&clause);
        clause.add_eval(evals);
        if clause.part_of_sos.get() {
            self.num_sos_clauses += 1;
        }
        self.clauses.push(clause);
    }

    fn contains_sos_clauses(&self) -> bool {
        self.num_sos_clauses > 0
    }

    fn contains_only_sos_clauses(&self) -> bool {
        self.clauses.len() == self.num_sos_clauses
    }

    // The best clause among those on the requested side of the SOS
    // partition. Ties go to the earliest inserted clause, so equal
    // evaluations resolve deterministically.
    fn extract_best_by_eval(&mut self, heuristic_index: usize, sos: bool) -> Option<Rc<Clause>> {
        let mut best: Option<(usize, crate::heuristics::Eval)> = None;
        for (i, clause) in self.clauses.iter().enumerate() {
            if clause.part_of_sos.get() != sos {
                continue;
            }
            let eval = clause.eval(heuristic_index).unwrap();
            match best {
                Some((_, best_eval)) if eval >= best_eval => {}
                _ => best = Some((i, eval)),
            }
        }
        let (position, _) = best?;
        if sos {
            self.num_sos_clauses -= 1;
        }
        Some(self.clauses.remove(position))
    }

    /// Extract the next "best" clause according to the evaluation
    /// scheme and the SOS selection policy.
    pub fn extract_best(&mut self) -> Option<Rc<Clause>> {
        if self.clauses.is_empty() {
            return None;
        }
        let heuristic_index = self.eval_functions.next_eval();
        let sos = if !self.contains_sos_clauses() {
            false
        } else if self.contains_only_sos_clauses() {
            true
        } else {
            self.sos_strategy.should_apply()
        };
        self.extract_best_by_eval(heuristic_index, sos)
    }

    /// Run the SOS partition over the current clauses. Returns the
    /// number of clauses marked.
    pub fn mark_sos(&mut self) -> usize {
        let marked = self.sos_strategy.mark_sos(&self.clauses);
        self.num_sos_clauses += marked;
        marked
    }

    pub fn sos_ratio(&self) -> usize {
        self.sos_strategy.ratio
    }

    /// Remove and return all clauses outside the SOS, in insertion
    /// order. Used by strict SOS to pre-load the processed set.
    pub fn extract_non_sos(&mut self) -> Vec<Rc<Clause>> {
        let mut res = vec![];
        let mut remaining = vec![];
        for clause in self.clauses.drain(..) {
            if clause.part_of_sos.get() {
                remaining.push(clause);
            } else {
                res.push(clause);
            }
        }
        self.clauses = remaining;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sos::SosKind;

    fn spec_clauses(spec: &str) -> ClauseSet {
        let mut lexer = Lexer::new(spec);
        let mut set = ClauseSet::new();
        set.parse(&mut lexer).unwrap();
        set
    }

    const SPEC: &str = "
cnf(c1, axiom, p(a)|p(f(X))).
cnf(c2, axiom, ~p(a)).
cnf(c3, axiom, p(a)|q(b)|r(f(X,Y))).
";

    #[test]
    fn test_parse_and_extract() {
        let mut set = spec_clauses(SPEC);
        assert_eq!(set.len(), 3);

        let first = set.extract_first().unwrap();
        assert_eq!(first.name, "c1");
        assert_eq!(set.len(), 2);

        let id = set.clauses[1].id;
        let extracted = set.extract_clause(id).unwrap();
        assert_eq!(extracted.name, "c3");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_plain_resolution_literals() {
        let set = spec_clauses(SPEC);
        let query = Literal::parse("~p(a)");
        // The plain form returns every inference literal position.
        let candidates = set.get_resolution_literals(&query);
        assert_eq!(candidates.len(), 6);
    }

    #[test]
    fn test_indexed_set_stays_in_sync() {
        let mut set = ClauseSet::indexed();
        let mut lexer = Lexer::new(SPEC);
        set.parse(&mut lexer).unwrap();

        let query = Literal::parse("~p(a)");
        let candidates = set.get_resolution_literals(&query);
        // Positive p literals: two in c1, one in c3.
        assert_eq!(candidates.len(), 3);

        let id = set.clauses[0].id;
        set.extract_clause(id).unwrap();
        let candidates = set.get_resolution_literals(&query);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_extract_best_symbol_count() {
        let mut set = HeuristicClauseSet::new(
            EvalStructure::from_name("SymbolCount").unwrap(),
            SosStrategy::no_sos(),
        );
        for clause in spec_clauses(SPEC).clauses {
            set.add_clause(clause);
        }
        // The unit clause is the lightest, the three-literal clause the
        // heaviest.
        assert_eq!(set.extract_best().unwrap().name, "c2");
        assert_eq!(set.extract_best().unwrap().name, "c1");
        assert_eq!(set.extract_best().unwrap().name, "c3");
        assert!(set.extract_best().is_none());
    }

    #[test]
    fn test_extract_best_fifo() {
        let mut set = HeuristicClauseSet::new(
            EvalStructure::from_name("FIFO").unwrap(),
            SosStrategy::no_sos(),
        );
        for clause in spec_clauses(SPEC).clauses {
            set.add_clause(clause);
        }
        assert_eq!(set.extract_best().unwrap().name, "c1");
        assert_eq!(set.extract_best().unwrap().name, "c2");
        assert_eq!(set.extract_best().unwrap().name, "c3");
    }

    #[test]
    fn test_sos_aware_extraction() {
        let spec = "
cnf(a1, axiom, p(a)|q(a)|r(a)).
cnf(a2, axiom, q(b)).
cnf(g1, negated_conjecture, ~p(a)|~q(a)).
";
        let mut set = HeuristicClauseSet::new(
            EvalStructure::from_name("SymbolCount").unwrap(),
            SosStrategy::new(SosKind::Conjecture, 0),
        );
        for clause in spec_clauses(spec).clauses {
            set.add_clause(clause);
        }
        assert_eq!(set.mark_sos(), 1);

        // Ratio 0 always prefers the SOS side while it is non-empty,
        // even though q(b) evaluates better.
        assert_eq!(set.extract_best().unwrap().name, "g1");
        assert_eq!(set.extract_best().unwrap().name, "a2");
    }

    #[test]
    fn test_extract_non_sos() {
        let spec = "
cnf(a1, axiom, p(a)).
cnf(g1, negated_conjecture, ~p(a)).
cnf(a2, axiom, q(a)).
";
        let mut set = HeuristicClauseSet::new(
            EvalStructure::from_name("FIFO").unwrap(),
            SosStrategy::new(SosKind::Conjecture, 0),
        );
        for clause in spec_clauses(spec).clauses {
            set.add_clause(clause);
        }
        set.mark_sos();
        let moved = set.extract_non_sos();
        assert_eq!(moved.len(), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.clauses[0].name, "g1");
    }
}
