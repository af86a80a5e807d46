use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::clause::Clause;
use crate::clauseset::{ClauseSet, HeuristicClauseSet};
use crate::heuristics::EvalStructure;
use crate::kbo::{count_symbols, init_ocb, Ocb};
use crate::resolution::{compute_all_factors, compute_all_resolvents};
use crate::selection::{select_inference_lits_ordered, LiteralSelector};
use crate::sos::SosStrategy;
use crate::subsumption::{backward_subsumption, forward_subsumption};

/// The parameter settings of a proof search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// The clause selection heuristic: the order in which unprocessed
    /// clauses are picked for processing.
    pub heuristics: EvalStructure,

    /// Delete tautologies: clauses containing two literals with the
    /// same atom but opposite signs can never participate in a
    /// refutation.
    pub delete_tautologies: bool,

    /// Check the given clause against the processed clauses and
    /// discard it if one of them subsumes it.
    pub forward_subsumption: bool,

    /// Remove processed clauses that the given clause subsumes.
    pub backward_subsumption: bool,

    /// Negative-literal selection, or None for unrestricted resolution.
    pub literal_selection: Option<LiteralSelector>,

    /// Use KBO-ordered resolution.
    pub ordered_resolution: bool,

    /// How (and whether) to divide the clause set into a base set and
    /// a set of support.
    pub sos_strategy: SosStrategy,
}

impl Default for SearchParams {
    fn default() -> SearchParams {
        SearchParams {
            heuristics: EvalStructure::from_name("PickGiven5").unwrap(),
            delete_tautologies: false,
            forward_subsumption: false,
            backward_subsumption: false,
            literal_selection: None,
            ordered_resolution: false,
            sos_strategy: SosStrategy::no_sos(),
        }
    }
}

/// How a saturation run ended.
#[derive(Debug, Clone)]
pub enum SaturationResult {
    /// The empty clause was derived; the clause set is unsatisfiable.
    Proof(Rc<Clause>),

    /// The unprocessed set drained without deriving the empty clause;
    /// the clause set is satisfiable.
    Saturated,

    /// The resource limit expired before either outcome.
    ResourceOut,
}

/// The top-level data structure of the prover. The knowledge base is
/// split into processed and unprocessed clauses; the main loop moves
/// one clause at a time from unprocessed to processed, adding all
/// newly generated consequences back to unprocessed.
pub struct ProofState {
    params: SearchParams,
    pub unprocessed: HeuristicClauseSet,
    pub processed: ClauseSet,

    pub initial_clause_count: u64,
    pub proc_clause_count: u64,
    pub factor_count: u64,
    pub resolvent_count: u64,
    pub tautologies_deleted: u64,
    pub forward_subsumed: u64,
    pub backward_subsumed: u64,

    silent: bool,
    ocb: Option<Ocb>,
}

impl ProofState {
    pub fn new(params: SearchParams, clauses: ClauseSet, silent: bool, indexed: bool) -> ProofState {
        let ocb = if params.ordered_resolution {
            Some(init_ocb(count_symbols(&clauses.clauses)))
        } else {
            None
        };

        let mut unprocessed =
            HeuristicClauseSet::new(params.heuristics.clone(), params.sos_strategy.clone());
        let processed = if indexed {
            ClauseSet::indexed()
        } else {
            ClauseSet::new()
        };
        for clause in clauses.clauses {
            unprocessed.add_clause(clause);
        }
        let initial_clause_count = unprocessed.len() as u64;

        ProofState {
            params,
            unprocessed,
            processed,
            initial_clause_count,
            proc_clause_count: 0,
            factor_count: 0,
            resolvent_count: 0,
            tautologies_deleted: 0,
            forward_subsumed: 0,
            backward_subsumed: 0,
            silent,
            ocb,
        }
    }

    // Apply the SOS partition once, before the main loop. With ratio 0
    // (strict SOS) all non-SOS clauses go straight into the processed
    // set, so only SOS descendants are ever selected.
    fn init_sos(&mut self) {
        let marked = self.unprocessed.mark_sos();
        if self.unprocessed.sos_ratio() == 0 && marked > 0 {
            for clause in self.unprocessed.extract_non_sos() {
                self.processed.add_clause(clause);
            }
        }
    }

    /// Pick a clause from unprocessed and process it. If the empty
    /// clause is found, return it; otherwise return None.
    pub fn process_clause(&mut self) -> Option<Rc<Clause>> {
        let given_clause = self.unprocessed.extract_best()?;
        let mut given_clause = given_clause.fresh_var_copy();
        if !self.silent {
            println!("#");
        }
        if given_clause.is_empty() {
            // An explicit contradiction.
            return Some(Rc::new(given_clause));
        }
        if self.params.delete_tautologies && given_clause.is_tautology() {
            self.tautologies_deleted += 1;
            return None;
        }
        if self.params.forward_subsumption && forward_subsumption(&self.processed, &given_clause) {
            // A more general processed clause covers all inferences the
            // given clause could contribute.
            self.forward_subsumed += 1;
            return None;
        }
        if self.params.backward_subsumption {
            // The given clause covers for the less general processed
            // clauses it subsumes. This fires less often than forward
            // subsumption: heuristics prefer small clauses, and small
            // clauses tend to be the more general ones.
            self.backward_subsumed += backward_subsumption(&given_clause, &mut self.processed) as u64;
        }

        match (self.params.ordered_resolution, self.params.literal_selection) {
            (true, Some(selector)) => {
                given_clause.select_inference_lits(selector, self.ocb.as_ref())
            }
            (false, Some(selector)) => given_clause.select_inference_lits(selector, None),
            (true, None) => {
                if let Some(ocb) = &self.ocb {
                    select_inference_lits_ordered(ocb, &mut given_clause);
                }
            }
            (false, None) => {}
        }

        if !self.silent {
            println!("# {}", given_clause);
        }

        let given_clause = Rc::new(given_clause);
        let factors = compute_all_factors(&given_clause);
        let resolvents = compute_all_resolvents(&given_clause, &self.processed);
        self.proc_clause_count += 1;
        self.factor_count += factors.len() as u64;
        self.resolvent_count += resolvents.len() as u64;

        self.processed.add_clause(given_clause);

        for clause in factors.into_iter().chain(resolvents) {
            self.unprocessed.add_clause(Rc::new(clause));
        }
        None
    }

    /// The main proof procedure: process clauses until the empty clause
    /// appears (unsatisfiable), the unprocessed set drains
    /// (satisfiable), or the optional time limit expires. The limit is
    /// checked at the top of each iteration; a single inference is
    /// never interrupted.
    pub fn saturate(&mut self, limit: Option<Duration>) -> SaturationResult {
        self.init_sos();
        let start = Instant::now();
        while !self.unprocessed.is_empty() {
            if let Some(limit) = limit {
                if start.elapsed() >= limit {
                    return SaturationResult::ResourceOut;
                }
            }
            if let Some(clause) = self.process_clause() {
                return SaturationResult::Proof(clause);
            }
        }
        SaturationResult::Saturated
    }

    /// The proof state statistics, ready for output.
    pub fn statistics_str(&self) -> String {
        format!(
            "# Initial clauses    : {}\n\
             # Processed clauses  : {}\n\
             # Factors computed   : {}\n\
             # Resolvents computed: {}\n\
             # Tautologies deleted: {}\n\
             # Forward subsumed   : {}\n\
             # Backward subsumed  : {}",
            self.initial_clause_count,
            self.proc_clause_count,
            self.factor_count,
            self.resolvent_count,
            self.tautologies_deleted,
            self.forward_subsumed,
            self.backward_subsumed
        )
    }
}
