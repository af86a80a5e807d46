use ordered_float::OrderedFloat;

use crate::clause::Clause;

/// Clause evaluations are totally ordered reals; lower is better.
pub type Eval = OrderedFloat<f64>;

/// A clause evaluation function. Evaluation functions may carry state
/// from previous calls, like the FIFO counter does.
#[derive(Debug, Clone)]
pub enum EvalFunction {
    /// Evaluations increase over time, independent of the clause, so
    /// clauses are picked first-in first-out. Obviously fair, but not a
    /// good search strategy on its own.
    Fifo { counter: u64 },

    /// Standard symbol counting: a smaller clause is better. Only fair
    /// in combination with subsumption or a fair second evaluation.
    SymbolCount { fweight: i64, vweight: i64 },
}

impl EvalFunction {
    pub fn fifo() -> EvalFunction {
        EvalFunction::Fifo { counter: 0 }
    }

    pub fn symbol_count(fweight: i64, vweight: i64) -> EvalFunction {
        EvalFunction::SymbolCount { fweight, vweight }
    }

    pub fn eval(&mut self, clause: &Clause) -> Eval {
        match self {
            EvalFunction::Fifo { counter } => {
                *counter += 1;
                OrderedFloat(*counter as f64)
            }
            EvalFunction::SymbolCount { fweight, vweight } => {
                OrderedFloat(clause.weight(*fweight, *vweight) as f64)
            }
        }
    }
}

/// A heuristic clause processing scheme: several evaluation functions,
/// with clauses picked according to each function in a weighted
/// round-robin. eval_vec[i] says how many clauses are picked according
/// to eval_funs[i] before switching to the next function.
#[derive(Debug, Clone)]
pub struct EvalStructure {
    eval_funs: Vec<EvalFunction>,
    eval_vec: Vec<usize>,
    current: usize,
    current_count: usize,
}

/// The heuristic names accepted on the command line.
pub const GIVEN_CLAUSE_HEURISTIC_NAMES: [&str; 4] =
    ["FIFO", "SymbolCount", "PickGiven5", "PickGiven2"];

impl EvalStructure {
    pub fn new(descriptor: Vec<(EvalFunction, usize)>) -> EvalStructure {
        assert!(!descriptor.is_empty());
        let mut eval_funs = vec![];
        let mut eval_vec = vec![];
        for (fun, frequency) in descriptor {
            eval_funs.push(fun);
            eval_vec.push(frequency);
        }
        let current_count = eval_vec[0];
        EvalStructure {
            eval_funs,
            eval_vec,
            current: 0,
            current_count,
        }
    }

    pub fn from_name(name: &str) -> Option<EvalStructure> {
        match name {
            "FIFO" => Some(EvalStructure::new(vec![(EvalFunction::fifo(), 1)])),
            "SymbolCount" => Some(EvalStructure::new(vec![(
                EvalFunction::symbol_count(2, 1),
                1,
            )])),
            "PickGiven5" => Some(EvalStructure::new(vec![
                (EvalFunction::symbol_count(2, 1), 5),
                (EvalFunction::fifo(), 1),
            ])),
            "PickGiven2" => Some(EvalStructure::new(vec![
                (EvalFunction::symbol_count(2, 1), 2),
                (EvalFunction::fifo(), 1),
            ])),
            _ => None,
        }
    }

    /// Number of evaluation functions in the scheme.
    pub fn len(&self) -> usize {
        self.eval_funs.len()
    }

    /// The composite evaluation of a clause: one value per function.
    pub fn evaluate(&mut self, clause: &Clause) -> Vec<Eval> {
        self.eval_funs.iter_mut().map(|f| f.eval(clause)).collect()
    }

    /// The index of the evaluation function to use for the next pick.
    /// Functions with a frequency of 0 are skipped.
    pub fn next_eval(&mut self) -> usize {
        while self.current_count == 0 {
            self.current = (self.current + 1) % self.eval_vec.len();
            self.current_count = self.eval_vec[self.current];
        }
        self.current_count -= 1;
        self.current
    }
}
