// The resolute CLI. Reads a problem in TPTP-3 syntax, saturates it
// under the resolution calculus, and reports an SZS status line plus
// search statistics.

use std::process::exit;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;

use resolute::clause::{Clause, ClauseType};
use resolute::derivation::{ordered_derivation, Ancestor, Derivation};
use resolute::heuristics::{EvalStructure, GIVEN_CLAUSE_HEURISTIC_NAMES};
use resolute::problem::Problem;
use resolute::relevance::relevance_filter;
use resolute::saturation::{ProofState, SaturationResult, SearchParams};
use resolute::selection::{LiteralSelector, LITERAL_SELECTOR_NAMES};
use resolute::sos::{SosKind, SosStrategy, SOS_STRATEGY_NAMES};

#[derive(Parser)]
#[command(
    name = "resolute",
    version,
    about = "A saturation-based resolution prover for first-order logic with equality"
)]
struct Args {
    /// Problem files in TPTP-3 syntax.
    #[clap(required = true)]
    files: Vec<String>,

    /// Suppress per-iteration progress output.
    #[clap(long, short)]
    silent: bool,

    /// Print the derivation of the result.
    #[clap(long, short)]
    proof: bool,

    /// Index the processed clause set.
    #[clap(long, short)]
    index: bool,

    /// Discard tautologies.
    #[clap(long, short = 't')]
    delete_tautologies: bool,

    /// Discard given clauses that a processed clause subsumes.
    #[clap(long, short)]
    forward_subsumption: bool,

    /// Remove processed clauses that the given clause subsumes.
    #[clap(long, short)]
    backward_subsumption: bool,

    /// Given-clause selection heuristic.
    #[clap(long, short = 'H', default_value = "PickGiven5")]
    given_clause_heuristic: String,

    /// Negative-literal selection strategy.
    #[clap(long, short)]
    neg_lit_selection: Option<String>,

    /// Use KBO-ordered resolution.
    #[clap(long, short)]
    ordered_resolution: bool,

    /// Do not add equality axioms.
    #[clap(long, short = 'S')]
    suppress_eq_axioms: bool,

    /// Keep only clauses within this alternating-path distance of the
    /// negated conjecture.
    #[clap(long, short)]
    relevance_distance: Option<usize>,

    /// Set-of-support strategy.
    #[clap(long, default_value = "NoSos")]
    sos_strategy: String,

    /// Pick every r-th given clause from outside the set of support;
    /// 0 means strict set of support.
    #[clap(long, default_value_t = 0)]
    sos_ratio: usize,

    /// CPU time limit in seconds.
    #[clap(long)]
    cpu_limit: Option<u64>,
}

fn build_params(args: &Args) -> SearchParams {
    let heuristics = match EvalStructure::from_name(&args.given_clause_heuristic) {
        Some(heuristics) => heuristics,
        None => {
            println!(
                "Unknown clause evaluation function {}",
                args.given_clause_heuristic
            );
            println!("Supported: {:?}", GIVEN_CLAUSE_HEURISTIC_NAMES);
            exit(1);
        }
    };

    let literal_selection = args.neg_lit_selection.as_ref().map(|name| {
        match LiteralSelector::from_name(name) {
            Some(selector) => selector,
            None => {
                println!("Unknown literal selection function {}", name);
                println!("Supported: {:?}", LITERAL_SELECTOR_NAMES);
                exit(1);
            }
        }
    });

    let sos_kind = match SosKind::from_name(&args.sos_strategy) {
        Some(kind) => kind,
        None => {
            println!("Unknown SOS strategy {}", args.sos_strategy);
            println!("Supported: {:?}", SOS_STRATEGY_NAMES);
            exit(1);
        }
    };

    SearchParams {
        heuristics,
        delete_tautologies: args.delete_tautologies,
        forward_subsumption: args.forward_subsumption,
        backward_subsumption: args.backward_subsumption,
        literal_selection,
        ordered_resolution: args.ordered_resolution,
        sos_strategy: SosStrategy::new(sos_kind, args.sos_ratio),
    }
}

fn print_refutation(clause: Rc<Clause>) {
    println!("# SZS output start CNFRefutation");
    for ancestor in ordered_derivation(Ancestor::Clause(clause)) {
        println!("{}", ancestor.tptp(true));
    }
    println!("# SZS output end CNFRefutation");
}

fn print_saturation(state: &ProofState) {
    // A pseudo-root referencing every processed clause linearizes the
    // whole saturated set; the root itself is not printed.
    let mut dummy = Clause::new(vec![], ClauseType::Plain);
    let parents: Vec<Ancestor> = state
        .processed
        .clauses
        .iter()
        .cloned()
        .map(Ancestor::Clause)
        .collect();
    dummy.derivation = Some(Derivation::flat("pseudoreference", &parents));
    let listing = ordered_derivation(Ancestor::Clause(Rc::new(dummy)));

    println!("# SZS output start Saturation");
    for ancestor in &listing[..listing.len() - 1] {
        println!("{}", ancestor.tptp(true));
    }
    println!("# SZS output end Saturation");
}

fn main() {
    color_backtrace::install();
    let args = Args::parse();
    let params = build_params(&args);

    let mut problem = Problem::new();
    for file in &args.files {
        if let Err(e) = problem.parse_file(file, None) {
            println!("{}", e);
            exit(1);
        }
    }

    if !args.suppress_eq_axioms {
        problem.add_eq_axioms();
    }
    let fof_with_conj = problem.is_fof && problem.has_conj;
    let mut cnf = problem.clausify();

    let filtered = args.relevance_distance.is_some();
    if let Some(distance) = args.relevance_distance {
        cnf = relevance_filter(&cnf, distance);
    }

    let mut state = ProofState::new(params, cnf, args.silent, args.index);
    let start = Instant::now();
    let result = state.saturate(args.cpu_limit.map(Duration::from_secs));

    match result {
        SaturationResult::Proof(clause) => {
            if fof_with_conj {
                println!("# SZS status Theorem");
            } else {
                println!("# SZS status Unsatisfiable");
            }
            if args.proof {
                print_refutation(clause);
            }
        }
        SaturationResult::Saturated => {
            if filtered {
                // The relevance filter may have dropped clauses needed
                // for a refutation, so saturation proves nothing.
                println!("# SZS status GaveUp");
            } else if fof_with_conj {
                println!("# SZS status CounterSatisfiable");
            } else {
                println!("# SZS status Satisfiable");
            }
            if args.proof {
                print_saturation(&state);
            }
        }
        SaturationResult::ResourceOut => {
            println!("# Failure: Resource limit exceeded (time)");
            println!("# SZS status ResourceOut");
        }
    }

    println!("{}", state.statistics_str());
    println!("# -------- CPU Time ---------");
    println!("# Total time         : {:.3} s", start.elapsed().as_secs_f64());
}
