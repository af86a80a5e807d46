use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fxhash::FxHashMap;

use crate::clause::Clause;
use crate::formula::WFormula;

// Shared counter behind the identities and default names of all
// derivable objects (clauses and formulas).
static DERIVED_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fresh identity for a derivable object. Also used to build default
/// names of the form c<N>.
pub fn next_derivable_id() -> u64 {
    DERIVED_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A derivable object in the justification graph: a clause or a full
/// first-order formula. Ancestors are shared, so the graph keeps its
/// parents alive even after they leave the proof state.
#[derive(Debug, Clone)]
pub enum Ancestor {
    Clause(Rc<Clause>),
    Formula(Rc<WFormula>),
}

impl Ancestor {
    pub fn id(&self) -> u64 {
        match self {
            Ancestor::Clause(c) => c.id,
            Ancestor::Formula(f) => f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Ancestor::Clause(c) => &c.name,
            Ancestor::Formula(f) => &f.name,
        }
    }

    pub fn derivation(&self) -> Option<&Derivation> {
        match self {
            Ancestor::Clause(c) => c.derivation.as_ref(),
            Ancestor::Formula(f) => f.derivation.as_ref(),
        }
    }

    /// The TPTP-3 rendering of the object, optionally annotated with
    /// its derivation.
    pub fn tptp(&self, show_derivation: bool) -> String {
        match self {
            Ancestor::Clause(c) => c.tptp(show_derivation),
            Ancestor::Formula(f) => f.tptp(show_derivation),
        }
    }

    fn parents(&self) -> Vec<Ancestor> {
        match self.derivation() {
            Some(derivation) => derivation.parents(),
            None => vec![],
        }
    }
}

/// A justification. A derivation is either trivial ("input" or
/// "eq_axiom"), a plain reference to another derivable object, or an
/// inference with an operator, a status annotation, and parent
/// derivations.
#[derive(Debug, Clone)]
pub enum Derivation {
    Input,
    EqAxiom,
    Reference(Ancestor),
    Inference {
        operator: String,
        status: String,
        parents: Vec<Derivation>,
    },
}

impl Derivation {
    /// An inference that directly references all its parents, with the
    /// standard theorem status.
    pub fn flat(operator: &str, parents: &[Ancestor]) -> Derivation {
        Derivation::flat_with_status(operator, "status(thm)", parents)
    }

    pub fn flat_with_status(operator: &str, status: &str, parents: &[Ancestor]) -> Derivation {
        Derivation::Inference {
            operator: operator.to_string(),
            status: status.to_string(),
            parents: parents
                .iter()
                .map(|p| Derivation::Reference(p.clone()))
                .collect(),
        }
    }

    /// All derivable objects this derivation depends on.
    pub fn parents(&self) -> Vec<Ancestor> {
        match self {
            Derivation::Input | Derivation::EqAxiom => vec![],
            Derivation::Reference(ancestor) => vec![ancestor.clone()],
            Derivation::Inference { parents, .. } => {
                parents.iter().flat_map(|p| p.parents()).collect()
            }
        }
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Derivation::Input => write!(f, "input"),
            Derivation::EqAxiom => write!(f, "eq_axiom"),
            Derivation::Reference(ancestor) => write!(f, "{}", ancestor.name()),
            Derivation::Inference {
                operator,
                status,
                parents,
            } => {
                write!(f, "inference({},{},[", operator, status)?;
                for (i, parent) in parents.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", parent)?;
                }
                write!(f, "])")
            }
        }
    }
}

// Count the virtual edges coming into every ancestor of the root. The
// root itself receives one extra virtual edge. Explicit worklist, so
// deep derivations cannot overflow the stack.
fn annotate_derivation_graph(root: &Ancestor, counts: &mut FxHashMap<u64, usize>) {
    let mut worklist = vec![root.clone()];
    while let Some(node) = worklist.pop() {
        let count = counts.entry(node.id()).or_insert(0);
        let first_visit = *count == 0;
        *count += 1;
        if first_visit {
            worklist.extend(node.parents());
        }
    }
}

// Emit every node whose edge count drops to zero, then release its
// parents. Children are emitted before their parents; the caller
// reverses the result.
fn linearize_derivation(
    root: Ancestor,
    counts: &mut FxHashMap<u64, usize>,
    res: &mut Vec<Ancestor>,
) {
    let mut worklist = vec![root];
    while let Some(node) = worklist.pop() {
        let count = counts.get_mut(&node.id()).unwrap();
        *count -= 1;
        if *count == 0 {
            let parents = node.parents();
            res.push(node);
            // Reversed, so the first parent is processed first.
            worklist.extend(parents.into_iter().rev());
        }
    }
}

/// Linearize the transitive ancestry of root into a listing in which
/// every object appears exactly once, after all of its parents.
pub fn ordered_derivation(root: Ancestor) -> Vec<Ancestor> {
    let mut counts = FxHashMap::default();
    annotate_derivation_graph(&root, &mut counts);
    let mut res = vec![];
    linearize_derivation(root, &mut counts, &mut res);
    res.reverse();
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;

    fn input_clause(s: &str) -> Rc<Clause> {
        let mut clause = Clause::parse(s);
        clause.derivation = Some(Derivation::Input);
        Rc::new(clause)
    }

    #[test]
    fn test_derivation_display() {
        let c1 = input_clause("cnf(c1, axiom, p(a)).");
        let c2 = input_clause("cnf(c2, axiom, ~p(X)|q(X)).");
        let derivation = Derivation::flat("resolution", &[
            Ancestor::Clause(c1.clone()),
            Ancestor::Clause(c2.clone()),
        ]);
        assert_eq!(
            derivation.to_string(),
            "inference(resolution,status(thm),[c1,c2])"
        );
        assert_eq!(Derivation::Input.to_string(), "input");
        assert_eq!(Derivation::EqAxiom.to_string(), "eq_axiom");
    }

    #[test]
    fn test_ordered_derivation() {
        let c1 = input_clause("cnf(c1, axiom, p(a)).");
        let c2 = input_clause("cnf(c2, axiom, ~p(X)|q(X)).");

        let mut c3 = Clause::parse("cnf(c3, plain, q(a)).");
        c3.derivation = Some(Derivation::flat(
            "resolution",
            &[Ancestor::Clause(c1.clone()), Ancestor::Clause(c2.clone())],
        ));
        let c3 = Rc::new(c3);

        // A diamond: c4 depends on c3 and on c1 again.
        let mut c4 = Clause::parse("cnf(c4, plain, r(a)).");
        c4.derivation = Some(Derivation::flat(
            "resolution",
            &[Ancestor::Clause(c3.clone()), Ancestor::Clause(c1.clone())],
        ));
        let c4 = Rc::new(c4);

        let listing = ordered_derivation(Ancestor::Clause(c4.clone()));
        assert_eq!(listing.len(), 4);

        // Every parent must appear before its children.
        let position = |id: u64| listing.iter().position(|a| a.id() == id).unwrap();
        assert!(position(c1.id) < position(c3.id));
        assert!(position(c2.id) < position(c3.id));
        assert!(position(c3.id) < position(c4.id));
        assert!(position(c1.id) < position(c4.id));
    }
}
