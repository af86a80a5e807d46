use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use fxhash::FxHashMap;

use crate::term::Term;

// The single global source of fresh variables. Two independent sources
// would risk name collisions between independently renamed clauses, and
// with that unsound inferences.
static VAR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Return a fresh variable name. Fresh variables are guaranteed to be
/// pairwise distinct, but not distinct from variables already occurring
/// in the input.
pub fn fresh_var() -> String {
    let n = VAR_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("X{}", n)
}

/// A substitution maps variables to terms. Substitutions are always
/// fully expanded: every variable is bound directly to the term it maps
/// to, with no indirection chains.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    subst: FxHashMap<String, Term>,
}

impl Substitution {
    pub fn new() -> Substitution {
        Substitution::default()
    }

    /// Build a substitution from variable/term pairs, taken as-is.
    pub fn from_bindings(init: Vec<(String, Term)>) -> Substitution {
        Substitution {
            subst: init.into_iter().collect(),
        }
    }

    /// The term a variable is bound to, or the variable itself.
    pub fn value(&self, var: &str) -> Term {
        match self.subst.get(var) {
            Some(term) => term.clone(),
            None => Term::Var(var.to_string()),
        }
    }

    pub fn is_bound(&self, var: &str) -> bool {
        self.subst.contains_key(var)
    }

    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Var(name) => self.value(name),
            Term::App(func, args) => Term::App(
                func.clone(),
                args.iter().map(|arg| self.apply(arg)).collect(),
            ),
        }
    }

    /// Add, replace, or (with None) remove a binding, returning the
    /// previous binding of the variable. Used to manage variable scopes
    /// during formula transformations.
    pub fn modify_binding(&mut self, var: &str, term: Option<Term>) -> Option<Term> {
        match term {
            Some(term) => self.subst.insert(var.to_string(), term),
            None => self.subst.remove(var),
        }
    }

    /// Compose a new binding onto the substitution: rewrite every stored
    /// image with the binding, then record the binding itself if the
    /// variable was not already bound.
    pub fn compose_binding(&mut self, var: &str, term: Term) {
        let tmp = Substitution::from_bindings(vec![(var.to_string(), term.clone())]);
        for image in self.subst.values_mut() {
            *image = tmp.apply(image);
        }
        if !self.subst.contains_key(var) {
            self.subst.insert(var.to_string(), term);
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut bindings: Vec<_> = self.subst.iter().collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{{")?;
        for (i, (var, term)) in bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}<-{}", var, term)?;
        }
        write!(f, "}}")
    }
}

/// Map every variable in vars to a fresh variable.
pub fn fresh_var_subst(vars: &BTreeSet<String>) -> Substitution {
    let bindings = vars
        .iter()
        .map(|var| (var.clone(), Term::Var(fresh_var())))
        .collect();
    Substitution::from_bindings(bindings)
}

/// A state of a backtrackable substitution, as returned by `state`.
pub type BtState = usize;

/// A substitution that does not support composition, but can be
/// backtracked to an earlier state. Used by matching and subsumption,
/// which explore alternatives and must retract failed bindings.
#[derive(Debug, Default)]
pub struct BtSubst {
    subst: FxHashMap<String, Term>,
    bindings: Vec<String>,
}

impl BtSubst {
    pub fn new() -> BtSubst {
        BtSubst::default()
    }

    pub fn value(&self, var: &str) -> Term {
        match self.subst.get(var) {
            Some(term) => term.clone(),
            None => Term::Var(var.to_string()),
        }
    }

    pub fn is_bound(&self, var: &str) -> bool {
        self.subst.contains_key(var)
    }

    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Var(name) => self.value(name),
            Term::App(func, args) => Term::App(
                func.clone(),
                args.iter().map(|arg| self.apply(arg)).collect(),
            ),
        }
    }

    /// A state this substitution can later be backtracked to.
    pub fn state(&self) -> BtState {
        self.bindings.len()
    }

    /// Retract one binding. Returns false if there was none.
    pub fn backtrack(&mut self) -> bool {
        match self.bindings.pop() {
            Some(var) => {
                self.subst.remove(&var);
                true
            }
            None => false,
        }
    }

    /// Retract all bindings added since the state was taken. Returns
    /// the number of bindings retracted.
    pub fn backtrack_to_state(&mut self, state: BtState) -> usize {
        assert!(state <= self.bindings.len());
        let mut res = 0;
        while self.bindings.len() > state {
            self.backtrack();
            res += 1;
        }
        res
    }

    pub fn add_binding(&mut self, var: &str, term: Term) {
        self.subst.insert(var.to_string(), term);
        self.bindings.push(var.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subst(bindings: &[(&str, &str)]) -> Substitution {
        Substitution::from_bindings(
            bindings
                .iter()
                .map(|(var, term)| (var.to_string(), Term::parse(term)))
                .collect(),
        )
    }

    #[test]
    fn test_apply() {
        let sigma = subst(&[("X", "a"), ("Y", "a")]);
        assert_eq!(sigma.apply(&Term::parse("f(X,g(Y))")), Term::parse("f(a,g(a))"));
        assert_eq!(sigma.apply(&Term::parse("Z")), Term::parse("Z"));
        let sigma2 = subst(&[("X", "a"), ("Y", "b")]);
        assert_eq!(sigma2.apply(&Term::parse("f(X,g(Y))")), Term::parse("f(a,g(b))"));
    }

    #[test]
    fn test_modify_binding() {
        let mut sigma = subst(&[("X", "a")]);
        let old = sigma.modify_binding("X", Some(Term::parse("f(Y)")));
        assert_eq!(old, Some(Term::parse("a")));
        assert_eq!(sigma.value("X"), Term::parse("f(Y)"));
        let old = sigma.modify_binding("X", None);
        assert_eq!(old, Some(Term::parse("f(Y)")));
        assert!(!sigma.is_bound("X"));
    }

    #[test]
    fn test_compose_binding() {
        // X <- f(Y), then composing Y <- a rewrites the image of X.
        let mut sigma = subst(&[("X", "f(Y)")]);
        sigma.compose_binding("Y", Term::parse("a"));
        assert_eq!(sigma.value("X"), Term::parse("f(a)"));
        assert_eq!(sigma.value("Y"), Term::parse("a"));
    }

    #[test]
    fn test_fresh_var_subst() {
        let mut vars = BTreeSet::new();
        Term::parse("f(X,g(Y))").collect_vars(&mut vars);
        let sigma = fresh_var_subst(&vars);
        let renamed = sigma.apply(&Term::parse("f(X,g(Y))"));
        let mut new_vars = BTreeSet::new();
        renamed.collect_vars(&mut new_vars);
        assert_eq!(new_vars.len(), 2);
        assert!(new_vars.is_disjoint(&vars));
    }

    #[test]
    fn test_backtrack_roundtrip() {
        let mut bt = BtSubst::new();
        bt.add_binding("X", Term::parse("a"));
        let state = bt.state();
        bt.add_binding("Y", Term::parse("f(b)"));
        bt.add_binding("Z", Term::parse("b"));
        assert!(bt.is_bound("Y"));

        let retracted = bt.backtrack_to_state(state);
        assert_eq!(retracted, 2);
        assert!(bt.is_bound("X"));
        assert!(!bt.is_bound("Y"));
        assert!(!bt.is_bound("Z"));
        assert_eq!(bt.backtrack_to_state(state), 0);
    }
}
