use crate::substitution::Substitution;
use crate::term::Term;

// Determine if the variable x occurs in the term t. If it does (and t
// is not x itself), the two can never be unified.
fn occurs_check(x: &str, t: &Term) -> bool {
    match t {
        Term::Var(name) => name == x,
        Term::App(_, args) => args.iter().any(|arg| occurs_check(x, arg)),
    }
}

// Unify all terms in l1 with the corresponding terms in l2 under a
// common substitution. The two lists represent the set of equations
// {l1[0]=l2[0], l1[1]=l2[1], ...}, processed as a worklist.
fn mgu_term_list(
    mut l1: Vec<Term>,
    mut l2: Vec<Term>,
    mut subst: Substitution,
) -> Option<Substitution> {
    assert_eq!(l1.len(), l2.len());
    while !l1.is_empty() {
        let t1 = l1.remove(0);
        let t2 = l2.remove(0);
        match (t1, t2) {
            (Term::Var(x), t2) => {
                if t2 == Term::Var(x.clone()) {
                    // Solved: the two sides are the same variable.
                    continue;
                }
                if occurs_check(&x, &t2) {
                    return None;
                }
                // Bind: x cannot occur in t2, so binding x to t2 and
                // rewriting the remaining equations eliminates x.
                let binding = Substitution::from_bindings(vec![(x.clone(), t2.clone())]);
                for t in l1.iter_mut().chain(l2.iter_mut()) {
                    *t = binding.apply(t);
                }
                subst.compose_binding(&x, t2);
            }
            (t1, Term::Var(x)) => {
                // Symmetric case; t1 is compound here, so no equality check.
                if occurs_check(&x, &t1) {
                    return None;
                }
                let binding = Substitution::from_bindings(vec![(x.clone(), t1.clone())]);
                for t in l1.iter_mut().chain(l2.iter_mut()) {
                    *t = binding.apply(t);
                }
                subst.compose_binding(&x, t1);
            }
            (Term::App(f1, args1), Term::App(f2, args2)) => {
                if f1 != f2 || args1.len() != args2.len() {
                    // Structural failure.
                    return None;
                }
                // Decompose: push the pairwise argument equations.
                l1.extend(args1);
                l2.extend(args2);
            }
        }
    }
    Some(subst)
}

/// Compute a most general unifier of t1 and t2, or None if the terms
/// are not unifiable. The result is fully expanded.
pub fn mgu(t1: &Term, t2: &Term) -> Option<Substitution> {
    mgu_term_list(
        vec![t1.clone()],
        vec![t2.clone()],
        Substitution::new(),
    )
}
