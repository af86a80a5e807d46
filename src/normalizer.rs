use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::clause::{Clause, ClauseType};
use crate::derivation::{Ancestor, Derivation};
use crate::formula::{BinOp, Formula, FormulaType, Quantifier, WFormula};
use crate::literal::Literal;
use crate::substitution::{fresh_var, Substitution};
use crate::term::Term;

// Fresh Skolem symbols. Like fresh variables, these are only
// guaranteed not to clash with each other; the input is not supposed
// to contain skolemXXXX symbols.
static SKOLEM_COUNTER: AtomicU64 = AtomicU64::new(0);

fn new_skolem_term(variables: &[String]) -> Term {
    let n = SKOLEM_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    Term::App(
        format!("skolem{:04}", n),
        variables.iter().map(|v| Term::Var(v.clone())).collect(),
    )
}

fn true_formula() -> Formula {
    Formula::Lit(Literal::new(Term::constant("$true"), false))
}

fn formula_type_to_clause_type(ftype: FormulaType) -> ClauseType {
    match ftype {
        FormulaType::Axiom => ClauseType::Axiom,
        FormulaType::NegatedConjecture => ClauseType::NegatedConjecture,
        _ => ClauseType::Plain,
    }
}

/// Eliminate <=, <~>, ~| and ~&. Not strictly necessary, but it means
/// fewer cases to consider later:
///   F~|G  -> ~(F|G)
///   F~&G  -> ~(F&G)
///   F<=G  -> G=>F
///   F<~>G -> ~(F<=>G)
pub fn op_simplify(f: Formula) -> (Formula, bool) {
    match f {
        Formula::Lit(_) => (f, false),
        Formula::Not(sub) => {
            let (sub, m) = op_simplify(*sub);
            (Formula::not(sub), m)
        }
        Formula::Quant(q, var, sub) => {
            let (sub, m) = op_simplify(*sub);
            (Formula::Quant(q, var, Box::new(sub)), m)
        }
        Formula::Binary(op, left, right) => {
            let (left, m1) = op_simplify(*left);
            let (right, m2) = op_simplify(*right);
            let modified = m1 || m2;
            match op {
                BinOp::Xor => (
                    Formula::not(Formula::binary(BinOp::Equiv, left, right)),
                    true,
                ),
                BinOp::BImplies => (Formula::binary(BinOp::Implies, right, left), true),
                BinOp::Nor => (Formula::not(Formula::binary(BinOp::Or, left, right)), true),
                BinOp::Nand => (Formula::not(Formula::binary(BinOp::And, left, right)), true),
                _ => (Formula::binary(op, left, right), modified),
            }
        }
    }
}

// The top-level simplification rules: truth-constant propagation,
// idempotency, and removal of vacuous quantifiers.
fn top_simplify(f: Formula) -> (Formula, bool) {
    match f {
        Formula::Not(sub) => {
            if let Formula::Lit(literal) = *sub {
                // Push the negation into the literal.
                return (Formula::Lit(literal.negate()), true);
            }
            (Formula::not(*sub), false)
        }
        Formula::Binary(BinOp::Or, left, right) => {
            if left.is_prop_const(true) {
                (*left, true)
            } else if right.is_prop_const(true) {
                (*right, true)
            } else if left.is_prop_const(false) {
                (*right, true)
            } else if right.is_prop_const(false) {
                (*left, true)
            } else if left.is_equal(&right) {
                (*right, true)
            } else {
                (Formula::Binary(BinOp::Or, left, right), false)
            }
        }
        Formula::Binary(BinOp::And, left, right) => {
            if left.is_prop_const(true) {
                (*right, true)
            } else if right.is_prop_const(true) {
                (*left, true)
            } else if left.is_prop_const(false) {
                (*left, true)
            } else if right.is_prop_const(false) {
                (*right, true)
            } else if left.is_equal(&right) {
                (*right, true)
            } else {
                (Formula::Binary(BinOp::And, left, right), false)
            }
        }
        Formula::Binary(BinOp::Equiv, left, right) => {
            if left.is_prop_const(true) {
                (*right, true)
            } else if right.is_prop_const(true) {
                (*left, true)
            } else if left.is_prop_const(false) {
                let (res, _) = simplify(Formula::not(*right));
                (res, true)
            } else if right.is_prop_const(false) {
                let (res, _) = simplify(Formula::not(*left));
                (res, true)
            } else if left.is_equal(&right) {
                (true_formula(), true)
            } else {
                (Formula::Binary(BinOp::Equiv, left, right), false)
            }
        }
        Formula::Binary(BinOp::Implies, left, right) => {
            if left.is_prop_const(true) {
                (*right, true)
            } else if left.is_prop_const(false) {
                (true_formula(), true)
            } else if right.is_prop_const(true) {
                (true_formula(), true)
            } else if right.is_prop_const(false) {
                let (res, _) = simplify(Formula::not(*left));
                (res, true)
            } else if left.is_equal(&right) {
                (true_formula(), true)
            } else {
                (Formula::Binary(BinOp::Implies, left, right), false)
            }
        }
        Formula::Quant(q, var, sub) => {
            if !sub.collect_free_vars().contains(&var) {
                // The quantifier binds nothing.
                (*sub, true)
            } else {
                (Formula::Quant(q, var, sub), false)
            }
        }
        _ => (f, false),
    }
}

/// Exhaustively simplify a formula, bottom-up.
pub fn simplify(f: Formula) -> (Formula, bool) {
    if f.is_literal() {
        return (f, false);
    }
    let (mut f, mut modified) = match f {
        Formula::Not(sub) => {
            let (sub, m) = simplify(*sub);
            (Formula::not(sub), m)
        }
        Formula::Binary(op, left, right) => {
            let (left, m1) = simplify(*left);
            let (right, m2) = simplify(*right);
            (Formula::binary(op, left, right), m1 || m2)
        }
        Formula::Quant(q, var, sub) => {
            let (sub, m) = simplify(*sub);
            (Formula::Quant(q, var, Box::new(sub)), m)
        }
        lit => (lit, false),
    };

    loop {
        let (new_f, top_modified) = top_simplify(f);
        f = new_f;
        modified |= top_modified;
        if !top_modified {
            return (f, modified);
        }
    }
}

// All NNF rules applicable at the top level: negation pushing, De
// Morgan, quantifier duality, and the polarity-directed expansion of
// => and <=>.
fn root_nnf(mut f: Formula, polarity: i32) -> (Formula, bool) {
    let mut modified = false;
    loop {
        let mut m = false;
        f = match f {
            Formula::Not(sub) => match *sub {
                Formula::Lit(literal) => {
                    m = true;
                    Formula::Lit(literal.negate())
                }
                Formula::Binary(BinOp::Or, left, right) => {
                    m = true;
                    Formula::binary(BinOp::And, Formula::not(*left), Formula::not(*right))
                }
                Formula::Binary(BinOp::And, left, right) => {
                    m = true;
                    Formula::binary(BinOp::Or, Formula::not(*left), Formula::not(*right))
                }
                Formula::Quant(Quantifier::Universal, var, sub) => {
                    m = true;
                    Formula::Quant(
                        Quantifier::Existential,
                        var,
                        Box::new(Formula::not(*sub)),
                    )
                }
                Formula::Quant(Quantifier::Existential, var, sub) => {
                    m = true;
                    Formula::Quant(Quantifier::Universal, var, Box::new(Formula::not(*sub)))
                }
                other => Formula::not(other),
            },
            Formula::Binary(BinOp::Implies, left, right) => {
                m = true;
                Formula::binary(BinOp::Or, Formula::not(*left), *right)
            }
            Formula::Binary(BinOp::Equiv, left, right) => {
                m = true;
                if polarity == 1 {
                    // P<=>Q -> (P=>Q)&(Q=>P)
                    Formula::binary(
                        BinOp::And,
                        Formula::binary(BinOp::Implies, (*left).clone(), (*right).clone()),
                        Formula::binary(BinOp::Implies, *right, *left),
                    )
                } else {
                    // P<=>Q -> (P&Q)|(~P&~Q)
                    Formula::binary(
                        BinOp::Or,
                        Formula::binary(BinOp::And, (*left).clone(), (*right).clone()),
                        Formula::binary(
                            BinOp::And,
                            Formula::not(*left),
                            Formula::not(*right),
                        ),
                    )
                }
            }
            other => other,
        };
        modified |= m;
        if !m {
            return (f, modified);
        }
    }
}

/// Convert a formula into negation normal form. Equivalences are
/// eliminated depending on polarity, top to bottom.
pub fn formula_nnf(f: Formula, polarity: i32) -> (Formula, bool) {
    let mut modified = false;
    let mut f = f;
    loop {
        let (new_f, m) = root_nnf(f, polarity);
        f = new_f;
        modified |= m;

        let mut changed = false;
        f = match f {
            Formula::Not(sub) => {
                let (handle, m) = formula_nnf(*sub, -polarity);
                changed = m;
                Formula::not(handle)
            }
            Formula::Quant(q, var, sub) => {
                let (handle, m) = formula_nnf(*sub, polarity);
                changed = m;
                Formula::Quant(q, var, Box::new(handle))
            }
            Formula::Binary(op @ (BinOp::Or | BinOp::And), left, right) => {
                let (handle1, m1) = formula_nnf(*left, polarity);
                let (handle2, m2) = formula_nnf(*right, polarity);
                changed = m1 || m2;
                Formula::binary(op, handle1, handle2)
            }
            other => {
                debug_assert!(other.is_literal());
                other
            }
        };
        modified |= changed;
        if !changed {
            return (f, modified);
        }
    }
}

/// Miniscoping: move quantifiers inward, so each scope is the smallest
/// subformula in which the bound variable occurs.
pub fn miniscope(f: Formula) -> (Formula, bool) {
    let mut res = false;
    let mut f = f;

    if let Formula::Quant(quant, var, sub) = f {
        f = match *sub {
            Formula::Binary(op, left, right) if op == BinOp::And || op == BinOp::Or => {
                if !left.collect_free_vars().contains(&var) {
                    // q[X]:(P op Q) -> P op (q[X]:Q) if X not free in P
                    res = true;
                    Formula::Binary(op, left, Box::new(Formula::Quant(quant, var, right)))
                } else if !right.collect_free_vars().contains(&var) {
                    // q[X]:(P op Q) -> (q[X]:P) op Q if X not free in Q
                    res = true;
                    Formula::Binary(op, Box::new(Formula::Quant(quant, var, left)), right)
                } else if op == BinOp::And && quant == Quantifier::Universal {
                    // ![X]:(P&Q) -> ![X]:P & ![X]:Q
                    res = true;
                    Formula::binary(
                        BinOp::And,
                        Formula::Quant(Quantifier::Universal, var.clone(), left),
                        Formula::Quant(Quantifier::Universal, var, right),
                    )
                } else if op == BinOp::Or && quant == Quantifier::Existential {
                    // ?[X]:(P|Q) -> ?[X]:P | ?[X]:Q
                    res = true;
                    Formula::binary(
                        BinOp::Or,
                        Formula::Quant(Quantifier::Existential, var.clone(), left),
                        Formula::Quant(Quantifier::Existential, var, right),
                    )
                } else {
                    Formula::Quant(quant, var, Box::new(Formula::Binary(op, left, right)))
                }
            }
            other => Formula::Quant(quant, var, Box::new(other)),
        };
    }

    let (mut f, modified) = match f {
        Formula::Not(sub) => {
            let (sub, m) = miniscope(*sub);
            (Formula::not(sub), m)
        }
        Formula::Binary(op, left, right) => {
            let (left, m1) = miniscope(*left);
            let (right, m2) = miniscope(*right);
            (Formula::binary(op, left, right), m1 || m2)
        }
        Formula::Quant(q, var, sub) => {
            let (sub, m) = miniscope(*sub);
            (Formula::Quant(q, var, Box::new(sub)), m)
        }
        lit => (lit, false),
    };
    if modified {
        let (new_f, _) = miniscope(f);
        f = new_f;
        res = true;
    }
    (f, res)
}

/// Rename bound variables so that every quantifier binds a distinct
/// fresh variable.
pub fn var_rename(f: &Formula, subst: &mut Substitution) -> Formula {
    match f {
        Formula::Lit(literal) => Formula::Lit(literal.instantiate(subst)),
        Formula::Not(sub) => Formula::not(var_rename(sub, subst)),
        Formula::Binary(op, left, right) => {
            Formula::binary(*op, var_rename(left, subst), var_rename(right, subst))
        }
        Formula::Quant(q, var, sub) => {
            // A new scope: bind the variable to a fresh one, restore
            // the previous binding on the way out.
            let newvar = fresh_var();
            let old = subst.modify_binding(var, Some(Term::Var(newvar.clone())));
            let renamed = var_rename(sub, subst);
            subst.modify_binding(var, old);
            Formula::Quant(*q, newvar, Box::new(renamed))
        }
    }
}

// Skolemize f under the given list of universally quantified
// variables. Existential quantifiers are replaced by bindings to new
// Skolem terms over those variables.
fn rek_skolemize(f: Formula, variables: &mut Vec<String>, subst: &mut Substitution) -> Formula {
    match f {
        Formula::Lit(literal) => Formula::Lit(literal.instantiate(subst)),
        Formula::Quant(Quantifier::Existential, var, sub) => {
            let sk_term = new_skolem_term(variables);
            let old = subst.modify_binding(&var, Some(sk_term));
            let res = rek_skolemize(*sub, variables, subst);
            subst.modify_binding(&var, old);
            res
        }
        Formula::Quant(Quantifier::Universal, var, sub) => {
            variables.push(var.clone());
            let handle = rek_skolemize(*sub, variables, subst);
            variables.pop();
            Formula::Quant(Quantifier::Universal, var, Box::new(handle))
        }
        Formula::Not(sub) => Formula::not(rek_skolemize(*sub, variables, subst)),
        Formula::Binary(op, left, right) => Formula::binary(
            op,
            rek_skolemize(*left, variables, subst),
            rek_skolemize(*right, variables, subst),
        ),
    }
}

/// Outermost Skolemization, removing all existential quantifiers.
/// Free variables are treated as universally quantified.
pub fn skolemize(f: Formula) -> Formula {
    let free_vars = f.collect_free_vars();
    let mut variables: Vec<String> = free_vars.into_iter().collect();
    rek_skolemize(f, &mut variables, &mut Substitution::new())
}

// Strip all (universal) quantifiers, collecting the variables. Only
// applied to Skolemized, variable-normalized formulas.
fn separate_quantors(f: Formula, varlist: &mut Vec<String>) -> Formula {
    match f {
        Formula::Quant(q, var, sub) => {
            debug_assert!(q == Quantifier::Universal);
            varlist.push(var);
            separate_quantors(*sub, varlist)
        }
        Formula::Lit(_) => f,
        Formula::Not(sub) => Formula::not(separate_quantors(*sub, varlist)),
        Formula::Binary(op, left, right) => Formula::binary(
            op,
            separate_quantors(*left, varlist),
            separate_quantors(*right, varlist),
        ),
    }
}

/// Shift all universal quantifiers to the outermost level.
pub fn shift_quantors_out(f: Formula) -> Formula {
    let mut varlist = vec![];
    let mut f = separate_quantors(f, &mut varlist);
    while let Some(var) = varlist.pop() {
        f = Formula::Quant(Quantifier::Universal, var, Box::new(f));
    }
    f
}

/// Distribute disjunctions over conjunctions, turning a Skolemized
/// prenex-NNF formula into conjunctive normal form.
pub fn distribute_disjunctions(f: Formula) -> Formula {
    let f = match f {
        Formula::Quant(q, var, sub) => {
            Formula::Quant(q, var, Box::new(distribute_disjunctions(*sub)))
        }
        Formula::Lit(_) => f,
        Formula::Not(sub) => Formula::not(distribute_disjunctions(*sub)),
        Formula::Binary(op, left, right) => Formula::binary(
            op,
            distribute_disjunctions(*left),
            distribute_disjunctions(*right),
        ),
    };
    match f {
        Formula::Binary(BinOp::Or, left, right) => match (*left, *right) {
            (Formula::Binary(BinOp::And, ll, lr), right) => {
                // (P&Q)|R -> (P|R)&(Q|R)
                let arg1 = Formula::binary(BinOp::Or, *ll, right.clone());
                let arg2 = Formula::binary(BinOp::Or, *lr, right);
                distribute_disjunctions(Formula::binary(BinOp::And, arg1, arg2))
            }
            (left, Formula::Binary(BinOp::And, rl, rr)) => {
                // R|(P&Q) -> (R|P)&(R|Q)
                let arg1 = Formula::binary(BinOp::Or, left.clone(), *rl);
                let arg2 = Formula::binary(BinOp::Or, left, *rr);
                distribute_disjunctions(Formula::binary(BinOp::And, arg1, arg2))
            }
            (left, right) => Formula::binary(BinOp::Or, left, right),
        },
        other => other,
    }
}

/// Run the whole pipeline on a wrapped formula, recording one
/// derivation step per stage that changes the formula.
pub fn wformula_cnf(wf: Rc<WFormula>) -> Rc<WFormula> {
    let mut wf = wf;

    let wrap = |formula: Formula, wf: &Rc<WFormula>, operator: &str, status: &str| {
        let mut tmp = WFormula::new(formula, wf.ftype);
        tmp.derivation = Some(Derivation::flat_with_status(
            operator,
            status,
            &[Ancestor::Formula(wf.clone())],
        ));
        Rc::new(tmp)
    };

    let (f, m0) = op_simplify(wf.formula.clone());
    let (f, m1) = simplify(f);
    if m0 || m1 {
        wf = wrap(f.clone(), &wf, "fof_simplification", "status(thm)");
    }

    let (f, m) = formula_nnf(f, 1);
    if m {
        wf = wrap(f.clone(), &wf, "fof_nnf", "status(thm)");
    }

    let (f, m) = miniscope(f);
    if m {
        wf = wrap(f.clone(), &wf, "miniscope", "status(thm)");
    }

    let f = var_rename(&f, &mut Substitution::new());
    if !f.is_equal(&wf.formula) {
        wf = wrap(f.clone(), &wf, "variable_rename", "status(thm)");
    }

    let f = skolemize(f);
    if !f.is_equal(&wf.formula) {
        wf = wrap(f.clone(), &wf, "skolemize", "status(esa)");
    }

    let f = shift_quantors_out(f);
    if !f.is_equal(&wf.formula) {
        wf = wrap(f.clone(), &wf, "shift_quantors", "status(thm)");
    }

    let f = distribute_disjunctions(f);
    if !f.is_equal(&wf.formula) {
        wf = wrap(f, &wf, "distribute", "status(thm)");
    }

    wf
}

// Split a CNF formula into clauses, one per conjunct of the matrix.
fn cnf_split(wf: &Rc<WFormula>) -> Vec<Clause> {
    let matrix = wf.formula.matrix();
    debug_assert!(matrix.is_clause_conjunction());
    let ctype = formula_type_to_clause_type(wf.ftype);

    let mut res = vec![];
    for conjunct in matrix.conj_to_list() {
        let literals: Vec<Literal> = conjunct
            .disj_to_list()
            .iter()
            .map(|f| match f {
                Formula::Lit(literal) => literal.clone(),
                _ => panic!("formula is not in CNF"),
            })
            .collect();
        res.push(Clause::new(literals, ctype));
    }
    res
}

/// Convert a wrapped formula into clause normal form.
pub fn wformula_clausify(wf: Rc<WFormula>) -> Vec<Clause> {
    let wf = wformula_cnf(wf);
    let mut clauses = cnf_split(&wf);
    for clause in &mut clauses {
        clause.derivation = Some(Derivation::flat(
            "split_conjunct",
            &[Ancestor::Formula(wf.clone())],
        ));
    }
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;

    // NNF means negations only inside literals and no residual
    // implications or equivalences.
    fn is_nnf(f: &Formula) -> bool {
        match f {
            Formula::Lit(_) => true,
            Formula::Quant(_, _, sub) => is_nnf(sub),
            Formula::Binary(BinOp::And | BinOp::Or, left, right) => is_nnf(left) && is_nnf(right),
            _ => false,
        }
    }

    fn simplified(s: &str) -> Formula {
        let (f, _) = op_simplify(Formula::parse(s));
        let (f, _) = simplify(f);
        f
    }

    #[test]
    fn test_op_simplify() {
        let (f, m) = op_simplify(Formula::parse("a ~| b"));
        assert!(m);
        assert_eq!(f.to_string(), "(~(a|b))");

        let (f, m) = op_simplify(Formula::parse("a <= b"));
        assert!(m);
        assert_eq!(f.to_string(), "(b=>a)");

        let (f, m) = op_simplify(Formula::parse("a <~> b"));
        assert!(m);
        assert_eq!(f.to_string(), "(~(a<=>b))");

        let (_, m) = op_simplify(Formula::parse("a & b"));
        assert!(!m);
    }

    #[test]
    fn test_truth_constant_simplification() {
        assert!(simplified("p(a)|$true").is_prop_const(true));
        assert!(simplified("p(a)&$false").is_prop_const(false));
        assert!(simplified("$false|p(a)").is_equal(&Formula::parse("p(a)")));
        assert!(simplified("p(a)&$true").is_equal(&Formula::parse("p(a)")));
        assert!(simplified("p(a)<=>p(a)").is_prop_const(true));
        assert!(simplified("p(a)=>$true").is_prop_const(true));
        assert!(simplified("$false=>p(a)").is_prop_const(true));
        // p(a)=>$false collapses to the negated literal.
        let collapsed = simplified("p(a)=>$false");
        assert!(collapsed.is_literal());
        assert_eq!(collapsed.to_string(), "~p(a)");
        // A quantifier binding nothing is dropped.
        assert!(simplified("![X]:p(a)").is_equal(&Formula::parse("p(a)")));
        assert!(simplified("p(a)|p(a)").is_equal(&Formula::parse("p(a)")));
    }

    #[test]
    fn test_nnf() {
        for s in [
            "~(p(a)|q(b))",
            "~(p(a)&q(b))",
            "~(![X]:p(X))",
            "~(?[X]:p(X))",
            "a => b",
            "a <=> b",
            "![X]:(a(X) <=> b(X))",
            "~(![X]:(p(X) => q(X)))",
        ] {
            let (f, _) = op_simplify(Formula::parse(s));
            let (f, _) = simplify(f);
            let (f, _) = formula_nnf(f, 1);
            assert!(is_nnf(&f), "not in NNF: {}", f);
        }
    }

    #[test]
    fn test_miniscope() {
        // X is not free in q(a), so the quantifier moves inward.
        let (f, m) = miniscope(Formula::parse("![X]:(p(X)|q(a))"));
        assert!(m);
        assert_eq!(f.to_string(), "((![X]:p(X))|q(a))");

        // Universal distributes over conjunction.
        let (f, m) = miniscope(Formula::parse("![X]:(p(X)&q(X))"));
        assert!(m);
        assert_eq!(f.to_string(), "((![X]:p(X))&(![X]:q(X)))");

        // Nothing to do here.
        let (_, m) = miniscope(Formula::parse("![X]:(p(X)|q(X))"));
        assert!(!m);
    }

    #[test]
    fn test_var_rename_makes_binders_unique() {
        let f = Formula::parse("(![X]:p(X)) & (![X]:q(X))");
        let renamed = var_rename(&f, &mut Substitution::new());
        let mut binders = vec![];
        fn collect_binders(f: &Formula, res: &mut Vec<String>) {
            match f {
                Formula::Quant(_, var, sub) => {
                    res.push(var.clone());
                    collect_binders(sub, res);
                }
                Formula::Not(sub) => collect_binders(sub, res),
                Formula::Binary(_, l, r) => {
                    collect_binders(l, res);
                    collect_binders(r, res);
                }
                Formula::Lit(_) => {}
            }
        }
        collect_binders(&renamed, &mut binders);
        assert_eq!(binders.len(), 2);
        assert_ne!(binders[0], binders[1]);
    }

    #[test]
    fn test_skolemize() {
        // An existential without universal context becomes a constant.
        let f = var_rename(&Formula::parse("?[X]:p(X)"), &mut Substitution::new());
        let f = skolemize(f);
        let mut vars = std::collections::BTreeSet::new();
        f.collect_vars(&mut vars);
        assert!(vars.is_empty());

        // Under a universal quantifier the Skolem term takes it as an
        // argument.
        let f = var_rename(
            &Formula::parse("![X]:(?[Y]:p(X,Y))"),
            &mut Substitution::new(),
        );
        let f = skolemize(f);
        if let Formula::Quant(_, var, sub) = &f {
            if let Formula::Lit(literal) = sub.matrix() {
                let skolem_arg = &literal.atom.args()[1];
                assert!(skolem_arg.is_compound());
                assert_eq!(skolem_arg.args(), &[Term::Var(var.clone())]);
            } else {
                panic!("expected a literal matrix");
            }
        } else {
            panic!("expected a quantified formula");
        }
    }

    #[test]
    fn test_distribute() {
        let f = distribute_disjunctions(Formula::parse("(p(a)&q(a))|r(a)"));
        assert!(f.is_clause_conjunction());
        assert_eq!(f.conj_to_list().len(), 2);
    }

    #[test]
    fn test_wformula_cnf_produces_cnf() {
        for s in [
            "fof(f1, axiom, ![X]:(a(X) ~| ~a=b)).",
            "fof(f2, axiom, ![X]:(a(X)|b(X)|?[X,Y]:(p(X,f(Y))<~>q(g(a),X)))).",
            "fof(f3, axiom, ![X]:(a(X) <= ~a=b)).",
            "fof(f4, axiom, ((((![X]:a(X))|b(X))|(?[X]:(?[Y]:p(X,f(Y)))))~&q(g(a),X))).",
            "fof(f5, axiom, ![X]:(a(X)|$true)).",
        ] {
            let wf = Rc::new(WFormula::parse(s));
            let res = wformula_cnf(wf);
            assert!(res.formula.is_cnf(), "not CNF: {}", res.formula);
        }
    }

    #[test]
    fn test_clausify_implication() {
        let wf = Rc::new(WFormula::parse("fof(f, axiom, ![X]:(a(X) => b(X)))."));
        let clauses = wformula_clausify(wf);
        assert_eq!(clauses.len(), 1);
        let clause = &clauses[0];
        assert_eq!(clause.len(), 2);
        assert_eq!(clause.ctype, ClauseType::Axiom);
        let negative: Vec<_> = clause.literals.iter().filter(|l| l.is_negative()).collect();
        assert_eq!(negative.len(), 1);
        assert_eq!(negative[0].atom.func(), "a");
        assert!(clause.derivation.is_some());
    }

    #[test]
    fn test_clausify_equivalence() {
        let wf = Rc::new(WFormula::parse("fof(f, axiom, a <=> b)."));
        let clauses = wformula_clausify(wf);
        assert_eq!(clauses.len(), 2);
    }

    #[test]
    fn test_clausify_existential_is_ground() {
        let wf = Rc::new(WFormula::parse("fof(f, axiom, ?[X]:p(X))."));
        let clauses = wformula_clausify(wf);
        assert_eq!(clauses.len(), 1);
        assert!(clauses[0].get_literal(0).atom.is_ground());
    }
}
