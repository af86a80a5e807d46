use std::rc::Rc;

use crate::clause::Clause;
use crate::derivation::Derivation;
use crate::lexer::{Lexer, TokenKind};
use crate::literal::Literal;
use crate::signature::Signature;
use crate::term::Term;

/// The three axioms making "=" an equivalence relation. We are lazy
/// here and just parse them.
pub fn generate_equiv_axioms() -> Vec<Rc<Clause>> {
    let mut lexer = Lexer::new(
        "cnf(reflexivity, axiom, X=X).\n\
         cnf(symmetry, axiom, X!=Y|Y=X).\n\
         cnf(transitivity, axiom, X!=Y|Y!=Z|X=Z).",
    );
    let mut res = vec![];
    while !lexer.test_tok(TokenKind::Eof).expect("fixed axiom text") {
        let mut clause = Clause::parse_from(&mut lexer).expect("fixed axiom text");
        clause.derivation = Some(Derivation::EqAxiom);
        res.push(Rc::new(clause));
    }
    res
}

// Variables x1,...,xn for any prefix x.
fn generate_var_list(x: &str, n: usize) -> Vec<Term> {
    (1..=n).map(|i| Term::Var(format!("{}{}", x, i))).collect()
}

// The premise X1!=Y1|...|Xn!=Yn.
fn generate_eq_premise(arity: usize) -> Vec<Literal> {
    generate_var_list("X", arity)
        .into_iter()
        .zip(generate_var_list("Y", arity))
        .map(|(x, y)| Literal::new(Term::App("=".to_string(), vec![x, y]), true))
        .collect()
}

/// The congruence axiom X1!=Y1|...|Xn!=Yn|f(X1..Xn)=f(Y1..Yn).
pub fn generate_fun_compat_ax(f: &str, arity: usize) -> Rc<Clause> {
    let mut literals = generate_eq_premise(arity);
    let lterm = Term::App(f.to_string(), generate_var_list("X", arity));
    let rterm = Term::App(f.to_string(), generate_var_list("Y", arity));
    literals.push(Literal::new(Term::App("=".to_string(), vec![lterm, rterm]), false));

    let mut clause = Clause::new(literals, crate::clause::ClauseType::Plain);
    clause.derivation = Some(Derivation::EqAxiom);
    Rc::new(clause)
}

/// The congruence axiom X1!=Y1|...|Xn!=Yn|~p(X1..Xn)|p(Y1..Yn).
pub fn generate_pred_compat_ax(p: &str, arity: usize) -> Rc<Clause> {
    let mut literals = generate_eq_premise(arity);
    literals.push(Literal::new(
        Term::App(p.to_string(), generate_var_list("X", arity)),
        true,
    ));
    literals.push(Literal::new(
        Term::App(p.to_string(), generate_var_list("Y", arity)),
        false,
    ));

    let mut clause = Clause::new(literals, crate::clause::ClauseType::Plain);
    clause.derivation = Some(Derivation::EqAxiom);
    Rc::new(clause)
}

/// All congruence axioms for the function and predicate symbols of the
/// signature. Constants and "=" itself need none.
pub fn generate_compat_axioms(sig: &Signature) -> Vec<Rc<Clause>> {
    let mut res = vec![];
    for (f, arity) in sig.fun_symbols() {
        if arity > 0 {
            res.push(generate_fun_compat_ax(&f, arity));
        }
    }
    for (p, arity) in sig.pred_symbols() {
        if arity > 0 && p != "=" {
            res.push(generate_pred_compat_ax(&p, arity));
        }
    }
    res
}
