use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;

use ordered_float::OrderedFloat;

use crate::derivation::{next_derivable_id, Derivation};
use crate::error::Result;
use crate::lexer::{Lexer, TokenKind};
use crate::literal::{lit_in_lit_list, opposite_in_lit_list, parse_literal_list, Literal};
use crate::selection::{select_inference_lits_ordered, LiteralSelector};
use crate::signature::Signature;
use crate::kbo::Ocb;
use crate::substitution::{fresh_var_subst, Substitution};

/// The clause types the engine distinguishes. Everything that is not an
/// axiom or a negated conjecture is "plain".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseType {
    Axiom,
    NegatedConjecture,
    Plain,
}

impl ClauseType {
    pub fn from_name(name: &str) -> ClauseType {
        match name {
            "axiom" => ClauseType::Axiom,
            "negated_conjecture" => ClauseType::NegatedConjecture,
            _ => ClauseType::Plain,
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClauseType::Axiom => write!(f, "axiom"),
            ClauseType::NegatedConjecture => write!(f, "negated_conjecture"),
            ClauseType::Plain => write!(f, "plain"),
        }
    }
}

/// A clause: a disjunction of literals, implicitly universally
/// quantified. The literal order carries no logical meaning but is
/// preserved so runs replay deterministically.
///
/// Clauses are identified by id, not by structure: the same literals
/// parsed twice give two distinct clauses. Once a clause enters the
/// proof state it is shared (Rc) and only the SOS flag and the
/// evaluation vector can still change, both set exactly once.
#[derive(Debug)]
pub struct Clause {
    pub literals: Vec<Literal>,
    pub ctype: ClauseType,
    pub name: String,
    pub id: u64,
    pub derivation: Option<Derivation>,
    pub part_of_sos: Cell<bool>,
    evaluation: RefCell<Option<Vec<OrderedFloat<f64>>>>,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tptp(false))
    }
}

impl Clause {
    /// Build a clause. Propositionally false literals ($false, ~$true)
    /// cannot contribute to a disjunction and are dropped here.
    pub fn new(literals: Vec<Literal>, ctype: ClauseType) -> Clause {
        let id = next_derivable_id();
        Clause::with_name(literals, ctype, &format!("c{}", id), id)
    }

    fn with_name(literals: Vec<Literal>, ctype: ClauseType, name: &str, id: u64) -> Clause {
        Clause {
            literals: literals.into_iter().filter(|l| !l.is_prop_false()).collect(),
            ctype,
            name: name.to_string(),
            id,
            derivation: None,
            part_of_sos: Cell::new(false),
            evaluation: RefCell::new(None),
        }
    }

    pub fn named(literals: Vec<Literal>, ctype: ClauseType, name: &str) -> Clause {
        Clause::with_name(literals, ctype, name, next_derivable_id())
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn is_horn(&self) -> bool {
        self.literals.iter().filter(|l| l.is_positive()).count() <= 1
    }

    pub fn get_literal(&self, position: usize) -> &Literal {
        &self.literals[position]
    }

    /// The positions of all negative literals.
    pub fn negative_lit_positions(&self) -> Vec<usize> {
        (0..self.literals.len())
            .filter(|&i| self.literals[i].is_negative())
            .collect()
    }

    pub fn collect_vars(&self, res: &mut BTreeSet<String>) {
        for literal in &self.literals {
            literal.collect_vars(res);
        }
    }

    pub fn collect_sig(&self, sig: &mut Signature) {
        for literal in &self.literals {
            literal.collect_sig(sig);
        }
    }

    pub fn weight(&self, fweight: i64, vweight: i64) -> i64 {
        self.literals
            .iter()
            .map(|l| l.weight(fweight, vweight))
            .sum()
    }

    /// Mark the inference literals. With a selector and negative
    /// literals present, the selector picks among the negative
    /// literals and everything else is demoted. A clause without
    /// negative literals falls through to KBO-ordered selection when
    /// an order-control block is available.
    pub fn select_inference_lits(&mut self, selector: LiteralSelector, ocb: Option<&Ocb>) {
        let candidates = self.negative_lit_positions();
        if candidates.is_empty() {
            if let Some(ocb) = ocb {
                select_inference_lits_ordered(ocb, self);
            }
            return;
        }
        for literal in &mut self.literals {
            literal.set_inference_lit(false);
        }
        for position in selector.select(&self.literals, &candidates) {
            self.literals[position].set_inference_lit(true);
        }
    }

    /// The sorted sequence of (polarity, predicate) pairs of the
    /// clause's literals.
    pub fn predicate_abstraction(&self) -> Vec<(bool, String)> {
        let mut res: Vec<_> = self
            .literals
            .iter()
            .map(|l| l.predicate_abstraction())
            .collect();
        res.sort();
        res
    }

    /// A copy instantiated with the substitution. Name, type,
    /// derivation and SOS flag carry over; the copy has its own id.
    pub fn instantiate(&self, subst: &Substitution) -> Clause {
        let literals = self.literals.iter().map(|l| l.instantiate(subst)).collect();
        let mut res = Clause::named(literals, self.ctype, &self.name);
        res.derivation = self.derivation.clone();
        res.part_of_sos.set(self.part_of_sos.get());
        res
    }

    /// A copy with all variables renamed to fresh ones. Premises of an
    /// inference must be variable-disjoint; the saturation loop takes a
    /// fresh copy of every given clause to guarantee this.
    pub fn fresh_var_copy(&self) -> Clause {
        let mut vars = BTreeSet::new();
        self.collect_vars(&mut vars);
        self.instantiate(&fresh_var_subst(&vars))
    }

    pub fn add_eval(&self, evals: Vec<OrderedFloat<f64>>) {
        *self.evaluation.borrow_mut() = Some(evals);
    }

    pub fn eval(&self, index: usize) -> Option<OrderedFloat<f64>> {
        self.evaluation.borrow().as_ref().map(|evals| evals[index])
    }

    pub fn remove_dup_lits(&mut self) {
        let mut res: Vec<Literal> = vec![];
        for literal in self.literals.drain(..) {
            if !lit_in_lit_list(&literal, &res) {
                res.push(literal);
            }
        }
        self.literals = res;
    }

    /// A clause is a simple tautology if it contains two literals with
    /// the same atom but opposite signs.
    pub fn is_tautology(&self) -> bool {
        (0..self.literals.len())
            .any(|i| opposite_in_lit_list(&self.literals[i], &self.literals[i + 1..]))
    }

    /// The TPTP-3 rendering, optionally with the derivation attached.
    pub fn tptp(&self, show_derivation: bool) -> String {
        let lits = if self.literals.is_empty() {
            "$false".to_string()
        } else {
            self.literals
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join("|")
        };
        let derivation = match (&self.derivation, show_derivation) {
            (Some(derivation), true) => format!(",{}", derivation),
            _ => String::new(),
        };
        format!("cnf({},{},{}{}).", self.name, self.ctype, lits, derivation)
    }

    /// Parse a clause in (slightly simplified) TPTP-3 syntax:
    /// cnf(<name>, <type>, <literal list>).
    pub fn parse_from(lexer: &mut Lexer) -> Result<Clause> {
        lexer.accept_lit("cnf")?;
        lexer.accept_tok(TokenKind::OpenPar)?;
        let name = lexer.accept_tok(TokenKind::IdentLower)?.literal;
        lexer.accept_tok(TokenKind::Comma)?;
        let ctype = ClauseType::from_name(&lexer.accept_tok(TokenKind::IdentLower)?.literal);
        lexer.accept_tok(TokenKind::Comma)?;
        let literals = if lexer.test_tok(TokenKind::OpenPar)? {
            lexer.accept_tok(TokenKind::OpenPar)?;
            let literals = parse_literal_list(lexer)?;
            lexer.accept_tok(TokenKind::ClosePar)?;
            literals
        } else {
            parse_literal_list(lexer)?
        };
        lexer.accept_tok(TokenKind::ClosePar)?;
        lexer.accept_tok(TokenKind::FullStop)?;

        let mut res = Clause::named(literals, ctype, &name);
        res.derivation = Some(Derivation::Input);
        Ok(res)
    }

    /// Parse a clause from a string. Only used by tests and fixtures.
    pub fn parse(s: &str) -> Clause {
        let mut lexer = Lexer::new(s);
        Clause::parse_from(&mut lexer).expect("bad clause fixture")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let clause = Clause::parse("cnf(test, axiom, p(a)|p(f(X))).");
        assert_eq!(clause.len(), 2);
        assert_eq!(clause.name, "test");
        assert_eq!(clause.ctype, ClauseType::Axiom);

        // The literal list may be parenthesized.
        let clause = Clause::parse("cnf(test2, axiom, (p(a)|~p(f(X)))).");
        assert_eq!(clause.len(), 2);

        // Unknown types map to plain.
        let clause = Clause::parse("cnf(test3, lemma, p(a)).");
        assert_eq!(clause.ctype, ClauseType::Plain);

        // $false alone is the empty clause.
        let clause = Clause::parse("cnf(empty, axiom, $false).");
        assert!(clause.is_empty());
    }

    #[test]
    fn test_classification() {
        assert!(Clause::parse("cnf(u, axiom, p(a)).").is_unit());
        assert!(Clause::parse("cnf(h, axiom, p(a)|~q(X)|~r(X)).").is_horn());
        assert!(!Clause::parse("cnf(n, axiom, p(a)|q(X)).").is_horn());
    }

    #[test]
    fn test_tautology() {
        assert!(Clause::parse("cnf(taut, axiom, p(a)|q(a)|~p(a)).").is_tautology());
        assert!(!Clause::parse("cnf(not_taut, axiom, p(a)|q(a)|~p(b)).").is_tautology());
        // p(X4)|~p(X4) is a tautology literally, not just semantically.
        assert!(Clause::parse("cnf(t2, axiom, p(X4)|~p(X4)).").is_tautology());
    }

    #[test]
    fn test_remove_dup_lits() {
        let mut clause = Clause::parse("cnf(dup, axiom, p(X)|~q|p(a)|~q|p(X)).");
        clause.remove_dup_lits();
        assert_eq!(clause.len(), 3);
    }

    #[test]
    fn test_fresh_var_copy() {
        let clause = Clause::parse("cnf(c, axiom, p(X)|~q(X,Y)).");
        let copy = clause.fresh_var_copy();
        assert_eq!(copy.len(), clause.len());
        assert_eq!(copy.name, clause.name);

        let mut vars = BTreeSet::new();
        clause.collect_vars(&mut vars);
        let mut copy_vars = BTreeSet::new();
        copy.collect_vars(&mut copy_vars);
        assert_eq!(copy_vars.len(), vars.len());
        assert!(copy_vars.is_disjoint(&vars));

        // The shape is unchanged: literal signs and heads line up.
        for (a, b) in clause.literals.iter().zip(copy.literals.iter()) {
            assert_eq!(a.is_negative(), b.is_negative());
            assert_eq!(a.atom.func(), b.atom.func());
        }
    }

    #[test]
    fn test_predicate_abstraction() {
        let clause = Clause::parse("cnf(pa, axiom, p(X)|~q(Y)|q(a)).");
        assert_eq!(
            clause.predicate_abstraction(),
            vec![
                (false, "q".to_string()),
                (true, "p".to_string()),
                (true, "q".to_string())
            ]
        );
    }

    #[test]
    fn test_display() {
        let clause = Clause::parse("cnf(c, axiom, p(a)|~q(X)).");
        assert_eq!(clause.to_string(), "cnf(c,axiom,p(a)|~q(X)).");
        let empty = Clause::parse("cnf(e, axiom, $false).");
        assert_eq!(empty.to_string(), "cnf(e,axiom,$false).");
    }
}
