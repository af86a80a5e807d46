use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::lexer::{Lexer, TokenKind};
use crate::matching::match_terms;
use crate::signature::Signature;
use crate::substitution::{BtSubst, Substitution};
use crate::term::Term;

/// Parse an atom: either a conventional atom (syntactically a term
/// whose head is a predicate symbol), or an equational atom written
/// infix as t1=t2 or t1!=t2. Equational atoms are represented as
/// applications of the faux predicate symbols "=" and "!=" until the
/// literal constructor normalizes the negated form away.
pub fn parse_atom(lexer: &mut Lexer) -> Result<Term> {
    let atom = Term::parse_from(lexer)?;
    if lexer.test_tok_in(&[TokenKind::EqualSign, TokenKind::NotEqualSign])? {
        let op = lexer.next()?.literal;
        let rhs = Term::parse_from(lexer)?;
        return Ok(Term::App(op, vec![atom, rhs]));
    }
    Ok(atom)
}

/// A literal is a signed atom. Negative equational atoms are normalized
/// on creation, so the internal atom head is never "!=".
#[derive(Debug, Clone)]
pub struct Literal {
    pub atom: Term,
    pub negative: bool,

    // Whether the literal is eligible to participate in generating
    // inferences. With plain binary resolution all literals are; literal
    // selection and ordered resolution restrict the flag to a subset.
    inference_lit: bool,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_equational() {
            let op = if self.negative { "!=" } else { "=" };
            write!(f, "{}{}{}", self.atom.args()[0], op, self.atom.args()[1])
        } else if self.negative {
            write!(f, "~{}", self.atom)
        } else {
            write!(f, "{}", self.atom)
        }
    }
}

impl Literal {
    pub fn new(atom: Term, negative: bool) -> Literal {
        if atom.is_compound() && atom.func() == "!=" {
            let args = atom.args().to_vec();
            Literal {
                atom: Term::App("=".to_string(), args),
                negative: !negative,
                inference_lit: true,
            }
        } else {
            Literal {
                atom,
                negative,
                inference_lit: true,
            }
        }
    }

    pub fn positive(atom: Term) -> Literal {
        Literal::new(atom, false)
    }

    pub fn negated(atom: Term) -> Literal {
        Literal::new(atom, true)
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_positive(&self) -> bool {
        !self.negative
    }

    pub fn is_equational(&self) -> bool {
        self.atom.is_compound() && self.atom.func() == "="
    }

    /// True iff the literal has the form X=Y for variables X, Y.
    pub fn is_pure_var_lit(&self) -> bool {
        self.is_equational() && self.atom.args().iter().all(|arg| arg.is_var())
    }

    pub fn is_inference_lit(&self) -> bool {
        self.inference_lit
    }

    pub fn set_inference_lit(&mut self, inference_lit: bool) {
        self.inference_lit = inference_lit;
    }

    /// True if the literal is $true or ~$false.
    pub fn is_prop_true(&self) -> bool {
        match self.atom {
            Term::App(ref func, ref args) if args.is_empty() => {
                (self.negative && func == "$false") || (!self.negative && func == "$true")
            }
            _ => false,
        }
    }

    /// True if the literal is $false or ~$true.
    pub fn is_prop_false(&self) -> bool {
        match self.atom {
            Term::App(ref func, ref args) if args.is_empty() => {
                (self.negative && func == "$true") || (!self.negative && func == "$false")
            }
            _ => false,
        }
    }

    /// Structural equality of sign and atom. The inference-literal flag
    /// deliberately does not participate.
    pub fn is_equal(&self, other: &Literal) -> bool {
        self.negative == other.negative && self.atom == other.atom
    }

    /// Same atom, opposite sign.
    pub fn is_opposite(&self, other: &Literal) -> bool {
        self.negative != other.negative && self.atom == other.atom
    }

    /// The negation of the literal, with the propositional constants
    /// flipped to their duals.
    pub fn negate(&self) -> Literal {
        if self.is_prop_true() {
            Literal::new(Term::constant("$false"), false)
        } else if self.is_prop_false() {
            Literal::new(Term::constant("$true"), false)
        } else {
            Literal::new(self.atom.clone(), !self.negative)
        }
    }

    pub fn collect_vars(&self, res: &mut BTreeSet<String>) {
        self.atom.collect_vars(res);
    }

    pub fn collect_funs(&self, res: &mut BTreeSet<String>) {
        self.atom.collect_funs(res);
    }

    /// The atom head is recorded as a predicate symbol, everything
    /// below it as function symbols.
    pub fn collect_sig(&self, sig: &mut Signature) {
        sig.add_pred(self.atom.func(), self.atom.args().len());
        for arg in self.atom.args() {
            arg.collect_sig(sig);
        }
    }

    pub fn weight(&self, fweight: i64, vweight: i64) -> i64 {
        self.atom.weight(fweight, vweight)
    }

    /// A copy instantiated with the substitution. The copy starts out
    /// as an inference literal, like any freshly built literal.
    pub fn instantiate(&self, subst: &Substitution) -> Literal {
        Literal::new(subst.apply(&self.atom), self.negative)
    }

    /// Try to extend subst into a match of self onto other. Polarities
    /// must agree; on failure subst is unchanged.
    pub fn match_lit(&self, other: &Literal, subst: &mut BtSubst) -> bool {
        if self.negative != other.negative {
            return false;
        }
        match_terms(&self.atom, &other.atom, subst)
    }

    /// The (polarity, predicate symbol) pair used by the subsumption
    /// index to quickly reject impossible matches.
    pub fn predicate_abstraction(&self) -> (bool, String) {
        (self.is_positive(), self.atom.func().to_string())
    }

    /// Parse a literal: an optional negation sign followed by an atom.
    pub fn parse_from(lexer: &mut Lexer) -> Result<Literal> {
        if lexer.test_tok(TokenKind::Negation)? {
            lexer.accept_tok(TokenKind::Negation)?;
            Ok(Literal::new(parse_atom(lexer)?, true))
        } else {
            Ok(Literal::new(parse_atom(lexer)?, false))
        }
    }

    /// Parse a literal from a string. Only used by tests and fixtures.
    pub fn parse(s: &str) -> Literal {
        let mut lexer = Lexer::new(s);
        Literal::parse_from(&mut lexer).expect("bad literal fixture")
    }
}

/// Parse a "|"-separated list of literals.
pub fn parse_literal_list(lexer: &mut Lexer) -> Result<Vec<Literal>> {
    let mut res = vec![Literal::parse_from(lexer)?];
    while lexer.test_tok(TokenKind::Or)? {
        lexer.accept_tok(TokenKind::Or)?;
        res.push(Literal::parse_from(lexer)?);
    }
    Ok(res)
}

/// True if some literal in the list is structurally equal to lit.
pub fn lit_in_lit_list(lit: &Literal, list: &[Literal]) -> bool {
    list.iter().any(|l| l.is_equal(lit))
}

/// True if some literal in the list has the same atom as lit, but the
/// opposite sign.
pub fn opposite_in_lit_list(lit: &Literal, list: &[Literal]) -> bool {
    list.iter().any(|l| l.is_opposite(lit))
}
