use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::Result;
use crate::lexer::{Lexer, TokenKind};
use crate::signature::Signature;

/// A first-order term: either a variable, or a function symbol applied
/// to a list of argument terms. Constants are applications with no
/// arguments. Equational atoms are represented as applications of the
/// distinguished predicate symbol "=".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Var(String),
    App(String, Vec<Term>),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::App(func, args) => {
                write!(f, "{}", func)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl Term {
    /// A constant (or a propositional atom).
    pub fn constant(name: &str) -> Term {
        Term::App(name.to_string(), vec![])
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn is_compound(&self) -> bool {
        !self.is_var()
    }

    /// The function symbol of a compound term.
    pub fn func(&self) -> &str {
        match self {
            Term::App(func, _) => func,
            Term::Var(_) => panic!("func() called on a variable"),
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::App(_, args) => args,
            Term::Var(_) => &[],
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::App(_, args) => args.iter().all(|a| a.is_ground()),
        }
    }

    /// Insert all variable names of the term into res.
    pub fn collect_vars(&self, res: &mut BTreeSet<String>) {
        match self {
            Term::Var(name) => {
                res.insert(name.clone());
            }
            Term::App(_, args) => {
                for arg in args {
                    arg.collect_vars(res);
                }
            }
        }
    }

    /// Insert all function symbols of the term into res.
    pub fn collect_funs(&self, res: &mut BTreeSet<String>) {
        if let Term::App(func, args) = self {
            res.insert(func.clone());
            for arg in args {
                arg.collect_funs(res);
            }
        }
    }

    /// Record all function symbols with their arities in the signature.
    pub fn collect_sig(&self, sig: &mut Signature) {
        if let Term::App(func, args) = self {
            sig.add_fun(func, args.len());
            for arg in args {
                arg.collect_sig(sig);
            }
        }
    }

    /// Symbol-count weight: fweight per function symbol occurrence,
    /// vweight per variable occurrence.
    pub fn weight(&self, fweight: i64, vweight: i64) -> i64 {
        match self {
            Term::Var(_) => vweight,
            Term::App(_, args) => {
                fweight + args.iter().map(|a| a.weight(fweight, vweight)).sum::<i64>()
            }
        }
    }

    /// The subterm at the given position, where a position is a list of
    /// 0-based argument indices. The empty position is the term itself.
    pub fn subterm(&self, pos: &[usize]) -> Option<&Term> {
        match pos.split_first() {
            None => Some(self),
            Some((&index, rest)) => self.args().get(index).and_then(|arg| arg.subterm(rest)),
        }
    }

    /// Whether sub occurs in self (a term counts as a subterm of itself).
    pub fn contains(&self, sub: &Term) -> bool {
        if self == sub {
            return true;
        }
        self.args().iter().any(|arg| arg.contains(sub))
    }

    /// Add sign to the occurrence count of every variable in the term.
    /// With +1 for one term and -1 for another, the final signs expose
    /// which side has excess occurrences of each variable.
    pub fn count_var_occurrences(&self, sign: i64, counts: &mut BTreeMap<String, i64>) {
        match self {
            Term::Var(name) => {
                *counts.entry(name.clone()).or_insert(0) += sign;
            }
            Term::App(_, args) => {
                for arg in args {
                    arg.count_var_occurrences(sign, counts);
                }
            }
        }
    }

    /// Read a term off the lexer.
    pub fn parse_from(lexer: &mut Lexer) -> Result<Term> {
        if lexer.test_tok(TokenKind::IdentUpper)? {
            let token = lexer.next()?;
            return Ok(Term::Var(token.literal));
        }
        lexer.check_tok_in(&[
            TokenKind::IdentLower,
            TokenKind::DefFunctor,
            TokenKind::SQString,
        ])?;
        let func = lexer.next()?.literal;
        let mut args = vec![];
        if lexer.test_tok(TokenKind::OpenPar)? {
            lexer.accept_tok(TokenKind::OpenPar)?;
            args.push(Term::parse_from(lexer)?);
            while lexer.test_tok(TokenKind::Comma)? {
                lexer.accept_tok(TokenKind::Comma)?;
                args.push(Term::parse_from(lexer)?);
            }
            lexer.accept_tok(TokenKind::ClosePar)?;
        }
        Ok(Term::App(func, args))
    }

    /// Parse a term from a string. Only used by tests and fixtures.
    pub fn parse(s: &str) -> Term {
        let mut lexer = Lexer::new(s);
        Term::parse_from(&mut lexer).expect("bad term fixture")
    }
}
