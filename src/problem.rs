use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::clause::{Clause, ClauseType};
use crate::clauseset::ClauseSet;
use crate::eqaxioms::{generate_compat_axioms, generate_equiv_axioms};
use crate::error::{Error, Result};
use crate::formula::{negate_conjecture, FormulaType, WFormula};
use crate::lexer::{Lexer, TokenKind};
use crate::normalizer::wformula_clausify;
use crate::signature::Signature;

// Open an input file following the TPTP conventions: resolve the name
// relative to refdir first, then relative to the TPTP environment
// variable. Returns the file contents, its display name, and the new
// reference directory for nested includes.
fn tptp_source(name: &str, refdir: Option<&Path>) -> Result<(String, String, PathBuf)> {
    let mut candidates = vec![];
    match refdir {
        Some(refdir) => candidates.push(refdir.join(name)),
        None => candidates.push(PathBuf::from(name)),
    }
    if let Ok(tptp) = std::env::var("TPTP") {
        candidates.push(Path::new(&tptp).join(name));
    }

    for path in &candidates {
        if let Ok(text) = fs::read_to_string(path) {
            let display = path.display().to_string();
            let new_refdir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            return Ok((text, display, new_refdir));
        }
    }
    Err(Error::io(name, "file not found"))
}

/// A mixed set of clauses and formulas as read from the input, with
/// support for clausifying the formulas.
#[derive(Debug, Default)]
pub struct Problem {
    pub clauses: Vec<Rc<Clause>>,
    pub formulas: Vec<Rc<WFormula>>,

    /// Whether any part of the problem came in as a full formula.
    pub is_fof: bool,

    /// Whether the problem contains a conjecture (negated or not).
    /// Determines how the SZS status of a result is worded.
    pub has_conj: bool,
}

impl Problem {
    pub fn new() -> Problem {
        Problem::default()
    }

    pub fn add_clause(&mut self, clause: Rc<Clause>) {
        if clause.ctype == ClauseType::NegatedConjecture {
            self.has_conj = true;
        }
        self.clauses.push(clause);
    }

    pub fn add_formula(&mut self, formula: Rc<WFormula>) {
        if matches!(
            formula.ftype,
            FormulaType::Conjecture | FormulaType::NegatedConjecture
        ) {
            self.has_conj = true;
        }
        self.is_fof = true;
        self.formulas.push(formula);
    }

    /// Parse a problem file, following include directives.
    pub fn parse_file(&mut self, name: &str, refdir: Option<&Path>) -> Result<()> {
        let (text, display, new_refdir) = tptp_source(name, refdir)?;
        let mut lexer = Lexer::with_name(&text, &display);
        self.parse_lexer(&mut lexer, Some(&new_refdir))
    }

    /// Parse a mixed cnf/fof/include specification off a lexer.
    pub fn parse_lexer(&mut self, lexer: &mut Lexer, refdir: Option<&Path>) -> Result<()> {
        while !lexer.test_tok(TokenKind::Eof)? {
            lexer.check_lit_in(&["cnf", "fof", "include"])?;
            if lexer.test_lit("cnf")? {
                let clause = Clause::parse_from(lexer)?;
                self.add_clause(Rc::new(clause));
            } else if lexer.test_lit("fof")? {
                let formula = WFormula::parse_from(lexer)?;
                self.add_formula(Rc::new(formula));
            } else {
                lexer.accept_lit("include")?;
                lexer.accept_tok(TokenKind::OpenPar)?;
                let quoted = lexer.accept_tok(TokenKind::SQString)?.literal;
                lexer.accept_tok(TokenKind::ClosePar)?;
                lexer.accept_tok(TokenKind::FullStop)?;
                let name = quoted.trim_matches('\'');
                self.parse_file(name, refdir)?;
            }
        }
        Ok(())
    }

    /// Collect the full signature of the problem.
    pub fn collect_sig(&self) -> Signature {
        let mut sig = Signature::new();
        for clause in &self.clauses {
            clause.collect_sig(&mut sig);
        }
        for formula in &self.formulas {
            formula.collect_sig(&mut sig);
        }
        sig
    }

    /// Add equality axioms if equality occurs anywhere in the problem.
    /// Returns true if they were added.
    pub fn add_eq_axioms(&mut self) -> bool {
        let sig = self.collect_sig();
        if sig.is_pred("=") {
            let mut res = generate_equiv_axioms();
            res.extend(generate_compat_axioms(&sig));
            self.clauses.extend(res);
            return true;
        }
        false
    }

    /// Convert all formulas into clauses (negating conjectures on the
    /// way) and return the resulting set of all clauses.
    pub fn clausify(&mut self) -> ClauseSet {
        while let Some(formula) = self.formulas.pop() {
            let formula = negate_conjecture(formula);
            for clause in wformula_clausify(formula) {
                self.clauses.push(Rc::new(clause));
            }
        }
        let mut res = ClauseSet::new();
        for clause in &self.clauses {
            res.add_clause(clause.clone());
        }
        res
    }
}
