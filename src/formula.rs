use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::derivation::{next_derivable_id, Ancestor, Derivation};
use crate::error::Result;
use crate::lexer::{Lexer, TokenKind};
use crate::literal::Literal;
use crate::signature::Signature;

/// The binary first-order connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    And,
    Or,
    Implies,
    BImplies,
    Equiv,
    Xor,
    Nor,
    Nand,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Implies => "=>",
            BinOp::BImplies => "<=",
            BinOp::Equiv => "<=>",
            BinOp::Xor => "<~>",
            BinOp::Nor => "~|",
            BinOp::Nand => "~&",
        }
    }

    fn from_token(kind: TokenKind) -> Option<BinOp> {
        match kind {
            TokenKind::And => Some(BinOp::And),
            TokenKind::Or => Some(BinOp::Or),
            TokenKind::Implies => Some(BinOp::Implies),
            TokenKind::BImplies => Some(BinOp::BImplies),
            TokenKind::Equiv => Some(BinOp::Equiv),
            TokenKind::Xor => Some(BinOp::Xor),
            TokenKind::Nor => Some(BinOp::Nor),
            TokenKind::Nand => Some(BinOp::Nand),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Universal,
    Existential,
}

impl Quantifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quantifier::Universal => "!",
            Quantifier::Existential => "?",
        }
    }
}

/// A naked first-order formula: a literal, a negation, a binary
/// connective, or a quantified subformula (one variable per
/// quantifier).
#[derive(Debug, Clone)]
pub enum Formula {
    Lit(Literal),
    Not(Box<Formula>),
    Binary(BinOp, Box<Formula>, Box<Formula>),
    Quant(Quantifier, String, Box<Formula>),
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formula::Lit(literal) => write!(f, "{}", literal),
            Formula::Not(sub) => write!(f, "(~{})", sub),
            Formula::Binary(op, left, right) => write!(f, "({}{}{})", left, op.as_str(), right),
            Formula::Quant(quantifier, var, sub) => {
                write!(f, "({}[{}]:{})", quantifier.as_str(), var, sub)
            }
        }
    }
}

impl Formula {
    pub fn lit(literal: Literal) -> Formula {
        Formula::Lit(literal)
    }

    pub fn not(sub: Formula) -> Formula {
        Formula::Not(Box::new(sub))
    }

    pub fn binary(op: BinOp, left: Formula, right: Formula) -> Formula {
        Formula::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn quant(quantifier: Quantifier, var: &str, sub: Formula) -> Formula {
        Formula::Quant(quantifier, var.to_string(), Box::new(sub))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Formula::Lit(_))
    }

    /// True if the formula is a propositional constant of the given
    /// polarity ($true / ~$false for true, $false / ~$true for false).
    pub fn is_prop_const(&self, polarity: bool) -> bool {
        match self {
            Formula::Lit(literal) => {
                if polarity {
                    literal.is_prop_true()
                } else {
                    literal.is_prop_false()
                }
            }
            _ => false,
        }
    }

    pub fn is_quantified(&self) -> bool {
        matches!(self, Formula::Quant(..))
    }

    pub fn is_literal_disjunction(&self) -> bool {
        match self {
            Formula::Lit(_) => true,
            Formula::Binary(BinOp::Or, left, right) => {
                left.is_literal_disjunction() && right.is_literal_disjunction()
            }
            _ => false,
        }
    }

    pub fn is_clause_conjunction(&self) -> bool {
        match self {
            Formula::Lit(_) => true,
            Formula::Binary(BinOp::Or, ..) => self.is_literal_disjunction(),
            Formula::Binary(BinOp::And, left, right) => {
                left.is_clause_conjunction() && right.is_clause_conjunction()
            }
            _ => false,
        }
    }

    pub fn is_cnf(&self) -> bool {
        match self {
            Formula::Quant(Quantifier::Universal, _, sub) => sub.is_cnf(),
            _ => self.is_clause_conjunction(),
        }
    }

    /// The formula without its leading quantifiers.
    pub fn matrix(&self) -> &Formula {
        let mut f = self;
        while let Formula::Quant(_, _, sub) = f {
            f = sub;
        }
        f
    }

    /// The subformulas connected by top-level "&".
    pub fn conj_to_list(&self) -> Vec<&Formula> {
        match self {
            Formula::Binary(BinOp::And, left, right) => {
                let mut res = left.conj_to_list();
                res.extend(right.conj_to_list());
                res
            }
            _ => vec![self],
        }
    }

    /// The subformulas connected by top-level "|".
    pub fn disj_to_list(&self) -> Vec<&Formula> {
        match self {
            Formula::Binary(BinOp::Or, left, right) => {
                let mut res = left.disj_to_list();
                res.extend(right.disj_to_list());
                res
            }
            _ => vec![self],
        }
    }

    pub fn is_equal(&self, other: &Formula) -> bool {
        match (self, other) {
            (Formula::Lit(l1), Formula::Lit(l2)) => l1.is_equal(l2),
            (Formula::Not(f1), Formula::Not(f2)) => f1.is_equal(f2),
            (Formula::Binary(op1, l1, r1), Formula::Binary(op2, l2, r2)) => {
                op1 == op2 && l1.is_equal(l2) && r1.is_equal(r2)
            }
            (Formula::Quant(q1, v1, f1), Formula::Quant(q2, v2, f2)) => {
                q1 == q2 && v1 == v2 && f1.is_equal(f2)
            }
            _ => false,
        }
    }

    pub fn collect_vars(&self, res: &mut BTreeSet<String>) {
        match self {
            Formula::Lit(literal) => literal.collect_vars(res),
            Formula::Not(sub) => sub.collect_vars(res),
            Formula::Binary(_, left, right) => {
                left.collect_vars(res);
                right.collect_vars(res);
            }
            Formula::Quant(_, var, sub) => {
                res.insert(var.clone());
                sub.collect_vars(res);
            }
        }
    }

    pub fn collect_free_vars(&self) -> BTreeSet<String> {
        match self {
            Formula::Lit(literal) => {
                let mut res = BTreeSet::new();
                literal.collect_vars(&mut res);
                res
            }
            Formula::Not(sub) => sub.collect_free_vars(),
            Formula::Binary(_, left, right) => {
                let mut res = left.collect_free_vars();
                res.extend(right.collect_free_vars());
                res
            }
            Formula::Quant(_, var, sub) => {
                let mut res = sub.collect_free_vars();
                res.remove(var);
                res
            }
        }
    }

    pub fn collect_sig(&self, sig: &mut Signature) {
        match self {
            Formula::Lit(literal) => literal.collect_sig(sig),
            Formula::Not(sub) => sub.collect_sig(sig),
            Formula::Binary(_, left, right) => {
                left.collect_sig(sig);
                right.collect_sig(sig);
            }
            Formula::Quant(_, _, sub) => sub.collect_sig(sig),
        }
    }

    // Parse the remainder of a quantified formula: we are past the
    // quantifier and the opening square bracket.
    fn parse_quantified(lexer: &mut Lexer, quantifier: Quantifier) -> Result<Formula> {
        lexer.check_tok(TokenKind::IdentUpper)?;
        let var = lexer.next()?.literal;
        let rest = if lexer.test_tok(TokenKind::Comma)? {
            lexer.accept_tok(TokenKind::Comma)?;
            Formula::parse_quantified(lexer, quantifier)?
        } else {
            lexer.accept_tok(TokenKind::CloseSquare)?;
            lexer.accept_tok(TokenKind::Colon)?;
            Formula::parse_unitary(lexer)?
        };
        Ok(Formula::Quant(quantifier, var, Box::new(rest)))
    }

    // A "unitary" formula in TPTP-3 terminology: quantified,
    // parenthesized, negated, or a plain literal.
    fn parse_unitary(lexer: &mut Lexer) -> Result<Formula> {
        if lexer.test_tok_in(&[TokenKind::Universal, TokenKind::Existential])? {
            let quantifier = if lexer.test_tok(TokenKind::Universal)? {
                Quantifier::Universal
            } else {
                Quantifier::Existential
            };
            lexer.next()?;
            lexer.accept_tok(TokenKind::OpenSquare)?;
            Formula::parse_quantified(lexer, quantifier)
        } else if lexer.test_tok(TokenKind::OpenPar)? {
            lexer.accept_tok(TokenKind::OpenPar)?;
            let res = Formula::parse_from(lexer)?;
            lexer.accept_tok(TokenKind::ClosePar)?;
            Ok(res)
        } else if lexer.test_tok(TokenKind::Negation)? {
            lexer.accept_tok(TokenKind::Negation)?;
            Ok(Formula::not(Formula::parse_unitary(lexer)?))
        } else {
            Ok(Formula::Lit(Literal::parse_from(lexer)?))
        }
    }

    // The rest of an associative &/| chain starting with head.
    fn parse_assoc(lexer: &mut Lexer, kind: TokenKind, mut head: Formula) -> Result<Formula> {
        let op = BinOp::from_token(kind).unwrap();
        while lexer.test_tok(kind)? {
            lexer.accept_tok(kind)?;
            let next = Formula::parse_unitary(lexer)?;
            head = Formula::binary(op, head, next);
        }
        Ok(head)
    }

    /// Parse a (naked) formula off the lexer.
    pub fn parse_from(lexer: &mut Lexer) -> Result<Formula> {
        let res = Formula::parse_unitary(lexer)?;
        let look = lexer.look()?;
        if matches!(look.kind, TokenKind::And | TokenKind::Or) {
            return Formula::parse_assoc(lexer, look.kind, res);
        }
        if let Some(op) = BinOp::from_token(look.kind) {
            lexer.next()?;
            let rest = Formula::parse_unitary(lexer)?;
            return Ok(Formula::binary(op, res, rest));
        }
        Ok(res)
    }

    /// Parse a formula from a string. Only used by tests and fixtures.
    pub fn parse(s: &str) -> Formula {
        let mut lexer = Lexer::new(s);
        Formula::parse_from(&mut lexer).expect("bad formula fixture")
    }
}

/// The formula roles the engine distinguishes. Conjectures get negated
/// during clausification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaType {
    Axiom,
    Conjecture,
    NegatedConjecture,
    Plain,
}

impl FormulaType {
    pub fn from_name(name: &str) -> FormulaType {
        match name {
            "axiom" => FormulaType::Axiom,
            "conjecture" => FormulaType::Conjecture,
            "negated_conjecture" => FormulaType::NegatedConjecture,
            _ => FormulaType::Plain,
        }
    }
}

impl fmt::Display for FormulaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormulaType::Axiom => write!(f, "axiom"),
            FormulaType::Conjecture => write!(f, "conjecture"),
            FormulaType::NegatedConjecture => write!(f, "negated_conjecture"),
            FormulaType::Plain => write!(f, "plain"),
        }
    }
}

/// A wrapped formula: a naked formula plus name, type, and derivation.
#[derive(Debug)]
pub struct WFormula {
    pub formula: Formula,
    pub ftype: FormulaType,
    pub name: String,
    pub id: u64,
    pub derivation: Option<Derivation>,
}

impl WFormula {
    pub fn new(formula: Formula, ftype: FormulaType) -> WFormula {
        let id = next_derivable_id();
        WFormula {
            formula,
            ftype,
            name: format!("c{}", id),
            id,
            derivation: None,
        }
    }

    pub fn named(formula: Formula, ftype: FormulaType, name: &str) -> WFormula {
        WFormula {
            name: name.to_string(),
            ..WFormula::new(formula, ftype)
        }
    }

    pub fn collect_sig(&self, sig: &mut Signature) {
        self.formula.collect_sig(sig);
    }

    pub fn tptp(&self, show_derivation: bool) -> String {
        let derivation = match (&self.derivation, show_derivation) {
            (Some(derivation), true) => format!(",{}", derivation),
            _ => String::new(),
        };
        format!("fof({},{},{}{}).", self.name, self.ftype, self.formula, derivation)
    }

    /// Parse a wrapped formula:
    /// fof(<name>, <type>, <formula>).
    pub fn parse_from(lexer: &mut Lexer) -> Result<WFormula> {
        lexer.accept_lit("fof")?;
        lexer.accept_tok(TokenKind::OpenPar)?;
        let name = lexer
            .accept_tok_in(&[TokenKind::IdentLower, TokenKind::SQString])?
            .literal;
        lexer.accept_tok(TokenKind::Comma)?;
        let ftype = FormulaType::from_name(&lexer.accept_tok(TokenKind::IdentLower)?.literal);
        lexer.accept_tok(TokenKind::Comma)?;
        let formula = Formula::parse_from(lexer)?;
        lexer.accept_tok(TokenKind::ClosePar)?;
        lexer.accept_tok(TokenKind::FullStop)?;

        let mut res = WFormula::named(formula, ftype, &name);
        res.derivation = Some(Derivation::Input);
        Ok(res)
    }

    /// Parse a wrapped formula from a string. Only used by tests.
    pub fn parse(s: &str) -> WFormula {
        let mut lexer = Lexer::new(s);
        WFormula::parse_from(&mut lexer).expect("bad formula fixture")
    }
}

impl fmt::Display for WFormula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tptp(false))
    }
}

/// If wform is a conjecture, return its negation (to be refuted).
/// Everything else passes through unchanged.
pub fn negate_conjecture(wform: Rc<WFormula>) -> Rc<WFormula> {
    if wform.ftype != FormulaType::Conjecture {
        return wform;
    }
    let negated = Formula::not(wform.formula.clone());
    let mut res = WFormula::new(negated, FormulaType::NegatedConjecture);
    res.derivation = Some(Derivation::flat_with_status(
        "assume_negation",
        "status(cth)",
        &[Ancestor::Formula(wform)],
    ));
    Rc::new(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let f = Formula::parse("![X]:(a(X) => b(X))");
        assert_eq!(f.to_string(), "(![X]:(a(X)=>b(X)))");

        let f = Formula::parse("p(a)|q(b)|r(c)");
        assert_eq!(f.to_string(), "((p(a)|q(b))|r(c))");

        let f = Formula::parse("~p(a)");
        assert!(matches!(f, Formula::Not(_)));

        let f = Formula::parse("?[X,Y]:p(X,Y)");
        assert_eq!(f.to_string(), "(?[X]:(?[Y]:p(X,Y)))");
    }

    #[test]
    fn test_cnf_tests() {
        assert!(Formula::parse("p(a)|q(b)").is_literal_disjunction());
        assert!(!Formula::parse("p(a)&q(b)").is_literal_disjunction());
        assert!(Formula::parse("(p(a)|q(b))&r(c)").is_clause_conjunction());
        assert!(Formula::parse("![X]:(p(X)|q(X))").is_cnf());
        assert!(!Formula::parse("![X]:(p(X)=>q(X))").is_cnf());
        assert!(!Formula::parse("?[X]:(p(X)|q(X))").is_cnf());
    }

    #[test]
    fn test_conj_disj_lists() {
        let f = Formula::parse("(p(a)|q(b))&(r(c)&s(d))");
        assert_eq!(f.conj_to_list().len(), 3);
        let f = Formula::parse("p(a)|q(b)|r(c)");
        assert_eq!(f.disj_to_list().len(), 3);
    }

    #[test]
    fn test_free_vars() {
        let f = Formula::parse("![X]:(p(X)|q(Y))");
        let free = f.collect_free_vars();
        assert!(free.contains("Y"));
        assert!(!free.contains("X"));

        let mut all = BTreeSet::new();
        f.collect_vars(&mut all);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_is_equal() {
        let f1 = Formula::parse("![X]:(p(X)=>q(X))");
        let f2 = Formula::parse("![X]:(p(X)=>q(X))");
        let f3 = Formula::parse("![Y]:(p(Y)=>q(Y))");
        assert!(f1.is_equal(&f2));
        assert!(!f1.is_equal(&f3));
    }

    #[test]
    fn test_wformula() {
        let wf = WFormula::parse("fof(test, axiom, ![X]:(p(X)=>q(X))).");
        assert_eq!(wf.name, "test");
        assert_eq!(wf.ftype, FormulaType::Axiom);
        assert_eq!(wf.tptp(false), "fof(test,axiom,(![X]:(p(X)=>q(X)))).");
        assert_eq!(
            wf.tptp(true),
            "fof(test,axiom,(![X]:(p(X)=>q(X))),input)."
        );
    }

    #[test]
    fn test_negate_conjecture() {
        let wf = Rc::new(WFormula::parse("fof(conj, conjecture, p(a))."));
        let negated = negate_conjecture(wf);
        assert_eq!(negated.ftype, FormulaType::NegatedConjecture);
        assert!(matches!(negated.formula, Formula::Not(_)));

        let wf = Rc::new(WFormula::parse("fof(ax, axiom, p(a))."));
        let same = negate_conjecture(wf.clone());
        assert_eq!(same.id, wf.id);
    }
}
