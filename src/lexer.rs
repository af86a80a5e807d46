use crate::error::{Error, ErrorKind, Result};

/// The token inventory of the TPTP-3 subset we read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    IdentUpper,
    IdentLower,
    DefFunctor,
    SQString,
    FullStop,
    OpenPar,
    ClosePar,
    OpenSquare,
    CloseSquare,
    Comma,
    Colon,
    EqualSign,
    NotEqualSign,
    Nand,
    Nor,
    Or,
    And,
    Implies,
    BImplies,
    Equiv,
    Xor,
    Universal,
    Existential,
    Negation,
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::IdentUpper => "identifier starting with a capital letter",
            TokenKind::IdentLower => "identifier starting with a lower case letter",
            TokenKind::DefFunctor => "defined symbol (starting with a $)",
            TokenKind::SQString => "string in 'single quotes'",
            TokenKind::FullStop => ". (full stop)",
            TokenKind::OpenPar => "(",
            TokenKind::ClosePar => ")",
            TokenKind::OpenSquare => "[",
            TokenKind::CloseSquare => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::EqualSign => "=",
            TokenKind::NotEqualSign => "!=",
            TokenKind::Nand => "~&",
            TokenKind::Nor => "~|",
            TokenKind::Or => "|",
            TokenKind::And => "&",
            TokenKind::Implies => "=>",
            TokenKind::BImplies => "<=",
            TokenKind::Equiv => "<=>",
            TokenKind::Xor => "<~>",
            TokenKind::Universal => "!",
            TokenKind::Existential => "?",
            TokenKind::Negation => "~",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

// The multi-character operators, tried before the single-character ones
// so that the longest match wins.
const OPERATORS: [(&str, TokenKind); 13] = [
    ("<=>", TokenKind::Equiv),
    ("<~>", TokenKind::Xor),
    ("<=", TokenKind::BImplies),
    ("=>", TokenKind::Implies),
    ("~|", TokenKind::Nor),
    ("~&", TokenKind::Nand),
    ("!=", TokenKind::NotEqualSign),
    ("=", TokenKind::EqualSign),
    ("~", TokenKind::Negation),
    ("!", TokenKind::Universal),
    ("?", TokenKind::Existential),
    ("|", TokenKind::Or),
    ("&", TokenKind::And),
];

/// Splits a TPTP-3 input into tokens, with unbounded pushback so the
/// parsers can look ahead as far as they need.
pub struct Lexer {
    chars: Vec<char>,
    lines: Vec<String>,
    name: String,
    pos: usize,
    line: usize,
    column: usize,
    pushback: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer::with_name(source, "user string")
    }

    pub fn with_name(source: &str, name: &str) -> Lexer {
        Lexer {
            chars: source.chars().collect(),
            lines: source.lines().map(|l| l.to_string()).collect(),
            name: name.to_string(),
            pos: 0,
            line: 1,
            column: 1,
            pushback: vec![],
        }
    }

    pub fn source_name(&self) -> &str {
        &self.name
    }

    fn line_text(&self, line: usize) -> &str {
        if line >= 1 && line <= self.lines.len() {
            &self.lines[line - 1]
        } else {
            ""
        }
    }

    fn advance(&mut self) {
        if self.chars[self.pos] == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    // Consume characters while the predicate holds, returning them.
    fn take_while(&mut self, pred: fn(char) -> bool) -> String {
        let mut res = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            res.push(c);
            self.advance();
        }
        res
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '%' || c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind, literal: String, line: usize, column: usize) -> Token {
        Token {
            kind,
            literal,
            line,
            column,
        }
    }

    // Scan the next token off the raw input.
    fn scan(&mut self) -> Result<Token> {
        self.skip_trivia();
        let (line, column) = (self.line, self.column);

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(self.token(TokenKind::Eof, String::new(), line, column)),
        };

        let kind = match c {
            '.' => Some(TokenKind::FullStop),
            '(' => Some(TokenKind::OpenPar),
            ')' => Some(TokenKind::ClosePar),
            '[' => Some(TokenKind::OpenSquare),
            ']' => Some(TokenKind::CloseSquare),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };
        if let Some(kind) = kind {
            self.advance();
            return Ok(self.token(kind, c.to_string(), line, column));
        }

        for (text, kind) in OPERATORS {
            if self.starts_with(text) {
                for _ in 0..text.len() {
                    self.advance();
                }
                return Ok(self.token(kind, text.to_string(), line, column));
            }
        }

        if c.is_ascii_digit() {
            let lit = self.take_while(|c| c.is_ascii_digit());
            return Ok(self.token(TokenKind::IdentLower, lit, line, column));
        }
        if c.is_ascii_lowercase() {
            let lit = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Ok(self.token(TokenKind::IdentLower, lit, line, column));
        }
        if c.is_ascii_uppercase() || c == '_' {
            let lit = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Ok(self.token(TokenKind::IdentUpper, lit, line, column));
        }
        if c == '$' {
            self.advance();
            let rest = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Ok(self.token(TokenKind::DefFunctor, format!("${}", rest), line, column));
        }
        if c == '\'' {
            self.advance();
            let body = self.take_while(|c| c != '\'');
            if self.peek() != Some('\'') {
                return Err(Error::located(
                    ErrorKind::Lexical,
                    &self.name,
                    "unterminated 'single quoted' string",
                    line,
                    column,
                    self.line_text(line),
                ));
            }
            self.advance();
            return Ok(self.token(TokenKind::SQString, format!("'{}'", body), line, column));
        }

        Err(Error::located(
            ErrorKind::Lexical,
            &self.name,
            &format!("illegal character {:?}", c),
            line,
            column,
            self.line_text(line),
        ))
    }

    /// Return the next token, consuming it.
    pub fn next(&mut self) -> Result<Token> {
        match self.pushback.pop() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    /// Return a token to the stream, enabling arbitrary look-ahead.
    pub fn push(&mut self, token: Token) {
        self.pushback.push(token);
    }

    /// Return the next token without consuming it.
    pub fn look(&mut self) -> Result<Token> {
        let token = self.next()?;
        self.push(token.clone());
        Ok(token)
    }

    /// Return the literal text of the next token.
    pub fn look_lit(&mut self) -> Result<String> {
        Ok(self.look()?.literal)
    }

    pub fn test_tok(&mut self, kind: TokenKind) -> Result<bool> {
        Ok(self.look()?.kind == kind)
    }

    pub fn test_tok_in(&mut self, kinds: &[TokenKind]) -> Result<bool> {
        let kind = self.look()?.kind;
        Ok(kinds.contains(&kind))
    }

    fn unexpected(&self, token: &Token, expected: &str) -> Error {
        Error::located(
            ErrorKind::UnexpectedToken,
            &self.name,
            &format!("read {:?}, expected {}", token.literal, expected),
            token.line,
            token.column,
            self.line_text(token.line),
        )
    }

    pub fn check_tok(&mut self, kind: TokenKind) -> Result<()> {
        let token = self.look()?;
        if token.kind != kind {
            return Err(self.unexpected(&token, kind.describe()));
        }
        Ok(())
    }

    pub fn check_tok_in(&mut self, kinds: &[TokenKind]) -> Result<()> {
        let token = self.look()?;
        if !kinds.contains(&token.kind) {
            let expected = kinds
                .iter()
                .map(|k| k.describe())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(self.unexpected(&token, &expected));
        }
        Ok(())
    }

    pub fn accept_tok(&mut self, kind: TokenKind) -> Result<Token> {
        self.check_tok(kind)?;
        self.next()
    }

    pub fn accept_tok_in(&mut self, kinds: &[TokenKind]) -> Result<Token> {
        self.check_tok_in(kinds)?;
        self.next()
    }

    pub fn test_lit(&mut self, lit: &str) -> Result<bool> {
        Ok(self.look_lit()? == lit)
    }

    pub fn test_lit_in(&mut self, lits: &[&str]) -> Result<bool> {
        let look = self.look_lit()?;
        Ok(lits.iter().any(|l| *l == look))
    }

    /// Like check_tok, but for identifiers in keyword position.
    pub fn check_lit_in(&mut self, lits: &[&str]) -> Result<()> {
        if !self.test_lit_in(lits)? {
            let token = self.look()?;
            return Err(Error::located(
                ErrorKind::UnexpectedIdent,
                &self.name,
                &format!("read {:?}, expected one of {:?}", token.literal, lits),
                token.line,
                token.column,
                self.line_text(token.line),
            ));
        }
        Ok(())
    }

    pub fn accept_lit(&mut self, lit: &str) -> Result<Token> {
        self.check_lit_in(&[lit])?;
        self.next()
    }
}
