use std::fmt;

/// The kinds of failure the input pipeline can report.
/// Failures inside the saturation loop itself do not exist: a refused
/// inference (non-unifiable atoms, equal polarities) is an ordinary
/// control outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An illegal character in the input.
    Lexical,

    /// The token stream does not match the grammar.
    UnexpectedToken,

    /// An identifier in keyword position is not one of the accepted ones.
    UnexpectedIdent,

    /// A file could not be read, including failed include resolution.
    Io,
}

// Errors carry enough location information to point at the offending
// spot in the input, like a compiler would.
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    message: String,

    // The name of the input (usually a file name).
    source_name: String,

    // 1-based position of the error, when known.
    location: Option<(usize, usize)>,

    // The full text of the offending line, for the caret display.
    line_text: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, source_name: &str, message: &str) -> Self {
        Error {
            kind,
            message: message.to_string(),
            source_name: source_name.to_string(),
            location: None,
            line_text: None,
        }
    }

    pub fn located(
        kind: ErrorKind,
        source_name: &str,
        message: &str,
        line: usize,
        column: usize,
        line_text: &str,
    ) -> Self {
        Error {
            kind,
            message: message.to_string(),
            source_name: source_name.to_string(),
            location: Some((line, column)),
            line_text: Some(line_text.to_string()),
        }
    }

    pub fn io(source_name: &str, message: &str) -> Self {
        Error::new(ErrorKind::Io, source_name, message)
    }
}

fn fmt_line_part(f: &mut fmt::Formatter, line: &str, column: usize) -> fmt::Result {
    write!(f, "{}\n", line)?;
    for _ in 1..column {
        write!(f, " ")?;
    }
    write!(f, "^")
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.location {
            Some((line, column)) => {
                write!(
                    f,
                    "{}:{}:{}: {}",
                    self.source_name, line, column, self.message
                )?;
                if let Some(text) = &self.line_text {
                    write!(f, "\n")?;
                    fmt_line_part(f, text, column)?;
                }
                Ok(())
            }
            None => write!(f, "{}: {}", self.source_name, self.message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
