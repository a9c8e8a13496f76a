use std::fmt;

/// Errors surfaced by the encoder, the DIMACS parser and the solver factory.
///
/// Solver-internal conditions (conflicts, empty clauses, inconsistent unit
/// assignments) are part of normal search control flow and are never reported
/// through this type.
#[derive(Debug)]
pub enum Error {
    /// A puzzle or CNF file is malformed (non-square grid, value out of
    /// range, bad DIMACS syntax, ...).
    InvalidInput(String),
    /// An unknown solver name was passed to the factory.
    InvalidVariant(String),
    /// An internal consistency check failed. Never fires for well-formed
    /// inputs produced by the encoder or parser.
    InternalInvariant(&'static str),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::InvalidVariant(name) => write!(
                f,
                "unknown solver variant '{}' (expected one of: base, watched, preprocessing, combined)",
                name
            ),
            Error::InternalInvariant(msg) => write!(f, "internal invariant violated: {}", msg),
            Error::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
