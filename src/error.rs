// per-component diagnostics, hand-written rather than derived

use std::fmt;

use crate::address::AddressError;
use crate::numeric::NumericError;

#[derive(Debug, PartialEq, Clone)]
pub enum ParseError {
    /// literal text is not representable in the table's numeric type
    NumberParse(String, NumericError),
    /// an identifier is neither a reserved variable nor a valid cell address
    BadAddress(AddressError),
    UnmatchedParen { at: usize },
    EmptyParens { at: usize },
    UnexpectedRightParen { at: usize },
    /// an operator other than unary `-` opened the expression
    LeadingOperator { at: usize },
    /// the right-hand side of a binary operator did not reduce to one node
    MissingRightOperand { at: usize },
    /// malformed factorial: `!` with nothing on the stack
    MalformedFactorial { at: usize },
    /// more than one expression remained on the stack at end of input
    DanglingStack,
    /// the stack was empty at end of input
    NoExpression,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NumberParse(text, e) => {
                write!(f, "invalid number '{text}': {e}")
            }
            ParseError::BadAddress(e) => write!(f, "{e}"),
            ParseError::UnmatchedParen { at } => {
                write!(f, "unmatched '(' at offset {at}")
            }
            ParseError::EmptyParens { at } => {
                write!(f, "empty parentheses at offset {at}")
            }
            ParseError::UnexpectedRightParen { at } => {
                write!(f, "unexpected ')' at offset {at}")
            }
            ParseError::LeadingOperator { at } => {
                write!(f, "operator at offset {at} is missing a left operand")
            }
            ParseError::MissingRightOperand { at } => write!(
                f,
                "operator at offset {at} is missing its right operand"
            ),
            ParseError::MalformedFactorial { at } => {
                write!(f, "'!' at offset {at} has nothing to apply to")
            }
            ParseError::DanglingStack => {
                write!(f, "more than one expression remained unparsed")
            }
            ParseError::NoExpression => write!(f, "no expression was parsed"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::NumberParse(_, e) => Some(e),
            ParseError::BadAddress(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AddressError> for ParseError {
    fn from(e: AddressError) -> Self {
        ParseError::BadAddress(e)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum EvalError {
    DivisionByZero,
    FactorialTooLarge,
    /// cell reappeared on the same evaluation path
    Cycle(String),
    UnknownVariable(String),
    Numeric(NumericError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::FactorialTooLarge => {
                write!(f, "factorial argument too large (n > 20)")
            }
            EvalError::Cycle(label) => {
                write!(f, "recursive reference to {label}")
            }
            EvalError::UnknownVariable(name) => {
                write!(f, "unknown variable {name}")
            }
            EvalError::Numeric(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Numeric(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NumericError> for EvalError {
    fn from(e: NumericError) -> Self {
        match e {
            NumericError::DivisionByZero => EvalError::DivisionByZero,
            other => EvalError::Numeric(other),
        }
    }
}

#[derive(Debug)]
pub enum CodecError {
    /// malformed JSON or missing fields
    Schema(serde_json::Error),
    Cell { id: String, source: Box<CellImportError> },
}

#[derive(Debug)]
pub enum CellImportError {
    Address(AddressError),
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for CellImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellImportError::Address(e) => write!(f, "{e}"),
            CellImportError::Parse(e) => write!(f, "{e}"),
            CellImportError::Eval(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CellImportError {}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Schema(e) => write!(f, "malformed table JSON: {e}"),
            CodecError::Cell { id, source } => {
                write!(f, "cell {id} failed to import: {source}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Schema(e) => Some(e),
            CodecError::Cell { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Schema(e)
    }
}
