pub mod address;
pub mod ast;
pub mod cell;
pub mod codec;
pub mod editor;
pub mod error;
pub mod eval;
pub mod numeric;
#[cfg(feature = "cli")]
pub mod numeric_kind;
pub mod parser;
pub mod table;
pub mod token;

pub use address::{AddressError, column_label, column_number, parse_cell_id};
pub use ast::{BinaryOp, Expr, Variable};
pub use cell::Cell;
pub use editor::{EditOutcome, apply_edit_batch};
pub use error::{CellImportError, CodecError, EvalError, ParseError};
pub use numeric::{Numeric, NumericError};
#[cfg(feature = "cli")]
pub use numeric_kind::{DynTable, NumericKind};
pub use table::Table;
pub use token::{Token, TokenKind, tokenize};
