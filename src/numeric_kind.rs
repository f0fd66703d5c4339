// runtime selection of the concrete scalar type `N`: one variant per
// concrete implementer, matched on at every call site instead of boxing
// a trait object.

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;

use crate::editor::{EditOutcome, apply_edit_batch};
use crate::error::CodecError;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NumericKind {
    #[value(name = "int")]
    Int,
    #[value(name = "int8")]
    Int8,
    #[value(name = "int16")]
    Int16,
    #[value(name = "int32")]
    Int32,
    #[value(name = "int64")]
    Int64,
    #[value(name = "uint")]
    Uint,
    #[value(name = "uint8")]
    Uint8,
    #[value(name = "uint16")]
    Uint16,
    #[value(name = "uint32")]
    Uint32,
    #[value(name = "uint64")]
    Uint64,
    #[value(name = "float32")]
    Float32,
    #[value(name = "float64")]
    Float64,
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NumericKind::Int => "int",
            NumericKind::Int8 => "int8",
            NumericKind::Int16 => "int16",
            NumericKind::Int32 => "int32",
            NumericKind::Int64 => "int64",
            NumericKind::Uint => "uint",
            NumericKind::Uint8 => "uint8",
            NumericKind::Uint16 => "uint16",
            NumericKind::Uint32 => "uint32",
            NumericKind::Uint64 => "uint64",
            NumericKind::Float32 => "float32",
            NumericKind::Float64 => "float64",
        };
        write!(f, "{s}")
    }
}

macro_rules! dyn_table {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        /// a `Table<N>` for whichever `N` was picked at construction time.
        pub enum DynTable {
            $($variant(Table<$ty>)),+
        }

        impl DynTable {
            pub fn new(kind: NumericKind, columns: usize, rows: usize) -> Self {
                match kind {
                    $(NumericKind::$variant => {
                        DynTable::$variant(Table::new(columns, rows))
                    }),+
                }
            }

            pub fn from_json(kind: NumericKind, json: &str) -> Result<Self, CodecError> {
                Ok(match kind {
                    $(NumericKind::$variant => {
                        DynTable::$variant(Table::<$ty>::from_json(json)?)
                    }),+
                })
            }

            pub fn to_json(&self) -> Result<String, CodecError> {
                match self {
                    $(DynTable::$variant(t) => t.to_json()),+
                }
            }

            pub fn apply_edit_batch(
                &mut self,
                edits: &BTreeMap<String, String>,
            ) -> BTreeMap<String, String> {
                match self {
                    $(DynTable::$variant(t) => {
                        apply_edit_batch(t, edits)
                            .into_iter()
                            .map(|(id, outcome)| (id, describe(outcome)))
                            .collect()
                    }),+
                }
            }
        }
    };
}

fn describe<N: fmt::Display>(outcome: EditOutcome<N>) -> String {
    match outcome {
        EditOutcome::Ok(v) => v.to_string(),
        EditOutcome::ParseError(msg) => format!("parse error: {msg}"),
        EditOutcome::EvalError(msg) => format!("eval error: {msg}"),
        EditOutcome::Cleared => "cleared".to_string(),
    }
}

dyn_table! {
    Int => i64,
    Int8 => i8,
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    Uint => u64,
    Uint8 => u8,
    Uint16 => u16,
    Uint32 => u32,
    Uint64 => u64,
    Float32 => f32,
    Float64 => f64,
}
