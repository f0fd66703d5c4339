// serialises and restores a table as a compact JSON document: column and
// row counts plus one entry per cell that carries a committed expression.

use serde::{Deserialize, Serialize};

use crate::address::{column_label, parse_cell_id};
use crate::error::{CellImportError, CodecError};
use crate::numeric::Numeric;
use crate::parser::parse;
use crate::table::Table;
use crate::token::tokenize;

#[derive(Serialize, Deserialize)]
struct EncodedCell {
    id: String,
    ex: String,
}

#[derive(Serialize, Deserialize)]
struct EncodedTable {
    columns: usize,
    rows: usize,
    cells: Vec<EncodedCell>,
}

impl<N: Numeric> Table<N> {
    /// only cells with a committed expression are emitted; `ex` is the
    /// canonical pretty-printed form, never the raw input text.
    pub fn to_json(&self) -> Result<String, CodecError> {
        let encoded = EncodedTable {
            columns: self.columns(),
            rows: self.rows(),
            cells: self
                .committed_cells()
                .map(|cell| EncodedCell {
                    id: format!("{}{}", column_label(cell.column), cell.row),
                    ex: cell
                        .saved_expression
                        .as_ref()
                        .expect("committed_cells filters on saved_expression")
                        .to_string(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&encoded)?)
    }

    /// replace the table wholesale: parse the outer shape, decode and
    /// parse every cell under the new table's bounds, then run one
    /// `recalc`. Any failure aborts the import with no partial state
    /// visible to the caller (the old table, if any, is simply dropped by
    /// never having been touched).
    pub fn from_json(input: &str) -> Result<Table<N>, CodecError> {
        let encoded: EncodedTable = serde_json::from_str(input)?;
        let mut table = Table::new(encoded.columns, encoded.rows);
        let max_column = table.max_column();
        let max_row = table.max_row();

        for encoded_cell in encoded.cells {
            let (column, row) = parse_cell_id(&encoded_cell.id, max_column, max_row)
                .map_err(|e| CodecError::Cell {
                    id: encoded_cell.id.clone(),
                    source: Box::new(CellImportError::Address(e)),
                })?;
            let tokens = tokenize(&encoded_cell.ex);
            let expr = parse::<N>(&tokens, max_column, max_row).map_err(|e| {
                CodecError::Cell {
                    id: encoded_cell.id.clone(),
                    source: Box::new(CellImportError::Parse(e)),
                }
            })?;
            table.import_cell(column, row, expr);
        }

        table.recalc().map_err(|e| CodecError::Cell {
            id: "<recalc>".to_string(),
            source: Box::new(CellImportError::Eval(e)),
        })?;

        log::info!(
            "imported table {}x{} with {} cells",
            table.columns(),
            table.rows(),
            table.cells().len()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "1 + 2").unwrap();
        t.stage_edit(1, 3, "A0 * 3").unwrap();
        t.recalc().unwrap();

        let json = t.to_json().unwrap();
        assert!(json.contains("\"id\":\"A0\""));
        assert!(json.contains("\"ex\":\"1 + 2\""));

        let restored: Table<i64> = Table::from_json(&json).unwrap();
        assert_eq!(restored.cell_at(0, 0).value, 3);
        assert_eq!(restored.cell_at(1, 3).value, 9);
    }

    #[test]
    fn uncommitted_cells_are_not_emitted() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "bogus(").unwrap_err();
        let json = t.to_json().unwrap();
        assert!(!json.contains("bogus"));
    }

    #[test]
    fn malformed_json_is_a_schema_error() {
        let err = Table::<i64>::from_json("{not json}").unwrap_err();
        assert!(matches!(err, CodecError::Schema(_)));
    }
}
