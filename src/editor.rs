// accepts a batch of (cell-id, expression-text) edits and drives the
// table through parse/stage/recalc, reporting one outcome per cell:
// stage every entry, then recalculate once.

use std::collections::BTreeMap;

use crate::address::parse_cell_id;
use crate::numeric::Numeric;
use crate::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome<N> {
    Ok(N),
    ParseError(String),
    EvalError(String),
    Cleared,
}

/// apply one edit batch under a single critical section: decode every
/// `cell-id`, stage every parseable entry, then recalc once. A staging
/// failure is recorded on its own cell and does not block the rest of the
/// batch; a recalc failure reverts the whole table and is reported against
/// every cell this batch touched.
pub fn apply_edit_batch<N: Numeric>(
    table: &mut Table<N>,
    edits: &BTreeMap<String, String>,
) -> BTreeMap<String, EditOutcome<N>> {
    let max_column = table.max_column();
    let max_row = table.max_row();

    let mut staged: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut outcomes: BTreeMap<String, EditOutcome<N>> = BTreeMap::new();

    for (id, text) in edits {
        let (column, row) = match parse_cell_id(id, max_column, max_row) {
            Ok(addr) => addr,
            Err(e) => {
                outcomes.insert(id.clone(), EditOutcome::ParseError(e.to_string()));
                continue;
            }
        };

        match table.stage_edit(column, row, text) {
            Ok(()) => {
                if Table::<N>::normalize(text).is_empty() {
                    outcomes.insert(id.clone(), EditOutcome::Cleared);
                } else {
                    staged.insert(id.clone(), (column, row));
                }
            }
            Err(e) => {
                outcomes.insert(id.clone(), EditOutcome::ParseError(e.to_string()));
            }
        }
    }

    log::debug!("staged {} of {} edits, recalculating", staged.len(), edits.len());

    match table.recalc() {
        Ok(()) => {
            for (id, (column, row)) in &staged {
                let value = table.cell_at(*column, *row).value;
                outcomes.insert(id.clone(), EditOutcome::Ok(value));
            }
        }
        Err(e) => {
            let message = e.to_string();
            for id in staged.keys() {
                outcomes
                    .insert(id.clone(), EditOutcome::EvalError(message.clone()));
            }
        }
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reports_ok_for_a_clean_batch() {
        let mut t: Table<i64> = Table::new(10, 10);
        let outcomes = apply_edit_batch(&mut t, &batch(&[("A0", "1 + 2")]));
        assert_eq!(outcomes["A0"], EditOutcome::Ok(3));
    }

    #[test]
    fn reports_parse_error_without_blocking_other_cells() {
        let mut t: Table<i64> = Table::new(10, 10);
        let outcomes =
            apply_edit_batch(&mut t, &batch(&[("A0", "1 +"), ("B0", "2 + 2")]));
        assert!(matches!(outcomes["A0"], EditOutcome::ParseError(_)));
        assert_eq!(outcomes["B0"], EditOutcome::Ok(4));
    }

    #[test]
    fn reports_cleared_for_empty_text() {
        let mut t: Table<i64> = Table::new(10, 10);
        apply_edit_batch(&mut t, &batch(&[("A0", "1")]));
        let outcomes = apply_edit_batch(&mut t, &batch(&[("A0", "")]));
        assert_eq!(outcomes["A0"], EditOutcome::Cleared);
    }

    #[test]
    fn eval_error_reverts_and_is_reported() {
        let mut t: Table<i64> = Table::new(10, 10);
        apply_edit_batch(&mut t, &batch(&[("A0", "5"), ("B0", "A0 * 3")]));
        let outcomes = apply_edit_batch(&mut t, &batch(&[("A0", "A0")]));
        assert!(matches!(outcomes["A0"], EditOutcome::EvalError(_)));
        assert_eq!(t.cell_at(0, 0).value, 5);
        assert_eq!(t.cell_at(1, 0).value, 15);
    }
}
