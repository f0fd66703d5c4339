// holds cells, drives transactional recalculation, exposes lookup.
// Cells live in an insertion-order `Vec`, appending on first write to an
// address and never reordering after that.

use std::collections::HashSet;

use crate::ast::Expr;
use crate::cell::Cell;
use crate::error::{EvalError, ParseError};
use crate::eval;
use crate::numeric::Numeric;
use crate::parser::parse;
use crate::token::tokenize;

pub struct Table<N: Numeric> {
    columns: usize,
    rows: usize,
    cells: Vec<Cell<N>>,
}

impl<N: Numeric> Table<N> {
    pub fn new(columns: usize, rows: usize) -> Self {
        Table {
            columns,
            rows,
            cells: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn max_column(&self) -> usize {
        self.columns.saturating_sub(1)
    }

    pub fn max_row(&self) -> usize {
        self.rows.saturating_sub(1)
    }

    fn find(&self, column: usize, row: usize) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| c.column == column && c.row == row)
    }

    /// cells currently holding a committed expression, in stored order —
    /// used by the JSON codec, which only ever emits these.
    pub fn committed_cells(&self) -> impl Iterator<Item = &Cell<N>> {
        self.cells.iter().filter(|c| c.saved_expression.is_some())
    }

    pub fn cells(&self) -> &[Cell<N>] {
        &self.cells
    }

    /// read a cell, synthesising an empty zero-valued one if none is
    /// stored at this address.
    pub fn cell_at(&self, column: usize, row: usize) -> Cell<N> {
        match self.find(column, row) {
            Some(i) => self.cells[i].clone(),
            None => Cell::new(column, row),
        }
    }

    /// the expression currently staged at `(column, row)`, or `None` if no
    /// cell is stored there or its expression was cleared — both read as
    /// `zero(N)` by the evaluator.
    pub fn expression_at(&self, column: usize, row: usize) -> Option<&Expr<N>> {
        self.find(column, row)
            .and_then(|i| self.cells[i].expression.as_ref())
    }

    fn cell_mut_or_insert(&mut self, column: usize, row: usize) -> usize {
        match self.find(column, row) {
            Some(i) => i,
            None => {
                self.cells.push(Cell::new(column, row));
                self.cells.len() - 1
            }
        }
    }

    /// the only textual canonicalisation step applied to staged input.
    pub fn normalize(text: &str) -> String {
        text.trim().to_uppercase()
    }

    /// stage one `(cell-id text)` edit: look up or append the cell record,
    /// set `input`, clear `error`, and either clear the expression (empty
    /// text) or parse and stage a new one. A parse failure is recorded on
    /// the cell and does not propagate — only `recalc` aborts the batch.
    pub fn stage_edit(
        &mut self,
        column: usize,
        row: usize,
        text: &str,
    ) -> Result<(), ParseError> {
        let normalized = Self::normalize(text);
        let max_column = self.max_column();
        let max_row = self.max_row();
        let i = self.cell_mut_or_insert(column, row);

        self.cells[i].input = normalized.clone();
        self.cells[i].error = None;

        if normalized.is_empty() {
            self.cells[i].expression = None;
            return Ok(());
        }

        let tokens = tokenize(&normalized);
        match parse::<N>(&tokens, max_column, max_row) {
            Ok(expr) => {
                self.cells[i].input = expr.to_string();
                self.cells[i].expression = Some(expr);
                Ok(())
            }
            Err(e) => {
                self.cells[i].error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// insert a cell carrying both `expression` and `saved_expression`
    /// already set, as the JSON codec does on import: values are left at
    /// zero until the subsequent `recalc`.
    pub(crate) fn import_cell(&mut self, column: usize, row: usize, expr: Expr<N>) {
        let i = self.cell_mut_or_insert(column, row);
        self.cells[i].expression = Some(expr.clone());
        self.cells[i].saved_expression = Some(expr);
    }

    /// evaluate every stored cell's staged expression in stored order.
    /// On the first evaluation error, record it on the offending cell,
    /// revert the whole table, and return the error; on full success,
    /// commit.
    pub fn recalc(&mut self) -> Result<(), EvalError> {
        for i in 0..self.cells.len() {
            let addr = (self.cells[i].column, self.cells[i].row);
            let mut visited: HashSet<(usize, usize)> = HashSet::new();
            match eval::evaluate_cell(self, addr, &mut visited) {
                Ok(value) => {
                    self.cells[i].value = value;
                    self.cells[i].error = None;
                }
                Err(e) => {
                    self.cells[i].error = Some(e.to_string());
                    log::warn!(
                        "recalc failed at {}{}: {e}",
                        crate::address::column_label(addr.0),
                        addr.1
                    );
                    self.revert();
                    return Err(e);
                }
            }
        }
        self.commit();
        log::debug!("recalc committed {} cells", self.cells.len());
        Ok(())
    }

    pub fn commit(&mut self) {
        for cell in &mut self.cells {
            cell.commit();
        }
    }

    pub fn revert(&mut self) {
        for cell in &mut self.cells {
            cell.revert();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_arithmetic_scenarios() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "1 + 2").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 3);

        t.stage_edit(0, 0, "1 + 2 * 3").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 7);

        t.stage_edit(0, 0, "1 * 2 + 3").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 5);

        t.stage_edit(0, 0, "(1 + 2) * (3 + 4)").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 21);

        t.stage_edit(0, 0, "100 - 6 / 3").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 98);

        t.stage_edit(0, 0, "1 - 3!").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, -5);
    }

    #[test]
    fn whitespace_is_canonicalised_on_input() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "8/2").unwrap();
        t.stage_edit(1, 0, " 8/2 ").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 4);
        assert_eq!(t.cell_at(1, 0).value, 4);
        assert_eq!(t.cell_at(0, 0).input, "8 / 2");
    }

    #[test]
    fn cycle_rejects_the_batch_and_keeps_prior_state() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "5").unwrap();
        t.recalc().unwrap();
        t.stage_edit(1, 0, "A0 * 3").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(1, 0).value, 15);

        t.stage_edit(0, 0, "A0").unwrap();
        let err = t.recalc().unwrap_err();
        assert!(matches!(err, EvalError::Cycle(_)));
        assert_eq!(t.cell_at(0, 0).value, 5);
        assert_eq!(t.cell_at(1, 0).value, 15);
    }

    #[test]
    fn missing_cell_reads_as_zero() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "J9").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 0);
    }

    #[test]
    fn clearing_then_setting_a_cell() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 0);
        assert!(t.cell_at(0, 0).expression.is_none());

        t.stage_edit(0, 0, "1+2").unwrap();
        t.recalc().unwrap();
        assert_eq!(t.cell_at(0, 0).value, 3);
    }

    #[test]
    fn commit_and_revert_never_leave_a_mixed_state() {
        let mut t: Table<i64> = Table::new(10, 10);
        t.stage_edit(0, 0, "1").unwrap();
        t.recalc().unwrap();
        t.stage_edit(0, 0, "1/0").unwrap();
        let _ = t.recalc();
        let cell = t.cell_at(0, 0);
        assert_eq!(cell.expression, cell.saved_expression);
        assert_eq!(cell.value, cell.saved_value);
    }
}
