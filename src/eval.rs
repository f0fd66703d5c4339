// walks an expression tree in the context of a table and a current cell,
// detecting cycles with a visited-set fresh per top-level evaluation.

use std::collections::HashSet;

use crate::address::column_label;
use crate::ast::{BinaryOp, Expr, Variable};
use crate::error::EvalError;
use crate::numeric::{Numeric, NumericError};
use crate::table::Table;

pub type Address = (usize, usize);

/// evaluate the cell at `addr`, recursing through whatever it refers to.
/// `visited` accumulates every address reached on the current evaluation
/// path; a repeat is reported as a cycle. Callers start a top-level cell
/// evaluation with a fresh, empty `visited` (see `Table::recalc`) — this
/// function does not create one itself, so `CellRef` recursion shares the
/// caller's set.
pub fn evaluate_cell<N: Numeric>(
    table: &Table<N>,
    addr: Address,
    visited: &mut HashSet<Address>,
) -> Result<N, EvalError> {
    if !visited.insert(addr) {
        let (column, row) = addr;
        return Err(EvalError::Cycle(format!("{}{}", column_label(column), row)));
    }
    match table.expression_at(addr.0, addr.1) {
        Some(expr) => evaluate(table, addr, visited, expr),
        None => Ok(N::zero()),
    }
}

pub fn evaluate<N: Numeric>(
    table: &Table<N>,
    current: Address,
    visited: &mut HashSet<Address>,
    expr: &Expr<N>,
) -> Result<N, EvalError> {
    match expr {
        Expr::Number(v, _) => Ok(*v),
        Expr::CellRef(column, row) => {
            evaluate_cell(table, (*column, *row), visited)
        }
        Expr::Paren(inner) => evaluate(table, current, visited, inner),
        Expr::Variable(v) => Ok(match v {
            Variable::Row => N::from_index(current.1),
            Variable::Column => N::from_index(current.0),
            Variable::MaxRow => N::from_index(table.rows() - 1),
            Variable::MaxColumn => N::from_index(table.columns() - 1),
            Variable::MinRow | Variable::MinColumn => N::from_index(0),
        }),
        Expr::Factorial(inner) => {
            let n = evaluate(table, current, visited, inner)?;
            n.checked_factorial().map_err(|_| EvalError::FactorialTooLarge)
        }
        Expr::Binary(op, l, r) => {
            let lv = evaluate(table, current, visited, l)?;
            let rv = evaluate(table, current, visited, r)?;
            let result: Result<N, NumericError> = match op {
                BinaryOp::Add => lv.checked_add(rv),
                BinaryOp::Sub => lv.checked_sub(rv),
                BinaryOp::Mul => lv.checked_mul(rv),
                BinaryOp::Div => lv.checked_div(rv),
                BinaryOp::Pow => lv.checked_pow(rv),
            };
            Ok(result?)
        }
    }
}
