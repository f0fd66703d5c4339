// a single (column, row) slot: staged state plus the last committed
// "saved" shadow used for cheap rollback.

use crate::ast::Expr;
use crate::numeric::Numeric;

#[derive(Debug, Clone)]
pub struct Cell<N: Numeric> {
    pub column: usize,
    pub row: usize,

    pub expression: Option<Expr<N>>,
    pub value: N,

    pub saved_expression: Option<Expr<N>>,
    pub saved_value: N,

    /// raw text most recently supplied, so a parse failure can echo it back
    pub input: String,
    /// last diagnostic, `None` if the cell is clean
    pub error: Option<String>,
}

impl<N: Numeric> Cell<N> {
    pub fn new(column: usize, row: usize) -> Self {
        Cell {
            column,
            row,
            expression: None,
            value: N::zero(),
            saved_expression: None,
            saved_value: N::zero(),
            input: String::new(),
            error: None,
        }
    }

    pub fn commit(&mut self) {
        self.saved_expression = self.expression.clone();
        self.saved_value = self.value;
        self.error = None;
    }

    pub fn revert(&mut self) {
        self.expression = self.saved_expression.clone();
        self.value = self.saved_value;
    }

    /// the text a client should see for this cell: the canonical printed
    /// form of its expression while clean, the raw input while erroring.
    pub fn display_text(&self) -> String {
        match (&self.expression, &self.error) {
            (Some(expr), None) => expr.to_string(),
            _ => self.input.clone(),
        }
    }
}
