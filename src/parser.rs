// left-to-right precedence climbing over an explicit working stack: a
// token is consumed, the stack is rewritten, and binary/factorial tokens
// apply an associativity-correction rotation against whatever already
// sits on top of the stack.

use crate::address::parse_cell_id;
use crate::ast::{BinaryOp, Expr, FACTORIAL_PRECEDENCE, Variable};
use crate::error::ParseError;
use crate::numeric::Numeric;
use crate::token::{Token, TokenKind};

/// parse a full token sequence into one expression tree.
pub fn parse<N: Numeric>(
    tokens: &[Token],
    max_column: usize,
    max_row: usize,
) -> Result<Expr<N>, ParseError> {
    let mut stack: Vec<Expr<N>> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let consumed = parse_nodes(&mut stack, tokens, i, max_column, max_row)?;
        i += consumed;
    }
    match stack.len() {
        0 => Err(ParseError::NoExpression),
        1 => Ok(stack.pop().expect("len checked above")),
        _ => Err(ParseError::DanglingStack),
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Caret => Some(BinaryOp::Pow),
        _ => None,
    }
}

/// consume the token at `i` (and, for `(` and binary operators, however
/// many further tokens its right-hand side needs), mutate `stack`
/// in place, and return how many tokens were consumed.
fn parse_nodes<N: Numeric>(
    stack: &mut Vec<Expr<N>>,
    tokens: &[Token],
    i: usize,
    max_column: usize,
    max_row: usize,
) -> Result<usize, ParseError> {
    if i >= tokens.len() {
        return Ok(0);
    }
    let token = &tokens[i];

    match token.kind {
        TokenKind::Number => {
            let value = N::parse_literal(&token.text)
                .map_err(|e| ParseError::NumberParse(token.text.clone(), e))?;
            stack.push(Expr::Number(value, token.text.clone()));
            Ok(1)
        }

        TokenKind::Identifier => {
            if let Some(v) = Variable::from_name(&token.text) {
                stack.push(Expr::Variable(v));
            } else {
                let (column, row) =
                    parse_cell_id(&token.text, max_column, max_row)?;
                stack.push(Expr::CellRef(column, row));
            }
            Ok(1)
        }

        TokenKind::LParen => {
            let mut total_consumed = 1;
            let mut paren_stack: Vec<Expr<N>> = Vec::new();
            let mut j = i + 1;
            loop {
                let consumed =
                    parse_nodes(&mut paren_stack, tokens, j, max_column, max_row)?;
                total_consumed += consumed;
                j += consumed;
                if j >= tokens.len() {
                    return Err(ParseError::UnmatchedParen { at: token.index });
                }
                if tokens[j].kind != TokenKind::RParen {
                    continue;
                }
                if paren_stack.is_empty() {
                    return Err(ParseError::EmptyParens { at: token.index });
                }
                let inner = paren_stack.pop().expect("checked non-empty above");
                stack.push(Expr::Paren(Box::new(inner)));
                return Ok(total_consumed + 1);
            }
        }

        TokenKind::RParen => {
            Err(ParseError::UnexpectedRightParen { at: token.index })
        }

        TokenKind::Bang => {
            let top = stack
                .pop()
                .ok_or(ParseError::MalformedFactorial { at: token.index })?;
            // factorial outranks every binary operator in the fixed
            // precedence order, so this rewrite always fires when the
            // stack top is a binary node.
            if let Expr::Binary(op, l, r) = top {
                debug_assert!(op.precedence() < FACTORIAL_PRECEDENCE);
                stack.push(Expr::Binary(op, l, Box::new(Expr::Factorial(r))));
            } else {
                stack.push(Expr::Factorial(Box::new(top)));
            }
            Ok(1)
        }

        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Caret => {
            let op = binary_op(&token.kind).expect("matched above");

            let left = if stack.is_empty() {
                if op != BinaryOp::Sub {
                    return Err(ParseError::LeadingOperator { at: token.index });
                }
                Expr::Number(N::zero(), "0".to_string())
            } else {
                stack.pop().expect("checked non-empty above")
            };

            let mut rhs_stack: Vec<Expr<N>> = Vec::new();
            let consumed =
                parse_nodes(&mut rhs_stack, tokens, i + 1, max_column, max_row)?;
            if rhs_stack.len() != 1 {
                return Err(ParseError::MissingRightOperand { at: token.index });
            }
            let right = rhs_stack.pop().expect("len checked above");

            if let Expr::Binary(left_op, left_l, left_r) = left {
                if left_op.precedence() < op.precedence() {
                    stack.push(Expr::Binary(
                        left_op,
                        left_l,
                        Box::new(Expr::Binary(op, left_r, Box::new(right))),
                    ));
                } else {
                    stack.push(Expr::Binary(
                        op,
                        Box::new(Expr::Binary(left_op, left_l, left_r)),
                        Box::new(right),
                    ));
                }
            } else {
                stack.push(Expr::Binary(op, Box::new(left), Box::new(right)));
            }
            Ok(1 + consumed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn parse_str(s: &str) -> Expr<i64> {
        parse(&tokenize(s), 25, 99).expect("should parse")
    }

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        // "1 + 2 * 3" -> Add(1, Mul(2, 3))
        let e = parse_str("1 + 2 * 3");
        let (op, l, r) = e.as_binary().unwrap();
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(l, Expr::Number(1, _)));
        let (inner_op, _, _) = r.as_binary().unwrap();
        assert_eq!(inner_op, BinaryOp::Mul);
    }

    #[test]
    fn left_associativity_is_preserved() {
        // "1 * 2 + 3" -> Add(Mul(1,2), 3), not Mul(1, Add(2,3))
        let e = parse_str("1 * 2 + 3");
        let (op, l, _) = e.as_binary().unwrap();
        assert_eq!(op, BinaryOp::Add);
        let (inner_op, _, _) = l.as_binary().unwrap();
        assert_eq!(inner_op, BinaryOp::Mul);
    }

    #[test]
    fn factorial_binds_tighter_than_subtraction() {
        // "1 - 3!" -> Sub(1, Factorial(3))
        let e = parse_str("1 - 3!");
        let (op, _, r) = e.as_binary().unwrap();
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(r.as_ref(), Expr::Factorial(_)));
    }

    #[test]
    fn leading_minus_is_unary_negation() {
        let e = parse_str("-5");
        let (op, l, r) = e.as_binary().unwrap();
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(l, Expr::Number(0, _)));
        assert!(matches!(r, Expr::Number(5, _)));
    }

    #[test]
    fn leading_plus_is_an_error() {
        let err = parse::<i64>(&tokenize("+5"), 25, 99).unwrap_err();
        assert!(matches!(err, ParseError::LeadingOperator { .. }));
    }

    #[test]
    fn unmatched_paren_is_an_error() {
        let err = parse::<i64>(&tokenize("(1 + 2"), 25, 99).unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedParen { .. }));
    }

    #[test]
    fn empty_parens_is_an_error() {
        let err = parse::<i64>(&tokenize("()"), 25, 99).unwrap_err();
        assert!(matches!(err, ParseError::EmptyParens { .. }));
    }

    #[test]
    fn stray_right_paren_is_an_error() {
        let err = parse::<i64>(&tokenize(")"), 25, 99).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRightParen { .. }));
    }

    #[test]
    fn parens_round_trip_through_display() {
        let e = parse_str("(1 + 2) * (3 + 4)");
        assert_eq!(e.to_string(), "(1 + 2) * (3 + 4)");
    }

    #[test]
    fn printed_expression_reparses_to_the_same_tree_and_value() {
        use crate::eval::evaluate;
        use std::collections::HashSet;

        let table: crate::table::Table<i64> = crate::table::Table::new(10, 10);

        for text in [
            "1 + 2 * 3",
            "(1 + 2) * 3",
            "10 - 3!",
            "2 ^ 5 + 1",
            "-5 + 2",
            "((1 + 2)) * ((3))",
        ] {
            let first = parse_str(text);
            let printed = first.to_string();
            let second = parse::<i64>(&tokenize(&printed), 25, 99)
                .expect("printed form should reparse");
            assert_eq!(first, second, "round-trip mismatch for {text:?}");

            let mut visited = HashSet::new();
            let first_value = evaluate(&table, (0, 0), &mut visited, &first).unwrap();
            let mut visited = HashSet::new();
            let second_value = evaluate(&table, (0, 0), &mut visited, &second).unwrap();
            assert_eq!(first_value, second_value);
        }
    }
}
