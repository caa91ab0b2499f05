use rowfilter_diagnostics::ParseError;
use rowfilter_expr::{Binary, BinaryOp, ColumnRef, Expression, Headers, Literal, Node, UnaryMinus};
use rowfilter_lexer::{Lexer, Token, TokenKind};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Operand,
    Operator,
}

fn is_binary_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Times
            | TokenKind::Divide
            | TokenKind::Lt
            | TokenKind::Lte
            | TokenKind::Eq
            | TokenKind::Neq
            | TokenKind::Gt
            | TokenKind::Gte
            | TokenKind::And
            | TokenKind::Or
    )
}

/// Higher binds tighter. `unary` distinguishes a `Minus` token pushed in
/// operand position (precedence 8) from binary `-` (precedence 6).
fn precedence(kind: TokenKind, unary: bool) -> u8 {
    match kind {
        TokenKind::Minus if unary => 8,
        TokenKind::Times | TokenKind::Divide => 7,
        TokenKind::Minus | TokenKind::Plus => 6,
        TokenKind::Lt | TokenKind::Lte | TokenKind::Gt | TokenKind::Gte => 5,
        TokenKind::Eq | TokenKind::Neq => 4,
        TokenKind::And => 3,
        TokenKind::Or => 2,
        TokenKind::End => 1,
        TokenKind::OpenParen => 0,
        other => unreachable!("{other:?} never sits on the operator stack"),
    }
}

fn to_binary_op(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Minus => BinaryOp::Minus,
        TokenKind::Times => BinaryOp::Times,
        TokenKind::Divide => BinaryOp::Divide,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Lte => BinaryOp::Lte,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::Neq => BinaryOp::Neq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Gte => BinaryOp::Gte,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        other => unreachable!("{other:?} is not a binary operator token"),
    }
}

/// Pops one operator and applies it: a unary operator consumes one operand,
/// a binary operator consumes two (RHS first, then LHS, off the stack).
fn apply_and_pop(operators: &mut Vec<Token>, operands: &mut Vec<Box<Expression>>) {
    let op = operators.pop().expect("apply_and_pop called with an empty operator stack");
    if op.unary {
        let operand = operands.pop().expect("unary operator with no operand");
        operands.push(Box::new(Expression::UnaryMinus(UnaryMinus::new(op.range, operand))));
    } else {
        let rhs = operands.pop().expect("binary operator missing its right operand");
        let lhs = operands.pop().expect("binary operator missing its left operand");
        operands.push(Box::new(Expression::Binary(Binary::new(to_binary_op(op.kind), op.range, lhs, rhs))));
    }
}

/// Runs the shunting-yard parse loop over an already-successful lexer,
/// producing the expression tree's root.
pub(crate) fn parse(lexer: &mut Lexer, headers: &dyn Headers) -> Result<Expression, ParseError> {
    let mut operators: Vec<Token> = Vec::new();
    let mut operands: Vec<Box<Expression>> = Vec::new();
    let mut mode = Mode::Operand;

    loop {
        let tok = lexer.pop();
        match mode {
            Mode::Operand => match tok.kind {
                TokenKind::Identifier => match headers.index_of(&tok.text) {
                    Some(index) => {
                        operands.push(Box::new(Expression::ColumnRef(ColumnRef::new(tok.range, tok.text, index))));
                        mode = Mode::Operator;
                    }
                    None => {
                        return Err(ParseError::new(format!("Identifier \"{}\" not found in headers", tok.text), tok.range));
                    }
                },
                TokenKind::Number => {
                    let value: f64 = tok.text.parse().expect("lexer only ever emits well-formed numeric text");
                    operands.push(Box::new(Expression::Literal(Literal::number(tok.range, value))));
                    mode = Mode::Operator;
                }
                TokenKind::String => {
                    operands.push(Box::new(Expression::Literal(Literal::string(tok.range, tok.text.into_bytes()))));
                    mode = Mode::Operator;
                }
                TokenKind::Minus => {
                    let mut unary_tok = tok;
                    unary_tok.unary = true;
                    operators.push(unary_tok);
                }
                TokenKind::OpenParen => {
                    operators.push(tok);
                }
                TokenKind::End => {
                    return Err(ParseError::new("Unexpected end of expression", tok.range));
                }
                _ => {
                    return Err(ParseError::new("Unexpected operator", tok.range));
                }
            },
            Mode::Operator => match tok.kind {
                TokenKind::CloseParen => {
                    loop {
                        match operators.last() {
                            Some(top) if top.kind == TokenKind::OpenParen => {
                                operators.pop();
                                break;
                            }
                            Some(_) => apply_and_pop(&mut operators, &mut operands),
                            None => {
                                return Err(ParseError::new("No matching open brace for close brace", tok.range));
                            }
                        }
                    }
                }
                TokenKind::End => {
                    loop {
                        match operators.last() {
                            Some(top) if top.kind == TokenKind::OpenParen => {
                                return Err(ParseError::new("Unmatched bracket", top.range));
                            }
                            Some(_) => apply_and_pop(&mut operators, &mut operands),
                            None => break,
                        }
                    }
                    break;
                }
                kind if is_binary_operator(kind) => {
                    let new_precedence = precedence(kind, false);
                    while let Some(top) = operators.last() {
                        if precedence(top.kind, top.unary) >= new_precedence {
                            apply_and_pop(&mut operators, &mut operands);
                        } else {
                            break;
                        }
                    }
                    operators.push(tok);
                    mode = Mode::Operand;
                }
                _ => {
                    return Err(ParseError::new("Unexpected operand", tok.range));
                }
            },
        }
    }

    debug_assert!(operators.is_empty());
    debug_assert_eq!(operands.len(), 1);
    Ok(*operands.pop().expect("successful parse leaves exactly one operand"))
}
