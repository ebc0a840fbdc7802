//! Expression parsing.
//!
//! A Pratt precedence climber over the C99 cascade. Binding powers mirror
//! the grammar levels from comma up to postfix; binary operators are
//! left-associative, conditional and assignment right-associative. The
//! grammar restricts an assignment's left side to a unary-expression (a
//! parenthesized expression is primary and therefore passes), which the
//! climber enforces with a flag instead of a separate nonterminal.

use thin_vec::ThinVec;

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::position::HasPos;
use crate::token::{Token, TokenKind};

use super::declaration_core::{parse_initializer_list, parse_type_name};
use super::statements::parse_compound_statement;
use super::Parser;

/// Operator precedence for the Pratt climber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BindingPower(u8);

impl BindingPower {
    pub const MIN: Self = Self(0);
    pub const COMMA: Self = Self(2);
    pub const ASSIGNMENT: Self = Self(4);
    pub const CONDITIONAL: Self = Self(6);
    pub const LOGICAL_OR: Self = Self(8);
    pub const LOGICAL_AND: Self = Self(10);
    pub const BITWISE_OR: Self = Self(12);
    pub const BITWISE_XOR: Self = Self(14);
    pub const BITWISE_AND: Self = Self(16);
    pub const EQUALITY: Self = Self(18);
    pub const RELATIONAL: Self = Self(20);
    pub const SHIFT: Self = Self(22);
    pub const ADDITIVE: Self = Self(24);
    pub const MULTIPLICATIVE: Self = Self(26);
    pub const CAST: Self = Self(28);
    pub const UNARY: Self = Self(30);
    pub const POSTFIX: Self = Self(32);

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    Left,
    Right,
}

fn binding_power(kind: TokenKind) -> Option<(BindingPower, Associativity)> {
    use TokenKind::*;
    let entry = match kind {
        Comma => (BindingPower::COMMA, Associativity::Left),

        Assign | PlusAssign | MinusAssign | StarAssign | DivAssign | ModAssign | AndAssign
        | OrAssign | XorAssign | LeftShiftAssign | RightShiftAssign => {
            (BindingPower::ASSIGNMENT, Associativity::Right)
        }

        Question => (BindingPower::CONDITIONAL, Associativity::Right),

        LogicOr => (BindingPower::LOGICAL_OR, Associativity::Left),
        LogicAnd => (BindingPower::LOGICAL_AND, Associativity::Left),
        Or => (BindingPower::BITWISE_OR, Associativity::Left),
        Xor => (BindingPower::BITWISE_XOR, Associativity::Left),
        And => (BindingPower::BITWISE_AND, Associativity::Left),
        Equal | NotEqual => (BindingPower::EQUALITY, Associativity::Left),
        Less | Greater | LessEqual | GreaterEqual => {
            (BindingPower::RELATIONAL, Associativity::Left)
        }
        LeftShift | RightShift => (BindingPower::SHIFT, Associativity::Left),
        Plus | Minus => (BindingPower::ADDITIVE, Associativity::Left),
        Star | Slash | Percent => (BindingPower::MULTIPLICATIVE, Associativity::Left),

        Increment | Decrement | LeftParen | LeftBracket | Dot | Arrow => {
            (BindingPower::POSTFIX, Associativity::Left)
        }

        _ => return None,
    };
    Some(entry)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    let op = match kind {
        Assign => AssignOp::Assign,
        PlusAssign => AssignOp::AddAssign,
        MinusAssign => AssignOp::SubAssign,
        StarAssign => AssignOp::MulAssign,
        DivAssign => AssignOp::DivAssign,
        ModAssign => AssignOp::ModAssign,
        AndAssign => AssignOp::AndAssign,
        OrAssign => AssignOp::OrAssign,
        XorAssign => AssignOp::XorAssign,
        LeftShiftAssign => AssignOp::ShlAssign,
        RightShiftAssign => AssignOp::ShrAssign,
        _ => return None,
    };
    Some(op)
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    use TokenKind::*;
    let op = match kind {
        Plus => BinaryOp::Add,
        Minus => BinaryOp::Sub,
        Star => BinaryOp::Mul,
        Slash => BinaryOp::Div,
        Percent => BinaryOp::Mod,
        LeftShift => BinaryOp::Shl,
        RightShift => BinaryOp::Shr,
        Less => BinaryOp::Less,
        Greater => BinaryOp::Greater,
        LessEqual => BinaryOp::LessEqual,
        GreaterEqual => BinaryOp::GreaterEqual,
        Equal => BinaryOp::Equal,
        NotEqual => BinaryOp::NotEqual,
        And => BinaryOp::BitAnd,
        Or => BinaryOp::BitOr,
        Xor => BinaryOp::BitXor,
        LogicAnd => BinaryOp::LogicAnd,
        LogicOr => BinaryOp::LogicOr,
        _ => return None,
    };
    Some(op)
}

pub(crate) fn parse_expression(
    parser: &mut Parser,
    min_bp: BindingPower,
) -> Result<Expr, ParseError> {
    let mut left = parse_prefix(parser)?;
    // Tracks whether `left` is still a unary-expression in the grammar
    // sense; casts and anything built by folding an operator below are not.
    let mut left_is_unary = !matches!(left, Expr::Cast(..));

    loop {
        let token = parser.current_token()?;
        let Some((bp, assoc)) = binding_power(token.kind) else {
            break;
        };
        let stop = match assoc {
            Associativity::Left => bp <= min_bp,
            Associativity::Right => bp < min_bp,
        };
        if stop {
            break;
        }

        parser.advance()?;

        left = match token.kind {
            TokenKind::Increment => {
                let info = parser.info(left.pos());
                Expr::Unary(UnaryOp::PostIncrement, Box::new(left), info)
            }
            TokenKind::Decrement => {
                let info = parser.info(left.pos());
                Expr::Unary(UnaryOp::PostDecrement, Box::new(left), info)
            }
            TokenKind::LeftParen => parse_call(parser, left)?,
            TokenKind::LeftBracket => {
                let index = parser.parse_expr_min()?;
                parser.expect(TokenKind::RightBracket)?;
                let info = parser.info(left.pos());
                Expr::Index(Box::new(left), Box::new(index), info)
            }
            TokenKind::Dot => {
                let member = parser.expect_name()?;
                let info = parser.info(left.pos());
                Expr::Member(Box::new(left), MemberOp::Dot, member, info)
            }
            TokenKind::Arrow => {
                let member = parser.expect_name()?;
                let info = parser.info(left.pos());
                Expr::Member(Box::new(left), MemberOp::Arrow, member, info)
            }
            TokenKind::Question => {
                left_is_unary = false;
                parse_conditional_tail(parser, left)?
            }
            TokenKind::Comma => {
                left_is_unary = false;
                let right = parse_expression(parser, BindingPower::COMMA.next())?;
                match left {
                    Expr::Comma(mut items, info) => {
                        items.push(right);
                        Expr::Comma(items, info)
                    }
                    first => {
                        let info = parser.info(first.pos());
                        Expr::Comma(vec![first, right], info)
                    }
                }
            }
            kind => {
                if let Some(op) = assign_op(kind) {
                    // The grammar allows only a unary-expression on the left
                    // of an assignment operator.
                    if !left_is_unary {
                        return Err(ParseError::Syntax {
                            expected: "a unary expression before assignment".to_string(),
                            found: kind.to_string(),
                            pos: token.pos,
                        });
                    }
                    left_is_unary = false;
                    let right = parse_expression(parser, BindingPower::ASSIGNMENT)?;
                    let info = parser.info(left.pos());
                    Expr::Assign(op, Box::new(left), Box::new(right), info)
                } else if let Some(op) = binary_op(kind) {
                    left_is_unary = false;
                    let right = parse_expression(parser, bp.next())?;
                    let info = parser.info(left.pos());
                    Expr::Binary(op, Box::new(left), Box::new(right), info)
                } else {
                    unreachable!("token with binding power is an operator");
                }
            }
        };
    }

    Ok(left)
}

fn parse_conditional_tail(parser: &mut Parser, cond: Expr) -> Result<Expr, ParseError> {
    // GNU allows eliding the then-branch: `x ?: y`.
    let then_expr = if parser.is_token(TokenKind::Colon)? {
        None
    } else {
        Some(Box::new(parser.parse_expr_min()?))
    };
    parser.expect(TokenKind::Colon)?;
    let else_expr = parse_expression(parser, BindingPower::CONDITIONAL)?;
    let info = parser.info(cond.pos());
    Ok(Expr::Conditional(
        Box::new(cond),
        then_expr,
        Box::new(else_expr),
        info,
    ))
}

fn parse_call(parser: &mut Parser, callee: Expr) -> Result<Expr, ParseError> {
    let mut args = Vec::new();
    if !parser.is_token(TokenKind::RightParen)? {
        loop {
            args.push(parser.parse_expr_assignment()?);
            if parser.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }
    }
    parser.expect(TokenKind::RightParen)?;
    let info = parser.info(callee.pos());
    Ok(Expr::Call(Box::new(callee), args, info))
}

fn parse_prefix(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.current_token()?;

    match token.kind {
        TokenKind::Identifier(name) => {
            parser.advance()?;
            let ident = parser.ident(name, token.pos);
            Ok(Expr::Ident(ident))
        }
        TokenKind::IntegerConstant(value, suffix) => {
            parser.advance()?;
            let info = parser.info(token.pos);
            Ok(Expr::Constant(Constant::Int(value, suffix), info))
        }
        TokenKind::FloatConstant(text, suffix) => {
            parser.advance()?;
            let info = parser.info(token.pos);
            Ok(Expr::Constant(Constant::Float(text, suffix), info))
        }
        TokenKind::CharConstant(value) => {
            parser.advance()?;
            let info = parser.info(token.pos);
            Ok(Expr::Constant(Constant::Char(value), info))
        }
        TokenKind::StringLiteral(_) => {
            let (content, pos) = parse_string_literal(parser)?;
            let info = parser.info(pos);
            Ok(Expr::Constant(Constant::String(content), info))
        }
        TokenKind::LeftParen => parse_paren_expression(parser, token),

        TokenKind::Plus => parse_unary(parser, UnaryOp::Plus, BindingPower::CAST),
        TokenKind::Minus => parse_unary(parser, UnaryOp::Minus, BindingPower::CAST),
        TokenKind::Not => parse_unary(parser, UnaryOp::LogicNot, BindingPower::CAST),
        TokenKind::Tilde => parse_unary(parser, UnaryOp::BitNot, BindingPower::CAST),
        TokenKind::Star => parse_unary(parser, UnaryOp::Deref, BindingPower::CAST),
        TokenKind::And => parse_unary(parser, UnaryOp::AddressOf, BindingPower::CAST),
        TokenKind::Increment => parse_unary(parser, UnaryOp::PreIncrement, BindingPower::UNARY),
        TokenKind::Decrement => parse_unary(parser, UnaryOp::PreDecrement, BindingPower::UNARY),

        TokenKind::LogicAnd => {
            // GNU label address: `&&target`.
            parser.advance()?;
            let label = parser.expect_identifier()?;
            let info = parser.info(token.pos);
            Ok(Expr::LabelAddr(label, info))
        }

        TokenKind::Real => {
            parser.advance()?;
            let operand = parse_expression(parser, BindingPower::CAST)?;
            let info = parser.info(token.pos);
            Ok(Expr::Real(Box::new(operand), info))
        }
        TokenKind::Imag => {
            parser.advance()?;
            let operand = parse_expression(parser, BindingPower::CAST)?;
            let info = parser.info(token.pos);
            Ok(Expr::Imag(Box::new(operand), info))
        }

        TokenKind::Sizeof => parse_sizeof(parser),
        TokenKind::Alignof => parse_alignof(parser),

        TokenKind::Extension => {
            // Syntactically transparent.
            parser.advance()?;
            parse_expression(parser, BindingPower::CAST)
        }

        TokenKind::BuiltinVaArg => parse_builtin_va_arg(parser),
        TokenKind::BuiltinOffsetof => parse_builtin_offsetof(parser),
        TokenKind::BuiltinTypesCompatible => parse_builtin_types_compatible(parser),

        _ => Err(parser.syntax_error("an expression")),
    }
}

fn parse_unary(
    parser: &mut Parser,
    op: UnaryOp,
    operand_bp: BindingPower,
) -> Result<Expr, ParseError> {
    let token = parser.advance()?;
    let operand = parse_expression(parser, operand_bp)?;
    let info = parser.info(token.pos);
    Ok(Expr::Unary(op, Box::new(operand), info))
}

/// After `(` in expression position: cast, compound literal, statement
/// expression, or plain grouping. The lookahead decides: a type-name head
/// cannot start an expression, and `{` cannot start a parenthesized one.
fn parse_paren_expression(parser: &mut Parser, lparen: Token) -> Result<Expr, ParseError> {
    parser.advance()?;

    if parser.starts_type_name()? {
        let type_name = parse_type_name(parser)?;
        parser.expect(TokenKind::RightParen)?;

        if parser.is_token(TokenKind::LeftBrace)? {
            let list = parse_initializer_list(parser)?;
            let info = parser.info(lparen.pos);
            return Ok(Expr::CompoundLiteral(Box::new(type_name), list, info));
        }

        let operand = parse_expression(parser, BindingPower::CAST)?;
        let info = parser.info(lparen.pos);
        return Ok(Expr::Cast(Box::new(type_name), Box::new(operand), info));
    }

    if parser.is_token(TokenKind::LeftBrace)? {
        let body = parse_compound_statement(parser)?;
        parser.expect(TokenKind::RightParen)?;
        let info = parser.info(lparen.pos);
        return Ok(Expr::StmtExpr(body, info));
    }

    let inner = parser.parse_expr_min()?;
    parser.expect(TokenKind::RightParen)?;
    Ok(inner)
}

fn parse_sizeof(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.advance()?;

    if parser.is_token(TokenKind::LeftParen)? {
        let second = parser.peek_second()?.kind;
        if super::starts_type_name_kind(second) {
            parser.advance()?;
            let type_name = parse_type_name(parser)?;
            parser.expect(TokenKind::RightParen)?;
            let info = parser.info(token.pos);
            return Ok(Expr::SizeofType(Box::new(type_name), info));
        }
    }

    let operand = parse_expression(parser, BindingPower::UNARY)?;
    let info = parser.info(token.pos);
    Ok(Expr::SizeofExpr(Box::new(operand), info))
}

fn parse_alignof(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.advance()?;

    if parser.is_token(TokenKind::LeftParen)? {
        let second = parser.peek_second()?.kind;
        if super::starts_type_name_kind(second) {
            parser.advance()?;
            let type_name = parse_type_name(parser)?;
            parser.expect(TokenKind::RightParen)?;
            let info = parser.info(token.pos);
            return Ok(Expr::AlignofType(Box::new(type_name), info));
        }
    }

    let operand = parse_expression(parser, BindingPower::UNARY)?;
    let info = parser.info(token.pos);
    Ok(Expr::AlignofExpr(Box::new(operand), info))
}

fn parse_builtin_va_arg(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let ap = parser.parse_expr_assignment()?;
    parser.expect(TokenKind::Comma)?;
    let type_name = parse_type_name(parser)?;
    parser.expect(TokenKind::RightParen)?;
    let info = parser.info(token.pos);
    Ok(Expr::VaArg(Box::new(ap), Box::new(type_name), info))
}

fn parse_builtin_offsetof(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let type_name = parse_type_name(parser)?;
    parser.expect(TokenKind::Comma)?;

    // The member designator: `a.b[3]` becomes member, member, index.
    let mut designators = Vec::new();
    designators.push(Designator::Member(parser.expect_name()?));
    loop {
        let next = parser.current_token()?;
        match next.kind {
            TokenKind::Dot => {
                parser.advance()?;
                designators.push(Designator::Member(parser.expect_name()?));
            }
            TokenKind::LeftBracket => {
                parser.advance()?;
                let index = parser.parse_expr_min()?;
                parser.expect(TokenKind::RightBracket)?;
                let info = parser.info(next.pos);
                designators.push(Designator::Index(index, info));
            }
            _ => break,
        }
    }

    parser.expect(TokenKind::RightParen)?;
    let info = parser.info(token.pos);
    Ok(Expr::Offsetof(Box::new(type_name), designators, info))
}

fn parse_builtin_types_compatible(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let left = parse_type_name(parser)?;
    parser.expect(TokenKind::Comma)?;
    let right = parse_type_name(parser)?;
    parser.expect(TokenKind::RightParen)?;
    let info = parser.info(token.pos);
    Ok(Expr::TypesCompatible(Box::new(left), Box::new(right), info))
}

/// Read one or more adjacent string literals, concatenated left to right.
pub(crate) fn parse_string_literal(parser: &mut Parser) -> Result<(Symbol, crate::position::Pos), ParseError> {
    let token = parser.current_token()?;
    let TokenKind::StringLiteral(first) = token.kind else {
        return Err(parser.syntax_error("a string literal"));
    };
    parser.advance()?;

    let mut content = first.as_str().to_string();
    let mut concatenated = false;
    loop {
        let next = parser.current_token()?;
        if let TokenKind::StringLiteral(part) = next.kind {
            parser.advance()?;
            content.push_str(part.as_str());
            concatenated = true;
        } else {
            break;
        }
    }

    let symbol = if concatenated {
        Symbol::new(&content)
    } else {
        first
    };
    Ok((symbol, token.pos))
}

/// Attribute argument lists reuse assignment-level expressions.
pub(crate) fn parse_attribute_args(parser: &mut Parser) -> Result<ThinVec<Expr>, ParseError> {
    let mut args = ThinVec::new();
    if !parser.is_token(TokenKind::RightParen)? {
        loop {
            args.push(parser.parse_expr_assignment()?);
            if parser.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }
    }
    Ok(args)
}
