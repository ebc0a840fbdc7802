use crate::ast::*;
use crate::tests::common::*;

fn binary(expr: &Expr) -> (BinaryOp, &Expr, &Expr) {
    match expr {
        Expr::Binary(op, left, right, _) => (*op, left, right),
        other => panic!("expected binary expression, got {other:?}"),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expr = expr("1 + 2 * 3");
    let (op, left, right) = binary(&expr);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(int_constant(left), 1);
    let (op, left, right) = binary(right);
    assert_eq!(op, BinaryOp::Mul);
    assert_eq!(int_constant(left), 2);
    assert_eq!(int_constant(right), 3);
}

#[test]
fn test_binary_operators_are_left_associative() {
    let expr = expr("10 - 4 - 3");
    let (op, left, right) = binary(&expr);
    assert_eq!(op, BinaryOp::Sub);
    assert_eq!(int_constant(right), 3);
    let (op, left, _) = binary(left);
    assert_eq!(op, BinaryOp::Sub);
    assert_eq!(int_constant(left), 10);
}

#[test]
fn test_shift_binds_looser_than_additive() {
    let expr = expr("1 << 2 + 3");
    let (op, _, right) = binary(&expr);
    assert_eq!(op, BinaryOp::Shl);
    let (op, _, _) = binary(right);
    assert_eq!(op, BinaryOp::Add);
}

#[test]
fn test_assignment_is_right_associative() {
    let expr = expr("a = b = 1");
    match &expr {
        Expr::Assign(AssignOp::Assign, _, rhs, _) => {
            assert!(matches!(&**rhs, Expr::Assign(AssignOp::Assign, _, _, _)));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_compound_assignment_operators() {
    for (source, op) in [
        ("a += 1", AssignOp::AddAssign),
        ("a -= 1", AssignOp::SubAssign),
        ("a <<= 1", AssignOp::ShlAssign),
        ("a ^= 1", AssignOp::XorAssign),
    ] {
        let expr = expr(source);
        match expr {
            Expr::Assign(parsed, _, _, _) => assert_eq!(parsed, op),
            other => panic!("expected assignment, got {other:?}"),
        }
    }
}

#[test]
fn test_assignment_target_must_be_unary() {
    // The grammar is stricter than gcc here: an unparenthesized binary
    // expression cannot be assigned to.
    let error = parse_fail("void f(void) { a + b = 1; }");
    assert!(error.to_string().contains("syntax error before `=`"));

    // A parenthesized one is a primary expression and passes.
    let _ = expr("(a) = 1");
}

#[test]
fn test_cast_is_not_an_assignment_target() {
    let error = parse_fail("void f(void) { (int)a = 1; }");
    assert!(error.to_string().contains("syntax error before `=`"));
}

#[test]
fn test_conditional_operator() {
    let expr = expr("a ? 1 : 2");
    match expr {
        Expr::Conditional(_, then_expr, else_expr, _) => {
            assert_eq!(int_constant(&then_expr.unwrap()), 1);
            assert_eq!(int_constant(&else_expr), 2);
        }
        other => panic!("expected conditional, got {other:?}"),
    }
}

#[test]
fn test_conditional_elision() {
    let expr = expr("a ?: 2");
    match expr {
        Expr::Conditional(_, then_expr, _, _) => assert!(then_expr.is_none()),
        other => panic!("expected conditional, got {other:?}"),
    }
}

#[test]
fn test_conditional_is_right_associative() {
    let expr = expr("a ? 1 : b ? 2 : 3");
    match expr {
        Expr::Conditional(_, _, else_expr, _) => {
            assert!(matches!(*else_expr, Expr::Conditional(..)));
        }
        other => panic!("expected conditional, got {other:?}"),
    }
}

#[test]
fn test_comma_expression_flattens() {
    let expr = expr("1, 2, 3");
    match expr {
        Expr::Comma(items, _) => {
            assert_eq!(items.len(), 3);
            assert_eq!(int_constant(&items[2]), 3);
        }
        other => panic!("expected comma expression, got {other:?}"),
    }
}

#[test]
fn test_unary_operators() {
    for (source, op) in [
        ("-x", UnaryOp::Minus),
        ("+x", UnaryOp::Plus),
        ("!x", UnaryOp::LogicNot),
        ("~x", UnaryOp::BitNot),
        ("*x", UnaryOp::Deref),
        ("&x", UnaryOp::AddressOf),
        ("++x", UnaryOp::PreIncrement),
        ("--x", UnaryOp::PreDecrement),
    ] {
        match expr(source) {
            Expr::Unary(parsed, _, _) => assert_eq!(parsed, op),
            other => panic!("expected unary for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_postfix_operators() {
    assert!(matches!(
        expr("x++"),
        Expr::Unary(UnaryOp::PostIncrement, _, _)
    ));
    assert!(matches!(
        expr("x--"),
        Expr::Unary(UnaryOp::PostDecrement, _, _)
    ));
}

#[test]
fn test_postfix_chain() {
    // a.b->c[1](2)
    let expr = expr("a.b->c[1](2)");
    match expr {
        Expr::Call(callee, args, _) => {
            assert_eq!(args.len(), 1);
            match *callee {
                Expr::Index(base, _, _) => match *base {
                    Expr::Member(base, MemberOp::Arrow, member, _) => {
                        assert_eq!(member.name.as_str(), "c");
                        assert!(matches!(*base, Expr::Member(_, MemberOp::Dot, _, _)));
                    }
                    other => panic!("expected arrow access, got {other:?}"),
                },
                other => panic!("expected index, got {other:?}"),
            }
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_call_argument_list() {
    let expr = expr("f(a ? 1 : 2, b)");
    match expr {
        Expr::Call(_, args, _) => assert_eq!(args.len(), 2),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_cast_expression() {
    let expr = expr("(long)x");
    match expr {
        Expr::Cast(type_name, operand, _) => {
            assert!(matches!(
                type_name.specifiers[0],
                DeclSpecifier::Type(TypeSpecifier::Long(_))
            ));
            assert!(matches!(*operand, Expr::Ident(_)));
        }
        other => panic!("expected cast, got {other:?}"),
    }
}

#[test]
fn test_cast_of_typedef_name_vs_call() {
    // `(T)(x)` casts when T is a typedef, calls when it is not.
    let unit = parse_str("typedef int T; void f(void) { (T)(x); }");
    let def = match &unit.decls[1] {
        ExternalDecl::FunctionDef(def) => def,
        other => panic!("expected function, got {other:?}"),
    };
    match &def.body.items[0] {
        BlockItem::Statement(Stmt::Expr { expr: Some(expr), .. }) => {
            assert!(matches!(&**expr, Expr::Cast(..)));
        }
        other => panic!("expected expression statement, got {other:?}"),
    }

    assert!(matches!(expr("(t)(x)"), Expr::Call(..)));
}

#[test]
fn test_sizeof_forms() {
    assert!(matches!(expr("sizeof x"), Expr::SizeofExpr(_, _)));
    assert!(matches!(expr("sizeof(int)"), Expr::SizeofType(_, _)));
    // Parenthesized expression operand stays an expression form.
    match expr("sizeof(x)") {
        Expr::SizeofExpr(operand, _) => assert!(matches!(*operand, Expr::Ident(_))),
        other => panic!("expected sizeof-expr, got {other:?}"),
    }
}

#[test]
fn test_alignof_forms() {
    assert!(matches!(expr("__alignof__(int)"), Expr::AlignofType(_, _)));
    assert!(matches!(expr("__alignof__ x"), Expr::AlignofExpr(_, _)));
}

#[test]
fn test_string_literal_concatenation() {
    match expr("\"foo\" \"bar\"") {
        Expr::Constant(Constant::String(content), _) => {
            assert_eq!(content.as_str(), "foobar");
        }
        other => panic!("expected string constant, got {other:?}"),
    }
}

#[test]
fn test_char_constant_value() {
    match expr("'A'") {
        Expr::Constant(Constant::Char(value), _) => assert_eq!(value, 65),
        other => panic!("expected char constant, got {other:?}"),
    }
}

#[test]
fn test_real_and_imag() {
    assert!(matches!(expr("__real__ z"), Expr::Real(_, _)));
    assert!(matches!(expr("__imag__ z"), Expr::Imag(_, _)));
}

#[test]
fn test_statement_expression() {
    let expr = expr("({ int y = 1; y; })");
    match expr {
        Expr::StmtExpr(body, _) => {
            assert_eq!(body.items.len(), 2);
            assert!(matches!(body.items[0], BlockItem::Declaration(_)));
        }
        other => panic!("expected statement expression, got {other:?}"),
    }
}

#[test]
fn test_compound_literal() {
    let expr = expr("(struct point){ 1, 2 }");
    match expr {
        Expr::CompoundLiteral(type_name, list, _) => {
            assert!(matches!(
                &type_name.specifiers[0],
                DeclSpecifier::Type(TypeSpecifier::Record(_))
            ));
            assert_eq!(list.items.len(), 2);
        }
        other => panic!("expected compound literal, got {other:?}"),
    }
}

#[test]
fn test_builtin_va_arg() {
    let expr = expr("__builtin_va_arg(ap, int)");
    assert!(matches!(expr, Expr::VaArg(_, _, _)));
}

#[test]
fn test_builtin_offsetof_designator_chain() {
    // member a, member b, index 3
    let expr = expr("__builtin_offsetof(struct S, a.b[3])");
    match expr {
        Expr::Offsetof(type_name, designators, _) => {
            assert!(matches!(
                &type_name.specifiers[0],
                DeclSpecifier::Type(TypeSpecifier::Record(_))
            ));
            assert_eq!(designators.len(), 3);
            assert!(
                matches!(&designators[0], Designator::Member(ident) if ident.name.as_str() == "a")
            );
            assert!(
                matches!(&designators[1], Designator::Member(ident) if ident.name.as_str() == "b")
            );
            match &designators[2] {
                Designator::Index(index, _) => assert_eq!(int_constant(index), 3),
                other => panic!("expected index designator, got {other:?}"),
            }
        }
        other => panic!("expected offsetof, got {other:?}"),
    }
}

#[test]
fn test_builtin_types_compatible() {
    assert!(matches!(
        expr("__builtin_types_compatible_p(int, long)"),
        Expr::TypesCompatible(_, _, _)
    ));
}

#[test]
fn test_extension_marker_is_transparent() {
    match expr("__extension__ 1") {
        Expr::Constant(Constant::Int(1, _), _) => {}
        other => panic!("expected bare constant, got {other:?}"),
    }
}

#[test]
fn test_typeof_in_declaration() {
    let unit = parse_str("void f(void) { int x; typeof(x) y; typeof(int *) p; }");
    let def = match &unit.decls[0] {
        ExternalDecl::FunctionDef(def) => def,
        other => panic!("expected function, got {other:?}"),
    };
    let second = match &def.body.items[1] {
        BlockItem::Declaration(decl) => decl,
        other => panic!("expected declaration, got {other:?}"),
    };
    assert!(matches!(
        second.specifiers[0],
        DeclSpecifier::Type(TypeSpecifier::TypeofExpr(_, _))
    ));
    let third = match &def.body.items[2] {
        BlockItem::Declaration(decl) => decl,
        other => panic!("expected declaration, got {other:?}"),
    };
    assert!(matches!(
        third.specifiers[0],
        DeclSpecifier::Type(TypeSpecifier::TypeofType(_, _))
    ));
}
