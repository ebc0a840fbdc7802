use crate::ast::Symbol;
use crate::parser::{Parser, TypeContext};
use crate::position::Pos;
use crate::token::TokenKind;

fn parser(source: &'static str) -> Parser<'static> {
    Parser::new(source.as_bytes(), Pos::file_start("<test>"), &[], 1)
}

#[test]
fn test_type_context_builtins() {
    let context = TypeContext::new([Symbol::new("__builtin_va_list")]);
    assert!(context.is_type_name(Symbol::new("__builtin_va_list")));
    assert!(!context.is_type_name(Symbol::new("T")));
}

#[test]
fn test_type_context_scoping() {
    let t = Symbol::new("T");
    let mut context = TypeContext::new([]);

    context.add_typedef(t);
    assert!(context.is_type_name(t));

    context.enter_scope();
    assert!(context.is_type_name(t), "outer binding visible inside");
    context.shadow_typedef(t);
    assert!(!context.is_type_name(t), "shadow hides the outer typedef");

    context.leave_scope();
    assert!(context.is_type_name(t), "binding restored after scope exit");
}

#[test]
#[should_panic(expected = "scope underflow")]
fn test_type_context_underflow() {
    let mut context = TypeContext::new([]);
    context.leave_scope();
}

#[test]
fn test_lookahead_primitives() {
    let mut p = parser("int x ;");
    assert_eq!(p.current_kind().unwrap(), TokenKind::Int);
    assert_eq!(p.peek_second().unwrap().kind, TokenKind::Identifier(Symbol::new("x")));

    let token = p.advance().unwrap();
    assert_eq!(token.kind, TokenKind::Int);
    assert!(p.accept(TokenKind::Semicolon).unwrap().is_none());
    assert!(p.accept(TokenKind::Identifier(Symbol::new("x"))).unwrap().is_some());
    assert!(p.expect(TokenKind::Semicolon).is_ok());
    assert!(p.at_eof().unwrap());
    // Past the end the lexer keeps handing out Eof.
    assert_eq!(p.current_kind().unwrap(), TokenKind::Eof);
}

#[test]
fn test_identifier_classification_uses_scopes() {
    let t = Symbol::new("T");

    let mut plain = parser("T");
    assert_eq!(plain.current_kind().unwrap(), TokenKind::Identifier(t));

    let mut typed = parser("T");
    typed.add_typedef(t);
    assert_eq!(typed.current_kind().unwrap(), TokenKind::TypedefName(t));
}

#[test]
fn test_fresh_ids_are_strictly_increasing() {
    let mut p = parser("");
    let pos = Pos::file_start("<test>");
    let a = p.info(pos);
    let b = p.info(pos);
    let c = p.info(pos);
    assert!(a.id < b.id && b.id < c.id);
}

#[test]
fn test_initial_node_id_is_honored() {
    let mut p = Parser::new(b"", Pos::file_start("<test>"), &[], 500);
    let info = p.info(Pos::file_start("<test>"));
    assert_eq!(info.id.0, 500);
}

#[test]
fn test_scope_balance_after_full_parse() {
    let source = "
        typedef int T;
        int f(T x) {
            for (int i = 0; i < x; i++) {
                { T y; }
            }
            return 0;
        }
        int g(a, b) int a; int b; { return a + b; }
    ";
    let mut p = Parser::new(source.as_bytes(), Pos::file_start("<test>"), &[], 1);
    p.parse_translation_unit().unwrap();
    assert_eq!(p.scope_depth(), 1, "every enter_scope has a matching leave_scope");
}

#[test]
fn test_syntax_error_reports_lookahead() {
    let mut p = parser("@");
    let error = p.expect(TokenKind::Int).unwrap_err();
    // The stray byte surfaces as a lexical error, not a syntax error.
    assert!(error.to_string().contains("stray"));

    let mut p = parser("while");
    let error = p.expect(TokenKind::Int).unwrap_err();
    assert!(error.to_string().contains("syntax error before `while`"));
}
