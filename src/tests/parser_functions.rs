use crate::ast::*;
use crate::tests::common::*;

#[test]
fn test_prototype_function_definition() {
    let def = func("int f(int a, int b) { return a + b; }");
    assert_eq!(def.declarator.name().unwrap().name.as_str(), "f");
    assert!(def.kr_declarations.is_empty());
    assert_eq!(def.body.items.len(), 1);

    match &def.body.items[0] {
        BlockItem::Statement(Stmt::Return {
            expr: Some(expr), ..
        }) => match &**expr {
            Expr::Binary(BinaryOp::Add, left, right, _) => {
                assert!(matches!(&**left, Expr::Ident(ident) if ident.name.as_str() == "a"));
                assert!(matches!(&**right, Expr::Ident(ident) if ident.name.as_str() == "b"));
            }
            other => panic!("expected a + b, got {other:?}"),
        },
        other => panic!("expected return statement, got {other:?}"),
    }
}

#[test]
fn test_old_style_function_definition() {
    let def = func("int add(a, b) int a; int b; { return a + b; }");
    assert_eq!(def.kr_declarations.len(), 2);
    match def.declarator.param_list() {
        Some(ParamList::Identifiers(names)) => {
            assert_eq!(names.len(), 2);
            assert_eq!(names[0].name.as_str(), "a");
            assert_eq!(names[1].name.as_str(), "b");
        }
        other => panic!("expected identifier list, got {other:?}"),
    }
}

#[test]
fn test_definition_with_empty_parens() {
    let def = func("int main() { return 0; }");
    assert!(matches!(
        def.declarator.param_list(),
        Some(ParamList::Identifiers(names)) if names.is_empty()
    ));
}

#[test]
fn test_definition_returning_pointer() {
    let def = func("char *dup(const char *s) { return 0; }");
    assert!(matches!(def.declarator, Declarator::Pointer(_)));
}

#[test]
fn test_attributes_between_declarator_and_body() {
    let def = func("void die(void) __attribute__((noreturn)) { }");
    match def.declarator.name() {
        Some(ident) => assert_eq!(ident.name.as_str(), "die"),
        None => panic!("definition has a name"),
    }
    // The attribute lands on the innermost variable declarator.
    let var = def.declarator.innermost_var();
    assert_eq!(var.attributes.len(), 1);
    assert_eq!(var.attributes[0].name.name.as_str(), "noreturn");
}

#[test]
fn test_nested_function_definition() {
    let def = func("void f(void) { int g(void) { return 1; } g(); }");
    assert_eq!(def.body.items.len(), 2);
    match &def.body.items[0] {
        BlockItem::NestedFunction(nested) => {
            assert_eq!(nested.declarator.name().unwrap().name.as_str(), "g");
        }
        other => panic!("expected nested function, got {other:?}"),
    }
    assert!(matches!(&def.body.items[1], BlockItem::Statement(_)));
}

#[test]
fn test_declaration_list_not_confused_with_definition() {
    // A prototype declaration ends at `;` and never opens a scope for a body.
    let unit = parse_str("int f(int a); int g(void);");
    assert_eq!(unit.decls.len(), 2);
    assert!(matches!(unit.decls[0], ExternalDecl::Declaration(_)));
}
