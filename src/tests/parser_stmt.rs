use crate::ast::*;
use crate::tests::common::*;

#[test]
fn test_dangling_else_attaches_to_nearest_if() {
    let stmt = stmt("if (a) if (b) x(); else y();");
    match stmt {
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(else_branch.is_none(), "outer if has no else");
            match *then_branch {
                Stmt::If { else_branch, .. } => assert!(else_branch.is_some()),
                other => panic!("expected inner if, got {other:?}"),
            }
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_while_and_do_while() {
    assert!(matches!(stmt("while (x) ;"), Stmt::While { .. }));
    match stmt("do f(); while (x);") {
        Stmt::DoWhile { body, .. } => {
            assert!(matches!(*body, Stmt::Expr { .. }));
        }
        other => panic!("expected do-while, got {other:?}"),
    }
}

#[test]
fn test_for_variants() {
    match stmt("for (;;) ;") {
        Stmt::For {
            init, cond, step, ..
        } => {
            assert!(matches!(init, ForInit::Empty));
            assert!(cond.is_none());
            assert!(step.is_none());
        }
        other => panic!("expected for, got {other:?}"),
    }

    match stmt("for (i = 0; i < 10; i++) ;") {
        Stmt::For { init, cond, .. } => {
            assert!(matches!(init, ForInit::Expr(_)));
            assert!(cond.is_some());
        }
        other => panic!("expected for, got {other:?}"),
    }

    match stmt("for (int i = 0; i < 10; i++) ;") {
        Stmt::For { init, .. } => {
            assert!(matches!(init, ForInit::Decl(_)));
        }
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn test_switch_with_cases_and_default() {
    let stmt = stmt("switch (x) { case 1: f(); break; default: g(); }");
    match stmt {
        Stmt::Switch { body, .. } => match *body {
            Stmt::Compound(compound) => {
                assert_eq!(compound.items.len(), 3);
                assert!(matches!(
                    compound.items[0],
                    BlockItem::Statement(Stmt::Case { .. })
                ));
                assert!(matches!(
                    compound.items[2],
                    BlockItem::Statement(Stmt::Default { .. })
                ));
            }
            other => panic!("expected compound body, got {other:?}"),
        },
        other => panic!("expected switch, got {other:?}"),
    }
}

#[test]
fn test_case_range() {
    let stmt = stmt("switch (c) { case 'a' ... 'z': f(); }");
    match stmt {
        Stmt::Switch { body, .. } => match *body {
            Stmt::Compound(compound) => match &compound.items[0] {
                BlockItem::Statement(Stmt::CaseRange { lo, hi, .. }) => {
                    assert!(matches!(&**lo, Expr::Constant(Constant::Char(97), _)));
                    assert!(matches!(&**hi, Expr::Constant(Constant::Char(122), _)));
                }
                other => panic!("expected case range, got {other:?}"),
            },
            other => panic!("expected compound body, got {other:?}"),
        },
        other => panic!("expected switch, got {other:?}"),
    }
}

#[test]
fn test_labels_and_goto() {
    let def = func("void f(void) { start: g(); goto start; }");
    assert_eq!(def.body.items.len(), 2);
    match &def.body.items[0] {
        BlockItem::Statement(Stmt::Labeled { label, .. }) => {
            assert_eq!(label.name.as_str(), "start");
        }
        other => panic!("expected labeled statement, got {other:?}"),
    }
    assert!(matches!(
        &def.body.items[1],
        BlockItem::Statement(Stmt::Goto { label, .. }) if label.name.as_str() == "start"
    ));
}

#[test]
fn test_computed_goto() {
    match stmt("goto *p;") {
        Stmt::GotoExpr { target, .. } => {
            assert!(matches!(*target, Expr::Ident(_)));
        }
        other => panic!("expected computed goto, got {other:?}"),
    }
}

#[test]
fn test_label_address() {
    let def = func("void f(void) { out: ; void *p = &&out; }");
    match &def.body.items[1] {
        BlockItem::Declaration(decl) => match &decl.declarators[0].initializer {
            Some(Initializer::Expr(expr)) => {
                assert!(
                    matches!(&**expr, Expr::LabelAddr(label, _) if label.name.as_str() == "out")
                );
            }
            other => panic!("expected initializer, got {other:?}"),
        },
        other => panic!("expected declaration, got {other:?}"),
    }
}

#[test]
fn test_local_label_declarations() {
    let def = func("void f(void) { __label__ here, there; here: ; there: ; }");
    assert_eq!(def.body.local_labels.len(), 2);
    assert_eq!(def.body.local_labels[0].name.as_str(), "here");
    assert_eq!(def.body.local_labels[1].name.as_str(), "there");
}

#[test]
fn test_break_continue_return() {
    let def = func("void f(void) { while (1) { if (x) break; continue; } return; }");
    assert_eq!(def.body.items.len(), 2);
    assert!(matches!(
        &def.body.items[1],
        BlockItem::Statement(Stmt::Return { expr: None, .. })
    ));
}

#[test]
fn test_empty_statement() {
    assert!(matches!(stmt(";"), Stmt::Expr { expr: None, .. }));
}

#[test]
fn test_asm_statement_full_form() {
    let stmt = stmt(r#"asm volatile ("mov %1, %0" : "=r"(dst) : "r"(src) : "memory", "cc");"#);
    match stmt {
        Stmt::Asm(asm) => {
            assert_eq!(asm.qualifier, Some(AsmQualifier::Volatile));
            assert_eq!(asm.template.as_str(), "mov %1, %0");
            assert_eq!(asm.outputs.len(), 1);
            assert_eq!(asm.outputs[0].constraint.as_str(), "=r");
            assert_eq!(asm.inputs.len(), 1);
            assert_eq!(asm.clobbers.len(), 2);
            assert_eq!(asm.clobbers[0].as_str(), "memory");
        }
        other => panic!("expected asm statement, got {other:?}"),
    }
}

#[test]
fn test_asm_named_operands() {
    let stmt = stmt(r#"asm ("add %[a], %[b]" : [a] "=r"(x) : [b] "r"(y));"#);
    match stmt {
        Stmt::Asm(asm) => {
            assert!(asm.qualifier.is_none());
            assert_eq!(
                asm.outputs[0].symbolic_name.as_ref().unwrap().name.as_str(),
                "a"
            );
            assert_eq!(
                asm.inputs[0].symbolic_name.as_ref().unwrap().name.as_str(),
                "b"
            );
        }
        other => panic!("expected asm statement, got {other:?}"),
    }
}

#[test]
fn test_top_level_asm_declaration() {
    let unit = parse_str(r#"asm (".globl marker");"#);
    assert_eq!(unit.decls.len(), 1);
    match &unit.decls[0] {
        ExternalDecl::Asm(asm) => assert_eq!(asm.template.as_str(), ".globl marker"),
        other => panic!("expected asm declaration, got {other:?}"),
    }
}

#[test]
fn test_block_mixes_declarations_and_statements() {
    let def = func("void f(void) { g(); int x = 1; h(x); int y; }");
    assert_eq!(def.body.items.len(), 4);
    assert!(matches!(&def.body.items[0], BlockItem::Statement(_)));
    assert!(matches!(&def.body.items[1], BlockItem::Declaration(_)));
    assert!(matches!(&def.body.items[2], BlockItem::Statement(_)));
    assert!(matches!(&def.body.items[3], BlockItem::Declaration(_)));
}
