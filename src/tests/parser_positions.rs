//! Node stamps: positions and parse-unique ids.

use crate::ast::*;
use crate::parser::parse;
use crate::position::{HasPos, Pos};
use crate::tests::common::*;

#[test]
fn test_sibling_positions_are_monotonic() {
    let unit = parse_str("int x;\nint y;\nint z;");
    let positions: Vec<Pos> = unit.decls.iter().map(|decl| decl.pos()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(positions[0].line, 1);
    assert_eq!(positions[1].line, 2);
    assert_eq!(positions[2].line, 3);
}

#[test]
fn test_block_item_positions_are_monotonic() {
    let def = func("void f(void) { g(); int x = 1; h(x); }");
    let positions: Vec<Pos> = def.body.items.iter().map(|item| item.pos()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_node_ids_increase_across_declarations() {
    let unit = parse_str("int x; int y;");
    let first = match &unit.decls[0] {
        ExternalDecl::Declaration(decl) => decl.info.id,
        other => panic!("expected declaration, got {other:?}"),
    };
    let second = match &unit.decls[1] {
        ExternalDecl::Declaration(decl) => decl.info.id,
        other => panic!("expected declaration, got {other:?}"),
    };
    assert!(first < second);
    // The unit itself is constructed last.
    assert!(unit.info.id > second);
}

#[test]
fn test_children_are_stamped_before_parents() {
    let expr = expr("1 + 2");
    match expr {
        Expr::Binary(_, left, right, info) => {
            assert!(left.info().id < right.info().id);
            assert!(right.info().id < info.id);
        }
        other => panic!("expected binary expression, got {other:?}"),
    }
}

#[test]
fn test_initial_node_id_offsets_the_parse() {
    let unit = parse(b"int x;", Pos::file_start("a.c"), BUILTINS, 1000).unwrap();
    assert!(unit.info.id.0 >= 1000);
    match &unit.decls[0] {
        ExternalDecl::Declaration(decl) => assert!(decl.info.id.0 >= 1000),
        other => panic!("expected declaration, got {other:?}"),
    }
}

#[test]
fn test_initial_position_is_honored() {
    let start = Pos {
        file: Symbol::new("stitched.c"),
        line: 40,
        column: 1,
    };
    let unit = parse(b"int x;", start, BUILTINS, 1).unwrap();
    let pos = unit.decls[0].pos();
    assert_eq!(pos.file.as_str(), "stitched.c");
    assert_eq!(pos.line, 40);
}

#[test]
fn test_line_markers_reach_the_ast() {
    let source = b"int before;\n# 99 \"other.c\"\nint after;";
    let unit = parse(source, Pos::file_start("main.c"), BUILTINS, 1).unwrap();
    let first = unit.decls[0].pos();
    let second = unit.decls[1].pos();
    assert_eq!(first.file.as_str(), "main.c");
    assert_eq!(first.line, 1);
    assert_eq!(second.file.as_str(), "other.c");
    assert_eq!(second.line, 99);
}
