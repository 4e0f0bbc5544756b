//! Parser tests.
//!
//! Covers: all four statement forms, path syntax, expression precedence,
//! functional operators with implicit-element bodies, trailing commas,
//! and first-mismatch parse errors.

use wa_parser::parse;
use wa_types::ast::*;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse source text, panicking on error.
fn program(source: &str) -> Program {
    parse(source).expect("parsing should succeed")
}

/// Parse a single statement.
fn stmt(source: &str) -> Stmt {
    let mut p = program(source);
    assert_eq!(p.statements.len(), 1, "expected exactly one statement");
    p.statements.remove(0)
}

/// Parse `print <expr>` and return the expression.
fn expr(source: &str) -> Expr {
    match stmt(&format!("print {source}")) {
        Stmt::Print(p) => p.expr,
        other => panic!("expected print statement, got {other:?}"),
    }
}

/// Parse and return the error message.
fn parse_error(source: &str) -> String {
    parse(source).expect_err("parsing should fail").to_string()
}

/// Shorthand for a one-segment path expression kind.
fn path(name: &str) -> ExprKind {
    ExprKind::Path(PathExpr {
        segments: vec![PathSegment::Field(name.into())],
        span: wa_types::Span::new(1, 1),
    })
}

/// Compare expression kinds ignoring spans.
fn kind_eq(a: &ExprKind, b: &ExprKind) -> bool {
    // Spans differ between hand-built and parsed trees; compare the
    // rendered debug form with spans stripped.
    fn strip(s: &str) -> String {
        let mut out = String::new();
        let mut rest = s;
        while let Some(i) = rest.find("span: Span") {
            out.push_str(&rest[..i]);
            let tail = &rest[i..];
            let end = tail.find('}').map(|j| j + 1).unwrap_or(tail.len());
            rest = &tail[end..];
        }
        out.push_str(rest);
        out
    }
    strip(&format!("{a:?}")) == strip(&format!("{b:?}"))
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn empty_program() {
    assert!(program("").statements.is_empty());
    assert!(program("// just a comment\n").statements.is_empty());
}

#[test]
fn state_decl_entries_keep_declaration_order() {
    let s = stmt("state { name: \"ada\", age: 36, tags: [] }");
    let Stmt::State(decl) = s else {
        panic!("expected state declaration");
    };
    let keys: Vec<&str> = decl.entries.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["name", "age", "tags"]);
}

#[test]
fn empty_state_block() {
    let Stmt::State(decl) = stmt("state {}") else {
        panic!("expected state declaration");
    };
    assert!(decl.entries.is_empty());
}

#[test]
fn trailing_commas_allowed() {
    program("state { a: 1, b: 2, }");
    program("print [1, 2, 3,]");
    program("print { x: 1, }");
}

#[test]
fn set_statement_with_nested_path() {
    let Stmt::Set(set) = stmt("set user.scores[0] = 10") else {
        panic!("expected set statement");
    };
    assert_eq!(set.target.segments.len(), 3);
    assert!(matches!(&set.target.segments[0], PathSegment::Field(f) if f == "user"));
    assert!(matches!(&set.target.segments[1], PathSegment::Field(f) if f == "scores"));
    assert!(matches!(&set.target.segments[2], PathSegment::Index(_)));
}

#[test]
fn path_index_may_be_any_expression() {
    let Stmt::Set(set) = stmt("set items[cursor + 1] = 0") else {
        panic!("expected set statement");
    };
    let PathSegment::Index(idx) = &set.target.segments[1] else {
        panic!("expected index segment");
    };
    assert!(matches!(idx.kind, ExprKind::Binary { .. }));
}

#[test]
fn keywords_are_valid_field_names_after_dot() {
    let Stmt::Set(set) = stmt("set config.default = 1") else {
        panic!("expected set statement");
    };
    assert!(matches!(&set.target.segments[1], PathSegment::Field(f) if f == "default"));
}

#[test]
fn print_state_references_the_whole_tree() {
    assert!(matches!(expr("state").kind, ExprKind::StateRef));
}

#[test]
fn react_with_cases_and_default() {
    let source = r#"
        react to x
            when > 100 { print "big" }
            when > 10 { print "medium" }
            default { print "small" }
    "#;
    let Stmt::React(react) = stmt(source) else {
        panic!("expected react statement");
    };
    assert_eq!(react.cases.len(), 2);
    assert_eq!(react.cases[0].op, CompareOp::Greater);
    assert!(react.default.is_some());
}

#[test]
fn react_without_default() {
    let Stmt::React(react) = stmt("react to x when == 1 { set y = 2 }") else {
        panic!("expected react statement");
    };
    assert!(react.default.is_none());
    assert_eq!(react.cases[0].actions.len(), 1);
}

#[test]
fn react_actions_may_nest_react() {
    let source = r#"
        react to a when > 0 {
            react to b when == 1 { print "inner" }
        }
    "#;
    let Stmt::React(react) = stmt(source) else {
        panic!("expected react statement");
    };
    assert!(matches!(react.cases[0].actions[0], Stmt::React(_)));
}

// ─────────────────────────────────────────────────────────────────────
// Expression precedence
// ─────────────────────────────────────────────────────────────────────

#[test]
fn mul_binds_tighter_than_add() {
    let e = expr("1 + 2 * 3");
    let ExprKind::Binary { op, right, .. } = e.kind else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(
        right.kind,
        ExprKind::Binary { op: BinOp::Mul, .. }
    ));
}

#[test]
fn parens_override_precedence() {
    let e = expr("(1 + 2) * 3");
    let ExprKind::Binary { op, left, .. } = e.kind else {
        panic!("expected binary expression");
    };
    assert_eq!(op, BinOp::Mul);
    assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Add, .. }));
}

#[test]
fn comparison_binds_tighter_than_and() {
    let e = expr("a > 1 and b < 2");
    assert!(matches!(
        e.kind,
        ExprKind::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn or_is_lowest() {
    let e = expr("a and b or c");
    let ExprKind::Logical { op, .. } = e.kind else {
        panic!("expected logical expression");
    };
    assert_eq!(op, LogicalOp::Or);
}

#[test]
fn unary_minus() {
    let e = expr("-x + 1");
    let ExprKind::Binary { left, .. } = e.kind else {
        panic!("expected binary expression");
    };
    assert!(matches!(left.kind, ExprKind::Neg(_)));
}

#[test]
fn comparison_chaining_is_rejected() {
    let msg = parse_error("print 1 < 2 < 3");
    assert!(msg.contains("cannot be chained"), "got: {msg}");
}

// ─────────────────────────────────────────────────────────────────────
// Functional operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn map_with_implicit_element_lhs() {
    let e = expr("map n * 2");
    let ExprKind::Map { source, body } = e.kind else {
        panic!("expected map expression");
    };
    assert!(kind_eq(&source.kind, &path("n")));
    let ExprKind::Binary { left, op, .. } = body.kind else {
        panic!("expected binary body");
    };
    assert_eq!(op, BinOp::Mul);
    assert!(matches!(&left.kind, ExprKind::Element(segs) if segs.is_empty()));
}

#[test]
fn map_with_field_projection() {
    let e = expr("map users .name");
    let ExprKind::Map { body, .. } = e.kind else {
        panic!("expected map expression");
    };
    assert!(
        matches!(&body.kind, ExprKind::Element(segs)
            if matches!(&segs[..], [PathSegment::Field(f)] if f == "name"))
    );
}

#[test]
fn filter_with_compound_predicate() {
    let e = expr("filter n % 2 == 0");
    let ExprKind::Filter { predicate, .. } = e.kind else {
        panic!("expected filter expression");
    };
    // (element % 2) == 0
    let ExprKind::Binary { left, op, .. } = predicate.kind else {
        panic!("expected binary predicate");
    };
    assert_eq!(op, BinOp::Compare(CompareOp::Eq));
    assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Mod, .. }));
}

#[test]
fn map_source_does_not_swallow_the_operator() {
    // The source is a single atom, so `* 2` is the body, not part of
    // the source.
    let e = expr("map a.items * 2");
    let ExprKind::Map { source, .. } = e.kind else {
        panic!("expected map expression");
    };
    assert!(matches!(source.kind, ExprKind::Path(_)));
}

#[test]
fn reduce_takes_operator_and_initial() {
    let e = expr("reduce n + 0");
    let ExprKind::Reduce { op, init, .. } = e.kind else {
        panic!("expected reduce expression");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(init.kind, ExprKind::Number(v) if v == 0.0));
}

#[test]
fn concat_consumes_operands_greedily() {
    let e = expr("concat a b [3]");
    let ExprKind::Concat(operands) = e.kind else {
        panic!("expected concat expression");
    };
    assert_eq!(operands.len(), 3);
}

#[test]
fn concat_bracket_starts_a_new_operand() {
    let e = expr("concat a [1] [2]");
    let ExprKind::Concat(operands) = e.kind else {
        panic!("expected concat expression");
    };
    assert_eq!(operands.len(), 3);
    assert!(matches!(operands[0].kind, ExprKind::Path(_)));
    assert!(matches!(operands[1].kind, ExprKind::Array(_)));
    assert!(matches!(operands[2].kind, ExprKind::Array(_)));
}

#[test]
fn concat_operands_keep_dotted_paths() {
    let e = expr("concat user.tags other.tags");
    let ExprKind::Concat(operands) = e.kind else {
        panic!("expected concat expression");
    };
    assert_eq!(operands.len(), 2);
    let ExprKind::Path(ref p) = operands[0].kind else {
        panic!("expected path operand");
    };
    assert_eq!(p.segments.len(), 2);
}

#[test]
fn concat_stops_before_a_following_statement() {
    let p = program("state { a: [1] }\nprint concat a a\nstate { c: 1 }");
    assert_eq!(p.statements.len(), 3);
    let Stmt::Print(ref print) = p.statements[1] else {
        panic!("expected print statement");
    };
    let ExprKind::Concat(ref operands) = print.expr.kind else {
        panic!("expected concat expression");
    };
    assert_eq!(operands.len(), 2);
}

#[test]
fn len_call() {
    let e = expr("len(items) > 0");
    let ExprKind::Binary { left, .. } = e.kind else {
        panic!("expected binary expression");
    };
    assert!(matches!(left.kind, ExprKind::Len(_)));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn error_reports_expected_and_found() {
    let msg = parse_error("set = 1");
    assert!(msg.contains("expected identifier"), "got: {msg}");
    assert!(msg.contains("'='"), "got: {msg}");
}

#[test]
fn error_carries_position() {
    let msg = parse_error("set x 1");
    assert!(msg.starts_with("1:7:"), "got: {msg}");
}

#[test]
fn react_requires_at_least_one_when() {
    let msg = parse_error("react to x default { print 1 }");
    assert!(msg.contains("'when'"), "got: {msg}");
}

#[test]
fn unclosed_block_is_an_error() {
    let msg = parse_error("react to x when > 1 { print 1");
    assert!(msg.contains("end of input"), "got: {msg}");
}

#[test]
fn top_level_expression_is_not_a_statement() {
    let msg = parse_error("1 + 2");
    assert!(msg.contains("statement"), "got: {msg}");
}

#[test]
fn parse_stops_at_first_error() {
    // Both statements are malformed; only the first is reported.
    let msg = parse_error("set = 1\nset = 2");
    assert!(msg.starts_with("1:5:"), "got: {msg}");
}

#[test]
fn lex_errors_surface_through_the_facade() {
    let err = parse("set x = @").expect_err("should fail");
    assert!(matches!(err, wa_types::SyntaxError::Lex(_)));
}

#[test]
fn parser_accepts_a_stream_without_eof() {
    let program = wa_parser::Parser::new(Vec::new())
        .parse()
        .expect("empty stream should parse");
    assert!(program.statements.is_empty());
}
