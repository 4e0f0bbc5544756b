//! AST node types for Whatalang.
//!
//! Every node carries a [`Span`] for error reporting. Recursive variants
//! are boxed to keep enum sizes reasonable. Paths are *not* resolved at
//! parse time: a [`PathExpr`] holds its segment sub-expressions and is
//! resolved against the current state tree on every evaluation.

use crate::Span;

/// A complete Whatalang program: an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

// ══════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════

/// A top-level (or action-block) statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `state { key: expr, ... }`
    State(StateDecl),
    /// `react to path when <op> expr { ... } ... default { ... }`
    React(ReactStmt),
    /// `set path = expr`
    Set(SetStmt),
    /// `print expr`
    Print(PrintStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::State(s) => s.span,
            Stmt::React(s) => s.span,
            Stmt::Set(s) => s.span,
            Stmt::Print(s) => s.span,
        }
    }
}

/// `state { counter: 0, user: { name: "Alice" } }`
///
/// Entries are evaluated once, in order, and merged into the state root.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDecl {
    pub entries: Vec<(String, Expr)>,
    pub span: Span,
}

/// `set user.age = 26`
#[derive(Debug, Clone, PartialEq)]
pub struct SetStmt {
    pub target: PathExpr,
    pub value: Expr,
    pub span: Span,
}

/// `print counter`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `react to counter when > 10 { ... } when > 5 { ... } default { ... }`
///
/// Executing this statement registers a standing watch; it only starts
/// watching once the statement itself executes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactStmt {
    pub target: PathExpr,
    pub cases: Vec<WhenCase>,
    pub default: Option<Vec<Stmt>>,
    pub span: Span,
}

/// One `when <op> <expr> { actions }` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenCase {
    pub op: CompareOp,
    pub rhs: Expr,
    pub actions: Vec<Stmt>,
    pub span: Span,
}

/// The comparison operator of a `when` clause or a binary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessEq => "<=",
            CompareOp::GreaterEq => ">=",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════════════

/// A path into the state tree: `user.profile.settings[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    /// At least one segment; the first is always a field name.
    pub segments: Vec<PathSegment>,
    pub span: Span,
}

/// One path segment: a field name or a dynamic index expression.
///
/// Index expressions are evaluated against current state at use time,
/// so the same AST node may address different slots as the tree mutates.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(Expr),
}

// ══════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// `[expr, ...]`
    Array(Vec<Expr>),
    /// `{ key: expr, ... }`
    Object(Vec<(String, Expr)>),

    // ── References ──
    /// A state-tree path reference, resolved freshly on every evaluation.
    Path(PathExpr),
    /// The whole state tree (`print state`).
    StateRef,
    /// The implicit element of an enclosing `map`/`filter`, optionally
    /// projected through path segments (`.name`, `.scores[0]`). Empty
    /// segments denote the element itself (the bare LHS slot in `* 2`).
    Element(Vec<PathSegment>),

    // ── Operators ──
    /// `-x`
    Neg(Box<Expr>),
    /// `a + b`, `a == b`, ...
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `a and b`, `a or b`, short-circuiting.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // ── Functional operators ──
    /// `map <source> <op-expr>`
    Map {
        source: Box<Expr>,
        body: Box<Expr>,
    },
    /// `filter <source> <predicate>`
    Filter {
        source: Box<Expr>,
        predicate: Box<Expr>,
    },
    /// `reduce <source> <op> <initial>`: left fold `acc <op> element`.
    Reduce {
        source: Box<Expr>,
        op: BinOp,
        init: Box<Expr>,
    },
    /// `concat <array> <array>...`
    Concat(Vec<Expr>),

    // ── Built-ins ──
    /// `len(expr)`: array length or string character count.
    Len(Box<Expr>),
}

/// Binary operators: arithmetic and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Compare(CompareOp),
}

impl BinOp {
    /// The operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Compare(op) => op.as_str(),
        }
    }
}

/// Short-circuiting logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}
