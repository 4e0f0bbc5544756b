//! Expression evaluation.
//!
//! The evaluator is pure with respect to state: it reads through the
//! store but never mutates it. Results of `map`/`filter`/`reduce`/
//! `concat` are freshly allocated and share nothing with the live
//! tree.

use indexmap::IndexMap;
use wa_types::ast::{BinOp, CompareOp, Expr, ExprKind, LogicalOp, PathExpr, PathSegment};
use wa_types::{render, Value};

use crate::error::{RuntimeError, RuntimeResult};
use crate::store::{PathStep, ResolvedPath, StateStore};

/// Expression evaluator over a borrowed store, optionally carrying the
/// implicit element of an enclosing `map`/`filter`.
pub struct Evaluator<'a> {
    store: &'a StateStore,
    element: Option<&'a Value>,
}

impl<'a> Evaluator<'a> {
    /// An evaluator with no implicit element bound.
    pub fn new(store: &'a StateStore) -> Self {
        Self {
            store,
            element: None,
        }
    }

    /// Re-borrow with `element` bound as the implicit operand.
    fn bind<'b>(&'b self, element: &'b Value) -> Evaluator<'b> {
        Evaluator {
            store: self.store,
            element: Some(element),
        }
    }

    /// Evaluate an expression to a value.
    pub fn eval(&self, expr: &Expr) -> RuntimeResult<Value> {
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),

            ExprKind::Array(elements) => {
                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    out.push(self.eval(element)?);
                }
                Ok(Value::Array(out))
            }
            ExprKind::Object(fields) => {
                let mut map = IndexMap::with_capacity(fields.len());
                for (key, value) in fields {
                    map.insert(key.clone(), self.eval(value)?);
                }
                Ok(Value::Object(map))
            }

            ExprKind::Path(path) => {
                let resolved = self.resolve_path(path)?;
                self.store.get(&resolved)
            }
            ExprKind::StateRef => Ok(self.store.root().clone()),
            ExprKind::Element(segments) => self.eval_element(segments),

            ExprKind::Neg(operand) => match self.eval(operand)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(RuntimeError::Type(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
            ExprKind::Binary { left, op, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                eval_binary(*op, left, right)
            }
            ExprKind::Logical { op, left, right } => self.eval_logical(*op, left, right),

            ExprKind::Map { source, body } => {
                let items = self.eval_array_source(source, "map")?;
                let mut out = Vec::with_capacity(items.len());
                for item in &items {
                    out.push(self.bind(item).eval(body)?);
                }
                Ok(Value::Array(out))
            }
            ExprKind::Filter { source, predicate } => {
                let items = self.eval_array_source(source, "filter")?;
                let mut out = Vec::new();
                for item in items {
                    if self.bind(&item).eval(predicate)?.is_truthy() {
                        out.push(item);
                    }
                }
                Ok(Value::Array(out))
            }
            ExprKind::Reduce { source, op, init } => {
                let items = self.eval_array_source(source, "reduce")?;
                let mut acc = self.eval(init)?;
                for item in items {
                    acc = eval_binary(*op, acc, item)?;
                }
                Ok(acc)
            }
            ExprKind::Concat(operands) => {
                let mut out = Vec::new();
                for operand in operands {
                    match self.eval(operand)? {
                        Value::Array(items) => out.extend(items),
                        other => {
                            return Err(RuntimeError::Type(format!(
                                "concat expects arrays, got {}",
                                other.type_name()
                            )))
                        }
                    }
                }
                Ok(Value::Array(out))
            }

            ExprKind::Len(arg) => match self.eval(arg)? {
                Value::Array(items) => Ok(Value::Number(items.len() as f64)),
                Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
                other => Err(RuntimeError::Type(format!(
                    "len expects an array or string, got {}",
                    other.type_name()
                ))),
            },
        }
    }

    /// Resolve an AST path to concrete steps, evaluating dynamic index
    /// expressions against the current state.
    pub fn resolve_path(&self, path: &PathExpr) -> RuntimeResult<ResolvedPath> {
        let mut steps = Vec::with_capacity(path.segments.len());
        for segment in &path.segments {
            steps.push(self.resolve_segment(segment)?);
        }
        Ok(steps)
    }

    fn resolve_segment(&self, segment: &PathSegment) -> RuntimeResult<PathStep> {
        match segment {
            PathSegment::Field(name) => Ok(PathStep::Key(name.clone())),
            PathSegment::Index(expr) => match self.eval(expr)? {
                Value::Number(n) if n.fract() == 0.0 => Ok(PathStep::Index(n as i64)),
                other => Err(RuntimeError::Type(format!(
                    "array index must be an integer, got {}",
                    render(&other)
                ))),
            },
        }
    }

    /// The implicit element, projected through `segments`.
    fn eval_element(&self, segments: &[PathSegment]) -> RuntimeResult<Value> {
        let element = self.element.ok_or_else(|| {
            RuntimeError::Type("element reference outside map/filter".into())
        })?;
        let mut current = element.clone();
        for segment in segments {
            let step = self.resolve_segment(segment)?;
            current = read_step(&current, &step)?;
        }
        Ok(current)
    }

    /// Evaluate a functional operator's source, requiring an array.
    fn eval_array_source(&self, source: &Expr, op: &str) -> RuntimeResult<Vec<Value>> {
        match self.eval(source)? {
            Value::Array(items) => Ok(items),
            other => Err(RuntimeError::Type(format!(
                "{op} expects an array, got {}",
                other.type_name()
            ))),
        }
    }

    fn eval_logical(&self, op: LogicalOp, left: &Expr, right: &Expr) -> RuntimeResult<Value> {
        let left = self.eval(left)?.is_truthy();
        let result = match op {
            LogicalOp::And => {
                if left {
                    self.eval(right)?.is_truthy()
                } else {
                    false
                }
            }
            LogicalOp::Or => {
                if left {
                    true
                } else {
                    self.eval(right)?.is_truthy()
                }
            }
        };
        Ok(Value::Bool(result))
    }
}

/// One step of projection into an already-evaluated value (used by
/// element projections, which do not live in the store).
fn read_step(value: &Value, step: &PathStep) -> RuntimeResult<Value> {
    match (value, step) {
        (Value::Object(map), PathStep::Key(key)) => {
            map.get(key).cloned().ok_or_else(|| RuntimeError::Path {
                path: key.clone(),
                segment: 1,
            })
        }
        (Value::Array(items), PathStep::Index(idx)) => {
            let len = items.len();
            let slot = if *idx < 0 { *idx + len as i64 } else { *idx };
            if slot < 0 || slot as usize >= len {
                return Err(RuntimeError::Index { index: *idx, len });
            }
            Ok(items[slot as usize].clone())
        }
        _ => Err(RuntimeError::Type(format!(
            "cannot project into {}",
            value.type_name()
        ))),
    }
}

/// Apply a binary operator to two evaluated operands.
pub(crate) fn eval_binary(op: BinOp, left: Value, right: Value) -> RuntimeResult<Value> {
    match op {
        BinOp::Add => eval_add(left, right),
        BinOp::Sub => eval_arith(op, left, right, |a, b| Ok(a - b)),
        BinOp::Mul => eval_arith(op, left, right, |a, b| Ok(a * b)),
        BinOp::Div => eval_arith(op, left, right, |a, b| {
            if b == 0.0 {
                Err(RuntimeError::Arithmetic("division by zero".into()))
            } else {
                Ok(a / b)
            }
        }),
        BinOp::Mod => eval_arith(op, left, right, |a, b| {
            if b == 0.0 {
                Err(RuntimeError::Arithmetic("modulo by zero".into()))
            } else {
                Ok(a % b)
            }
        }),
        BinOp::Compare(cmp) => Ok(Value::Bool(compare(cmp, &left, &right)?)),
    }
}

/// `+` adds numbers, or concatenates when either side is a string (the
/// other side is rendered).
fn eval_add(left: Value, right: Value) -> RuntimeResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(a), b) => Ok(Value::Str(a + &render(&b))),
        (a, Value::Str(b)) => Ok(Value::Str(render(&a) + &b)),
        (a, b) => Err(RuntimeError::Type(format!(
            "cannot apply '+' to {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn eval_arith(
    op: BinOp,
    left: Value,
    right: Value,
    apply: impl FnOnce(f64, f64) -> RuntimeResult<f64>,
) -> RuntimeResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(apply(a, b)?)),
        (a, b) => Err(RuntimeError::Type(format!(
            "cannot apply '{}' to {} and {}",
            op.as_str(),
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Comparison semantics shared by expressions and `when` cases.
///
/// `==`/`!=` allow cross-type operands and are unequal across differing
/// types; ordering requires two numbers or two strings.
pub(crate) fn compare(op: CompareOp, left: &Value, right: &Value) -> RuntimeResult<bool> {
    match op {
        CompareOp::Eq => Ok(left == right),
        CompareOp::NotEq => Ok(left != right),
        _ => {
            let ordering = match (left, right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => None,
            };
            let ordering = ordering.ok_or_else(|| {
                RuntimeError::Type(format!(
                    "cannot order {} and {} with '{}'",
                    left.type_name(),
                    right.type_name(),
                    op.as_str()
                ))
            })?;
            Ok(match op {
                CompareOp::Less => ordering.is_lt(),
                CompareOp::Greater => ordering.is_gt(),
                CompareOp::LessEq => ordering.is_le(),
                CompareOp::GreaterEq => ordering.is_ge(),
                CompareOp::Eq | CompareOp::NotEq => unreachable!(),
            })
        }
    }
}
