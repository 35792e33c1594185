//! Formula abstract syntax tree.
//!
//! Produced by [`parse_formula`](super::parse_formula) and owned by the
//! formula [`Cell`](super::Cell) that parsed it. Numbers and references are
//! leaves; everything else has one or two boxed children.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::mem;

use super::CellId;

/// Arithmetic operator of a binary node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => left / right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// A parsed formula.
///
/// Every traversal, including `Clone`, `PartialEq` and `Drop`, walks the tree
/// with an explicit stack, so arbitrarily deep formulas (long `1+1+...`
/// chains, runs of unary minus) cannot exhaust the call stack.
pub enum FormulaNode {
    Number(f64),
    Reference(CellId),
    Binary {
        op: BinaryOp,
        left: Box<FormulaNode>,
        right: Box<FormulaNode>,
    },
    Negate(Box<FormulaNode>),
}

const TREE_INDENT: usize = 2;

/// Leaf payload handed to [`FormulaNode::fold`].
enum Leaf<'n> {
    Number(f64),
    Reference(&'n CellId),
}

/// Continuation of an interior node while one of its operands is folded.
enum Frame<'n, T> {
    AwaitLeft { op: BinaryOp, right: &'n FormulaNode },
    AwaitRight { op: BinaryOp, left: T },
    Negate,
}

impl FormulaNode {
    pub fn binary(op: BinaryOp, left: FormulaNode, right: FormulaNode) -> FormulaNode {
        FormulaNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn negate(operand: FormulaNode) -> FormulaNode {
        FormulaNode::Negate(Box::new(operand))
    }

    fn has_children(&self) -> bool {
        matches!(self, FormulaNode::Binary { .. } | FormulaNode::Negate(_))
    }

    /// Every cell referenced anywhere in the tree.
    pub fn references(&self) -> HashSet<CellId> {
        let mut refs = HashSet::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                FormulaNode::Number(_) => {}
                FormulaNode::Reference(id) => {
                    refs.insert(id.clone());
                }
                FormulaNode::Binary { left, right, .. } => {
                    pending.push(left);
                    pending.push(right);
                }
                FormulaNode::Negate(operand) => pending.push(operand),
            }
        }
        refs
    }

    /// Post-order fold, left operand before right. The first `leaf` error
    /// stops the walk.
    fn fold<T, E>(
        &self,
        mut leaf: impl FnMut(Leaf<'_>) -> Result<T, E>,
        mut binary: impl FnMut(BinaryOp, T, T) -> T,
        mut negate: impl FnMut(T) -> T,
    ) -> Result<T, E> {
        let mut frames: Vec<Frame<'_, T>> = Vec::new();
        let mut node = self;
        loop {
            let mut value = loop {
                match node {
                    FormulaNode::Number(n) => break leaf(Leaf::Number(*n))?,
                    FormulaNode::Reference(id) => break leaf(Leaf::Reference(id))?,
                    FormulaNode::Binary { op, left, right } => {
                        frames.push(Frame::AwaitLeft {
                            op: *op,
                            right: right.as_ref(),
                        });
                        node = left.as_ref();
                    }
                    FormulaNode::Negate(operand) => {
                        frames.push(Frame::Negate);
                        node = operand.as_ref();
                    }
                }
            };

            loop {
                match frames.pop() {
                    None => return Ok(value),
                    Some(Frame::Negate) => value = negate(value),
                    Some(Frame::AwaitRight { op, left }) => value = binary(op, left, value),
                    Some(Frame::AwaitLeft { op, right }) => {
                        frames.push(Frame::AwaitRight { op, left: value });
                        node = right;
                        break;
                    }
                }
            }
        }
    }

    /// Post-order evaluation. `resolve` supplies the value of a referenced
    /// cell or the reason it cannot be used.
    pub fn eval<E, F>(&self, resolve: &F) -> Result<f64, E>
    where
        F: Fn(&CellId) -> Result<f64, E>,
    {
        self.fold(
            |leaf| match leaf {
                Leaf::Number(n) => Ok(n),
                Leaf::Reference(id) => resolve(id),
            },
            |op, l, r| op.apply(l, r),
            |v| -v,
        )
    }

    /// Indented one-node-per-line dump, children below their parent.
    pub fn tree(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![(self, 0usize)];
        while let Some((node, indent)) = pending.pop() {
            out.push_str(&" ".repeat(indent));
            match node {
                FormulaNode::Number(n) => out.push_str(&n.to_string()),
                FormulaNode::Reference(id) => out.push_str(id.as_str()),
                FormulaNode::Binary { op, left, right } => {
                    out.push_str(op.symbol());
                    pending.push((right.as_ref(), indent + TREE_INDENT));
                    pending.push((left.as_ref(), indent + TREE_INDENT));
                }
                FormulaNode::Negate(operand) => {
                    out.push_str("negate");
                    pending.push((operand.as_ref(), indent + TREE_INDENT));
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Clone for FormulaNode {
    fn clone(&self) -> Self {
        let copied: Result<FormulaNode, Infallible> = self.fold(
            |leaf| {
                Ok(match leaf {
                    Leaf::Number(n) => FormulaNode::Number(n),
                    Leaf::Reference(id) => FormulaNode::Reference(id.clone()),
                })
            },
            FormulaNode::binary,
            FormulaNode::negate,
        );
        match copied {
            Ok(node) => node,
            Err(never) => match never {},
        }
    }
}

impl PartialEq for FormulaNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (FormulaNode::Number(a), FormulaNode::Number(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (FormulaNode::Reference(a), FormulaNode::Reference(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    FormulaNode::Binary {
                        op: op_a,
                        left: left_a,
                        right: right_a,
                    },
                    FormulaNode::Binary {
                        op: op_b,
                        left: left_b,
                        right: right_b,
                    },
                ) => {
                    if op_a != op_b {
                        return false;
                    }
                    pending.push((left_a.as_ref(), left_b.as_ref()));
                    pending.push((right_a.as_ref(), right_b.as_ref()));
                }
                (FormulaNode::Negate(a), FormulaNode::Negate(b)) => {
                    pending.push((a.as_ref(), b.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Detach interior children onto a heap stack so dropping a deep tree does
/// not recurse once per level.
impl Drop for FormulaNode {
    fn drop(&mut self) {
        if !self.has_children() {
            return;
        }
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut FormulaNode, out: &mut Vec<FormulaNode>) {
    let mut take = |child: &mut Box<FormulaNode>| {
        if child.has_children() {
            out.push(mem::replace(child.as_mut(), FormulaNode::Number(0.0)));
        }
    };
    match node {
        FormulaNode::Binary { left, right, .. } => {
            take(left);
            take(right);
        }
        FormulaNode::Negate(operand) => take(operand),
        FormulaNode::Number(_) | FormulaNode::Reference(_) => {}
    }
}

/// Fully parenthesized infix form.
impl fmt::Display for FormulaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'n> {
            Node(&'n FormulaNode),
            Text(&'static str),
        }

        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(FormulaNode::Number(n)) => write!(f, "{}", n)?,
                Piece::Node(FormulaNode::Reference(id)) => write!(f, "{}", id)?,
                Piece::Node(FormulaNode::Binary { op, left, right }) => {
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Node(right.as_ref()));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Text(op.symbol()));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Node(left.as_ref()));
                    pending.push(Piece::Text("("));
                }
                Piece::Node(FormulaNode::Negate(operand)) => {
                    pending.push(Piece::Node(operand.as_ref()));
                    pending.push(Piece::Text("-"));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FormulaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormulaNode({})", self)
    }
}
