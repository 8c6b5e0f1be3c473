//! Arena storage for deduplicated math expressions
mod indexed;
mod op;

use indexed::{IndexMap, define_index};
pub(crate) use indexed::IndexVec;
pub use op::{BinaryOpcode, NaryOpcode, Op, UnaryOpcode};

use crate::Error;

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

define_index!(Node, "An index in the `Context::ops` map");
define_index!(VarNode, "An index in the `Context::vars` map");

/// A `Context` holds a set of deduplicated constants, variables, and
/// operations.
///
/// It should be used like an arena allocator: it grows over time, then frees
/// all of its contents when dropped.  Structurally identical expressions map
/// to the same [`Node`], so a shared subterm is stored (and later evaluated)
/// exactly once.  Deduplication is purely structural: `a * b` and `b * a` are
/// different nodes.
#[derive(Debug, Default)]
pub struct Context {
    ops: IndexMap<Op, Node>,
    vars: IndexMap<String, VarNode>,
}

impl Context {
    /// Build a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the context
    ///
    /// All [`Node`] and [`VarNode`] handles from this context are invalidated.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.vars.clear();
    }

    /// Returns the number of [`Op`] nodes in the context
    ///
    /// ```
    /// # use levelset::context::Context;
    /// let mut ctx = Context::new();
    /// let x = ctx.var("x");
    /// assert_eq!(ctx.len(), 1);
    /// let x2 = ctx.var("x");
    /// assert_eq!(ctx.len(), 1); // deduplicated
    /// assert_eq!(x, x2);
    /// ```
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Checks whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Erases the most recently added node from the tree.
    ///
    /// A few caveats apply, so this must be used with caution:
    /// - Existing handles to the node will be invalidated
    /// - The most recently added node must be unique
    ///
    /// In practice, this is only used to delete temporary operation nodes
    /// during constant folding.  Such nodes have no handles (because they are
    /// never returned) and are guaranteed to be unique (because we never
    /// store foldable operations persistently).
    fn pop(&mut self) -> Result<(), Error> {
        self.ops.pop().map(|_| ())
    }

    /// Looks up the [`Op`] for the given node, if present
    pub(crate) fn get_op(&self, node: Node) -> Option<&Op> {
        self.ops.get_by_index(node)
    }

    /// Looks up the constant associated with the given node.
    ///
    /// If the node is invalid for this tree, returns an error; if the node is
    /// not a constant, returns `Ok(None)`.
    pub fn const_value(&self, n: Node) -> Result<Option<f64>, Error> {
        match self.get_op(n) {
            Some(Op::Const(c)) => Ok(Some(c.0)),
            Some(_) => Ok(None),
            _ => Err(Error::BadNode),
        }
    }

    /// Looks up the variable name associated with the given node.
    ///
    /// If the node is invalid for this tree, returns an error; if the node is
    /// not an `Op::Var`, returns `Ok(None)`.
    pub fn var_name(&self, n: Node) -> Result<Option<&str>, Error> {
        match self.get_op(n) {
            Some(Op::Var(v)) => self.get_var_by_index(*v).map(Some),
            Some(_) => Ok(None),
            _ => Err(Error::BadNode),
        }
    }

    /// Looks up the variable name associated with the given `VarNode`
    pub fn get_var_by_index(&self, n: VarNode) -> Result<&str, Error> {
        match self.vars.get_by_index(n) {
            Some(c) => Ok(c),
            None => Err(Error::BadVar),
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // Primitives

    /// Returns a variable node with the provided name.
    ///
    /// If a variable already exists with this name, then it is returned.
    ///
    /// ```
    /// # use levelset::context::Context;
    /// # use std::collections::BTreeMap;
    /// let mut ctx = Context::new();
    /// let x = ctx.var("x");
    /// let vars = BTreeMap::from([(String::from("x"), 2.0)]);
    /// assert_eq!(ctx.eval(x, &vars).unwrap(), 2.0);
    /// ```
    pub fn var(&mut self, name: &str) -> Node {
        let v = self.vars.insert(String::from(name));
        self.ops.insert(Op::Var(v))
    }

    /// Returns a node representing the given constant value.
    /// ```
    /// # let mut ctx = levelset::context::Context::new();
    /// let v = ctx.constant(3.0);
    /// assert_eq!(ctx.const_value(v).unwrap(), Some(3.0));
    /// ```
    pub fn constant(&mut self, f: f64) -> Node {
        self.ops.insert(Op::Const(OrderedFloat(f)))
    }

    ////////////////////////////////////////////////////////////////////////////
    // Operations, with constant folding on insertion

    /// Find or create a [`Node`] for the given unary operation, with constant
    /// folding.
    pub fn unary(&mut self, op: UnaryOpcode, a: Node) -> Result<Node, Error> {
        let fold = matches!(self.get_op(a).ok_or(Error::BadNode)?, Op::Const(_));
        // This call to `insert` always inserts, because foldable operations
        // are never stored persistently (we pop them right afterwards)
        let n = self.ops.insert(Op::Unary(op, a));
        let out = if fold {
            let v = self.eval(n, &BTreeMap::new())?;
            self.pop()?; // removes `n`
            self.constant(v)
        } else {
            n
        };
        Ok(out)
    }

    /// Find or create a [`Node`] for the given binary operation, with constant
    /// folding.
    pub fn binary(
        &mut self,
        op: BinaryOpcode,
        a: Node,
        b: Node,
    ) -> Result<Node, Error> {
        let fold = matches!(self.get_op(a).ok_or(Error::BadNode)?, Op::Const(_))
            && matches!(self.get_op(b).ok_or(Error::BadNode)?, Op::Const(_));
        let n = self.ops.insert(Op::Binary(op, a, b));
        let out = if fold {
            let v = self.eval(n, &BTreeMap::new())?;
            self.pop()?; // removes `n`
            self.constant(v)
        } else {
            n
        };
        Ok(out)
    }

    /// Find or create a [`Node`] for the given n-ary operation, with constant
    /// folding.
    ///
    /// A single-argument call collapses immediately: `min` and `max` of one
    /// value are that value, and `hypot` of one value is its absolute value.
    pub fn nary(
        &mut self,
        op: NaryOpcode,
        args: Vec<Node>,
    ) -> Result<Node, Error> {
        match args.len() {
            0 => {
                let name = match op {
                    NaryOpcode::Min => "min",
                    NaryOpcode::Max => "max",
                    NaryOpcode::Hypot => "hypot",
                };
                return Err(Error::WrongArgumentCount(format!("{name}(a,b)")));
            }
            1 => {
                return match op {
                    NaryOpcode::Min | NaryOpcode::Max => {
                        self.get_op(args[0]).ok_or(Error::BadNode)?;
                        Ok(args[0])
                    }
                    NaryOpcode::Hypot => self.unary(UnaryOpcode::Abs, args[0]),
                };
            }
            _ => (),
        }
        let mut fold = true;
        for a in &args {
            fold &=
                matches!(self.get_op(*a).ok_or(Error::BadNode)?, Op::Const(_));
        }
        let n = self.ops.insert(Op::Nary(op, args));
        let out = if fold {
            let v = self.eval(n, &BTreeMap::new())?;
            self.pop()?; // removes `n`
            self.constant(v)
        } else {
            n
        };
        Ok(out)
    }

    /// Builds an addition node
    /// ```
    /// # let mut ctx = levelset::context::Context::new();
    /// let a = ctx.constant(1.0);
    /// let b = ctx.constant(2.0);
    /// let op = ctx.add(a, b).unwrap();
    /// assert_eq!(ctx.const_value(op).unwrap(), Some(3.0));
    /// ```
    pub fn add(&mut self, a: Node, b: Node) -> Result<Node, Error> {
        self.binary(BinaryOpcode::Add, a, b)
    }

    /// Builds a subtraction node
    pub fn sub(&mut self, a: Node, b: Node) -> Result<Node, Error> {
        self.binary(BinaryOpcode::Sub, a, b)
    }

    /// Builds a multiplication node
    pub fn mul(&mut self, a: Node, b: Node) -> Result<Node, Error> {
        self.binary(BinaryOpcode::Mul, a, b)
    }

    /// Builds a division node
    pub fn div(&mut self, a: Node, b: Node) -> Result<Node, Error> {
        self.binary(BinaryOpcode::Div, a, b)
    }

    /// Builds the operation for a canonical operator name.
    ///
    /// `atan` with two arguments resolves to [`BinaryOpcode::Atan2`]; every
    /// other name maps to exactly one opcode, with the argument count checked
    /// against its arity.
    pub(crate) fn op_from_name(
        &mut self,
        name: &str,
        args: Vec<Node>,
    ) -> Result<Node, Error> {
        if name == "atan" && args.len() == 2 {
            return self.binary(BinaryOpcode::Atan2, args[0], args[1]);
        }
        if let Some(op) = UnaryOpcode::from_name(name) {
            return match args.len() {
                1 => self.unary(op, args[0]),
                _ => Err(Error::WrongArgumentCount(format!("{name}(a)"))),
            };
        }
        if let Some(op) = BinaryOpcode::from_name(name) {
            return match args.len() {
                2 => self.binary(op, args[0], args[1]),
                _ => Err(Error::WrongArgumentCount(format!("{name}(a,b)"))),
            };
        }
        if let Some(op) = NaryOpcode::from_name(name) {
            return self.nary(op, args);
        }
        Err(Error::UndefinedOperator(name.to_owned()))
    }

    ////////////////////////////////////////////////////////////////////////////

    /// Evaluates the given node with a set of variable values.
    ///
    /// This walks the graph recursively with a memo table, which is fine for
    /// constant folding and tests; rendering should build a
    /// [`ValueEval`](crate::eval::ValueEval) instead.
    pub fn eval(
        &self,
        root: Node,
        vars: &BTreeMap<String, f64>,
    ) -> Result<f64, Error> {
        let mut cache = vec![None; self.ops.len()].into();
        self.eval_inner(root, vars, &mut cache)
    }

    fn eval_inner(
        &self,
        node: Node,
        vars: &BTreeMap<String, f64>,
        cache: &mut IndexVec<Option<f64>, Node>,
    ) -> Result<f64, Error> {
        let op = self.get_op(node).ok_or(Error::BadNode)?;
        if let Some(v) = cache[node] {
            return Ok(v);
        }
        let mut get = |n: Node| self.eval_inner(n, vars, cache);
        let v = match op {
            Op::Var(v) => {
                let name = self
                    .vars
                    .get_by_index(*v)
                    .ok_or(Error::BadVar)?;
                *vars
                    .get(name)
                    .ok_or_else(|| Error::UnknownVariable(name.to_owned()))?
            }
            Op::Const(c) => c.0,
            Op::Unary(op, a) => op.eval_value(get(*a)?),
            Op::Binary(op, a, b) => {
                let a = get(*a)?;
                let b = get(*b)?;
                op.eval_value(a, b)
            }
            Op::Nary(op, args) => {
                let mut vs = Vec::with_capacity(args.len());
                for a in args {
                    vs.push(get(*a)?);
                }
                op.eval_value(&vs)
            }
        };
        cache[node] = Some(v);
        Ok(v)
    }
}

////////////////////////////////////////////////////////////////////////////////
