//! Evaluation of compiled expressions, pointwise and over boxes
//!
//! Both evaluators flatten a [`Context`] subtree into a straight-line tape
//! (one instruction per node, in dependency order), then interpret that tape
//! with a slot buffer that is reused across calls.  Shared subexpressions are
//! computed once, because deduplication in the arena makes them a single
//! node.
//!
//! [`ValueEval`] produces plain `f64` samples.  [`RangeEval`] runs the same
//! tape in interval arithmetic and classifies the result interval into a
//! [`RangeResult`], which is what the adaptive solvers consume.

use crate::{
    context::{
        BinaryOpcode, Context, IndexVec, NaryOpcode, Node, Op, UnaryOpcode,
    },
    types::{Interval, Taint},
    Error,
};

/// Tolerance around zero when classifying a result interval
const EPS: f64 = 1e-15;

/// Classification of an expression's sign over a box
///
/// The first four variants are *determined*: the box needs no further
/// subdivision.  The remaining variants are ambiguous and the box must be
/// split (or handed to the finest-level edge pass).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RangeResult {
    /// The expression is exactly zero over the whole box
    Zero,
    /// The expression is negative over the whole box
    AllNegative,
    /// The expression is positive over the whole box
    AllPositive,
    /// No point of the box evaluates to a real number
    AllNan,
    /// The sign varies (or cannot be pinned down) over the box
    Mixed,
    /// The sign varies and a discontinuity crosses the box, so samples on
    /// opposite sides of it must not be interpolated
    MixedGap,
    /// The sign varies and part of the box is outside the expression's
    /// domain
    MixedNan,
}

impl RangeResult {
    /// Checks whether subdivision can stop for this box
    pub fn is_determined(self) -> bool {
        matches!(
            self,
            RangeResult::Zero
                | RangeResult::AllNegative
                | RangeResult::AllPositive
                | RangeResult::AllNan
        )
    }

    /// Checks whether a finest-level box should go to the dense edge pass
    ///
    /// [`RangeResult::MixedNan`] boxes are excluded: their samples would
    /// interpolate across a domain edge.
    pub fn needs_edge_pass(self) -> bool {
        matches!(self, RangeResult::Mixed | RangeResult::MixedGap)
    }
}

/// Which sign regions the caller will paint as filled area
///
/// Comes from the comparison mode of the formula: `=` paints nothing,
/// `>` and `>=` paint the positive side, and a bare expression (no
/// comparator) paints both.  A painted region that contains a domain hole
/// must keep subdividing so the hole is carved out, so a NaN taint
/// downgrades a determined sign only when that sign is painted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CompareOption {
    /// The positive region will be painted
    pub pos: bool,
    /// The negative region will be painted
    pub neg: bool,
}

impl CompareOption {
    /// Paint nothing; only the zero set is of interest
    pub const NONE: Self = CompareOption {
        pos: false,
        neg: false,
    };
}

impl From<crate::parse::CompareMode> for CompareOption {
    /// Derives the painted regions from a comparison mode
    ///
    /// Everything except `=` paints its positive side; only a bare
    /// expression (plotted as a sign map) paints the negative side too.
    fn from(mode: crate::parse::CompareMode) -> Self {
        use crate::parse::CompareMode;
        CompareOption {
            pos: mode != CompareMode::Eq,
            neg: mode == CompareMode::Unordered,
        }
    }
}

////////////////////////////////////////////////////////////////////////////

/// One instruction in a flattened expression
///
/// Instruction `i` writes slot `i`, so no output field is needed; n-ary
/// argument lists live in a side buffer on the [`Tape`].
#[derive(Copy, Clone, Debug)]
enum TapeOp {
    /// Loads a constant
    Const(f64),
    /// Loads the axis variable with the given position
    Axis(u32),
    Unary(UnaryOpcode, u32),
    Binary(BinaryOpcode, u32, u32),
    /// Operation on `len` argument slots starting at `start` in the side
    /// buffer
    Nary(NaryOpcode, u32, u32),
}

/// Straight-line program extracted from a [`Context`] subtree
#[derive(Clone, Debug)]
struct Tape {
    ops: Vec<TapeOp>,
    /// Argument slots for `TapeOp::Nary` instructions
    args: Vec<u32>,
    axis_count: usize,
}

impl Tape {
    /// Flattens the subtree under `root` into dependency order
    ///
    /// Variables are resolved positionally against `axes`; a variable that
    /// is not an axis returns [`Error::UnknownVariable`], and a `root` from
    /// a different context returns [`Error::BadNode`].
    fn new(ctx: &Context, root: Node, axes: &[&str]) -> Result<Self, Error> {
        let mut slot: IndexVec<Option<u32>, Node> =
            vec![None; ctx.len()].into();
        let mut ops = vec![];
        let mut args = vec![];

        // Pairs are (node, children already scheduled); a node may be pushed
        // more than once, so emission checks the slot map.
        let mut todo = vec![(root, false)];
        while let Some((node, ready)) = todo.pop() {
            if slot[node].is_some() {
                continue;
            }
            let op = ctx.get_op(node).ok_or(Error::BadNode)?;
            if !ready {
                todo.push((node, true));
                for child in op.iter_children() {
                    todo.push((child, false));
                }
                continue;
            }
            let get = |n: Node| slot[n].unwrap();
            let t = match op {
                Op::Const(c) => TapeOp::Const(c.0),
                Op::Var(..) => {
                    let name = ctx.var_name(node)?.unwrap();
                    let i = axes
                        .iter()
                        .position(|a| *a == name)
                        .ok_or_else(|| {
                            Error::UnknownVariable(name.to_owned())
                        })?;
                    TapeOp::Axis(i as u32)
                }
                Op::Unary(op, a) => TapeOp::Unary(*op, get(*a)),
                Op::Binary(op, a, b) => {
                    TapeOp::Binary(*op, get(*a), get(*b))
                }
                Op::Nary(op, ns) => {
                    let start = args.len() as u32;
                    args.extend(ns.iter().map(|n| get(*n)));
                    TapeOp::Nary(*op, start, ns.len() as u32)
                }
            };
            slot[node] = Some(ops.len() as u32);
            ops.push(t);
        }
        Ok(Tape {
            ops,
            args,
            axis_count: axes.len(),
        })
    }

    fn len(&self) -> usize {
        self.ops.len()
    }
}

////////////////////////////////////////////////////////////////////////////

/// Pointwise evaluator for a single expression
///
/// ```
/// # use levelset::{Context, eval::ValueEval};
/// let mut ctx = Context::new();
/// let x = ctx.var("x");
/// let y = ctx.var("y");
/// let root = ctx.mul(x, y).unwrap();
/// let mut eval = ValueEval::new(&ctx, root, &["x", "y"]).unwrap();
/// assert_eq!(eval.eval2(3.0, 2.0), 6.0);
/// ```
#[derive(Debug)]
pub struct ValueEval {
    tape: Tape,
    slots: Vec<f64>,
    scratch: Vec<f64>,
}

impl ValueEval {
    /// Builds an evaluator for the subtree under `root`
    ///
    /// `axes` gives the free variables in call-argument order.
    pub fn new(
        ctx: &Context,
        root: Node,
        axes: &[&str],
    ) -> Result<Self, Error> {
        let tape = Tape::new(ctx, root, axes)?;
        let slots = vec![0.0; tape.len()];
        Ok(ValueEval {
            tape,
            slots,
            scratch: vec![],
        })
    }

    /// Evaluates at the given axis values
    pub fn eval(&mut self, vars: &[f64]) -> f64 {
        debug_assert_eq!(vars.len(), self.tape.axis_count);
        let Self {
            tape,
            slots,
            scratch,
        } = self;
        for (i, op) in tape.ops.iter().enumerate() {
            let v = match *op {
                TapeOp::Const(c) => c,
                TapeOp::Axis(a) => vars[a as usize],
                TapeOp::Unary(op, a) => op.eval_value(slots[a as usize]),
                TapeOp::Binary(op, a, b) => {
                    op.eval_value(slots[a as usize], slots[b as usize])
                }
                TapeOp::Nary(op, start, len) => {
                    scratch.clear();
                    scratch.extend(
                        tape.args[start as usize..][..len as usize]
                            .iter()
                            .map(|&a| slots[a as usize]),
                    );
                    op.eval_value(scratch)
                }
            };
            slots[i] = v;
        }
        slots[tape.len() - 1]
    }

    /// Evaluates at the given `(x, y)` position
    pub fn eval2(&mut self, x: f64, y: f64) -> f64 {
        self.eval(&[x, y])
    }

    /// Evaluates at the given `(x, y, z)` position
    pub fn eval3(&mut self, x: f64, y: f64, z: f64) -> f64 {
        self.eval(&[x, y, z])
    }
}

////////////////////////////////////////////////////////////////////////////

/// Interval evaluator for a single expression
///
/// Runs the tape in interval arithmetic, OR-ing together the [`Taint`]
/// raised by every instruction, then classifies the root bound:
///
/// 1. a NaN bound is [`RangeResult::AllNan`];
/// 2. a bound above `+1e-15` is [`RangeResult::AllPositive`], unless the
///    positive region is painted and carries a NaN taint;
/// 3. symmetrically for [`RangeResult::AllNegative`];
/// 4. an exactly-zero, taint-free bound is [`RangeResult::Zero`];
/// 5. anything else is mixed, with NaN taking precedence over gap.
pub struct RangeEval {
    tape: Tape,
    slots: Vec<Interval>,
    scratch: Vec<Interval>,
    opts: CompareOption,
}

impl RangeEval {
    /// Builds an interval evaluator for the subtree under `root`
    pub fn new(
        ctx: &Context,
        root: Node,
        axes: &[&str],
        opts: CompareOption,
    ) -> Result<Self, Error> {
        let tape = Tape::new(ctx, root, axes)?;
        let slots = vec![Interval::from(0.0); tape.len()];
        Ok(RangeEval {
            tape,
            slots,
            scratch: vec![],
            opts,
        })
    }

    /// Computes a bound over the given axis intervals, without classifying
    ///
    /// The returned interval contains every value the expression takes over
    /// the box (it is conservative, not tight), and the taint records any
    /// domain holes or discontinuities encountered along the way.
    pub fn eval_interval(&mut self, vars: &[Interval]) -> (Interval, Taint) {
        debug_assert_eq!(vars.len(), self.tape.axis_count);
        let Self {
            tape,
            slots,
            scratch,
            ..
        } = self;
        let mut taint = Taint::NONE;
        for (i, op) in tape.ops.iter().enumerate() {
            let (v, t) = match *op {
                TapeOp::Const(c) => (Interval::from(c), Taint::NONE),
                TapeOp::Axis(a) => (vars[a as usize], Taint::NONE),
                TapeOp::Unary(op, a) => op.eval_interval(slots[a as usize]),
                // A product of a term with itself is a square, which has a
                // tighter rule than the four-corner product.
                TapeOp::Binary(BinaryOpcode::Mul, a, b) if a == b => {
                    (slots[a as usize].square(), Taint::NONE)
                }
                TapeOp::Binary(op, a, b) => {
                    op.eval_interval(slots[a as usize], slots[b as usize])
                }
                TapeOp::Nary(op, start, len) => {
                    scratch.clear();
                    scratch.extend(
                        tape.args[start as usize..][..len as usize]
                            .iter()
                            .map(|&a| slots[a as usize]),
                    );
                    op.eval_interval(scratch)
                }
            };
            taint |= t;
            slots[i] = v;
        }
        (slots[tape.len() - 1], taint)
    }

    /// Bounds and classifies the expression over the given box
    pub fn eval(&mut self, vars: &[Interval]) -> RangeResult {
        let (v, t) = self.eval_interval(vars);
        classify(v, t, self.opts)
    }

    /// Bounds and classifies over the given `(x, y)` box
    pub fn eval2(&mut self, x: Interval, y: Interval) -> RangeResult {
        self.eval(&[x, y])
    }

    /// Bounds and classifies over the given `(x, y, z)` box
    pub fn eval3(
        &mut self,
        x: Interval,
        y: Interval,
        z: Interval,
    ) -> RangeResult {
        self.eval(&[x, y, z])
    }
}

fn classify(v: Interval, t: Taint, opts: CompareOption) -> RangeResult {
    if v.has_nan() {
        return RangeResult::AllNan;
    }
    if v.lower() > EPS {
        return if t.nan && opts.pos {
            RangeResult::MixedNan
        } else {
            RangeResult::AllPositive
        };
    }
    if v.upper() < -EPS {
        return if t.nan && opts.neg {
            RangeResult::MixedNan
        } else {
            RangeResult::AllNegative
        };
    }
    if v.lower() == 0.0 && v.upper() == 0.0 && !t.nan && !t.gap {
        return RangeResult::Zero;
    }
    if t.nan {
        RangeResult::MixedNan
    } else if t.gap {
        RangeResult::MixedGap
    } else {
        RangeResult::Mixed
    }
}

////////////////////////////////////////////////////////////////////////////
