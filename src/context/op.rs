use crate::context::{Node, VarNode};
use crate::types::{vmax, vmin, Interval, Taint};
use ordered_float::OrderedFloat;

/// A one-argument math operation
#[derive(
    Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, strum::EnumIter,
)]
#[allow(missing_docs)]
pub enum UnaryOpcode {
    Neg,
    Abs,
    Sqrt,
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Floor,
    Ceil,
    Round,
    Sign,
}

impl UnaryOpcode {
    /// Evaluates this operation on a single value
    ///
    /// `Round` rounds half-up and `Sign` maps `±0.0` to itself, matching the
    /// semantics that formulas are written against.
    pub fn eval_value(self, a: f64) -> f64 {
        match self {
            Self::Neg => -a,
            Self::Abs => a.abs(),
            Self::Sqrt => a.sqrt(),
            Self::Exp => a.exp(),
            Self::Ln => a.ln(),
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::Asin => a.asin(),
            Self::Acos => a.acos(),
            Self::Atan => a.atan(),
            Self::Sinh => a.sinh(),
            Self::Cosh => a.cosh(),
            Self::Tanh => a.tanh(),
            Self::Asinh => a.asinh(),
            Self::Acosh => a.acosh(),
            Self::Atanh => a.atanh(),
            Self::Floor => a.floor(),
            Self::Ceil => a.ceil(),
            Self::Round => (a + 0.5).floor(),
            Self::Sign => {
                if a.is_nan() || a == 0.0 {
                    a
                } else if a > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Evaluates this operation on an interval
    ///
    /// Operations with a restricted domain or a discontinuity report it in
    /// the returned [`Taint`]; everything else is flag-free.
    pub fn eval_interval(self, a: Interval) -> (Interval, Taint) {
        match self {
            Self::Neg => (-a, Taint::NONE),
            Self::Abs => (a.abs(), Taint::NONE),
            Self::Sqrt => a.sqrt(),
            Self::Exp => (a.exp(), Taint::NONE),
            Self::Ln => a.ln(),
            Self::Sin => (a.sin(), Taint::NONE),
            Self::Cos => (a.cos(), Taint::NONE),
            Self::Tan => a.tan(),
            Self::Asin => a.asin(),
            Self::Acos => a.acos(),
            Self::Atan => (a.atan(), Taint::NONE),
            Self::Sinh => (a.sinh(), Taint::NONE),
            Self::Cosh => (a.cosh(), Taint::NONE),
            Self::Tanh => (a.tanh(), Taint::NONE),
            Self::Asinh => (a.asinh(), Taint::NONE),
            Self::Acosh => a.acosh(),
            Self::Atanh => a.atanh(),
            Self::Floor => (a.floor(), Taint::NONE),
            Self::Ceil => (a.ceil(), Taint::NONE),
            Self::Round => (a.round(), Taint::NONE),
            Self::Sign => (a.sign(), Taint::NONE),
        }
    }

    /// Looks up an opcode by its canonical operator name
    ///
    /// Unary negation uses the distinguished name `-@`, and `log` is the
    /// natural logarithm.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let out = match name {
            "-@" => Self::Neg,
            "abs" => Self::Abs,
            "sqrt" => Self::Sqrt,
            "exp" => Self::Exp,
            "log" => Self::Ln,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "asinh" => Self::Asinh,
            "acosh" => Self::Acosh,
            "atanh" => Self::Atanh,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "sign" => Self::Sign,
            _ => return None,
        };
        Some(out)
    }
}

/// A two-argument math operation
#[derive(
    Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, strum::EnumIter,
)]
#[allow(missing_docs)]
pub enum BinaryOpcode {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Atan2,
}

impl BinaryOpcode {
    /// Evaluates this operation on a pair of values
    ///
    /// `Atan2` takes its arguments in `(y, x)` order.
    pub fn eval_value(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Pow => a.powf(b),
            Self::Atan2 => a.atan2(b),
        }
    }

    /// Evaluates this operation on a pair of intervals
    ///
    /// Division near zero and exponentiation of a negative base report
    /// themselves in the returned [`Taint`].
    pub fn eval_interval(self, a: Interval, b: Interval) -> (Interval, Taint) {
        match self {
            Self::Add => (a + b, Taint::NONE),
            Self::Sub => (a - b, Taint::NONE),
            Self::Mul => (a * b, Taint::NONE),
            Self::Div => a.div(b),
            Self::Pow => a.pow(b),
            Self::Atan2 => a.atan2(b),
        }
    }

    /// Looks up an opcode by its canonical operator name
    ///
    /// `atan` with two arguments is resolved to [`BinaryOpcode::Atan2`] by
    /// the caller, since the name alone is ambiguous.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let out = match name {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "^" | "pow" => Self::Pow,
            "atan2" => Self::Atan2,
            _ => return None,
        };
        Some(out)
    }
}

/// A math operation taking two or more arguments
#[derive(
    Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, strum::EnumIter,
)]
#[allow(missing_docs)]
pub enum NaryOpcode {
    Min,
    Max,
    Hypot,
}

impl NaryOpcode {
    /// Evaluates this operation on a slice of values
    ///
    /// `Min` and `Max` propagate NaN from any argument, rather than skipping
    /// it the way `f64::min` and `f64::max` do.
    pub fn eval_value(self, args: &[f64]) -> f64 {
        match self {
            Self::Min => args.iter().copied().fold(f64::INFINITY, vmin),
            Self::Max => args.iter().copied().fold(f64::NEG_INFINITY, vmax),
            Self::Hypot => args.iter().fold(0.0f64, |acc, a| acc.hypot(*a)),
        }
    }

    /// Evaluates this operation on a slice of intervals
    pub fn eval_interval(self, args: &[Interval]) -> (Interval, Taint) {
        match self {
            Self::Min => {
                let out = args
                    .iter()
                    .fold(Interval::from(f64::INFINITY), |acc, a| acc.min(*a));
                (out, Taint::NONE)
            }
            Self::Max => {
                let out = args
                    .iter()
                    .fold(Interval::from(f64::NEG_INFINITY), |acc, a| {
                        acc.max(*a)
                    });
                (out, Taint::NONE)
            }
            Self::Hypot => {
                let sum = args
                    .iter()
                    .fold(Interval::from(0.0), |acc, a| acc + a.square());
                sum.sqrt()
            }
        }
    }

    /// Looks up an opcode by its canonical operator name
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let out = match name {
            "min" => Self::Min,
            "max" => Self::Max,
            "hypot" => Self::Hypot,
            _ => return None,
        };
        Some(out)
    }
}

/// Represents an operation in a math expression.
///
/// `Op`s should be constructed by calling functions on
/// [`Context`](crate::context::Context), e.g.
/// [`Context::add`](crate::context::Context::add) will generate an
/// `Op::Binary(BinaryOpcode::Add, .., ..)` node and return an opaque handle.
///
/// Each `Op` is tightly coupled to the [`Context`](crate::context::Context)
/// which generated it, and will not be valid for a different `Context`.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum Op {
    Var(VarNode),
    Const(OrderedFloat<f64>),
    Unary(UnaryOpcode, Node),
    Binary(BinaryOpcode, Node, Node),
    Nary(NaryOpcode, Vec<Node>),
}

impl Op {
    /// Iterates over children, producing 0 or more values
    pub fn iter_children(&self) -> impl Iterator<Item = Node> + '_ {
        let (fixed, rest): ([Option<Node>; 2], &[Node]) = match self {
            Op::Binary(_, a, b) => ([Some(*a), Some(*b)], &[]),
            Op::Unary(_, a) => ([Some(*a), None], &[]),
            Op::Nary(_, args) => ([None, None], args),
            Op::Var(..) | Op::Const(..) => ([None, None], &[]),
        };
        fixed.into_iter().flatten().chain(rest.iter().copied())
    }
}
