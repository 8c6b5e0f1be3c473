//! Levelset is the compilation and solving core of a formula grapher: it
//! turns hand-typed formula text into expression trees, and extracts
//! drawable geometry from them as classified regions and curve points in
//! 2D, or triangle meshes in 3D.
//!
//! A formula is an **implicit** description: `y = sin(x)` or
//! `x*x + y*y < 1` constrain a set of points rather than computing one.
//! Every input normalizes to a single expression `f` compared against
//! zero, and the library's job is to find (and classify the sign of) `f`'s
//! zero set quickly enough for interactive use, including formulas whose
//! domain has holes (`sqrt`, `log`, division).
//!
//! The rest of this page is a quick tour through the library APIs.
//!
//! # Formula compilation
//! Text goes in as a *batch*: a mix of definitions (`a = 1`,
//! `f(a, b) = a + b`) and plotted equations.  Definitions are visible
//! batch-wide regardless of order and are fully inlined, so each equation
//! compiles to one self-contained [`Node`](crate::context::Node) in a
//! shared [`Context`](crate::context::Context):
//!
//! ```
//! use levelset::compile::{compile_formulas, presets_2d, FormulaKind};
//!
//! let batch = compile_formulas(
//!     &["k=3", "y<sin(k*x)"],
//!     &["x", "y"],
//!     presets_2d(),
//! );
//! assert!(matches!(batch.results[0].kind, FormulaKind::Variable { .. }));
//! assert!(batch.results[1].node.is_some());
//! ```
//!
//! The grammar is the informal one of graphing calculators (implicit
//! multiplication, `sin x`, `^` for powers); see the [`levelset::parse`
//! namespace](crate::parse) for details.  Expressions can also be built
//! by hand, using functions on a context:
//!
//! ```
//! use levelset::context::Context;
//!
//! let mut ctx = Context::new();
//! let x = ctx.var("x");
//! let y = ctx.var("y");
//! let sum = ctx.add(x, y)?;
//! # Ok::<(), levelset::Error>(())
//! ```
//!
//! The context is an arena-style allocator, doing local deduplication and
//! other simple optimizations (e.g. constant folding).
//!
//! # Evaluation
//! A compiled node is flattened into a straight-line tape and interpreted.
//! [`ValueEval`](crate::eval::ValueEval) produces plain `f64` samples;
//! [`RangeEval`](crate::eval::RangeEval) runs the same tape in interval
//! arithmetic, which can conservatively prove an expression's sign over a
//! whole box at once:
//!
//! ```
//! use levelset::compile::compile_formulas;
//! use levelset::eval::{CompareOption, RangeEval, RangeResult, ValueEval};
//! use levelset::types::Interval;
//!
//! let batch = compile_formulas(&["hypot(x,y)-1"], &["x", "y"], &[]);
//! let node = batch.results[0].node.unwrap();
//!
//! let mut value = ValueEval::new(&batch.context, node, &["x", "y"])?;
//! assert_eq!(value.eval2(1.0, 0.0), 0.0);
//!
//! let mut range = RangeEval::new(
//!     &batch.context,
//!     node,
//!     &["x", "y"],
//!     CompareOption::NONE,
//! )?;
//! let r = range.eval2(Interval::new(2.0, 3.0), Interval::new(0.0, 1.0));
//! assert_eq!(r, RangeResult::AllPositive);
//! # Ok::<(), levelset::Error>(())
//! ```
//!
//! Proving boxes lets the solvers skip almost all of the plane (or
//! volume): a determined box is painted and never subdivided.  The
//! interval evaluator also tracks NaN and discontinuities, so a box that
//! merely *contains* a domain edge or a jump is never mistaken for one the
//! curve passes through; see [`RangeResult`](crate::eval::RangeResult).
//!
//! # 2D plotting
//! [`levelset::render2d`](crate::render2d) walks a square region as an
//! implicit quadtree, emitting sign-classified cells and interpolated
//! points on the curve:
//!
//! ```
//! use levelset::compile::{compile_formulas, presets_2d};
//! use levelset::eval::CompareOption;
//! use levelset::render2d::{solve_2d, Region};
//!
//! let batch = compile_formulas(&["x*x=y"], &["x", "y"], presets_2d());
//! let node = batch.results[0].node.unwrap();
//! let region = Region { x: -2.0, y: -2.0, size: 4.0 };
//! let plot = solve_2d(&batch.context, node, CompareOption::NONE, region, 64)?;
//! assert!(!plot.points.is_empty());
//! assert!(plot.points.iter().all(|p| (p[1] - p[0] * p[0]).abs() < 0.1));
//! # Ok::<(), levelset::Error>(())
//! ```
//!
//! The solver is incremental ([`Solver`](crate::render2d::Solver) exposes
//! `step` and `abort`), so a caller can interleave refinement with
//! rendering and bail out when the view changes.
//!
//! # 3D meshing
//! [`levelset::mesh`](crate::mesh) polygonizes the zero set of a
//! three-variable formula: an octree narrows the volume down to cubes that
//! might touch the surface, and marching cubes triangulates them into a
//! flat vertex buffer:
//!
//! ```
//! use levelset::compile::{compile_formulas, presets_3d};
//! use levelset::mesh::{polygonize_3d, PolygonizeOptions};
//!
//! let batch = compile_formulas(
//!     &["x*x+y*y+z*z=1"],
//!     &["x", "y", "z"],
//!     presets_3d(),
//! );
//! let node = batch.results[0].node.unwrap();
//! let options = PolygonizeOptions {
//!     max_resolution: 32,
//!     ..PolygonizeOptions::default()
//! };
//! let surface = polygonize_3d(&batch.context, node, options)?;
//! assert!(surface.triangle_count() > 0);
//! # Ok::<(), levelset::Error>(())
//! ```
//!
//! Like the 2D solver, [`Polygonizer`](crate::mesh::Polygonizer) is
//! incremental: each `step` returns a complete snapshot at twice the
//! resolution of the last, so coarse geometry can be shown immediately.
//!
//! # Feature flags
#![doc = document_features::document_features!()]
#![warn(missing_docs)]

mod error;
pub use error::Error;

pub mod compile;
pub mod context;
pub mod eval;
pub mod parse;
pub mod types;

pub use context::Context;

#[cfg(feature = "render")]
pub mod render2d;

#[cfg(feature = "mesh")]
pub mod mesh;
