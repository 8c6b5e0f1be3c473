//! Adaptive 2D plotting of implicit curves
//!
//! [`Solver`] walks a square region as an implicit quadtree: each level
//! classifies its cells with the interval evaluator, emits the ones whose
//! sign is fully determined, and splits the rest.  Cells still ambiguous at
//! the finest level get one dense corner-sampling pass that places points
//! on the curve by linear interpolation along crossing edges.
//!
//! The solver is incremental: [`Solver::step`] runs one subdivision level
//! (or the final edge pass), so a caller can interleave work with rendering
//! and call [`Solver::abort`] when the view changes.  [`solve_2d`] runs the
//! whole thing to completion.
//!
//! ```
//! # use levelset::compile::{compile_formulas, presets_2d};
//! # use levelset::eval::CompareOption;
//! # use levelset::parse::CompareMode;
//! # use levelset::render2d::{solve_2d, Region, CellClass};
//! let batch = compile_formulas(&["r<1"], &["x", "y"], presets_2d());
//! let node = batch.results[0].node.unwrap();
//! let region = Region { x: -2.0, y: -2.0, size: 4.0 };
//! let plot = solve_2d(
//!     &batch.context,
//!     node,
//!     CompareOption::from(CompareMode::Gt),
//!     region,
//!     64,
//! ).unwrap();
//! // the disk interior shows up as positive cells
//! assert!(plot.cells.iter().any(|c| c.class == CellClass::Positive));
//! ```

use crate::context::{Context, Node};
use crate::eval::{CompareOption, RangeEval, RangeResult, ValueEval};
use crate::types::{vmax, vmin, Interval};
use crate::Error;
use serde::{Deserialize, Serialize};

/// Corner values this close to zero (on both sides) classify a cell as
/// lying entirely on the curve
const EPS: f64 = 1e-15;

/// Square region of the plane, described by its lower corner and side
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Lower `x` bound
    pub x: f64,
    /// Lower `y` bound
    pub y: f64,
    /// Side length
    pub size: f64,
}

/// Sign of the expression over a classified cell
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CellClass {
    /// Zero over the whole cell
    Zero,
    /// Uniformly negative
    Negative,
    /// Uniformly positive
    Positive,
    /// Undefined (NaN) over the whole cell
    Nan,
}

/// One classified cell, in absolute coordinates
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Lower `x` bound
    pub x: f64,
    /// Lower `y` bound
    pub y: f64,
    /// Side length
    pub size: f64,
    /// Classification
    pub class: CellClass,
}

/// Accumulated output of a 2D solve
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Plot {
    /// Classified cells, coarsest first
    pub cells: Vec<Cell>,
    /// Points on the curve, one per finest-level cell that crosses it
    pub points: Vec<[f64; 2]>,
}

/// Where a [`Solver`] is in its lifecycle
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SolverStatus {
    /// More calls to [`Solver::step`] will do work
    Active,
    /// All levels and the edge pass have run
    Completed,
    /// Stopped early; accumulated results remain valid
    Aborted,
}

enum Phase {
    /// Subdividing at cells of `res / resolution` of the region's side
    Range { res: u32 },
    /// Dense corner sampling over the surviving finest cells
    Edges,
    Completed,
    Aborted,
}

/// Incremental quadtree solver for one compiled equation
pub struct Solver {
    value: ValueEval,
    range: RangeEval,
    region: Region,
    resolution: u32,
    queue: Vec<(u32, u32)>,
    next: Vec<(u32, u32)>,
    plot: Plot,
    phase: Phase,
}

impl Solver {
    /// Builds a solver over `region`, subdividing down to cells of
    /// `region.size / resolution`
    ///
    /// `axes` names the two free variables, in `(x, y)` order.
    ///
    /// # Panics
    /// If `resolution` is not a power of two.
    pub fn new(
        ctx: &Context,
        root: Node,
        axes: [&str; 2],
        options: CompareOption,
        region: Region,
        resolution: u32,
    ) -> Result<Self, Error> {
        assert!(resolution.is_power_of_two());
        Ok(Solver {
            value: ValueEval::new(ctx, root, &axes)?,
            range: RangeEval::new(ctx, root, &axes, options)?,
            region,
            resolution,
            queue: vec![(0, 0)],
            next: vec![],
            plot: Plot::default(),
            phase: Phase::Range { res: resolution },
        })
    }

    /// Results accumulated so far
    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    /// Consumes the solver, returning its results
    pub fn into_plot(self) -> Plot {
        self.plot
    }

    /// Reports whether stepping will still do work
    pub fn status(&self) -> SolverStatus {
        match self.phase {
            Phase::Range { .. } | Phase::Edges => SolverStatus::Active,
            Phase::Completed => SolverStatus::Completed,
            Phase::Aborted => SolverStatus::Aborted,
        }
    }

    /// Stops the solve, keeping everything produced so far
    pub fn abort(&mut self) {
        if self.status() == SolverStatus::Active {
            self.phase = Phase::Aborted;
        }
    }

    /// Runs one subdivision level, or the final edge pass
    ///
    /// No-op once the solver is completed or aborted.
    pub fn step(&mut self) {
        match self.phase {
            Phase::Range { res } => self.range_step(res),
            Phase::Edges => {
                self.edge_pass();
                self.phase = Phase::Completed;
            }
            Phase::Completed | Phase::Aborted => (),
        }
    }

    /// Classifies every queued cell at level `res`; determined cells are
    /// painted, ambiguous ones split (or kept for the edge pass at the
    /// finest level)
    fn range_step(&mut self, res: u32) {
        let dt = res as f64 / self.resolution as f64;
        let s = self.region.size * dt;
        for &(u, v) in &self.queue {
            let x0 = self.region.x + u as f64 * s;
            let y0 = self.region.y + v as f64 * s;
            let r = self
                .range
                .eval2(Interval::new(x0, x0 + s), Interval::new(y0, y0 + s));
            if let Some(class) = cell_class(r) {
                self.plot.cells.push(Cell {
                    x: x0,
                    y: y0,
                    size: s,
                    class,
                });
            } else if res > 1 {
                for j in 0..4 {
                    self.next.push((2 * u + (j & 1), 2 * v + (j >> 1)));
                }
            } else if r.needs_edge_pass() {
                // MixedNan cells are dropped: a sign change through NaN is
                // not a curve crossing
                self.next.push((u, v));
            }
        }
        std::mem::swap(&mut self.queue, &mut self.next);
        self.next.clear();
        log::trace!(
            "range pass at res {res}: {} cells queued",
            self.queue.len()
        );
        self.phase = if self.queue.is_empty() {
            Phase::Completed
        } else if res > 1 {
            Phase::Range { res: res / 2 }
        } else {
            Phase::Edges
        };
    }

    /// Samples the four corners of each surviving cell, interpolating a
    /// point along every sign-crossing edge; crossing-free cells are
    /// classified by their center sample
    fn edge_pass(&mut self) {
        let queue = std::mem::take(&mut self.queue);
        let s = self.region.size / self.resolution as f64;
        let mut rows: Vec<Vec<u32>> = vec![vec![]; self.resolution as usize];
        for &(u, v) in &queue {
            rows[v as usize].push(u);
        }
        let n_points = self.plot.points.len();
        for (yi, xs) in rows.iter().enumerate() {
            let yb = self.region.y + yi as f64 * s;
            let yt = yb + s;
            // Adjacent cells share a corner column; carry the right-hand
            // samples of the previous cell forward when they line up
            let mut carry: Option<(u32, f64, f64)> = None;
            for &xi in xs {
                let x0 = self.region.x + xi as f64 * s;
                let x1 = x0 + s;
                let (a, c) = match carry {
                    Some((cx, b, d)) if cx == xi => (b, d),
                    _ => {
                        (self.value.eval2(x0, yb), self.value.eval2(x0, yt))
                    }
                };
                let b = self.value.eval2(x1, yb);
                let d = self.value.eval2(x1, yt);
                carry = Some((xi + 1, b, d));

                let lo = vmin(vmin(a, b), vmin(c, d));
                let hi = vmax(vmax(a, b), vmax(c, d));
                if -EPS < lo && hi < EPS {
                    self.plot.cells.push(Cell {
                        x: x0,
                        y: yb,
                        size: s,
                        class: CellClass::Zero,
                    });
                    continue;
                }

                let mut px = 0.0;
                let mut py = 0.0;
                let mut pw = 0.0;
                let mut cross =
                    |ax: f64, ay: f64, bx: f64, by: f64, va: f64, vb: f64| {
                        if va * vb <= 0.0 {
                            let t = if va == vb {
                                0.5
                            } else {
                                va / (va - vb)
                            };
                            px += ax + (bx - ax) * t;
                            py += ay + (by - ay) * t;
                            pw += 1.0;
                        }
                    };
                cross(x0, yb, x1, yb, a, b);
                cross(x0, yb, x0, yt, a, c);
                cross(x1, yb, x1, yt, b, d);
                cross(x0, yt, x1, yt, c, d);

                if pw > 0.0 {
                    let p = [px / pw, py / pw];
                    // Infinite corner values can produce a non-finite
                    // average; there is no point to place in that case
                    if p[0].is_finite() && p[1].is_finite() {
                        self.plot.points.push(p);
                    }
                } else {
                    let v =
                        self.value.eval2(x0 + s / 2.0, yb + s / 2.0);
                    let class = if v.is_nan() {
                        CellClass::Nan
                    } else if v > 0.0 {
                        CellClass::Positive
                    } else if v < 0.0 {
                        CellClass::Negative
                    } else {
                        CellClass::Zero
                    };
                    self.plot.cells.push(Cell {
                        x: x0,
                        y: yb,
                        size: s,
                        class,
                    });
                }
            }
        }
        log::debug!(
            "edge pass over {} cells: {} points",
            queue.len(),
            self.plot.points.len() - n_points
        );
    }
}

fn cell_class(r: RangeResult) -> Option<CellClass> {
    match r {
        RangeResult::Zero => Some(CellClass::Zero),
        RangeResult::AllNegative => Some(CellClass::Negative),
        RangeResult::AllPositive => Some(CellClass::Positive),
        RangeResult::AllNan => Some(CellClass::Nan),
        RangeResult::Mixed
        | RangeResult::MixedGap
        | RangeResult::MixedNan => None,
    }
}

/// Solves one equation over `region` to completion
///
/// Axis names are fixed to `x` and `y`; build a [`Solver`] directly to use
/// different ones.
pub fn solve_2d(
    ctx: &Context,
    root: Node,
    options: CompareOption,
    region: Region,
    resolution: u32,
) -> Result<Plot, Error> {
    let mut solver =
        Solver::new(ctx, root, ["x", "y"], options, region, resolution)?;
    while solver.status() == SolverStatus::Active {
        solver.step();
    }
    Ok(solver.into_plot())
}

////////////////////////////////////////////////////////////////////////////
