//! 3D polygonization of implicit surfaces
//!
//! [`Polygonizer`] meshes the zero set of an expression inside a cube.  It
//! keeps an octree of leaf cubes that might touch the surface (classified
//! with the interval evaluator) and marches a small sample grid over each
//! leaf, triangulating every elementary cube through the case table in
//! [`mc`].
//!
//! Refinement is incremental: each [`Polygonizer::step`] halves the leaves
//! and returns a complete snapshot that replaces the previous one, so a
//! caller can show coarse geometry immediately and swap in finer passes as
//! they arrive.  Once a triangle or leaf budget is hit, a final pass may
//! raise the per-leaf sample density instead of splitting further.
//! [`polygonize_3d`] runs the whole loop and keeps the last snapshot.
//!
//! ```
//! # use levelset::compile::{compile_formulas, presets_3d};
//! # use levelset::mesh::{polygonize_3d, PolygonizeOptions};
//! let batch = compile_formulas(&["r=1"], &["x", "y", "z"], presets_3d());
//! let node = batch.results[0].node.unwrap();
//! let options = PolygonizeOptions {
//!     max_resolution: 16,
//!     ..PolygonizeOptions::default()
//! };
//! let surface = polygonize_3d(&batch.context, node, options).unwrap();
//! // a unit sphere
//! assert!(surface.triangle_count() > 0);
//! ```

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::context::{Context, Node};
use crate::eval::{CompareOption, RangeEval, ValueEval};
use crate::types::Interval;
use crate::Error;

pub mod mc;
mod refine;

pub use refine::direction_buckets;
use refine::CubeScore;

use mc::EDGES;

/// Sample grid density over each octree leaf while subdividing
const SEGMENTS: u32 = 4;

////////////////////////////////////////////////////////////////////////////

/// Output and budget parameters for a [`Polygonizer`]
#[derive(Copy, Clone, Debug)]
pub struct PolygonizeOptions {
    /// Half-width of the meshed cube, which is centered on the origin
    pub radius: f64,
    /// Which sign regions count as filled, from the formula's comparison
    /// mode
    pub compare: CompareOption,
    /// Re-triangulate high-curvature cells at a finer sub-grid in the
    /// final pass
    pub quality: bool,
    /// Stop splitting once the octree holds this many leaf cubes
    pub preferred_cubes: usize,
    /// Triangle budget for the finished surface
    pub max_triangles: usize,
    /// Hard limit on samples along each axis
    pub max_resolution: u32,
}

impl Default for PolygonizeOptions {
    fn default() -> Self {
        PolygonizeOptions {
            radius: 2.0,
            compare: CompareOption::NONE,
            quality: false,
            preferred_cubes: 65536,
            max_triangles: 800_000,
            max_resolution: 1024,
        }
    }
}

/// One triangulated snapshot of an implicit surface
///
/// Positions and normals are flat `xyz` triples, nine floats per triangle,
/// ready to upload as vertex buffers.  Normals are per-face (each face's
/// normal repeated for its three vertices), and faces are not consistently
/// wound, so render double-sided.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Surface {
    /// Triangle vertex positions
    pub positions: Vec<f32>,
    /// Per-vertex face normals
    pub normals: Vec<f32>,
    /// Effective sample count along each axis of the meshed cube
    pub resolution: u32,
}

impl Surface {
    fn new(positions: Vec<f32>, resolution: u32) -> Self {
        let normals = flat_normals(&positions);
        Surface {
            positions,
            normals,
            resolution,
        }
    }

    /// Returns the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 9
    }
}

////////////////////////////////////////////////////////////////////////////

/// Incremental octree and marching-cubes driver for one surface
pub struct Polygonizer {
    value: ValueEval,
    range: RangeEval,
    options: PolygonizeOptions,
    /// Ambiguous octree leaves at the current subdivision level
    cubes: Vec<[Interval; 3]>,
    /// Octree subdivisions per axis; the sample grid is `res * SEGMENTS`
    res: u32,
    /// Triangle count of the last snapshot, for budget prediction
    triangles: usize,
    phase: Phase,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Phase {
    Subdivide,
    Final,
    Done,
}

impl Polygonizer {
    /// Builds a polygonizer for the subtree rooted at `root`
    ///
    /// `axes` names the variables spanning the volume, in `(x, y, z)`
    /// order.
    pub fn new(
        ctx: &Context,
        root: Node,
        axes: [&str; 3],
        options: PolygonizeOptions,
    ) -> Result<Self, Error> {
        let whole = Interval::new(-options.radius, options.radius);
        Ok(Polygonizer {
            value: ValueEval::new(ctx, root, &axes)?,
            range: RangeEval::new(ctx, root, &axes, options.compare)?,
            options,
            cubes: vec![[whole; 3]],
            res: 1,
            triangles: 0,
            phase: Phase::Subdivide,
        })
    }

    /// Runs one pass and returns the next snapshot
    ///
    /// Returns `None` once refinement is finished (or aborted, or the
    /// final pass overran its triangle budget); the previously returned
    /// snapshot stays valid.
    pub fn step(&mut self) -> Option<Surface> {
        match self.phase {
            Phase::Subdivide => {
                self.cubes = split_cubes(&mut self.range, &self.cubes);
                self.res *= 2;
                let positions = polygonize_cubes(
                    &mut self.value,
                    &self.cubes,
                    SEGMENTS,
                    None,
                );
                let surface = Surface::new(positions, self.res * SEGMENTS);
                self.triangles = surface.triangle_count();
                log::debug!(
                    "{} cubes at resolution {} made {} triangles",
                    self.cubes.len(),
                    surface.resolution,
                    self.triangles,
                );
                if self.res * SEGMENTS >= self.options.max_resolution {
                    self.phase = Phase::Done;
                } else if self.triangles * 4 > self.options.max_triangles
                    || self.cubes.len() > self.options.preferred_cubes
                {
                    self.phase = Phase::Final;
                }
                Some(surface)
            }
            Phase::Final => {
                self.phase = Phase::Done;
                // Splitting once more while dropping the sub-grid to 3
                // scales the triangle count by (6/4)^2; keeping the cubes
                // and raising the sub-grid to 5 scales it by (5/4)^2.
                let segments = if self.cubes.len()
                    < self.options.preferred_cubes
                    && self.triangles * 9 / 4 < self.options.max_triangles
                {
                    self.cubes = split_cubes(&mut self.range, &self.cubes);
                    self.res *= 2;
                    3
                } else if self.triangles * 25 / 16 < self.options.max_triangles
                {
                    5
                } else {
                    return None;
                };
                let mut scores = Vec::new();
                let tally = self.options.quality.then_some(&mut scores);
                let positions = polygonize_cubes(
                    &mut self.value,
                    &self.cubes,
                    segments,
                    tally,
                );
                if positions.len() / 9 > self.options.max_triangles * 3 / 2 {
                    log::debug!("discarding oversized final pass");
                    return None;
                }
                let grid = self.res * segments;
                let positions = if self.options.quality {
                    refine::refine_surface(
                        &mut self.value,
                        positions,
                        &scores,
                        grid,
                        self.options.radius,
                    )
                } else {
                    positions
                };
                Some(Surface::new(positions, grid))
            }
            Phase::Done => None,
        }
    }

    /// Stops refinement; further [`step`](Self::step) calls return `None`
    pub fn abort(&mut self) {
        self.phase = Phase::Done;
    }
}

/// Polygonizes to completion and returns the finest snapshot
///
/// The formula must be a function of `x`, `y` and `z`.
pub fn polygonize_3d(
    ctx: &Context,
    root: Node,
    options: PolygonizeOptions,
) -> Result<Surface, Error> {
    let mut p = Polygonizer::new(ctx, root, ["x", "y", "z"], options)?;
    let mut out = Surface::default();
    while let Some(s) = p.step() {
        out = s;
    }
    Ok(out)
}

////////////////////////////////////////////////////////////////////////////

/// Halves every cube along all three axes and keeps the octants whose
/// classification is still ambiguous
///
/// Determined octants are dropped: fully inside or outside ones carry no
/// surface, and fully undefined ones carry nothing to interpolate.  NaN
/// tainted octants stay, so a surface running against a domain edge is
/// still meshed.
fn split_cubes(
    range: &mut RangeEval,
    cubes: &[[Interval; 3]],
) -> Vec<[Interval; 3]> {
    let mut out = Vec::new();
    for &[x, y, z] in cubes {
        let xs = halves(x);
        let ys = halves(y);
        let zs = halves(z);
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..2 {
                    let b = [xs[i], ys[j], zs[k]];
                    if !range.eval3(b[0], b[1], b[2]).is_determined() {
                        out.push(b);
                    }
                }
            }
        }
    }
    out
}

fn halves(v: Interval) -> [Interval; 2] {
    let mid = 0.5 * (v.lower() + v.upper());
    [
        Interval::new(v.lower(), mid),
        Interval::new(mid, v.upper()),
    ]
}

/// Triangulates each cube by marching an `(segments+1)^3` sample grid
///
/// Returns flat vertex positions, nine floats per triangle.  When `tally`
/// is given, every elementary cube that produced triangles is recorded
/// with its triangle span and curvature score.
fn polygonize_cubes(
    value: &mut ValueEval,
    cubes: &[[Interval; 3]],
    segments: u32,
    mut tally: Option<&mut Vec<CubeScore>>,
) -> Vec<f32> {
    let table = mc::table();
    let segments = segments as usize;
    let n = segments + 1;
    // two z-layers of samples, swapped as the sweep climbs
    let mut below = vec![0.0; n * n];
    let mut above = vec![0.0; n * n];
    let mut out = Vec::new();
    for &[bx, by, bz] in cubes {
        let (x0, y0, z0) = (bx.lower(), by.lower(), bz.lower());
        let xscale = bx.width() / segments as f64;
        let yscale = by.width() / segments as f64;
        let zscale = bz.width() / segments as f64;
        for i in 0..n {
            let x = x0 + xscale * i as f64;
            for j in 0..n {
                below[i * n + j] = value.eval3(x, y0 + yscale * j as f64, z0);
            }
        }
        for k in 0..segments {
            let z = z0 + zscale * k as f64;
            let z1 = z0 + zscale * (k + 1) as f64;
            for i in 0..n {
                let x = x0 + xscale * i as f64;
                for j in 0..n {
                    above[i * n + j] =
                        value.eval3(x, y0 + yscale * j as f64, z1);
                }
            }
            for i in 0..segments {
                for j in 0..segments {
                    let idx = i * n + j;
                    let vs = [
                        below[idx],
                        below[idx + n],
                        below[idx + 1],
                        below[idx + n + 1],
                        above[idx],
                        above[idx + n],
                        above[idx + 1],
                        above[idx + n + 1],
                    ];
                    // The lower layer counts zero as inside and the upper
                    // one does not, so a surface lying exactly on a grid
                    // plane belongs to one cube only.  A NaN corner never
                    // sets its bit.
                    let mut config = 0u8;
                    for (c, &v) in vs.iter().enumerate().take(4) {
                        if v >= 0.0 {
                            config |= 1 << c;
                        }
                    }
                    for (c, &v) in vs.iter().enumerate().skip(4) {
                        if v > 0.0 {
                            config |= 1 << c;
                        }
                    }
                    let pattern = table.triangles(config);
                    if pattern.is_empty() {
                        continue;
                    }
                    let x = x0 + xscale * i as f64;
                    let y = y0 + yscale * j as f64;

                    // Edges shared by several triangles of the pattern are
                    // interpolated once.
                    let mut pts = [[f64::NAN; 3]; 12];
                    let mut have = [false; 12];
                    for &e in pattern {
                        if !have[e as usize] {
                            pts[e as usize] = edge_point(
                                value, &vs, e, x, y, z, xscale, yscale,
                                zscale,
                            );
                            have[e as usize] = true;
                        }
                    }
                    let start = out.len();
                    for tri in pattern.chunks_exact(3) {
                        let ps = [
                            pts[tri[0] as usize],
                            pts[tri[1] as usize],
                            pts[tri[2] as usize],
                        ];
                        // NaN coordinates mark an edge with no usable
                        // crossing; Inf comes from an overflowing sample.
                        if ps.iter().flatten().all(|v| v.is_finite()) {
                            for p in ps {
                                out.extend(p.map(|v| v as f32));
                            }
                        }
                    }
                    if let Some(t) = &mut tally {
                        let len = out.len() - start;
                        if len > 0 {
                            let score = curvature(
                                value, &vs, x, y, z, xscale, yscale, zscale,
                            );
                            t.push(CubeScore {
                                corner: [x, y, z],
                                start,
                                len,
                                score,
                            });
                        }
                    }
                }
            }
            std::mem::swap(&mut below, &mut above);
        }
    }
    out
}

/// Locates the surface crossing along one cube edge, in space
///
/// A first estimate comes from linear interpolation between the endpoint
/// samples; one midpoint sample then restricts the crossing to half the
/// edge, which corrects strongly asymmetric crossings.  Exactly equal
/// endpoints yield NaN, which drops the triangle later.
fn edge_point(
    value: &mut ValueEval,
    vs: &[f64; 8],
    edge: u8,
    x: f64,
    y: f64,
    z: f64,
    xscale: f64,
    yscale: f64,
    zscale: f64,
) -> [f64; 3] {
    let (a, b) = EDGES[edge as usize];
    let (lo, hi) = (a.min(b), a.max(b));
    let va = vs[lo as usize];
    let vb = vs[hi as usize];
    if va.is_nan() || vb.is_nan() {
        return [f64::NAN; 3];
    }
    // unit-cube coordinates of the lower-numbered corner
    let mut p = [
        (lo & 1) as f64,
        ((lo >> 1) & 1) as f64,
        ((lo >> 2) & 1) as f64,
    ];
    let axis = (lo ^ hi).trailing_zeros() as usize;
    let mut m = p;
    m[axis] += 0.5;
    let vm = value.eval3(
        x + m[0] * xscale,
        y + m[1] * yscale,
        z + m[2] * zscale,
    );
    let t = if vm.is_nan() {
        va / (va - vb)
    } else if (vm >= 0.0) == (va >= 0.0) {
        0.5 + 0.5 * vm / (vm - vb)
    } else {
        0.5 * va / (va - vm)
    };
    p[axis] += t;
    [
        x + p[0] * xscale,
        y + p[1] * yscale,
        z + p[2] * zscale,
    ]
}

/// Curvature estimate for one cube: how far the center sample deviates
/// from the trilinear interpolation of the corners, relative to the
/// corner spread
fn curvature(
    value: &mut ValueEval,
    vs: &[f64; 8],
    x: f64,
    y: f64,
    z: f64,
    xscale: f64,
    yscale: f64,
    zscale: f64,
) -> f64 {
    let center = value.eval3(
        x + 0.5 * xscale,
        y + 0.5 * yscale,
        z + 0.5 * zscale,
    );
    let mean = vs.iter().sum::<f64>() / 8.0;
    let spread = vs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - vs.iter().copied().fold(f64::INFINITY, f64::min);
    let score = (center - mean).abs() / spread;
    if score.is_finite() { score } else { 0.0 }
}

/// Builds per-face normals, each repeated for its triangle's three
/// vertices
///
/// Faces are not consistently wound, so normal signs are arbitrary; a
/// degenerate triangle gets NaN components.
fn flat_normals(positions: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(positions.len());
    for t in positions.chunks_exact(9) {
        let a = Vector3::new(t[0], t[1], t[2]);
        let b = Vector3::new(t[3], t[4], t[5]);
        let c = Vector3::new(t[6], t[7], t[8]);
        let n = (b - a).cross(&(c - a)).normalize();
        for _ in 0..3 {
            out.extend_from_slice(n.as_slice());
        }
    }
    out
}

////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::{NaryOpcode, UnaryOpcode};

    /// `hypot(x, y, z) - r`
    fn sphere(ctx: &mut Context, r: f64) -> Node {
        let x = ctx.var("x");
        let y = ctx.var("y");
        let z = ctx.var("z");
        let d = ctx.nary(NaryOpcode::Hypot, vec![x, y, z]).unwrap();
        let r = ctx.constant(r);
        ctx.sub(d, r).unwrap()
    }

    fn radius(v: &[f32]) -> f64 {
        f64::from(v[0]).hypot(f64::from(v[1])).hypot(f64::from(v[2]))
    }

    #[test]
    fn test_sphere_snapshots() {
        let mut ctx = Context::new();
        let root = sphere(&mut ctx, 0.97);
        let options = PolygonizeOptions {
            max_resolution: 32,
            ..PolygonizeOptions::default()
        };
        let mut p =
            Polygonizer::new(&ctx, root, ["x", "y", "z"], options).unwrap();
        let mut resolutions = Vec::new();
        let mut last = Surface::default();
        while let Some(s) = p.step() {
            assert!(s.triangle_count() > 0);
            assert_eq!(s.normals.len(), s.positions.len());
            resolutions.push(s.resolution);
            last = s;
        }
        // one snapshot per doubling until the resolution cap
        assert_eq!(resolutions, [8, 16, 32]);
        for v in last.positions.chunks_exact(3) {
            let r = radius(v);
            assert!((r - 0.97).abs() < 0.1, "vertex off the sphere: {v:?}");
        }
        for v in last.normals.chunks_exact(3) {
            let len = radius(v);
            assert!((len - 1.0).abs() < 1e-3, "normal not unit: {v:?}");
        }
    }

    #[test]
    fn test_budget_stops_refinement() {
        let mut ctx = Context::new();
        let root = sphere(&mut ctx, 0.97);
        let options = PolygonizeOptions {
            max_triangles: 100,
            ..PolygonizeOptions::default()
        };
        let mut p =
            Polygonizer::new(&ctx, root, ["x", "y", "z"], options).unwrap();
        // the coarse snapshot already blows the budget, and the final pass
        // cannot fit either a split or a denser sub-grid under it
        let first = p.step().expect("one snapshot");
        assert!(first.triangle_count() > 0);
        assert!(p.step().is_none());
    }

    #[test]
    fn test_abort() {
        let mut ctx = Context::new();
        let root = sphere(&mut ctx, 0.97);
        let mut p = Polygonizer::new(
            &ctx,
            root,
            ["x", "y", "z"],
            PolygonizeOptions::default(),
        )
        .unwrap();
        assert!(p.step().is_some());
        p.abort();
        assert!(p.step().is_none());
    }

    #[test]
    fn test_empty_volume() {
        // x^2 + 1 has no zero set
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let sq = ctx.mul(x, x).unwrap();
        let one = ctx.constant(1.0);
        let root = ctx.add(sq, one).unwrap();
        let options = PolygonizeOptions {
            max_resolution: 16,
            ..PolygonizeOptions::default()
        };
        let surface = polygonize_3d(&ctx, root, options).unwrap();
        assert_eq!(surface.triangle_count(), 0);
        assert_eq!(surface.resolution, 16);
    }

    #[test]
    fn test_plane_with_undefined_region() {
        // sqrt(x) - 0.9 vanishes on the plane x = 0.81 and is undefined
        // for x < 0
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let s = ctx.unary(UnaryOpcode::Sqrt, x).unwrap();
        let c = ctx.constant(0.9);
        let root = ctx.sub(s, c).unwrap();
        let options = PolygonizeOptions {
            max_resolution: 32,
            ..PolygonizeOptions::default()
        };
        let surface = polygonize_3d(&ctx, root, options).unwrap();
        assert!(surface.triangle_count() > 0);
        let mut ymin = f32::INFINITY;
        let mut ymax = f32::NEG_INFINITY;
        for v in surface.positions.chunks_exact(3) {
            assert!((v[0] - 0.81).abs() < 0.1, "vertex off the plane: {v:?}");
            ymin = ymin.min(v[1]);
            ymax = ymax.max(v[1]);
        }
        assert!(ymin < -1.5 && ymax > 1.5);
    }

    #[test]
    fn test_quality_refinement() {
        // two overlapping spheres meet in a crease, which scores high on
        // curvature
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let y = ctx.var("y");
        let z = ctx.var("z");
        let half = ctx.constant(0.5);
        let xl = ctx.add(x, half).unwrap();
        let xr = ctx.sub(x, half).unwrap();
        let dl = ctx.nary(NaryOpcode::Hypot, vec![xl, y, z]).unwrap();
        let dr = ctx.nary(NaryOpcode::Hypot, vec![xr, y, z]).unwrap();
        let d = ctx.nary(NaryOpcode::Min, vec![dl, dr]).unwrap();
        let r = ctx.constant(0.9);
        let root = ctx.sub(d, r).unwrap();

        let options = PolygonizeOptions {
            quality: true,
            max_triangles: 4000,
            ..PolygonizeOptions::default()
        };
        let surface = polygonize_3d(&ctx, root, options).unwrap();
        assert!(surface.triangle_count() > 0);

        // all vertices stay on the union surface
        let mut value = ValueEval::new(&ctx, root, &["x", "y", "z"]).unwrap();
        for v in surface.positions.chunks_exact(3) {
            let d = value.eval3(
                f64::from(v[0]),
                f64::from(v[1]),
                f64::from(v[2]),
            );
            assert!(d.abs() < 0.1, "vertex off the surface: {v:?}");
        }

        // bucketing covers every triangle exactly once
        let buckets = direction_buckets(&surface);
        assert_eq!(buckets.len(), 26);
        let mut seen: Vec<u32> = buckets.iter().flatten().copied().collect();
        seen.sort_unstable();
        let expect: Vec<u32> = (0..surface.triangle_count() as u32).collect();
        assert_eq!(seen, expect);
    }

    #[test]
    fn test_split_cubes_drops_determined_octants() {
        let mut ctx = Context::new();
        let root = sphere(&mut ctx, 0.97);
        let mut range = RangeEval::new(
            &ctx,
            root,
            &["x", "y", "z"],
            CompareOption::NONE,
        )
        .unwrap();
        let whole = Interval::new(-2.0, 2.0);
        // every octant of the root cube touches the sphere
        let level1 = split_cubes(&mut range, &[[whole; 3]]);
        assert_eq!(level1.len(), 8);
        // the next level keeps shell octants only
        let level2 = split_cubes(&mut range, &level1);
        assert!(level2.len() < 64);
        assert!(!level2.is_empty());
    }
}
