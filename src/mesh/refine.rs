//! Curvature-driven re-triangulation and triangle bucketing
//!
//! The final polygonization pass scores every elementary cube by how far
//! the field deviates from trilinear across it.  [`refine_surface`] picks
//! the worst offenders (up to a budget), drops their coarse triangles, and
//! marches the affected cells again at a denser sub-grid.  Neighboring
//! cells are included so a crease running along a cell face is caught from
//! both sides.
//!
//! [`direction_buckets`] groups triangles by quantized centroid direction,
//! which lets a renderer draw a rough back-to-front order without sorting
//! every frame.

use std::collections::BTreeSet;

use crate::eval::ValueEval;
use crate::types::Interval;

use super::{polygonize_cubes, Surface};

/// Curvature score above which a cube is a refinement candidate
const CURVATURE_THRESHOLD: f64 = 1.0 / 16.0;

/// Sample grid density when re-marching a flagged cell
const REFINE_SEGMENTS: u32 = 3;

/// One marched elementary cube: its place in space, its span in the
/// output buffer, and its curvature score
#[derive(Copy, Clone, Debug)]
pub(crate) struct CubeScore {
    /// Lower corner, in space
    pub corner: [f64; 3],
    /// First float of the cube's triangles in the position buffer
    pub start: usize,
    /// Float count of the cube's triangles
    pub len: usize,
    pub score: f64,
}

/// Replaces the triangles of high-curvature cells with a denser re-march
///
/// `grid` is the sample count along each axis of the full volume, so each
/// scored cube is one grid cell; `radius` is the volume's half-width.
/// Spending the whole budget re-marches an eighth of the surface at nine
/// times the triangle density, which stays well under the overshoot
/// allowance checked by the caller.
pub(crate) fn refine_surface(
    value: &mut ValueEval,
    positions: Vec<f32>,
    scores: &[CubeScore],
    grid: u32,
    radius: f64,
) -> Vec<f32> {
    let budget = positions.len() / 9 / 8;
    let mut flagged: Vec<&CubeScore> = scores
        .iter()
        .filter(|s| s.score > CURVATURE_THRESHOLD)
        .collect();
    if flagged.is_empty() || budget == 0 {
        return positions;
    }
    flagged.sort_by(|a, b| b.score.total_cmp(&a.score));
    flagged.truncate(budget);

    let cell = 2.0 * radius / f64::from(grid);
    let index = |s: &CubeScore| {
        s.corner.map(|v| ((v + radius) / cell).round() as i64)
    };

    // flagged cells plus their face neighbors, deduplicated
    let mut cells: BTreeSet<[i64; 3]> = BTreeSet::new();
    for &s in &flagged {
        let c = index(s);
        cells.insert(c);
        for axis in 0..3 {
            for step in [-1, 1] {
                let mut n = c;
                n[axis] += step;
                if n[axis] >= 0 && n[axis] < i64::from(grid) {
                    cells.insert(n);
                }
            }
        }
    }

    // keep triangles from cubes outside the refined set
    let mut out = Vec::with_capacity(positions.len());
    for s in scores {
        if !cells.contains(&index(s)) {
            out.extend_from_slice(&positions[s.start..s.start + s.len]);
        }
    }

    let boxes: Vec<[Interval; 3]> = cells
        .iter()
        .map(|c| c.map(|i| span(i, cell, radius)))
        .collect();
    out.extend(polygonize_cubes(value, &boxes, REFINE_SEGMENTS, None));
    out
}

fn span(i: i64, cell: f64, radius: f64) -> Interval {
    let lo = i as f64 * cell - radius;
    Interval::new(lo, lo + cell)
}

////////////////////////////////////////////////////////////////////////////

/// Groups triangle indices by the direction of their centroid from the
/// origin
///
/// Directions are quantized to the 26 neighbors of the origin on a 3x3x3
/// lattice; bucket `i` holds the triangles whose centroid points along
/// direction `i`.  A degenerate centroid at the origin lands in the `+z`
/// bucket.
pub fn direction_buckets(surface: &Surface) -> Vec<Vec<u32>> {
    let mut buckets = vec![Vec::new(); 26];
    for (i, t) in surface.positions.chunks_exact(9).enumerate() {
        let cx = f64::from(t[0] + t[3] + t[6]) / 3.0;
        let cy = f64::from(t[1] + t[4] + t[7]) / 3.0;
        let cz = f64::from(t[2] + t[5] + t[8]) / 3.0;
        buckets[direction_of(cx, cy, cz)].push(i as u32);
    }
    buckets
}

fn direction_of(x: f64, y: f64, z: f64) -> usize {
    let m = x.abs().max(y.abs()).max(z.abs());
    if !(m > 0.0) {
        return direction_index(0, 0, 1);
    }
    // components within half the largest magnitude round to zero;
    // `signum` is wrong here because `0.0f64.signum()` is one
    let q = |v: f64| {
        if 2.0 * v.abs() >= m {
            if v < 0.0 {
                -1
            } else {
                1
            }
        } else {
            0
        }
    };
    direction_index(q(x), q(y), q(z))
}

/// Lexicographic index of a nonzero direction in `{-1, 0, 1}^3`, with the
/// origin's slot removed
fn direction_index(dx: i32, dy: i32, dz: i32) -> usize {
    let i = ((dx + 1) * 9 + (dy + 1) * 3 + (dz + 1)) as usize;
    if i > 13 {
        i - 1
    } else {
        i
    }
}

////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_direction_index() {
        assert_eq!(direction_index(-1, -1, -1), 0);
        assert_eq!(direction_index(0, 0, 1), 13);
        assert_eq!(direction_index(1, 0, 0), 21);
        assert_eq!(direction_index(1, 1, 1), 25);
        // every table slot is hit exactly once
        let mut seen = [false; 26];
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    let i = direction_index(dx, dy, dz);
                    assert!(!seen[i]);
                    seen[i] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_direction_quantization() {
        assert_eq!(direction_of(1.0, 0.0, 0.0), direction_index(1, 0, 0));
        assert_eq!(direction_of(-3.0, -3.0, -3.0), direction_index(-1, -1, -1));
        // components at least half the largest survive rounding
        assert_eq!(direction_of(1.0, 0.5, 0.49), direction_index(1, 1, 0));
        // the origin has no direction and falls back to +z
        assert_eq!(direction_of(0.0, 0.0, 0.0), direction_index(0, 0, 1));
        assert_eq!(direction_of(0.0, -0.0, 0.0), direction_index(0, 0, 1));
        // negative zero must not round to a negative direction
        assert_eq!(direction_of(0.0, -0.0, 2.0), direction_index(0, 0, 1));
    }

    #[test]
    fn test_bucket_indices_partition_triangles() {
        // one triangle per axis direction, far from the diagonal cones
        let mut positions = Vec::new();
        for t in [
            [5.0f32, 0.0, 0.0],
            [0.0, 5.0, 0.0],
            [0.0, 0.0, -5.0],
        ] {
            positions.extend_from_slice(&[t[0], t[1], t[2]]);
            positions.extend_from_slice(&[t[0] + 0.1, t[1], t[2]]);
            positions.extend_from_slice(&[t[0], t[1] + 0.1, t[2]]);
        }
        let surface = Surface {
            positions,
            normals: Vec::new(),
            resolution: 1,
        };
        let buckets = direction_buckets(&surface);
        assert_eq!(buckets.len(), 26);
        assert_eq!(buckets[direction_index(1, 0, 0)], vec![0]);
        assert_eq!(buckets[direction_index(0, 1, 0)], vec![1]);
        assert_eq!(buckets[direction_index(0, 0, -1)], vec![2]);
        let total: usize = buckets.iter().map(Vec::len).sum();
        assert_eq!(total, 3);
    }
}
