//! Marching-cube case table
//!
//! Corners of a cube are numbered `x + 2y + 4z`, so bit `k` of a
//! configuration byte tells whether corner `k` is inside the surface.  For
//! each of the 256 configurations, [`CubeTable::triangles`] lists the
//! triangles that separate inside from outside corners, as indices into the
//! twelve cube [`EDGES`].
//!
//! The table is not transcribed from a published list; it is generated by
//! classifying each configuration into a handful of pattern families
//! (isolated corner, domino, L, zig-zag chain, claw, face layer), which
//! also settles the historically ambiguous configurations.  Build it once
//! and share it via [`table`].

use std::sync::OnceLock;

use arrayvec::ArrayVec;

/// Corner pairs of the twelve cube edges
///
/// The first four run around the bottom face, the next four are the
/// verticals, and the last four run around the top face.
pub const EDGES: [(u8, u8); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0), // bottom
    (0, 4), (1, 5), (3, 7), (2, 6), // verticals
    (4, 5), (5, 7), (7, 6), (6, 4), // top
];

/// A triangle list for one configuration, as a flat sequence of edge ids
///
/// The densest configuration (corners set in an alternating parity
/// pattern) emits eight single-corner triangles, so 24 ids suffice.
type Pattern = ArrayVec<u8, 24>;

/// Triangulations for all 256 corner-sign configurations
pub struct CubeTable {
    patterns: [Pattern; 256],
}

impl CubeTable {
    /// Returns the triangles separating set from clear corners, three edge
    /// ids per triangle
    pub fn triangles(&self, config: u8) -> &[u8] {
        &self.patterns[config as usize]
    }
}

/// Returns the shared case table, building it on first use
pub fn table() -> &'static CubeTable {
    static TABLE: OnceLock<CubeTable> = OnceLock::new();
    TABLE.get_or_init(|| CubeTable {
        patterns: std::array::from_fn(|config| {
            config_pairs(config as u8)
                .iter()
                .map(|&(a, b)| edge_between(a, b))
                .collect()
        }),
    })
}

/// Looks up the edge joining two corners
///
/// Every pair emitted by the pattern rules differs in exactly one bit, so
/// the lookup cannot fail.
fn edge_between(a: u8, b: u8) -> u8 {
    EDGES
        .iter()
        .position(|&(p, q)| (p, q) == (a, b) || (q, p) == (a, b))
        .unwrap() as u8
}

/// The two axes perpendicular to `axis`, in ascending order
fn other_axes(axis: u8) -> (u8, u8) {
    match axis {
        1 => (2, 4),
        2 => (1, 4),
        4 => (1, 2),
        _ => unreachable!(),
    }
}

/// Emits the surface triangles of one configuration as corner pairs
///
/// Each pair names the edge the vertex sits on.  Patterns append, so a
/// configuration with several disjoint features (say, two isolated
/// corners) collects the triangles of each.
fn config_pairs(config: u8) -> ArrayVec<(u8, u8), 24> {
    let at = |i: u8| (config >> i) & 1;
    let bitcount = config.count_ones();
    let mut out = ArrayVec::new();
    for coord in 0..8u8 {
        let cval = at(coord);
        let (ca, cb, cc) = (coord ^ 1, coord ^ 2, coord ^ 4);
        let (a, b, c) = (at(ca), at(cb), at(cc));

        // A corner disagreeing with all three neighbors cuts off a
        // tetrahedral tip (either polarity).
        if a != cval && b != cval && c != cval {
            out.extend([(coord, ca), (coord, cb), (coord, cc)]);
        }

        // Four set corners cluster around `coord`: a claw whose surface is
        // a hexagonal cap, fanned into four triangles.
        if bitcount == 4 && cval + a + b + c == 4 {
            let p0 = (ca, ca ^ 2);
            let p1 = (ca, ca ^ 4);
            let p2 = (cc, cc ^ 1);
            let p3 = (cc, cc ^ 2);
            let p4 = (cb, cb ^ 4);
            let p5 = (cb, cb ^ 1);
            out.extend([p0, p1, p2, p0, p2, p5, p5, p2, p3, p5, p3, p4]);
        }

        // Three corners in an L (or the five-corner complement): a
        // pentagonal cap fanned from the bend.  `axis` points at the
        // odd-one-out neighbor.
        if (bitcount == 3 && cval == 1 && a + b + c == 2)
            || (bitcount == 5 && cval == 0 && a + b + c == 1)
        {
            let axis = if a != cval {
                1
            } else if b != cval {
                2
            } else {
                4
            };
            let (a1, a2) = other_axes(axis);
            let p0 = (coord, coord ^ axis);
            let p1 = (coord ^ a1, coord ^ a1 ^ axis);
            let p2 = (coord ^ a1, coord ^ a1 ^ a2);
            let p3 = (coord ^ a2, coord ^ a1 ^ a2);
            let p4 = (coord ^ a2, coord ^ a2 ^ axis);
            out.extend([p0, p1, p2, p0, p2, p3, p0, p3, p4]);
        }

        // An isolated domino: two adjacent corners agree with each other
        // and with nothing else.  Wrapped in a quad band.
        for (pair, pval) in [(ca, a), (cb, b), (cc, c)] {
            if cval != pval || pair < coord {
                continue;
            }
            let n1 = [a, b, c].iter().filter(|&&v| v == cval).count();
            let n2 = [pair ^ 1, pair ^ 2, pair ^ 4]
                .iter()
                .filter(|&&n| at(n) == pval)
                .count();
            if n1 != 1 || n2 != 1 {
                continue;
            }
            let (a1, a2) = other_axes(coord ^ pair);
            let p0 = (coord, coord ^ a1);
            let p1 = (coord, coord ^ a2);
            let p2 = (pair, pair ^ a2);
            let p3 = (pair, pair ^ a1);
            out.extend([p0, p1, p2, p0, p2, p3]);
        }
    }
    if bitcount == 4 {
        // A zig-zag chain of four corners, one step along each axis.  The
        // chain has one end among corners 0-3, which keeps it from being
        // found twice.
        for coord in 0..4u8 {
            if at(coord) != 1 {
                continue;
            }
            let orders =
                [(1, 2, 4), (1, 4, 2), (2, 1, 4), (2, 4, 1), (4, 1, 2), (4, 2, 1)];
            for (a1, a2, a3) in orders {
                if at(coord ^ a1) == 1
                    && at(coord ^ a1 ^ a2) == 1
                    && at(coord ^ a1 ^ a2 ^ a3) == 1
                {
                    let p0 = (coord, coord ^ a3);
                    let p1 = (coord, coord ^ a2);
                    let p2 = (coord ^ a1 ^ a2, coord ^ a2);
                    let p3 = (coord ^ a1 ^ a2 ^ a3, coord ^ a2 ^ a3);
                    let p4 = (coord ^ a1 ^ a2 ^ a3, coord ^ a1 ^ a3);
                    let p5 = (coord ^ a1, coord ^ a1 ^ a3);
                    out.extend([p0, p1, p2, p0, p2, p5]);
                    out.extend([p5, p2, p3, p3, p4, p5]);
                }
            }
        }

        // A full face layer: the surface is a flat quad on the four edges
        // crossing the layer.
        for axis in [1u8, 2, 4] {
            let sum: u8 = (0..8u8).map(|coord| at(coord & !axis)).sum();
            if sum == 0 || sum == 8 {
                let (a1, a2) = other_axes(axis);
                let p0 = (0, axis);
                let p1 = (a1, a1 | axis);
                let p2 = (a1 | a2, 7);
                let p3 = (a2, a2 | axis);
                out.extend([p0, p1, p2, p0, p2, p3]);
            }
        }
    }
    out
}

////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_trivial_configs() {
        let t = table();
        assert!(t.triangles(0).is_empty());
        assert!(t.triangles(255).is_empty());
    }

    #[test]
    fn test_single_corner() {
        let t = table();
        // Corner 0 alone: one triangle on the three edges meeting there,
        // and the same tip cut from the other side.
        assert_eq!(t.triangles(1), &[0, 3, 4]);
        assert_eq!(t.triangles(254), &[0, 3, 4]);
    }

    #[test]
    fn test_domino_band() {
        // Corners 0 and 1: a band of two triangles around the pair
        assert_eq!(table().triangles(3), &[3, 4, 5, 3, 5, 1]);
    }

    #[test]
    fn test_bottom_layer_quad() {
        // The four bottom corners: a flat quad on the vertical edges
        assert_eq!(table().triangles(15), &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_alternating_parity() {
        // Even-parity corners set: eight isolated tips
        assert_eq!(table().triangles(0b0110_1001).len(), 24);
    }

    #[test]
    fn test_all_configs_well_formed() {
        let t = table();
        for config in 0..=255u8 {
            let tri = t.triangles(config);
            assert_eq!(tri.len() % 3, 0, "config {config}");
            assert!(tri.iter().all(|&e| e < 12), "config {config}");
            if config != 0 && config != 255 {
                assert!(!tri.is_empty(), "config {config}");
            }
            for t3 in tri.chunks_exact(3) {
                assert!(
                    t3[0] != t3[1] && t3[1] != t3[2] && t3[0] != t3[2],
                    "degenerate triangle in config {config}"
                );
            }
        }
    }

    #[test]
    fn test_complement_symmetry() {
        // Flipping inside and outside moves the vertices but must keep the
        // amount of surface.
        let t = table();
        for config in 0..=255u8 {
            assert_eq!(
                t.triangles(config).len(),
                t.triangles(!config).len(),
                "config {config}"
            );
        }
    }

    #[test]
    fn test_pattern_edges_cross_the_surface() {
        // Every referenced edge must join a set corner to a clear one.
        let t = table();
        for config in 0..=255u8 {
            for &e in t.triangles(config) {
                let (a, b) = EDGES[e as usize];
                let va = (config >> a) & 1;
                let vb = (config >> b) & 1;
                assert_ne!(va, vb, "config {config} edge {e}");
            }
        }
    }

    #[test]
    fn test_edges_are_cube_edges() {
        for (a, b) in EDGES {
            assert!(a < 8 && b < 8);
            assert_eq!((a ^ b).count_ones(), 1);
        }
    }
}
