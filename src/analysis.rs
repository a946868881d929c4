//! Quality checks over hull results.
//!
//! These are the properties the kernels promise: strict convexity, coverage
//! of every input point, the canonical start vertex and duplicate-free
//! vertices. The kernels assert them in debug builds; tests assert them
//! always.

use itertools::Itertools;
use rayon::prelude::*;

use crate::geometry::{along, seg_len_sq, side, EdgeLine, Point};
use crate::hull::Hull;

/// Every consecutive vertex triple turns strictly left. Hulls of fewer than
/// three vertices are degenerate but fine.
pub fn is_strictly_convex(hull: &Hull) -> bool {
    if hull.len() < 3 {
        return true;
    }
    hull.points()
        .chain(hull.points().take(2))
        .tuple_windows()
        .all(|(a, b, p)| side(p, a, b) > 0.)
}

/// True when every point of the streams lies on or inside the hull, i.e. no
/// directed edge sees a point strictly to its right.
pub fn covers(hull: &Hull, xs: &[f32], ys: &[f32]) -> bool {
    assert_eq!(xs.len(), ys.len(), "coordinate streams differ in length");
    match hull.len() {
        0 => xs.is_empty(),
        1 => {
            let v = hull.vertex(0);
            xs.par_iter()
                .zip(ys.par_iter())
                .all(|(&x, &y)| x == v.x && y == v.y)
        }
        2 => {
            // A degenerate segment covers exactly the points between its
            // endpoints.
            let (a, b) = (hull.vertex(0), hull.vertex(1));
            let span = seg_len_sq(a, b);
            xs.par_iter().zip(ys.par_iter()).all(|(&x, &y)| {
                let p = Point::new(x, y);
                side(p, a, b) == 0. && (0. ..=span).contains(&along(a, b, p))
            })
        }
        _ => {
            let lines: Vec<EdgeLine> = hull
                .edges()
                .map(|(from, to)| EdgeLine::new(from, to))
                .collect();
            xs.par_iter().zip(ys.par_iter()).all(|(&x, &y)| {
                let p = Point::new(x, y);
                lines.iter().all(|line| line.eval(p) >= 0.)
            })
        }
    }
}

/// Vertex 0 must be the lowest vertex, ties broken towards the largest x.
pub fn has_canonical_start(hull: &Hull) -> bool {
    if hull.is_empty() {
        return false;
    }
    let first = hull.vertex(0);
    hull.points()
        .all(|p| p.y > first.y || (p.y == first.y && p.x <= first.x))
}

/// No two vertices share both coordinates.
pub fn is_duplicate_free(hull: &Hull) -> bool {
    let mut seen: Vec<(u32, u32)> = hull
        .points()
        .map(|p| (p.x.to_bits(), p.y.to_bits()))
        .collect();
    seen.sort_unstable();
    seen.windows(2).all(|w| w[0] != w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::Hull;

    fn square() -> Hull {
        Hull::from_streams(vec![1., 1., 0., 0.], vec![0., 1., 1., 0.])
    }

    #[test]
    fn square_passes_all_checks() {
        let hull = square();
        assert!(is_strictly_convex(&hull));
        assert!(has_canonical_start(&hull));
        assert!(is_duplicate_free(&hull));
        assert!(covers(&hull, &[0.5, 0., 1.], &[0.5, 0., 0.5]));
    }

    #[test]
    fn reflex_ring_fails_convexity() {
        let hull = Hull::from_streams(vec![2., 4., 2., 0.], vec![0., 4., 1., 4.]);
        assert!(!is_strictly_convex(&hull));
    }

    #[test]
    fn collinear_triple_fails_convexity() {
        let hull = Hull::from_streams(vec![4., 2., 0., 0.], vec![0., 0., 0., 4.]);
        assert!(!is_strictly_convex(&hull));
    }

    #[test]
    fn outside_point_fails_coverage() {
        assert!(!covers(&square(), &[2.], &[0.5]));
    }

    #[test]
    fn segment_coverage_is_extent_aware() {
        let segment = Hull::from_streams(vec![0., 3.], vec![0., 3.]);
        assert!(covers(&segment, &[1.], &[1.]));
        assert!(!covers(&segment, &[4.], &[4.]));
        assert!(!covers(&segment, &[1.], &[2.]));
    }

    #[test]
    fn wrong_start_vertex_is_flagged() {
        let hull = Hull::from_streams(vec![0., 1., 1., 0.], vec![0., 0., 1., 1.]);
        assert!(!has_canonical_start(&hull));
    }
}
