//! Iterative single-partition quickhull.
//!
//! The kernel keeps the hull under construction as two coordinate streams
//! with a duplicated closing vertex, so every edge is a contiguous pair. The
//! input view doubles as the uncovered set: covered points are swap-removed
//! behind the live range, selected farthest points become vertices. There is
//! no recursion; each round culls the covered points, selects at most one
//! farthest point per edge and splices all of them into the ring in a single
//! shifting pass.

use crate::geometry::{along, EdgeLine, Point};
use crate::hull::Hull;
use crate::point_set::PointsMut;

// The cull walks edges in groups of four and points in groups of four, the
// tile shape the mask accumulation vectorizes over.
const EDGE_TILE: usize = 4;
const POINT_TILE: usize = 4;

/// Computes the convex hull of `pts`, permuting the view while it works.
///
/// The result is counter-clockwise, strictly convex, and starts at the
/// lowest vertex with ties towards the largest x. Collinear input collapses
/// to a two-vertex segment, a single repeated point to one vertex. Points
/// that sit exactly on a hull edge are covered, not vertices.
pub fn quickhull(mut pts: PointsMut<'_>) -> Hull {
    assert!(!pts.is_empty(), "quickhull needs at least one point");

    let seeds = extreme_points(&pts);
    let (mut hx, mut hy) = seed_ring(&mut pts, seeds);

    let mut mask = Vec::new();
    let mut round = 0usize;
    while !pts.is_empty() {
        cull_covered(&hx, &hy, &mut pts, &mut mask);
        if pts.is_empty() {
            break;
        }

        round += 1;
        tracing::trace!(
            round,
            uncovered = pts.len(),
            hull = hx.len() - 1,
            "quickhull round"
        );

        let picks = farthest_per_edge(&hx, &hy, &pts);
        let added = splice_picks(&mut hx, &mut hy, &pts, &picks);
        if added == 0 {
            // Whatever is left lies on the boundary; absorb it.
            pts.truncate(0);
            break;
        }
        remove_picked(&mut pts, &picks);

        debug_assert!(ring_is_convex(&hx, &hy), "quickhull ring lost convexity");
    }

    hx.pop();
    hy.pop();
    Hull::from_streams(hx, hy)
}

// Seed order is yMin, xMax, yMax, xMin. The tie rules (rightward, upward,
// leftward, downward in that order) make the seed ring counter-clockwise
// for any input and vertex 0 canonical.
fn extreme_points(pts: &PointsMut<'_>) -> [usize; 4] {
    let mut ids = [0usize; 4];
    for i in 1..pts.len() {
        let p = pts.get(i);
        let x_max = pts.get(ids[1]);
        let x_min = pts.get(ids[3]);
        if p.x > x_max.x || (p.x == x_max.x && p.y > x_max.y) {
            ids[1] = i;
        } else if p.x < x_min.x || (p.x == x_min.x && p.y < x_min.y) {
            ids[3] = i;
        }

        let y_min = pts.get(ids[0]);
        let y_max = pts.get(ids[2]);
        if p.y > y_max.y || (p.y == y_max.y && p.x < y_max.x) {
            ids[2] = i;
        } else if p.y < y_min.y || (p.y == y_min.y && p.x > y_min.x) {
            ids[0] = i;
        }
    }
    ids
}

// Deduplicates the seed indices keeping first occurrences, writes the 1..=4
// survivors plus the closing duplicate, and swap-removes them from the
// uncovered set in descending index order so the indices stay valid.
fn seed_ring(pts: &mut PointsMut<'_>, seeds: [usize; 4]) -> (Vec<f32>, Vec<f32>) {
    let mut uniq: Vec<usize> = Vec::with_capacity(4);
    for id in seeds {
        if !uniq.contains(&id) {
            uniq.push(id);
        }
    }

    let mut hx = Vec::with_capacity(uniq.len() + 1);
    let mut hy = Vec::with_capacity(uniq.len() + 1);
    for &id in &uniq {
        let p = pts.get(id);
        hx.push(p.x);
        hy.push(p.y);
    }
    hx.push(hx[0]);
    hy.push(hy[0]);

    uniq.sort_unstable_by(|a, b| b.cmp(a));
    for id in uniq {
        pts.swap_remove(id);
    }

    (hx, hy)
}

// One byte per uncovered point, OR-accumulated across every edge: nonzero
// means strictly outside at least one edge, zero means covered. Covered
// points are then compacted behind the live range with two pointers.
fn cull_covered(hx: &[f32], hy: &[f32], pts: &mut PointsMut<'_>, mask: &mut Vec<u8>) {
    let n = pts.len();
    mask.clear();
    mask.resize(n, 0);

    let lines: Vec<EdgeLine> = (0..hx.len() - 1)
        .map(|e| {
            EdgeLine::new(
                Point::new(hx[e], hy[e]),
                Point::new(hx[e + 1], hy[e + 1]),
            )
        })
        .collect();

    for tile in lines.chunks(EDGE_TILE) {
        let mut i = 0;
        while i < n {
            let hi = (i + POINT_TILE).min(n);
            for line in tile {
                for j in i..hi {
                    let outside = line.eval(pts.get(j)) < 0.;
                    mask[j] |= u8::from(outside);
                }
            }
            i = hi;
        }
    }

    let mut i = 0usize;
    let mut j = n - 1;
    while i <= j {
        if mask[i] == 0 {
            while j > i && mask[j] == 0 {
                j -= 1;
            }
            if i == j {
                break;
            }
            mask.swap(i, j);
            pts.swap(i, j);
            j -= 1;
        }
        i += 1;
    }
    pts.truncate(i);
}

// One selection per edge: the uncovered point with the most negative signed
// area, `None` when nothing is strictly outside. Equal areas prefer the
// point farthest along the edge direction, then the lowest index. The area
// tie set lies on a supporting line, so taking its extreme keeps every
// inserted vertex an extreme point; a mid-segment tie winner would become a
// collinear vertex of the final ring.
fn farthest_per_edge(hx: &[f32], hy: &[f32], pts: &PointsMut<'_>) -> Vec<Option<usize>> {
    let edge_count = hx.len() - 1;
    let mut picks = Vec::with_capacity(edge_count);
    for e in 0..edge_count {
        let from = Point::new(hx[e], hy[e]);
        let to = Point::new(hx[e + 1], hy[e + 1]);
        let line = EdgeLine::new(from, to);

        let mut best = 0.;
        let mut best_along = f64::NEG_INFINITY;
        let mut pick = None;
        for i in 0..pts.len() {
            let p = pts.get(i);
            let d = line.eval(p);
            if d < best {
                best = d;
                best_along = along(from, to, p);
                pick = Some(i);
            } else if d == best && d < 0. {
                let a = along(from, to, p);
                if a > best_along {
                    best_along = a;
                    pick = Some(i);
                }
            }
        }
        picks.push(pick);
    }
    picks
}

// Splices every selected point into the ring in one pass: prefix offsets
// say how far each kept vertex shifts right, the tail (closing duplicate
// included) moves exactly once, and each new vertex lands in the hole
// opened between its edge's endpoints. m insertions cost O(K + m), not
// O(K * m). Returns the number of inserted vertices.
fn splice_picks(
    hx: &mut Vec<f32>,
    hy: &mut Vec<f32>,
    pts: &PointsMut<'_>,
    picks: &[Option<usize>],
) -> usize {
    let n = hx.len() - 1;
    debug_assert_eq!(picks.len(), n);

    let mut offsets = vec![0usize; n + 1];
    for i in 1..=n {
        offsets[i] = offsets[i - 1] + usize::from(picks[i - 1].is_some());
    }
    let added = offsets[n];
    if added == 0 {
        return 0;
    }

    hx.resize(n + 1 + added, 0.);
    hy.resize(n + 1 + added, 0.);

    // offsets[0] == 0, so the walk down always stops.
    let mut i = n;
    while offsets[i] != 0 {
        hx[i + offsets[i]] = hx[i];
        hy[i + offsets[i]] = hy[i];
        i -= 1;
    }

    for (e, pick) in picks.iter().enumerate() {
        if let Some(p) = *pick {
            let at = e + offsets[e] + 1;
            hx[at] = pts.x(p);
            hy[at] = pts.y(p);
        }
    }

    added
}

// Descending order keeps the remaining indices valid across swap-removes.
fn remove_picked(pts: &mut PointsMut<'_>, picks: &[Option<usize>]) {
    let mut ids: Vec<usize> = picks.iter().flatten().copied().collect();
    ids.sort_unstable_by(|a, b| b.cmp(a));
    debug_assert!(
        ids.windows(2).all(|w| w[0] != w[1]),
        "a point was selected for two edges"
    );
    for id in ids {
        pts.swap_remove(id);
    }
}

fn ring_is_convex(hx: &[f32], hy: &[f32]) -> bool {
    let n = hx.len() - 1;
    if n < 3 {
        return true;
    }
    (0..n).all(|i| {
        let a = Point::new(hx[i], hy[i]);
        let b = Point::new(hx[(i + 1) % n], hy[(i + 1) % n]);
        let p = Point::new(hx[(i + 2) % n], hy[(i + 2) % n]);
        crate::geometry::side(p, a, b) > 0.
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_set::PointSet;

    fn hull_of(points: &[(f32, f32)]) -> Hull {
        let mut set = PointSet::from_points(points.iter().map(|&(x, y)| Point::new(x, y)));
        quickhull(set.as_mut())
    }

    fn vertices(hull: &Hull) -> Vec<(f32, f32)> {
        hull.points().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn square_in_order() {
        let hull = hull_of(&[(0., 0.), (1., 0.), (1., 1.), (0., 1.)]);
        // Canonical start: lowest, then rightmost.
        assert_eq!(
            vertices(&hull),
            vec![(1., 0.), (1., 1.), (0., 1.), (0., 0.)]
        );
    }

    #[test]
    fn interior_point_is_dropped() {
        let hull = hull_of(&[(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0.5, 0.5)]);
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn collinear_input_collapses_to_a_segment() {
        let hull = hull_of(&[(0., 0.), (1., 1.), (2., 2.), (3., 3.)]);
        assert_eq!(vertices(&hull), vec![(0., 0.), (3., 3.)]);
    }

    #[test]
    fn point_on_an_edge_is_covered() {
        let hull = hull_of(&[(0., 0.), (4., 0.), (2., 3.), (2., 0.)]);
        assert_eq!(vertices(&hull), vec![(4., 0.), (2., 3.), (0., 0.)]);
    }

    #[test]
    fn all_points_equal() {
        let hull = hull_of(&[(2., 2.), (2., 2.), (2., 2.)]);
        assert_eq!(vertices(&hull), vec![(2., 2.)]);
    }

    #[test]
    fn single_point() {
        let hull = hull_of(&[(-3., 7.)]);
        assert_eq!(hull.len(), 1);
    }

    #[test]
    fn two_points() {
        let hull = hull_of(&[(1., 5.), (0., 0.)]);
        assert_eq!(vertices(&hull), vec![(0., 0.), (1., 5.)]);
    }

    #[test]
    fn collinear_area_tie_keeps_only_the_extremes() {
        // (16,-2), (17,0) and (18,2) lie on one supporting line parallel to
        // the seed edge from (10,-10) to (20,10), so their signed areas tie
        // exactly. The middle point must end up covered, not a vertex,
        // whatever order the scan sees them in.
        let hull = hull_of(&[
            (10., -10.),
            (20., 10.),
            (0., 20.),
            (-5., 0.),
            (16., -2.),
            (17., 0.),
            (18., 2.),
        ]);
        assert!(crate::analysis::is_strictly_convex(&hull));
        assert_eq!(hull.len(), 6);
        assert!(!vertices(&hull).contains(&(17., 0.)));
        assert!(vertices(&hull).contains(&(16., -2.)));
        assert!(vertices(&hull).contains(&(18., 2.)));
    }

    #[test]
    fn needle_rounds_terminate() {
        // Points on a parabola force several insertion rounds.
        let pts: Vec<(f32, f32)> = (-20..=20)
            .map(|i| {
                let x = i as f32 / 2.;
                (x, x * x)
            })
            .collect();
        let hull = hull_of(&pts);
        assert!(crate::analysis::is_strictly_convex(&hull));
        // Every parabola sample is extreme, plus nothing else.
        assert_eq!(hull.len(), pts.len());
    }
}
