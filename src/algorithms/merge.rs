//! Merging two convex hulls.
//!
//! The walk starts at the globally lowest vertex and extends the merged
//! boundary from one source hull (the main) for as long as the other (the
//! alternate) stays on the inner side of the edge about to be drawn. When
//! the alternate pierces that edge the sources trade roles, and a tangent
//! fix-up skips any alternate vertices already covered by the next edge.
//! Cursors only move forward; the wrapping vertex accessor plays the part of
//! the duplicated closing vertex, so no cursor ever resets.

use super::quickhull::quickhull;
use crate::geometry::{along, seg_len_sq, EdgeLine, Point};
use crate::hull::Hull;
use crate::point_set::PointSet;

/// Convex hull of the union of two hulls.
///
/// Both inputs must start at their canonical vertex; they are left
/// untouched and the result is freshly allocated. A walk that overruns its
/// sources is an internal bug and aborts.
pub fn merge_hulls(h1: &Hull, h2: &Hull) -> Hull {
    if h1.len() < 3 || h2.len() < 3 {
        return merge_degenerate(h1, h2);
    }
    let (n1, n2) = (h1.len(), h2.len());
    let mut out = Hull::with_capacity(n1 + n2);

    // The lower of the two start vertices is on the merged hull; ties go
    // towards the larger x like everywhere else.
    let (a, b) = (h1.vertex(0), h2.vertex(0));
    let mut main_is_h1 = if a.y != b.y { a.y < b.y } else { a.x >= b.x };
    let h1_first = main_is_h1;
    let mut i1 = 0usize;
    let mut i2 = 0usize;
    if main_is_h1 {
        out.push(a);
        i1 = 1;
    } else {
        out.push(b);
        i2 = 1;
    }

    while i1 <= n1 || i2 <= n2 {
        let swap = if main_is_h1 {
            advance_alternate(&out, h1, h2, i1, &mut i2)
        } else {
            advance_alternate(&out, h2, h1, i2, &mut i1)
        };
        if swap {
            main_is_h1 = !main_is_h1;
        }

        let (main, cursor, main_is_first) = if main_is_h1 {
            (h1, &mut i1, h1_first)
        } else {
            (h2, &mut i2, !h1_first)
        };
        if *cursor > main.len() {
            break;
        }
        let v = if *cursor == main.len() {
            // Only the hull that did not start the walk may close through
            // its first vertex; the starter reaching its end means the walk
            // is back where it began.
            if main_is_first {
                break;
            }
            main.vertex(0)
        } else {
            main.vertex(*cursor)
        };
        out.push(v);
        *cursor += 1;

        assert!(
            out.len() <= n1 + n2,
            "merge walk overran its sources: {} vertices out of {n1} + {n2}",
            out.len(),
        );
    }

    if out.len() > 1 && out.vertex(out.len() - 1) == out.vertex(0) {
        out.pop();
    }

    debug_assert!(
        crate::analysis::is_strictly_convex(&out),
        "merged hull is not strictly convex"
    );
    out
}

// Advances the alternate cursor towards its tangency with the edge the main
// hull wants to draw next, scanning while the signed area keeps shrinking
// and stays nonnegative. Returns true when the alternate hull crosses the
// edge's line, or touches it strictly beyond the edge's endpoint, and must
// take over the walk.
fn advance_alternate(
    out: &Hull,
    main: &Hull,
    alt: &Hull,
    i_main: usize,
    i_alt: &mut usize,
) -> bool {
    if *i_alt > alt.len() + 1 {
        return false;
    }

    let last = out.vertex(out.len() - 1);
    let target = main.wrap(i_main);
    let line = EdgeLine::new(last, target);

    let mut prev = f64::INFINITY;
    let mut cur = line.eval(alt.wrap(*i_alt));
    while prev >= cur && *i_alt <= alt.len() && cur >= 0. {
        *i_alt += 1;
        prev = cur;
        cur = line.eval(alt.wrap(*i_alt));
    }

    let mut swap = cur < 0.;
    if !swap {
        *i_alt -= 1;
        // Stopping exactly on the line only takes the walk over when the
        // alternate vertex sits strictly beyond the edge's endpoint;
        // anything closer is covered by the edge itself. This is what keeps
        // vertices on a shared supporting line out of the result.
        let stop = alt.wrap(*i_alt);
        if line.eval(stop) == 0.
            && along(last, target, stop) > 0.
            && seg_len_sq(last, stop) > seg_len_sq(last, target)
        {
            swap = true;
        }
    }

    if swap {
        tangent_fixup(last, alt, i_alt);
    }
    swap
}

// After a swap the incoming hull may still hold vertices covered by the
// edge the walk is about to draw: skip while the successor is not strictly
// to the left of the line from the merged hull's tip. A collinear successor
// is skipped too, so of several vertices on one line the farthest wins.
fn tangent_fixup(last: Point, alt: &Hull, i_alt: &mut usize) {
    while *i_alt < alt.len() {
        let line = EdgeLine::new(last, alt.vertex(*i_alt));
        let next = alt.wrap(*i_alt + 1);
        if line.eval(next) > 0. {
            break;
        }
        *i_alt += 1;
    }
}

// A hull with fewer than three vertices cannot drive the walk's
// supporting-line reasoning, and only tiny slices (collinear or
// single-point) produce one; rebuild the union directly instead.
fn merge_degenerate(h1: &Hull, h2: &Hull) -> Hull {
    let mut pts = PointSet::with_capacity(h1.len() + h2.len());
    for p in h1.points().chain(h2.points()) {
        pts.push(p);
    }
    quickhull(pts.as_mut())
}
