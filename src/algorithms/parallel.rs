//! Threaded orchestration: static partitioning, per-worker local hulls and
//! a lock-free binary-tree merge reduction.
//!
//! Every worker owns one slot. The slot's token counts completed merge
//! rounds: a worker at token `k` has folded in `2^k - 1` partners, and its
//! hull covers the corresponding group of slices. Writes to a slot's hull
//! happen before the release store of the token that publishes them;
//! partners spin with acquire loads, so observing a token makes the hull
//! behind it visible. Exactly one other worker ever touches a given slot:
//! the lower-id partner that absorbs it after the owner's final publish.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::merge::merge_hulls;
use super::quickhull::quickhull;
use crate::hull::Hull;
use crate::point_set::{PointSet, PointsMut};

/// Token of a worker that will never merge again. It satisfies any level a
/// partner could spin on.
const DONE: usize = usize::MAX;

struct HullSlot {
    hull: UnsafeCell<Option<Hull>>,
    token: AtomicUsize,
}

// One writer (the owning worker) and one eventual reader (the absorbing
// partner), sequenced through the token. See the module docs.
unsafe impl Sync for HullSlot {}

impl HullSlot {
    fn new() -> Self {
        Self {
            hull: UnsafeCell::new(None),
            token: AtomicUsize::new(0),
        }
    }

    /// Stores `hull` and then the token that makes it visible.
    fn publish(&self, hull: Hull, token: usize) {
        // SAFETY: only the owning worker writes the cell, and no reader
        // looks at it before the release store below is observed.
        unsafe { *self.hull.get() = Some(hull) };
        self.token.store(token, Ordering::Release);
    }

    /// Takes the slot's hull. The caller must own the slot, or must have
    /// observed with an acquire load a token the owner stored after its
    /// final write to the cell.
    fn take(&self) -> Option<Hull> {
        // SAFETY: per the protocol above the caller has exclusive access.
        unsafe { (*self.hull.get()).take() }
    }

    /// Spins until the owner's token reaches `token`.
    fn wait_for(&self, token: usize) {
        while self.token.load(Ordering::Acquire) < token {
            std::hint::spin_loop();
        }
    }

    fn finish(&self) {
        self.token.store(DONE, Ordering::Release);
    }
}

/// Computes the hull of `points` with `workers` OS threads.
///
/// The input is carved into one contiguous slice per worker; each worker
/// hulls its slice (splitting it further when it exceeds
/// `sub_problem_cap`), then the per-worker hulls fold up a binary tree in
/// which a worker only ever synchronizes with the partners it merges with.
pub fn parallel_hull(
    points: &mut PointSet,
    workers: usize,
    sub_problem_cap: Option<usize>,
) -> Hull {
    assert!(workers >= 1, "at least one worker is required");
    assert!(!points.is_empty(), "cannot hull an empty point set");

    let start = Instant::now();
    let counts = carve(points.len(), workers);
    if counts.len() < workers {
        tracing::debug!(
            requested = workers,
            effective = counts.len(),
            "fewer slices than workers, dropping idle ones"
        );
    }
    let slots: Vec<HullSlot> = counts.iter().map(|_| HullSlot::new()).collect();

    let views = points.split_mut(&counts);
    std::thread::scope(|scope| {
        for (id, slice) in views.into_iter().enumerate() {
            let slots = &slots;
            scope.spawn(move || run_worker(id, slice, sub_problem_cap, slots));
        }
    });

    let hull = slots[0].take().expect("reduction left no hull in slot 0");
    tracing::info!(
        workers = counts.len(),
        vertices = hull.len(),
        elapsed = ?start.elapsed(),
        "parallel hull done"
    );
    hull
}

// Worker i < W-1 takes ceil(N/W) points and the last worker the remainder;
// trailing workers that would come up empty are dropped.
fn carve(n: usize, workers: usize) -> Vec<usize> {
    let chunk = n.div_ceil(workers);
    let workers = n.div_ceil(chunk);
    let mut counts = vec![chunk; workers];
    counts[workers - 1] = n - chunk * (workers - 1);
    counts
}

fn run_worker(id: usize, slice: PointsMut<'_>, cap: Option<usize>, slots: &[HullSlot]) {
    let points = slice.len();
    let hull = local_hull(slice, cap);
    tracing::debug!(worker = id, points, vertices = hull.len(), "slice solved");
    slots[id].publish(hull, 1);

    let mut level = 0usize;
    loop {
        if id & (1 << level) != 0 {
            // This worker is the junior of the pair at this level; its hull
            // stays published for the senior to absorb.
            break;
        }
        let partner = id + (1 << level);
        if partner >= slots.len() {
            break;
        }

        slots[partner].wait_for(level + 1);
        let theirs = slots[partner].take().expect("partner retired without a hull");
        let ours = slots[id].take().expect("own slot was emptied early");
        tracing::trace!(worker = id, partner, level, "merging partner hull");
        slots[id].publish(merge_hulls(&ours, &theirs), level + 2);
        level += 1;
    }
    slots[id].finish();
}

// Phase 1: the worker's own slice. A slice above the cap is split into
// cache-sized sub-problems whose hulls fold up sequentially, pairing the
// i-th hull with the (i + half)-th; the merges are cheap compared to the
// quickhull runs they amortize.
fn local_hull(slice: PointsMut<'_>, cap: Option<usize>) -> Hull {
    match cap {
        Some(cap) if cap > 0 && slice.len() > cap => {
            let parts = slice.len().div_ceil(cap);
            let counts = carve(slice.len(), parts);
            let mut hulls: Vec<Hull> = slice
                .split_many(&counts)
                .into_iter()
                .map(quickhull)
                .collect();

            while hulls.len() > 1 {
                let half = hulls.len() / 2;
                let tail = hulls.split_off(half);
                for (i, other) in tail.into_iter().enumerate() {
                    if i < half {
                        hulls[i] = merge_hulls(&hulls[i], &other);
                    } else {
                        hulls.push(other);
                    }
                }
            }
            hulls.pop().expect("at least one sub-problem hull")
        }
        _ => quickhull(slice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn set(points: &[(f32, f32)]) -> PointSet {
        PointSet::from_points(points.iter().map(|&(x, y)| Point::new(x, y)))
    }

    fn vertex_set(hull: &Hull) -> Vec<(u32, u32)> {
        let mut v: Vec<_> = hull
            .points()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn carve_is_even() {
        assert_eq!(carve(10, 3), vec![4, 4, 2]);
        assert_eq!(carve(9, 3), vec![3, 3, 3]);
        assert_eq!(carve(1, 1), vec![1]);
    }

    #[test]
    fn carve_drops_idle_workers() {
        // ceil(5/4) * 3 >= 5: four workers would leave the last one empty.
        assert_eq!(carve(5, 4), vec![2, 2, 1]);
        assert_eq!(carve(3, 8), vec![1, 1, 1]);
    }

    #[test]
    fn one_worker_matches_quickhull() {
        let points = [(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0.5, 0.5)];
        let mut a = set(&points);
        let mut b = set(&points);
        let sequential = quickhull(a.as_mut());
        let parallel = parallel_hull(&mut b, 1, None);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn worker_counts_agree() {
        let points: Vec<(f32, f32)> = (0..40)
            .map(|i| {
                let a = f64::from(i) * 0.37;
                ((10. * a.cos()) as f32, (10. * a.sin()) as f32)
            })
            .collect();
        let reference = quickhull(set(&points).as_mut());
        for workers in [2, 3, 5, 8] {
            let hull = parallel_hull(&mut set(&points), workers, None);
            assert_eq!(vertex_set(&reference), vertex_set(&hull), "workers = {workers}");
        }
    }

    #[test]
    fn more_workers_than_points() {
        let points = [(0., 0.), (4., 0.), (2., 3.), (2., 1.)];
        let hull = parallel_hull(&mut set(&points), 16, None);
        assert_eq!(hull.len(), 3);
    }

    #[test]
    fn sub_problem_cap_splits_and_agrees() {
        let points: Vec<(f32, f32)> = (0..64)
            .map(|i| {
                let a = f64::from(i) * 0.59;
                ((5. * a.cos()) as f32, (5. * a.sin()) as f32)
            })
            .collect();
        let reference = quickhull(set(&points).as_mut());
        let hull = parallel_hull(&mut set(&points), 2, Some(7));
        assert_eq!(vertex_set(&reference), vertex_set(&hull));
    }

    #[test]
    fn collinear_slices_merge_cleanly() {
        let points: Vec<(f32, f32)> = (0..12).map(|i| (i as f32, i as f32)).collect();
        let hull = parallel_hull(&mut set(&points), 4, None);
        assert_eq!(hull.len(), 2);
        assert_eq!(hull.vertex(0), Point::new(0., 0.));
        assert_eq!(hull.vertex(1), Point::new(11., 11.));
    }
}
