//! Parallel planar convex hulls.
//!
//! The crate computes the convex hull of large sets of single-precision 2D
//! points with a divide-and-conquer quickhull. Three subsystems do the
//! work:
//!
//! - an iterative, non-recursive quickhull kernel that culls covered points
//!   with a vectorizable double-precision tile and splices whole batches of
//!   new vertices into the hull in one pass;
//! - a merge kernel that combines two hulls by walking their boundaries,
//!   crossing over whenever the edge about to be drawn would cut into the
//!   other hull;
//! - a parallel orchestrator that statically partitions the input across
//!   worker threads and folds the per-worker hulls up a binary tree whose
//!   scheduling is lock-free (one atomic token per worker, release/acquire).
//!
//! # Crate layout
//!
//! Each algorithm is a struct implementing [`HullBuilder`]:
//!
//! - [`Quickhull`] runs the kernel on the whole set, single-threaded.
//! - [`ParallelHull`] partitions across worker threads and merges.
//!
//! Merging two previously computed hulls is exposed directly as
//! [`merge_hulls`], and the distributed form of the reduction as
//! [`tree_reduce`] over a [`HullExchange`] transport with the [`wire`]
//! codec.
//!
//! # Example
//!
//! ```rust
//! use parhull::{HullBuilder, ParallelHull, PointSet};
//!
//! let mut points = PointSet::from_streams(
//!     vec![0.0, 1.0, 1.0, 0.0, 0.5],
//!     vec![0.0, 0.0, 1.0, 1.0, 0.5],
//! );
//!
//! let hull = ParallelHull { workers: 2, ..Default::default() }.build(&mut points);
//!
//! assert_eq!(hull.len(), 4);
//! // Vertex 0 is canonical: the lowest point, ties towards the right.
//! assert_eq!((hull.vertex(0).x, hull.vertex(0).y), (1.0, 0.0));
//! ```

pub mod algorithms;
pub mod analysis;
pub mod geometry;
mod hull;
mod point_set;
pub mod wire;


pub use crate::algorithms::merge::merge_hulls;
pub use crate::algorithms::parallel::parallel_hull;
pub use crate::algorithms::quickhull::quickhull;
pub use crate::algorithms::reduce::{tree_reduce, HullExchange};
pub use crate::geometry::Point;
pub use crate::hull::Hull;
pub use crate::point_set::{PointSet, PointsMut};

/// An algorithm that turns a point set into its convex hull.
///
/// Builders are free to permute the set while they work; apart from the
/// reordering, the points are left in place.
pub trait HullBuilder {
    fn build(&self, points: &mut PointSet) -> Hull;
}

/// # Single-partition quickhull
///
/// The iterative kernel on one thread. Degenerate inputs are not errors:
/// collinear points produce a two-vertex hull, coincident points a single
/// vertex.
///
/// # Example
///
/// ```rust
/// use parhull::{HullBuilder, PointSet, Quickhull};
///
/// let mut points = PointSet::from_streams(
///     vec![0.0, 4.0, 2.0, 2.0],
///     vec![0.0, 0.0, 3.0, 0.0],
/// );
///
/// let hull = Quickhull.build(&mut points);
///
/// // (2, 0) sits on the bottom edge and is covered, not a vertex.
/// assert_eq!(hull.len(), 3);
/// ```
pub struct Quickhull;

impl HullBuilder for Quickhull {
    fn build(&self, points: &mut PointSet) -> Hull {
        crate::algorithms::quickhull::quickhull(points.as_mut())
    }
}

/// # Parallel divide-and-conquer hull
///
/// Carves the input into one contiguous slice per worker, runs quickhull on
/// each slice (further subdivided when `sub_problem_cap` is set) and merges
/// the per-worker hulls in a binary-tree reduction where each worker
/// synchronizes only with the partners it merges with.
///
/// The output is the same vertex set for any worker count.
#[derive(Clone, Copy, Debug)]
pub struct ParallelHull {
    /// Worker thread count; slices are carved as evenly as possible.
    pub workers: usize,
    /// Upper bound on the size of a quickhull sub-problem inside one
    /// worker. `None` hands every worker its whole slice at once.
    pub sub_problem_cap: Option<usize>,
}

impl Default for ParallelHull {
    fn default() -> Self {
        Self {
            workers: 1,
            sub_problem_cap: None,
        }
    }
}

impl HullBuilder for ParallelHull {
    fn build(&self, points: &mut PointSet) -> Hull {
        crate::algorithms::parallel::parallel_hull(points, self.workers, self.sub_problem_cap)
    }
}
