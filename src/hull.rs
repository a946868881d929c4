//! Ordered convex hulls.

use crate::geometry::Point;

/// A simple convex polygon in counter-clockwise orientation, stored as two
/// coordinate streams without a closing duplicate.
///
/// Vertex 0 is canonical: the smallest y, ties broken towards the largest x.
/// Degenerate hulls of one vertex (all input points equal) or two vertices
/// (collinear input) are valid values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hull {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl Hull {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
        }
    }

    pub(crate) fn from_streams(xs: Vec<f32>, ys: Vec<f32>) -> Self {
        assert_eq!(xs.len(), ys.len(), "coordinate streams differ in length");
        Self { xs, ys }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn vertex(&self, i: usize) -> Point {
        Point::new(self.xs[i], self.ys[i])
    }

    /// Vertex accessor that wraps modulo the hull length. It stands in for
    /// the duplicated closing vertex the edge walks would otherwise need.
    pub fn wrap(&self, i: usize) -> Point {
        self.vertex(i % self.len())
    }

    pub(crate) fn push(&mut self, p: Point) {
        self.xs.push(p.x);
        self.ys.push(p.y);
    }

    pub(crate) fn pop(&mut self) {
        self.xs.pop();
        self.ys.pop();
    }

    /// Vertices in counter-clockwise order, starting at the canonical one.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| Point::new(x, y))
    }

    /// Directed edges, the closing one included.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.len()).map(|i| (self.vertex(i), self.wrap(i + 1)))
    }

    pub fn xs(&self) -> &[f32] {
        &self.xs
    }

    pub fn ys(&self) -> &[f32] {
        &self.ys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Hull {
        Hull::from_streams(vec![4., 2., 0.], vec![0., 3., 0.])
    }

    #[test]
    fn wrap_reaches_the_start() {
        let hull = triangle();
        assert_eq!(hull.wrap(3), hull.vertex(0));
        assert_eq!(hull.wrap(4), hull.vertex(1));
    }

    #[test]
    fn edges_close_the_ring() {
        let hull = triangle();
        let edges: Vec<_> = hull.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Point::new(0., 0.), Point::new(4., 0.)));
    }
}
