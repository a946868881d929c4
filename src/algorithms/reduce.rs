//! Fabric-agnostic tree reduction for the distributed variant.
//!
//! The schedule is the one the threaded reducer runs; only the primitive
//! changes. Instead of spinning on a token and taking over a hull in place,
//! a rank receives its partner's serialized hull, or serializes its own,
//! sends it to the senior partner and retires. Every rank sends at most
//! once; rank 0 never sends and returns the final hull.

use super::merge::merge_hulls;
use crate::hull::Hull;

/// Transport seam for cross-process merges.
///
/// `send` transfers a hull to a peer rank, `recv` produces the hull a peer
/// sent. Both ends drop their local copy after the transfer; the hull
/// representation on the wire is the [`wire`](crate::wire) codec's.
pub trait HullExchange {
    type Error;

    fn send(&mut self, peer: usize, hull: &Hull) -> Result<(), Self::Error>;
    fn recv(&mut self, peer: usize) -> Result<Hull, Self::Error>;
}

/// Folds the per-rank hulls down the binary tree.
///
/// Returns `Some` with the combined hull on rank 0 and `None` on every rank
/// that handed its hull off. The reduction is exact for any rank count, not
/// only powers of two: a rank whose partner does not exist skips the level.
pub fn tree_reduce<E: HullExchange>(
    exchange: &mut E,
    rank: usize,
    ranks: usize,
    mut hull: Hull,
) -> Result<Option<Hull>, E::Error> {
    assert!(rank < ranks, "rank {rank} out of range for {ranks} ranks");

    let mut level = 0usize;
    while (1 << level) < ranks {
        let stride = 1 << level;
        if rank & stride != 0 {
            exchange.send(rank - stride, &hull)?;
            return Ok(None);
        }
        let partner = rank + stride;
        if partner < ranks {
            let theirs = exchange.recv(partner)?;
            tracing::trace!(rank, partner, level, "merging partner hull");
            hull = merge_hulls(&hull, &theirs);
        }
        level += 1;
    }
    Ok(Some(hull))
}
