//! Point-file input and hull output.
//!
//! The input format is raw IEEE-754 single precision, little-endian: all N
//! X coordinates first, then all N Y coordinates. N is whatever the file
//! length implies; there is no header.

use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use parhull::{Hull, PointSet};

/// Reads a whole point file.
pub fn read_points(path: &Path) -> Result<PointSet> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let bytes = file
        .metadata()
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    if bytes % 8 != 0 {
        bail!(
            "{} is not two little-endian f32 streams of equal length ({bytes} bytes)",
            path.display()
        );
    }
    let n = (bytes / 8) as usize;

    let xs = read_stream(&mut file, n)
        .with_context(|| format!("failed to read the X stream of {}", path.display()))?;
    let ys = read_stream(&mut file, n)
        .with_context(|| format!("failed to read the Y stream of {}", path.display()))?;
    Ok(PointSet::from_streams(xs, ys))
}

/// Reads the slice of a point file belonging to `rank` out of `ranks`
/// cooperating readers, seeking into both coordinate streams. Slices are
/// carved like worker slices: `ceil(N / ranks)` points each, the last rank
/// taking the remainder.
pub fn read_points_slice(path: &Path, rank: usize, ranks: usize) -> Result<PointSet> {
    assert!(rank < ranks, "rank {rank} out of range for {ranks} ranks");

    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let bytes = file
        .metadata()
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    if bytes % 8 != 0 {
        bail!(
            "{} is not two little-endian f32 streams of equal length ({bytes} bytes)",
            path.display()
        );
    }
    let n = (bytes / 8) as usize;

    let chunk = n.div_ceil(ranks);
    let start = (rank * chunk).min(n);
    let end = if rank + 1 == ranks {
        n
    } else {
        ((rank + 1) * chunk).min(n)
    };
    let count = end - start;

    file.seek(SeekFrom::Start(4 * start as u64))
        .context("seek into the X stream failed")?;
    let xs = read_stream(&mut file, count)
        .with_context(|| format!("failed to read the X slice of {}", path.display()))?;

    file.seek(SeekFrom::Start(4 * (n + start) as u64))
        .context("seek into the Y stream failed")?;
    let ys = read_stream(&mut file, count)
        .with_context(|| format!("failed to read the Y slice of {}", path.display()))?;

    Ok(PointSet::from_streams(xs, ys))
}

fn read_stream(file: &mut File, n: usize) -> Result<Vec<f32>> {
    let mut raw = vec![0u8; 4 * n];
    file.read_exact(&mut raw).context("short read")?;
    Ok(raw
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().expect("chunked to 4 bytes")))
        .collect())
}

/// Writes a point set in the binary input format.
pub fn write_points(path: &Path, points: &PointSet) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for &x in points.xs() {
        out.write_all(&x.to_le_bytes())?;
    }
    for &y in points.ys() {
        out.write_all(&y.to_le_bytes())?;
    }
    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Writes hull vertices as `x y` lines, counter-clockwise from the
/// canonical start vertex.
pub fn write_hull(path: &Path, hull: &Hull) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for p in hull.points() {
        writeln!(out, "{} {}", p.x, p.y)?;
    }
    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))
}
