//! Byte codec for shipping hulls across a message-passing fabric.
//!
//! The layout mirrors the input-file convention: a little-endian u64 vertex
//! count, then the X stream, then the Y stream, both little-endian f32.
//! Endianness is fixed so two processes on different hosts agree.

use std::error::Error;
use std::fmt;

use crate::hull::Hull;

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer is too short to hold the vertex count.
    MissingHeader,
    /// The buffer ends before the payload its header declares.
    Truncated { vertices: u64, got: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingHeader => write!(f, "hull payload shorter than its header"),
            DecodeError::Truncated { vertices, got } => write!(
                f,
                "hull payload truncated: {got} bytes cannot hold {vertices} vertices"
            ),
        }
    }
}

impl Error for DecodeError {}

pub fn encode(hull: &Hull) -> Vec<u8> {
    let n = hull.len();
    let mut bytes = Vec::with_capacity(8 + 8 * n);
    bytes.extend_from_slice(&(n as u64).to_le_bytes());
    for &x in hull.xs() {
        bytes.extend_from_slice(&x.to_le_bytes());
    }
    for &y in hull.ys() {
        bytes.extend_from_slice(&y.to_le_bytes());
    }
    bytes
}

pub fn decode(bytes: &[u8]) -> Result<Hull, DecodeError> {
    let header = bytes.get(..8).ok_or(DecodeError::MissingHeader)?;
    let vertices = u64::from_le_bytes(header.try_into().expect("sliced to 8 bytes"));
    if (((bytes.len() - 8) / 8) as u64) < vertices {
        return Err(DecodeError::Truncated {
            vertices,
            got: bytes.len(),
        });
    }

    let n = vertices as usize;
    let stream = |at: usize| {
        bytes[at..at + 4 * n]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().expect("chunked to 4 bytes")))
            .collect::<Vec<f32>>()
    };
    Ok(Hull::from_streams(stream(8), stream(8 + 4 * n)))
}
