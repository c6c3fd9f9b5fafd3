//! Headerless planar sample files: 8-bit samples or little-endian i32
//! coefficients, frames stored back to back.

use anyhow::{Context, Result, ensure};
use avcdsp::Plane;

fn frame_bytes(width: usize, height: usize, sample_bytes: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(sample_bytes))
        .with_context(|| format!("frame size {width}x{height} overflows"))
}

pub fn split_u8_planes(data: &[u8], width: usize, height: usize) -> Result<Vec<Plane<u8>>> {
    let frame_size = frame_bytes(width, height, 1)?;
    ensure!(frame_size > 0, "width and height must be non-zero");
    ensure!(
        !data.is_empty() && data.len() % frame_size == 0,
        "input size {} is not a multiple of the {}x{} frame size",
        data.len(),
        width,
        height
    );
    data.chunks_exact(frame_size)
        .map(|chunk| -> Result<Plane<u8>> {
            Ok(Plane::new(width, height, chunk.to_vec())?)
        })
        .collect()
}

pub fn split_i32_planes(data: &[u8], width: usize, height: usize) -> Result<Vec<Plane<i32>>> {
    let frame_size = frame_bytes(width, height, 4)?;
    ensure!(frame_size > 0, "width and height must be non-zero");
    ensure!(
        !data.is_empty() && data.len() % frame_size == 0,
        "input size {} is not a multiple of the {}x{} i32 frame size",
        data.len(),
        width,
        height
    );
    data.chunks_exact(frame_size)
        .map(|chunk| -> Result<Plane<i32>> {
            let values = chunk
                .chunks_exact(4)
                .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            Ok(Plane::new(width, height, values)?)
        })
        .collect()
}

pub fn write_i32_plane(out: &mut Vec<u8>, plane: &Plane<i32>) {
    out.reserve(plane.data().len() * 4);
    for &v in plane.data() {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// Writes samples already known to lie in `0..=255`.
pub fn write_u8_plane(out: &mut Vec<u8>, plane: &Plane<i32>) {
    out.extend(plane.data().iter().map(|&v| v.clamp(0, 255) as u8));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multiple_frames() {
        let data: Vec<u8> = (0..24).collect();
        let planes = split_u8_planes(&data, 3, 4).unwrap();
        assert_eq!(planes.len(), 2);
        assert_eq!(planes[1].get(0, 0), Some(12));
        assert!(split_u8_planes(&data[..23], 3, 4).is_err());
        assert!(split_u8_planes(&[], 3, 4).is_err());
    }

    #[test]
    fn i32_round_trip() {
        let plane = Plane::new(2, 2, vec![-1, 0, 70000, i32::MIN]).unwrap();
        let mut bytes = Vec::new();
        write_i32_plane(&mut bytes, &plane);
        assert_eq!(bytes.len(), 16);
        let back = split_i32_planes(&bytes, 2, 2).unwrap();
        assert_eq!(back, vec![plane]);
    }

    #[test]
    fn oversized_dimensions_are_errors() {
        let err = split_i32_planes(&[0; 16], usize::MAX / 2, 2).unwrap_err();
        assert!(err.to_string().contains("overflows"));
        assert!(split_u8_planes(&[0; 16], usize::MAX, 2).is_err());
    }
}
