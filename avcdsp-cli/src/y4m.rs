use anyhow::{Context, Result, bail, ensure};
use avcdsp::Plane;

/// Chroma layout declared by the `C` header tag; only used to skip chroma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chroma {
    C420,
    C422,
    C444,
    Mono,
}

impl Chroma {
    fn parse(tag: &str) -> Result<Self> {
        if tag.starts_with("420") {
            Ok(Self::C420)
        } else if tag.starts_with("422") {
            Ok(Self::C422)
        } else if tag.starts_with("444") {
            Ok(Self::C444)
        } else if tag.starts_with("mono") {
            Ok(Self::Mono)
        } else {
            bail!("unsupported Y4M colorspace C{tag}")
        }
    }

    fn plane_size(self, width: usize, height: usize) -> Option<usize> {
        match self {
            Self::C420 => width.div_ceil(2).checked_mul(height.div_ceil(2)),
            Self::C422 => width.div_ceil(2).checked_mul(height),
            Self::C444 => width.checked_mul(height),
            Self::Mono => Some(0),
        }
    }
}

/// Luma planes of every frame in a YUV4MPEG2 stream.
pub fn luma_planes(data: &[u8]) -> Result<Vec<Plane<u8>>> {
    let header_end = data
        .iter()
        .position(|&b| b == b'\n')
        .context("no header line in Y4M data")?;
    let header_line = std::str::from_utf8(&data[..header_end]).context("invalid Y4M header")?;

    ensure!(
        header_line.starts_with("YUV4MPEG2"),
        "not a YUV4MPEG2 file"
    );

    let mut width = 0usize;
    let mut height = 0usize;
    let mut chroma = Chroma::C420;

    for token in header_line.split_whitespace().skip(1) {
        let Some((key, val)) = token.split_at_checked(1) else {
            bail!("malformed Y4M header token {token:?}")
        };
        match key {
            "W" => width = val.parse().context("invalid width")?,
            "H" => height = val.parse().context("invalid height")?,
            "C" => chroma = Chroma::parse(val)?,
            _ => {}
        }
    }

    ensure!(width > 0 && height > 0, "missing W/H in Y4M header");

    let y_size = width
        .checked_mul(height)
        .context("Y4M frame dimensions overflow")?;
    let frame_data_size = chroma
        .plane_size(width, height)
        .and_then(|uv| uv.checked_mul(2))
        .and_then(|uv| uv.checked_add(y_size))
        .context("Y4M frame dimensions overflow")?;
    let frame_marker = b"FRAME";

    let mut planes = Vec::new();
    let mut pos = header_end + 1;

    while pos + frame_marker.len() <= data.len()
        && &data[pos..pos + frame_marker.len()] == frame_marker
    {
        // Frame headers may carry parameters after the marker.
        let line_end = data[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .context("unterminated FRAME header")?;
        let pixel_start = pos + line_end + 1;
        ensure!(
            data.len() - pixel_start >= frame_data_size,
            "truncated frame data in frame {}",
            planes.len()
        );

        let luma = data[pixel_start..pixel_start + y_size].to_vec();
        planes.push(Plane::new(width, height, luma)?);

        pos = pixel_start + frame_data_size;
    }

    ensure!(!planes.is_empty(), "no FRAME marker in Y4M data");
    Ok(planes)
}
