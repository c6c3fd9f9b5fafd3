//! Quarter-sample luma interpolation (H.264 section 8.4.2.2.1).
//!
//! The output plane holds every integer, half and quarter sample position of
//! the input, padded by four integer samples on each side:
//!
//! ```text
//! G a b c H
//! d e f g
//! h i j k m
//! n p q r
//! M   s   N
//! ```
//!
//! `G` sits at coordinates that are both multiples of 4, `b`/`h`/`j` at even
//! coordinates and everything else at odd ones.

use tracing::{debug, trace};

use crate::error::{DspError, Result};
use crate::plane::Plane;

/// Integer samples of edge padding on every side.
pub const PAD: usize = 4;
/// Oversampling factor of the output plane.
pub const SUBPEL: usize = 4;
/// Quarter-sample offset of the first input sample in the output plane.
pub const ORIGIN: usize = PAD * SUBPEL;

const SIX_TAP: [i32; 6] = [1, -5, 20, 20, -5, 1];

/// Motion vector in quarter-sample units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionVector {
    pub x: i32,
    pub y: i32,
}

impl MotionVector {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Padded, 4x oversampled luma plane produced by [`interpolate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterPelPlane {
    plane: Plane<i32>,
    source_width: usize,
    source_height: usize,
}

impl QuarterPelPlane {
    /// Columns of the padded plane, `(source_width + 8) * 4`.
    pub fn width(&self) -> usize {
        self.plane.width()
    }

    /// Rows of the padded plane, `(source_height + 8) * 4`.
    pub fn height(&self) -> usize {
        self.plane.height()
    }

    pub fn source_width(&self) -> usize {
        self.source_width
    }

    pub fn source_height(&self) -> usize {
        self.source_height
    }

    /// Sample at raw padded coordinates.
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        self.plane.get(row, col)
    }

    /// Integer sample `(row, col)` of the source plane.
    pub fn integer_sample(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.source_height || col >= self.source_width {
            return None;
        }
        self.plane
            .get(ORIGIN + row * SUBPEL, ORIGIN + col * SUBPEL)
    }

    /// Sample at quarter-sample coordinates relative to the source's top-left
    /// sample. Negative coordinates reach into the padding.
    pub fn sample(&self, y_q: isize, x_q: isize) -> Result<i32> {
        let row = y_q + ORIGIN as isize;
        let col = x_q + ORIGIN as isize;
        if row < 0 || col < 0 {
            return Err(DspError::OutOfBounds { row, col });
        }
        self.plane
            .get(row as usize, col as usize)
            .ok_or(DspError::OutOfBounds { row, col })
    }

    /// Reads the `width x height` motion-compensated prediction for the block
    /// at integer position `(x, y)` displaced by `mv`.
    pub fn predict_block(
        &self,
        x: usize,
        y: usize,
        mv: MotionVector,
        width: usize,
        height: usize,
    ) -> Result<Plane<i32>> {
        let mut data = Vec::with_capacity(width * height);
        for r in 0..height {
            let y_q = ((y + r) * SUBPEL) as isize + mv.y as isize;
            for c in 0..width {
                let x_q = ((x + c) * SUBPEL) as isize + mv.x as isize;
                data.push(self.sample(y_q, x_q)?);
            }
        }
        Plane::new(width, height, data)
    }

    pub fn as_plane(&self) -> &Plane<i32> {
        &self.plane
    }

    pub fn into_plane(self) -> Plane<i32> {
        self.plane
    }
}

#[inline]
fn six_tap(taps: impl Fn(usize) -> i32) -> i32 {
    SIX_TAP.iter().enumerate().map(|(k, &t)| t * taps(k)).sum()
}

#[inline]
fn tap_index(center: usize, k: usize, len: usize) -> usize {
    (center + k).saturating_sub(2).min(len - 1)
}

#[inline]
fn avg(a: i32, b: i32) -> i32 {
    (a + b + 1) >> 1
}

/// Integer-position samples of the padded plane, one entry per integer
/// sample.
struct IntegerGrid {
    width: usize,
    height: usize,
    samples: Vec<i32>,
}

impl IntegerGrid {
    fn place<T: Copy + Into<i32>>(src: &Plane<T>) -> Self {
        let width = src.width() + 2 * PAD;
        let height = src.height() + 2 * PAD;
        let mut samples = vec![0i32; width * height];
        for r in 0..src.height() {
            let dst = (r + PAD) * width + PAD;
            for (d, &s) in samples[dst..dst + src.width()]
                .iter_mut()
                .zip(src.row(r))
            {
                *d = s.into();
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    /// Replicates the outermost rows and columns into the padding. Corners end
    /// up with the nearest corner sample since whole padded rows are copied.
    fn replicate_edges(&mut self) {
        let w = self.width;
        let first_col = PAD;
        let last_col = w - PAD - 1;
        for gy in PAD..self.height - PAD {
            let row = &mut self.samples[gy * w..(gy + 1) * w];
            let left = row[first_col];
            let right = row[last_col];
            row[..first_col].fill(left);
            row[last_col + 1..].fill(right);
        }

        let first_row = PAD * w;
        let last_row = (self.height - PAD - 1) * w;
        for gy in 0..PAD {
            self.samples.copy_within(first_row..first_row + w, gy * w);
        }
        for gy in self.height - PAD..self.height {
            self.samples.copy_within(last_row..last_row + w, gy * w);
        }
    }

    #[inline]
    fn at(&self, gy: usize, gx: usize) -> i32 {
        self.samples[gy * self.width + gx]
    }
}

/// Builds the quarter-sample plane for `src`.
pub fn interpolate<T: Copy + Into<i32>>(src: &Plane<T>) -> QuarterPelPlane {
    debug!(
        width = src.width(),
        height = src.height(),
        "quarter-pel interpolation"
    );

    let mut grid = IntegerGrid::place(src);
    grid.replicate_edges();
    trace!(
        grid_width = grid.width,
        grid_height = grid.height,
        "integer samples placed"
    );

    let (gw, gh) = (grid.width, grid.height);
    let cols = gw * SUBPEL;
    let rows = gh * SUBPEL;
    let mut out = vec![0i32; rows * cols];

    // Horizontal half samples (b) on integer rows. The unrounded sums feed the
    // centre sample j below.
    let mut h_acc = vec![0i32; gw * gh];
    for gy in 0..gh {
        let row = gy * SUBPEL * cols;
        for gx in 0..gw {
            let acc = six_tap(|k| grid.at(gy, tap_index(gx, k, gw)));
            h_acc[gy * gw + gx] = acc;
            out[row + gx * SUBPEL] = grid.at(gy, gx);
            out[row + gx * SUBPEL + 2] = (acc + 16) >> 5;
        }
    }
    trace!("horizontal half samples done");

    // Vertical half samples (h) on integer columns and the centre half sample
    // (j) filtered down the horizontal intermediates.
    for gy in 0..gh {
        let row = (gy * SUBPEL + 2) * cols;
        for gx in 0..gw {
            let v = six_tap(|k| grid.at(tap_index(gy, k, gh), gx));
            let j = six_tap(|k| h_acc[tap_index(gy, k, gh) * gw + gx]);
            out[row + gx * SUBPEL] = (v + 16) >> 5;
            out[row + gx * SUBPEL + 2] = (j + 512) >> 10;
        }
    }
    for v in out.iter_mut() {
        *v = (*v).clamp(0, 255);
    }
    trace!("vertical and centre half samples done");

    // Quarter samples only read even/even positions, which this stage never
    // writes.
    let at = |r: usize, c: usize| r * cols + c;
    for r in (0..rows).step_by(2) {
        for c in (1..cols - 2).step_by(2) {
            out[at(r, c)] = avg(out[at(r, c - 1)], out[at(r, c + 1)]);
        }
    }
    for r in (1..rows - 2).step_by(2) {
        for c in (0..cols).step_by(2) {
            out[at(r, c)] = avg(out[at(r - 1, c)], out[at(r + 1, c)]);
        }
    }
    for r in (1..rows - 2).step_by(2) {
        for c in (1..cols - 2).step_by(2) {
            // e and r average along "/", g and p along "\".
            out[at(r, c)] = if (r % 4 == 1) == (c % 4 == 1) {
                avg(out[at(r - 1, c + 1)], out[at(r + 1, c - 1)])
            } else {
                avg(out[at(r - 1, c - 1)], out[at(r + 1, c + 1)])
            };
        }
    }
    trace!("quarter samples done");

    // The last row and column have no quarter rule of their own. A zero there
    // takes the neighbouring value, so a genuine zero is overwritten too.
    let last_row = rows - 1;
    for c in 0..cols - 1 {
        if out[at(last_row, c)] == 0 {
            out[at(last_row, c)] = out[at(last_row - 1, c)];
        }
    }
    let last_col = cols - 1;
    for r in 0..rows {
        if out[at(r, last_col)] == 0 {
            out[at(r, last_col)] = out[at(r, last_col - 1)];
        }
    }

    QuarterPelPlane {
        plane: Plane::from_raw(cols, rows, out),
        source_width: src.width(),
        source_height: src.height(),
    }
}
