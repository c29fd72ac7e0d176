//! Automatic multiscale peak detection
//!
//! The scalogram is seeded with PCG32 noise in `[1, 2)` so that rows only
//! agree where every scale marks the same position as an extremum.

use contracts::ContractError;
use rand::RngCore;
use rand_pcg::Pcg32;
use tracing::trace;

use crate::geometry::fuzzy_is_null;
use crate::view::FieldView;

/// Which extremum to detect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Peak,
    Trough,
}

impl Extremum {
    fn flag(self) -> i8 {
        match self {
            Extremum::Peak => 1,
            Extremum::Trough => -1,
        }
    }

    fn is_extreme(self, v: f64, left: f64, right: f64) -> bool {
        match self {
            Extremum::Peak => v > left && v > right,
            Extremum::Trough => v < left && v < right,
        }
    }
}

/// Row-major `rows x cols` matrix
struct Scalogram {
    cells: Vec<f64>,
    cols: usize,
}

impl Scalogram {
    fn seeded(rows: usize, cols: usize) -> Result<Self, ContractError> {
        let size = rows
            .checked_mul(cols)
            .ok_or_else(|| ContractError::allocation(usize::MAX))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| ContractError::allocation(size))?;

        let mut rng = Pcg32::new(0, 0);
        cells.extend((0..size).map(|_| f64::from(rng.next_u32()) * 2f64.powi(-32) + 1.0));
        Ok(Self { cells, cols })
    }

    fn row(&self, k: usize) -> &[f64] {
        &self.cells[k * self.cols..(k + 1) * self.cols]
    }

    fn set(&mut self, k: usize, i: usize, v: f64) {
        self.cells[k * self.cols + i] = v;
    }

    fn get(&self, k: usize, i: usize) -> f64 {
        self.cells[k * self.cols + i]
    }
}

/// Flag peaks (`+1`) or troughs (`-1`) of the field's magnitude
///
/// Series shorter than three elements have no scale and yield all zeros.
/// Output is identical across runs for identical input.
///
/// # Errors
/// - The scalogram cannot be allocated
pub fn ampd<T>(view: &FieldView<'_, T>, mode: Extremum) -> Result<Vec<i8>, ContractError> {
    let n = view.len();
    let max_scale = n.div_ceil(2).saturating_sub(1);
    let mut flags = vec![0i8; n];
    if max_scale == 0 {
        return Ok(flags);
    }

    let values = view.values();
    let mut lms = Scalogram::seeded(max_scale, n)?;

    for row in 0..max_scale {
        let k = row + 1;
        for s in k..n - k {
            if mode.is_extreme(values[s], values[s - k], values[s + k]) {
                lms.set(row, s, 0.0);
            }
        }
    }

    // first minimum wins
    let mut scale = 1;
    let mut best = f64::INFINITY;
    for row in 0..max_scale {
        let sum: f64 = lms.row(row).iter().sum();
        if sum < best {
            best = sum;
            scale = row + 1;
        }
    }
    trace!(n, max_scale, scale, "ampd scale selected");

    // with a single row the deviation is 0/0 and nothing is flagged
    let norm = 1.0 / (scale as f64 - 1.0);
    for (i, flag) in flags.iter_mut().enumerate() {
        let column: f64 = (0..scale).map(|row| lms.get(row, i)).sum();
        let mean = column / scale as f64;
        let deviation: f64 = (0..scale).map(|row| (lms.get(row, i) - mean).abs()).sum();
        if fuzzy_is_null(norm * deviation) {
            *flag = mode.flag();
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn scalar(v: &f64) -> &[f64] {
        std::slice::from_ref(v)
    }

    fn pair(v: &[f64; 2]) -> &[f64] {
        v
    }

    fn sine(n: usize, period: f64, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (TAU * i as f64 / period + phase).sin())
            .collect()
    }

    fn flagged(flags: &[i8]) -> Vec<usize> {
        flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f != 0)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_sine_peaks() {
        let data = sine(200, 40.0, 0.0);
        let view = FieldView::new(&data, scalar).unwrap();
        let flags = ampd(&view, Extremum::Peak).unwrap();

        let peaks = flagged(&flags);
        assert!(!peaks.is_empty(), "a clean sine must have detected peaks");
        let maxima = [10, 50, 90, 130, 170];
        for p in &peaks {
            assert!(
                maxima.iter().any(|m: &usize| m.abs_diff(*p) <= 1),
                "flag at {p} is not near a true maximum"
            );
            assert_eq!(flags[*p], 1);
        }
        assert_eq!(peaks, vec![50, 90, 130, 170]);
    }

    #[test]
    fn test_sine_troughs() {
        let data = sine(200, 40.0, 0.0);
        let view = FieldView::new(&data, scalar).unwrap();
        let flags = ampd(&view, Extremum::Trough).unwrap();

        assert_eq!(flagged(&flags), vec![30, 70, 110, 150]);
        assert!(flags.iter().all(|f| *f <= 0));
    }

    #[test]
    fn test_deterministic() {
        let data = sine(300, 50.0, 0.3);
        let view = FieldView::new(&data, scalar).unwrap();
        let a = ampd(&view, Extremum::Peak).unwrap();
        let b = ampd(&view, Extremum::Peak).unwrap();
        assert_eq!(a, b);
        assert_eq!(flagged(&a), vec![60, 110, 160, 210, 260]);
    }

    #[test]
    fn test_magnitude_of_vector_field() {
        let data: Vec<[f64; 2]> = sine(200, 40.0, 0.0)
            .into_iter()
            .map(|v| [0.0, v + 2.0])
            .collect();
        let view = FieldView::new(&data, pair).unwrap();
        let flags = ampd(&view, Extremum::Peak).unwrap();
        assert_eq!(flagged(&flags), vec![50, 90, 130, 170]);
    }

    #[test]
    fn test_short_series() {
        let data = [1.0, 2.0];
        let view = FieldView::new(&data, scalar).unwrap();
        assert_eq!(ampd(&view, Extremum::Peak).unwrap(), vec![0, 0]);
    }
}
