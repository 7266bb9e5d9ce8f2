//! Statistical utilities for plots

use serde::Serialize;

/// Smallest and largest value, `None` for an empty slice
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Width of `bins` equal bins over `[min, max]`, 1 for an empty range
pub fn bin_width(min: f64, max: f64, bins: usize) -> f64 {
    let width = (max - min) / bins as f64;
    if width > 0.0 {
        width
    } else {
        1.0
    }
}

/// Count values into `bins` fixed-width bins starting at `min`.
///
/// The last bin is closed so the maximum lands in it.
pub fn bin_counts(values: &[f64], min: f64, width: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return counts;
    }
    for &v in values {
        let idx = ((v - min) / width).floor();
        let idx = if idx <= 0.0 { 0 } else { (idx as usize).min(bins - 1) };
        counts[idx] += 1;
    }
    counts
}

/// Weighted 3-point moving average, `(prev + 2*curr + next) / 4`.
///
/// A neighbour outside the range is replaced by the current count.
pub fn smooth(counts: &[usize]) -> Vec<f64> {
    (0..counts.len())
        .map(|i| {
            let curr = counts[i] as f64;
            let prev = if i > 0 { counts[i - 1] as f64 } else { curr };
            let next = counts.get(i + 1).map(|&c| c as f64).unwrap_or(curr);
            (prev + 2.0 * curr + next) / 4.0
        })
        .collect()
}

/// One point of a density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    /// Bin centre
    pub value: f64,
    pub density: f64,
}

/// Smoothed bin counts over a value range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub points: Vec<DensityPoint>,
}

impl DensityCurve {
    pub fn max_density(&self) -> f64 {
        self.points.iter().map(|p| p.density).fold(0.0, f64::max)
    }
}

/// Bin and smooth values over their own range
pub fn pseudo_kde(values: &[f64], bins: usize) -> Option<DensityCurve> {
    let (min, max) = min_max(values)?;
    Some(pseudo_kde_in_range(values, bins, min, max))
}

/// Bin and smooth values over a given range
pub fn pseudo_kde_in_range(values: &[f64], bins: usize, min: f64, max: f64) -> DensityCurve {
    let width = bin_width(min, max, bins);
    let smoothed = smooth(&bin_counts(values, min, width, bins));
    let points = smoothed
        .into_iter()
        .enumerate()
        .map(|(i, density)| DensityPoint {
            value: min + (i as f64 + 0.5) * width,
            density,
        })
        .collect();

    DensityCurve {
        min,
        max,
        bin_width: width,
        points,
    }
}

/// `sorted[floor(n * q)]`, no interpolation
pub fn floor_quantile(sorted: &[f64], q: f64) -> f64 {
    let idx = (sorted.len() as f64 * q).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Min, quartiles and max
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Five-number summary with floor-index quantiles
pub fn five_number(values: &[f64]) -> Option<FiveNumber> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(FiveNumber {
        min: sorted[0],
        q1: floor_quantile(&sorted, 0.25),
        median: floor_quantile(&sorted, 0.5),
        q3: floor_quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Pearson correlation from raw sums, 0 when a variance term vanishes
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let (mut sx, mut sy, mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sx += a;
        sy += b;
        sxy += a * b;
        sxx += a * a;
        syy += b * b;
    }

    let n = n as f64;
    let var_x = n * sxx - sx * sx;
    let var_y = n * syy - sy * sy;
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    (n * sxy - sx * sy) / (var_x * var_y).sqrt()
}

/// Pairwise Pearson matrix; each pair uses the rows where both cells are present
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let size = columns.len();
    let mut matrix = vec![vec![0.0; size]; size];

    for i in 0..size {
        for j in 0..size {
            let (x, y): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(&columns[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            matrix[i][j] = pearson(&x, &y);
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_floor_index_quartiles() {
        let stats = five_number(&[100.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn test_single_value_summary() {
        let stats = five_number(&[7.0]).unwrap();
        assert_eq!((stats.min, stats.q1, stats.median, stats.q3, stats.max), (7.0, 7.0, 7.0, 7.0, 7.0));
        assert!(five_number(&[]).is_none());
    }

    #[test]
    fn test_perfect_correlation_is_exact() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]), -1.0);
    }

    #[test]
    fn test_constant_column_correlates_to_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn test_matrix_skips_missing_pairs() {
        let columns = vec![
            vec![Some(1.0), Some(2.0), None, Some(3.0)],
            vec![Some(2.0), Some(4.0), Some(100.0), Some(6.0)],
        ];
        let matrix = correlation_matrix(&columns);
        assert_eq!(matrix[0][1], 1.0);
        assert_eq!(matrix[1][0], 1.0);
    }

    #[test]
    fn test_smoothing_reuses_current_at_edges() {
        let smoothed = smooth(&[4, 0, 8]);
        assert_eq!(smoothed, vec![(4.0 + 8.0 + 0.0) / 4.0, (4.0 + 0.0 + 8.0) / 4.0, (0.0 + 16.0 + 8.0) / 4.0]);
        assert_eq!(smooth(&[2]), vec![2.0]);
    }

    #[test]
    fn test_bin_counts_close_last_bin() {
        let counts = bin_counts(&[0.0, 5.0, 10.0], 0.0, bin_width(0.0, 10.0, 2), 2);
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_empty_range_uses_unit_width() {
        assert_eq!(bin_width(3.0, 3.0, 15), 1.0);
        let curve = pseudo_kde(&[3.0, 3.0], 4).unwrap();
        assert_eq!(curve.points[0].value, 3.5);
        assert_eq!(curve.points[0].density, 1.5);
        assert_eq!(curve.points[1].density, 0.5);
    }

    proptest! {
        #[test]
        fn prop_quartiles_are_ordered(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let s = five_number(&values).unwrap();
            prop_assert!(s.min <= s.q1);
            prop_assert!(s.q1 <= s.median);
            prop_assert!(s.median <= s.q3);
            prop_assert!(s.q3 <= s.max);
        }

        #[test]
        fn prop_matrix_is_symmetric(
            rows in prop::collection::vec(prop::collection::vec(-1000i32..1000, 4), 3..60)
        ) {
            let columns: Vec<Vec<Option<f64>>> = (0..4)
                .map(|c| rows.iter().map(|r| Some(r[c] as f64)).collect())
                .collect();
            let matrix = correlation_matrix(&columns);

            for i in 0..4 {
                for j in 0..4 {
                    prop_assert_eq!(matrix[i][j], matrix[j][i]);
                }
                let distinct = rows.iter().any(|r| r[i] != rows[0][i]);
                if distinct {
                    prop_assert!((matrix[i][i] - 1.0).abs() < 1e-9);
                }
            }
        }

        #[test]
        fn prop_bins_hold_every_value(values in prop::collection::vec(-1e4f64..1e4, 1..300), bins in 1usize..40) {
            let (min, max) = min_max(&values).unwrap();
            let counts = bin_counts(&values, min, bin_width(min, max, bins), bins);
            prop_assert_eq!(counts.iter().sum::<usize>(), values.len());
        }
    }
}
