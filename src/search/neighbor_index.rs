//! Exact cosine-distance neighbor search over the scaled feature matrix.
#![forbid(unsafe_code)]

use rayon::prelude::*;
use std::cmp::Ordering;

use crate::errors::{RecommendError, Result};
use crate::recipe_record::NUTRIENT_COUNT;

type Row = [f64; NUTRIENT_COUNT];

/// One search hit: a row of the indexed matrix and its cosine distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    /// Nearest first; equal distances keep row order.
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Brute-force index. Rows are stored unit-normalized so a query costs one
/// dot product per row.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    rows: Vec<Row>,
}

impl NeighborIndex {
    pub fn fit(matrix: &[Row]) -> Self {
        Self {
            rows: matrix.iter().map(normalize).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the `k` rows closest to `query`, nearest first.
    ///
    /// Asking for more neighbors than there are rows is an error.
    pub fn query(&self, query: &Row, k: usize) -> Result<Vec<Neighbor>> {
        if k > self.rows.len() {
            return Err(RecommendError::invalid_input(format!(
                "requested {} neighbors from an index of {} rows",
                k,
                self.rows.len()
            )));
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(RecommendError::invalid_input("query vector contains a non-finite value"));
        }

        let query_norm = normalize(query);
        // Collected in row order, which the stable sort below relies on.
        let mut scored: Vec<Neighbor> = self
            .rows
            .par_iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: cosine_distance_normalized(row, &query_norm),
            })
            .collect();

        scored.sort_by(|a, b| a.rank(b));
        scored.truncate(k);
        Ok(scored)
    }
}

#[inline]
fn dot(a: &Row, b: &Row) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// `1 - cos(a, b)` for unit (or zero) vectors. A zero vector has similarity
/// 0 with everything, hence distance 1.
#[inline]
fn cosine_distance_normalized(a: &Row, b: &Row) -> f64 {
    1.0 - dot(a, b)
}

/// Scales a vector to unit length; the zero vector stays zero.
pub fn normalize(vector: &Row) -> Row {
    let norm_sq = dot(vector, vector);
    if norm_sq == 0.0 {
        return [0.0; NUTRIENT_COUNT];
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    (*vector).map(|x| x * inv_norm)
}

/// Cosine distance between two arbitrary vectors.
pub fn cosine_distance(a: &Row, b: &Row) -> f64 {
    cosine_distance_normalized(&normalize(a), &normalize(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[f64]) -> Row {
        let mut r = [0.0; NUTRIENT_COUNT];
        r[..values.len()].copy_from_slice(values);
        r
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(&[0.0; NUTRIENT_COUNT]), [0.0; NUTRIENT_COUNT]);
    }

    #[test]
    fn test_normalize_non_zero_vector() {
        let normalized = normalize(&row(&[3.0, 4.0]));
        assert!((normalized[0] - 0.6).abs() < 1e-12);
        assert!((normalized[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_values() {
        let a = row(&[1.0, 0.0]);
        let b = row(&[0.0, 1.0]);
        let c = row(&[-2.0, 0.0]);
        assert!(cosine_distance(&a, &a).abs() < 1e-12);
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-12);
        assert!((cosine_distance(&a, &c) - 2.0).abs() < 1e-12);
        // Magnitude does not matter
        assert!(cosine_distance(&a, &row(&[5.0, 0.0])).abs() < 1e-12);
        assert_eq!(cosine_distance(&a, &[0.0; NUTRIENT_COUNT]), 1.0);
    }

    #[test]
    fn test_query_orders_by_distance() -> Result<()> {
        let matrix = vec![
            row(&[0.0, 1.0]),
            row(&[1.0, 0.1]),
            row(&[-1.0, 0.0]),
            row(&[1.0, 1.0]),
        ];
        let index = NeighborIndex::fit(&matrix);
        let hits = index.query(&row(&[1.0, 0.0]), 3)?;
        let order: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 3, 0]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        Ok(())
    }

    #[test]
    fn test_ties_keep_row_order() -> Result<()> {
        let matrix = vec![
            row(&[0.0, 1.0]),
            row(&[2.0, 0.0]),
            row(&[1.0, 0.0]),
            row(&[3.0, 0.0]),
        ];
        let index = NeighborIndex::fit(&matrix);
        let hits = index.query(&row(&[1.0, 0.0]), 4)?;
        let order: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
        Ok(())
    }

    #[test]
    fn test_query_rejects_k_larger_than_index() {
        let index = NeighborIndex::fit(&[row(&[1.0])]);
        assert_eq!(index.len(), 1);
        assert!(index.query(&row(&[1.0]), 2).is_err());
        assert!(index.query(&row(&[1.0]), 0).map(|hits| hits.is_empty()).unwrap_or(false));
    }
}
